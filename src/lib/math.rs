use serde_derive::{Deserialize, Serialize};

/// Latitude limit of the web mercator projection the tile servers use.
pub const LAT_LIMIT: f64 = 85.0;
pub const LNG_LIMIT: f64 = 180.0;

pub const WORLD_BOUNDS: BoundingBox =
    BoundingBox::new(-LAT_LIMIT, -LNG_LIMIT, LAT_LIMIT, LNG_LIMIT);

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Clamp the coordinate to the world bounds the map is allowed to show.
    pub fn clamped_to_world(self) -> Self {
        Self {
            lat: self.lat.max(-LAT_LIMIT).min(LAT_LIMIT),
            lng: self.lng.max(-LNG_LIMIT).min(LNG_LIMIT),
        }
    }
}

impl std::fmt::Display for LatLng {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:.4}, {:.4}", self.lat, self.lng)
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BoundingBox {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl BoundingBox {
    pub const fn new(south: f64, west: f64, north: f64, east: f64) -> Self {
        Self {
            south,
            west,
            north,
            east,
        }
    }

    /// The smallest box containing all given points.
    ///
    /// Returns `None` for an empty slice.
    pub fn from_points(points: &[LatLng]) -> Option<Self> {
        let first = points.first()?;
        let mut bounds = Self::new(first.lat, first.lng, first.lat, first.lng);
        for point in &points[1..] {
            bounds.south = bounds.south.min(point.lat);
            bounds.west = bounds.west.min(point.lng);
            bounds.north = bounds.north.max(point.lat);
            bounds.east = bounds.east.max(point.lng);
        }
        Some(bounds)
    }

    pub fn contains(&self, point: LatLng) -> bool {
        point.lat >= self.south
            && point.lat <= self.north
            && point.lng >= self.west
            && point.lng <= self.east
    }

    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.south + self.north) / 2.0,
            (self.west + self.east) / 2.0,
        )
    }

    /// (latitude span, longitude span) in degrees.
    pub fn span(&self) -> (f64, f64) {
        (self.north - self.south, self.east - self.west)
    }

    /// The `w,s,e,n` form the geocoding endpoint expects as `viewbox`.
    pub fn viewbox_param(&self) -> String {
        format!("{},{},{},{}", self.west, self.south, self.east, self.north)
    }
}

/// Key for coordinate deduplication, rounded to 5 decimal places (about 1 m).
pub fn coordinate_key(lat: f64, lng: f64) -> (i64, i64) {
    (
        (lat * 100_000.0).round() as i64,
        (lng * 100_000.0).round() as i64,
    )
}
