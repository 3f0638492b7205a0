use super::*;

/// Startup view over Bengaluru, like the original deployment.
pub const DEFAULT_CENTER: LatLng = LatLng::new(12.9716, 77.5946);
pub const DEFAULT_ZOOM: f64 = 13.0;
/// Zoom used when centering on a single result.
pub const FOCUS_ZOOM: f64 = 13.0;
/// Zoom cap when fitting the view to multiple results.
pub const FIT_MAX_ZOOM: f64 = 14.0;
pub const MIN_ZOOM: f64 = 2.0;

/// The view model of the map: where we look and how far we are zoomed in.
///
/// Tile rendering is not modelled here; whatever draws the map reads this.
pub struct MapView {
    pub center: LatLng,
    pub zoom: f64,
    min_zoom: f64,
}

impl MapView {
    pub fn new() -> Self {
        Self {
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
            min_zoom: MIN_ZOOM,
        }
    }

    pub fn set_view(&mut self, center: LatLng, zoom: f64) {
        self.center = center.clamped_to_world();
        self.zoom = zoom.max(self.min_zoom);
    }

    /// Move the view, clamped so the center never leaves the world bounds.
    pub fn pan(&mut self, delta_lat: f64, delta_lng: f64) {
        self.center = LatLng::new(self.center.lat + delta_lat, self.center.lng + delta_lng)
            .clamped_to_world();
    }

    /// Center on `bounds` at the largest zoom which still shows all of it,
    /// capped at `max_zoom`.
    pub fn fit_bounds(&mut self, bounds: BoundingBox, max_zoom: f64) {
        let (lat_span, lng_span) = bounds.span();
        let lat_zoom = zoom_for_span(2.0 * LAT_LIMIT, lat_span, max_zoom);
        let lng_zoom = zoom_for_span(2.0 * LNG_LIMIT, lng_span, max_zoom);
        let zoom = lat_zoom.min(lng_zoom).min(max_zoom).max(self.min_zoom);
        self.set_view(bounds.center(), zoom);
    }

    /// The region currently visible, used to scope nearby-place queries.
    pub fn viewport(&self) -> BoundingBox {
        let scale = 2f64.powf(self.zoom);
        let half_lat = LAT_LIMIT / scale;
        let half_lng = LNG_LIMIT / scale;
        BoundingBox::new(
            (self.center.lat - half_lat).max(-LAT_LIMIT),
            (self.center.lng - half_lng).max(-LNG_LIMIT),
            (self.center.lat + half_lat).min(LAT_LIMIT),
            (self.center.lng + half_lng).min(LNG_LIMIT),
        )
    }
}

impl Default for MapView {
    fn default() -> Self {
        Self::new()
    }
}

fn zoom_for_span(world: f64, span: f64, max_zoom: f64) -> f64 {
    if span <= 0.0 {
        max_zoom
    } else {
        (world / span).log2()
    }
}
