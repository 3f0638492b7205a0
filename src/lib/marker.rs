use super::*;

/// A pin on the map with its popup label. Bound 1:1 to the result it shows
/// and rebuilt wholesale on every search pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub position: LatLng,
    pub title: String,
    pub subtitle: String,
}

impl Marker {
    pub fn new(position: LatLng, title: impl Into<String>, subtitle: impl Into<String>) -> Self {
        Self {
            position,
            title: title.into(),
            subtitle: subtitle.into(),
        }
    }

    pub fn popup_label(&self) -> String {
        if self.subtitle.is_empty() {
            self.title.clone()
        } else {
            format!("{} ({})", self.title, self.subtitle)
        }
    }
}

impl From<&Location> for Marker {
    fn from(location: &Location) -> Self {
        Marker::new(
            location.position(),
            location.name,
            location.category.name(),
        )
    }
}

impl From<&RemotePlace> for Marker {
    fn from(place: &RemotePlace) -> Self {
        Marker::new(place.position(), place.name.clone(), place.kind.clone())
    }
}

/// A group of markers managed together. Cleared and refilled as a whole,
/// no incremental diffing.
#[derive(Debug, Default)]
pub struct MarkerLayer {
    markers: Vec<Marker>,
    clustered: bool,
}

impl MarkerLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A layer whose markers may be visually grouped at low zoom.
    pub fn clustered() -> Self {
        Self {
            markers: vec![],
            clustered: true,
        }
    }

    pub fn is_clustered(&self) -> bool {
        self.clustered
    }

    pub fn clear(&mut self) {
        self.markers.clear();
    }

    pub fn add(&mut self, marker: Marker) {
        self.markers.push(marker);
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}

/// Redraw `layer` with exactly `items` and adjust the view:
/// nothing for an empty set, a fixed-zoom recenter for a single result,
/// a capped bounds fit for several.
pub fn show_markers(view: &mut MapView, layer: &mut MarkerLayer, items: &[Marker]) {
    layer.clear();
    for item in items {
        layer.add(item.clone());
    }

    match items {
        [] => {}
        [only] => view.set_view(only.position, FOCUS_ZOOM),
        _ => {
            let points: Vec<LatLng> = items.iter().map(|item| item.position).collect();
            if let Some(bounds) = BoundingBox::from_points(&points) {
                view.fit_bounds(bounds, FIT_MAX_ZOOM);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn markers(locations: &[Location]) -> Vec<Marker> {
        locations.iter().map(Marker::from).collect()
    }

    #[test]
    fn empty_result_leaves_the_view_alone() {
        let mut view = MapView::new();
        let mut layer = MarkerLayer::new();
        let before = (view.center, view.zoom);
        show_markers(&mut view, &mut layer, &[]);
        assert!(layer.is_empty());
        assert_eq!((view.center, view.zoom), before);
    }

    #[test]
    fn single_result_centers_at_focus_zoom() {
        let mut view = MapView::new();
        let mut layer = MarkerLayer::new();
        show_markers(&mut view, &mut layer, &markers(&LOCATIONS[6..7]));
        assert_eq!(layer.len(), 1);
        assert_eq!(view.center, LOCATIONS[6].position());
        assert_eq!(view.zoom, FOCUS_ZOOM);
    }

    #[test]
    fn many_results_fit_the_view_to_all_of_them() {
        let mut view = MapView::new();
        let mut layer = MarkerLayer::new();
        show_markers(&mut view, &mut layer, &markers(&LOCATIONS));
        assert_eq!(layer.len(), LOCATIONS.len());
        assert!(view.zoom <= FIT_MAX_ZOOM);
        // Pad the viewport a hair so points right on the fitted edge count.
        let viewport = view.viewport();
        let viewport = BoundingBox::new(
            viewport.south - 1e-9,
            viewport.west - 1e-9,
            viewport.north + 1e-9,
            viewport.east + 1e-9,
        );
        for location in &LOCATIONS {
            assert!(viewport.contains(location.position()));
        }
    }

    #[test]
    fn redraw_replaces_previous_markers() {
        let mut view = MapView::new();
        let mut layer = MarkerLayer::new();
        show_markers(&mut view, &mut layer, &markers(&LOCATIONS));
        show_markers(&mut view, &mut layer, &markers(&LOCATIONS[..1]));
        assert_eq!(layer.len(), 1);
    }

    #[test]
    fn popup_label_carries_name_and_kind() {
        let marker = Marker::from(&LOCATIONS[6]);
        assert_eq!(marker.popup_label(), "Taj Mahal (Monument)");
    }
}
