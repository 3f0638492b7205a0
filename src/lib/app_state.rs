use super::*;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Everything the application mutates over its lifetime, owned in one
/// place: the view, the marker layers, the search pipeline and the session.
pub struct AppState {
    pub view: MapView,
    /// Search results; drawn as a cluster group at low zoom.
    pub results: MarkerLayer,
    /// The single "you are here" marker, on its own layer.
    pub position_layer: MarkerLayer,
    pub search: SearchController,
    pub input: SearchInput,
    session_path: Option<PathBuf>,
}

impl AppState {
    pub fn new(
        geocoder: Arc<dyn Geocoder>,
        debounce: Duration,
        keyword_pause: Duration,
        session_path: Option<PathBuf>,
    ) -> Self {
        Self {
            view: MapView::new(),
            results: MarkerLayer::clustered(),
            position_layer: MarkerLayer::new(),
            search: SearchController::new(geocoder, debounce, keyword_pause),
            input: SearchInput::default(),
            session_path,
        }
    }

    /// Pre-populate the input from the stored session and schedule the
    /// matching search, as if the user had just typed it. Without a stored
    /// session this schedules the empty input, so startup renders browse
    /// mode.
    pub fn restore_session(&mut self, now: Instant) {
        if let Some(session) = self.session_path.as_ref().and_then(load_session) {
            log::info!(
                "Restoring last search {:?} / {:?}.",
                session.query,
                session.category
            );
            self.input = SearchInput::new(session.query, session.category);
        }
        self.search.edit(self.input.clone(), now);
    }

    /// Record an edit of the search box or the category selector. Unchanged
    /// input is ignored so re-submitting does not restart anything.
    pub fn handle_input(&mut self, input: SearchInput, now: Instant) {
        if input == self.input {
            return;
        }
        self.input = input.clone();
        self.search.edit(input, now);
    }

    /// One turn of the event loop: dispatch a due search, drain worker
    /// results, apply whatever belongs to the current generation.
    ///
    /// Returns whether the visible state changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut changed = false;

        if let Some(dispatch) = self.search.poll(now) {
            self.persist_session();
            match dispatch {
                Dispatch::Local(locations) => {
                    let markers: Vec<Marker> = locations.iter().map(Marker::from).collect();
                    show_markers(&mut self.view, &mut self.results, &markers);
                    changed = true;
                }
                Dispatch::Remote | Dispatch::NoRender => {}
            }
        }

        for update in self.search.drain() {
            self.apply_update(update);
            changed = true;
        }

        changed
    }

    /// The static variant's search button: filter the dataset in place.
    pub fn run_local_search(&mut self, query: &str) {
        let matches = search_dataset(&LOCATIONS, query);
        let markers: Vec<Marker> = matches.iter().map(Marker::from).collect();
        show_markers(&mut self.view, &mut self.results, &markers);
    }

    /// Ask `provider` where we are; center there and drop a marker.
    /// Returns whether a position was found.
    pub fn locate(&mut self, provider: &dyn PositionProvider) -> bool {
        match provider.current_position() {
            Some(position) => {
                self.position_layer.clear();
                self.position_layer
                    .add(Marker::new(position, "You are here", ""));
                self.view.set_view(position, FOCUS_ZOOM);
                true
            }
            None => {
                log::warn!("Could not determine the current position.");
                false
            }
        }
    }

    fn apply_update(&mut self, update: SearchUpdate) {
        match update {
            SearchUpdate::Anchor { place, .. } => {
                let marker = Marker::from(&place);
                show_markers(&mut self.view, &mut self.results, &[marker]);
            }
            SearchUpdate::Pois {
                anchor, places, ..
            } => {
                // The provisional anchor update already set the view; only
                // the layer content grows here.
                self.results.clear();
                self.results.add(Marker::from(&anchor));
                for place in &places {
                    self.results.add(Marker::from(place));
                }
            }
        }
    }

    fn persist_session(&self) {
        if let Some(path) = &self.session_path {
            let committed = self.search.committed();
            store_session(
                path,
                &Session {
                    query: committed.query.clone(),
                    category: committed.category,
                },
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct CannedGeocoder {
        calls: Mutex<usize>,
        response: Option<Vec<RemotePlace>>,
    }

    impl CannedGeocoder {
        fn new(response: Option<Vec<RemotePlace>>) -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(0),
                response,
            })
        }

        fn calls(&self) -> usize {
            *self.calls.lock().unwrap()
        }
    }

    impl Geocoder for CannedGeocoder {
        fn search(&self, _query: &str, _viewbox: Option<&BoundingBox>) -> Option<Vec<RemotePlace>> {
            *self.calls.lock().unwrap() += 1;
            self.response.clone()
        }
    }

    struct FixedPosition(Option<LatLng>);

    impl PositionProvider for FixedPosition {
        fn current_position(&self) -> Option<LatLng> {
            self.0
        }
    }

    fn app(geocoder: Arc<dyn Geocoder>, session_path: Option<PathBuf>) -> AppState {
        AppState::new(
            geocoder,
            Duration::from_millis(0),
            Duration::from_millis(0),
            session_path,
        )
    }

    /// Tick until remote work settled and nothing more changes.
    fn run_until_settled(app: &mut AppState) {
        let deadline = Instant::now() + std::time::Duration::from_secs(5);
        loop {
            app.tick(Instant::now());
            if !app.search.is_busy() {
                app.tick(Instant::now());
                return;
            }
            assert!(Instant::now() < deadline, "the search never settled");
            std::thread::sleep(Duration::from_millis(2));
        }
    }

    fn marker_titles(layer: &MarkerLayer) -> Vec<&str> {
        layer.markers().iter().map(|m| m.title.as_str()).collect()
    }

    #[test]
    fn browse_mode_shows_the_full_dataset() {
        let geocoder = CannedGeocoder::new(None);
        let mut app = app(geocoder.clone(), None);
        app.handle_input(SearchInput::new("x", None), Instant::now());
        app.handle_input(SearchInput::new("", None), Instant::now());
        run_until_settled(&mut app);
        assert_eq!(app.results.len(), 10);
        assert_eq!(geocoder.calls(), 0);
    }

    #[test]
    fn category_park_shows_exactly_the_two_parks() {
        let geocoder = CannedGeocoder::new(None);
        let mut app = app(geocoder.clone(), None);
        app.handle_input(
            SearchInput::new("", Some(Category::Park)),
            Instant::now(),
        );
        run_until_settled(&mut app);
        assert_eq!(app.results.len(), 2);
        assert_eq!(geocoder.calls(), 0);
    }

    #[test]
    fn short_query_leaves_markers_untouched() {
        let geocoder = CannedGeocoder::new(None);
        let mut app = app(geocoder.clone(), None);
        app.restore_session(Instant::now());
        run_until_settled(&mut app);
        assert_eq!(app.results.len(), 10);

        app.handle_input(SearchInput::new("ta", None), Instant::now());
        run_until_settled(&mut app);
        assert_eq!(app.results.len(), 10);
        assert_eq!(geocoder.calls(), 0);
    }

    #[test]
    fn local_taj_search_centers_on_the_taj_mahal() {
        let geocoder = CannedGeocoder::new(None);
        let mut app = app(geocoder, None);
        app.run_local_search("TaJ");
        assert_eq!(marker_titles(&app.results), vec!["Taj Mahal"]);
        assert_eq!(app.view.center, LatLng::new(27.1751, 78.0421));
        assert_eq!(app.view.zoom, FOCUS_ZOOM);
    }

    #[test]
    fn repeating_a_search_yields_the_same_markers() {
        let geocoder = CannedGeocoder::new(None);
        let mut app = app(geocoder, None);
        app.handle_input(
            SearchInput::new("", Some(Category::Monument)),
            Instant::now(),
        );
        run_until_settled(&mut app);
        let first: Vec<Marker> = app.results.markers().to_vec();
        assert_eq!(first.len(), 4);

        // Same input again: ignored, token unchanged, markers identical.
        let generation = app.search.generation();
        app.handle_input(
            SearchInput::new("", Some(Category::Monument)),
            Instant::now(),
        );
        run_until_settled(&mut app);
        assert_eq!(app.search.generation(), generation);
        assert_eq!(app.results.markers(), &first[..]);
    }

    #[test]
    fn remote_place_becomes_the_single_marker() {
        let geocoder = CannedGeocoder::new(Some(vec![RemotePlace {
            name: "Charminar, Hyderabad".to_string(),
            lat: 17.3616,
            lng: 78.4747,
            kind: "monument".to_string(),
            class: "historic".to_string(),
        }]));
        let mut app = app(geocoder.clone(), None);
        app.handle_input(SearchInput::new("charminar", None), Instant::now());
        run_until_settled(&mut app);
        assert_eq!(marker_titles(&app.results), vec!["Charminar, Hyderabad"]);
        assert_eq!(app.view.center, LatLng::new(17.3616, 78.4747));
        assert_eq!(app.view.zoom, FOCUS_ZOOM);
        assert_eq!(geocoder.calls(), 1);
    }

    #[test]
    fn locate_drops_a_position_marker() {
        let geocoder = CannedGeocoder::new(None);
        let mut app = app(geocoder, None);
        assert!(app.locate(&FixedPosition(Some(LatLng::new(12.97, 77.59)))));
        assert_eq!(app.position_layer.len(), 1);
        assert_eq!(app.view.center, LatLng::new(12.97, 77.59));

        // Failure leaves everything as it was.
        let center = app.view.center;
        assert!(!app.locate(&FixedPosition(None)));
        assert_eq!(app.position_layer.len(), 1);
        assert_eq!(app.view.center, center);
    }

    #[test]
    fn committed_searches_survive_a_restart() {
        let path = std::env::temp_dir()
            .join("waypoints-tests")
            .join("app-session.json");
        let _ = std::fs::remove_file(&path);

        let geocoder = CannedGeocoder::new(None);
        let mut app = app(geocoder, Some(path.clone()));
        app.handle_input(
            SearchInput::new("", Some(Category::Fort)),
            Instant::now(),
        );
        run_until_settled(&mut app);

        let geocoder = CannedGeocoder::new(None);
        let mut restarted = self::app(geocoder, Some(path));
        restarted.restore_session(Instant::now());
        assert_eq!(
            restarted.input,
            SearchInput::new("", Some(Category::Fort))
        );
        run_until_settled(&mut restarted);
        assert_eq!(marker_titles(&restarted.results), vec!["Jaisalmer Fort"]);
    }
}
