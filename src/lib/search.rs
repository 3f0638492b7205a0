use super::*;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::thread::{sleep, spawn, JoinHandle};
use std::time::{Duration, Instant};

/// Quiet period after the last edit before a search actually runs.
pub const DEBOUNCE: Duration = Duration::from_millis(400);
/// Pause between the per-keyword nearby-place queries.
pub const KEYWORD_PAUSE: Duration = Duration::from_millis(150);

/// What the user has typed and picked right now.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchInput {
    pub query: String,
    pub category: Option<Category>,
}

impl SearchInput {
    pub fn new(query: impl Into<String>, category: Option<Category>) -> Self {
        Self {
            query: query.into(),
            category,
        }
    }

    /// Classify the input into the search that has to run for it.
    pub fn plan(&self) -> SearchPlan {
        let query = self.query.trim();
        match (query.chars().count(), self.category) {
            (0, None) => SearchPlan::Browse,
            (0, Some(category)) => SearchPlan::CategoryOnly(category),
            (n, _) if n < MIN_QUERY_LEN => SearchPlan::TooShort,
            (_, None) => SearchPlan::Place,
            (_, Some(category)) => SearchPlan::PlacePlusPoi(category),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum SearchPlan {
    /// No query, no category: show the whole dataset.
    Browse,
    /// Only a category: filter the dataset locally.
    CategoryOnly(Category),
    /// A query below the minimum length: change nothing, call nobody.
    TooShort,
    /// A query alone: resolve the place remotely.
    Place,
    /// Query plus category: resolve the place, then collect nearby places
    /// for the category's keywords.
    PlacePlusPoi(Category),
}

/// What a dispatched search wants the application to do right away.
#[derive(Debug, PartialEq)]
pub enum Dispatch {
    /// Render these dataset entries now.
    Local(Vec<Location>),
    /// A worker was spawned; results arrive through [`SearchController::drain`].
    Remote,
    /// Deliberately nothing (too-short query).
    NoRender,
}

/// A result message from a search worker, tagged with the generation it
/// belongs to. Stale generations are dropped on the way out of `drain`.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchUpdate {
    /// The anchor place resolved: show it alone and recenter on it.
    Anchor { generation: u64, place: RemotePlace },
    /// The nearby places accumulated so far, anchor included up front.
    Pois {
        generation: u64,
        anchor: RemotePlace,
        places: Vec<RemotePlace>,
    },
}

impl SearchUpdate {
    pub fn generation(&self) -> u64 {
        match self {
            SearchUpdate::Anchor { generation, .. } => *generation,
            SearchUpdate::Pois { generation, .. } => *generation,
        }
    }
}

/// Debounces input edits, runs remote searches on worker threads and makes
/// sure only the newest generation ever reaches the map.
pub struct SearchController {
    geocoder: Arc<dyn Geocoder>,
    /// The one concurrency mechanism: every edit bumps it, every worker
    /// re-reads it before spending a network call.
    latest: Arc<AtomicU64>,
    pending: Option<(SearchInput, Instant)>,
    committed: SearchInput,
    workers: Vec<(u64, JoinHandle<()>)>,
    channel: (Sender<SearchUpdate>, Receiver<SearchUpdate>),
    debounce: Duration,
    keyword_pause: Duration,
}

impl SearchController {
    pub fn new(geocoder: Arc<dyn Geocoder>, debounce: Duration, keyword_pause: Duration) -> Self {
        Self {
            geocoder,
            latest: Arc::new(AtomicU64::new(0)),
            pending: None,
            committed: SearchInput::default(),
            workers: vec![],
            channel: channel(),
            debounce,
            keyword_pause,
        }
    }

    pub fn generation(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }

    /// The input of the last dispatched search.
    pub fn committed(&self) -> &SearchInput {
        &self.committed
    }

    /// Latch an edited input. Advances the generation immediately, so any
    /// in-flight search is already superseded while the debounce runs.
    pub fn edit(&mut self, input: SearchInput, now: Instant) {
        self.latest.fetch_add(1, Ordering::SeqCst);
        self.pending = Some((input, now));
    }

    /// Dispatch the pending search once its quiet period has passed.
    ///
    /// Returns `None` while nothing is due. Local plans come back as a
    /// ready-to-render result; remote plans spawn a worker.
    pub fn poll(&mut self, now: Instant) -> Option<Dispatch> {
        self.reap_workers();

        let due = match &self.pending {
            Some((_, since)) => now.duration_since(*since) >= self.debounce,
            None => false,
        };
        if !due {
            return None;
        }

        let (input, _) = self.pending.take().unwrap();
        let plan = input.plan();
        self.committed = input.clone();
        let generation = self.generation();

        match plan {
            SearchPlan::Browse => Some(Dispatch::Local(LOCATIONS.to_vec())),
            SearchPlan::CategoryOnly(category) => Some(Dispatch::Local(filter_by_category(
                &LOCATIONS,
                Some(category),
            ))),
            SearchPlan::TooShort => Some(Dispatch::NoRender),
            SearchPlan::Place => {
                self.spawn_place_worker(generation, input.query.trim().to_string());
                Some(Dispatch::Remote)
            }
            SearchPlan::PlacePlusPoi(category) => {
                self.spawn_poi_worker(generation, input.query.trim().to_string(), category);
                Some(Dispatch::Remote)
            }
        }
    }

    /// Collect worker results belonging to the current generation. Stale
    /// ones are dropped here, silently.
    pub fn drain(&mut self) -> Vec<SearchUpdate> {
        let latest = self.generation();
        let mut updates = vec![];
        for update in self.channel.1.try_iter() {
            if update.generation() == latest {
                updates.push(update);
            } else {
                log::trace!(
                    "Dropping stale search update for generation {}.",
                    update.generation()
                );
            }
        }
        updates
    }

    /// Whether remote work is still running.
    pub fn is_busy(&self) -> bool {
        self.workers.iter().any(|(_, handle)| !handle.is_finished())
    }

    fn reap_workers(&mut self) {
        let mut i = 0;
        while i < self.workers.len() {
            if self.workers[i].1.is_finished() {
                let (generation, handle) = self.workers.remove(i);
                if let Err(e) = handle.join() {
                    log::error!(
                        "Search worker for generation {} panicked. Reason:\r\n{:?}",
                        generation,
                        e
                    );
                }
            } else {
                i += 1;
            }
        }
    }

    fn spawn_place_worker(&mut self, generation: u64, query: String) {
        // Clone values to be moved into the thread.
        let geocoder = self.geocoder.clone();
        let latest = self.latest.clone();
        let tx = self.channel.0.clone();

        self.workers.push((
            generation,
            spawn(move || {
                if latest.load(Ordering::SeqCst) != generation {
                    return;
                }
                match geocoder.search(&query, None) {
                    Some(places) => {
                        // The first match wins, like picking the top hit.
                        if let Some(place) = places.into_iter().next() {
                            send_update(&tx, SearchUpdate::Anchor { generation, place });
                        }
                    }
                    None => log::debug!("No geocoding result for {:?}.", query),
                }
            }),
        ));
    }

    fn spawn_poi_worker(&mut self, generation: u64, query: String, category: Category) {
        // Clone values to be moved into the thread.
        let geocoder = self.geocoder.clone();
        let latest = self.latest.clone();
        let tx = self.channel.0.clone();
        let pause = self.keyword_pause;

        self.workers.push((
            generation,
            spawn(move || {
                if latest.load(Ordering::SeqCst) != generation {
                    return;
                }

                // Resolve the anchor first and show it provisionally.
                let anchor = match geocoder.search(&query, None) {
                    Some(places) => match places.into_iter().next() {
                        Some(place) => place,
                        None => return,
                    },
                    None => {
                        log::debug!("No geocoding result for {:?}.", query);
                        return;
                    }
                };
                if latest.load(Ordering::SeqCst) != generation {
                    return;
                }
                send_update(
                    &tx,
                    SearchUpdate::Anchor {
                        generation,
                        place: anchor.clone(),
                    },
                );

                // The viewport after the provisional recenter scopes all
                // keyword queries.
                let mut view = MapView::new();
                view.set_view(anchor.position(), FOCUS_ZOOM);
                let viewbox = view.viewport();

                let mut seen = HashSet::new();
                seen.insert(coordinate_key(anchor.lat, anchor.lng));
                let mut found: Vec<RemotePlace> = vec![];

                for keyword in category.keywords() {
                    // A newer search makes the remaining calls pointless.
                    if latest.load(Ordering::SeqCst) != generation {
                        log::debug!(
                            "Search generation {} superseded, stopping the keyword fan-out.",
                            generation
                        );
                        return;
                    }

                    if let Some(places) = geocoder.search(keyword, Some(&viewbox)) {
                        for place in places {
                            if seen.insert(coordinate_key(place.lat, place.lng)) {
                                found.push(place);
                            }
                        }
                        send_update(
                            &tx,
                            SearchUpdate::Pois {
                                generation,
                                anchor: anchor.clone(),
                                places: found.clone(),
                            },
                        );
                    }

                    sleep(pause);
                }
            }),
        ));
    }
}

fn send_update(tx: &Sender<SearchUpdate>, update: SearchUpdate) {
    if tx.send(update).is_err() {
        log::debug!("Could not send the search update. This most likely happened because the app was terminated.")
    }
}
