use super::*;
use serde_derive::Deserialize;

/// Queries below this length are never sent to the geocoding service.
pub const MIN_QUERY_LEN: usize = 3;
/// Maximum number of results requested per query.
pub const RESULT_LIMIT: u32 = 10;

/// A place resolved by the geocoding service. Lives for one search cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct RemotePlace {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub kind: String,
    pub class: String,
}

impl RemotePlace {
    pub fn position(&self) -> LatLng {
        LatLng::new(self.lat, self.lng)
    }
}

/// The raw response entry. Coordinates arrive as strings.
#[derive(Debug, Deserialize)]
struct SearchEntry {
    display_name: String,
    lat: String,
    lon: String,
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    class: String,
}

/// Resolves a free-text query, optionally restricted to a bounding box.
///
/// `None` stands for "no results" and for any failure alike; callers must
/// not distinguish the two.
pub trait Geocoder: Send + Sync {
    fn search(&self, query: &str, viewbox: Option<&BoundingBox>) -> Option<Vec<RemotePlace>>;
}

/// The Nominatim HTTP client.
pub struct Nominatim {
    endpoint: String,
    user_agent: String,
}

impl Nominatim {
    pub fn new(endpoint: impl Into<String>, user_agent: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            user_agent: user_agent.into(),
        }
    }
}

impl Geocoder for Nominatim {
    fn search(&self, query: &str, viewbox: Option<&BoundingBox>) -> Option<Vec<RemotePlace>> {
        // The orchestrator already enforces this; re-check so no caller can
        // waste a call on a one-letter query.
        if query.chars().count() < MIN_QUERY_LEN {
            return None;
        }

        let mut request = ureq::get(&format!("{}/search", self.endpoint))
            .query("format", "json")
            .query("limit", &RESULT_LIMIT.to_string())
            .query("q", query)
            .query("extratags", "1")
            .set("Accept", "application/json")
            .set("User-Agent", &self.user_agent);
        if let Some(viewbox) = viewbox {
            request = request
                .query("viewbox", &viewbox.viewbox_param())
                .query("bounded", "1");
        }

        match request.call() {
            Ok(response) => match response.into_string() {
                Ok(body) => parse_search_response(&body),
                Err(e) => {
                    log::warn!(
                        "Could not read the geocoding response for {:?}. Reason:\r\n{}",
                        query,
                        e
                    );
                    None
                }
            },
            Err(e) => {
                log::warn!("Geocoding request for {:?} failed. Reason:\r\n{}", query, e);
                None
            }
        }
    }
}

fn parse_search_response(body: &str) -> Option<Vec<RemotePlace>> {
    let entries: Vec<SearchEntry> = match serde_json::from_str(body) {
        Ok(entries) => entries,
        Err(e) => {
            log::warn!("Malformed geocoding response. Reason:\r\n{}", e);
            return None;
        }
    };

    let places: Vec<RemotePlace> = entries
        .into_iter()
        .filter_map(|entry| {
            let lat = entry.lat.parse().ok()?;
            let lng = entry.lon.parse().ok()?;
            Some(RemotePlace {
                name: entry.display_name,
                lat,
                lng,
                kind: entry.kind,
                class: entry.class,
            })
        })
        .collect();

    if places.is_empty() {
        None
    } else {
        Some(places)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_string_encoded_coordinates() {
        let body = r#"[
            {
                "display_name": "Taj Mahal, Agra, Uttar Pradesh, India",
                "lat": "27.1751448",
                "lon": "78.0421422",
                "type": "attraction",
                "class": "tourism"
            },
            {
                "display_name": "Taj Mahal Palace, Mumbai, India",
                "lat": "18.9217",
                "lon": "72.8330",
                "type": "hotel",
                "class": "tourism"
            }
        ]"#;
        let places = parse_search_response(body).unwrap();
        assert_eq!(places.len(), 2);
        assert_eq!(places[0].name, "Taj Mahal, Agra, Uttar Pradesh, India");
        assert!((places[0].lat - 27.1751448).abs() < 1e-9);
        assert_eq!(places[0].kind, "attraction");
        assert_eq!(places[0].class, "tourism");
    }

    #[test]
    fn empty_and_malformed_responses_look_the_same() {
        assert_eq!(parse_search_response("[]"), None);
        assert_eq!(parse_search_response("<html>rate limited</html>"), None);
        // Unparseable coordinates drop the entry rather than failing the lot.
        let body = r#"[{"display_name": "x", "lat": "abc", "lon": "1.0"}]"#;
        assert_eq!(parse_search_response(body), None);
    }

    #[test]
    fn short_queries_are_never_sent() {
        // The unroutable endpoint would make any actual request fail loudly.
        let client = Nominatim::new("http://127.0.0.1:0", "waypoints-test");
        assert_eq!(client.search("ta", None), None);
    }
}
