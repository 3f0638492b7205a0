use super::*;
use serde_derive::Deserialize;

/// Where the device currently is, if that can be determined at all.
pub trait PositionProvider {
    fn current_position(&self) -> Option<LatLng>;
}

/// IP-based geolocation over a JSON endpoint, the native stand-in for the
/// browser geolocation API. Coarse, but needs no permissions or hardware.
pub struct IpLocate {
    endpoint: String,
    user_agent: String,
}

impl IpLocate {
    pub fn new(endpoint: impl Into<String>, user_agent: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            user_agent: user_agent.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct IpLocateResponse {
    lat: f64,
    lon: f64,
}

impl PositionProvider for IpLocate {
    fn current_position(&self) -> Option<LatLng> {
        let response = match ureq::get(&self.endpoint)
            .set("Accept", "application/json")
            .set("User-Agent", &self.user_agent)
            .call()
        {
            Ok(response) => response,
            Err(e) => {
                log::warn!("Geolocation request failed. Reason:\r\n{}", e);
                return None;
            }
        };

        let body = match response.into_string() {
            Ok(body) => body,
            Err(e) => {
                log::warn!("Could not read the geolocation response. Reason:\r\n{}", e);
                return None;
            }
        };

        match serde_json::from_str::<IpLocateResponse>(&body) {
            Ok(position) => Some(LatLng::new(position.lat, position.lon)),
            Err(e) => {
                log::warn!("Malformed geolocation response. Reason:\r\n{}", e);
                None
            }
        }
    }
}
