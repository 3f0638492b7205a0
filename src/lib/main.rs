mod app_state;
mod filter;
mod geocode;
mod geolocate;
mod location;
mod map;
mod marker;
mod math;
mod search;
mod session;

pub use app_state::*;
pub use filter::*;
pub use geocode::*;
pub use geolocate::*;
pub use location::*;
pub use map::*;
pub use marker::*;
pub use math::*;
pub use search::*;
pub use session::*;
