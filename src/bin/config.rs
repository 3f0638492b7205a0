use once_cell::sync::Lazy;
use serde_derive::Deserialize;

pub static CONFIG: Lazy<Config> = Lazy::new(|| Config::new().expect("Config could not be loaded."));

#[derive(Debug, Deserialize)]
pub struct General {
    pub log_level: log::Level,
}

#[derive(Debug, Deserialize)]
pub struct Geocoder {
    pub endpoint: String,
    pub user_agent: String,
}

#[derive(Debug, Deserialize)]
pub struct Locate {
    pub endpoint: String,
}

#[derive(Debug, Deserialize)]
pub struct Search {
    pub debounce_ms: u64,
    pub keyword_pause_ms: u64,
}

#[derive(Debug, Deserialize)]
pub struct Session {
    pub file: String,
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub general: General,
    pub geocoder: Geocoder,
    pub locate: Locate,
    pub search: Search,
    pub session: Session,
}

impl Config {
    pub fn new() -> Result<Self, config::ConfigError> {
        let mut s = config::Config::new();

        // Start off by merging in the "default" configuration file
        s.merge(config::File::with_name("config/default"))?;

        // Add in a local configuration file
        // This file shouldn't be checked in to git
        s.merge(config::File::with_name("config/local").required(false))?;

        // You can deserialize (and thus freeze) the entire configuration as
        s.try_into()
    }
}
