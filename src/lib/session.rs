use super::*;
use serde_derive::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// The last committed search, written on every commit and restored at
/// startup. One small JSON file, the native cousin of a localStorage key.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Session {
    pub query: String,
    #[serde(default)]
    pub category: Option<Category>,
}

/// Read the stored session. A missing or unreadable file and a file with
/// garbage in it all come back as `None`; garbage is logged, not fatal.
pub fn load_session(path: impl AsRef<Path>) -> Option<Session> {
    let path = path.as_ref();
    if !path.exists() {
        return None;
    }

    match fs::read_to_string(path) {
        Ok(raw) => match serde_json::from_str(&raw) {
            Ok(session) => Some(session),
            Err(e) => {
                log::warn!(
                    "Ignoring malformed session file {}. Reason:\r\n{}",
                    path.display(),
                    e
                );
                None
            }
        },
        Err(e) => {
            log::warn!(
                "Unable to read session file {}. Reason:\r\n{}",
                path.display(),
                e
            );
            None
        }
    }
}

/// Write the session. Failure only costs the next restore, so it is logged
/// and swallowed.
pub fn store_session(path: impl AsRef<Path>, session: &Session) {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            if let Err(e) = fs::create_dir_all(parent) {
                log::warn!(
                    "Could not create session directory {}. Reason:\r\n{}",
                    parent.display(),
                    e
                );
                return;
            }
        }
    }

    match serde_json::to_string(session) {
        Ok(raw) => {
            if let Err(e) = fs::write(path, raw) {
                log::warn!(
                    "Unable to write session file {}. Reason:\r\n{}",
                    path.display(),
                    e
                );
            }
        }
        Err(e) => {
            log::error!("Could not serialize the session. Reason:\r\n{}", e);
        }
    }
}
