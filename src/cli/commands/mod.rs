// CLI command implementations
pub mod completions;
pub mod config;
pub mod course;
pub mod gate;
pub mod login;
pub mod logout;
pub mod status;
pub mod watch;
pub mod whoami;

use pfa_access::config::Config;
use pfa_access::error::{AccessError, Result};
use pfa_access::models::Enrollment;
use pfa_access::session::SessionStore;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = fs::read_to_string(path).map_err(|e| {
        AccessError::InvalidInput(format!("Failed to read {}: {}", path.display(), e))
    })?;
    Ok(serde_json::from_str(&contents)?)
}

pub(crate) fn read_enrollment(path: &Path) -> Result<Enrollment> {
    read_json(path)
}

pub(crate) fn open_store(config: &Config) -> Result<SessionStore> {
    SessionStore::new(config.cache_dir()?)
}
