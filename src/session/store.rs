use super::SessionContext;
use crate::error::{AccessError, Result};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};

const SESSION_FILE: &str = "session.json";

/// Persists the signed-in session between CLI invocations
pub struct SessionStore {
    cache_dir: PathBuf,
}

impl SessionStore {
    /// Open the store in `cache_dir`, creating the directory if needed
    pub fn new(cache_dir: impl Into<PathBuf>) -> Result<Self> {
        let cache_dir = cache_dir.into();

        if !cache_dir.exists() {
            fs::create_dir_all(&cache_dir).map_err(|e| {
                AccessError::CacheError(format!(
                    "Failed to create cache directory {}: {}",
                    cache_dir.display(),
                    e
                ))
            })?;
        }

        Ok(Self { cache_dir })
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    fn session_file_path(&self) -> PathBuf {
        self.cache_dir.join(SESSION_FILE)
    }

    /// Load the stored session. Expired claims count as no session.
    pub fn load(&self, now: DateTime<Utc>) -> Result<Option<SessionContext>> {
        let path = self.session_file_path();

        if !path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&path)
            .map_err(|e| AccessError::CacheError(format!("Failed to read session file: {}", e)))?;

        let session: SessionContext = serde_json::from_str(&contents)?;

        if session.claims.is_expired(now) {
            tracing::debug!(
                "Stored session {} has expired claims, ignoring",
                session.session_id
            );
            return Ok(None);
        }

        Ok(Some(session))
    }

    pub fn save(&self, session: &SessionContext) -> Result<()> {
        let json = serde_json::to_string_pretty(session)?;

        fs::write(self.session_file_path(), json)
            .map_err(|e| AccessError::CacheError(format!("Failed to write session file: {}", e)))?;

        Ok(())
    }

    /// Remove the stored session (sign-out)
    pub fn remove(&self) -> Result<()> {
        let path = self.session_file_path();

        if path.exists() {
            fs::remove_file(&path).map_err(|e| {
                AccessError::CacheError(format!("Failed to remove session file: {}", e))
            })?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use crate::session::{Claims, UserIdentity};
    use chrono::{Duration, TimeZone};
    use tempfile::TempDir;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 2, 1, 12, 0, 0).unwrap()
    }

    fn session(role: Role) -> SessionContext {
        SessionContext::start(
            UserIdentity {
                uid: "uid_7".to_string(),
                email: "instructor@example.com".to_string(),
                display_name: Some("Dr. Newton".to_string()),
            },
            Claims::issue(role, now(), Duration::hours(1)).unwrap(),
            now(),
        )
    }

    #[test]
    fn test_save_load_remove() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path()).unwrap();

        assert!(store.load(now()).unwrap().is_none());

        let original = session(Role::Admin);
        store.save(&original).unwrap();
        let loaded = store.load(now() + Duration::minutes(5)).unwrap().unwrap();
        assert_eq!(loaded, original);

        store.remove().unwrap();
        assert!(store.load(now()).unwrap().is_none());
        // Removing twice is fine
        store.remove().unwrap();
    }

    #[test]
    fn test_expired_claims_are_not_loaded() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path()).unwrap();
        store.save(&session(Role::Student)).unwrap();

        assert!(store.load(now() + Duration::hours(2)).unwrap().is_none());
    }

    #[test]
    fn test_creates_missing_directory() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");
        let store = SessionStore::new(&nested).unwrap();
        assert!(nested.exists());
        assert_eq!(store.cache_dir(), nested.as_path());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path()).unwrap();
        fs::write(dir.path().join(SESSION_FILE), "{not json").unwrap();

        assert!(matches!(store.load(now()), Err(AccessError::Json(_))));
    }
}
