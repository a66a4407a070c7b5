use super::open_store;
use chrono::{DateTime, Utc};
use pfa_access::clock::{Clock, SystemClock};
use pfa_access::config::Config;
use pfa_access::error::Result;
use pfa_access::session::SessionStore;

pub fn execute() -> Result<()> {
    let config = Config::load()?;
    let store = open_store(&config)?;

    match sign_out(&store, SystemClock.now())? {
        Some(uid) => println!("✓ Signed out {}", uid),
        None => println!("No active session"),
    }

    Ok(())
}

/// Clear the stored session, readable or not. Returns the uid that was signed in.
fn sign_out(store: &SessionStore, now: DateTime<Utc>) -> Result<Option<String>> {
    let session = match store.load(now) {
        Ok(session) => session,
        Err(e) => {
            tracing::warn!("Discarding unreadable session file: {}", e);
            None
        }
    };

    // Expired and unreadable leftovers go too
    store.remove()?;

    Ok(session.map(|session| {
        let uid = session.user.uid.clone();
        session.end();
        uid
    }))
}
