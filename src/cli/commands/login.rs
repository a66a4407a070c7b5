use super::open_store;
use chrono::{DateTime, Duration, Utc};
use pfa_access::clock::{Clock, SystemClock};
use pfa_access::config::Config;
use pfa_access::error::{AccessError, Result};
use pfa_access::models::Role;
use pfa_access::session::{Claims, SessionContext, SessionStore, UserIdentity};

pub fn execute(
    uid: String,
    email: String,
    role: Role,
    name: Option<String>,
    ttl_minutes: i64,
) -> Result<()> {
    let ttl = claims_ttl(ttl_minutes)?;

    let config = Config::load()?;
    let store = open_store(&config)?;

    let user = UserIdentity {
        uid,
        email,
        display_name: name,
    };
    let session = sign_in(&store, user, role, ttl, SystemClock.now())?;

    println!("✓ Signed in as {} ({})", session.user.display(), session.role());
    println!("  Claims expire in {} minutes", ttl_minutes);

    Ok(())
}

fn claims_ttl(minutes: i64) -> Result<Duration> {
    if minutes <= 0 {
        return Err(AccessError::InvalidInput(
            "--ttl-minutes must be positive".to_string(),
        ));
    }

    Duration::try_minutes(minutes).ok_or_else(|| {
        AccessError::InvalidInput(format!("--ttl-minutes {} is out of range", minutes))
    })
}

/// Replace whatever session is stored with a new one
fn sign_in(
    store: &SessionStore,
    user: UserIdentity,
    role: Role,
    ttl: Duration,
    now: DateTime<Utc>,
) -> Result<SessionContext> {
    // Only one session at a time
    match store.load(now) {
        Ok(Some(previous)) => {
            previous.end();
        }
        Ok(None) => {}
        Err(e) => tracing::warn!("Replacing unreadable session file: {}", e),
    }

    let session = SessionContext::start(user, Claims::issue(role, now, ttl)?, now);
    store.save(&session)?;

    Ok(session)
}
