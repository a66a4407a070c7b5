use super::open_store;
use pfa_access::clock::{Clock, SystemClock};
use pfa_access::config::Config;
use pfa_access::error::{AccessError, Result};
use serde_json::json;

pub fn execute(json: bool) -> Result<()> {
    let config = Config::load()?;
    let store = open_store(&config)?;
    let now = SystemClock.now();

    let session = store.load(now)?.ok_or(AccessError::NoSessionFound)?;
    let fresh = session.claims_are_fresh(now, config.claims_max_age()?);
    let expires_in = (session.claims.expires_at - now).num_minutes();

    if json {
        let output = json!({
            "session_id": session.session_id,
            "user": session.user,
            "role": session.role(),
            "claims_fresh": fresh,
            "claims_expire_in_minutes": expires_in,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("User:     {} <{}>", session.user.display(), session.user.email);
        println!("Uid:      {}", session.user.uid);
        println!("Role:     {}", session.role());
        println!(
            "Claims:   {} (expire in {} minutes)",
            if fresh { "fresh" } else { "stale, refresh required" },
            expires_in
        );
    }

    Ok(())
}
