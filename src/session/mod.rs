// Signed-in session context
mod store;

pub use store::SessionStore;

use crate::error::{AccessError, Result};
use crate::models::Role;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who is signed in
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserIdentity {
    pub uid: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl UserIdentity {
    pub fn display(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.email)
    }
}

/// Role assertions embedded in the auth token
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub role: Role,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Claims {
    /// Fails when `ttl` is not positive or pushes the expiry out of range
    pub fn issue(role: Role, now: DateTime<Utc>, ttl: Duration) -> Result<Self> {
        if ttl <= Duration::zero() {
            return Err(AccessError::InvalidInput(
                "claims lifetime must be positive".to_string(),
            ));
        }

        let expires_at = now.checked_add_signed(ttl).ok_or_else(|| {
            AccessError::InvalidInput(format!(
                "claims lifetime of {} minutes is out of range",
                ttl.num_minutes()
            ))
        })?;

        Ok(Self {
            role,
            issued_at: now,
            expires_at,
        })
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        now - self.issued_at
    }

    /// Claims may be stale between token refreshes; older than `max_age` means
    /// role decisions should wait for a refresh. Claims issued in the future are stale too.
    pub fn is_fresh(&self, now: DateTime<Utc>, max_age: Duration) -> bool {
        let age = self.age(now);
        !self.is_expired(now) && age >= Duration::zero() && age < max_age
    }
}

/// Identity passed explicitly to whatever needs it.
///
/// Created at sign-in with [`SessionContext::start`] and torn down at sign-out with
/// [`SessionContext::end`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionContext {
    pub session_id: Uuid,
    pub user: UserIdentity,
    pub claims: Claims,
    pub started_at: DateTime<Utc>,
}

impl SessionContext {
    pub fn start(user: UserIdentity, claims: Claims, now: DateTime<Utc>) -> Self {
        let session = Self {
            session_id: Uuid::new_v4(),
            user,
            claims,
            started_at: now,
        };
        tracing::info!(
            "Session {} started for {} as {}",
            session.session_id,
            session.user.uid,
            session.claims.role
        );
        session
    }

    pub fn role(&self) -> Role {
        self.claims.role
    }

    pub fn claims_are_fresh(&self, now: DateTime<Utc>, max_age: Duration) -> bool {
        self.claims.is_fresh(now, max_age)
    }

    /// Replace claims after a token refresh; the session itself continues.
    pub fn refresh_claims(&mut self, claims: Claims) {
        if claims.role != self.claims.role {
            tracing::info!(
                "Role for {} changed from {} to {}",
                self.user.uid,
                self.claims.role,
                claims.role
            );
        }
        self.claims = claims;
    }

    /// Sign out, consuming the context
    pub fn end(self) -> Uuid {
        tracing::info!("Session {} ended for {}", self.session_id, self.user.uid);
        self.session_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 2, 1, 12, 0, 0).unwrap()
    }

    fn user() -> UserIdentity {
        UserIdentity {
            uid: "uid_1".to_string(),
            email: "student@example.com".to_string(),
            display_name: None,
        }
    }

    #[test]
    fn test_claims_freshness() {
        let claims = Claims::issue(Role::Student, now(), Duration::hours(1)).unwrap();
        let max_age = Duration::minutes(30);

        assert!(claims.is_fresh(now(), max_age));
        assert!(claims.is_fresh(now() + Duration::minutes(29), max_age));
        assert!(!claims.is_fresh(now() + Duration::minutes(30), max_age));
        assert!(!claims.is_fresh(now() + Duration::hours(2), Duration::hours(5)));
        assert!(claims.is_expired(now() + Duration::hours(1)));
    }

    #[test]
    fn test_claims_from_the_future_are_stale() {
        let issued = now() + Duration::minutes(5);
        let claims = Claims::issue(Role::Admin, issued, Duration::hours(1)).unwrap();
        assert!(claims.age(now()) < Duration::zero());
        assert!(!claims.is_fresh(now(), Duration::minutes(30)));
        assert!(claims.is_fresh(issued, Duration::minutes(30)));
    }

    #[test]
    fn test_issue_rejects_bad_lifetimes() {
        assert!(matches!(
            Claims::issue(Role::Student, now(), Duration::zero()),
            Err(AccessError::InvalidInput(_))
        ));
        assert!(matches!(
            Claims::issue(Role::Student, now(), Duration::minutes(-5)),
            Err(AccessError::InvalidInput(_))
        ));
        assert!(matches!(
            Claims::issue(Role::Student, now(), Duration::minutes(1_000_000_000_000)),
            Err(AccessError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_session_lifecycle() {
        let claims = Claims::issue(Role::Student, now(), Duration::hours(1)).unwrap();
        let mut session = SessionContext::start(user(), claims, now());
        assert_eq!(session.role(), Role::Student);
        assert_eq!(session.started_at, now());

        let later = now() + Duration::minutes(45);
        assert!(!session.claims_are_fresh(later, Duration::minutes(30)));

        session.refresh_claims(Claims::issue(Role::Admin, later, Duration::hours(1)).unwrap());
        assert!(session.claims_are_fresh(later, Duration::minutes(30)));
        assert_eq!(session.role(), Role::Admin);

        let id = session.session_id;
        assert_eq!(session.end(), id);
    }

    #[test]
    fn test_sessions_get_distinct_ids() {
        let claims = Claims::issue(Role::Student, now(), Duration::hours(1)).unwrap();
        let a = SessionContext::start(user(), claims.clone(), now());
        let b = SessionContext::start(user(), claims, now());
        assert_ne!(a.session_id, b.session_id);
    }

    #[test]
    fn test_display_prefers_name() {
        let mut identity = user();
        assert_eq!(identity.display(), "student@example.com");
        identity.display_name = Some("Ada".to_string());
        assert_eq!(identity.display(), "Ada");
    }
}
