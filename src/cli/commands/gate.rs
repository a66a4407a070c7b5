use super::{open_store, read_enrollment};
use chrono::{DateTime, Utc};
use pfa_access::access::{
    authorize, can_view_course, course_for_path, AccessDecision, ContentAccess,
};
use pfa_access::clock::{Clock, SystemClock};
use pfa_access::config::Config;
use pfa_access::error::Result;
use pfa_access::models::Enrollment;
use pfa_access::session::SessionContext;
use serde_json::json;
use std::path::Path;

pub fn execute(path: &str, enrollment: Option<&Path>, json: bool) -> Result<()> {
    let config = Config::load()?;
    let store = open_store(&config)?;
    let now = SystemClock.now();

    let session = store.load(now)?;
    let decision = authorize(session.as_ref(), path, now, config.claims_max_age()?);

    let enrollment = enrollment.map(read_enrollment).transpose()?;
    let content = content_gate(session.as_ref(), path, enrollment.as_ref(), now);

    let allowed = decision.is_allowed() && content.map_or(true, |c| c.is_granted());

    if json {
        let output = json!({
            "path": path,
            "route": decision,
            "content": content,
            "allowed": allowed,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        match &decision {
            AccessDecision::Allow => println!("✓ {} allowed", path),
            AccessDecision::Redirect { to } => println!("✗ {} redirects to {}", path, to),
        }
        if let Some(ContentAccess::Denied { reason }) = content {
            println!("✗ Course content locked: {}", reason.as_str());
        }
    }

    if !allowed {
        std::process::exit(1);
    }

    Ok(())
}

/// Content gate for course learn paths; other paths have no content check
fn content_gate(
    session: Option<&SessionContext>,
    path: &str,
    enrollment: Option<&Enrollment>,
    now: DateTime<Utc>,
) -> Option<ContentAccess> {
    let Some(course_id) = course_for_path(path) else {
        if enrollment.is_some() {
            tracing::debug!("{} is not a course content path, ignoring enrollment", path);
        }
        return None;
    };

    session.map(|session| can_view_course(session, course_id, enrollment, now))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use pfa_access::access::DenialReason;
    use pfa_access::models::{EnrollmentStatus, Role};
    use pfa_access::session::{Claims, UserIdentity};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap()
    }

    fn student() -> SessionContext {
        SessionContext::start(
            UserIdentity {
                uid: "uid_1".to_string(),
                email: "student@example.com".to_string(),
                display_name: None,
            },
            Claims::issue(Role::Student, now(), Duration::hours(1)).unwrap(),
            now(),
        )
    }

    fn optics() -> Enrollment {
        serde_json::from_value(json!({
            "courseId": "optics",
            "startDate": "2025-02-01T00:00:00Z",
            "expiresAt": "2025-05-01T00:00:00Z",
            "status": "active",
        }))
        .unwrap()
    }

    #[test]
    fn test_content_gate_only_on_learn_paths() {
        let session = student();
        let enrollment = optics();

        assert_eq!(
            content_gate(Some(&session), "/dashboard", Some(&enrollment), now()),
            None
        );
        assert_eq!(
            content_gate(Some(&session), "/courses/optics", Some(&enrollment), now()),
            None
        );
        assert!(content_gate(
            Some(&session),
            "/courses/optics/learn/l1",
            Some(&enrollment),
            now()
        )
        .unwrap()
        .is_granted());
    }

    #[test]
    fn test_content_gate_checks_course_in_path() {
        let session = student();
        let enrollment = optics();

        assert_eq!(
            content_gate(
                Some(&session),
                "/courses/mechanics-101/learn/l1",
                Some(&enrollment),
                now()
            ),
            Some(ContentAccess::Denied {
                reason: DenialReason::CourseMismatch
            })
        );
        assert_eq!(
            content_gate(Some(&session), "/courses/optics/learn/l1", None, now()),
            Some(ContentAccess::Denied {
                reason: DenialReason::NotEnrolled
            })
        );
        // Anonymous visitors are handled by the route gate
        assert_eq!(
            content_gate(None, "/courses/optics/learn/l1", Some(&enrollment), now()),
            None
        );
    }
}
