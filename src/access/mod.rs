// Navigation and content gating
use crate::expiry::time_remaining_for;
use crate::models::{Enrollment, EnrollmentStatus, Role, TimeRemaining};
use crate::session::SessionContext;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

pub const LOGIN_PATH: &str = "/login";

/// Who may enter a part of the site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteArea {
    Public,
    SignedIn,
    Admin,
    SuperAdmin,
}

fn path_segments(path: &str) -> Vec<&str> {
    let path = path.split(['?', '#']).next().unwrap_or(path);
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Course id of a gated `/courses/{id}/learn/..` path
pub fn course_for_path(path: &str) -> Option<&str> {
    match path_segments(path).as_slice() {
        ["courses", id, "learn", ..] => Some(*id),
        _ => None,
    }
}

impl RouteArea {
    /// Classify a navigation target by path prefix
    pub fn for_path(path: &str) -> Self {
        match path_segments(path).as_slice() {
            ["super-admin", ..] => RouteArea::SuperAdmin,
            ["admin", ..] => RouteArea::Admin,
            ["dashboard", ..] => RouteArea::SignedIn,
            ["courses", _, "learn", ..] => RouteArea::SignedIn,
            _ => RouteArea::Public,
        }
    }

    pub fn permits(&self, role: Role) -> bool {
        match self {
            RouteArea::Public | RouteArea::SignedIn => true,
            RouteArea::Admin => role.is_staff(),
            RouteArea::SuperAdmin => role == Role::SuperAdmin,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum AccessDecision {
    Allow,
    Redirect { to: String },
}

impl AccessDecision {
    fn redirect(to: &str) -> Self {
        AccessDecision::Redirect { to: to.to_string() }
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, AccessDecision::Allow)
    }
}

/// Decide a navigation once at the boundary.
///
/// Stale claims are sent back through login so the role is re-read before any
/// role-restricted page is shown.
pub fn authorize(
    session: Option<&SessionContext>,
    path: &str,
    now: DateTime<Utc>,
    claims_max_age: Duration,
) -> AccessDecision {
    let area = RouteArea::for_path(path);
    if area == RouteArea::Public {
        return AccessDecision::Allow;
    }

    let Some(session) = session else {
        tracing::debug!("No session for {}, redirecting to login", path);
        return AccessDecision::redirect(LOGIN_PATH);
    };

    if !session.claims_are_fresh(now, claims_max_age) {
        tracing::debug!(
            "Claims for {} are stale (age {}m), redirecting to login",
            session.user.uid,
            session.claims.age(now).num_minutes()
        );
        return AccessDecision::redirect(LOGIN_PATH);
    }

    let role = session.role();
    if area.permits(role) {
        AccessDecision::Allow
    } else {
        tracing::debug!("Role {} may not enter {}, redirecting home", role, path);
        AccessDecision::redirect(role.home_path())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialReason {
    /// The access window has closed
    Expired,
    /// The enrollment was cancelled
    Cancelled,
    /// Backend marked the enrollment as expired
    StatusExpired,
    /// Start or expiry is missing or inconsistent
    InvalidWindow,
    /// No enrollment for the course
    NotEnrolled,
    /// The enrollment belongs to a different course
    CourseMismatch,
}

impl DenialReason {
    pub fn as_str(&self) -> &str {
        match self {
            DenialReason::Expired => "access window has ended",
            DenialReason::Cancelled => "enrollment was cancelled",
            DenialReason::StatusExpired => "enrollment is marked expired",
            DenialReason::InvalidWindow => "enrollment has no valid access window",
            DenialReason::NotEnrolled => "not enrolled in this course",
            DenialReason::CourseMismatch => "enrollment is for a different course",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "access", rename_all = "snake_case")]
pub enum ContentAccess {
    Granted { remaining: Option<TimeRemaining> },
    Denied { reason: DenialReason },
}

impl ContentAccess {
    pub fn is_granted(&self) -> bool {
        matches!(self, ContentAccess::Granted { .. })
    }
}

/// Whether a student's enrollment currently opens the gated course content
pub fn can_view_content(enrollment: &Enrollment, now: DateTime<Utc>) -> ContentAccess {
    match enrollment.status {
        EnrollmentStatus::Cancelled => {
            return ContentAccess::Denied {
                reason: DenialReason::Cancelled,
            }
        }
        EnrollmentStatus::Expired => {
            return ContentAccess::Denied {
                reason: DenialReason::StatusExpired,
            }
        }
        EnrollmentStatus::Active | EnrollmentStatus::Completed => {}
    }

    let valid_window = matches!(
        (enrollment.start_date, enrollment.expires_at),
        (Some(start), Some(expires)) if expires > start
    );
    if !valid_window {
        return ContentAccess::Denied {
            reason: DenialReason::InvalidWindow,
        };
    }

    let remaining = time_remaining_for(enrollment, now);
    if remaining.expired {
        ContentAccess::Denied {
            reason: DenialReason::Expired,
        }
    } else {
        ContentAccess::Granted {
            remaining: Some(remaining),
        }
    }
}

/// Course gate for the signed-in user on `course_id`. Staff see every course.
///
/// A student's enrollment only opens the course it names.
pub fn can_view_course(
    session: &SessionContext,
    course_id: &str,
    enrollment: Option<&Enrollment>,
    now: DateTime<Utc>,
) -> ContentAccess {
    if session.role().is_staff() {
        return ContentAccess::Granted { remaining: None };
    }

    let Some(enrollment) = enrollment else {
        return ContentAccess::Denied {
            reason: DenialReason::NotEnrolled,
        };
    };

    if enrollment.course_id.as_deref() != Some(course_id) {
        tracing::debug!(
            "Enrollment for {} does not open course {}",
            enrollment.course_label(),
            course_id
        );
        return ContentAccess::Denied {
            reason: DenialReason::CourseMismatch,
        };
    }

    can_view_content(enrollment, now)
}
