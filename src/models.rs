use crate::timestamp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of an enrollment, maintained by backend rules
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum EnrollmentStatus {
    Active,
    Completed,
    Expired,
    Cancelled,
}

impl EnrollmentStatus {
    pub fn as_str(&self) -> &str {
        match self {
            EnrollmentStatus::Active => "active",
            EnrollmentStatus::Completed => "completed",
            EnrollmentStatus::Expired => "expired",
            EnrollmentStatus::Cancelled => "cancelled",
        }
    }
}

/// Per-lesson progress entry, display only
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LessonProgress {
    pub lesson_id: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(
        default,
        deserialize_with = "timestamp::deserialize_lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub completed_at: Option<DateTime<Utc>>,
}

/// Enrollment document linking a student to a course for a bounded access window.
///
/// Timestamps are normalized on deserialization; a missing or unparseable field is `None`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_id: Option<String>,

    #[serde(default, deserialize_with = "timestamp::deserialize_lenient")]
    pub start_date: Option<DateTime<Utc>>,

    #[serde(default, deserialize_with = "timestamp::deserialize_lenient")]
    pub expires_at: Option<DateTime<Utc>>,

    pub status: EnrollmentStatus,

    /// Purchased duration tier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_months: Option<u32>,

    #[serde(default)]
    pub overall_progress: f64,

    #[serde(default)]
    pub progress: Vec<LessonProgress>,
}

impl Enrollment {
    pub fn course_label(&self) -> &str {
        self.course_id.as_deref().unwrap_or("unknown course")
    }

    pub fn completed_lessons(&self) -> usize {
        self.progress.iter().filter(|p| p.completed).count()
    }
}

/// Remaining time in an enrollment's access window
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct TimeRemaining {
    pub days: i64,
    pub hours: i64,
    pub expired: bool,
    /// Remaining share of the window, 100 at start and 0 at expiry
    pub percentage: f64,
}

impl TimeRemaining {
    pub const EXPIRED: TimeRemaining = TimeRemaining {
        days: 0,
        hours: 0,
        expired: true,
        percentage: 0.0,
    };
}

/// Presentation urgency derived from a `TimeRemaining`
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UrgencyTier {
    Normal,
    Warning,
    Alarmed,
}

impl UrgencyTier {
    pub fn as_str(&self) -> &str {
        match self {
            UrgencyTier::Normal => "NORMAL",
            UrgencyTier::Warning => "WARNING",
            UrgencyTier::Alarmed => "ALARMED",
        }
    }
}

/// Account role carried in auth claims
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Student,
    /// Instructor
    Admin,
    SuperAdmin,
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Role::Student => "student",
            Role::Admin => "admin",
            Role::SuperAdmin => "super_admin",
        }
    }

    /// Instructors and super admins manage content and skip enrollment checks
    pub fn is_staff(&self) -> bool {
        matches!(self, Role::Admin | Role::SuperAdmin)
    }

    /// Landing page for this role
    pub fn home_path(&self) -> &'static str {
        match self {
            Role::Student => "/dashboard",
            Role::Admin => "/admin",
            Role::SuperAdmin => "/super-admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
