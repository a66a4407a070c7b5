// Timestamp normalization at the document boundary
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};

/// Timestamp shapes found in exported enrollment documents
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawTimestamp {
    /// Store timestamp wrapper, the value `.toDate()` would be called on
    Wrapper {
        #[serde(alias = "_seconds")]
        seconds: i64,
        #[serde(alias = "_nanoseconds", default)]
        nanoseconds: u32,
    },
    /// Milliseconds since the Unix epoch
    Millis(i64),
    /// RFC 3339 string or a bare `YYYY-MM-DD` date
    Text(String),
}

/// Convert any accepted shape into a single instant.
///
/// Returns `None` for out-of-range or unparseable values; never panics.
pub fn normalize(raw: &RawTimestamp) -> Option<DateTime<Utc>> {
    match raw {
        RawTimestamp::Wrapper {
            seconds,
            nanoseconds,
        } => DateTime::from_timestamp(*seconds, *nanoseconds),
        RawTimestamp::Millis(ms) => DateTime::from_timestamp_millis(*ms),
        RawTimestamp::Text(text) => parse_text(text),
    }
}

fn parse_text(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Serde helper for optional timestamp fields.
///
/// Anything that is missing, null, or not a recognizable timestamp becomes `None`
/// instead of failing the whole document.
pub fn deserialize_lenient<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    let Some(value) = value else {
        return Ok(None);
    };

    let normalized = serde_json::from_value::<RawTimestamp>(value.clone())
        .ok()
        .and_then(|raw| normalize(&raw));

    if normalized.is_none() && !value.is_null() {
        tracing::debug!("Ignoring unparseable timestamp value: {}", value);
    }

    Ok(normalized)
}
