//! Lenient decoding for values read back from the document store.
//!
//! Stored documents are written by more than one client and are not
//! schema-checked, so a numeric field may arrive as a number, a numeric
//! string, garbage, or not at all. `Reading` keeps that distinction explicit
//! instead of collapsing every failure into `NaN`:
//!
//! - `Valid(v)`: a finite number, or a string that parses to one
//! - `Invalid(raw)`: present but unusable; `raw` keeps what was stored
//! - `Missing`: absent or `null`
//!
//! Aggregation code decides per statistic which of these it counts.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// A numeric field as it was found in a stored document.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Reading {
    /// A finite number.
    Valid(f64),
    /// Present but not a finite number. Holds the stored text for diagnostics.
    Invalid(String),
    /// Absent or `null`.
    #[default]
    Missing,
}

impl Reading {
    /// Parse form or document text.
    ///
    /// Leading and trailing whitespace is ignored. Empty text is `Missing`.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self::Missing;
        }
        match trimmed.parse::<f64>() {
            Ok(v) if v.is_finite() => Self::Valid(v),
            _ => Self::Invalid(trimmed.to_string()),
        }
    }

    /// Classify an arbitrary JSON value.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => Self::Missing,
            Value::Number(n) => match n.as_f64() {
                Some(v) if v.is_finite() => Self::Valid(v),
                _ => Self::Invalid(n.to_string()),
            },
            Value::String(s) => Self::parse(s),
            other => Self::Invalid(other.to_string()),
        }
    }

    /// The value if it is a finite number.
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Valid(v) => Some(*v),
            _ => None,
        }
    }

    /// The value if it is a finite, non-zero number.
    ///
    /// Zero is treated as "not recorded" by the statistics that use this.
    pub fn nonzero(&self) -> Option<f64> {
        self.value().filter(|v| *v != 0.0)
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }
}

impl From<f64> for Reading {
    fn from(v: f64) -> Self {
        if v.is_finite() {
            Self::Valid(v)
        } else {
            Self::Invalid(v.to_string())
        }
    }
}

impl Serialize for Reading {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Valid(v) => serializer.serialize_f64(*v),
            Self::Invalid(raw) => serializer.serialize_str(raw),
            Self::Missing => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for Reading {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_json(&value))
    }
}

// ── Lenient field helpers ─────────────────────────────────────────────────────

/// Deserialize a free-text label, keeping only JSON strings.
///
/// Labels such as `sex` or `history_of_stroke` are matched exactly later on;
/// a non-string value could never match, so it is dropped here.
pub fn lenient_label<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => Some(s),
        _ => None,
    })
}

/// Deserialize free text such as a name, never failing.
///
/// Strings are kept as-is, numbers and booleans keep their JSON text, and
/// anything else becomes the empty string.
pub fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}

/// Deserialize a timestamp in any of the shapes the store has produced.
///
/// Accepted: RFC 3339 strings, integer epoch seconds, and
/// `{ "seconds": .., "nanoseconds": .. }` objects. Anything else yields
/// `None` so the record simply contributes to no time series.
pub fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(timestamp_from_json(&value))
}

/// Shared implementation of [`lenient_timestamp`].
pub fn timestamp_from_json(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s.trim())
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        Value::Number(n) => n.as_i64().and_then(|secs| Utc.timestamp_opt(secs, 0).single()),
        Value::Object(map) => {
            let secs = map.get("seconds").and_then(Value::as_i64)?;
            let nanos = map
                .get("nanoseconds")
                .and_then(Value::as_u64)
                .and_then(|n| u32::try_from(n).ok())
                .unwrap_or(0);
            Utc.timestamp_opt(secs, nanos).single()
        }
        _ => None,
    }
}
