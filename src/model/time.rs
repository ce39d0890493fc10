//! Timestamps as the service emits them.
//!
//! Records created by this client carry RFC 3339 values with a `Z` suffix,
//! while records produced by the service use naive ISO-8601 local time
//! (`2024-05-01T10:00:00.123456`). Both are kept verbatim and only parsed
//! for display.

use std::fmt;

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(String);

impl Timestamp {
    /// Current time, millisecond precision, `Z` suffix.
    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    pub fn from_datetime(at: DateTime<Utc>) -> Self {
        Timestamp(at.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Best-effort parse. Naive values are taken as UTC.
    pub fn parse(&self) -> Option<DateTime<Utc>> {
        if let Ok(at) = DateTime::parse_from_rfc3339(&self.0) {
            return Some(at.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(&self.0, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc())
    }

    /// Calendar date for conversation headers, raw value if unparseable.
    pub fn date_label(&self) -> String {
        self.parse()
            .map(|at| at.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| self.0.clone())
    }

    /// Wall-clock time for message lines, raw value if unparseable.
    pub fn time_label(&self) -> String {
        self.parse()
            .map(|at| at.format("%H:%M:%S").to_string())
            .unwrap_or_else(|| self.0.clone())
    }
}

impl From<&str> for Timestamp {
    fn from(value: &str) -> Self {
        Timestamp(value.to_string())
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
