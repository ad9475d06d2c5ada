//! Time handling for model output.

use chrono::{DateTime, Duration, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Day-boundary registration of a model's timestamps.
///
/// The sea-ice model stamps a daily mean at 00:00 of the following day; the
/// ocean model stamps the same interval at 12:00 of the day itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TimeConvention {
    #[default]
    Ocean,
    Ice,
}

impl TimeConvention {
    /// Offset to add to a timestamp registered under `self` to express it under `target`.
    pub fn offset_to(&self, target: TimeConvention) -> Duration {
        match (self, target) {
            (Self::Ice, Self::Ocean) => Duration::hours(-12),
            (Self::Ocean, Self::Ice) => Duration::hours(12),
            _ => Duration::zero(),
        }
    }
}

/// An inclusive time window for catalog queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Parse a window from two ISO 8601 strings (date-only accepted).
    pub fn parse(start: &str, end: &str) -> Result<Self, TimeParseError> {
        Ok(Self::new(parse_iso8601(start)?, parse_iso8601(end)?))
    }

    pub fn contains(&self, dt: &DateTime<Utc>) -> bool {
        dt >= &self.start && dt <= &self.end
    }
}

/// Parse an ISO 8601 timestamp, assuming UTC when no offset is given.
pub fn parse_iso8601(s: &str) -> Result<DateTime<Utc>, TimeParseError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(Utc.from_utc_datetime(&ndt));
        }
    }

    if let Ok(ndt) = NaiveDateTime::parse_from_str(&format!("{}T00:00:00", s), "%Y-%m-%dT%H:%M:%S") {
        return Ok(Utc.from_utc_datetime(&ndt));
    }

    Err(TimeParseError::InvalidFormat(s.to_string()))
}

#[derive(Debug, thiserror::Error)]
pub enum TimeParseError {
    #[error("Invalid time format: {0}")]
    InvalidFormat(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_iso8601() {
        let dt = parse_iso8601("2010-01-15T12:00:00Z").unwrap();
        assert_eq!(dt.year(), 2010);
        assert_eq!(dt.day(), 15);
        assert_eq!(dt.hour(), 12);

        let date_only = parse_iso8601("1991-01-01").unwrap();
        assert_eq!(date_only.hour(), 0);
        assert!(parse_iso8601("not a time").is_err());
    }

    #[test]
    fn test_convention_offset() {
        assert_eq!(
            TimeConvention::Ice.offset_to(TimeConvention::Ocean),
            Duration::hours(-12)
        );
        assert_eq!(
            TimeConvention::Ocean.offset_to(TimeConvention::Ocean),
            Duration::zero()
        );
    }

    #[test]
    fn test_window_inclusive() {
        let window = TimeWindow::parse("2010-01-01", "2010-01-31").unwrap();
        assert!(window.contains(&window.start));
        assert!(window.contains(&window.end));
        assert!(!window.contains(&parse_iso8601("2010-02-01").unwrap()));
    }
}
