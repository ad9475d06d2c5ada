//! CF-convention time units (`<unit> since <reference>`).

use chrono::{DateTime, Duration, Utc};
use ocean_common::parse_iso8601;

use crate::error::{NetCdfError, NetCdfResult};

/// Units written for time coordinates.
pub const TIME_UNITS: &str = "hours since 1970-01-01 00:00:00";

/// A parsed `<unit> since <reference>` time encoding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeUnits {
    seconds_per_unit: f64,
    reference: DateTime<Utc>,
}

impl TimeUnits {
    /// Parse a units string together with the variable's calendar attribute.
    pub fn parse(units: &str, calendar: Option<&str>) -> NetCdfResult<Self> {
        match calendar.map(|c| c.to_lowercase()) {
            None => {}
            Some(c) if matches!(c.as_str(), "standard" | "gregorian" | "proleptic_gregorian") => {}
            Some(other) => {
                return Err(NetCdfError::InvalidFormat(format!(
                    "unsupported calendar '{}'",
                    other
                )))
            }
        }

        let (unit, reference) = units
            .split_once(" since ")
            .ok_or_else(|| NetCdfError::InvalidFormat(format!("time units '{}'", units)))?;

        let seconds_per_unit = match unit.trim().to_lowercase().as_str() {
            "days" | "day" | "d" => 86_400.0,
            "hours" | "hour" | "h" => 3_600.0,
            "minutes" | "minute" | "min" => 60.0,
            "seconds" | "second" | "s" => 1.0,
            other => {
                return Err(NetCdfError::InvalidFormat(format!("time unit '{}'", other)));
            }
        };

        let reference = parse_iso8601(reference.trim())
            .map_err(|e| NetCdfError::InvalidFormat(e.to_string()))?;

        Ok(Self {
            seconds_per_unit,
            reference,
        })
    }

    /// Units used when writing.
    pub fn default_output() -> Self {
        Self {
            seconds_per_unit: 3_600.0,
            reference: DateTime::UNIX_EPOCH,
        }
    }

    pub fn decode(&self, value: f64) -> DateTime<Utc> {
        let millis = (value * self.seconds_per_unit * 1000.0).round() as i64;
        self.reference + Duration::milliseconds(millis)
    }

    pub fn encode(&self, time: &DateTime<Utc>) -> f64 {
        let millis = (*time - self.reference).num_milliseconds() as f64;
        millis / 1000.0 / self.seconds_per_unit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_decode_days_since() {
        let units = TimeUnits::parse("days since 1900-01-01 00:00:00", Some("proleptic_gregorian"))
            .unwrap();
        let t = units.decode(40177.5);
        assert_eq!(t, Utc.with_ymd_and_hms(2010, 1, 1, 12, 0, 0).unwrap());
    }

    #[test]
    fn test_rejects_noleap() {
        assert!(TimeUnits::parse("days since 0001-01-01", Some("noleap")).is_err());
    }

    #[test]
    fn test_encode_roundtrip_hours() {
        let units = TimeUnits::default_output();
        let t = Utc.with_ymd_and_hms(2009, 12, 31, 12, 0, 0).unwrap();
        assert_eq!(units.decode(units.encode(&t)), t);
    }
}
