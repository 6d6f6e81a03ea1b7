//! The SS-MIX2 timestamp grammar.
//!
//! Source data carries timestamps in the 20-digit base form
//! `YYYYMMDDHHMMSSFFFFFF`; segments re-format them at the precision their
//! field declares. The guideline caps emitted timestamps at 17 characters
//! (milliseconds), which is also the precision used in file names.

use chrono::{Duration, NaiveDate, NaiveDateTime, Timelike};

use crate::error::{ModelError, Result};

/// Output precisions a field can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precision {
    /// `YYYYMMDD`
    Day,
    /// `YYYYMMDDHHMM`
    Minute,
    /// `YYYYMMDDHHMMSS`
    Second,
    /// `YYYYMMDDHHMMSS` + milliseconds, 17 characters; used for MSH-7 and
    /// file names.
    Milli,
}

/// A parsed clinical timestamp with microsecond carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Hl7Timestamp {
    dt: NaiveDateTime,
}

impl Hl7Timestamp {
    /// Parses the 20-digit base form. Shorter input is accepted down to
    /// `YYYYMMDD` and zero-padded; separator characters (`/ - : . space`)
    /// are stripped first.
    pub fn parse(value: &str) -> Result<Self> {
        let digits: String = value
            .chars()
            .filter(|c| !matches!(c, '/' | '-' | ':' | '.' | ' '))
            .collect();
        if digits.len() < 8 || digits.len() > 20 || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(ModelError::Timestamp {
                value: value.to_string(),
                expected: "YYYYMMDD[HHMMSS[FFFFFF]]",
            });
        }
        let padded = format!("{digits:0<20}");
        let bad = |_| ModelError::Timestamp {
            value: value.to_string(),
            expected: "YYYYMMDD[HHMMSS[FFFFFF]]",
        };
        let date = NaiveDate::parse_from_str(&padded[..8], "%Y%m%d").map_err(bad)?;
        let hour: u32 = padded[8..10].parse().unwrap_or(0);
        let minute: u32 = padded[10..12].parse().unwrap_or(0);
        let second: u32 = padded[12..14].parse().unwrap_or(0);
        let micros: u32 = padded[14..20].parse().unwrap_or(0);
        let dt = date
            .and_hms_micro_opt(hour, minute, second, micros)
            .ok_or_else(|| ModelError::Timestamp {
                value: value.to_string(),
                expected: "valid calendar date and time of day",
            })?;
        Ok(Self { dt })
    }

    /// Parses an optional field: empty input is `None`.
    pub fn parse_opt(value: &str) -> Result<Option<Self>> {
        if value.is_empty() {
            Ok(None)
        } else {
            Self::parse(value).map(Some)
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.dt.date()
    }

    pub fn datetime(&self) -> NaiveDateTime {
        self.dt
    }

    /// Formats at the requested precision.
    pub fn format(&self, precision: Precision) -> String {
        match precision {
            Precision::Day => self.dt.format("%Y%m%d").to_string(),
            Precision::Minute => self.dt.format("%Y%m%d%H%M").to_string(),
            Precision::Second => self.dt.format("%Y%m%d%H%M%S").to_string(),
            Precision::Milli => {
                let millis = (self.dt.nanosecond() % 1_000_000_000) / 1_000_000;
                format!("{}{millis:03}", self.dt.format("%Y%m%d%H%M%S"))
            }
        }
    }

    /// The `YYYYMMDD` day bucket used by the storage layout.
    pub fn day_bucket(&self) -> String {
        self.format(Precision::Day)
    }

    /// This timestamp shifted by a signed duration.
    pub fn shifted(&self, delta: Duration) -> Self {
        Self { dt: self.dt + delta }
    }

    /// The 20-digit base form (microseconds), mainly for re-serialization
    /// in tests and synthetic rows.
    pub fn base_form(&self) -> String {
        format!(
            "{}{:06}",
            self.dt.format("%Y%m%d%H%M%S"),
            (self.dt.nanosecond() % 1_000_000_000) / 1_000
        )
    }
}

impl std::fmt::Display for Hl7Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.format(Precision::Second))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_base_form() {
        let ts = Hl7Timestamp::parse("20111220224447339900").unwrap();
        assert_eq!(ts.format(Precision::Day), "20111220");
        assert_eq!(ts.format(Precision::Second), "20111220224447");
        assert_eq!(ts.format(Precision::Milli), "20111220224447339");
    }

    #[test]
    fn pads_short_forms() {
        let ts = Hl7Timestamp::parse("20200101").unwrap();
        assert_eq!(ts.format(Precision::Second), "20200101000000");
        let ts = Hl7Timestamp::parse("202001011230").unwrap();
        assert_eq!(ts.format(Precision::Minute), "202001011230");
    }

    #[test]
    fn strips_separators() {
        let ts = Hl7Timestamp::parse("2020-01-01 12:30:45").unwrap();
        assert_eq!(ts.format(Precision::Second), "20200101123045");
    }

    #[test]
    fn rejects_garbage() {
        assert!(Hl7Timestamp::parse("not-a-date").is_err());
        assert!(Hl7Timestamp::parse("20201340").is_err());
        assert!(Hl7Timestamp::parse("2020").is_err());
    }

    #[test]
    fn milli_format_is_seventeen_chars() {
        let ts = Hl7Timestamp::parse("20111220224447339935").unwrap();
        assert_eq!(ts.format(Precision::Milli).len(), 17);
    }

    #[test]
    fn optional_empty_is_none() {
        assert!(Hl7Timestamp::parse_opt("").unwrap().is_none());
        assert!(Hl7Timestamp::parse_opt("20200101").unwrap().is_some());
    }

    #[test]
    fn ordering_follows_time() {
        let a = Hl7Timestamp::parse("20200101120000").unwrap();
        let b = Hl7Timestamp::parse("20200101120001").unwrap();
        assert!(a < b);
    }
}
