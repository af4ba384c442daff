//! # Chart Input
//!
//! The moment a board is cast for: a civil date, an optional time of day and
//! an optional longitude. All parsing and range checks happen here, before
//! anything reaches the calendar engine.
//!
//! ## Example
//!
//! ```rust
//! use qimen_core::input::ChartInput;
//!
//! let input = ChartInput::parse("2024-02-10", Some("12:00"), Some("116.4")).unwrap();
//! assert!(input.has_time());
//! assert_eq!(input.longitude, Some(116.4));
//! ```

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::settings::CalendarSettings;

/// Input parameters for a chart.
///
/// ## JSON Example
///
/// ```json
/// {
///   "label": "Consultation",
///   "date": "2024-02-10",
///   "time": "12:00:00",
///   "longitude": 116.4
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartInput {
    /// User label for this chart
    #[serde(default)]
    pub label: String,

    /// Civil calendar date
    pub date: NaiveDate,

    /// Civil time of day; `None` leaves the hour pillar unknown
    #[serde(default)]
    pub time: Option<NaiveTime>,

    /// Observer longitude in degrees east; `None` skips true-solar correction
    #[serde(default)]
    pub longitude: Option<f64>,
}

impl ChartInput {
    pub fn new(date: NaiveDate, time: Option<NaiveTime>, longitude: Option<f64>) -> Self {
        ChartInput {
            label: String::new(),
            date,
            time,
            longitude,
        }
    }

    /// Parse user-supplied strings.
    ///
    /// Accepts `YYYY-MM-DD` dates, `HH:MM` or `HH:MM:SS` times and decimal
    /// longitudes. Blank time/longitude strings count as absent.
    pub fn parse(date: &str, time: Option<&str>, longitude: Option<&str>) -> CalcResult<Self> {
        let date_str = date.trim();
        if date_str.is_empty() {
            return Err(CalcError::missing_field("date"));
        }
        let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
            .map_err(|e| CalcError::invalid_input("date", date_str, format!("Expected YYYY-MM-DD: {}", e)))?;

        let time = match time.map(str::trim).filter(|s| !s.is_empty()) {
            Some(s) => Some(parse_time(s)?),
            None => None,
        };

        let longitude = match longitude.map(str::trim).filter(|s| !s.is_empty()) {
            Some(s) => Some(
                s.parse::<f64>()
                    .map_err(|e| CalcError::invalid_input("longitude", s, format!("Expected decimal degrees: {}", e)))?,
            ),
            None => None,
        };

        Ok(ChartInput::new(date, time, longitude))
    }

    /// Attach a label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Validate input parameters against the settings' supported range.
    pub fn validate(&self, settings: &CalendarSettings) -> CalcResult<()> {
        let year = self.date.year();
        if year < settings.min_year || year > settings.max_year {
            return Err(CalcError::invalid_input(
                "date",
                self.date.to_string(),
                format!("Year must be between {} and {}", settings.min_year, settings.max_year),
            ));
        }
        if let Some(longitude) = self.longitude {
            if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
                return Err(CalcError::invalid_input(
                    "longitude",
                    longitude.to_string(),
                    "Longitude must be between -180 and 180 degrees",
                ));
            }
        }
        Ok(())
    }

    /// True when a time of day was supplied
    pub fn has_time(&self) -> bool {
        self.time.is_some()
    }

    /// Civil timestamp, falling back to the settings' default time of day.
    pub fn civil_datetime(&self, settings: &CalendarSettings) -> NaiveDateTime {
        self.date.and_time(self.time.unwrap_or(settings.default_time))
    }
}

fn parse_time(s: &str) -> CalcResult<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .map_err(|e| CalcError::invalid_input("time", s, format!("Expected HH:MM or HH:MM:SS: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full() {
        let input = ChartInput::parse("2024-02-10", Some("08:30"), Some("-73.5")).unwrap();
        assert_eq!(input.date, NaiveDate::from_ymd_opt(2024, 2, 10).unwrap());
        assert_eq!(input.time, NaiveTime::from_hms_opt(8, 30, 0));
        assert_eq!(input.longitude, Some(-73.5));
    }

    #[test]
    fn test_parse_seconds_and_blanks() {
        let input = ChartInput::parse(" 2024-02-10 ", Some("23:59:30"), Some("  ")).unwrap();
        assert_eq!(input.time, NaiveTime::from_hms_opt(23, 59, 30));
        assert_eq!(input.longitude, None);

        let date_only = ChartInput::parse("2024-02-10", Some(""), None).unwrap();
        assert!(!date_only.has_time());
    }

    #[test]
    fn test_parse_errors() {
        let err = ChartInput::parse("2024-02-30", None, None).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");

        let err = ChartInput::parse("", None, None).unwrap_err();
        assert_eq!(err, CalcError::missing_field("date"));

        let err = ChartInput::parse("2024-02-10", Some("25:00"), None).unwrap_err();
        assert!(matches!(err, CalcError::InvalidInput { ref field, .. } if field == "time"));

        let err = ChartInput::parse("2024-02-10", None, Some("east")).unwrap_err();
        assert!(matches!(err, CalcError::InvalidInput { ref field, .. } if field == "longitude"));
    }

    #[test]
    fn test_validate_ranges() {
        let settings = CalendarSettings::default();
        let ok = ChartInput::parse("2024-02-10", None, Some("116.4")).unwrap();
        assert!(ok.validate(&settings).is_ok());

        let too_early = ChartInput::parse("1850-01-01", None, None).unwrap();
        assert!(too_early.validate(&settings).is_err());

        let bad_longitude = ChartInput::parse("2024-02-10", None, Some("200")).unwrap();
        assert!(bad_longitude.validate(&settings).is_err());

        let nan = ChartInput::new(ok.date, None, Some(f64::NAN));
        assert!(nan.validate(&settings).is_err());
    }

    #[test]
    fn test_default_time() {
        let settings = CalendarSettings::default();
        let input = ChartInput::parse("2024-02-10", None, None).unwrap();
        assert_eq!(
            input.civil_datetime(&settings),
            NaiveDate::from_ymd_opt(2024, 2, 10).unwrap().and_hms_opt(12, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_serialization() {
        let input = ChartInput::parse("2024-02-10", Some("12:00"), None)
            .unwrap()
            .with_label("Test");
        let json = serde_json::to_string_pretty(&input).unwrap();
        let roundtrip: ChartInput = serde_json::from_str(&json).unwrap();
        assert_eq!(input, roundtrip);

        let minimal: ChartInput = serde_json::from_str(r#"{"date": "2024-02-10"}"#).unwrap();
        assert!(minimal.time.is_none());
        assert!(minimal.label.is_empty());
    }
}
