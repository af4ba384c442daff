//! # Calendar Settings
//!
//! Settings that control how civil timestamps are interpreted. The defaults
//! describe China Standard Time (UTC+08:00), whose 120°E meridian is the
//! reference for true-solar-time correction.
//!
//! Settings are stored as human-readable JSON:
//!
//! ```json
//! {
//!   "utc_offset_minutes": 480,
//!   "default_time": "12:00:00",
//!   "min_year": 1901,
//!   "max_year": 2099
//! }
//! ```
//!
//! ## Example
//!
//! ```rust
//! use qimen_core::settings::CalendarSettings;
//!
//! let settings = CalendarSettings::default();
//! assert_eq!(settings.reference_meridian(), 120.0);
//! ```

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{FixedOffset, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Civil time zone of the default settings (UTC+08:00)
pub const DEFAULT_UTC_OFFSET_MINUTES: i32 = 480;

/// Degrees of longitude per minute of clock offset
const MINUTES_PER_DEGREE: f64 = 4.0;

/// Global calendar settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarSettings {
    /// Offset of civil time from UTC, in minutes (east positive)
    pub utc_offset_minutes: i32,

    /// Time of day assumed when the caller supplies only a date.
    ///
    /// Used for the night-zi check, true-solar correction and solar-term
    /// comparisons. Never used to invent an hour pillar.
    pub default_time: NaiveTime,

    /// Earliest supported Gregorian year (inclusive)
    pub min_year: i32,

    /// Latest supported Gregorian year (inclusive)
    pub max_year: i32,
}

impl Default for CalendarSettings {
    fn default() -> Self {
        CalendarSettings {
            utc_offset_minutes: DEFAULT_UTC_OFFSET_MINUTES,
            default_time: NaiveTime::from_hms_opt(12, 0, 0).unwrap_or_default(),
            min_year: 1901,
            max_year: 2099,
        }
    }
}

impl CalendarSettings {
    /// Validate settings values.
    pub fn validate(&self) -> CalcResult<()> {
        // Real-world zones span UTC-12 to UTC+14
        if !(-12 * 60..=14 * 60).contains(&self.utc_offset_minutes) {
            return Err(CalcError::invalid_input(
                "utc_offset_minutes",
                self.utc_offset_minutes.to_string(),
                "Offset must be between -720 and 840 minutes",
            ));
        }
        if self.min_year > self.max_year {
            return Err(CalcError::invalid_input(
                "min_year",
                self.min_year.to_string(),
                format!("min_year must not exceed max_year ({})", self.max_year),
            ));
        }
        // Outside this window the linear ephemeris drifts by weeks
        if self.min_year < 1000 || self.max_year > 3000 {
            return Err(CalcError::invalid_input(
                "max_year",
                format!("{}..={}", self.min_year, self.max_year),
                "Supported years must stay within 1000..=3000",
            ));
        }
        Ok(())
    }

    /// Longitude (degrees east) of the civil zone's reference meridian.
    pub fn reference_meridian(&self) -> f64 {
        self.utc_offset_minutes as f64 / MINUTES_PER_DEGREE
    }

    /// The civil zone as a chrono offset.
    pub fn civil_offset(&self) -> CalcResult<FixedOffset> {
        FixedOffset::east_opt(self.utc_offset_minutes * 60).ok_or_else(|| {
            CalcError::invalid_input(
                "utc_offset_minutes",
                self.utc_offset_minutes.to_string(),
                "Offset is not a valid UTC offset",
            )
        })
    }
}

/// Load settings from a JSON file.
///
/// Missing fields take their default values. The loaded settings are
/// validated before being returned.
///
/// # Example
///
/// ```rust,no_run
/// use qimen_core::settings::load_settings;
/// use std::path::Path;
///
/// let settings = load_settings(Path::new("qimen.json"))?;
/// println!("Reference meridian: {}", settings.reference_meridian());
/// # Ok::<(), qimen_core::errors::CalcError>(())
/// ```
pub fn load_settings(path: &Path) -> CalcResult<CalendarSettings> {
    let mut file = File::open(path).map_err(|e| {
        CalcError::file_error("open", path.display().to_string(), e.to_string())
    })?;

    let mut contents = String::new();
    file.read_to_string(&mut contents).map_err(|e| {
        CalcError::file_error("read", path.display().to_string(), e.to_string())
    })?;

    let settings: CalendarSettings =
        serde_json::from_str(&contents).map_err(|e| CalcError::SerializationError {
            reason: format!("Invalid JSON in {}: {}", path.display(), e),
        })?;

    if let Err(err) = settings.validate() {
        tracing::warn!(path = %path.display(), error = %err, "rejected settings file");
        return Err(err);
    }

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env::temp_dir;
    use std::fs;
    use std::path::PathBuf;

    fn temp_settings_path(name: &str) -> PathBuf {
        temp_dir().join(format!("qimen_test_{}.json", name))
    }

    #[test]
    fn test_defaults() {
        let settings = CalendarSettings::default();
        assert_eq!(settings.utc_offset_minutes, 480);
        assert_eq!(settings.default_time, NaiveTime::from_hms_opt(12, 0, 0).unwrap());
        assert_eq!(settings.reference_meridian(), 120.0);
        assert_eq!(settings.civil_offset().unwrap().local_minus_utc(), 8 * 3600);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_invalid_offset() {
        let settings = CalendarSettings {
            utc_offset_minutes: 2000,
            ..CalendarSettings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_inverted_year_range() {
        let settings = CalendarSettings {
            min_year: 2050,
            max_year: 2000,
            ..CalendarSettings::default()
        };
        assert_eq!(settings.validate().unwrap_err().error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings: CalendarSettings = serde_json::from_str(r#"{"utc_offset_minutes": 540}"#).unwrap();
        assert_eq!(settings.utc_offset_minutes, 540);
        assert_eq!(settings.reference_meridian(), 135.0);
        assert_eq!(settings.max_year, 2099);
    }

    #[test]
    fn test_load_roundtrip() {
        let path = temp_settings_path("roundtrip");
        let settings = CalendarSettings {
            utc_offset_minutes: 420,
            ..CalendarSettings::default()
        };
        fs::write(&path, serde_json::to_string_pretty(&settings).unwrap()).unwrap();

        let loaded = load_settings(&path).unwrap();
        assert_eq!(loaded, settings);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_settings(&temp_settings_path("does_not_exist")).unwrap_err();
        assert_eq!(err.error_code(), "FILE_ERROR");
    }

    #[test]
    fn test_load_invalid_json() {
        let path = temp_settings_path("invalid");
        fs::write(&path, "{ not json").unwrap();
        let err = load_settings(&path).unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
        let _ = fs::remove_file(&path);
    }
}
