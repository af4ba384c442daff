//! True solar time: civil time shifted by the observer's distance from the
//! civil zone's reference meridian, four minutes per degree.

use chrono::{NaiveDateTime, TimeDelta};

/// Clock offset for an observer at `longitude` (degrees east).
///
/// Positive east of the reference meridian.
pub fn true_solar_offset(longitude: f64, reference_meridian: f64) -> TimeDelta {
    let minutes = (longitude - reference_meridian) * 4.0;
    TimeDelta::milliseconds((minutes * 60_000.0).round() as i64)
}

/// Apply the true-solar correction; `None` longitude leaves the time unchanged.
pub fn true_solar_time(civil: NaiveDateTime, longitude: Option<f64>, reference_meridian: f64) -> NaiveDateTime {
    match longitude {
        Some(longitude) => civil + true_solar_offset(longitude, reference_meridian),
        None => civil,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap().and_hms_opt(12, 0, 0).unwrap()
    }

    #[test]
    fn test_offset_east_and_west() {
        assert_eq!(true_solar_offset(135.0, 120.0), TimeDelta::minutes(60));
        assert_eq!(true_solar_offset(105.0, 120.0), TimeDelta::minutes(-60));
        assert_eq!(true_solar_offset(120.0, 120.0), TimeDelta::zero());
    }

    #[test]
    fn test_fractional_longitude() {
        // Beijing, 116.4°E: -14.4 minutes
        assert_eq!(true_solar_offset(116.4, 120.0), TimeDelta::seconds(-864));
    }

    #[test]
    fn test_apply() {
        let adjusted = true_solar_time(noon(), Some(135.0), 120.0);
        assert_eq!(adjusted, noon() + TimeDelta::hours(1));
        assert_eq!(true_solar_time(noon(), None, 120.0), noon());
    }

    #[test]
    fn test_crosses_midnight() {
        let late = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap().and_hms_opt(23, 30, 0).unwrap();
        let adjusted = true_solar_time(late, Some(135.0), 120.0);
        assert_eq!(adjusted.date(), NaiveDate::from_ymd_opt(2024, 6, 2).unwrap());
    }
}
