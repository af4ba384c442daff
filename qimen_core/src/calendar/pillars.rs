//! # Four Pillars
//!
//! Maps a civil timestamp to its year, month, day and hour pillars.
//!
//! ## Rules
//!
//! - **Night-zi**: from 23:00 the date rolls forward one day for every pillar;
//!   the clock time is kept and the hour pillar still uses the real hour.
//! - **Year**: changes at 立春, not on January 1st.
//! - **Month**: opened by the latest jie term; 立春 opens the 寅 month.
//!   Stems follow the five-tigers rule.
//! - **Day**: pure day count from 1970-01-01 (stem 9, branch 5).
//! - **Hour**: two-hour branches starting at 23:00; stems follow the
//!   five-rats rule. Absent when no time of day was supplied.
//!
//! ## Example
//!
//! ```rust
//! use chrono::{FixedOffset, NaiveDate};
//! use qimen_core::calendar::compute_four_pillars;
//!
//! let civil = NaiveDate::from_ymd_opt(2024, 2, 10).unwrap().and_hms_opt(12, 0, 0).unwrap();
//! let cst = FixedOffset::east_opt(8 * 3600).unwrap();
//! let pillars = compute_four_pillars(civil, true, cst);
//!
//! assert_eq!(pillars.year.to_string(), "甲辰");
//! assert_eq!(pillars.month.to_string(), "丙寅");
//! ```

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, TimeDelta, Timelike, Utc};
use serde::{Deserialize, Serialize};

use super::solar_terms::{latest_term_at, terms_around, SolarTerm};
use crate::cycle::{Branch, Pillar, Stem};

/// Day-count reference: 1970-01-01 is taken as stem 9, branch 5
pub const DAY_EPOCH_STEM: i64 = 9;
pub const DAY_EPOCH_BRANCH: i64 = 5;

/// `NaiveDate::num_days_from_ce` of 1970-01-01
const UNIX_EPOCH_DAYS_FROM_CE: i64 = 719_163;

/// First hour that belongs to the next day
const NIGHT_ZI_HOUR: u32 = 23;

/// Year, month, day and (optional) hour pillars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FourPillars {
    pub year: Pillar,
    pub month: Pillar,
    pub day: Pillar,
    /// `None` when no time of day was supplied
    pub hour: Option<Pillar>,
}

impl FourPillars {
    /// Hour branch, or `None` when the hour is unknown
    pub fn hour_branch(&self) -> Option<Branch> {
        self.hour.map(|p| p.branch)
    }
}

/// Convert a civil timestamp to the UTC instant it names.
pub fn civil_to_utc(civil: NaiveDateTime, offset: FixedOffset) -> DateTime<Utc> {
    (civil - TimeDelta::seconds(i64::from(offset.local_minus_utc()))).and_utc()
}

/// Apply the night-zi rule: 23:00 onward counts as the following date.
pub fn pillar_datetime(civil: NaiveDateTime) -> NaiveDateTime {
    if civil.hour() >= NIGHT_ZI_HOUR {
        civil + TimeDelta::days(1)
    } else {
        civil
    }
}

/// Whole days from 1970-01-01 to `date` (negative before the epoch).
pub fn days_since_epoch(date: NaiveDate) -> i64 {
    i64::from(date.num_days_from_ce()) - UNIX_EPOCH_DAYS_FROM_CE
}

/// Sexagenary year (the Gregorian year the pillar is named after) for a
/// night-zi-adjusted civil timestamp.
fn sexagenary_year(at: NaiveDateTime, instant: DateTime<Utc>) -> i32 {
    let year = at.year();
    if instant < SolarTerm::StartOfSpring.instant(year) {
        year - 1
    } else {
        year
    }
}

pub fn year_pillar(sexagenary_year: i32) -> Pillar {
    let offset = i64::from(sexagenary_year) - 4;
    Pillar::from_indices(offset, offset)
}

/// Month pillar from the year stem and the governing jie index (立春 = 0).
pub fn month_pillar(year_stem: Stem, jie_index: usize) -> Pillar {
    let jie = jie_index as i64;
    let stem = (year_stem.index() as i64 % 5) * 2 + 2 + jie;
    Pillar::from_indices(stem, jie + 2)
}

pub fn day_pillar(date: NaiveDate) -> Pillar {
    let days = days_since_epoch(date);
    Pillar::from_indices(DAY_EPOCH_STEM + days, DAY_EPOCH_BRANCH + days)
}

/// Hour pillar from the clock hour (0-23) and the day stem.
pub fn hour_pillar(hour: u32, day_stem: Stem) -> Pillar {
    let branch = i64::from((hour + 1) % 24 / 2);
    let stem = (day_stem.index() as i64 % 5) * 2 + branch;
    Pillar::from_indices(stem, branch)
}

/// Compute the four pillars of a civil timestamp.
///
/// `civil` is wall-clock time in the zone given by `offset` (already
/// true-solar corrected if the caller wants that). When `has_time` is false
/// the time component is only used for boundary comparisons and the hour
/// pillar is `None`.
pub fn compute_four_pillars(civil: NaiveDateTime, has_time: bool, offset: FixedOffset) -> FourPillars {
    let at = pillar_datetime(civil);
    let instant = civil_to_utc(at, offset);

    let year = year_pillar(sexagenary_year(at, instant));

    let terms = terms_around(at.year());
    // The previous year's 大雪 always precedes `at`, so the lookup cannot miss
    let jie_index = latest_term_at(&terms, instant, SolarTerm::is_jie)
        .and_then(|t| t.term.jie_index())
        .unwrap_or(SolarTerm::MajorSnow.index() / 2);
    let month = month_pillar(year.stem, jie_index);

    let day = day_pillar(at.date());

    let hour = has_time.then(|| hour_pillar(civil.hour(), day.stem));

    let pillars = FourPillars { year, month, day, hour };
    tracing::debug!(
        %civil,
        year = %pillars.year,
        month = %pillars.month,
        day = %pillars.day,
        hour = ?pillars.hour.map(|p| p.to_string()),
        "computed four pillars"
    );
    pillars
}
