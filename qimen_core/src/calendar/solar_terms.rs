//! # Solar Terms
//!
//! The 24 solar terms (节气) from a fixed linear ephemeris: each term falls a
//! fixed number of minutes after a 1900 reference instant, advanced by one
//! mean tropical year (525948.76 minutes) per year.
//!
//! The approximation is only good to roughly a day. That is the accepted
//! behaviour; boundary lookups must use these instants, not astronomical ones.
//!
//! ## Table order
//!
//! Terms are listed from 立春 (start of spring). Even table positions are the
//! twelve jie (节) terms that open a solar month; odd positions are the qi (气)
//! midpoints. 小寒 and 大寒 sit at the end of the table but fall in January of
//! the same Gregorian year.

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Mean tropical year used by the ephemeris, in minutes
pub const MINUTES_PER_YEAR: f64 = 525_948.76;

/// Gregorian year the minute offsets are anchored to
pub const EPOCH_YEAR: i32 = 1900;

/// 1900-01-06 02:05 UTC, the 小寒 instant the offsets are measured from
static TERM_EPOCH: Lazy<DateTime<Utc>> = Lazy::new(|| {
    NaiveDate::from_ymd_opt(1900, 1, 6)
        .and_then(|date| date.and_hms_opt(2, 5, 0))
        .expect("1900-01-06 02:05 is a valid timestamp")
        .and_utc()
});

/// One of the 24 solar terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SolarTerm {
    StartOfSpring,
    RainWater,
    AwakeningOfInsects,
    SpringEquinox,
    ClearAndBright,
    GrainRain,
    StartOfSummer,
    GrainBuds,
    GrainInEar,
    SummerSolstice,
    MinorHeat,
    MajorHeat,
    StartOfAutumn,
    EndOfHeat,
    WhiteDew,
    AutumnEquinox,
    ColdDew,
    FrostsDescent,
    StartOfWinter,
    MinorSnow,
    MajorSnow,
    WinterSolstice,
    MinorCold,
    MajorCold,
}

impl SolarTerm {
    /// All 24 terms in table order
    pub const ALL: [SolarTerm; 24] = [
        SolarTerm::StartOfSpring,
        SolarTerm::RainWater,
        SolarTerm::AwakeningOfInsects,
        SolarTerm::SpringEquinox,
        SolarTerm::ClearAndBright,
        SolarTerm::GrainRain,
        SolarTerm::StartOfSummer,
        SolarTerm::GrainBuds,
        SolarTerm::GrainInEar,
        SolarTerm::SummerSolstice,
        SolarTerm::MinorHeat,
        SolarTerm::MajorHeat,
        SolarTerm::StartOfAutumn,
        SolarTerm::EndOfHeat,
        SolarTerm::WhiteDew,
        SolarTerm::AutumnEquinox,
        SolarTerm::ColdDew,
        SolarTerm::FrostsDescent,
        SolarTerm::StartOfWinter,
        SolarTerm::MinorSnow,
        SolarTerm::MajorSnow,
        SolarTerm::WinterSolstice,
        SolarTerm::MinorCold,
        SolarTerm::MajorCold,
    ];

    /// Minutes after the reference instant (in the epoch year), table order
    const OFFSET_MINUTES: [f64; 24] = [
        42467.0, 63836.0, 85337.0, 107014.0, 128867.0, 150921.0, 173149.0, 195551.0,
        218072.0, 240693.0, 263343.0, 285989.0, 308563.0, 331033.0, 353350.0, 375494.0,
        397447.0, 419210.0, 440795.0, 462224.0, 483532.0, 504758.0, 0.0, 21208.0,
    ];

    /// Position in the table, 0-23
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::StartOfSpring => "立春",
            Self::RainWater => "雨水",
            Self::AwakeningOfInsects => "惊蛰",
            Self::SpringEquinox => "春分",
            Self::ClearAndBright => "清明",
            Self::GrainRain => "谷雨",
            Self::StartOfSummer => "立夏",
            Self::GrainBuds => "小满",
            Self::GrainInEar => "芒种",
            Self::SummerSolstice => "夏至",
            Self::MinorHeat => "小暑",
            Self::MajorHeat => "大暑",
            Self::StartOfAutumn => "立秋",
            Self::EndOfHeat => "处暑",
            Self::WhiteDew => "白露",
            Self::AutumnEquinox => "秋分",
            Self::ColdDew => "寒露",
            Self::FrostsDescent => "霜降",
            Self::StartOfWinter => "立冬",
            Self::MinorSnow => "小雪",
            Self::MajorSnow => "大雪",
            Self::WinterSolstice => "冬至",
            Self::MinorCold => "小寒",
            Self::MajorCold => "大寒",
        }
    }

    /// True for the twelve month-opening jie terms.
    pub const fn is_jie(self) -> bool {
        self.index() % 2 == 0
    }

    /// Position among the jie terms (立春 = 0 … 小寒 = 11), `None` for qi terms.
    pub const fn jie_index(self) -> Option<usize> {
        if self.is_jie() {
            Some(self.index() / 2)
        } else {
            None
        }
    }

    /// True for the twelve terms from 冬至 through 芒种, the yang half of the year.
    pub const fn is_yang_half(self) -> bool {
        let i = self.index();
        i <= SolarTerm::GrainInEar.index() || i >= SolarTerm::WinterSolstice.index()
    }

    /// Instant of this term in the given Gregorian year.
    pub fn instant(self, year: i32) -> DateTime<Utc> {
        let minutes = MINUTES_PER_YEAR * f64::from(year - EPOCH_YEAR) + Self::OFFSET_MINUTES[self.index()];
        *TERM_EPOCH + TimeDelta::milliseconds((minutes * 60_000.0).round() as i64)
    }
}

/// A solar term paired with its instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolarTermInstant {
    pub term: SolarTerm,
    pub instant: DateTime<Utc>,
}

/// The 24 terms of a Gregorian year, in table order.
pub fn solar_terms(year: i32) -> [SolarTermInstant; 24] {
    SolarTerm::ALL.map(|term| SolarTermInstant {
        term,
        instant: term.instant(year),
    })
}

/// Terms of the previous, given and next year, sorted by instant.
///
/// Always returns a fresh vector; every boundary lookup for a timestamp in
/// `year` finds its governing term in here.
pub fn terms_around(year: i32) -> Vec<SolarTermInstant> {
    let mut terms: Vec<SolarTermInstant> = (year - 1..=year + 1).flat_map(solar_terms).collect();
    terms.sort_by_key(|t| t.instant);
    terms
}

/// Latest term in `terms` (sorted by instant) that passes `filter` and whose
/// instant is at or before `at`.
pub fn latest_term_at(
    terms: &[SolarTermInstant],
    at: DateTime<Utc>,
    filter: impl Fn(SolarTerm) -> bool,
) -> Option<SolarTermInstant> {
    let end = terms.partition_point(|t| t.instant <= at);
    let found = terms[..end].iter().rev().find(|t| filter(t.term)).copied();
    tracing::trace!(%at, term = ?found.map(|t| t.term), "latest solar term lookup");
    found
}
