//! Bureau number and escape polarity.
//!
//! The bureau uses a simplified additive formula rather than the classical
//! yuan-based lookup:
//!
//! ```text
//! bureau = (yearBranch + 1 + month + day + hourBranch + 1) mod 9, 0 -> 9
//! ```
//!
//! `month` and `day` are the Gregorian month and day; an unknown hour counts
//! as hour branch 0.

use chrono::{DateTime, Utc};

use crate::calendar::solar_terms::{latest_term_at, SolarTermInstant};
use crate::calendar::SolarTerm;
use crate::cycle::{Branch, Polarity};

/// Human-readable form of the bureau formula, carried in board metadata
pub const BUREAU_FORMULA: &str = "(年支序+1 + 月 + 日 + 时支序+1) mod 9, 0→9";

pub fn bureau_number(year_branch: Branch, month: u32, day: u32, hour_branch: Option<Branch>) -> u8 {
    let hour_index = hour_branch.map_or(0, Branch::index) as u32;
    let sum = year_branch.index() as u32 + 1 + month + day + hour_index + 1;
    match sum % 9 {
        0 => 9,
        n => n as u8,
    }
}

/// Yang from 冬至 through 芒种, yin from 夏至 through 大雪.
pub fn polarity_for(term: SolarTerm) -> Polarity {
    if term.is_yang_half() {
        Polarity::Yang
    } else {
        Polarity::Yin
    }
}

/// Board label for a polarity (阳遁 / 阴遁)
pub fn polarity_label(polarity: Polarity) -> &'static str {
    match polarity {
        Polarity::Yang => "阳遁",
        Polarity::Yin => "阴遁",
    }
}

/// The latest of all 24 terms at or before `at`.
pub fn governing_term(terms: &[SolarTermInstant], at: DateTime<Utc>) -> Option<SolarTerm> {
    latest_term_at(terms, at, |_| true).map(|t| t.term)
}
