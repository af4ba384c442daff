//! # Board Deriver
//!
//! Turns a chart input into the divination board: four pillars, bureau
//! number, escape polarity, governing solar term and the nine palaces.
//!
//! The call chain is a single pure pipeline:
//!
//! ```text
//! ChartInput -> validate -> true solar time -> four pillars -> Board
//! ```
//!
//! ## Example
//!
//! ```rust
//! use qimen_core::board::compute_board;
//! use qimen_core::input::ChartInput;
//! use qimen_core::settings::CalendarSettings;
//!
//! let input = ChartInput::parse("2024-02-10", Some("12:00"), None).unwrap();
//! let board = compute_board(&input, &CalendarSettings::default()).unwrap();
//!
//! assert_eq!(board.bureau, 6);
//! assert_eq!(board.solar_term, "立春");
//! assert_eq!(board.palaces.len(), 9);
//! ```

pub mod bureau;
pub mod palaces;

use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::calendar::pillars::civil_to_utc;
use crate::calendar::{compute_four_pillars, terms_around, true_solar_time, FourPillars, SolarTerm};
use crate::cycle::{Pillar, Polarity};
use crate::errors::CalcResult;
use crate::input::ChartInput;
use crate::settings::CalendarSettings;

pub use bureau::{bureau_number, polarity_for, polarity_label, BUREAU_FORMULA};
pub use palaces::{build_palaces, Palace, PALACE_COUNT};

/// Sentinel reported for hour fields when no time of day was supplied
pub const UNKNOWN: &str = "未知";

/// Method label carried in board metadata
pub const METHOD_LABEL: &str = "时家奇门 · 简化定局";

/// Text view of one pillar.
///
/// Element and polarity fields carry the five-phase element (木火土金水) and
/// yin/yang label (阳/阴) of the stem and the branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PillarView {
    pub stem: String,
    pub branch: String,
    /// Joined stem + branch, e.g. "甲辰"
    pub text: String,
    pub stem_element: String,
    pub stem_polarity: String,
    pub branch_element: String,
    pub branch_polarity: String,
}

impl PillarView {
    pub fn unknown() -> Self {
        PillarView {
            stem: UNKNOWN.to_string(),
            branch: UNKNOWN.to_string(),
            text: UNKNOWN.to_string(),
            stem_element: UNKNOWN.to_string(),
            stem_polarity: UNKNOWN.to_string(),
            branch_element: UNKNOWN.to_string(),
            branch_polarity: UNKNOWN.to_string(),
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.text == UNKNOWN
    }
}

impl From<Pillar> for PillarView {
    fn from(pillar: Pillar) -> Self {
        PillarView {
            stem: pillar.stem.name().to_string(),
            branch: pillar.branch.name().to_string(),
            text: pillar.to_string(),
            stem_element: pillar.stem.element().name().to_string(),
            stem_polarity: pillar.stem.polarity().name().to_string(),
            branch_element: pillar.branch.element().name().to_string(),
            branch_polarity: pillar.branch.polarity().name().to_string(),
        }
    }
}

/// The four pillars as text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PillarSet {
    pub year: PillarView,
    pub month: PillarView,
    pub day: PillarView,
    pub hour: PillarView,
}

impl From<&FourPillars> for PillarSet {
    fn from(pillars: &FourPillars) -> Self {
        PillarSet {
            year: pillars.year.into(),
            month: pillars.month.into(),
            day: pillars.day.into(),
            hour: pillars.hour.map_or_else(PillarView::unknown, PillarView::from),
        }
    }
}

/// Descriptive metadata for a board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardMeta {
    /// The bureau formula in words
    pub formula: String,
    pub method: String,
    /// Civil timestamp as supplied (default time filled in if absent)
    pub original_time: NaiveDateTime,
    /// Timestamp after true-solar correction
    pub solar_time: NaiveDateTime,
    pub longitude: Option<f64>,
    pub label: String,
}

/// The derived divination board.
///
/// ## JSON Example
///
/// ```json
/// {
///   "pillars": {
///     "year": {
///       "stem": "甲", "branch": "辰", "text": "甲辰",
///       "stem_element": "木", "stem_polarity": "阳",
///       "branch_element": "土", "branch_polarity": "阳"
///     },
///     "month": { ... },
///     "day": { ... },
///     "hour": { ... }
///   },
///   "time_known": true,
///   "bureau": 6,
///   "polarity": "yang",
///   "polarity_label": "阳遁",
///   "solar_term": "立春",
///   "palaces": [ ... ],
///   "day_void": ["子", "丑"],
///   "meta": { ... }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub pillars: PillarSet,
    /// False when the hour pillar is unknown
    pub time_known: bool,
    /// Bureau number, 1-9
    pub bureau: u8,
    pub polarity: Polarity,
    pub polarity_label: String,
    /// Name of the governing solar term
    pub solar_term: String,
    /// Exactly nine palaces, Luo Shu order
    pub palaces: Vec<Palace>,
    /// Xun-void branches of the day pillar
    pub day_void: [String; 2],
    pub meta: BoardMeta,
}

impl Board {
    /// The board as a JSON value, for embedding in downstream requests.
    pub fn to_context(&self) -> CalcResult<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Palace by Luo Shu number (1-9)
    pub fn palace(&self, index: u8) -> Option<&Palace> {
        self.palaces.iter().find(|p| p.index == index)
    }
}

/// Derive a board from already computed pillars.
///
/// `solar_time` is the true-solar corrected civil timestamp the pillars were
/// computed from; `governing` is the latest solar term at or before it.
pub fn derive_board(
    pillars: &FourPillars,
    governing: SolarTerm,
    original_time: NaiveDateTime,
    solar_time: NaiveDateTime,
    longitude: Option<f64>,
) -> Board {
    let bureau = bureau_number(
        pillars.year.branch,
        solar_time.month(),
        solar_time.day(),
        pillars.hour_branch(),
    );
    let polarity = polarity_for(governing);
    let [void_a, void_b] = pillars.day.void_branches();

    Board {
        pillars: PillarSet::from(pillars),
        time_known: pillars.hour.is_some(),
        bureau,
        polarity,
        polarity_label: polarity_label(polarity).to_string(),
        solar_term: governing.name().to_string(),
        palaces: build_palaces(bureau),
        day_void: [void_a.name().to_string(), void_b.name().to_string()],
        meta: BoardMeta {
            formula: BUREAU_FORMULA.to_string(),
            method: METHOD_LABEL.to_string(),
            original_time,
            solar_time,
            longitude,
            label: String::new(),
        },
    }
}

/// Four pillars of a chart input with the timestamps they were read from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PillarReading {
    pub pillars: FourPillars,
    /// Civil timestamp as supplied (default time filled in if absent)
    pub original_time: NaiveDateTime,
    /// Timestamp after true-solar correction
    pub solar_time: NaiveDateTime,
}

/// Validate a chart input and compute its four pillars.
///
/// This is the first half of [`compute_board`], for callers that only need
/// the pillars.
pub fn compute_pillars(input: &ChartInput, settings: &CalendarSettings) -> CalcResult<PillarReading> {
    settings.validate()?;
    input.validate(settings)?;
    let offset = settings.civil_offset()?;

    let original_time = input.civil_datetime(settings);
    let solar_time = true_solar_time(original_time, input.longitude, settings.reference_meridian());

    Ok(PillarReading {
        pillars: compute_four_pillars(solar_time, input.has_time(), offset),
        original_time,
        solar_time,
    })
}

/// Compute the full board for a chart input.
///
/// # Returns
///
/// * `Ok(Board)` - The complete board
/// * `Err(CalcError)` - If the input or settings fail validation
pub fn compute_board(input: &ChartInput, settings: &CalendarSettings) -> CalcResult<Board> {
    let PillarReading {
        pillars,
        original_time,
        solar_time,
    } = compute_pillars(input, settings)?;
    let offset = settings.civil_offset()?;

    let terms = terms_around(solar_time.year());
    // terms_around always holds a term before any instant of its middle year
    let governing = bureau::governing_term(&terms, civil_to_utc(solar_time, offset))
        .unwrap_or(SolarTerm::MinorCold);

    let mut board = derive_board(&pillars, governing, original_time, solar_time, input.longitude);
    board.meta.label = input.label.clone();

    tracing::debug!(
        bureau = board.bureau,
        polarity = board.polarity_label.as_str(),
        solar_term = board.solar_term.as_str(),
        "derived board"
    );
    Ok(board)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_for(date: &str, time: Option<&str>, longitude: Option<&str>) -> Board {
        let input = ChartInput::parse(date, time, longitude).unwrap();
        compute_board(&input, &CalendarSettings::default()).unwrap()
    }

    #[test]
    fn test_february_board() {
        let board = board_for("2024-02-10", Some("12:00"), None);
        assert_eq!(board.pillars.year.text, "甲辰");
        assert_eq!(board.pillars.month.text, "丙寅");
        assert_eq!(board.pillars.day.text, "丙辰");
        assert_eq!(board.pillars.hour.text, "甲午");
        assert_eq!(board.bureau, 6);
        assert_eq!(board.polarity, Polarity::Yang);
        assert_eq!(board.polarity_label, "阳遁");
        assert_eq!(board.solar_term, "立春");
        assert_eq!(board.palaces.len(), PALACE_COUNT);
        assert!(board.time_known);
    }

    #[test]
    fn test_summer_board_is_yin() {
        let board = board_for("2024-07-01", Some("08:30"), None);
        assert_eq!(board.solar_term, "夏至");
        assert_eq!(board.polarity, Polarity::Yin);
        assert_eq!(board.bureau, 9);
        assert_eq!(board.pillars.hour.text, "丙辰");
    }

    #[test]
    fn test_winter_solstice_board() {
        let board = board_for("2023-12-22", Some("18:00"), None);
        assert_eq!(board.solar_term, "冬至");
        assert_eq!(board.polarity, Polarity::Yang);
        assert_eq!(board.bureau, 3);
        assert_eq!(board.pillars.month.text, "甲子");
    }

    #[test]
    fn test_unknown_hour() {
        let board = board_for("2024-02-10", None, None);
        assert!(!board.time_known);
        assert!(board.pillars.hour.is_unknown());
        assert_eq!(board.pillars.hour.stem, UNKNOWN);
        assert_eq!(board.pillars.hour.branch, UNKNOWN);
        // Missing hour counts as branch 0: 5 + 2 + 10 + 1 = 18 -> 9
        assert_eq!(board.bureau, 9);
        // Day/month/year still resolve from the default noon
        assert_eq!(board.pillars.day.text, "丙辰");
    }

    #[test]
    fn test_longitude_shifts_solar_time() {
        let board = board_for("2024-02-10", Some("12:00"), Some("135"));
        assert_eq!(
            board.meta.solar_time,
            board.meta.original_time + chrono::TimeDelta::minutes(60)
        );
        assert_eq!(board.meta.longitude, Some(135.0));

        let west = board_for("2024-02-10", Some("12:00"), Some("105"));
        assert_eq!(
            west.meta.solar_time,
            west.meta.original_time - chrono::TimeDelta::minutes(60)
        );
        // 11:00 is still the 午 hour
        assert_eq!(west.pillars.hour.text, "甲午");
    }

    #[test]
    fn test_longitude_can_cross_night_zi() {
        // 22:30 at 135°E becomes 23:30 solar time: next day's pillar
        let shifted = board_for("2024-06-15", Some("22:30"), Some("135"));
        let next = board_for("2024-06-16", Some("10:00"), None);
        assert_eq!(shifted.pillars.day, next.pillars.day);
        assert_eq!(shifted.pillars.hour.branch, "子");
    }

    #[test]
    fn test_day_void_and_metadata() {
        let board = board_for("2024-02-10", Some("12:00"), None);
        // 丙辰 sits in the 甲寅 decade: void 子丑
        assert_eq!(board.day_void, ["子".to_string(), "丑".to_string()]);
        assert_eq!(board.meta.formula, BUREAU_FORMULA);
        assert_eq!(board.meta.method, METHOD_LABEL);
    }

    #[test]
    fn test_invalid_input_rejected() {
        let input = ChartInput::parse("1800-01-01", None, None).unwrap();
        let err = compute_board(&input, &CalendarSettings::default()).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_bureau_in_range_across_years() {
        let settings = CalendarSettings::default();
        for year in (1901..=2099).step_by(7) {
            for (month, day) in [(1, 1), (2, 4), (6, 21), (12, 31)] {
                for hour in [0, 11, 23] {
                    let date = chrono::NaiveDate::from_ymd_opt(year, month, day).unwrap();
                    let input = ChartInput::new(date, chrono::NaiveTime::from_hms_opt(hour, 0, 0), None);
                    let board = compute_board(&input, &settings).unwrap();
                    assert!((1..=9).contains(&board.bureau));
                    assert_eq!(board.palaces.len(), 9);
                }
            }
        }
    }

    #[test]
    fn test_deterministic_json() {
        let a = board_for("1999-09-09", Some("09:09"), Some("121.47"));
        let b = board_for("1999-09-09", Some("09:09"), Some("121.47"));
        assert_eq!(serde_json::to_string(&a).unwrap(), serde_json::to_string(&b).unwrap());
    }

    #[test]
    fn test_context_shape() {
        let board = board_for("2024-02-10", Some("12:00"), None);
        let context = board.to_context().unwrap();
        assert_eq!(context["bureau"], 6);
        assert_eq!(context["polarity"], "yang");
        assert_eq!(context["pillars"]["year"]["text"], "甲辰");
        assert_eq!(context["palaces"].as_array().unwrap().len(), 9);
        assert_eq!(context["meta"]["original_time"], "2024-02-10T12:00:00");

        let roundtrip: Board = serde_json::from_value(context).unwrap();
        assert_eq!(roundtrip, board);
    }

    #[test]
    fn test_pillar_elements_and_polarity() {
        let board = board_for("2024-02-10", Some("12:00"), None);
        let year = &board.pillars.year;
        assert_eq!(year.text, "甲辰");
        assert_eq!((year.stem_element.as_str(), year.stem_polarity.as_str()), ("木", "阳"));
        assert_eq!((year.branch_element.as_str(), year.branch_polarity.as_str()), ("土", "阳"));

        let hour = &board.pillars.hour;
        assert_eq!(hour.text, "甲午");
        assert_eq!(hour.branch_element, "火");

        let unknown = board_for("2024-02-10", None, None).pillars.hour;
        assert_eq!(unknown.stem_element, UNKNOWN);
        assert_eq!(unknown.branch_polarity, UNKNOWN);
    }

    #[test]
    fn test_compute_pillars_matches_board() {
        let settings = CalendarSettings::default();
        let input = ChartInput::parse("2024-06-15", Some("22:30"), Some("135")).unwrap();
        let reading = compute_pillars(&input, &settings).unwrap();
        let board = compute_board(&input, &settings).unwrap();

        assert_eq!(PillarSet::from(&reading.pillars), board.pillars);
        assert_eq!(reading.original_time, board.meta.original_time);
        assert_eq!(reading.solar_time, board.meta.solar_time);
        assert_eq!(reading.pillars.day.to_string(), "癸亥");
    }

    #[test]
    fn test_compute_pillars_rejects_bad_input() {
        let input = ChartInput::parse("2024-02-10", Some("12:00"), Some("200")).unwrap();
        let err = compute_pillars(&input, &CalendarSettings::default()).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_palace_lookup() {
        let board = board_for("2024-02-10", Some("12:00"), None);
        assert!(board.palace(3).unwrap().empty);
        assert!(board.palace(8).unwrap().horse);
        assert!(board.palace(10).is_none());
    }
}
