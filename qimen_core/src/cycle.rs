//! # Stems, Branches and Pillars
//!
//! The ten heavenly stems and twelve earthly branches interleave to form the
//! 60-term sexagenary cycle. A [`Pillar`] is one (stem, branch) pair.
//!
//! All index arithmetic goes through [`Stem::from_index`] / [`Branch::from_index`],
//! which take a Euclidean remainder, so negative day counts and year offsets
//! always land inside the table.
//!
//! ## Example
//!
//! ```rust
//! use qimen_core::cycle::{Branch, Pillar, Stem};
//!
//! let pillar = Pillar::from_indices(0, 4);
//! assert_eq!(pillar.to_string(), "甲辰");
//! assert_eq!(pillar.cycle_index(), Some(40));
//! assert_eq!(Stem::from_index(-1), Stem::Gui);
//! assert_eq!(Branch::from_index(14), Branch::Yin);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of heavenly stems
pub const STEM_COUNT: i64 = 10;

/// Number of earthly branches
pub const BRANCH_COUNT: i64 = 12;

// ============================================================================
// Element and Polarity
// ============================================================================

/// Five-phase element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Element {
    Wood,
    Fire,
    Earth,
    Metal,
    Water,
}

impl Element {
    /// Chinese character for the element
    pub const fn name(self) -> &'static str {
        match self {
            Self::Wood => "木",
            Self::Fire => "火",
            Self::Earth => "土",
            Self::Metal => "金",
            Self::Water => "水",
        }
    }
}

/// Yin/yang polarity.
///
/// Used both for individual stems/branches and for the board's escape
/// direction (阳遁 / 阴遁).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    Yang,
    Yin,
}

impl Polarity {
    /// Single-character label
    pub const fn name(self) -> &'static str {
        match self {
            Self::Yang => "阳",
            Self::Yin => "阴",
        }
    }

    fn from_parity(index: usize) -> Self {
        if index % 2 == 0 {
            Polarity::Yang
        } else {
            Polarity::Yin
        }
    }
}

// ============================================================================
// Stems
// ============================================================================

/// The ten heavenly stems, starting from 甲.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stem {
    Jia,
    Yi,
    Bing,
    Ding,
    Wu,
    Ji,
    Geng,
    Xin,
    Ren,
    Gui,
}

impl Stem {
    /// All stems in cycle order (0 = 甲, 9 = 癸)
    pub const ALL: [Stem; 10] = [
        Stem::Jia,
        Stem::Yi,
        Stem::Bing,
        Stem::Ding,
        Stem::Wu,
        Stem::Ji,
        Stem::Geng,
        Stem::Xin,
        Stem::Ren,
        Stem::Gui,
    ];

    /// Stem for any integer index, taken modulo 10.
    pub fn from_index(index: i64) -> Self {
        Self::ALL[index.rem_euclid(STEM_COUNT) as usize]
    }

    /// Position in the cycle, 0-9
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Chinese character
    pub const fn name(self) -> &'static str {
        match self {
            Self::Jia => "甲",
            Self::Yi => "乙",
            Self::Bing => "丙",
            Self::Ding => "丁",
            Self::Wu => "戊",
            Self::Ji => "己",
            Self::Geng => "庚",
            Self::Xin => "辛",
            Self::Ren => "壬",
            Self::Gui => "癸",
        }
    }

    /// Element; stems pair off two per element in generating order.
    pub const fn element(self) -> Element {
        match self {
            Self::Jia | Self::Yi => Element::Wood,
            Self::Bing | Self::Ding => Element::Fire,
            Self::Wu | Self::Ji => Element::Earth,
            Self::Geng | Self::Xin => Element::Metal,
            Self::Ren | Self::Gui => Element::Water,
        }
    }

    pub fn polarity(self) -> Polarity {
        Polarity::from_parity(self.index())
    }
}

impl fmt::Display for Stem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Branches
// ============================================================================

/// The twelve earthly branches, starting from 子.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Branch {
    Zi,
    Chou,
    Yin,
    Mao,
    Chen,
    Si,
    Wu,
    Wei,
    Shen,
    You,
    Xu,
    Hai,
}

impl Branch {
    /// All branches in cycle order (0 = 子, 11 = 亥)
    pub const ALL: [Branch; 12] = [
        Branch::Zi,
        Branch::Chou,
        Branch::Yin,
        Branch::Mao,
        Branch::Chen,
        Branch::Si,
        Branch::Wu,
        Branch::Wei,
        Branch::Shen,
        Branch::You,
        Branch::Xu,
        Branch::Hai,
    ];

    /// Branch for any integer index, taken modulo 12.
    pub fn from_index(index: i64) -> Self {
        Self::ALL[index.rem_euclid(BRANCH_COUNT) as usize]
    }

    /// Position in the cycle, 0-11
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Chinese character
    pub const fn name(self) -> &'static str {
        match self {
            Self::Zi => "子",
            Self::Chou => "丑",
            Self::Yin => "寅",
            Self::Mao => "卯",
            Self::Chen => "辰",
            Self::Si => "巳",
            Self::Wu => "午",
            Self::Wei => "未",
            Self::Shen => "申",
            Self::You => "酉",
            Self::Xu => "戌",
            Self::Hai => "亥",
        }
    }

    pub const fn element(self) -> Element {
        match self {
            Self::Zi | Self::Hai => Element::Water,
            Self::Yin | Self::Mao => Element::Wood,
            Self::Si | Self::Wu => Element::Fire,
            Self::Shen | Self::You => Element::Metal,
            Self::Chou | Self::Chen | Self::Wei | Self::Xu => Element::Earth,
        }
    }

    pub fn polarity(self) -> Polarity {
        Polarity::from_parity(self.index())
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Pillars
// ============================================================================

/// A (stem, branch) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pillar {
    pub stem: Stem,
    pub branch: Branch,
}

impl Pillar {
    pub const fn new(stem: Stem, branch: Branch) -> Self {
        Pillar { stem, branch }
    }

    /// Build a pillar from raw (possibly negative or oversized) indices.
    pub fn from_indices(stem_index: i64, branch_index: i64) -> Self {
        Pillar {
            stem: Stem::from_index(stem_index),
            branch: Branch::from_index(branch_index),
        }
    }

    /// Position in the 60-term cycle (0 = 甲子, 59 = 癸亥).
    ///
    /// Only pairs of matching parity occur in the cycle; mixed pairs give `None`.
    pub fn cycle_index(&self) -> Option<usize> {
        let stem = self.stem.index() as i64;
        let branch = self.branch.index() as i64;
        if (stem - branch) % 2 != 0 {
            return None;
        }
        // n ≡ stem (mod 10) and n ≡ branch (mod 12)
        Some((6 * stem - 5 * branch).rem_euclid(60) as usize)
    }

    /// The two xun-void (空亡) branches of this pillar's ten-day decade.
    pub fn void_branches(&self) -> [Branch; 2] {
        let first = self.branch.index() as i64 - self.stem.index() as i64 + 10;
        [Branch::from_index(first), Branch::from_index(first + 1)]
    }
}

impl fmt::Display for Pillar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.stem, self.branch)
    }
}
