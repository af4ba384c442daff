//! # Palace Layout
//!
//! The nine palaces of the board, numbered in Luo Shu order (1 = 坎 north,
//! 5 = centre, 9 = 离 south). Each palace draws its star, gate, deity and
//! heaven stem from fixed tables at palette index `p = (palace - 1) + (bureau - 1)`:
//!
//! | Layer       | Table   | Index     |
//! |-------------|---------|-----------|
//! | star        | 9 stars | `p mod 9` |
//! | gate        | 8 gates | `p mod 8` |
//! | deity       | 8 gods  | `p mod 8` |
//! | heaven stem | 三奇六仪 | `p mod 9` |
//! | earth stem  | 三奇六仪 | `(palace - 1) mod 9` |
//!
//! The empty marker always sits on palace 3 and the horse marker on palace 8.
//! These are fixed placements, not derived from the chart.

use serde::{Deserialize, Serialize};

use crate::cycle::Element;

/// Number of palaces on a board
pub const PALACE_COUNT: usize = 9;

/// Palace carrying the empty (空亡) marker
pub const EMPTY_PALACE: u8 = 3;

/// Palace carrying the horse (驿马) marker
pub const HORSE_PALACE: u8 = 8;

pub const STARS: [&str; 9] = ["天蓬", "天芮", "天冲", "天辅", "天禽", "天心", "天柱", "天任", "天英"];

pub const GATES: [&str; 8] = ["休门", "死门", "伤门", "杜门", "开门", "惊门", "生门", "景门"];

pub const DEITIES: [&str; 8] = ["值符", "腾蛇", "太阴", "六合", "白虎", "玄武", "九地", "九天"];

/// The six instruments and three wonders in laying order
pub const QI_YI: [&str; 9] = ["戊", "己", "庚", "辛", "壬", "癸", "丁", "丙", "乙"];

/// Trigram and element of each palace, palace 1 first
const LUO_SHU: [(&str, Element); 9] = [
    ("坎", Element::Water),
    ("坤", Element::Earth),
    ("震", Element::Wood),
    ("巽", Element::Wood),
    ("中", Element::Earth),
    ("乾", Element::Metal),
    ("兑", Element::Metal),
    ("艮", Element::Earth),
    ("离", Element::Fire),
];

/// One palace of the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Palace {
    /// Luo Shu number, 1-9
    pub index: u8,
    pub star: String,
    pub gate: String,
    pub deity: String,
    pub heaven_stem: String,
    pub earth_stem: String,
    pub element: Element,
    /// Element as a character (木火土金水)
    pub element_name: String,
    pub trigram: String,
    /// 空亡 marker
    pub empty: bool,
    /// 驿马 marker
    pub horse: bool,
}

/// Lay out the nine palaces for a bureau (1-9).
pub fn build_palaces(bureau: u8) -> Vec<Palace> {
    let shift = usize::from(bureau.clamp(1, 9)) - 1;
    LUO_SHU
        .iter()
        .enumerate()
        .map(|(slot, (trigram, element))| {
            let p = slot + shift;
            let index = slot as u8 + 1;
            Palace {
                index,
                star: STARS[p % STARS.len()].to_string(),
                gate: GATES[p % GATES.len()].to_string(),
                deity: DEITIES[p % DEITIES.len()].to_string(),
                heaven_stem: QI_YI[p % QI_YI.len()].to_string(),
                earth_stem: QI_YI[slot % QI_YI.len()].to_string(),
                element: *element,
                element_name: element.name().to_string(),
                trigram: trigram.to_string(),
                empty: index == EMPTY_PALACE,
                horse: index == HORSE_PALACE,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_always_nine_palaces() {
        for bureau in 1..=9 {
            let palaces = build_palaces(bureau);
            assert_eq!(palaces.len(), PALACE_COUNT);
            let indices: Vec<u8> = palaces.iter().map(|p| p.index).collect();
            assert_eq!(indices, (1..=9).collect::<Vec<u8>>());
        }
    }

    #[test]
    fn test_bureau_one_is_identity_layout() {
        let palaces = build_palaces(1);
        assert_eq!(palaces[0].star, "天蓬");
        assert_eq!(palaces[0].gate, "休门");
        assert_eq!(palaces[0].deity, "值符");
        assert_eq!(palaces[0].heaven_stem, "戊");
        assert_eq!(palaces[0].trigram, "坎");
        // Ninth palace wraps the 8-entry tables
        assert_eq!(palaces[8].star, "天英");
        assert_eq!(palaces[8].gate, "休门");
        assert_eq!(palaces[8].deity, "值符");
        assert_eq!(palaces[8].heaven_stem, "乙");
    }

    #[test]
    fn test_rotation_by_bureau() {
        // bureau 6: palace 1 has p = 5
        let palaces = build_palaces(6);
        assert_eq!(palaces[0].star, "天心");
        assert_eq!(palaces[0].gate, "惊门");
        assert_eq!(palaces[0].deity, "玄武");
        assert_eq!(palaces[0].heaven_stem, "癸");
        // earth plate does not move
        assert_eq!(palaces[0].earth_stem, "戊");
        // palace 9: p = 13
        assert_eq!(palaces[8].star, "天禽");
        assert_eq!(palaces[8].gate, "惊门");
        assert_eq!(palaces[8].heaven_stem, "壬");
    }

    #[test]
    fn test_fixed_markers() {
        for bureau in 1..=9 {
            let palaces = build_palaces(bureau);
            let empty: Vec<u8> = palaces.iter().filter(|p| p.empty).map(|p| p.index).collect();
            let horse: Vec<u8> = palaces.iter().filter(|p| p.horse).map(|p| p.index).collect();
            assert_eq!(empty, vec![EMPTY_PALACE]);
            assert_eq!(horse, vec![HORSE_PALACE]);
        }
    }

    #[test]
    fn test_palace_elements() {
        let palaces = build_palaces(3);
        assert_eq!(palaces[8].element, Element::Fire);
        assert_eq!(palaces[8].element_name, "火");
        assert_eq!(palaces[4].trigram, "中");
    }
}
