//! The 13x13 preflop hand grid: canonical hand classes, combo weights, and
//! grid distance.
//!
//! Convention (fixed once, used at every import/export boundary): rank 0 is
//! the ace and rank 12 the deuce; the diagonal holds pairs, the upper
//! triangle (row < col) suited hands, the lower triangle offsuit hands.

use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// Rank symbols in grid order: index 0 is the ace, index 12 the deuce.
pub const RANK_SYMBOLS: [char; 13] = [
    'A', 'K', 'Q', 'J', 'T', '9', '8', '7', '6', '5', '4', '3', '2',
];

/// Number of distinct hand classes on the grid.
pub const GRID_CLASSES: usize = 169;

/// Total concrete two-card combinations over all 169 classes
/// (13 pairs x 6 + 78 suited x 4 + 78 offsuit x 12).
pub const TOTAL_COMBOS: u32 = 1326;

/// A card rank as a grid index: 0 = A (strongest) .. 12 = 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rank(u8);

impl Rank {
    pub fn from_index(i: usize) -> Option<Rank> {
        (i < 13).then(|| Rank(i as u8))
    }

    pub fn from_symbol(c: char) -> Option<Rank> {
        let c = c.to_ascii_uppercase();
        RANK_SYMBOLS
            .iter()
            .position(|&r| r == c)
            .map(|i| Rank(i as u8))
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn symbol(self) -> char {
        RANK_SYMBOLS[self.0 as usize]
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// One of the 169 canonical preflop hand classes (pair, suited, or offsuit).
///
/// Invariants: `hi` is never weaker than `lo`; pairs have `hi == lo` and are
/// never suited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HandClass {
    hi: Rank,
    lo: Rank,
    suited: bool,
}

impl HandClass {
    /// Build a pair.
    pub fn pair(rank: Rank) -> HandClass {
        HandClass { hi: rank, lo: rank, suited: false }
    }

    /// Build a non-pair; the two ranks may come in either order, the
    /// stronger one becomes `hi`. Returns `None` for equal ranks.
    pub fn unpaired(a: Rank, b: Rank, suited: bool) -> Option<HandClass> {
        if a == b {
            return None;
        }
        let (hi, lo) = if a.index() < b.index() { (a, b) } else { (b, a) };
        Some(HandClass { hi, lo, suited })
    }

    /// Decode a grid coordinate: diagonal = pair, upper triangle = suited,
    /// lower triangle = offsuit.
    pub fn from_coord(row: usize, col: usize) -> Option<HandClass> {
        let r = Rank::from_index(row)?;
        let c = Rank::from_index(col)?;
        if row == col {
            Some(HandClass::pair(r))
        } else {
            HandClass::unpaired(r, c, row < col)
        }
    }

    /// The unique `(row, col)` this class occupies on the grid.
    pub fn coord(self) -> (usize, usize) {
        if self.is_pair() {
            (self.hi.index(), self.hi.index())
        } else if self.suited {
            (self.hi.index(), self.lo.index())
        } else {
            (self.lo.index(), self.hi.index())
        }
    }

    pub fn high(self) -> Rank {
        self.hi
    }

    pub fn low(self) -> Rank {
        self.lo
    }

    pub fn is_pair(self) -> bool {
        self.hi == self.lo
    }

    pub fn is_suited(self) -> bool {
        self.suited
    }

    /// Concrete card combinations this class stands for: 6 per pair,
    /// 4 per suited class, 12 per offsuit class.
    pub fn combo_weight(self) -> u32 {
        if self.is_pair() {
            6
        } else if self.suited {
            4
        } else {
            12
        }
    }

    /// Chebyshev distance between two classes on the grid.
    pub fn chebyshev(self, other: HandClass) -> usize {
        let (ar, ac) = self.coord();
        let (br, bc) = other.coord();
        ar.abs_diff(br).max(ac.abs_diff(bc))
    }
}

/// All 169 classes in row-major grid order.
pub fn all_hand_classes() -> impl Iterator<Item = HandClass> {
    (0..13).flat_map(|row| {
        (0..13).filter_map(move |col| HandClass::from_coord(row, col))
    })
}

impl fmt::Display for HandClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.hi, self.lo)?;
        if !self.is_pair() {
            write!(f, "{}", if self.suited { 's' } else { 'o' })?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HandParseError {
    #[error("hand string must be 2 or 3 characters: {0:?}")]
    Length(String),
    #[error("unknown rank character: {0:?}")]
    Rank(char),
    #[error("pairs take no suited/offsuit suffix: {0:?}")]
    PairSuffix(String),
    #[error("non-pair hands need an 's' or 'o' suffix: {0:?}")]
    MissingSuffix(String),
    #[error("ranks must be ordered strongest first: {0:?}")]
    Unordered(String),
}

impl FromStr for HandClass {
    type Err = HandParseError;

    /// Parse the canonical grammar: two ranks (equal for pairs), `s`/`o`
    /// suffix for non-pairs, case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let chars: Vec<char> = s.trim().chars().collect();
        if chars.len() != 2 && chars.len() != 3 {
            return Err(HandParseError::Length(s.to_string()));
        }
        let r1 = Rank::from_symbol(chars[0]).ok_or(HandParseError::Rank(chars[0]))?;
        let r2 = Rank::from_symbol(chars[1]).ok_or(HandParseError::Rank(chars[1]))?;
        if r1 == r2 {
            if chars.len() == 3 {
                return Err(HandParseError::PairSuffix(s.to_string()));
            }
            return Ok(HandClass::pair(r1));
        }
        if chars.len() == 2 {
            return Err(HandParseError::MissingSuffix(s.to_string()));
        }
        let suited = match chars[2].to_ascii_lowercase() {
            's' => true,
            'o' => false,
            _ => return Err(HandParseError::MissingSuffix(s.to_string())),
        };
        if r1.index() > r2.index() {
            return Err(HandParseError::Unordered(s.to_string()));
        }
        // r1 is strictly stronger here, so `unpaired` cannot fail.
        HandClass::unpaired(r1, r2, suited).ok_or(HandParseError::Length(s.to_string()))
    }
}

impl Serialize for HandClass {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for HandClass {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn h(s: &str) -> HandClass {
        s.parse().unwrap()
    }

    #[test]
    fn grid_is_a_bijection() {
        let mut labels = HashSet::new();
        let mut count = 0;
        for row in 0..13 {
            for col in 0..13 {
                let class = HandClass::from_coord(row, col).unwrap();
                assert!(labels.insert(class.to_string()), "duplicate {}", class);
                assert_eq!(class.coord(), (row, col));
                count += 1;
            }
        }
        assert_eq!(count, GRID_CLASSES);

        // Every label parses back to the same class.
        for class in all_hand_classes() {
            assert_eq!(h(&class.to_string()), class);
        }
    }

    #[test]
    fn suited_triangle_is_above_the_diagonal() {
        assert_eq!(HandClass::from_coord(0, 1).unwrap().to_string(), "AKs");
        assert_eq!(HandClass::from_coord(1, 0).unwrap().to_string(), "AKo");
        assert_eq!(HandClass::from_coord(0, 0).unwrap().to_string(), "AA");
        assert_eq!(HandClass::from_coord(12, 12).unwrap().to_string(), "22");
    }

    #[test]
    fn combo_weights_sum_to_1326() {
        let total: u32 = all_hand_classes().map(|c| c.combo_weight()).sum();
        assert_eq!(total, TOTAL_COMBOS);
        assert_eq!(h("AA").combo_weight(), 6);
        assert_eq!(h("AKs").combo_weight(), 4);
        assert_eq!(h("AKo").combo_weight(), 12);
    }

    #[test]
    fn chebyshev_distance_on_the_grid() {
        assert_eq!(h("AA").chebyshev(h("KK")), 1);
        assert_eq!(h("AA").chebyshev(h("AKs")), 1);
        assert_eq!(h("AA").chebyshev(h("AKo")), 1);
        assert_eq!(h("AA").chebyshev(h("QQ")), 2);
        assert!(h("AA").chebyshev(h("72o")) > 2);
        assert_eq!(h("JTs").chebyshev(h("JTs")), 0);
    }

    #[test]
    fn parser_rejects_malformed_strings() {
        assert!("".parse::<HandClass>().is_err());
        assert!("A".parse::<HandClass>().is_err());
        assert!("AKQs".parse::<HandClass>().is_err());
        assert!("AAs".parse::<HandClass>().is_err());
        assert!("AK".parse::<HandClass>().is_err());
        assert!("KAs".parse::<HandClass>().is_err());
        assert!("AXs".parse::<HandClass>().is_err());
        assert_eq!(h("aks"), h("AKs"));
    }
}
