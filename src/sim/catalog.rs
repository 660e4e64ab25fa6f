//! Wager catalogue
//!
//! Every wager shape the table accepts, its payout ratio and its canonical
//! key. Call bets are fixed bundles of catalogue shapes with chip multiples.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::wheel::{MAX_NUMBER, Number, is_red};

/// Column of the layout (every third number)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Column {
    /// 1, 4, 7, ... 34 (bottom row)
    First,
    /// 2, 5, 8, ... 35 (middle row)
    Second,
    /// 3, 6, 9, ... 36 (top row)
    Third,
}

impl Column {
    pub const ALL: [Column; 3] = [Column::First, Column::Second, Column::Third];

    fn offset(&self) -> Number {
        match self {
            Column::First => 1,
            Column::Second => 2,
            Column::Third => 3,
        }
    }

    pub fn numbers(&self) -> Vec<Number> {
        (0..12).map(|i| self.offset() + 3 * i).collect()
    }

    pub fn label(&self) -> &'static str {
        match self {
            Column::First => "Column 1",
            Column::Second => "Column 2",
            Column::Third => "Column 3",
        }
    }
}

/// Dozen (contiguous third of 1-36)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dozen {
    First,
    Second,
    Third,
}

impl Dozen {
    pub const ALL: [Dozen; 3] = [Dozen::First, Dozen::Second, Dozen::Third];

    pub fn numbers(&self) -> Vec<Number> {
        let start = match self {
            Dozen::First => 1,
            Dozen::Second => 13,
            Dozen::Third => 25,
        };
        (start..start + 12).collect()
    }

    pub fn label(&self) -> &'static str {
        match self {
            Dozen::First => "1st 12",
            Dozen::Second => "2nd 12",
            Dozen::Third => "3rd 12",
        }
    }
}

/// Even-money outside bets (18 numbers each)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutsideBet {
    Low,
    High,
    Odd,
    Even,
    Red,
    Black,
}

impl OutsideBet {
    /// Order of the outside cells on the layout, left to right
    pub const LAYOUT_ORDER: [OutsideBet; 6] = [
        OutsideBet::Low,
        OutsideBet::Even,
        OutsideBet::Red,
        OutsideBet::Black,
        OutsideBet::Odd,
        OutsideBet::High,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            OutsideBet::Low => "1-18",
            OutsideBet::High => "19-36",
            OutsideBet::Odd => "Odd",
            OutsideBet::Even => "Even",
            OutsideBet::Red => "Red",
            OutsideBet::Black => "Black",
        }
    }

    pub fn from_label(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "1-18" | "low" => Some(OutsideBet::Low),
            "19-36" | "high" => Some(OutsideBet::High),
            "odd" => Some(OutsideBet::Odd),
            "even" => Some(OutsideBet::Even),
            "red" => Some(OutsideBet::Red),
            "black" => Some(OutsideBet::Black),
            _ => None,
        }
    }

    pub fn contains(&self, n: Number) -> bool {
        if n == 0 || n > MAX_NUMBER {
            return false;
        }
        match self {
            OutsideBet::Low => n <= 18,
            OutsideBet::High => n >= 19,
            OutsideBet::Odd => n % 2 == 1,
            OutsideBet::Even => n % 2 == 0,
            OutsideBet::Red => is_red(n),
            OutsideBet::Black => !is_red(n),
        }
    }

    pub fn numbers(&self) -> Vec<Number> {
        (1..=MAX_NUMBER).filter(|&n| self.contains(n)).collect()
    }
}

/// Canonical identity of a wager: its numbers, sorted ascending
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WagerKey(Vec<Number>);

impl WagerKey {
    pub fn from_numbers(numbers: &[Number]) -> Self {
        let mut sorted = numbers.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        Self(sorted)
    }

    pub fn numbers(&self) -> &[Number] {
        &self.0
    }
}

impl fmt::Display for WagerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|n| n.to_string()).collect();
        write!(f, "({})", parts.join(","))
    }
}

/// Layout position of a number in the 3x12 grid as (column 0-11, row 0-2 from the bottom)
fn grid_position(n: Number) -> Option<(u8, u8)> {
    if n == 0 || n > MAX_NUMBER {
        return None;
    }
    Some(((n - 1) / 3, (n - 1) % 3))
}

/// Grid adjacency (no diagonals); zero touches 1, 2 and 3
fn adjacent(a: Number, b: Number) -> bool {
    match (a, b) {
        (0, x) | (x, 0) => (1..=3).contains(&x),
        _ => match (grid_position(a), grid_position(b)) {
            (Some((ca, ra)), Some((cb, rb))) => {
                (ca == cb && ra.abs_diff(rb) == 1) || (ra == rb && ca.abs_diff(cb) == 1)
            }
            _ => false,
        },
    }
}

/// A wager shape from the catalogue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WagerShape {
    Straight(Number),
    /// Two adjacent numbers, ascending
    Split([Number; 2]),
    /// Zero trio (0/1/2 or 0/2/3), ascending
    Trio([Number; 3]),
    /// 2x2 block, ascending
    Corner([Number; 4]),
    Column(Column),
    Dozen(Dozen),
    Outside(OutsideBet),
}

impl WagerShape {
    pub fn straight(n: Number) -> Option<Self> {
        (n <= MAX_NUMBER).then_some(WagerShape::Straight(n))
    }

    pub fn split(a: Number, b: Number) -> Option<Self> {
        adjacent(a, b).then_some(WagerShape::Split([a.min(b), a.max(b)]))
    }

    pub fn trio(a: Number, b: Number, c: Number) -> Option<Self> {
        let mut nums = [a, b, c];
        nums.sort_unstable();
        matches!(nums, [0, 1, 2] | [0, 2, 3]).then_some(WagerShape::Trio(nums))
    }

    pub fn corner(numbers: [Number; 4]) -> Option<Self> {
        let mut nums = numbers;
        nums.sort_unstable();
        let (c0, r0) = grid_position(nums[0])?;
        // A block anchored at its lowest number: n, n+1, n+3, n+4 within one column pair
        let valid = r0 < 2 && c0 < 11 && nums == [nums[0], nums[0] + 1, nums[0] + 3, nums[0] + 4];
        valid.then_some(WagerShape::Corner(nums))
    }

    /// Lookup by the quick-bet panel names ("Red", "1st 12", "Col 2", ...)
    pub fn from_quick_name(name: &str) -> Option<Self> {
        if let Some(bet) = OutsideBet::from_label(name) {
            return Some(WagerShape::Outside(bet));
        }
        match name.trim().to_lowercase().as_str() {
            "1st 12" => Some(WagerShape::Dozen(Dozen::First)),
            "2nd 12" => Some(WagerShape::Dozen(Dozen::Second)),
            "3rd 12" => Some(WagerShape::Dozen(Dozen::Third)),
            "col 1" | "column 1" => Some(WagerShape::Column(Column::First)),
            "col 2" | "column 2" => Some(WagerShape::Column(Column::Second)),
            "col 3" | "column 3" => Some(WagerShape::Column(Column::Third)),
            _ => None,
        }
    }

    pub fn numbers(&self) -> Vec<Number> {
        match self {
            WagerShape::Straight(n) => vec![*n],
            WagerShape::Split(nums) => nums.to_vec(),
            WagerShape::Trio(nums) => nums.to_vec(),
            WagerShape::Corner(nums) => nums.to_vec(),
            WagerShape::Column(col) => col.numbers(),
            WagerShape::Dozen(dozen) => dozen.numbers(),
            WagerShape::Outside(bet) => bet.numbers(),
        }
    }

    pub fn contains(&self, n: Number) -> bool {
        match self {
            WagerShape::Outside(bet) => bet.contains(n),
            _ => self.numbers().contains(&n),
        }
    }

    /// Profit multiple paid per unit staked
    pub fn payout_ratio(&self) -> u32 {
        match self {
            WagerShape::Straight(_) => 35,
            WagerShape::Split(_) => 17,
            WagerShape::Trio(_) => 11,
            WagerShape::Corner(_) => 8,
            WagerShape::Column(_) | WagerShape::Dozen(_) => 2,
            WagerShape::Outside(_) => 1,
        }
    }

    pub fn key(&self) -> WagerKey {
        WagerKey::from_numbers(&self.numbers())
    }

    pub fn label(&self) -> String {
        let joined = |nums: &[Number]| {
            nums.iter()
                .map(|n| n.to_string())
                .collect::<Vec<_>>()
                .join("/")
        };
        match self {
            WagerShape::Straight(n) => format!("Straight {n}"),
            WagerShape::Split(nums) => format!("Split {}", joined(nums)),
            WagerShape::Trio(nums) => format!("Trio {}", joined(nums)),
            WagerShape::Corner(nums) => format!("Corner {}", joined(nums)),
            WagerShape::Column(col) => col.label().to_string(),
            WagerShape::Dozen(dozen) => dozen.label().to_string(),
            WagerShape::Outside(bet) => bet.label().to_string(),
        }
    }
}

/// One leg of a call bet: a catalogue shape staked at `chips` unit chips
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallLeg {
    pub shape: WagerShape,
    pub chips: u32,
}

const fn leg(shape: WagerShape, chips: u32) -> CallLeg {
    CallLeg { shape, chips }
}

const VOISINS: [CallLeg; 7] = [
    leg(WagerShape::Trio([0, 2, 3]), 2),
    leg(WagerShape::Split([4, 7]), 1),
    leg(WagerShape::Split([12, 15]), 1),
    leg(WagerShape::Split([18, 21]), 1),
    leg(WagerShape::Split([19, 22]), 1),
    leg(WagerShape::Corner([25, 26, 28, 29]), 2),
    leg(WagerShape::Split([32, 35]), 1),
];

const TIERS: [CallLeg; 6] = [
    leg(WagerShape::Split([5, 8]), 1),
    leg(WagerShape::Split([10, 11]), 1),
    leg(WagerShape::Split([13, 16]), 1),
    leg(WagerShape::Split([23, 24]), 1),
    leg(WagerShape::Split([27, 30]), 1),
    leg(WagerShape::Split([33, 36]), 1),
];

const ORPHELINS: [CallLeg; 5] = [
    leg(WagerShape::Straight(1), 1),
    leg(WagerShape::Split([6, 9]), 1),
    leg(WagerShape::Split([14, 17]), 1),
    leg(WagerShape::Split([17, 20]), 1),
    leg(WagerShape::Split([31, 34]), 1),
];

const JEU_ZERO: [CallLeg; 4] = [
    leg(WagerShape::Split([0, 3]), 1),
    leg(WagerShape::Split([12, 15]), 1),
    leg(WagerShape::Straight(26), 1),
    leg(WagerShape::Split([32, 35]), 1),
];

const SNAKE: [CallLeg; 12] = [
    leg(WagerShape::Straight(1), 1),
    leg(WagerShape::Straight(5), 1),
    leg(WagerShape::Straight(9), 1),
    leg(WagerShape::Straight(12), 1),
    leg(WagerShape::Straight(14), 1),
    leg(WagerShape::Straight(16), 1),
    leg(WagerShape::Straight(19), 1),
    leg(WagerShape::Straight(23), 1),
    leg(WagerShape::Straight(27), 1),
    leg(WagerShape::Straight(30), 1),
    leg(WagerShape::Straight(32), 1),
    leg(WagerShape::Straight(34), 1),
];

/// Named bundles following arcs of the wheel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CallBet {
    Voisins,
    Tiers,
    Orphelins,
    JeuZero,
    Snake,
}

impl CallBet {
    pub const ALL: [CallBet; 5] = [
        CallBet::Voisins,
        CallBet::Tiers,
        CallBet::Orphelins,
        CallBet::JeuZero,
        CallBet::Snake,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CallBet::Voisins => "Voisins",
            CallBet::Tiers => "Tiers",
            CallBet::Orphelins => "Orphelins",
            CallBet::JeuZero => "Jeu Zéro",
            CallBet::Snake => "Snake",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "voisins" | "voisins du zéro" | "voisins du zero" => Some(CallBet::Voisins),
            "tiers" | "tiers du cylindre" => Some(CallBet::Tiers),
            "orphelins" => Some(CallBet::Orphelins),
            "jeu zéro" | "jeu zero" => Some(CallBet::JeuZero),
            "snake" => Some(CallBet::Snake),
            _ => None,
        }
    }

    /// Fixed leg sequence; order and chip multiples are authoritative
    pub fn legs(&self) -> &'static [CallLeg] {
        match self {
            CallBet::Voisins => &VOISINS,
            CallBet::Tiers => &TIERS,
            CallBet::Orphelins => &ORPHELINS,
            CallBet::JeuZero => &JEU_ZERO,
            CallBet::Snake => &SNAKE,
        }
    }

    pub fn total_chips(&self) -> u32 {
        self.legs().iter().map(|l| l.chips).sum()
    }

    /// Distinct numbers covered by the bundle
    pub fn covered_numbers(&self) -> Vec<Number> {
        let mut nums: Vec<Number> = self.legs().iter().flat_map(|l| l.shape.numbers()).collect();
        nums.sort_unstable();
        nums.dedup();
        nums
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inside_shapes() {
        assert_eq!(WagerShape::straight(17), Some(WagerShape::Straight(17)));
        assert!(WagerShape::straight(37).is_none());

        assert_eq!(WagerShape::split(17, 14), Some(WagerShape::Split([14, 17])));
        assert!(WagerShape::split(10, 11).is_some());
        assert!(WagerShape::split(0, 3).is_some());
        // 3 and 4 are numeric neighbours but not grid neighbours
        assert!(WagerShape::split(3, 4).is_none());
        // diagonal
        assert!(WagerShape::split(1, 5).is_none());
        assert!(WagerShape::split(0, 4).is_none());

        assert!(WagerShape::corner([29, 25, 28, 26]).is_some());
        assert!(WagerShape::corner([3, 4, 6, 7]).is_none());
        assert!(WagerShape::corner([34, 35, 37, 38]).is_none());

        assert!(WagerShape::trio(3, 0, 2).is_some());
        assert!(WagerShape::trio(1, 2, 3).is_none());
    }

    #[test]
    fn test_payouts() {
        assert_eq!(WagerShape::Straight(0).payout_ratio(), 35);
        assert_eq!(WagerShape::Split([1, 2]).payout_ratio(), 17);
        assert_eq!(WagerShape::Corner([1, 2, 4, 5]).payout_ratio(), 8);
        assert_eq!(WagerShape::Column(Column::First).payout_ratio(), 2);
        assert_eq!(WagerShape::Dozen(Dozen::Third).payout_ratio(), 2);
        assert_eq!(WagerShape::Outside(OutsideBet::Red).payout_ratio(), 1);
    }

    #[test]
    fn test_groups() {
        assert_eq!(Column::Third.numbers().last(), Some(&36));
        assert_eq!(Column::First.numbers()[..3], [1, 4, 7]);
        assert_eq!(Dozen::Second.numbers(), (13..=24).collect::<Vec<_>>());
        for bet in OutsideBet::LAYOUT_ORDER {
            assert_eq!(bet.numbers().len(), 18, "{}", bet.label());
            assert!(!bet.contains(0));
        }
    }

    #[test]
    fn test_key_ignores_label_and_order() {
        let a = WagerKey::from_numbers(&[17, 14]);
        let b = WagerShape::Split([14, 17]).key();
        assert_eq!(a, b);
        assert_eq!(b.to_string(), "(14,17)");
    }

    #[test]
    fn test_quick_names() {
        assert_eq!(
            WagerShape::from_quick_name("Col 1"),
            Some(WagerShape::Column(Column::First))
        );
        assert_eq!(
            WagerShape::from_quick_name("2nd 12"),
            Some(WagerShape::Dozen(Dozen::Second))
        );
        assert_eq!(
            WagerShape::from_quick_name("black"),
            Some(WagerShape::Outside(OutsideBet::Black))
        );
        assert!(WagerShape::from_quick_name("Basket").is_none());
    }

    #[test]
    fn test_call_bet_reference_table() {
        let expected = [
            (CallBet::Voisins, 7, 9, 17),
            (CallBet::Tiers, 6, 6, 12),
            (CallBet::Orphelins, 5, 5, 8),
            (CallBet::JeuZero, 4, 4, 7),
            (CallBet::Snake, 12, 12, 12),
        ];
        for (call, legs, chips, covered) in expected {
            assert_eq!(call.legs().len(), legs, "{}", call.name());
            assert_eq!(call.total_chips(), chips, "{}", call.name());
            assert_eq!(call.covered_numbers().len(), covered, "{}", call.name());
        }
    }

    #[test]
    fn test_call_legs_are_catalogue_shapes() {
        for call in CallBet::ALL {
            for leg in call.legs() {
                let nums = leg.shape.numbers();
                let rebuilt = match leg.shape {
                    WagerShape::Straight(n) => WagerShape::straight(n),
                    WagerShape::Split([a, b]) => WagerShape::split(a, b),
                    WagerShape::Trio([a, b, c]) => WagerShape::trio(a, b, c),
                    WagerShape::Corner(block) => WagerShape::corner(block),
                    other => Some(other),
                };
                assert_eq!(rebuilt, Some(leg.shape), "{} leg {:?}", call.name(), nums);
            }
        }
    }

    #[test]
    fn test_call_bet_names() {
        for call in CallBet::ALL {
            assert_eq!(CallBet::from_name(call.name()), Some(call));
        }
        assert_eq!(CallBet::from_name("jeu zero"), Some(CallBet::JeuZero));
    }
}
