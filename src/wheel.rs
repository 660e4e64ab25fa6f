//! European single-zero wheel
//!
//! The wheel sequence fixes each pocket's physical position; colors are a
//! pure function of the number.

use serde::{Deserialize, Serialize};

use crate::consts::POCKET_COUNT;

/// A roulette number, 0-36
pub type Number = u8;

/// Highest number on the wheel
pub const MAX_NUMBER: Number = 36;

/// Red pockets (all other non-zero numbers are black)
pub const RED_NUMBERS: [Number; 18] = [
    1, 3, 5, 7, 9, 12, 14, 16, 18, 19, 21, 23, 25, 27, 30, 32, 34, 36,
];

/// Pocket order clockwise from zero
pub const WHEEL_SEQUENCE: [Number; POCKET_COUNT] = [
    0, 32, 15, 19, 4, 21, 2, 25, 17, 34, 6, 27, 13, 36, 11, 30, 8, 23, 10, 5, 24, 16, 33, 1, 20,
    14, 31, 9, 22, 18, 29, 7, 28, 12, 35, 3, 26,
];

/// Pocket color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Black,
    Green,
}

impl Color {
    pub fn as_str(&self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Black => "black",
            Color::Green => "green",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "red" => Some(Color::Red),
            "black" => Some(Color::Black),
            "green" => Some(Color::Green),
            _ => None,
        }
    }
}

/// Parity bucket of a number (zero is neither odd nor even)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Parity {
    Odd,
    Even,
    Zero,
}

impl Parity {
    pub fn of(n: Number) -> Self {
        match n {
            0 => Parity::Zero,
            n if n % 2 == 1 => Parity::Odd,
            _ => Parity::Even,
        }
    }
}

#[inline]
pub fn is_red(n: Number) -> bool {
    RED_NUMBERS.contains(&n)
}

pub fn color_of(n: Number) -> Color {
    if n == 0 {
        Color::Green
    } else if is_red(n) {
        Color::Red
    } else {
        Color::Black
    }
}

/// Index of `n` in the wheel sequence
pub fn pocket_index(n: Number) -> Option<usize> {
    WHEEL_SEQUENCE.iter().position(|&p| p == n)
}

/// Mid-angle of the pocket holding `n` (radians, 12 o'clock = -π/2, clockwise)
pub fn pocket_angle(n: Number) -> Option<f32> {
    let step = std::f32::consts::TAU / POCKET_COUNT as f32;
    pocket_index(n).map(|idx| -std::f32::consts::FRAC_PI_2 + idx as f32 * step + step / 2.0)
}

/// Outcome of one completed spin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpinResult {
    pub number: Number,
    pub color: Color,
}

impl SpinResult {
    pub fn new(number: Number) -> Self {
        Self {
            number,
            color: color_of(number),
        }
    }
}
