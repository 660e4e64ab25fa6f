//! Roulette Table - single-table European roulette simulator
//!
//! Core modules:
//! - `sim`: Wager catalogue, table geometry, ledger, payouts and the spin lifecycle
//! - `wheel`: Wheel sequence, colors and pocket angles
//! - `persistence`: Session record load/save with legacy tolerance
//! - `settings`: Table limits, chip values and spin timing
//! - `history`: Bounded most-recent-first spin history
//! - `audio`: Sound cue boundary (playback lives outside the crate)

pub mod audio;
pub mod error;
pub mod history;
pub mod persistence;
pub mod settings;
pub mod sim;
pub mod wheel;

pub use error::{BlockReason, TableError, TableResult};
pub use history::SpinHistory;
pub use persistence::SessionRecord;
pub use settings::{SpinTiming, TableSettings};
pub use wheel::{Color, Number, SpinResult};

use glam::Vec2;

/// Table and wheel configuration constants
pub mod consts {
    /// Numbers on a European wheel (0-36)
    pub const POCKET_COUNT: usize = 37;
    /// Spin results kept in history
    pub const MAX_HISTORY: usize = 50;

    /// Default session values
    pub const DEFAULT_BALANCE: f64 = 100.0;
    pub const MAX_SINGLE_BET: f64 = 100.0;
    pub const DEFAULT_CURRENCY: &str = "$";
    pub const CHIP_VALUES: [f64; 6] = [0.5, 1.0, 5.0, 10.0, 20.0, 50.0];

    /// Auto-spin interval (seconds)
    pub const DEFAULT_AUTO_SPIN_INTERVAL: u32 = 40;
    pub const MIN_AUTO_SPIN_INTERVAL: u32 = 10;
    pub const MAX_AUTO_SPIN_INTERVAL: u32 = 120;
    /// Countdown tick period
    pub const AUTO_SPIN_TICK_MS: u64 = 1000;

    /// Wheel radii in wheel-logical units
    pub const WHEEL_OUTER_RADIUS: f32 = 152.0;
    pub const WHEEL_INNER_RADIUS: f32 = 96.0;
    /// Ball rest ring (midway across the number ring)
    pub const BALL_RING_RADIUS: f32 = (WHEEL_OUTER_RADIUS + WHEEL_INNER_RADIUS) / 2.0;
    /// Ball track outside the number ring
    pub const BALL_TRACK_RADIUS: f32 = WHEEL_OUTER_RADIUS + 10.0;

    /// Winner flash period and count while a settlement highlight is shown
    pub const HIGHLIGHT_FLASH_MS: u64 = 600;
    pub const HIGHLIGHT_FLASHES: u64 = 6;

    /// A spin pays "big" at this multiple of the stake
    pub const BIG_WIN_MULTIPLE: f64 = 10.0;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Format an amount as a currency string, e.g. `$1,234.50`
pub fn format_money(amount: f64, symbol: &str) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}{symbol}{grouped}.{:02}", cents % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_angle() {
        use std::f32::consts::PI;
        assert!((normalize_angle(2.5 * PI) - PI / 2.0).abs() < 0.001);
        assert!((normalize_angle(-2.5 * PI) - (-PI / 2.0)).abs() < 0.001);
        // 3π lands on the seam, either end is fine
        assert!((normalize_angle(3.0 * PI).abs() - PI).abs() < 0.001);
        assert!((normalize_angle(-PI / 2.0) - (-PI / 2.0)).abs() < 0.001);
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(0.0, "$"), "$0.00");
        assert_eq!(format_money(1234.5, "$"), "$1,234.50");
        assert_eq!(format_money(-75.25, "€"), "-€75.25");
        assert_eq!(format_money(1_000_000.0, "$"), "$1,000,000.00");
    }
}
