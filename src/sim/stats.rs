//! Running session statistics
//!
//! Updated once per settled spin. Parity counters are carried in the
//! persisted schema but settlement never touches them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::wheel::{Color, Number, Parity, SpinResult};

/// Spin count and money totals (`session_stats` in the session record)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpinTotals {
    pub spins: u32,
    pub bet_total: f64,
    pub win_total: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorCounts {
    pub red: u32,
    pub black: u32,
    pub green: u32,
}

impl ColorCounts {
    pub fn get(&self, color: Color) -> u32 {
        match color {
            Color::Red => self.red,
            Color::Black => self.black,
            Color::Green => self.green,
        }
    }

    fn increment(&mut self, color: Color) {
        let slot = match color {
            Color::Red => &mut self.red,
            Color::Black => &mut self.black,
            Color::Green => &mut self.green,
        };
        *slot += 1;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParityCounts {
    pub odd: u32,
    pub even: u32,
    pub zero: u32,
}

impl ParityCounts {
    pub fn get(&self, parity: Parity) -> u32 {
        match parity {
            Parity::Odd => self.odd,
            Parity::Even => self.even,
            Parity::Zero => self.zero,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionStatistics {
    pub totals: SpinTotals,
    /// Times each number has come up
    pub hot_counts: BTreeMap<Number, u32>,
    pub colors: ColorCounts,
    pub parity: ParityCounts,
}

impl SessionStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one settled spin into the totals
    pub fn record(&mut self, result: SpinResult, stake: f64, winnings: f64) {
        self.totals.spins += 1;
        self.totals.bet_total += stake;
        self.totals.win_total += winnings;
        *self.hot_counts.entry(result.number).or_insert(0) += 1;
        self.colors.increment(result.color);
    }

    pub fn spins(&self) -> u32 {
        self.totals.spins
    }

    pub fn profit(&self) -> f64 {
        self.totals.win_total - self.totals.bet_total
    }

    /// Most frequent numbers, ties broken by lower number
    pub fn hot_numbers(&self, limit: usize) -> Vec<(Number, u32)> {
        let mut counts: Vec<(Number, u32)> = self
            .hot_counts
            .iter()
            .filter(|&(_, &count)| count > 0)
            .map(|(&n, &count)| (n, count))
            .collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        counts.truncate(limit);
        counts
    }

    /// One-line summary, e.g. `Session: 3 spins / profit -$4.50`
    pub fn summary(&self, currency: &str) -> String {
        format!(
            "Session: {} spins / profit {}",
            self.totals.spins,
            crate::format_money(self.profit(), currency)
        )
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
