//! Settlement arithmetic
//!
//! Pure function of a wager snapshot and the winning number.

use serde::{Deserialize, Serialize};

use super::ledger::PlacedWager;
use crate::consts::BIG_WIN_MULTIPLE;
use crate::wheel::{Number, SpinResult};

/// A wager that covered the winning number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedWager {
    pub wager: PlacedWager,
    /// Stake returned plus profit
    pub win_amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoutReport {
    pub result: SpinResult,
    pub total_stake: f64,
    pub total_winnings: f64,
    /// In ledger order
    pub matched: Vec<MatchedWager>,
    pub big_win: bool,
}

impl PayoutReport {
    /// Balance change once the stake is taken and winnings paid
    pub fn net(&self) -> f64 {
        self.total_winnings - self.total_stake
    }

    pub fn is_win(&self) -> bool {
        self.total_winnings > 0.0
    }

    /// Result line, e.g. `BIG WIN! 17 (black) - $180.00`
    pub fn headline(&self, currency: &str) -> String {
        let SpinResult { number, color } = self.result;
        if !self.is_win() {
            return format!("Result: {} ({})", number, color.as_str());
        }
        let prefix = if self.big_win { "BIG WIN!" } else { "WIN!" };
        format!(
            "{} {} ({}) - {}",
            prefix,
            number,
            color.as_str(),
            crate::format_money(self.total_winnings, currency)
        )
    }

    /// "Label: amount" lines for the winner highlight
    pub fn breakdown(&self, currency: &str) -> Vec<String> {
        self.matched
            .iter()
            .map(|m| format!("{}: {}", m.wager.label, crate::format_money(m.win_amount, currency)))
            .collect()
    }
}

/// Compute winnings for `wagers` when `winning_number` comes up
pub fn resolve(wagers: &[PlacedWager], winning_number: Number) -> PayoutReport {
    let total_stake: f64 = wagers.iter().map(|w| w.amount).sum();
    let matched: Vec<MatchedWager> = wagers
        .iter()
        .filter(|w| w.covers(winning_number))
        .map(|w| MatchedWager {
            wager: w.clone(),
            win_amount: w.amount * (w.payout_ratio() + 1) as f64,
        })
        .collect();
    let total_winnings: f64 = matched.iter().map(|m| m.win_amount).sum();
    let max_ratio = matched.iter().map(|m| m.wager.payout_ratio()).max();

    let big_win = total_winnings > 0.0
        && (total_winnings >= total_stake * BIG_WIN_MULTIPLE || max_ratio.is_some_and(|r| r >= 35));

    PayoutReport {
        result: SpinResult::new(winning_number),
        total_stake,
        total_winnings,
        matched,
        big_win,
    }
}
