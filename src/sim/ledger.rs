//! Wagers placed for the pending spin
//!
//! Repeats of the same key consolidate into one entry. Every mutation is
//! checked against the balance before it is applied, so a rejected action
//! leaves the ledger exactly as it was.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::catalog::{CallBet, WagerKey, WagerShape};
use super::layout::{Candidate, TableLayout};
use crate::error::{TableError, TableResult};
use crate::wheel::Number;

/// Balance and per-action chip cap a mutation is validated against
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BetLimits {
    pub balance: f64,
    pub max_single_chip: f64,
}

/// A wager on the table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedWager {
    pub shape: WagerShape,
    pub label: String,
    pub amount: f64,
    /// Identity for consolidation
    pub key: WagerKey,
    /// Where the chip stack is drawn
    pub anchor: Vec2,
}

impl PlacedWager {
    pub fn new(shape: WagerShape, amount: f64, anchor: Vec2) -> Self {
        Self {
            shape,
            label: shape.label(),
            amount,
            key: shape.key(),
            anchor,
        }
    }

    pub fn numbers(&self) -> Vec<Number> {
        self.shape.numbers()
    }

    pub fn payout_ratio(&self) -> u32 {
        self.shape.payout_ratio()
    }

    pub fn covers(&self, n: Number) -> bool {
        self.shape.contains(n)
    }
}

/// Result of a placement: the consolidated entry and whether it was new
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub key: WagerKey,
    /// Amount now riding on this key
    pub amount: f64,
    pub anchor: Vec2,
    pub created: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WagerLedger {
    wagers: Vec<PlacedWager>,
    total_stake: f64,
}

fn validate_chip(amount: f64) -> TableResult<()> {
    if amount.is_finite() && amount > 0.0 {
        Ok(())
    } else {
        Err(TableError::InvalidAmount(amount))
    }
}

impl WagerLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn wagers(&self) -> &[PlacedWager] {
        &self.wagers
    }

    pub fn total_stake(&self) -> f64 {
        self.total_stake
    }

    pub fn is_empty(&self) -> bool {
        self.wagers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.wagers.len()
    }

    pub fn get(&self, key: &WagerKey) -> Option<&PlacedWager> {
        self.wagers.iter().find(|w| &w.key == key)
    }

    /// Deep copy of the current wagers
    pub fn snapshot(&self) -> Vec<PlacedWager> {
        self.wagers.clone()
    }

    fn ensure_affordable(&self, extra: f64, limits: &BetLimits) -> TableResult<()> {
        let required = self.total_stake + extra;
        if required > limits.balance {
            return Err(TableError::InsufficientBalance {
                required,
                available: limits.balance,
            });
        }
        Ok(())
    }

    /// Add or consolidate without validation
    fn add(&mut self, shape: WagerShape, amount: f64, anchor: Vec2) -> Placement {
        self.total_stake += amount;
        let key = shape.key();
        if let Some(existing) = self.wagers.iter_mut().find(|w| w.key == key) {
            existing.amount += amount;
            return Placement {
                key,
                amount: existing.amount,
                anchor: existing.anchor,
                created: false,
            };
        }
        self.wagers.push(PlacedWager::new(shape, amount, anchor));
        Placement {
            key,
            amount,
            anchor,
            created: true,
        }
    }

    /// Place one chip on a candidate wager
    pub fn place(
        &mut self,
        candidate: &Candidate,
        chip: f64,
        limits: &BetLimits,
    ) -> TableResult<Placement> {
        validate_chip(chip)?;
        self.ensure_affordable(chip, limits)?;
        if chip > limits.max_single_chip {
            return Err(TableError::LimitExceeded {
                amount: chip,
                max: limits.max_single_chip,
            });
        }
        let placement = self.add(candidate.shape, chip, candidate.anchor);
        log::debug!(
            "Placed {:.2} on {} (now {:.2}, stake {:.2})",
            chip,
            placement.key,
            placement.amount,
            self.total_stake
        );
        Ok(placement)
    }

    /// Expand a call bet into its legs at `unit` per chip; all or nothing
    pub fn place_call_bet(
        &mut self,
        call: CallBet,
        unit: f64,
        limits: &BetLimits,
        layout: &TableLayout,
    ) -> TableResult<Vec<Placement>> {
        validate_chip(unit)?;
        let cost = unit * call.total_chips() as f64;
        self.ensure_affordable(cost, limits)?;
        if unit > limits.max_single_chip {
            return Err(TableError::LimitExceeded {
                amount: unit,
                max: limits.max_single_chip,
            });
        }
        let placements = call
            .legs()
            .iter()
            .map(|leg| {
                let anchor = layout.anchor_for(&leg.shape);
                self.add(leg.shape, unit * leg.chips as f64, anchor)
            })
            .collect();
        log::debug!(
            "Placed {} at {:.2}/chip ({:.2} total, stake {:.2})",
            call.name(),
            unit,
            cost,
            self.total_stake
        );
        Ok(placements)
    }

    /// Remove the most recently added entry
    pub fn undo_last(&mut self) -> Option<PlacedWager> {
        let removed = self.wagers.pop()?;
        self.recompute_total();
        Some(removed)
    }

    /// Replace the ledger with a copy of a previous spin's wagers
    pub fn rebet(&mut self, previous: &[PlacedWager], limits: &BetLimits) -> TableResult<()> {
        let total: f64 = previous.iter().map(|w| w.amount).sum();
        if total > limits.balance {
            return Err(TableError::InsufficientBalance {
                required: total,
                available: limits.balance,
            });
        }
        self.clear();
        for wager in previous {
            self.add(wager.shape, wager.amount, wager.anchor);
        }
        Ok(())
    }

    /// Double every wager
    pub fn double(&mut self, limits: &BetLimits) -> TableResult<()> {
        let required = self.total_stake * 2.0;
        if required > limits.balance {
            return Err(TableError::InsufficientBalance {
                required,
                available: limits.balance,
            });
        }
        for wager in &mut self.wagers {
            wager.amount *= 2.0;
        }
        self.recompute_total();
        Ok(())
    }

    pub fn clear(&mut self) {
        self.wagers.clear();
        self.total_stake = 0.0;
    }

    fn recompute_total(&mut self) {
        self.total_stake = self.wagers.iter().map(|w| w.amount).sum();
    }
}
