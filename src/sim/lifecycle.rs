//! Spin lifecycle state machine
//!
//! One spin runs Idle → Spinning → Dropping → Bouncing → Settled → Idle.
//! The driver is stepped once per scheduled timer; each step moves the ball,
//! reports how long to wait before the next step, or settles the spin.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::ledger::PlacedWager;
use super::payout::{self, PayoutReport};
use crate::consts::*;
use crate::error::{BlockReason, TableError, TableResult};
use crate::settings::SpinTiming;
use crate::wheel::{Number, SpinResult, WHEEL_SEQUENCE, pocket_angle};
use crate::{normalize_angle, polar_to_cartesian};

/// Phase tag without the spin data, for events and status display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinPhase {
    Idle,
    /// Ball circling the outer track
    Spinning,
    /// Ball spiralling toward the pockets
    Dropping,
    /// Ball settling into its pocket
    Bouncing,
    /// Result shown, winners highlighted
    Settled,
}

impl SpinPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpinPhase::Idle => "Idle",
            SpinPhase::Spinning => "Spinning",
            SpinPhase::Dropping => "Dropping",
            SpinPhase::Bouncing => "Bouncing",
            SpinPhase::Settled => "Settled",
        }
    }
}

/// A spin in flight
#[derive(Debug, Clone)]
pub struct ActiveSpin {
    pub id: u64,
    /// Drawn at trigger, before any animation
    pub result: SpinResult,
    /// Wagers captured at trigger
    pub snapshot: Vec<PlacedWager>,
    pub stake: f64,
    pub start_angle: f32,
    pub target_angle: f32,
}

#[derive(Debug, Clone)]
enum SpinState {
    Idle,
    Spinning { spin: ActiveSpin, step: u32 },
    Dropping { spin: ActiveSpin, step: u32 },
    Bouncing { spin: ActiveSpin, step: usize },
    Settled { spin_id: u64, report: PayoutReport },
}

/// Where the ball is after a step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BallPosition {
    /// Normalized to [-π, π)
    pub angle: f32,
    pub radius: f32,
    /// Wheel-logical coordinates relative to the hub
    pub position: Vec2,
}

impl BallPosition {
    fn new(angle: f32, radius: f32) -> Self {
        let angle = normalize_angle(angle);
        Self {
            angle,
            radius,
            position: polar_to_cartesian(radius, angle),
        }
    }
}

/// Everything the controller needs to apply a finished spin
#[derive(Debug, Clone, PartialEq)]
pub struct Settlement {
    pub spin_id: u64,
    /// Stake captured at trigger
    pub stake: f64,
    pub report: PayoutReport,
    /// The lifecycle stayed in `Settled` to highlight winners
    pub highlight: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// Ball moved; step again after `delay_ms`
    Moved {
        ball: BallPosition,
        phase: SpinPhase,
        delay_ms: u64,
    },
    Settled(Settlement),
}

// === Timing curves ===

impl SpinTiming {
    /// Delay after a spinning step with `remaining` steps still to run
    pub fn spin_delay_ms(&self, remaining: u32) -> u64 {
        let slowdown = 1.0 - remaining as f64 / self.spin_delay_span.max(1) as f64;
        let extra = (slowdown * self.spin_delay_range_ms as f64).floor().max(0.0);
        self.spin_base_delay_ms + extra as u64
    }

    /// Ball angle after spinning step `step` (0-based)
    pub fn spin_angle(&self, step: u32, start: f32, target: f32) -> f32 {
        let t = (step + 1) as f32 / self.spin_steps.max(1) as f32;
        start - (start - target) * t.powf(self.spin_easing)
    }

    fn drop_progress(&self, step: u32) -> f32 {
        step as f32 / self.drop_steps.max(1) as f32
    }

    /// Ball radius at dropping step `step` (0..=drop_steps)
    pub fn drop_radius(&self, step: u32) -> f32 {
        let outer = BALL_TRACK_RADIUS;
        let inner = BALL_RING_RADIUS * self.drop_inner_factor;
        outer - (outer - inner) * self.drop_progress(step).powf(self.drop_easing)
    }

    /// Delay after dropping step `step`
    pub fn drop_delay_ms(&self, step: u32) -> u64 {
        let extra = (self.drop_progress(step) as f64 * self.drop_delay_range_ms as f64).floor();
        self.drop_base_delay_ms + extra as u64
    }

    pub fn rest_radius(&self) -> f32 {
        BALL_RING_RADIUS * self.rest_factor
    }

    /// (radius, delay) of bounce `index`
    pub fn bounce(&self, index: usize) -> Option<(f32, u64)> {
        self.bounces
            .get(index)
            .map(|&(above, delay)| (self.rest_radius() + above, delay))
    }
}

/// Timed spin driver
#[derive(Debug, Clone)]
pub struct SpinLifecycle {
    state: SpinState,
    timing: SpinTiming,
    rng: Pcg32,
    next_spin_id: u64,
}

impl SpinLifecycle {
    /// Seeded from OS entropy
    pub fn new(timing: SpinTiming) -> Self {
        Self::with_seed(timing, rand::random::<u64>())
    }

    pub fn with_seed(timing: SpinTiming, seed: u64) -> Self {
        Self {
            state: SpinState::Idle,
            timing,
            rng: Pcg32::seed_from_u64(seed),
            next_spin_id: 1,
        }
    }

    pub fn timing(&self) -> &SpinTiming {
        &self.timing
    }

    pub fn phase(&self) -> SpinPhase {
        match self.state {
            SpinState::Idle => SpinPhase::Idle,
            SpinState::Spinning { .. } => SpinPhase::Spinning,
            SpinState::Dropping { .. } => SpinPhase::Dropping,
            SpinState::Bouncing { .. } => SpinPhase::Bouncing,
            SpinState::Settled { .. } => SpinPhase::Settled,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, SpinState::Idle)
    }

    /// Ball is moving
    pub fn is_spinning(&self) -> bool {
        matches!(
            self.state,
            SpinState::Spinning { .. } | SpinState::Dropping { .. } | SpinState::Bouncing { .. }
        )
    }

    /// Why the ledger is locked, if it is
    pub fn block_reason(&self) -> Option<BlockReason> {
        match self.state {
            SpinState::Idle => None,
            SpinState::Settled { .. } => Some(BlockReason::HighlightActive),
            _ => Some(BlockReason::SpinInProgress),
        }
    }

    pub fn ensure_idle(&self) -> TableResult<()> {
        match self.block_reason() {
            Some(reason) => Err(TableError::Blocked(reason)),
            None => Ok(()),
        }
    }

    /// Spin currently animating
    pub fn active_spin(&self) -> Option<&ActiveSpin> {
        match &self.state {
            SpinState::Spinning { spin, .. }
            | SpinState::Dropping { spin, .. }
            | SpinState::Bouncing { spin, .. } => Some(spin),
            _ => None,
        }
    }

    /// Report still on display while `Settled`
    pub fn highlighted(&self) -> Option<&PayoutReport> {
        match &self.state {
            SpinState::Settled { report, .. } => Some(report),
            _ => None,
        }
    }

    /// Uniform draw over the 37 pockets
    pub fn draw_number(&mut self) -> Number {
        WHEEL_SEQUENCE[self.rng.random_range(0..POCKET_COUNT)]
    }

    /// Start a spin carrying `snapshot`; the number is drawn here
    pub fn trigger(&mut self, snapshot: Vec<PlacedWager>, stake: f64) -> TableResult<u64> {
        self.ensure_idle()?;
        let number = self.draw_number();
        Ok(self.start(snapshot, stake, number))
    }

    /// Start a spin with a predetermined result
    pub(crate) fn trigger_with(
        &mut self,
        snapshot: Vec<PlacedWager>,
        stake: f64,
        number: Number,
    ) -> TableResult<u64> {
        self.ensure_idle()?;
        Ok(self.start(snapshot, stake, number))
    }

    fn start(&mut self, snapshot: Vec<PlacedWager>, stake: f64, number: Number) -> u64 {
        let target_angle = pocket_angle(number).unwrap_or(-std::f32::consts::FRAC_PI_2);
        let min = self.timing.min_rotations;
        let max = self.timing.max_rotations.max(min);
        let rotations = self.rng.random_range(min..=max) as f32;
        let start_angle = target_angle + TAU * rotations + self.rng.random::<f32>() * TAU;

        let id = self.next_spin_id;
        self.next_spin_id += 1;

        log::info!(
            "Spin {} triggered: {} wager(s), stake {:.2}",
            id,
            snapshot.len(),
            stake
        );
        self.state = SpinState::Spinning {
            spin: ActiveSpin {
                id,
                result: SpinResult::new(number),
                snapshot,
                stake,
                start_angle,
                target_angle,
            },
            step: 0,
        };
        id
    }

    /// Run one step of spin `spin_id`; `None` if that spin is no longer active
    pub fn step(&mut self, spin_id: u64) -> Option<StepOutcome> {
        if self.active_spin()?.id != spin_id {
            return None;
        }
        let state = std::mem::replace(&mut self.state, SpinState::Idle);
        let (state, outcome) = self.run_step(state);
        self.state = state;
        outcome
    }

    /// The step that finds the spinning phase exhausted immediately runs the
    /// first drop step.
    fn run_step(&self, mut state: SpinState) -> (SpinState, Option<StepOutcome>) {
        let timing = &self.timing;
        loop {
            state = match state {
                SpinState::Spinning { spin, step } if step < timing.spin_steps => {
                    let angle = timing.spin_angle(step, spin.start_angle, spin.target_angle);
                    let remaining = timing.spin_steps - step - 1;
                    let outcome = StepOutcome::Moved {
                        ball: BallPosition::new(angle, BALL_TRACK_RADIUS),
                        phase: SpinPhase::Spinning,
                        delay_ms: timing.spin_delay_ms(remaining),
                    };
                    log::trace!("Spin {} step {}", spin.id, step);
                    return (SpinState::Spinning { spin, step: step + 1 }, Some(outcome));
                }
                SpinState::Spinning { spin, .. } => SpinState::Dropping { spin, step: 0 },

                SpinState::Dropping { spin, step } => {
                    let ball = BallPosition::new(spin.target_angle, timing.drop_radius(step));
                    log::trace!("Spin {} drop {} at r={:.1}", spin.id, step, ball.radius);
                    // The innermost position is held for no time before the first bounce
                    let (next, delay_ms) = if step < timing.drop_steps {
                        (SpinState::Dropping { spin, step: step + 1 }, timing.drop_delay_ms(step))
                    } else {
                        (SpinState::Bouncing { spin, step: 0 }, 0)
                    };
                    let outcome = StepOutcome::Moved {
                        ball,
                        phase: SpinPhase::Dropping,
                        delay_ms,
                    };
                    return (next, Some(outcome));
                }

                SpinState::Bouncing { spin, step } => {
                    let Some((radius, delay_ms)) = timing.bounce(step) else {
                        let (state, settlement) = self.settle(spin);
                        return (state, Some(settlement));
                    };
                    let outcome = StepOutcome::Moved {
                        ball: BallPosition::new(spin.target_angle, radius),
                        phase: SpinPhase::Bouncing,
                        delay_ms,
                    };
                    return (SpinState::Bouncing { spin, step: step + 1 }, Some(outcome));
                }

                idle @ (SpinState::Idle | SpinState::Settled { .. }) => return (idle, None),
            };
        }
    }

    fn settle(&self, spin: ActiveSpin) -> (SpinState, StepOutcome) {
        let report = payout::resolve(&spin.snapshot, spin.result.number);
        let highlight = !report.matched.is_empty();
        log::info!(
            "Spin {} settled on {} ({}): stake {:.2}, winnings {:.2}",
            spin.id,
            spin.result.number,
            spin.result.color.as_str(),
            spin.stake,
            report.total_winnings
        );
        let settlement = Settlement {
            spin_id: spin.id,
            stake: spin.stake,
            report: report.clone(),
            highlight,
        };
        let state = if highlight {
            SpinState::Settled {
                spin_id: spin.id,
                report,
            }
        } else {
            SpinState::Idle
        };
        (state, StepOutcome::Settled(settlement))
    }

    /// Leave `Settled`; false if no highlight was showing
    pub fn dismiss_highlight(&mut self) -> bool {
        if matches!(self.state, SpinState::Settled { .. }) {
            self.state = SpinState::Idle;
            return true;
        }
        false
    }

    /// Highlight timer for `spin_id` ran out
    pub fn expire_highlight(&mut self, spin_id: u64) -> bool {
        match self.state {
            SpinState::Settled { spin_id: shown, .. } if shown == spin_id => self.dismiss_highlight(),
            _ => false,
        }
    }

    /// Abandon whatever is in flight without settling it
    pub fn reset(&mut self) {
        if let Some(spin) = self.active_spin() {
            log::info!("Spin {} abandoned", spin.id);
        }
        self.state = SpinState::Idle;
    }
}
