//! Table simulation module
//!
//! All game logic lives here. Nothing in this module renders or touches the
//! platform:
//! - Virtual clock only; time moves when the host calls `advance`
//! - Seeded RNG only
//! - Ledger order is placement order

pub mod autospin;
pub mod catalog;
pub mod controller;
pub mod layout;
pub mod ledger;
pub mod lifecycle;
pub mod payout;
pub mod scheduler;
pub mod stats;

pub use autospin::{AutoSpinScheduler, TickAction};
pub use catalog::{CallBet, CallLeg, Column, Dozen, OutsideBet, WagerKey, WagerShape};
pub use controller::{RouletteTable, TableEvent};
pub use layout::{Candidate, Rect, TableLayout, ViewTransform};
pub use ledger::{BetLimits, PlacedWager, Placement, WagerLedger};
pub use lifecycle::{BallPosition, Settlement, SpinLifecycle, SpinPhase, StepOutcome};
pub use payout::{MatchedWager, PayoutReport, resolve};
pub use scheduler::{TimerId, TimerKind, TimerQueue};
pub use stats::{ColorCounts, ParityCounts, SessionStatistics, SpinTotals};
