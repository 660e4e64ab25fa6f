//! Rejections surfaced to the player
//!
//! None of these end a session: each is reported as a transient status
//! message and leaves state untouched.

use std::fmt;

/// Why an action was refused in the current lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockReason {
    /// A spin is animating
    SpinInProgress,
    /// Winning wagers from the last spin are still highlighted
    HighlightActive,
}

impl fmt::Display for BlockReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockReason::SpinInProgress => f.write_str("wait for spin"),
            BlockReason::HighlightActive => f.write_str("clear the last result first"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TableError {
    #[error("Blocked: {0}")]
    Blocked(BlockReason),

    #[error("Insufficient balance: need {required:.2}, have {available:.2}")]
    InsufficientBalance { required: f64, available: f64 },

    #[error("Max bet: {max:.2} (tried {amount:.2})")]
    LimitExceeded { amount: f64, max: f64 },

    #[error("Invalid chip amount: {0}")]
    InvalidAmount(f64),

    #[error("Unknown bet: {0}")]
    UnknownBet(String),
}

pub type TableResult<T> = Result<T, TableError>;
