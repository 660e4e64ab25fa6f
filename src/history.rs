//! Spin history
//!
//! Most recent result first, bounded at `MAX_HISTORY` entries.

use serde::{Deserialize, Serialize};

use crate::consts::MAX_HISTORY;
use crate::wheel::{Number, SpinResult};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpinHistory {
    entries: Vec<SpinResult>,
}

impl SpinHistory {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Build from stored entries (already most recent first), dropping the overflow
    pub fn from_entries(mut entries: Vec<SpinResult>) -> Self {
        entries.truncate(MAX_HISTORY);
        Self { entries }
    }

    /// Prepend a new result, dropping the oldest past the cap
    pub fn push(&mut self, result: SpinResult) {
        self.entries.insert(0, result);
        self.entries.truncate(MAX_HISTORY);
    }

    pub fn entries(&self) -> &[SpinResult] {
        &self.entries
    }

    /// Most recent result
    pub fn latest(&self) -> Option<SpinResult> {
        self.entries.first().copied()
    }

    /// Up to `n` most recent numbers
    pub fn recent_numbers(&self, n: usize) -> Vec<Number> {
        self.entries.iter().take(n).map(|r| r.number).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_most_recent_first() {
        let mut history = SpinHistory::new();
        assert!(history.latest().is_none());
        for n in [4, 19, 0] {
            history.push(SpinResult::new(n));
        }
        assert_eq!(history.recent_numbers(5), vec![0, 19, 4]);
        assert_eq!(history.latest(), Some(SpinResult::new(0)));
    }

    #[test]
    fn test_capped() {
        let mut history = SpinHistory::new();
        for n in 0..60u32 {
            history.push(SpinResult::new((n % 37) as Number));
        }
        assert_eq!(history.len(), MAX_HISTORY);
        // 59 % 37
        assert_eq!(history.latest().map(|r| r.number), Some(22));

        let restored = SpinHistory::from_entries(vec![SpinResult::new(1); 80]);
        assert_eq!(restored.len(), MAX_HISTORY);
    }
}
