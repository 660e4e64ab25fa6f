//! Table settings and limits
//!
//! Loaded once at startup from an optional JSON file; anything missing or
//! unreadable falls back to the defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Animation speed presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SpinSpeed {
    #[default]
    Normal,
    Fast,
    /// No delays between steps (headless runs, tests)
    Instant,
}

impl SpinSpeed {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpinSpeed::Normal => "Normal",
            SpinSpeed::Fast => "Fast",
            SpinSpeed::Instant => "Instant",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "normal" => Some(SpinSpeed::Normal),
            "fast" | "turbo" => Some(SpinSpeed::Fast),
            "instant" => Some(SpinSpeed::Instant),
            _ => None,
        }
    }

    /// Multiplier applied to every step delay
    pub fn delay_factor(&self) -> f64 {
        match self {
            SpinSpeed::Normal => 1.0,
            SpinSpeed::Fast => 0.4,
            SpinSpeed::Instant => 0.0,
        }
    }
}

/// Step counts, delays and easing for the ball animation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpinTiming {
    // === Spinning ===
    /// Angular steps on the outer track
    pub spin_steps: u32,
    /// Delay after a step is base + range * (1 - remaining / span)
    pub spin_base_delay_ms: u64,
    pub spin_delay_range_ms: u64,
    pub spin_delay_span: u32,
    /// Angle easing exponent (> 1 decelerates)
    pub spin_easing: f32,
    pub min_rotations: u32,
    pub max_rotations: u32,

    // === Dropping ===
    pub drop_steps: u32,
    pub drop_base_delay_ms: u64,
    pub drop_delay_range_ms: u64,
    /// Radius easing exponent (< 1 is sub-linear)
    pub drop_easing: f32,
    /// Innermost drop radius as a fraction of the ball ring radius
    pub drop_inner_factor: f32,

    // === Bouncing ===
    /// Resting radius as a fraction of the ball ring radius
    pub rest_factor: f32,
    /// (radius above rest, delay) pairs
    pub bounces: Vec<(f32, u64)>,

    /// How long winning wagers stay highlighted after settlement
    pub highlight_ms: u64,
}

impl Default for SpinTiming {
    fn default() -> Self {
        Self {
            spin_steps: 40,
            spin_base_delay_ms: 30,
            spin_delay_range_ms: 40,
            spin_delay_span: 50,
            spin_easing: 1.5,
            min_rotations: 3,
            max_rotations: 5,

            drop_steps: 12,
            drop_base_delay_ms: 40,
            drop_delay_range_ms: 60,
            drop_easing: 0.8,
            drop_inner_factor: 0.3,

            rest_factor: 0.35,
            bounces: vec![(15.0, 120), (5.0, 100), (8.0, 80), (0.0, 60)],

            highlight_ms: HIGHLIGHT_FLASH_MS * HIGHLIGHT_FLASHES,
        }
    }
}

impl SpinTiming {
    /// Scale every delay by `factor` (< 1.0 = faster)
    pub fn scaled(&self, factor: f64) -> Self {
        let scale = |ms: u64| (ms as f64 * factor).round() as u64;
        Self {
            spin_base_delay_ms: scale(self.spin_base_delay_ms),
            spin_delay_range_ms: scale(self.spin_delay_range_ms),
            drop_base_delay_ms: scale(self.drop_base_delay_ms),
            drop_delay_range_ms: scale(self.drop_delay_range_ms),
            bounces: self.bounces.iter().map(|&(r, ms)| (r, scale(ms))).collect(),
            ..self.clone()
        }
    }

    /// Total animation time from trigger to settlement
    pub fn total_duration_ms(&self) -> u64 {
        let spin: u64 = (0..self.spin_steps)
            .map(|i| self.spin_delay_ms(self.spin_steps - 1 - i))
            .sum();
        let drop: u64 = (0..self.drop_steps).map(|s| self.drop_delay_ms(s)).sum();
        let bounce: u64 = self.bounces.iter().map(|&(_, ms)| ms).sum();
        spin + drop + bounce
    }
}

/// Table configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TableSettings {
    /// Starting balance for new and reset sessions
    pub default_balance: f64,
    /// Largest chip accepted in a single placement
    pub max_single_bet: f64,
    /// Chip denominations offered in the tray
    pub chip_values: Vec<f64>,
    /// Currency symbol for new sessions
    pub currency: String,
    /// Auto-spin interval for new sessions (seconds)
    pub auto_spin_interval: u32,
    pub spin_speed: SpinSpeed,
    pub timing: SpinTiming,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            default_balance: DEFAULT_BALANCE,
            max_single_bet: MAX_SINGLE_BET,
            chip_values: CHIP_VALUES.to_vec(),
            currency: DEFAULT_CURRENCY.to_string(),
            auto_spin_interval: DEFAULT_AUTO_SPIN_INTERVAL,
            spin_speed: SpinSpeed::Normal,
            timing: SpinTiming::default(),
        }
    }
}

impl TableSettings {
    /// Settings with a speed preset applied
    pub fn with_speed(speed: SpinSpeed) -> Self {
        Self {
            spin_speed: speed,
            ..Self::default()
        }
    }

    /// Timing after the speed preset is applied
    pub fn effective_timing(&self) -> SpinTiming {
        self.timing.scaled(self.spin_speed.delay_factor())
    }

    /// Smallest chip in the tray
    pub fn default_chip(&self) -> f64 {
        self.chip_values
            .iter()
            .copied()
            .filter(|v| v.is_finite() && *v > 0.0)
            .fold(None, |min: Option<f64>, v| Some(min.map_or(v, |m| m.min(v))))
            .unwrap_or(CHIP_VALUES[0])
    }

    pub fn clamp_interval(secs: u32) -> u32 {
        secs.clamp(MIN_AUTO_SPIN_INTERVAL, MAX_AUTO_SPIN_INTERVAL)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.auto_spin_interval = Self::clamp_interval(settings.auto_spin_interval);
        Ok(settings)
    }

    /// Load from a JSON file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring settings file {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }
}
