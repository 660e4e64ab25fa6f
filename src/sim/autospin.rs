//! Auto-spin countdown
//!
//! A one-second tick counts `remaining_secs` down while the wheel is idle.
//! The tick that reaches zero asks for a spin and reloads the interval.

use super::scheduler::{TimerId, TimerKind, TimerQueue};
use crate::consts::AUTO_SPIN_TICK_MS;
use crate::settings::TableSettings;

/// What a countdown tick asks the controller to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickAction {
    /// Not our tick, or auto-spin is off
    Ignored,
    /// Wheel busy; countdown held
    Held,
    /// Seconds left after this tick
    Countdown(u32),
    /// Countdown expired; trigger a spin
    Spin,
}

#[derive(Debug, Clone)]
pub struct AutoSpinScheduler {
    enabled: bool,
    interval_secs: u32,
    remaining_secs: u32,
    pending: Option<TimerId>,
}

impl AutoSpinScheduler {
    pub fn new(enabled: bool, interval_secs: u32) -> Self {
        let interval_secs = TableSettings::clamp_interval(interval_secs);
        Self {
            enabled,
            interval_secs,
            remaining_secs: interval_secs,
            pending: None,
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn interval_secs(&self) -> u32 {
        self.interval_secs
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }

    /// Schedule the next tick, replacing any pending one
    pub fn arm(&mut self, queue: &mut TimerQueue, reset: bool) {
        self.cancel(queue);
        if !self.enabled {
            return;
        }
        if reset {
            self.remaining_secs = self.interval_secs;
        }
        self.pending = Some(queue.schedule(AUTO_SPIN_TICK_MS, TimerKind::AutoSpinTick));
    }

    pub fn cancel(&mut self, queue: &mut TimerQueue) {
        if let Some(id) = self.pending.take() {
            queue.cancel(id);
        }
    }

    /// A spin started, by hand or by countdown
    pub fn on_spin_started(&mut self, queue: &mut TimerQueue) {
        self.cancel(queue);
        self.remaining_secs = self.interval_secs;
    }

    /// Handle a fired `AutoSpinTick`
    pub fn on_tick(&mut self, id: TimerId, wheel_idle: bool, queue: &mut TimerQueue) -> TickAction {
        if self.pending != Some(id) {
            return TickAction::Ignored;
        }
        self.pending = None;
        if !self.enabled {
            return TickAction::Ignored;
        }
        if !wheel_idle {
            self.arm(queue, false);
            return TickAction::Held;
        }

        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            self.remaining_secs = self.interval_secs;
            log::debug!("Auto-spin countdown expired");
            return TickAction::Spin;
        }
        self.arm(queue, false);
        TickAction::Countdown(self.remaining_secs)
    }

    /// Clamp and apply a new interval; returns the value applied
    pub fn set_interval(&mut self, secs: u32, wheel_idle: bool) -> u32 {
        self.interval_secs = TableSettings::clamp_interval(secs);
        if wheel_idle {
            self.remaining_secs = self.interval_secs;
        }
        self.interval_secs
    }

    pub fn set_enabled(&mut self, enabled: bool, queue: &mut TimerQueue) {
        self.enabled = enabled;
        if enabled {
            self.arm(queue, true);
        } else {
            self.cancel(queue);
        }
    }
}
