//! Table controller
//!
//! Owns every piece of session state and exposes the player-facing
//! operations. Rendering and input live elsewhere: pointer positions come in
//! already mapped to table-logical space, and everything the view needs is
//! queued as `TableEvent`s.

use glam::Vec2;

use super::autospin::{AutoSpinScheduler, TickAction};
use super::catalog::{CallBet, WagerShape};
use super::layout::{Candidate, TableLayout};
use super::ledger::{BetLimits, PlacedWager, Placement, WagerLedger};
use super::lifecycle::{BallPosition, Settlement, SpinLifecycle, SpinPhase, StepOutcome};
use super::payout::PayoutReport;
use super::scheduler::{TimerId, TimerKind, TimerQueue};
use super::stats::SessionStatistics;
use crate::audio::{AudioManager, AudioSink, SoundEffect};
use crate::error::{TableError, TableResult};
use crate::history::SpinHistory;
use crate::persistence::SessionRecord;
use crate::settings::TableSettings;
use crate::wheel::Number;

/// Notifications for the rendering collaborator
#[derive(Debug, Clone, PartialEq)]
pub enum TableEvent {
    WagerPlaced(Placement),
    WagerRemoved(PlacedWager),
    /// Several amounts changed at once (rebet, double); redraw all markers
    WagersRestaked { total_stake: f64 },
    WagersCleared,
    SpinStarted { spin_id: u64, stake: f64 },
    PhaseChanged(SpinPhase),
    BallMoved(BallPosition),
    Settled { report: PayoutReport, balance: f64 },
    HighlightCleared,
    /// Seconds until the next automatic spin
    Countdown(u32),
    BalanceAdded { amount: f64, balance: f64 },
    SessionReset,
    /// Persisted state changed; `to_record` is worth saving now
    SessionChanged,
}

#[derive(Debug)]
pub struct RouletteTable {
    settings: TableSettings,
    layout: TableLayout,
    balance: f64,
    currency: String,
    selected_chip: f64,
    ledger: WagerLedger,
    lifecycle: SpinLifecycle,
    autospin: AutoSpinScheduler,
    stats: SessionStatistics,
    history: SpinHistory,
    timers: TimerQueue,
    /// Wagers of the last spin that carried a stake
    last_wagers: Vec<PlacedWager>,
    last_report: Option<PayoutReport>,
    sound_enabled: bool,
    audio: AudioManager,
    events: Vec<TableEvent>,
}

impl RouletteTable {
    /// Restore a session; the wheel is seeded from OS entropy
    pub fn new(settings: TableSettings, record: SessionRecord) -> Self {
        let lifecycle = SpinLifecycle::new(settings.effective_timing());
        Self::with_lifecycle(settings, record, lifecycle)
    }

    /// Deterministic wheel for replays and tests
    pub fn with_seed(settings: TableSettings, record: SessionRecord, seed: u64) -> Self {
        let lifecycle = SpinLifecycle::with_seed(settings.effective_timing(), seed);
        Self::with_lifecycle(settings, record, lifecycle)
    }

    fn with_lifecycle(settings: TableSettings, record: SessionRecord, lifecycle: SpinLifecycle) -> Self {
        let mut audio = AudioManager::default();
        audio.set_muted(!record.sound_enabled);
        let mut table = Self {
            layout: TableLayout::standard(),
            balance: record.balance,
            currency: record.currency.clone(),
            selected_chip: settings.default_chip(),
            ledger: WagerLedger::new(),
            lifecycle,
            autospin: AutoSpinScheduler::new(record.auto_spin_enabled, record.auto_spin_interval),
            stats: record.statistics(),
            history: SpinHistory::from_entries(record.history_results()),
            timers: TimerQueue::new(),
            last_wagers: Vec::new(),
            last_report: None,
            sound_enabled: record.sound_enabled,
            audio,
            events: Vec::new(),
            settings,
        };
        table.autospin.arm(&mut table.timers, true);
        log::info!(
            "Table open: balance {}, auto-spin {} ({}s)",
            crate::format_money(table.balance, &table.currency),
            if table.autospin.enabled() { "on" } else { "off" },
            table.autospin.interval_secs()
        );
        table
    }

    /// Route sound cues to a playback backend
    pub fn with_audio(mut self, sink: Box<dyn AudioSink>) -> Self {
        self.audio = AudioManager::new(sink);
        self.audio.set_muted(!self.sound_enabled);
        self
    }

    // === Queries ===

    pub fn balance(&self) -> f64 {
        self.balance
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn total_stake(&self) -> f64 {
        self.ledger.total_stake()
    }

    pub fn wagers(&self) -> &[PlacedWager] {
        self.ledger.wagers()
    }

    pub fn selected_chip(&self) -> f64 {
        self.selected_chip
    }

    pub fn chip_values(&self) -> &[f64] {
        &self.settings.chip_values
    }

    pub fn phase(&self) -> SpinPhase {
        self.lifecycle.phase()
    }

    pub fn history(&self) -> &SpinHistory {
        &self.history
    }

    pub fn statistics(&self) -> &SessionStatistics {
        &self.stats
    }

    pub fn layout(&self) -> &TableLayout {
        &self.layout
    }

    pub fn last_report(&self) -> Option<&PayoutReport> {
        self.last_report.as_ref()
    }

    pub fn auto_spin_enabled(&self) -> bool {
        self.autospin.enabled()
    }

    pub fn auto_spin_interval(&self) -> u32 {
        self.autospin.interval_secs()
    }

    pub fn auto_spin_remaining(&self) -> u32 {
        self.autospin.remaining_secs()
    }

    pub fn sound_enabled(&self) -> bool {
        self.sound_enabled
    }

    /// Virtual clock (ms since the table opened)
    pub fn now_ms(&self) -> u64 {
        self.timers.now_ms()
    }

    /// When the next timer fires, for hosts that sleep between frames
    pub fn next_deadline(&self) -> Option<u64> {
        self.timers.next_deadline()
    }

    /// Take the events queued since the last drain
    pub fn drain_events(&mut self) -> Vec<TableEvent> {
        std::mem::take(&mut self.events)
    }

    fn limits(&self) -> BetLimits {
        BetLimits {
            balance: self.balance,
            max_single_chip: self.settings.max_single_bet,
        }
    }

    fn play(&mut self, effect: SoundEffect) {
        if self.sound_enabled {
            self.audio.play(effect);
        }
    }

    fn emit(&mut self, event: TableEvent) {
        self.events.push(event);
    }

    // === Betting ===

    /// Place the selected chip wherever `point` lands; `None` off the table
    pub fn click(&mut self, point: Vec2) -> TableResult<Option<Placement>> {
        let Some(candidate) = self.layout.resolve(point) else {
            return Ok(None);
        };
        let chip = self.selected_chip;
        self.place(&candidate, chip).map(Some)
    }

    pub fn place(&mut self, candidate: &Candidate, chip: f64) -> TableResult<Placement> {
        self.lifecycle.ensure_idle()?;
        let limits = self.limits();
        let placement = self.ledger.place(candidate, chip, &limits)?;
        self.play(SoundEffect::ChipPlace);
        self.emit(TableEvent::WagerPlaced(placement.clone()));
        Ok(placement)
    }

    /// Straight-up bet by number (keypad entry)
    pub fn place_number(&mut self, n: Number) -> TableResult<Placement> {
        let shape = WagerShape::straight(n).ok_or_else(|| TableError::UnknownBet(n.to_string()))?;
        self.place_shape(shape)
    }

    /// Bet from the quick panel: an outside, dozen or column name, or a call bet
    pub fn place_quick(&mut self, name: &str) -> TableResult<Vec<Placement>> {
        if let Some(call) = CallBet::from_name(name) {
            return self.place_call_bet(call);
        }
        let shape =
            WagerShape::from_quick_name(name).ok_or_else(|| TableError::UnknownBet(name.to_string()))?;
        self.place_shape(shape).map(|p| vec![p])
    }

    fn place_shape(&mut self, shape: WagerShape) -> TableResult<Placement> {
        let candidate = Candidate {
            shape,
            anchor: self.layout.anchor_for(&shape),
        };
        let chip = self.selected_chip;
        self.place(&candidate, chip)
    }

    /// Call bet at the selected chip per unit
    pub fn place_call_bet(&mut self, call: CallBet) -> TableResult<Vec<Placement>> {
        self.lifecycle.ensure_idle()?;
        let limits = self.limits();
        let placements = self
            .ledger
            .place_call_bet(call, self.selected_chip, &limits, &self.layout)?;
        self.play(SoundEffect::ChipPlace);
        for placement in &placements {
            self.emit(TableEvent::WagerPlaced(placement.clone()));
        }
        Ok(placements)
    }

    /// Remove the last wager added; no-op while the wheel is busy
    pub fn undo_last(&mut self) -> Option<PlacedWager> {
        if !self.lifecycle.is_idle() {
            return None;
        }
        let removed = self.ledger.undo_last()?;
        self.emit(TableEvent::WagerRemoved(removed.clone()));
        Some(removed)
    }

    /// Restore the last staked spin's wagers; returns how many were restored
    pub fn rebet(&mut self) -> TableResult<usize> {
        self.lifecycle.ensure_idle()?;
        if self.last_wagers.is_empty() {
            return Ok(0);
        }
        let limits = self.limits();
        self.ledger.rebet(&self.last_wagers, &limits)?;
        self.emit(TableEvent::WagersRestaked {
            total_stake: self.ledger.total_stake(),
        });
        Ok(self.ledger.len())
    }

    pub fn double(&mut self) -> TableResult<()> {
        self.lifecycle.ensure_idle()?;
        if self.ledger.is_empty() {
            return Ok(());
        }
        let limits = self.limits();
        self.ledger.double(&limits)?;
        self.play(SoundEffect::ChipPlace);
        self.emit(TableEvent::WagersRestaked {
            total_stake: self.ledger.total_stake(),
        });
        Ok(())
    }

    /// Empty the ledger and drop any winner highlight
    pub fn clear(&mut self) {
        self.ledger.clear();
        self.emit(TableEvent::WagersCleared);
        self.dismiss_highlight();
    }

    pub fn select_chip(&mut self, value: f64) -> TableResult<()> {
        if !self.settings.chip_values.contains(&value) {
            return Err(TableError::InvalidAmount(value));
        }
        self.selected_chip = value;
        Ok(())
    }

    // === Spinning ===

    /// Start a spin by hand
    pub fn spin(&mut self) -> TableResult<u64> {
        self.lifecycle.ensure_idle()?;
        let number = self.lifecycle.draw_number();
        self.start_spin(number)
    }

    fn start_spin(&mut self, number: Number) -> TableResult<u64> {
        let stake = self.ledger.total_stake();
        let snapshot = if stake > 0.0 && !self.ledger.is_empty() && stake <= self.balance {
            let snapshot = self.ledger.snapshot();
            self.last_wagers = snapshot.clone();
            snapshot
        } else {
            if !self.ledger.is_empty() {
                self.ledger.clear();
                self.emit(TableEvent::WagersCleared);
            }
            Vec::new()
        };
        let stake = if snapshot.is_empty() { 0.0 } else { stake };

        let spin_id = self.lifecycle.trigger_with(snapshot, stake, number)?;
        self.autospin.on_spin_started(&mut self.timers);
        self.play(SoundEffect::SpinStart);
        self.emit(TableEvent::SpinStarted { spin_id, stake });
        self.emit(TableEvent::PhaseChanged(SpinPhase::Spinning));
        self.run_spin_step(spin_id);
        Ok(spin_id)
    }

    fn run_spin_step(&mut self, spin_id: u64) {
        let before = self.lifecycle.phase();
        match self.lifecycle.step(spin_id) {
            None => log::debug!("Ignoring step for finished spin {}", spin_id),
            Some(StepOutcome::Moved {
                ball,
                phase,
                delay_ms,
            }) => {
                if phase != before {
                    self.emit(TableEvent::PhaseChanged(phase));
                }
                if phase == SpinPhase::Bouncing {
                    self.play(SoundEffect::BallClick);
                }
                self.emit(TableEvent::BallMoved(ball));
                self.timers.schedule(delay_ms, TimerKind::SpinStep { spin_id });
            }
            Some(StepOutcome::Settled(settlement)) => self.apply_settlement(settlement),
        }
    }

    fn apply_settlement(&mut self, settlement: Settlement) {
        let Settlement {
            spin_id,
            stake,
            report,
            highlight,
        } = settlement;

        self.balance = self.balance - stake + report.total_winnings;
        self.stats.record(report.result, stake, report.total_winnings);
        self.history.push(report.result);
        self.ledger.clear();

        if report.is_win() {
            self.play(if report.big_win {
                SoundEffect::BigWin
            } else {
                SoundEffect::Win
            });
        }
        log::info!(
            "{} | balance {}",
            report.headline(&self.currency),
            crate::format_money(self.balance, &self.currency)
        );

        self.emit(TableEvent::Settled {
            report: report.clone(),
            balance: self.balance,
        });
        if highlight {
            let highlight_ms = self.lifecycle.timing().highlight_ms;
            self.timers
                .schedule(highlight_ms, TimerKind::HighlightExpired { spin_id });
            self.emit(TableEvent::PhaseChanged(SpinPhase::Settled));
        } else {
            self.emit(TableEvent::PhaseChanged(SpinPhase::Idle));
        }
        self.last_report = Some(report);
        self.autospin.arm(&mut self.timers, true);
        self.emit(TableEvent::SessionChanged);
    }

    /// Drop the winner highlight early
    pub fn dismiss_highlight(&mut self) -> bool {
        if !self.lifecycle.dismiss_highlight() {
            return false;
        }
        self.emit(TableEvent::HighlightCleared);
        self.emit(TableEvent::PhaseChanged(SpinPhase::Idle));
        true
    }

    /// Move the virtual clock forward, firing every timer that comes due
    pub fn advance(&mut self, elapsed_ms: u64) {
        let until = self.timers.now_ms() + elapsed_ms;
        while let Some((id, kind)) = self.timers.pop_due(until) {
            match kind {
                TimerKind::SpinStep { spin_id } => self.run_spin_step(spin_id),
                TimerKind::AutoSpinTick => self.on_auto_spin_tick(id),
                TimerKind::HighlightExpired { spin_id } => {
                    if self.lifecycle.expire_highlight(spin_id) {
                        self.emit(TableEvent::HighlightCleared);
                        self.emit(TableEvent::PhaseChanged(SpinPhase::Idle));
                    }
                }
            }
        }
        self.timers.set_now(until);
    }

    fn on_auto_spin_tick(&mut self, id: TimerId) {
        let idle = self.lifecycle.is_idle();
        match self.autospin.on_tick(id, idle, &mut self.timers) {
            TickAction::Countdown(remaining) => self.emit(TableEvent::Countdown(remaining)),
            TickAction::Spin => {
                log::info!("Auto-spin");
                let number = self.lifecycle.draw_number();
                if let Err(e) = self.start_spin(number) {
                    log::warn!("Auto-spin skipped: {}", e);
                    self.autospin.arm(&mut self.timers, true);
                }
            }
            TickAction::Held | TickAction::Ignored => {}
        }
    }

    // === Session ===

    pub fn set_auto_spin_enabled(&mut self, enabled: bool) {
        self.autospin.set_enabled(enabled, &mut self.timers);
        if enabled {
            self.emit(TableEvent::Countdown(self.autospin.remaining_secs()));
        }
        self.emit(TableEvent::SessionChanged);
    }

    /// Clamped to 10-120 seconds; returns the value applied
    pub fn set_auto_spin_interval(&mut self, secs: u32) -> u32 {
        let idle = self.lifecycle.is_idle();
        let applied = self.autospin.set_interval(secs, idle);
        if idle {
            self.emit(TableEvent::Countdown(self.autospin.remaining_secs()));
        }
        self.emit(TableEvent::SessionChanged);
        applied
    }

    pub fn set_sound_enabled(&mut self, enabled: bool) {
        self.sound_enabled = enabled;
        self.audio.set_muted(!enabled);
        self.emit(TableEvent::SessionChanged);
    }

    pub fn set_currency(&mut self, symbol: &str) {
        self.currency = symbol.to_string();
        self.emit(TableEvent::SessionChanged);
    }

    /// Top up the balance; returns the new balance
    pub fn add_balance(&mut self, amount: f64) -> TableResult<f64> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(TableError::InvalidAmount(amount));
        }
        self.balance += amount;
        log::info!(
            "Added {} | balance {}",
            crate::format_money(amount, &self.currency),
            crate::format_money(self.balance, &self.currency)
        );
        self.emit(TableEvent::BalanceAdded {
            amount,
            balance: self.balance,
        });
        self.emit(TableEvent::SessionChanged);
        Ok(self.balance)
    }

    /// Back to the starting balance with empty statistics and history
    pub fn reset_session(&mut self) {
        self.lifecycle.reset();
        self.ledger.clear();
        self.balance = self.settings.default_balance;
        self.stats.reset();
        self.history.clear();
        self.last_wagers.clear();
        self.last_report = None;
        self.autospin.arm(&mut self.timers, true);
        log::info!("Session reset");
        self.emit(TableEvent::WagersCleared);
        self.emit(TableEvent::PhaseChanged(SpinPhase::Idle));
        self.emit(TableEvent::SessionReset);
        self.emit(TableEvent::SessionChanged);
    }

    /// Everything worth persisting
    pub fn to_record(&self) -> SessionRecord {
        let mut record = SessionRecord {
            balance: self.balance,
            sound_enabled: self.sound_enabled,
            auto_spin_enabled: self.autospin.enabled(),
            auto_spin_interval: self.autospin.interval_secs(),
            currency: self.currency.clone(),
            history: self
                .history
                .entries()
                .iter()
                .map(|r| (r.number, r.color))
                .collect(),
            ..SessionRecord::default()
        };
        record.set_statistics(&self.stats);
        record
    }

    /// Stop all timers and hand back the final state to persist
    pub fn close(&mut self) -> SessionRecord {
        self.timers.cancel_all();
        self.autospin.cancel(&mut self.timers);
        if self.lifecycle.is_spinning() {
            log::warn!("Closing with a spin in flight; stake not taken");
        }
        self.lifecycle.reset();
        self.to_record()
    }

    /// Settle a spin on a chosen number
    #[cfg(test)]
    pub(crate) fn spin_to(&mut self, number: Number) -> TableResult<u64> {
        debug_assert!(number <= crate::wheel::MAX_NUMBER);
        self.lifecycle.ensure_idle()?;
        self.start_spin(number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{AudioError, Tone};
    use crate::error::BlockReason;
    use crate::settings::SpinSpeed;
    use crate::sim::catalog::OutsideBet;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Long enough for any spin plus its highlight
    const SETTLE_MS: u64 = 20_000;

    fn record(balance: f64) -> SessionRecord {
        SessionRecord {
            balance,
            auto_spin_enabled: false,
            ..SessionRecord::default()
        }
    }

    fn table(balance: f64) -> RouletteTable {
        RouletteTable::with_seed(TableSettings::default(), record(balance), 42)
    }

    fn center(table: &RouletteTable, n: Number) -> Vec2 {
        table.layout().number_center(n).unwrap()
    }

    #[test]
    fn test_scenario_straight_win() {
        let mut t = table(100.0);
        t.select_chip(5.0).unwrap();
        let placed = t.click(center(&t, 17)).unwrap().unwrap();
        assert_eq!(placed.key, WagerShape::Straight(17).key());
        assert_eq!(t.total_stake(), 5.0);

        t.spin_to(17).unwrap();
        assert_eq!(t.phase(), SpinPhase::Spinning);
        // nothing is taken until settlement
        assert_eq!(t.balance(), 100.0);

        let total = t.lifecycle.timing().total_duration_ms();
        t.advance(total);
        assert_eq!(t.phase(), SpinPhase::Settled);
        assert_eq!(t.balance(), 275.0);
        let report = t.last_report().unwrap();
        assert_eq!(report.total_winnings, 180.0);
        assert!(report.big_win);
        assert!(t.wagers().is_empty());
        assert_eq!(t.statistics().spins(), 1);
        assert_eq!(t.history().latest().map(|r| r.number), Some(17));

        // highlight runs out on its own
        t.advance(3_600);
        assert_eq!(t.phase(), SpinPhase::Idle);
    }

    #[test]
    fn test_scenario_insufficient_balance() {
        let mut t = table(50.0);
        t.select_chip(10.0).unwrap();
        for n in 1..=5 {
            t.place_number(n).unwrap();
        }
        let before = t.wagers().to_vec();
        let err = t.place_number(6).unwrap_err();
        assert!(matches!(err, TableError::InsufficientBalance { .. }));
        assert_eq!(t.balance(), 50.0);
        assert_eq!(t.wagers(), &before[..]);
        assert_eq!(t.total_stake(), 50.0);
    }

    #[test]
    fn test_scenario_voisins() {
        let mut t = table(100.0);
        t.select_chip(1.0).unwrap();
        let placed = t.place_quick("Voisins").unwrap();
        assert_eq!(placed.len(), 7);
        assert_eq!(t.total_stake(), 9.0);
        assert_eq!(
            t.wagers().iter().map(|w| w.payout_ratio()).collect::<Vec<_>>(),
            vec![11, 17, 17, 17, 17, 8, 17]
        );
    }

    #[test]
    fn test_blocked_while_spinning() {
        let mut t = table(100.0);
        t.select_chip(1.0).unwrap();
        t.place_quick("Red").unwrap();
        t.spin_to(2).unwrap();

        let blocked = TableError::Blocked(BlockReason::SpinInProgress);
        assert_eq!(t.place_number(4).unwrap_err(), blocked);
        assert_eq!(t.spin().unwrap_err(), blocked);
        assert_eq!(t.double().unwrap_err(), blocked);
        assert!(t.undo_last().is_none());
        assert_eq!(t.total_stake(), 1.0);

        // 2 is black: lost, no highlight, straight back to idle
        t.advance(SETTLE_MS);
        assert_eq!(t.phase(), SpinPhase::Idle);
        assert_eq!(t.balance(), 99.0);
        t.place_number(4).unwrap();
    }

    #[test]
    fn test_highlight_blocks_until_dismissed() {
        let mut t = table(100.0);
        t.select_chip(1.0).unwrap();
        t.place_quick("Red").unwrap();
        t.spin_to(1).unwrap();
        t.advance(t.lifecycle.timing().total_duration_ms());
        assert_eq!(t.balance(), 101.0);
        assert_eq!(t.phase(), SpinPhase::Settled);

        let blocked = TableError::Blocked(BlockReason::HighlightActive);
        assert_eq!(t.place_quick("Black").unwrap_err(), blocked);
        assert_eq!(t.spin().unwrap_err(), blocked);

        assert!(t.dismiss_highlight());
        assert!(!t.dismiss_highlight());
        t.place_quick("Black").unwrap();
        // the stale highlight timer does nothing
        t.advance(SETTLE_MS);
        assert_eq!(t.phase(), SpinPhase::Idle);
    }

    #[test]
    fn test_events_for_one_spin() {
        let mut t = table(100.0);
        t.place_number(0).unwrap();
        t.drain_events();
        t.spin_to(0).unwrap();
        t.advance(SETTLE_MS);

        let events = t.drain_events();
        let moves = events
            .iter()
            .filter(|e| matches!(e, TableEvent::BallMoved(_)))
            .count();
        assert_eq!(moves, 40 + 13 + 4);
        let phases: Vec<SpinPhase> = events
            .iter()
            .filter_map(|e| match e {
                TableEvent::PhaseChanged(p) => Some(*p),
                _ => None,
            })
            .collect();
        assert_eq!(
            phases,
            vec![
                SpinPhase::Spinning,
                SpinPhase::Dropping,
                SpinPhase::Bouncing,
                SpinPhase::Settled,
                SpinPhase::Idle
            ]
        );
        assert!(events.iter().any(|e| matches!(
            e,
            TableEvent::Settled { report, .. } if report.result.number == 0
        )));
        assert!(t.drain_events().is_empty());
    }

    #[test]
    fn test_rebet_and_double_after_spin() {
        let mut t = table(100.0);
        t.select_chip(5.0).unwrap();
        t.place_quick("1st 12").unwrap();
        t.place_quick("Odd").unwrap();
        assert_eq!(t.rebet().unwrap(), 0);

        t.spin_to(36).unwrap();
        t.advance(SETTLE_MS);
        assert_eq!(t.balance(), 90.0);
        assert!(t.wagers().is_empty());

        assert_eq!(t.rebet().unwrap(), 2);
        assert_eq!(t.total_stake(), 10.0);
        t.double().unwrap();
        assert_eq!(t.total_stake(), 20.0);

        // an unstaked spin keeps the previous rebet snapshot
        t.clear();
        t.spin_to(3).unwrap();
        t.advance(SETTLE_MS);
        assert_eq!(t.rebet().unwrap(), 2);
        assert_eq!(t.total_stake(), 10.0);
    }

    #[test]
    fn test_zero_stake_spin_counts() {
        let mut t = table(100.0);
        t.spin_to(5).unwrap();
        t.advance(SETTLE_MS);
        assert_eq!(t.balance(), 100.0);
        assert_eq!(t.statistics().spins(), 1);
        assert_eq!(t.statistics().totals.bet_total, 0.0);
        assert_eq!(t.statistics().colors.red, 1);
    }

    #[test]
    fn test_auto_spin_fires_after_interval() {
        let settings = TableSettings::with_speed(SpinSpeed::Instant);
        let mut t = RouletteTable::with_seed(
            settings,
            SessionRecord {
                auto_spin_interval: 10,
                ..SessionRecord::default()
            },
            9,
        );
        assert!(t.auto_spin_enabled());
        t.advance(9_000);
        assert_eq!(t.auto_spin_remaining(), 1);
        assert_eq!(t.statistics().spins(), 0);

        // instant timing: the spin settles within the same advance
        t.advance(1_000);
        assert_eq!(t.statistics().spins(), 1);
        assert_eq!(t.auto_spin_remaining(), 10);

        t.advance(4_000);
        assert_eq!(t.auto_spin_remaining(), 6);
        // a manual spin restarts the countdown
        t.spin().unwrap();
        assert_eq!(t.auto_spin_remaining(), 10);
        t.advance(0);
        assert_eq!(t.phase(), SpinPhase::Idle);
        assert_eq!(t.set_auto_spin_interval(30), 30);
        assert_eq!(t.auto_spin_remaining(), 30);

        t.set_auto_spin_enabled(false);
        t.advance(60_000);
        assert_eq!(t.statistics().spins(), 2);
    }

    #[test]
    fn test_auto_spin_interval_held_during_spin() {
        let mut t = RouletteTable::with_seed(
            TableSettings::default(),
            SessionRecord {
                auto_spin_interval: 20,
                ..SessionRecord::default()
            },
            1,
        );
        t.spin_to(8).unwrap();
        assert_eq!(t.set_auto_spin_interval(50), 50);
        // not idle, so the running countdown isn't touched
        assert_eq!(t.auto_spin_remaining(), 20);
    }

    #[test]
    fn test_quick_names_and_chips() {
        let mut t = table(100.0);
        assert!(matches!(t.place_quick("Red/Black"), Err(TableError::UnknownBet(_))));
        assert!(matches!(t.place_number(37), Err(TableError::UnknownBet(_))));
        assert_eq!(t.select_chip(3.0), Err(TableError::InvalidAmount(3.0)));
        assert_eq!(t.selected_chip(), 0.5);

        let placed = t.place_quick("col 2").unwrap();
        assert_eq!(placed[0].amount, 0.5);
        assert!(t.click(Vec2::new(-50.0, -50.0)).unwrap().is_none());

        let removed = t.undo_last().unwrap();
        assert_eq!(removed.label, "Column 2");
        assert_eq!(t.total_stake(), 0.0);
    }

    #[test]
    fn test_sound_cues_follow_toggle() {
        struct Recording(Rc<RefCell<Vec<Tone>>>);
        impl AudioSink for Recording {
            fn play(&mut self, tone: Tone) -> Result<(), AudioError> {
                self.0.borrow_mut().push(tone);
                Ok(())
            }
        }

        let played = Rc::new(RefCell::new(Vec::new()));
        let mut t = table(100.0).with_audio(Box::new(Recording(played.clone())));
        t.place_quick("Even").unwrap();
        assert!(played.borrow().is_empty());

        t.set_sound_enabled(true);
        t.place_quick("Even").unwrap();
        assert_eq!(played.borrow().len(), 1);
        assert_eq!(played.borrow()[0], SoundEffect::ChipPlace.tone());
    }

    #[test]
    fn test_reset_and_close() {
        let mut t = RouletteTable::with_seed(TableSettings::default(), SessionRecord::default(), 3);
        t.set_currency("€");
        t.place_number(9).unwrap();
        t.spin_to(9).unwrap();
        t.advance(SETTLE_MS);
        assert_eq!(t.balance(), 117.5);

        let saved = t.to_record();
        assert_eq!(saved.balance, 117.5);
        assert_eq!(saved.currency, "€");
        assert_eq!(saved.history, vec![(9, crate::Color::Red)]);
        assert_eq!(saved.hot_counts.get("9"), Some(&1));
        assert_eq!(saved.session_stats.spins, 1);

        let restored = RouletteTable::with_seed(TableSettings::default(), saved.clone(), 4);
        assert_eq!(restored.history().len(), 1);
        assert_eq!(restored.statistics(), t.statistics());

        t.reset_session();
        assert_eq!(t.balance(), 100.0);
        assert!(t.history().is_empty());
        assert_eq!(t.statistics().spins(), 0);
        assert_eq!(t.rebet().unwrap(), 0);

        t.place_quick(OutsideBet::Low.label()).unwrap();
        t.spin().unwrap();
        let closed = t.close();
        assert!(t.next_deadline().is_none());
        assert_eq!(t.phase(), SpinPhase::Idle);
        assert_eq!(closed.balance, 100.0);
    }

    #[test]
    fn test_add_balance() {
        let mut t = table(10.0);
        assert_eq!(t.add_balance(0.0), Err(TableError::InvalidAmount(0.0)));
        assert_eq!(t.add_balance(-5.0), Err(TableError::InvalidAmount(-5.0)));
        assert!(matches!(t.add_balance(f64::NAN), Err(TableError::InvalidAmount(_))));
        assert!(t.add_balance(f64::INFINITY).is_err());
        assert_eq!(t.balance(), 10.0);
        t.drain_events();

        assert_eq!(t.add_balance(90.0).unwrap(), 100.0);
        assert_eq!(t.balance(), 100.0);
        assert_eq!(
            t.drain_events(),
            vec![
                TableEvent::BalanceAdded {
                    amount: 90.0,
                    balance: 100.0
                },
                TableEvent::SessionChanged
            ]
        );
        // the larger balance now covers a bigger wager
        t.select_chip(50.0).unwrap();
        t.place_number(4).unwrap();
        t.place_number(5).unwrap();
        assert_eq!(t.total_stake(), 100.0);
    }

    #[test]
    fn test_session_changed_after_settlement_and_reset() {
        let mut t = table(100.0);
        t.place_number(3).unwrap();
        t.drain_events();
        t.spin_to(3).unwrap();
        assert!(!t.drain_events().contains(&TableEvent::SessionChanged));

        t.advance(SETTLE_MS);
        let events = t.drain_events();
        let settled = events
            .iter()
            .position(|e| matches!(e, TableEvent::Settled { .. }))
            .unwrap();
        let changed = events
            .iter()
            .position(|e| *e == TableEvent::SessionChanged)
            .unwrap();
        assert!(changed > settled);

        t.reset_session();
        assert_eq!(t.drain_events().last(), Some(&TableEvent::SessionChanged));
        t.set_sound_enabled(true);
        assert_eq!(t.drain_events(), vec![TableEvent::SessionChanged]);
    }

    #[test]
    fn test_fresh_table_uses_configured_defaults() {
        let settings = TableSettings::from_json(
            r#"{ "default_balance": 500, "currency": "€", "auto_spin_interval": 60 }"#,
        )
        .unwrap();
        let record = SessionRecord::for_settings(&settings);
        let mut t = RouletteTable::with_seed(settings, record, 5);
        assert_eq!(t.balance(), 500.0);
        assert_eq!(t.currency(), "€");
        assert_eq!(t.auto_spin_interval(), 60);

        t.add_balance(25.0).unwrap();
        t.reset_session();
        assert_eq!(t.balance(), 500.0);
    }
}
