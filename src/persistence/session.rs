//! Session record load/save

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::settings::TableSettings;
use crate::sim::stats::{ColorCounts, ParityCounts, SessionStatistics, SpinTotals};
use crate::wheel::{Color, MAX_NUMBER, Number, SpinResult};

/// File name under the home directory
pub const SESSION_FILE_NAME: &str = ".justai_roulette_session.json";

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed session: {0}")]
    Json(#[from] serde_json::Error),
}

/// `$HOME/.justai_roulette_session.json`
pub fn default_session_path() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(SESSION_FILE_NAME))
}

/// Everything that survives a restart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionRecord {
    pub balance: f64,
    pub sound_enabled: bool,
    pub auto_spin_enabled: bool,
    /// Seconds, 10-120
    pub auto_spin_interval: u32,
    pub currency: String,
    /// Most recent first; written as `[number, "color"]` pairs
    pub history: Vec<(Number, Color)>,
    /// Keyed by the number as a string
    pub hot_counts: BTreeMap<String, u32>,
    pub color_counts: ColorCounts,
    pub parity_counts: ParityCounts,
    pub session_stats: SpinTotals,
}

impl Default for SessionRecord {
    fn default() -> Self {
        Self {
            balance: DEFAULT_BALANCE,
            sound_enabled: false,
            auto_spin_enabled: true,
            auto_spin_interval: DEFAULT_AUTO_SPIN_INTERVAL,
            currency: DEFAULT_CURRENCY.to_string(),
            history: Vec::new(),
            hot_counts: BTreeMap::new(),
            color_counts: ColorCounts::default(),
            parity_counts: ParityCounts::default(),
            session_stats: SpinTotals::default(),
        }
    }
}

/// History entry as found on disk
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoredHistoryEntry {
    Pair(i64, String),
    Legacy { n: i64, c: String },
    Unknown(serde_json::Value),
}

impl StoredHistoryEntry {
    fn into_entry(self) -> Option<(Number, Color)> {
        let (n, c) = match self {
            StoredHistoryEntry::Pair(n, c) | StoredHistoryEntry::Legacy { n, c } => (n, c),
            StoredHistoryEntry::Unknown(value) => {
                log::debug!("Skipping unreadable history entry {value}");
                return None;
            }
        };
        let n = Number::try_from(n).ok().filter(|n| *n <= MAX_NUMBER)?;
        // Trust the number over a stored color that doesn't parse
        let color = Color::from_str(&c).unwrap_or_else(|| SpinResult::new(n).color);
        Some((n, color))
    }
}

/// On-disk shape: every field optional, old key names accepted
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StoredRecord {
    balance: Option<f64>,
    sound_enabled: Option<bool>,
    auto_spin_enabled: Option<bool>,
    auto_enabled: Option<bool>,
    auto_spin_interval: Option<u32>,
    auto_interval: Option<u32>,
    currency: Option<String>,
    history: Vec<StoredHistoryEntry>,
    hot_counts: BTreeMap<String, u32>,
    color_counts: Option<ColorCounts>,
    parity_counts: Option<ParityCounts>,
    session_stats: Option<SpinTotals>,
}

impl StoredRecord {
    /// Fill missing fields from `defaults`
    fn into_record(self, defaults: SessionRecord) -> SessionRecord {
        let mut history: Vec<(Number, Color)> = self
            .history
            .into_iter()
            .filter_map(StoredHistoryEntry::into_entry)
            .collect();
        history.truncate(MAX_HISTORY);

        let hot_counts = self
            .hot_counts
            .into_iter()
            .filter(|(k, _)| k.trim().parse::<Number>().is_ok_and(|n| n <= MAX_NUMBER))
            .collect();

        SessionRecord {
            balance: self.balance.unwrap_or(defaults.balance),
            sound_enabled: self.sound_enabled.unwrap_or(defaults.sound_enabled),
            auto_spin_enabled: self
                .auto_spin_enabled
                .or(self.auto_enabled)
                .unwrap_or(defaults.auto_spin_enabled),
            auto_spin_interval: TableSettings::clamp_interval(
                self.auto_spin_interval
                    .or(self.auto_interval)
                    .unwrap_or(defaults.auto_spin_interval),
            ),
            currency: self.currency.unwrap_or(defaults.currency),
            history,
            hot_counts,
            color_counts: self.color_counts.unwrap_or_default(),
            parity_counts: self.parity_counts.unwrap_or_default(),
            session_stats: self.session_stats.unwrap_or_default(),
        }
    }
}

impl SessionRecord {
    /// Fresh session for a table configuration
    pub fn for_settings(settings: &TableSettings) -> Self {
        Self {
            balance: settings.default_balance,
            auto_spin_interval: settings.auto_spin_interval,
            currency: settings.currency.clone(),
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self, SessionError> {
        Self::from_json_for(json, &TableSettings::default())
    }

    /// Parse a record; fields it lacks come from `settings`
    pub fn from_json_for(json: &str, settings: &TableSettings) -> Result<Self, SessionError> {
        let stored: StoredRecord = serde_json::from_str(json)?;
        Ok(stored.into_record(Self::for_settings(settings)))
    }

    pub fn to_json(&self) -> Result<String, SessionError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load(path: &Path, settings: &TableSettings) -> Result<Self, SessionError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_for(&json, settings)
    }

    /// Load, or start a fresh session for `settings` if the file is missing
    /// or unreadable
    pub fn load_or_default(path: &Path, settings: &TableSettings) -> Self {
        if !path.exists() {
            log::info!("No session at {}, starting fresh", path.display());
            return Self::for_settings(settings);
        }
        match Self::load(path, settings) {
            Ok(record) => {
                log::info!(
                    "Loaded session from {} (balance {:.2}, {} spins)",
                    path.display(),
                    record.balance,
                    record.session_stats.spins
                );
                record
            }
            Err(e) => {
                log::warn!("Discarding session {}: {}", path.display(), e);
                Self::for_settings(settings)
            }
        }
    }

    /// Write to a temp file next to `path`, then rename over it
    pub fn save(&self, path: &Path) -> Result<(), SessionError> {
        let json = self.to_json()?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, path)?;
        log::info!("Session saved to {}", path.display());
        Ok(())
    }

    pub fn history_results(&self) -> Vec<SpinResult> {
        self.history
            .iter()
            .map(|&(number, color)| SpinResult { number, color })
            .collect()
    }

    /// Rebuild the statistics this record carries
    pub fn statistics(&self) -> SessionStatistics {
        let hot_counts = self
            .hot_counts
            .iter()
            .filter_map(|(k, &count)| k.trim().parse::<Number>().ok().map(|n| (n, count)))
            .collect();
        SessionStatistics {
            totals: self.session_stats,
            hot_counts,
            colors: self.color_counts,
            parity: self.parity_counts,
        }
    }

    /// Copy statistics into the record's flat fields
    pub fn set_statistics(&mut self, stats: &SessionStatistics) {
        self.session_stats = stats.totals;
        self.hot_counts = stats
            .hot_counts
            .iter()
            .map(|(n, count)| (n.to_string(), *count))
            .collect();
        self.color_counts = stats.colors;
        self.parity_counts = stats.parity;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("roulette-table-{}-{}.json", name, std::process::id()))
    }

    #[test]
    fn test_defaults() {
        let record = SessionRecord::from_json("{}").unwrap();
        assert_eq!(record, SessionRecord::default());
        assert_eq!(record.balance, 100.0);
        assert!(record.auto_spin_enabled);
        assert!(!record.sound_enabled);
        assert_eq!(record.auto_spin_interval, 40);
        assert_eq!(record.currency, "$");
    }

    #[test]
    fn test_legacy_shapes() {
        let json = r#"{
            "balance": 42.5,
            "auto_enabled": false,
            "auto_interval": 5,
            "history": [[17, "black"], {"n": 0, "c": "green"}, "garbage", [99, "red"], [3, "mauve"]],
            "hot_counts": {"17": 2, "x": 4, "0": 1}
        }"#;
        let record = SessionRecord::from_json(json).unwrap();
        assert_eq!(record.balance, 42.5);
        assert!(!record.auto_spin_enabled);
        assert_eq!(record.auto_spin_interval, 10);
        assert_eq!(
            record.history,
            vec![(17, Color::Black), (0, Color::Green), (3, Color::Red)]
        );
        assert_eq!(record.hot_counts.len(), 2);
        assert_eq!(record.statistics().hot_counts[&17], 2);
    }

    #[test]
    fn test_new_keys_win_over_legacy() {
        let json = r#"{ "auto_spin_interval": 60, "auto_interval": 20, "auto_spin_enabled": true, "auto_enabled": false }"#;
        let record = SessionRecord::from_json(json).unwrap();
        assert_eq!(record.auto_spin_interval, 60);
        assert!(record.auto_spin_enabled);
    }

    #[test]
    fn test_writes_array_history() {
        let record = SessionRecord {
            history: vec![(5, Color::Red)],
            ..SessionRecord::default()
        };
        let value: serde_json::Value = serde_json::from_str(&record.to_json().unwrap()).unwrap();
        assert_eq!(value["history"], serde_json::json!([[5, "red"]]));
        assert_eq!(value["color_counts"], serde_json::json!({"red": 0, "black": 0, "green": 0}));
        assert_eq!(
            value["session_stats"],
            serde_json::json!({"spins": 0, "bet_total": 0.0, "win_total": 0.0})
        );
    }

    #[test]
    fn test_save_load_round_trip() {
        let path = temp_path("round-trip");
        let mut stats = SessionStatistics::new();
        stats.record(SpinResult::new(17), 5.0, 180.0);
        let mut record = SessionRecord {
            balance: 275.0,
            sound_enabled: true,
            auto_spin_enabled: false,
            auto_spin_interval: 90,
            currency: "€".to_string(),
            history: (0..60).map(|i| (i % 37, SpinResult::new(i % 37).color)).collect(),
            ..SessionRecord::default()
        };
        record.set_statistics(&stats);
        record.save(&path).unwrap();

        let loaded = SessionRecord::load_or_default(&path, &TableSettings::default());
        assert_eq!(loaded.balance, 275.0);
        assert_eq!(loaded.currency, "€");
        assert!(!loaded.auto_spin_enabled);
        assert_eq!(loaded.auto_spin_interval, 90);
        assert_eq!(loaded.history.len(), MAX_HISTORY);
        assert_eq!(loaded.history[..], record.history[..MAX_HISTORY]);
        assert_eq!(loaded.statistics(), stats);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_malformed_file_falls_back() {
        let path = temp_path("malformed");
        std::fs::write(&path, "{ \"balance\": ").unwrap();
        let settings = TableSettings::default();
        assert!(matches!(
            SessionRecord::load(&path, &settings),
            Err(SessionError::Json(_))
        ));
        assert_eq!(SessionRecord::load_or_default(&path, &settings), SessionRecord::default());

        std::fs::write(&path, "\"not a session\"").unwrap();
        assert_eq!(SessionRecord::load_or_default(&path, &settings), SessionRecord::default());
        let _ = std::fs::remove_file(&path);

        assert_eq!(
            SessionRecord::load_or_default(&temp_path("missing"), &settings),
            SessionRecord::default()
        );
    }

    #[test]
    fn test_fresh_session_follows_settings() {
        let settings = TableSettings::from_json(
            r#"{ "default_balance": 500, "currency": "€", "auto_spin_interval": 60 }"#,
        )
        .unwrap();
        let fresh = SessionRecord::load_or_default(&temp_path("fresh-missing"), &settings);
        assert_eq!(fresh.balance, 500.0);
        assert_eq!(fresh.currency, "€");
        assert_eq!(fresh.auto_spin_interval, 60);
        assert!(fresh.auto_spin_enabled);
        assert!(!fresh.sound_enabled);

        let path = temp_path("fresh-corrupt");
        std::fs::write(&path, "{ \"balance\": ").unwrap();
        assert_eq!(SessionRecord::load_or_default(&path, &settings), fresh);
        let _ = std::fs::remove_file(&path);

        // stored fields win, missing ones come from the settings
        let partial = SessionRecord::from_json_for(r#"{ "balance": 42.0 }"#, &settings).unwrap();
        assert_eq!(partial.balance, 42.0);
        assert_eq!(partial.currency, "€");
        assert_eq!(partial.auto_spin_interval, 60);
    }
}
