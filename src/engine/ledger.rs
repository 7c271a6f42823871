//! The per-user performance record: success/fail tallies per spot, global
//! totals, and an append-only answer history.
//!
//! All counters flow through [`PerformanceLedger::record_result`]; nothing
//! else mutates them except the explicit full [`reset`](PerformanceLedger::reset).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::engine::models::SpotKey;

/// Spots need at least this many attempts before their accuracy estimate is
/// worth ranking.
pub const LEAK_MIN_ATTEMPTS: u32 = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpotTally {
    #[serde(default)]
    pub success: u32,
    #[serde(default)]
    pub fail: u32,
}

impl SpotTally {
    pub fn attempts(self) -> u32 {
        self.success + self.fail
    }

    /// `None` until at least one answer is recorded.
    pub fn accuracy(self) -> Option<f64> {
        let total = self.attempts();
        (total > 0).then(|| f64::from(self.success) / f64::from(total))
    }
}

/// One judged answer, in chronological order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEvent {
    #[serde(with = "time::serde::rfc3339")]
    pub ts: OffsetDateTime,
    pub spot_key: SpotKey,
    pub success: bool,
}

/// A spot with enough data and poor enough accuracy to be worth revisiting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeakEntry {
    pub accuracy: f64,
    pub attempts: u32,
    pub spot_key: SpotKey,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceLedger {
    #[serde(default)]
    spots: BTreeMap<SpotKey, SpotTally>,
    #[serde(default)]
    total: SpotTally,
    #[serde(default)]
    history: Vec<HistoryEvent>,
}

impl PerformanceLedger {
    pub fn new() -> PerformanceLedger {
        PerformanceLedger::default()
    }

    /// The sole mutation entry point: bump the per-spot and global tallies
    /// and append a history event stamped now.
    pub fn record_result(&mut self, spot_key: SpotKey, success: bool) {
        self.record_result_at(spot_key, success, OffsetDateTime::now_utc());
    }

    /// Timestamp-explicit variant, used by tests.
    pub fn record_result_at(&mut self, spot_key: SpotKey, success: bool, ts: OffsetDateTime) {
        let tally = self.spots.entry(spot_key).or_default();
        if success {
            tally.success += 1;
            self.total.success += 1;
        } else {
            tally.fail += 1;
            self.total.fail += 1;
        }
        self.history.push(HistoryEvent { ts, spot_key, success });
    }

    /// Tally for one spot; zeroes when the spot was never drilled.
    pub fn tally(&self, spot_key: &SpotKey) -> SpotTally {
        self.spots.get(spot_key).copied().unwrap_or_default()
    }

    pub fn total(&self) -> SpotTally {
        self.total
    }

    pub fn accuracy(&self, spot_key: &SpotKey) -> Option<f64> {
        self.tally(spot_key).accuracy()
    }

    pub fn history(&self) -> &[HistoryEvent] {
        &self.history
    }

    /// Worst-known spots first: ascending accuracy over spots with at least
    /// `min_attempts` answers; ties broken toward more attempts (the better
    /// supported estimate). Display only, never used for gating.
    pub fn leak_ranking(&self, min_attempts: u32) -> Vec<LeakEntry> {
        let mut leaks: Vec<LeakEntry> = self
            .spots
            .iter()
            .filter(|(_, tally)| tally.attempts() >= min_attempts)
            .filter_map(|(&spot_key, tally)| {
                tally.accuracy().map(|accuracy| LeakEntry {
                    accuracy,
                    attempts: tally.attempts(),
                    spot_key,
                })
            })
            .collect();
        leaks.sort_by(|a, b| {
            a.accuracy
                .total_cmp(&b.accuracy)
                .then(b.attempts.cmp(&a.attempts))
        });
        leaks
    }

    /// Clear spot tallies, global totals, and history together.
    pub fn reset(&mut self) {
        self.spots.clear();
        self.total = SpotTally::default();
        self.history.clear();
    }

    pub fn from_json_str(raw: &str) -> Result<PerformanceLedger, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
