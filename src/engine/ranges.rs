//! Range storage: spot-keyed action assignments, the tolerant JSON loader,
//! the materializing exporter, and combo-weighted range statistics.
//!
//! The loader is deliberately forgiving: unknown spot keys, unknown action
//! names, and unparseable hand strings are dropped and counted, never fatal. Only top-level JSON that fails to parse at all is
//! an error, so the caller decides how loudly to complain.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::{json, Map, Value};

use crate::engine::grid::{all_hand_classes, HandClass};
use crate::engine::models::{ActionKind, SpotKey};

// ---------------------------------------------------------------------------
// Action assignment
// ---------------------------------------------------------------------------

/// Which hand classes a spot assigns to which actions.
///
/// Sparse while edited: any class listed under no non-fold action is an
/// implicit fold. Updates go through [`ActionAssignment::with_toggled`],
/// which returns a fresh value instead of mutating in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionAssignment {
    by_action: BTreeMap<ActionKind, BTreeSet<HandClass>>,
}

impl ActionAssignment {
    pub fn new() -> ActionAssignment {
        ActionAssignment::default()
    }

    pub fn is_empty(&self) -> bool {
        self.by_action.values().all(|hands| hands.is_empty())
    }

    /// Hands explicitly listed under `action`.
    pub fn hands(&self, action: ActionKind) -> impl Iterator<Item = HandClass> + '_ {
        self.by_action
            .get(&action)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    /// Actions `hand` is explicitly listed under (including fold).
    pub fn listed_actions(&self, hand: HandClass) -> BTreeSet<ActionKind> {
        self.by_action
            .iter()
            .filter(|(_, hands)| hands.contains(&hand))
            .map(|(&action, _)| action)
            .collect()
    }

    /// Union of all hands assigned to any non-fold action.
    pub fn non_fold_hands(&self) -> BTreeSet<HandClass> {
        self.by_action
            .iter()
            .filter(|(&action, _)| action != ActionKind::Fold)
            .flat_map(|(_, hands)| hands.iter().copied())
            .collect()
    }

    /// The set of actions accepted as correct for `hand`.
    ///
    /// Membership in any non-fold action makes that action correct (a hand
    /// may be listed under several, a mixed strategy). A hand listed nowhere
    /// is a fold. A hand listed under fold *and* a non-fold action accepts
    /// fold as well.
    pub fn correct_actions(&self, hand: HandClass) -> BTreeSet<ActionKind> {
        let listed = self.listed_actions(hand);
        let mut correct: BTreeSet<ActionKind> = listed
            .iter()
            .copied()
            .filter(|&a| a != ActionKind::Fold)
            .collect();
        if correct.is_empty() || listed.contains(&ActionKind::Fold) {
            correct.insert(ActionKind::Fold);
        }
        correct
    }

    /// A copy with `hand` toggled under `action`: added if absent, removed
    /// if present. Empty action entries are dropped.
    pub fn with_toggled(&self, action: ActionKind, hand: HandClass) -> ActionAssignment {
        let mut next = self.clone();
        let entry = next.by_action.entry(action).or_default();
        if !entry.remove(&hand) {
            entry.insert(hand);
        }
        if entry.is_empty() {
            next.by_action.remove(&action);
        }
        next
    }

    /// The complete 169-class partition written at export time: the fold
    /// entry carries every class with no non-fold assignment, plus any
    /// explicit fold listings.
    pub fn materialize(&self) -> BTreeMap<ActionKind, BTreeSet<HandClass>> {
        let mut full = self.by_action.clone();
        let non_fold = self.non_fold_hands();
        let fold = full.entry(ActionKind::Fold).or_default();
        for class in all_hand_classes() {
            if !non_fold.contains(&class) {
                fold.insert(class);
            }
        }
        full.retain(|_, hands| !hands.is_empty());
        full
    }

    /// Combo-weighted action totals for this assignment.
    pub fn stats(&self) -> RangeStats {
        let mut stats = RangeStats::default();
        for class in all_hand_classes() {
            let w = class.combo_weight();
            let listed = self.listed_actions(class);
            let plays = listed.iter().any(|&a| a != ActionKind::Fold);
            if !plays {
                stats.fold_combos += w;
                continue;
            }
            if listed.contains(&ActionKind::Open) || listed.contains(&ActionKind::OpenShove) {
                stats.open_combos += w;
            }
            if listed.contains(&ActionKind::Threebet)
                || listed.contains(&ActionKind::ThreebetShove)
            {
                stats.threebet_combos += w;
            }
            if listed.contains(&ActionKind::Call) {
                stats.call_combos += w;
            }
        }
        stats
    }

    fn add(&mut self, action: ActionKind, hand: HandClass) {
        self.by_action.entry(action).or_default().insert(hand);
    }
}

/// Combo counts per action family, out of the 1326 total combinations.
/// Shoves count toward their base action, as the range editor reports them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RangeStats {
    pub open_combos: u32,
    pub threebet_combos: u32,
    pub call_combos: u32,
    pub fold_combos: u32,
}

impl RangeStats {
    pub fn pct(combos: u32) -> f64 {
        f64::from(combos) * 100.0 / f64::from(crate::engine::grid::TOTAL_COMBOS)
    }
}

// ---------------------------------------------------------------------------
// Spots and range sets
// ---------------------------------------------------------------------------

/// A fully specified decision context plus its correct-range assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spot {
    pub key: SpotKey,
    pub assignment: ActionAssignment,
}

impl Spot {
    pub fn new(key: SpotKey) -> Spot {
        Spot { key, assignment: ActionAssignment::new() }
    }
}

/// Where a training session's ranges come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeSource {
    Default,
    Personal,
}

/// Pick the authoritative range set, falling back to the other side when the
/// chosen one has no spots.
pub fn select_ranges<'a>(
    source: RangeSource,
    default: &'a RangeSet,
    personal: &'a RangeSet,
) -> &'a RangeSet {
    match source {
        RangeSource::Personal if !personal.is_empty() => personal,
        RangeSource::Personal => default,
        RangeSource::Default if !default.is_empty() => default,
        RangeSource::Default => personal,
    }
}

/// What the loader kept and what it dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub spots_loaded: usize,
    pub spots_skipped: usize,
    pub actions_skipped: usize,
    pub hands_dropped: usize,
}

impl LoadSummary {
    pub fn clean(&self) -> bool {
        self.spots_skipped == 0 && self.actions_skipped == 0 && self.hands_dropped == 0
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RangeLoadError {
    #[error("range data is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("range data is not a JSON object")]
    NotAnObject,
}

/// A collection of spots keyed by [`SpotKey`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RangeSet {
    spots: BTreeMap<SpotKey, Spot>,
}

impl RangeSet {
    pub fn new() -> RangeSet {
        RangeSet::default()
    }

    pub fn is_empty(&self) -> bool {
        self.spots.is_empty()
    }

    pub fn len(&self) -> usize {
        self.spots.len()
    }

    pub fn get(&self, key: &SpotKey) -> Option<&Spot> {
        self.spots.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = SpotKey> + '_ {
        self.spots.keys().copied()
    }

    pub fn spots(&self) -> impl Iterator<Item = &Spot> {
        self.spots.values()
    }

    pub fn insert(&mut self, spot: Spot) {
        self.spots.insert(spot.key, spot);
    }

    /// Import semantics: incoming spots replace same-key spots, everything
    /// else is kept.
    pub fn merge(&mut self, other: RangeSet) {
        self.spots.extend(other.spots);
    }

    /// Spots whose key describes an impossible action history (e.g. first
    /// in from the big blind). Display-only; these still grade normally.
    pub fn inconsistent_spots(&self) -> Vec<SpotKey> {
        self.keys().filter(|k| !k.is_consistent()).collect()
    }

    /// Parse a range file, either the `{version, spots}` envelope or a bare
    /// spot-map.
    pub fn from_json_str(raw: &str) -> Result<(RangeSet, LoadSummary), RangeLoadError> {
        let value: Value = serde_json::from_str(raw)?;
        RangeSet::from_value(&value)
    }

    pub fn from_value(value: &Value) -> Result<(RangeSet, LoadSummary), RangeLoadError> {
        let top = value.as_object().ok_or(RangeLoadError::NotAnObject)?;

        let empty = Map::new();
        let spots_obj = if let Some(spots) = top.get("spots").and_then(Value::as_object) {
            spots
        } else if top
            .values()
            .any(|v| v.as_object().is_some_and(|m| m.contains_key("position")))
        {
            // Legacy shape: the top level *is* the spot map.
            top
        } else {
            &empty
        };

        let mut set = RangeSet::new();
        let mut summary = LoadSummary::default();

        for (raw_key, raw_spot) in spots_obj {
            let Ok(key) = raw_key.parse::<SpotKey>() else {
                log::warn!("skipping spot with unparseable key {raw_key:?}");
                summary.spots_skipped += 1;
                continue;
            };
            let Some(body) = raw_spot.as_object() else {
                log::warn!("skipping spot {raw_key}: body is not an object");
                summary.spots_skipped += 1;
                continue;
            };

            let mut assignment = ActionAssignment::new();
            if let Some(actions) = body.get("actions").and_then(Value::as_object) {
                for (name, hands) in actions {
                    let Ok(action) = name.parse::<ActionKind>() else {
                        log::warn!("spot {key}: skipping unknown action {name:?}");
                        summary.actions_skipped += 1;
                        continue;
                    };
                    let Some(list) = hands.as_array() else {
                        log::warn!("spot {key}: action {name:?} is not a list");
                        summary.actions_skipped += 1;
                        continue;
                    };
                    for entry in list {
                        match entry.as_str().map(str::parse::<HandClass>) {
                            Some(Ok(hand)) => assignment.add(action, hand),
                            _ => summary.hands_dropped += 1,
                        }
                    }
                }
            }

            if let Some(pos) = body.get("position").and_then(Value::as_str) {
                if pos != key.position.as_str() {
                    log::warn!(
                        "spot {key}: body position {pos:?} disagrees with key, keeping the key"
                    );
                }
            }

            set.insert(Spot { key, assignment });
            summary.spots_loaded += 1;
        }

        if summary.hands_dropped > 0 {
            log::warn!("dropped {} unknown hand strings", summary.hands_dropped);
        }
        Ok((set, summary))
    }

    /// Export as a version-2 envelope with the fold partition materialized:
    /// every class missing from all non-fold actions is written under
    /// `"fold"`, so the file is total over the 169 classes.
    pub fn to_value(&self) -> Value {
        let mut spots = Map::new();
        for spot in self.spots.values() {
            let mut actions = Map::new();
            for (action, hands) in spot.assignment.materialize() {
                let list: Vec<Value> =
                    hands.iter().map(|h| Value::String(h.to_string())).collect();
                actions.insert(action.as_str().to_string(), Value::Array(list));
            }
            spots.insert(
                spot.key.to_string(),
                json!({
                    "table_type": spot.key.format.as_str(),
                    "position": spot.key.position.as_str(),
                    "stack": spot.key.stack,
                    "scenario": spot.key.scenario.to_string(),
                    "actions": Value::Object(actions),
                }),
            );
        }
        json!({ "version": 2, "spots": Value::Object(spots) })
    }

    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.to_value())
    }
}
