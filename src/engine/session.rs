//! The caller-facing facade: deal a new spot, judge an answer, manage range
//! sources, and reset performance. The presentation layer owns the
//! [`TrainingSession`] value; the trainer never keeps ambient drill state.

use std::collections::BTreeSet;

use rand::Rng;

use crate::engine::evaluator::{evaluate, Verdict};
use crate::engine::grid::HandClass;
use crate::engine::ledger::{LeakEntry, PerformanceLedger, LEAK_MIN_ATTEMPTS};
use crate::engine::models::{ActionKind, Position, Scenario, SpotKey, TableFormat, STACKS};
use crate::engine::ranges::{
    select_ranges, LoadSummary, RangeLoadError, RangeSet, RangeSource,
};
use crate::engine::scheduler::{
    draw_any_hand, draw_hand, pick_leak_spot, pick_spot, LeakFocus, SpotFilter,
};
use crate::engine::storage::{StateStore, StorageKind, StoreError, DEFAULT_RANGES_USER};

/// How the next spot is chosen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrainingMode {
    /// Synthetic parameters, uniform hand, no grading.
    Free,
    /// Range-backed drilling with adaptive spot selection.
    Drill,
    /// Drilling restricted to unmastered spots.
    LeakDrill(LeakFocus),
}

/// One dealt drill, owned by the caller. Replaced wholesale on the next
/// "new spot"; the answered flag stops double scoring of the same draw.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingSession {
    pub spot_key: Option<SpotKey>,
    pub format: TableFormat,
    pub position: Position,
    pub stack: u32,
    pub scenario: Option<Scenario>,
    pub hand: HandClass,
    answered: bool,
    last_feedback: Option<Feedback>,
}

impl TrainingSession {
    pub fn answered(&self) -> bool {
        self.answered
    }

    pub fn last_feedback(&self) -> Option<&Feedback> {
        self.last_feedback.as_ref()
    }

    /// Readable situation sentence for display.
    pub fn describe(&self) -> String {
        match self.scenario {
            Some(scenario) => scenario.describe(self.position),
            None => "Free play: a generic situation with no correcting range.".to_string(),
        }
    }
}

/// Result of asking for a new spot.
#[derive(Debug, Clone, PartialEq)]
pub enum NewSpotOutcome {
    Dealt(TrainingSession),
    /// The active range set has no spots at all.
    NoSpots,
    /// Leak drilling: every filtered spot is already mastered.
    NoLeaksRemain,
}

/// What the player is told after answering.
#[derive(Debug, Clone, PartialEq)]
pub struct Feedback {
    pub verdict: Verdict,
    pub chosen: ActionKind,
    pub hand: HandClass,
    /// Empty when ungraded.
    pub correct_actions: BTreeSet<ActionKind>,
    pub message: String,
    /// True once a persistence write has failed; results live in memory
    /// only for the rest of the session.
    pub persistence_degraded: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum TrainerError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Ranges(#[from] RangeLoadError),
}

/// The trainer core bound to one user and one persistence provider.
pub struct Trainer<S: StateStore> {
    user: String,
    store: S,
    source: RangeSource,
    default_ranges: RangeSet,
    personal_ranges: RangeSet,
    ledger: PerformanceLedger,
    persistence_degraded: bool,
}

impl<S: StateStore> Trainer<S> {
    /// Bind to a user, pulling their performance record from the store. An
    /// absent, unreadable, or malformed blob starts an empty ledger; the
    /// drill never aborts over persistence.
    pub fn open(user: impl Into<String>, store: S) -> Trainer<S> {
        let user = user.into();
        let ledger = match store.get(&user, StorageKind::Performance) {
            Ok(Some(blob)) => match PerformanceLedger::from_json_str(&blob) {
                Ok(ledger) => ledger,
                Err(err) => {
                    log::warn!("performance record for {user:?} is malformed ({err}), starting fresh");
                    PerformanceLedger::new()
                }
            },
            Ok(None) => PerformanceLedger::new(),
            Err(err) => {
                log::warn!("could not read performance record for {user:?}: {err}");
                PerformanceLedger::new()
            }
        };
        Trainer {
            user,
            store,
            source: RangeSource::Default,
            default_ranges: RangeSet::new(),
            personal_ranges: RangeSet::new(),
            ledger,
            persistence_degraded: false,
        }
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn source(&self) -> RangeSource {
        self.source
    }

    pub fn set_source(&mut self, source: RangeSource) {
        self.source = source;
    }

    pub fn ledger(&self) -> &PerformanceLedger {
        &self.ledger
    }

    pub fn persistence_degraded(&self) -> bool {
        self.persistence_degraded
    }

    /// The authoritative range set for this session, with empty-set
    /// fallback to the other source.
    pub fn active_ranges(&self) -> &RangeSet {
        select_ranges(self.source, &self.default_ranges, &self.personal_ranges)
    }

    /// Pull a range blob from the store and parse it into the given slot.
    /// Shared (default) ranges live under the reserved user name.
    pub fn load_ranges(&mut self, source: RangeSource) -> Result<LoadSummary, TrainerError> {
        let user = match source {
            RangeSource::Default => DEFAULT_RANGES_USER,
            RangeSource::Personal => self.user.as_str(),
        };
        let blob = self.store.get(user, StorageKind::Ranges)?;
        let (set, summary) = match blob {
            Some(raw) => RangeSet::from_json_str(&raw)?,
            None => (RangeSet::new(), LoadSummary::default()),
        };
        *self.slot_mut(source) = set;
        Ok(summary)
    }

    /// Parse an uploaded range file into the given slot and persist it
    /// best-effort (a failed write degrades to session-local).
    pub fn import_ranges(
        &mut self,
        source: RangeSource,
        raw: &str,
    ) -> Result<LoadSummary, TrainerError> {
        let (set, summary) = RangeSet::from_json_str(raw)?;
        *self.slot_mut(source) = set;
        self.persist_ranges(source);
        Ok(summary)
    }

    /// Deal the next spot and hand.
    pub fn new_spot<R: Rng>(
        &mut self,
        rng: &mut R,
        filter: &SpotFilter,
        mode: TrainingMode,
    ) -> NewSpotOutcome {
        match mode {
            TrainingMode::Free => NewSpotOutcome::Dealt(self.free_session(rng, filter)),
            TrainingMode::Drill => self.drill_session(rng, filter, None),
            TrainingMode::LeakDrill(focus) => self.drill_session(rng, filter, Some(focus)),
        }
    }

    fn free_session<R: Rng>(&self, rng: &mut R, filter: &SpotFilter) -> TrainingSession {
        let positions = filter.format.positions();
        let position = filter
            .position
            .unwrap_or_else(|| positions[rng.gen_range(0..positions.len())]);
        let stack = filter
            .stack
            .unwrap_or_else(|| STACKS[rng.gen_range(0..STACKS.len())]);
        TrainingSession {
            spot_key: None,
            format: filter.format,
            position,
            stack,
            scenario: None,
            hand: draw_any_hand(rng),
            answered: false,
            last_feedback: None,
        }
    }

    fn drill_session<R: Rng>(
        &self,
        rng: &mut R,
        filter: &SpotFilter,
        focus: Option<LeakFocus>,
    ) -> NewSpotOutcome {
        let ranges = self.active_ranges();
        let keys: Vec<SpotKey> = ranges.keys().collect();
        if keys.is_empty() {
            return NewSpotOutcome::NoSpots;
        }
        let picked = match focus {
            Some(focus) => match pick_leak_spot(rng, &keys, filter, &self.ledger, &focus) {
                Some(key) => key,
                None => return NewSpotOutcome::NoLeaksRemain,
            },
            None => match pick_spot(rng, &keys, filter, &self.ledger) {
                Some(key) => key,
                None => return NewSpotOutcome::NoSpots,
            },
        };
        let Some(spot) = ranges.get(&picked) else {
            return NewSpotOutcome::NoSpots;
        };
        NewSpotOutcome::Dealt(TrainingSession {
            spot_key: Some(picked),
            format: picked.format,
            position: picked.position,
            stack: picked.stack,
            scenario: Some(picked.scenario),
            hand: draw_hand(rng, &spot.assignment),
            answered: false,
            last_feedback: None,
        })
    }

    /// Judge the player's action for the current session. A graded answer
    /// updates the ledger and persists it; answering twice returns the
    /// first feedback unchanged.
    pub fn submit_answer(
        &mut self,
        session: &mut TrainingSession,
        chosen: ActionKind,
    ) -> Feedback {
        if let Some(previous) = session.last_feedback.clone() {
            if session.answered {
                return previous;
            }
        }

        let (verdict, correct_actions) = {
            let assignment = session
                .spot_key
                .and_then(|key| self.active_ranges().get(&key))
                .map(|spot| &spot.assignment);
            let verdict = evaluate(chosen, session.hand, assignment);
            let correct = assignment
                .map(|a| a.correct_actions(session.hand))
                .unwrap_or_default();
            (verdict, correct)
        };

        if verdict.is_graded() {
            if let Some(key) = session.spot_key {
                self.ledger.record_result(key, verdict == Verdict::Correct);
                self.persist_performance();
            }
        }

        let message = feedback_message(verdict, chosen, session.hand, &correct_actions);
        let feedback = Feedback {
            verdict,
            chosen,
            hand: session.hand,
            correct_actions,
            message,
            persistence_degraded: self.persistence_degraded,
        };
        session.answered = true;
        session.last_feedback = Some(feedback.clone());
        feedback
    }

    /// Wipe the user's tallies and history, then persist best-effort.
    pub fn reset_performance(&mut self) {
        self.ledger.reset();
        self.persist_performance();
    }

    /// Display-only leak ranking with the standard sample cutoff.
    pub fn leak_ranking(&self) -> Vec<LeakEntry> {
        self.ledger.leak_ranking(LEAK_MIN_ATTEMPTS)
    }

    fn slot_mut(&mut self, source: RangeSource) -> &mut RangeSet {
        match source {
            RangeSource::Default => &mut self.default_ranges,
            RangeSource::Personal => &mut self.personal_ranges,
        }
    }

    fn persist_performance(&mut self) {
        let blob = match self.ledger.to_json_string() {
            Ok(blob) => blob,
            Err(err) => {
                log::warn!("could not serialize performance record: {err}");
                self.persistence_degraded = true;
                return;
            }
        };
        if let Err(err) = self
            .store
            .put(&self.user, StorageKind::Performance, &blob)
        {
            log::warn!("performance write failed, keeping results in memory: {err}");
            self.persistence_degraded = true;
        }
    }

    fn persist_ranges(&mut self, source: RangeSource) {
        let user = match source {
            RangeSource::Default => DEFAULT_RANGES_USER.to_string(),
            RangeSource::Personal => self.user.clone(),
        };
        let blob = match self.slot_mut(source).to_json_string() {
            Ok(blob) => blob,
            Err(err) => {
                log::warn!("could not serialize ranges: {err}");
                self.persistence_degraded = true;
                return;
            }
        };
        if let Err(err) = self.store.put(&user, StorageKind::Ranges, &blob) {
            log::warn!("range write failed, keeping ranges in memory: {err}");
            self.persistence_degraded = true;
        }
    }
}

fn feedback_message(
    verdict: Verdict,
    chosen: ActionKind,
    hand: HandClass,
    correct: &BTreeSet<ActionKind>,
) -> String {
    match verdict {
        Verdict::Ungraded => format!("You chose {} with {hand} (free play).", chosen.label()),
        Verdict::Correct => format!("Correct: {} with {hand}.", chosen.label()),
        Verdict::Incorrect => {
            let expected: Vec<&str> = correct.iter().map(|a| a.label()).collect();
            format!(
                "Wrong: {} with {hand}. Correct here: {}.",
                chosen.label(),
                expected.join(" or ")
            )
        }
    }
}
