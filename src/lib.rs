//! # preflop_trainer
//!
//! The core of a preflop poker-decision trainer: it picks a situation (table
//! format, position, stack depth, scenario), deals a canonical two-card hand
//! near the spot's playing range, judges the player's chosen action against a
//! hand-authored range definition, and tracks per-spot performance so that
//! poorly-known spots come back more often (a simplified Leitner scheme).
//!
//! This crate is the engine only: range files arrive as JSON blobs through a
//! pluggable key-value [`StateStore`], and a presentation layer drives the
//! four operations on [`Trainer`] and renders the results. There is no
//! solver here; ranges are data, authored elsewhere.
//!
//! ## How a drill works
//!
//! 1. Load ranges for a user ([`Trainer::load_ranges`] or
//!    [`Trainer::import_ranges`]); pick a source (default or personal, with
//!    fallback when one side is empty).
//! 2. Ask for a spot ([`Trainer::new_spot`]) with a [`SpotFilter`] and a
//!    [`TrainingMode`]. Spot selection is a roulette wheel over
//!    `max(0.2, 1 + fails - 0.3 * successes)`, so repeated mistakes make a
//!    spot proportionally more likely to reappear. The dealt hand is drawn
//!    from the spot's playing range plus everything within Chebyshev
//!    distance 2 of it on the 13x13 grid, which keeps drills on the edge of
//!    the range where the hard decisions live.
//! 3. Submit an answer ([`Trainer::submit_answer`]): correct, incorrect, or
//!    ungraded (free play). Graded answers update the performance ledger and
//!    persist it; a failed write degrades to session-local with a warning,
//!    never aborting the drill.
//!
//! ## Quick start
//!
//! ```rust
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//! use preflop_trainer::{
//!     MemoryStore, NewSpotOutcome, RangeSource, SpotFilter, TableFormat,
//!     Trainer, TrainingMode,
//! };
//!
//! let ranges = r#"{ "version": 2, "spots": {
//!     "6-max_BTN_100_open": {
//!         "table_type": "6-max", "position": "BTN", "stack": 100,
//!         "scenario": "open",
//!         "actions": { "open": ["AA", "KK", "AKs", "AKo"] }
//!     }
//! }}"#;
//!
//! let mut trainer = Trainer::open("demo", MemoryStore::new());
//! trainer.import_ranges(RangeSource::Personal, ranges).unwrap();
//! trainer.set_source(RangeSource::Personal);
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let filter = SpotFilter::any(TableFormat::SixMax);
//! if let NewSpotOutcome::Dealt(mut session) =
//!     trainer.new_spot(&mut rng, &filter, TrainingMode::Drill)
//! {
//!     println!("{} (dealt {})", session.describe(), session.hand);
//!     let feedback = trainer.submit_answer(&mut session, preflop_trainer::ActionKind::Fold);
//!     println!("{}", feedback.message);
//! }
//! ```

pub mod engine;

// Convenience re-exports so callers can use `preflop_trainer::Trainer`
// directly without reaching into `engine::`.
pub use engine::{
    all_hand_classes, evaluate, ActionAssignment, ActionKind, Feedback, HandClass, HistoryEvent,
    LeakEntry, LeakFocus, LoadSummary, MemoryStore, NewSpotOutcome, PerformanceLedger, Position,
    RangeLoadError, RangeSet, RangeSource, RangeStats, Rank, Scenario, Spot, SpotFilter, SpotKey,
    SpotTally, StateStore, StorageKind, StoreError, TableFormat, Trainer, TrainerError,
    TrainingMode, TrainingSession, Verdict, ACTIONS, DEFAULT_RANGES_USER, GRID_CLASSES,
    LEAK_MIN_ATTEMPTS, MIN_WEIGHT, NEAR_RANGE_DISTANCE, STACKS, TOTAL_COMBOS,
};
