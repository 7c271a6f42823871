//! Core trainer engine: hand grid, range storage, adaptive scheduling,
//! performance tracking, and answer judging.
//!
//! ## Module overview
//!
//! | Module      | Purpose |
//! |-------------|---------|
//! | `grid`      | The 13x13 hand grid: 169 canonical classes, combo weights, Chebyshev distance |
//! | `models`    | Spot vocabulary: formats, positions, stacks, scenarios, actions, spot keys |
//! | `ranges`    | Spot-keyed action assignments, tolerant JSON loader, materializing exporter |
//! | `ledger`    | Per-spot and global success/fail tallies plus the answer history |
//! | `scheduler` | Leitner-weighted spot selection and near-range hand sampling |
//! | `evaluator` | The correct/incorrect/ungraded judging function |
//! | `storage`   | Key-value persistence contract and the in-memory store |
//! | `session`   | Caller-facing facade: new spot, submit answer, load ranges, reset |

pub mod evaluator;
pub mod grid;
pub mod ledger;
pub mod models;
pub mod ranges;
pub mod scheduler;
pub mod session;
pub mod storage;

// Re-export the public API surface so callers can use
// `engine::Trainer` without reaching into sub-modules.
pub use evaluator::{evaluate, Verdict};
pub use grid::{all_hand_classes, HandClass, Rank, GRID_CLASSES, TOTAL_COMBOS};
pub use ledger::{HistoryEvent, LeakEntry, PerformanceLedger, SpotTally, LEAK_MIN_ATTEMPTS};
pub use models::{
    ActionKind, Position, Scenario, SpotKey, TableFormat, ACTIONS, STACKS,
};
pub use ranges::{
    select_ranges, ActionAssignment, LoadSummary, RangeLoadError, RangeSet, RangeSource,
    RangeStats, Spot,
};
pub use scheduler::{
    candidate_hands, difficulty_weight, draw_hand, filter_pool, pick_leak_spot, pick_spot,
    weighted_pick, LeakFocus, SpotFilter, MIN_WEIGHT, NEAR_RANGE_DISTANCE,
};
pub use session::{
    Feedback, NewSpotOutcome, Trainer, TrainerError, TrainingMode, TrainingSession,
};
pub use storage::{MemoryStore, StateStore, StorageKind, StoreError, DEFAULT_RANGES_USER};
