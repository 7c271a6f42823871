//! End-to-end demo of the preflop trainer core.
//!
//! Run with: `cargo run --example demo`
//!
//! Walks through the full drill loop with an in-memory store and a small
//! hand-authored range file:
//!
//! 1. Import ranges for a user and show the combo-weighted range stats.
//! 2. Deal ten adaptive drills with a fixed seed (deterministic output),
//!    answer each with a naive "always open" strategy, and print the
//!    feedback.
//! 3. Print the resulting tallies and the leak ranking.
//! 4. Show free-play mode, where answers are echoed back ungraded.

use rand::rngs::StdRng;
use rand::SeedableRng;

use preflop_trainer::{
    ActionKind, MemoryStore, NewSpotOutcome, RangeSource, RangeStats, SpotFilter, TableFormat,
    Trainer, TrainingMode,
};

const RANGES: &str = r#"{
    "version": 2,
    "spots": {
        "6-max_BTN_100_open": {
            "table_type": "6-max", "position": "BTN", "stack": 100,
            "scenario": "open",
            "actions": {
                "open": ["AA", "KK", "QQ", "JJ", "TT", "99",
                         "AKs", "AQs", "AJs", "ATs", "KQs", "QJs", "JTs",
                         "AKo", "AQo", "KQo"]
            }
        },
        "6-max_BB_15_vs_open_SB": {
            "table_type": "6-max", "position": "BB", "stack": 15,
            "scenario": "vs_open_SB",
            "actions": {
                "call": ["22", "33", "44", "55", "A5s", "A4s", "KTs", "QTs"],
                "threebet_shove": ["AA", "KK", "QQ", "AKs", "AKo", "AQs"]
            }
        }
    }
}"#;

fn main() {
    let mut trainer = Trainer::open("demo", MemoryStore::new());
    let summary = trainer
        .import_ranges(RangeSource::Personal, RANGES)
        .expect("demo ranges are valid JSON");
    trainer.set_source(RangeSource::Personal);
    println!(
        "Loaded {} spots ({} entries dropped)\n",
        summary.spots_loaded, summary.hands_dropped
    );

    for spot in trainer.active_ranges().spots() {
        let stats = spot.assignment.stats();
        println!(
            "{}: open {:.1}% | 3bet {:.1}% | call {:.1}% | fold {:.1}%",
            spot.key,
            RangeStats::pct(stats.open_combos),
            RangeStats::pct(stats.threebet_combos),
            RangeStats::pct(stats.call_combos),
            RangeStats::pct(stats.fold_combos),
        );
    }

    let mut rng = StdRng::seed_from_u64(42);
    let filter = SpotFilter::any(TableFormat::SixMax);

    println!("\n── adaptive drill ──");
    for round in 1..=10 {
        let NewSpotOutcome::Dealt(mut session) =
            trainer.new_spot(&mut rng, &filter, TrainingMode::Drill)
        else {
            println!("no spot available");
            break;
        };
        println!("\n#{round} {}", session.describe());
        println!("   dealt {} at {} ({}bb)", session.hand, session.position, session.stack);

        // A deliberately naive player: always open.
        let feedback = trainer.submit_answer(&mut session, ActionKind::Open);
        println!("   {}", feedback.message);
    }

    println!("\n── performance ──");
    let total = trainer.ledger().total();
    println!("answers: {} right, {} wrong", total.success, total.fail);
    for leak in trainer.leak_ranking() {
        println!(
            "leak: {} at {:.0}% over {} attempts",
            leak.spot_key,
            leak.accuracy * 100.0,
            leak.attempts
        );
    }

    println!("\n── free play ──");
    if let NewSpotOutcome::Dealt(mut session) =
        trainer.new_spot(&mut rng, &filter, TrainingMode::Free)
    {
        println!("{}", session.describe());
        println!("dealt {} at {} ({}bb)", session.hand, session.position, session.stack);
        let feedback = trainer.submit_answer(&mut session, ActionKind::Call);
        println!("{}", feedback.message);
    }
}
