//! Adaptive spot selection: filter the pool, weight spots by track record
//! (a simplified Leitner scheme), roulette-pick one, and draw a hand near
//! the spot's playing range.

use std::collections::BTreeSet;

use rand::Rng;

use crate::engine::grid::{all_hand_classes, HandClass};
use crate::engine::ledger::{PerformanceLedger, SpotTally};
use crate::engine::models::{Position, SpotKey, TableFormat};
use crate::engine::ranges::ActionAssignment;

/// Floor below which a spot's weight never drops: mastered spots fade, they
/// never disappear.
pub const MIN_WEIGHT: f64 = 0.2;

/// Hands this close (Chebyshev) to a playing hand are still drilled; beyond
/// it they are considered irrelevant to the spot.
pub const NEAR_RANGE_DISTANCE: usize = 2;

/// User-facing pool filter. `None` means "any"; the table format is always
/// exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpotFilter {
    pub format: TableFormat,
    pub position: Option<Position>,
    pub stack: Option<u32>,
}

impl SpotFilter {
    pub fn any(format: TableFormat) -> SpotFilter {
        SpotFilter { format, position: None, stack: None }
    }

    fn matches(&self, key: &SpotKey) -> bool {
        key.format == self.format
            && self.position.map_or(true, |p| key.position == p)
            && self.stack.map_or(true, |s| key.stack == s)
    }
}

/// Keep the keys the filter accepts; if that leaves nothing, fall back to
/// the whole pool rather than reporting "no spots" for over-narrow filters.
pub fn filter_pool(keys: &[SpotKey], filter: &SpotFilter) -> Vec<SpotKey> {
    let filtered: Vec<SpotKey> = keys.iter().copied().filter(|k| filter.matches(k)).collect();
    if filtered.is_empty() {
        keys.to_vec()
    } else {
        filtered
    }
}

/// The adaptive-learning rule: failures push a spot's weight up linearly,
/// successes pull it down three times slower, floored at [`MIN_WEIGHT`].
pub fn difficulty_weight(tally: SpotTally) -> f64 {
    let raw = 1.0 + f64::from(tally.fail) - 0.3 * f64::from(tally.success);
    raw.max(MIN_WEIGHT)
}

/// Fair roulette-wheel selection: probability of each item is its weight
/// over the total. The last item is the fallback for floating-point edge
/// cases; a non-positive total degrades to a uniform pick.
pub fn weighted_pick<'a, T, R, F>(rng: &mut R, items: &'a [T], weight: F) -> Option<&'a T>
where
    R: Rng,
    F: Fn(&T) -> f64,
{
    if items.is_empty() {
        return None;
    }
    let weights: Vec<f64> = items.iter().map(&weight).collect();
    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return items.get(rng.gen_range(0..items.len()));
    }
    let draw = rng.gen_range(0.0..total);
    let mut acc = 0.0;
    for (item, w) in items.iter().zip(&weights) {
        acc += w;
        if draw < acc {
            return Some(item);
        }
    }
    items.last()
}

/// Pick the next spot to drill: filter, weight by ledger record, sample.
pub fn pick_spot<R: Rng>(
    rng: &mut R,
    keys: &[SpotKey],
    filter: &SpotFilter,
    ledger: &PerformanceLedger,
) -> Option<SpotKey> {
    let pool = filter_pool(keys, filter);
    weighted_pick(rng, &pool, |k| difficulty_weight(ledger.tally(k))).copied()
}

// ---------------------------------------------------------------------------
// Leak-focus drilling
// ---------------------------------------------------------------------------

/// Mastery bar for leak-focused drilling. Both knobs are user-tunable; the
/// defaults mirror the display threshold (5 attempts) and an 80% bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeakFocus {
    pub min_samples: u32,
    pub accuracy_threshold: f64,
}

impl Default for LeakFocus {
    fn default() -> LeakFocus {
        LeakFocus {
            min_samples: crate::engine::ledger::LEAK_MIN_ATTEMPTS,
            accuracy_threshold: 0.8,
        }
    }
}

impl LeakFocus {
    /// A spot still counts as a leak until it has both enough samples and
    /// accuracy at or above the bar.
    pub fn is_leak(&self, tally: SpotTally) -> bool {
        if tally.attempts() < self.min_samples {
            return true;
        }
        match tally.accuracy() {
            Some(acc) => acc < self.accuracy_threshold,
            None => true,
        }
    }
}

/// Like [`pick_spot`], but restricted to unmastered spots. Returns `None`
/// when every filtered spot is mastered; the caller reports "no leaks
/// remain" instead of silently drilling something unrelated.
pub fn pick_leak_spot<R: Rng>(
    rng: &mut R,
    keys: &[SpotKey],
    filter: &SpotFilter,
    ledger: &PerformanceLedger,
    focus: &LeakFocus,
) -> Option<SpotKey> {
    let pool: Vec<SpotKey> = filter_pool(keys, filter)
        .into_iter()
        .filter(|k| focus.is_leak(ledger.tally(k)))
        .collect();
    weighted_pick(rng, &pool, |k| difficulty_weight(ledger.tally(k))).copied()
}

// ---------------------------------------------------------------------------
// Hand sampling
// ---------------------------------------------------------------------------

/// Hands worth quizzing for a spot: the playing range itself plus every
/// class within [`NEAR_RANGE_DISTANCE`] of it on the grid, the boundary
/// where the hard discriminations live. A pure-fold spot quizzes the whole
/// grid (folding is the lesson).
pub fn candidate_hands(assignment: &ActionAssignment) -> BTreeSet<HandClass> {
    let played = assignment.non_fold_hands();
    if played.is_empty() {
        return all_hand_classes().collect();
    }
    all_hand_classes()
        .filter(|&class| {
            played.contains(&class)
                || played
                    .iter()
                    .any(|&p| class.chebyshev(p) <= NEAR_RANGE_DISTANCE)
        })
        .collect()
}

/// Draw one hand uniformly from the candidate set.
pub fn draw_hand<R: Rng>(rng: &mut R, assignment: &ActionAssignment) -> HandClass {
    let candidates: Vec<HandClass> = candidate_hands(assignment).into_iter().collect();
    // candidate_hands never returns an empty set.
    candidates[rng.gen_range(0..candidates.len())]
}

/// Draw one hand uniformly from the whole grid (free-training mode).
pub fn draw_any_hand<R: Rng>(rng: &mut R) -> HandClass {
    let all: Vec<HandClass> = all_hand_classes().collect();
    all[rng.gen_range(0..all.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::models::ActionKind;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;
    use time::macros::datetime;

    fn key(s: &str) -> SpotKey {
        s.parse().unwrap()
    }

    fn h(s: &str) -> HandClass {
        s.parse().unwrap()
    }

    fn keys(raw: &[&str]) -> Vec<SpotKey> {
        raw.iter().map(|s| key(s)).collect()
    }

    #[test]
    fn filter_matches_exactly_and_falls_back_when_empty() {
        let pool = keys(&[
            "6-max_BTN_100_open",
            "6-max_CO_100_open",
            "8-max_BTN_100_open",
        ]);

        let btn = SpotFilter {
            format: TableFormat::SixMax,
            position: Some(Position::BTN),
            stack: None,
        };
        assert_eq!(filter_pool(&pool, &btn), keys(&["6-max_BTN_100_open"]));

        let any6 = SpotFilter::any(TableFormat::SixMax);
        assert_eq!(filter_pool(&pool, &any6).len(), 2);

        // Nothing matches stack 10: the whole pool comes back.
        let narrow = SpotFilter {
            format: TableFormat::SixMax,
            position: None,
            stack: Some(10),
        };
        assert_eq!(filter_pool(&pool, &narrow).len(), 3);

        assert!(filter_pool(&[], &any6).is_empty());
    }

    #[test]
    fn difficulty_weight_is_monotone_and_floored() {
        let base = difficulty_weight(SpotTally::default());
        assert!((base - 1.0).abs() < 1e-9);

        let mut prev = base;
        for fail in 1..10 {
            let w = difficulty_weight(SpotTally { success: 0, fail });
            assert!(w > prev);
            prev = w;
        }

        let mut prev = base;
        for success in 1..50 {
            let w = difficulty_weight(SpotTally { success, fail: 0 });
            assert!(w <= prev);
            assert!(w >= MIN_WEIGHT);
            prev = w;
        }
        assert_eq!(
            difficulty_weight(SpotTally { success: 100, fail: 0 }),
            MIN_WEIGHT
        );
    }

    #[test]
    fn failed_spots_outweigh_fresh_ones() {
        let mut ledger = PerformanceLedger::new();
        let ts = datetime!(2026-01-15 12:00 UTC);
        let x = key("6-max_BTN_100_open");
        for i in 0..4 {
            ledger.record_result_at(x, i == 0, ts); // 1 success, 3 fails
        }
        let y = key("6-max_CO_100_open");
        assert!(difficulty_weight(ledger.tally(&x)) > difficulty_weight(ledger.tally(&y)));
    }

    #[test]
    fn weighted_pick_tracks_the_weights_statistically() {
        let mut rng = StdRng::seed_from_u64(7);
        let items = ["a", "b", "c"];
        let weight = |s: &&str| match *s {
            "a" => 1.0,
            "b" => 3.0,
            _ => 6.0,
        };

        let trials = 30_000;
        let mut counts: HashMap<&str, u32> = HashMap::new();
        for _ in 0..trials {
            let picked = weighted_pick(&mut rng, &items, weight).unwrap();
            *counts.entry(*picked).or_default() += 1;
        }

        let freq = |s: &str| f64::from(counts[s]) / f64::from(trials);
        assert!((freq("a") - 0.1).abs() < 0.02);
        assert!((freq("b") - 0.3).abs() < 0.02);
        assert!((freq("c") - 0.6).abs() < 0.02);
    }

    #[test]
    fn weighted_pick_handles_edges() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(weighted_pick::<i32, _, _>(&mut rng, &[], |_| 1.0), None);
        // Non-positive total degrades to a uniform pick, not a panic.
        assert!(weighted_pick(&mut rng, &[1, 2, 3], |_| 0.0).is_some());
    }

    #[test]
    fn draw_hand_stays_near_the_playing_range() {
        let assignment = ActionAssignment::new().with_toggled(ActionKind::Open, h("AA"));
        let aa = h("AA");

        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..500 {
            let drawn = draw_hand(&mut rng, &assignment);
            assert!(
                drawn.chebyshev(aa) <= NEAR_RANGE_DISTANCE,
                "{drawn} is too far from AA"
            );
        }

        let candidates = candidate_hands(&assignment);
        assert!(candidates.contains(&h("KK")));
        assert!(candidates.contains(&h("AKs")));
        assert!(candidates.contains(&h("AKo")));
        assert!(candidates.contains(&h("QQ")));
        assert!(!candidates.contains(&h("72o")));
    }

    #[test]
    fn pure_fold_spot_samples_the_whole_grid() {
        let assignment = ActionAssignment::new();
        assert_eq!(candidate_hands(&assignment).len(), 169);
    }

    #[test]
    fn leak_focus_excludes_mastered_spots() {
        let focus = LeakFocus::default();
        let ts = datetime!(2026-01-15 12:00 UTC);
        let mut ledger = PerformanceLedger::new();

        let mastered = key("6-max_BTN_100_open");
        for _ in 0..6 {
            ledger.record_result_at(mastered, true, ts);
        }
        let shaky = key("6-max_CO_100_open");
        for i in 0..6 {
            ledger.record_result_at(shaky, i % 2 == 0, ts); // 50%
        }
        let fresh = key("6-max_SB_100_open");

        assert!(!focus.is_leak(ledger.tally(&mastered)));
        assert!(focus.is_leak(ledger.tally(&shaky)));
        assert!(focus.is_leak(ledger.tally(&fresh)));

        let pool = vec![mastered, shaky, fresh];
        let filter = SpotFilter::any(TableFormat::SixMax);
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..100 {
            let picked = pick_leak_spot(&mut rng, &pool, &filter, &ledger, &focus).unwrap();
            assert_ne!(picked, mastered);
        }

        // Everything mastered: no leaks remain.
        let only_mastered = vec![mastered];
        assert_eq!(
            pick_leak_spot(&mut rng, &only_mastered, &filter, &ledger, &focus),
            None
        );
    }

    #[test]
    fn pick_spot_is_deterministic_under_a_seed() {
        let pool = keys(&["6-max_BTN_100_open", "6-max_CO_100_open", "6-max_SB_25_open"]);
        let filter = SpotFilter::any(TableFormat::SixMax);
        let ledger = PerformanceLedger::new();

        let run = |seed: u64| {
            let mut rng = StdRng::seed_from_u64(seed);
            (0..10)
                .map(|_| pick_spot(&mut rng, &pool, &filter, &ledger).unwrap())
                .collect::<Vec<_>>()
        };
        assert_eq!(run(42), run(42));
    }
}
