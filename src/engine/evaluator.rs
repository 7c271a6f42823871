//! Answer judging: a pure decision function with three terminal outcomes.

use serde::{Deserialize, Serialize};

use crate::engine::grid::HandClass;
use crate::engine::models::ActionKind;
use crate::engine::ranges::ActionAssignment;

/// Outcome of judging one answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Correct,
    Incorrect,
    /// Free-training mode: no defined right answer, the response is merely
    /// echoed back.
    Ungraded,
}

impl Verdict {
    pub fn is_graded(self) -> bool {
        !matches!(self, Verdict::Ungraded)
    }
}

/// Judge `chosen` for `hand` against a spot's assignment. `None` means free
/// mode (ungraded); otherwise the answer is correct iff it is in the spot's
/// correct-action set for that hand.
pub fn evaluate(
    chosen: ActionKind,
    hand: HandClass,
    assignment: Option<&ActionAssignment>,
) -> Verdict {
    match assignment {
        None => Verdict::Ungraded,
        Some(a) => {
            if a.correct_actions(hand).contains(&chosen) {
                Verdict::Correct
            } else {
                Verdict::Incorrect
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn h(s: &str) -> HandClass {
        s.parse().unwrap()
    }

    #[test]
    fn grades_against_the_assignment() {
        let a = ActionAssignment::new().with_toggled(ActionKind::Open, h("AKs"));

        assert_eq!(evaluate(ActionKind::Open, h("AKs"), Some(&a)), Verdict::Correct);
        assert_eq!(evaluate(ActionKind::Fold, h("AKs"), Some(&a)), Verdict::Incorrect);
        assert_eq!(evaluate(ActionKind::Fold, h("72o"), Some(&a)), Verdict::Correct);
        assert_eq!(evaluate(ActionKind::Call, h("72o"), Some(&a)), Verdict::Incorrect);
    }

    #[test]
    fn mixed_strategies_accept_every_listed_action() {
        let a = ActionAssignment::new()
            .with_toggled(ActionKind::Call, h("JTs"))
            .with_toggled(ActionKind::Threebet, h("JTs"));
        assert_eq!(evaluate(ActionKind::Call, h("JTs"), Some(&a)), Verdict::Correct);
        assert_eq!(evaluate(ActionKind::Threebet, h("JTs"), Some(&a)), Verdict::Correct);
        assert_eq!(evaluate(ActionKind::Fold, h("JTs"), Some(&a)), Verdict::Incorrect);
    }

    #[test]
    fn free_mode_is_ungraded() {
        assert_eq!(evaluate(ActionKind::OpenShove, h("72o"), None), Verdict::Ungraded);
    }

    #[test]
    fn empty_assignment_grades_fold_as_the_lesson() {
        let a = ActionAssignment::new();
        assert_eq!(evaluate(ActionKind::Fold, h("AA"), Some(&a)), Verdict::Correct);
        assert_eq!(evaluate(ActionKind::Open, h("AA"), Some(&a)), Verdict::Incorrect);
    }
}
