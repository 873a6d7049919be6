//! Collaborator contracts the scheduler depends on.
//!
//! The host supplies an [`ActionPerformer`], a [`ConstraintEvaluator`], and a
//! [`FeedbackEmitter`]; the engine never performs input or UI work itself.

use std::{fmt, time::Duration};

use crate::{
    Result,
    model::{Action, ActionData, Constraint, ConstraintMode, ConstraintState, InputEventType},
};

// ---- Constraint API abstraction ----

/// Point-in-time view of the environment used to gate a mapping.
pub trait ConstraintSnapshot: Send {
    /// Evaluate a single constraint against this snapshot.
    fn is_constraint_satisfied(&self, constraint: &Constraint) -> bool;

    /// Evaluate a mapping's constraint set. An empty set is always satisfied.
    fn is_satisfied(&self, state: &ConstraintState) -> bool {
        if state.constraints.is_empty() {
            return true;
        }
        match state.mode {
            ConstraintMode::And => state
                .constraints
                .iter()
                .all(|c| self.is_constraint_satisfied(c)),
            ConstraintMode::Or => state
                .constraints
                .iter()
                .any(|c| self.is_constraint_satisfied(c)),
        }
    }
}

/// Source of constraint snapshots; called synchronously at detection time.
pub trait ConstraintEvaluator: Send + Sync {
    /// Capture the current environment.
    fn snapshot(&self) -> Box<dyn ConstraintSnapshot>;
}

// ---- Action API abstraction ----

/// Reason an action cannot be performed right now (missing permission, disabled feature...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionError(pub String);

impl fmt::Display for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Performs the side effect of a single action.
pub trait ActionPerformer: Send + Sync {
    /// Pure query: why `data` cannot be performed, if it cannot.
    fn error(&self, data: &ActionData) -> Option<ActionError>;
    /// Perform one invocation of `data` with the given signal.
    fn perform(&self, data: &ActionData, signal: InputEventType);
}

/// Invoke `action` through `performer` `multiplier` times with `signal`.
pub(crate) fn perform_action(
    performer: &dyn ActionPerformer,
    action: &Action,
    signal: InputEventType,
) {
    for _ in 0..action.multiplier_or_default() {
        performer.perform(&action.data, signal);
    }
}

// ---- Feedback API abstraction ----

/// User-facing feedback emitted when a mapping fires.
pub trait FeedbackEmitter: Send + Sync {
    /// Request a vibration of `duration`.
    fn vibrate(&self, duration: Duration) -> Result<()>;
    /// Request the "mapping triggered" toast.
    fn show_triggered_toast(&self) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Snapshot where only the listed constraints hold.
    struct Holds(Vec<&'static str>);

    impl ConstraintSnapshot for Holds {
        fn is_constraint_satisfied(&self, constraint: &Constraint) -> bool {
            self.0.contains(&constraint.0.as_str())
        }
    }

    fn state(mode: ConstraintMode, names: &[&str]) -> ConstraintState {
        ConstraintState {
            constraints: names.iter().map(|n| Constraint((*n).to_string())).collect(),
            mode,
        }
    }

    #[test]
    fn empty_constraint_set_is_satisfied_in_both_modes() {
        let snap = Holds(vec![]);
        assert!(snap.is_satisfied(&state(ConstraintMode::And, &[])));
        assert!(snap.is_satisfied(&state(ConstraintMode::Or, &[])));
    }

    #[test]
    fn and_requires_all_or_requires_any() {
        let snap = Holds(vec!["screen_on"]);
        let names = ["screen_on", "app_in_foreground"];
        assert!(!snap.is_satisfied(&state(ConstraintMode::And, &names)));
        assert!(snap.is_satisfied(&state(ConstraintMode::Or, &names)));
    }
}
