use std::collections::HashMap;

use crate::model::Action;

/// Tracks which hold-down actions have had their DOWN half performed but not their UP half.
///
/// Keyed by action `uid`. The full action is kept so the UP half can be replayed
/// with the same payload and multiplier on reset. The owner is responsible for
/// synchronisation.
#[derive(Debug, Default)]
pub struct HeldActionTracker {
    /// Held actions by uid.
    held: HashMap<String, Action>,
}

impl HeldActionTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return true if the action with `uid` is currently held down.
    pub fn contains(&self, uid: &str) -> bool {
        self.held.contains_key(uid)
    }

    /// Record a DOWN; returns true if the action was not already held.
    ///
    /// Only hold-down actions are accepted; others are ignored and return false.
    pub fn insert(&mut self, action: &Action) -> bool {
        if !action.hold_down {
            return false;
        }
        self.held
            .insert(action.uid.clone(), action.clone())
            .is_none()
    }

    /// Record an UP; returns the held action if there was one.
    pub fn remove(&mut self, uid: &str) -> Option<Action> {
        self.held.remove(uid)
    }

    /// Number of held actions.
    pub fn len(&self) -> usize {
        self.held.len()
    }

    /// True when nothing is held.
    pub fn is_empty(&self) -> bool {
        self.held.is_empty()
    }

    /// Remove and return every held action.
    pub fn drain(&mut self) -> Vec<Action> {
        self.held.drain().map(|(_, a)| a).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ActionData;

    fn hold(uid: &str) -> Action {
        Action {
            hold_down: true,
            ..Action::new(uid, ActionData::new("shift"))
        }
    }

    #[test]
    fn insert_remove_flow() {
        let mut tracker = HeldActionTracker::new();
        assert!(tracker.insert(&hold("a")));
        assert!(tracker.contains("a"));
        assert!(!tracker.insert(&hold("a")));
        assert_eq!(tracker.len(), 1);

        assert_eq!(tracker.remove("a").map(|a| a.uid), Some("a".to_string()));
        assert!(tracker.remove("a").is_none());
        assert!(tracker.is_empty());
    }

    #[test]
    fn tap_actions_are_never_held() {
        let mut tracker = HeldActionTracker::new();
        assert!(!tracker.insert(&Action::new("t", ActionData::new("tap"))));
        assert!(tracker.is_empty());
    }

    #[test]
    fn drain_empties_the_tracker() {
        let mut tracker = HeldActionTracker::new();
        tracker.insert(&hold("a"));
        tracker.insert(&hold("b"));
        let mut uids: Vec<_> = tracker.drain().into_iter().map(|a| a.uid).collect();
        uids.sort();
        assert_eq!(uids, ["a", "b"]);
        assert!(tracker.is_empty());
    }
}
