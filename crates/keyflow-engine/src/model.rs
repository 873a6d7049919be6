//! Mapping and action types handed to the scheduler on each detection.
//!
//! These are plain data: the scheduler never mutates them, and external
//! layers (storage, UI, the replay tool) author them in RON via serde.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque action payload. Only the action performer interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionData(pub String);

impl ActionData {
    /// Wrap a payload string.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }
}

impl fmt::Display for ActionData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Signal passed to the performer for one invocation of an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputEventType {
    /// Press only; a matching `Up` is expected later.
    Down,
    /// Release only.
    Up,
    /// A full tap: press then release.
    DownUp,
}

/// When a repeating action stops repeating.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RepeatMode {
    /// Repeats while the trigger is held; driven by the trigger detector, not the scheduler.
    #[default]
    TriggerReleased,
    /// Repeats until the same mapping is detected again.
    TriggerPressedAgain,
    /// Repeats until `repeat_limit` is reached.
    LimitReached,
}

/// One step of a mapping's action list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Action {
    /// Identity within the owning mapping. Not unique across mappings.
    pub uid: String,
    /// Payload given to the performer.
    pub data: ActionData,
    /// Invocations per non-repeating execution (default 1).
    pub multiplier: Option<u32>,
    /// Pause after this action before the next one starts, in milliseconds.
    pub delay_before_next_action: Option<u64>,
    /// Model a press-and-hold instead of a tap.
    pub hold_down: bool,
    /// Time between DOWN and UP for repeating hold-down actions, in milliseconds.
    pub hold_down_duration: Option<u64>,
    /// Whether the action repeats.
    pub repeat: bool,
    /// Stop policy for repeating actions.
    pub repeat_mode: RepeatMode,
    /// Interval between repeats, in milliseconds.
    pub repeat_rate: Option<u64>,
    /// Number of repeats after the first firing.
    pub repeat_limit: Option<u32>,
}

impl Default for Action {
    fn default() -> Self {
        Self::new("", ActionData::new(""))
    }
}

impl Action {
    /// A tap action with every optional setting unset.
    pub fn new(uid: impl Into<String>, data: ActionData) -> Self {
        Self {
            uid: uid.into(),
            data,
            multiplier: None,
            delay_before_next_action: None,
            hold_down: false,
            hold_down_duration: None,
            repeat: false,
            repeat_mode: RepeatMode::default(),
            repeat_rate: None,
            repeat_limit: None,
        }
    }

    /// Number of invocations per execution.
    pub fn multiplier_or_default(&self) -> u32 {
        self.multiplier.unwrap_or(1)
    }

    /// True when the scheduler owns the repeat (as opposed to the trigger detector).
    pub fn repeats_in_scheduler(&self) -> bool {
        self.repeat && self.repeat_mode != RepeatMode::TriggerReleased
    }
}

/// How a mapping's constraints combine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConstraintMode {
    /// Every constraint must hold.
    #[default]
    And,
    /// At least one constraint must hold.
    Or,
}

/// Opaque environmental condition, evaluated by a constraint snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Constraint(pub String);

/// A mapping's constraints and how they combine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConstraintState {
    /// Conditions gating the mapping.
    pub constraints: Vec<Constraint>,
    /// Combination mode.
    pub mode: ConstraintMode,
}

/// A user-authored rule: what to play when its trigger is detected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Mapping {
    /// Disabled mappings never run.
    pub is_enabled: bool,
    /// Actions in playback order.
    pub action_list: Vec<Action>,
    /// Gate evaluated at detection time.
    pub constraint_state: ConstraintState,
    /// Show a "mapping triggered" toast on detection.
    pub show_toast: bool,
    /// Vibrate on detection.
    pub vibrate: bool,
    /// Vibration length in milliseconds.
    pub vibrate_duration: Option<u64>,
}

impl Default for Mapping {
    fn default() -> Self {
        Self {
            is_enabled: true,
            action_list: Vec::new(),
            constraint_state: ConstraintState::default(),
            show_toast: false,
            vibrate: false,
            vibrate_duration: None,
        }
    }
}

impl Mapping {
    /// An enabled mapping that plays `actions` with no constraints or feedback.
    pub fn with_actions(actions: Vec<Action>) -> Self {
        Self {
            action_list: actions,
            ..Self::default()
        }
    }
}
