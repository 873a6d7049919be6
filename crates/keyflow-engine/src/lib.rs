//! Keyflow Engine
//!
//! The Keyflow Engine crate runs the actions of a mapping once its trigger has
//! been detected:
//! - plays the action list in order, honouring per-action delays
//! - pairs hold-down actions across detections (DOWN now, UP next time)
//! - starts, toggles off, and limits repeating actions
//! - supersedes a mapping's previous work when it is detected again
//! - emits vibration/toast feedback to the UI layer
//!
//! The primary type is [`MappingActionScheduler`]. Its collaborators are the
//! traits in [`deps`], grouped in [`Services`]; fallback timings come from
//! [`DefaultsProvider`].
//!
//! Trigger recognition, mapping storage, and the mechanics of performing one
//! action live outside this crate.

mod defaults;
pub mod deps;
mod error;
mod held;
mod model;
mod notification;
mod repeat_task;
mod scheduler;
mod services;
pub mod test_support;

pub use config::Preferences;
pub use defaults::{DefaultsProvider, PreferencesHandle};
pub use deps::{ActionError, ActionPerformer, ConstraintEvaluator, ConstraintSnapshot, FeedbackEmitter};
pub use error::{Error, Result};
pub use held::HeldActionTracker;
pub use model::{
    Action, ActionData, Constraint, ConstraintMode, ConstraintState, InputEventType, Mapping,
    RepeatMode,
};
pub use notification::{Feedback, FeedbackDispatcher};
pub use repeat_task::{RepeatTask, TaskState};
pub use scheduler::MappingActionScheduler;
pub use services::Services;
