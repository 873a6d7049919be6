use std::sync::Arc;

use crate::{
    defaults::DefaultsProvider,
    deps::{ActionPerformer, ConstraintEvaluator, FeedbackEmitter},
};

/// Groups the scheduler's long-lived collaborators so construction sites
/// name every external dependency explicitly.
#[derive(Clone)]
pub struct Services {
    /// Performs action side effects and reports unperformable actions.
    pub performer: Arc<dyn ActionPerformer>,
    /// Gates mappings on environmental constraints.
    pub constraints: Arc<dyn ConstraintEvaluator>,
    /// Vibration and toast requests.
    pub feedback: Arc<dyn FeedbackEmitter>,
    /// Fallback timings and the force-vibrate flag.
    pub defaults: DefaultsProvider,
}
