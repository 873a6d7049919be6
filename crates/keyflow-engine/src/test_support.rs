//! Test support utilities for keyflow-engine integration/unit tests.
//! These helpers are public to avoid dead_code warnings and are lightweight.
//! They are intended for use by the test suite only.

use std::{collections::HashSet, sync::Arc, time::Duration};

use parking_lot::Mutex;
use tokio::time::Instant;

use crate::{
    Result,
    defaults::DefaultsProvider,
    deps::{ActionError, ActionPerformer, ConstraintEvaluator, ConstraintSnapshot, FeedbackEmitter},
    model::{ActionData, Constraint, InputEventType},
    services::Services,
};

/// One recorded `perform` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Performed {
    /// Milliseconds since the performer was created (tokio clock, so paused time is exact).
    pub at_ms: u64,
    /// Payload performed.
    pub data: ActionData,
    /// Signal sent.
    pub signal: InputEventType,
}

/// Performer that records every call and can mark payloads as unperformable.
pub struct RecordingPerformer {
    /// Reference point for `at_ms`.
    start: Instant,
    /// Calls in order.
    events: Mutex<Vec<Performed>>,
    /// Payloads that report an error.
    broken: Mutex<HashSet<ActionData>>,
}

impl RecordingPerformer {
    /// Create a performer whose clock starts now.
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            start: Instant::now(),
            events: Mutex::new(Vec::new()),
            broken: Mutex::new(HashSet::new()),
        })
    }

    /// Make `data` report an error from now on.
    pub fn set_broken(&self, data: &str) {
        self.broken.lock().insert(ActionData::new(data));
    }

    /// All calls so far.
    pub fn events(&self) -> Vec<Performed> {
        self.events.lock().clone()
    }

    /// Calls for one payload.
    pub fn events_for(&self, data: &str) -> Vec<Performed> {
        self.events
            .lock()
            .iter()
            .filter(|e| e.data.0 == data)
            .cloned()
            .collect()
    }

    /// Number of calls carrying `signal`.
    pub fn count_signal(&self, signal: InputEventType) -> usize {
        self.events.lock().iter().filter(|e| e.signal == signal).count()
    }
}

impl ActionPerformer for RecordingPerformer {
    fn error(&self, data: &ActionData) -> Option<ActionError> {
        self.broken
            .lock()
            .contains(data)
            .then(|| ActionError(format!("{data} is unavailable")))
    }

    fn perform(&self, data: &ActionData, signal: InputEventType) {
        let at_ms = u64::try_from(self.start.elapsed().as_millis()).unwrap_or(u64::MAX);
        self.events.lock().push(Performed {
            at_ms,
            data: data.clone(),
            signal,
        });
    }
}

/// Constraint evaluator where only the listed constraints hold.
#[derive(Default)]
pub struct StaticConstraints {
    /// Constraints currently satisfied.
    satisfied: Mutex<HashSet<String>>,
}

impl StaticConstraints {
    /// Create an evaluator with nothing satisfied.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Mark `name` as satisfied (or not).
    pub fn set(&self, name: &str, holds: bool) {
        let mut satisfied = self.satisfied.lock();
        if holds {
            satisfied.insert(name.to_string());
        } else {
            satisfied.remove(name);
        }
    }
}

/// Frozen copy of a [`StaticConstraints`] evaluator.
struct StaticSnapshot(HashSet<String>);

impl ConstraintSnapshot for StaticSnapshot {
    fn is_constraint_satisfied(&self, constraint: &Constraint) -> bool {
        self.0.contains(&constraint.0)
    }
}

impl ConstraintEvaluator for StaticConstraints {
    fn snapshot(&self) -> Box<dyn ConstraintSnapshot> {
        Box::new(StaticSnapshot(self.satisfied.lock().clone()))
    }
}

/// Feedback emitter that records vibration durations and toast count.
#[derive(Default)]
pub struct RecordingFeedback {
    /// Requested vibration lengths.
    vibrations: Mutex<Vec<Duration>>,
    /// Toast requests.
    toasts: Mutex<usize>,
}

impl RecordingFeedback {
    /// Create an empty recorder.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Requested vibrations so far.
    pub fn vibrations(&self) -> Vec<Duration> {
        self.vibrations.lock().clone()
    }

    /// Toasts requested so far.
    pub fn toasts(&self) -> usize {
        *self.toasts.lock()
    }
}

impl FeedbackEmitter for RecordingFeedback {
    fn vibrate(&self, duration: Duration) -> Result<()> {
        self.vibrations.lock().push(duration);
        Ok(())
    }

    fn show_triggered_toast(&self) -> Result<()> {
        *self.toasts.lock() += 1;
        Ok(())
    }
}

/// Recording collaborators plus the [`Services`] wired to them.
pub struct TestRig {
    /// Recorded performs.
    pub performer: Arc<RecordingPerformer>,
    /// Switchable constraints.
    pub constraints: Arc<StaticConstraints>,
    /// Recorded feedback.
    pub feedback: Arc<RecordingFeedback>,
    /// Services for a scheduler under test.
    pub services: Services,
}

/// Build a [`TestRig`] using `defaults`.
pub fn test_rig(defaults: DefaultsProvider) -> TestRig {
    let performer = RecordingPerformer::new();
    let constraints = StaticConstraints::new();
    let feedback = RecordingFeedback::new();
    let services = Services {
        performer: performer.clone(),
        constraints: constraints.clone(),
        feedback: feedback.clone(),
        defaults,
    };
    TestRig {
        performer,
        constraints,
        feedback,
        services,
    }
}
