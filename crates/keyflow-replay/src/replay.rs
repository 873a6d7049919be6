//! Drive a [`MappingActionScheduler`] from a [`Script`] and log what it does.

use std::{
    collections::HashSet,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use keyflow_engine::{
    ActionData, ActionError, ActionPerformer, Constraint, ConstraintEvaluator, ConstraintSnapshot,
    DefaultsProvider, FeedbackDispatcher, InputEventType, MappingActionScheduler,
    PreferencesHandle, Services,
};
use tokio::{
    sync::mpsc,
    time::{self, Instant},
};
use tracing::{debug, info};

use crate::{
    error::Result,
    script::{Event, Script},
};

/// Capacity of the feedback channel between the engine and the log sink.
const FEEDBACK_BUFFER: usize = 64;

/// Counts gathered over one replay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    /// `perform` calls, including the UPs sent by the final reset.
    pub performed: usize,
    /// Feedback messages emitted.
    pub feedback: usize,
    /// Hold-down actions still held when the replay ended.
    pub released_on_exit: usize,
}

/// Performer that logs each call instead of touching the system.
struct LogPerformer {
    /// Reference point for logged offsets.
    start: Instant,
    /// Payloads reported as unperformable.
    unavailable: HashSet<ActionData>,
    /// Calls so far.
    count: AtomicUsize,
}

impl ActionPerformer for LogPerformer {
    fn error(&self, data: &ActionData) -> Option<ActionError> {
        self.unavailable
            .contains(data)
            .then(|| ActionError("marked unavailable by script".to_string()))
    }

    fn perform(&self, data: &ActionData, signal: InputEventType) {
        self.count.fetch_add(1, Ordering::SeqCst);
        info!(
            at_ms = u64::try_from(self.start.elapsed().as_millis()).unwrap_or(u64::MAX),
            data = %data,
            ?signal,
            "perform"
        );
    }
}

/// Constraint evaluator backed by the script's `satisfied` list.
struct ScriptConstraints(Arc<HashSet<String>>);

/// Snapshot sharing the evaluator's fixed set.
struct ScriptSnapshot(Arc<HashSet<String>>);

impl ConstraintSnapshot for ScriptSnapshot {
    fn is_constraint_satisfied(&self, constraint: &Constraint) -> bool {
        self.0.contains(&constraint.0)
    }
}

impl ConstraintEvaluator for ScriptConstraints {
    fn snapshot(&self) -> Box<dyn ConstraintSnapshot> {
        Box::new(ScriptSnapshot(self.0.clone()))
    }
}

/// Replay `script` in real time (or virtual time under a paused test clock).
///
/// Events fire at their offsets; after `run_for_ms` the scheduler is reset so
/// nothing is left held down.
pub async fn run(
    script: &Script,
    prefs: &PreferencesHandle,
    defaults: DefaultsProvider,
) -> Result<ReplaySummary> {
    let start = Instant::now();
    let performer = Arc::new(LogPerformer {
        start,
        unavailable: script
            .unavailable
            .iter()
            .map(|s| ActionData::new(s.as_str()))
            .collect(),
        count: AtomicUsize::new(0),
    });

    let (tx, mut rx) = mpsc::channel(FEEDBACK_BUFFER);
    let feedback_sink = tokio::spawn(async move {
        let mut seen = 0usize;
        while let Some(msg) = rx.recv().await {
            seen += 1;
            debug!(?msg, "feedback_received");
        }
        seen
    });

    let scheduler = MappingActionScheduler::new(Services {
        performer: performer.clone(),
        constraints: Arc::new(ScriptConstraints(Arc::new(
            script.satisfied.iter().cloned().collect(),
        ))),
        feedback: Arc::new(FeedbackDispatcher::new(tx)),
        defaults,
    })?;

    for event in &script.events {
        time::sleep_until(start + Duration::from_millis(event.at_ms())).await;
        match event {
            Event::Detect(_, id) => {
                if let Some(mapping) = script.mappings.get(id) {
                    scheduler.on_detected(id, mapping);
                }
            }
            Event::Reset(_) => scheduler.reset(),
            Event::SetRepeatRate(_, ms) => prefs.update(|p| p.repeat_rate = Some(*ms)),
        }
    }

    time::sleep_until(start + Duration::from_millis(script.run_for_ms)).await;
    let released_on_exit = scheduler.held_count();
    scheduler.reset();
    drop(scheduler);

    let feedback = feedback_sink.await.unwrap_or_default();
    Ok(ReplaySummary {
        performed: performer.count.load(Ordering::SeqCst),
        feedback,
        released_on_exit,
    })
}
