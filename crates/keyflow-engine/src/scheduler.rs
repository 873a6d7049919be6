//! Per-mapping action playback.
//!
//! Every detection of a mapping supersedes the previous detection of the same
//! mapping id: its repeat tasks and its main sequence are cancelled before the
//! new sequence starts. All scheduler state lives behind one mutex that is
//! never held across an `.await` or while calling a collaborator, and every
//! write made on behalf of a sequence first checks that sequence's token under
//! that mutex, so a cancelled sequence cannot mutate state after the fact.

use std::{collections::HashMap, sync::Arc, time::Duration};

use parking_lot::Mutex;
use tokio::{runtime::Handle, task::JoinHandle, time};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use crate::{
    Error, Result,
    deps::perform_action,
    held::HeldActionTracker,
    model::{Action, InputEventType, Mapping, RepeatMode},
    repeat_task::{RepeatTask, TaskState},
    services::Services,
};

/// The running ordered playback of one detection.
struct SequenceTask {
    /// Supersedes the sequence at its next suspension point.
    token: CancellationToken,
    /// Lets callers observe completion.
    handle: JoinHandle<()>,
}

/// Everything the scheduler mutates.
#[derive(Default)]
struct SchedulerState {
    /// Repeat tasks owned by the latest completed sequence of each mapping.
    repeat_tasks: HashMap<String, Vec<RepeatTask>>,
    /// Latest main sequence per mapping.
    main_sequences: HashMap<String, SequenceTask>,
    /// Hold-down actions whose UP has not been sent.
    held: HeldActionTracker,
}

/// Runs mapping action lists when their triggers are detected.
///
/// Construct with [`MappingActionScheduler::new`] inside a tokio runtime, then
/// call [`MappingActionScheduler::on_detected`] from the trigger detector and
/// [`MappingActionScheduler::reset`] on shutdown or pause.
#[derive(Clone)]
pub struct MappingActionScheduler {
    /// External collaborators.
    services: Services,
    /// Task maps and held actions.
    state: Arc<Mutex<SchedulerState>>,
    /// Runtime all sequences and repeats are spawned on.
    rt: Handle,
}

impl MappingActionScheduler {
    /// Create a scheduler bound to the current tokio runtime.
    pub fn new(services: Services) -> Result<Self> {
        let rt = Handle::try_current().map_err(|_| Error::NoRuntime)?;
        Ok(Self::with_handle(services, rt))
    }

    /// Create a scheduler that spawns its work on `rt`.
    pub fn with_handle(services: Services, rt: Handle) -> Self {
        Self {
            services,
            state: Arc::new(Mutex::new(SchedulerState::default())),
            rt,
        }
    }

    /// Handle a detection of `mapping` under `mapping_id`.
    ///
    /// Does nothing if the mapping is disabled, has no actions, or its
    /// constraints are not satisfied. Otherwise cancels the mapping's previous
    /// work, starts playing the action list in the background, and emits
    /// vibration/toast feedback without waiting for playback.
    pub fn on_detected(&self, mapping_id: &str, mapping: &Mapping) {
        if !mapping.is_enabled {
            trace!(mapping_id, "detect_skip_disabled");
            return;
        }
        if mapping.action_list.is_empty() {
            trace!(mapping_id, "detect_skip_no_actions");
            return;
        }
        if !mapping.constraint_state.constraints.is_empty() {
            let snapshot = self.services.constraints.snapshot();
            if !snapshot.is_satisfied(&mapping.constraint_state) {
                debug!(mapping_id, "detect_skip_constraints");
                return;
            }
        }

        debug!(
            mapping_id,
            actions = mapping.action_list.len(),
            "mapping_detected"
        );
        {
            let mut st = self.state.lock();
            if let Some(tasks) = st.repeat_tasks.get_mut(mapping_id) {
                for task in tasks.iter_mut() {
                    task.cancel();
                }
            }
            if let Some(prev) = st.main_sequences.remove(mapping_id) {
                prev.token.cancel();
            }

            let token = CancellationToken::new();
            let cancel = token.clone();
            let body = self.clone().run_sequence(
                mapping_id.to_string(),
                mapping.action_list.clone(),
                token.clone(),
            );
            let handle = self.rt.spawn(async move {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => {}
                    _ = body => {}
                }
            });
            st.main_sequences
                .insert(mapping_id.to_string(), SequenceTask { token, handle });
        }

        self.emit_feedback(mapping);
    }

    /// Cancel all work for every mapping and release every held action.
    ///
    /// Each held action gets exactly one UP (times its multiplier), so no key
    /// is left logically pressed.
    pub fn reset(&self) {
        let released = {
            let mut st = self.state.lock();
            for (_, mut tasks) in st.repeat_tasks.drain() {
                for task in &mut tasks {
                    task.cancel();
                }
            }
            for (_, seq) in st.main_sequences.drain() {
                seq.token.cancel();
            }
            st.held.drain()
        };
        debug!(released = released.len(), "scheduler_reset");
        for action in &released {
            perform_action(&*self.services.performer, action, InputEventType::Up);
        }
    }

    /// True if the action with `uid` has been pressed down and not yet released.
    pub fn is_held(&self, uid: &str) -> bool {
        self.state.lock().held.contains(uid)
    }

    /// Number of held hold-down actions.
    pub fn held_count(&self) -> usize {
        self.state.lock().held.len()
    }

    /// Number of repeat tasks recorded for `mapping_id` that are still repeating.
    pub fn active_repeat_count(&self, mapping_id: &str) -> usize {
        self.state
            .lock()
            .repeat_tasks
            .get(mapping_id)
            .map_or(0, |tasks| {
                tasks
                    .iter()
                    .filter(|t| t.state() == TaskState::Running)
                    .count()
            })
    }

    /// States of the repeat tasks recorded for `mapping_id`, keyed by action uid.
    pub fn repeat_task_states(&self, mapping_id: &str) -> Vec<(String, TaskState)> {
        self.state
            .lock()
            .repeat_tasks
            .get(mapping_id)
            .map(|tasks| {
                tasks
                    .iter()
                    .map(|t| (t.action_uid().to_string(), t.state()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// True while the main sequence of `mapping_id` is still playing.
    pub fn is_sequence_running(&self, mapping_id: &str) -> bool {
        self.state
            .lock()
            .main_sequences
            .get(mapping_id)
            .is_some_and(|seq| !seq.token.is_cancelled() && !seq.handle.is_finished())
    }

    /// Play `actions` in order, then record the repeat tasks started along the way.
    async fn run_sequence(self, mapping_id: String, actions: Vec<Action>, token: CancellationToken) {
        let mut started = Vec::new();
        for action in &actions {
            if let Some(err) = self.services.performer.error(&action.data) {
                debug!(mapping_id, uid = %action.uid, error = %err, "action_skip_unperformable");
                continue;
            }

            if action.repeats_in_scheduler() {
                if let Some(task) = self.start_or_toggle_repeat(&mapping_id, action, &token) {
                    started.push(task);
                }
            } else if !self.perform_tap_or_hold(action, &token) {
                return;
            }

            let delay = action.delay_before_next_action.unwrap_or(0);
            if delay > 0 {
                time::sleep(Duration::from_millis(delay)).await;
            }
        }

        let mut st = self.state.lock();
        if token.is_cancelled() {
            return;
        }
        trace!(mapping_id, repeats = started.len(), "sequence_done");
        st.repeat_tasks.insert(mapping_id, started);
    }

    /// Start a repeat for `action`, or stop the previous one if the mode is press-again.
    ///
    /// Returns the started task, or `None` when the repeat was toggled off or
    /// the sequence has been superseded.
    fn start_or_toggle_repeat(
        &self,
        mapping_id: &str,
        action: &Action,
        token: &CancellationToken,
    ) -> Option<RepeatTask> {
        let mut task = {
            let mut st = self.state.lock();
            if token.is_cancelled() {
                return None;
            }
            let previous = st
                .repeat_tasks
                .get_mut(mapping_id)
                .and_then(|tasks| tasks.iter_mut().find(|t| t.action_uid() == action.uid));
            if action.repeat_mode == RepeatMode::TriggerPressedAgain
                && let Some(prev) = previous
            {
                prev.cancel();
                debug!(mapping_id, uid = %action.uid, "repeat_toggled_off");
                return None;
            }
            RepeatTask::new(
                action.clone(),
                self.services.performer.clone(),
                self.services.defaults.clone(),
            )
        };
        debug!(mapping_id, uid = %action.uid, mode = ?action.repeat_mode, "repeat_started");
        task.start(&self.rt);
        Some(task)
    }

    /// Perform a non-repeating action, pairing hold-down DOWNs with the next detection's UP.
    ///
    /// Returns false if the sequence was superseded before the action ran.
    fn perform_tap_or_hold(&self, action: &Action, token: &CancellationToken) -> bool {
        let signal = {
            let mut st = self.state.lock();
            if token.is_cancelled() {
                return false;
            }
            if st.held.remove(&action.uid).is_some() {
                InputEventType::Up
            } else if st.held.insert(action) {
                InputEventType::Down
            } else {
                InputEventType::DownUp
            }
        };
        trace!(uid = %action.uid, ?signal, "action_perform");
        perform_action(&*self.services.performer, action, signal);

        // A reset or supersession that drained the tracker while the DOWN was
        // in flight has already sent its UP; send ours after the DOWN.
        if signal == InputEventType::Down {
            let orphaned = {
                let st = self.state.lock();
                token.is_cancelled() && !st.held.contains(&action.uid)
            };
            if orphaned {
                debug!(uid = %action.uid, "hold_released_after_reset");
                perform_action(&*self.services.performer, action, InputEventType::Up);
            }
        }
        true
    }

    /// Request vibration and toast feedback for a detection.
    fn emit_feedback(&self, mapping: &Mapping) {
        let defaults = &self.services.defaults;
        if mapping.vibrate || defaults.force_vibrate() {
            let duration = mapping
                .vibrate_duration
                .map(Duration::from_millis)
                .unwrap_or_else(|| defaults.vibrate_duration());
            if let Err(e) = self.services.feedback.vibrate(duration) {
                warn!(error = %e, "feedback_vibrate_failed");
            }
        }
        if mapping.show_toast
            && let Err(e) = self.services.feedback.show_triggered_toast()
        {
            warn!(error = %e, "feedback_toast_failed");
        }
    }
}
