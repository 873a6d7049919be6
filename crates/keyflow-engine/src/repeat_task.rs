//! Lazily started, cancellable repetition of a single action.
//!
//! A [`RepeatTask`] is built in the [`TaskState::Created`] state and does
//! nothing until [`RepeatTask::start`] spawns it. This lets the scheduler
//! decide, after creating a task, whether to run it or discard it.
//!
//! Cancellation takes effect at the task's next suspension point (the
//! hold-down wait or the wait between repeats). Cancelling does not send a
//! trailing UP for a hold-down action that is mid-press.

use std::{sync::Arc, time::Duration};

use futures::{FutureExt, future::BoxFuture};
use parking_lot::Mutex;
use tokio::{runtime::Handle, time};
use tokio_util::sync::CancellationToken;
use tracing::trace;

use crate::{
    defaults::DefaultsProvider,
    deps::{ActionPerformer, perform_action},
    model::{Action, InputEventType},
};

/// Lifecycle of a [`RepeatTask`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    /// Built but not spawned.
    Created,
    /// Spawned and repeating.
    Running,
    /// Cancelled before or during its run.
    Cancelled,
    /// Reached its repeat limit.
    Completed,
}

/// Repeats one action at a fixed rate until cancelled or its limit is reached.
pub struct RepeatTask {
    /// Uid of the repeated action; the lookup key within a mapping.
    action_uid: String,
    /// Cancels the spawned body.
    token: CancellationToken,
    /// Shared with the spawned body so completion is observable.
    state: Arc<Mutex<TaskState>>,
    /// Body waiting to be spawned; `None` once started or cancelled.
    body: Option<BoxFuture<'static, ()>>,
}

impl RepeatTask {
    /// Build a task for `action` without running it.
    pub fn new(
        action: Action,
        performer: Arc<dyn ActionPerformer>,
        defaults: DefaultsProvider,
    ) -> Self {
        Self {
            action_uid: action.uid.clone(),
            token: CancellationToken::new(),
            state: Arc::new(Mutex::new(TaskState::Created)),
            body: Some(repeat_action(action, performer, defaults).boxed()),
        }
    }

    /// Uid of the action this task repeats.
    pub fn action_uid(&self) -> &str {
        &self.action_uid
    }

    /// Current lifecycle state.
    pub fn state(&self) -> TaskState {
        *self.state.lock()
    }

    /// Spawn the body on `rt`. Does nothing unless the task is still `Created`.
    pub fn start(&mut self, rt: &Handle) {
        {
            let mut st = self.state.lock();
            if *st != TaskState::Created {
                return;
            }
            *st = TaskState::Running;
        }
        let Some(body) = self.body.take() else {
            return;
        };
        let token = self.token.clone();
        let state = self.state.clone();
        let uid = self.action_uid.clone();
        trace!("repeat_start" = %uid);
        rt.spawn(async move {
            tokio::select! {
                biased;
                _ = token.cancelled() => {
                    trace!("repeat_cancelled" = %uid);
                }
                _ = body => {
                    let mut st = state.lock();
                    if *st == TaskState::Running {
                        *st = TaskState::Completed;
                    }
                    trace!("repeat_limit_reached" = %uid);
                }
            }
        });
    }

    /// Cancel the task. A `Created` task will never run; a `Running` one stops at its next wait.
    pub fn cancel(&mut self) {
        self.token.cancel();
        self.body = None;
        let mut st = self.state.lock();
        if matches!(*st, TaskState::Created | TaskState::Running) {
            *st = TaskState::Cancelled;
        }
    }
}

impl Drop for RepeatTask {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// The repeat loop for `action`.
///
/// The first firing counts as repeat zero, so with `repeat_limit = n` the
/// action fires `n + 1` times. The loop still waits one `repeat_rate` after the
/// final firing before finishing.
async fn repeat_action(
    action: Action,
    performer: Arc<dyn ActionPerformer>,
    defaults: DefaultsProvider,
) {
    let repeat_rate = action
        .repeat_rate
        .map(Duration::from_millis)
        .unwrap_or_else(|| defaults.repeat_rate());
    let hold_down_duration = action
        .hold_down_duration
        .map(Duration::from_millis)
        .unwrap_or_else(|| defaults.hold_down_duration());

    let mut repeat_count: u64 = 0;
    loop {
        if action.hold_down {
            perform_action(&*performer, &action, InputEventType::Down);
            time::sleep(hold_down_duration).await;
            perform_action(&*performer, &action, InputEventType::Up);
        } else {
            perform_action(&*performer, &action, InputEventType::DownUp);
        }

        repeat_count += 1;
        let done = action
            .repeat_limit
            .is_some_and(|limit| repeat_count >= u64::from(limit) + 1);

        time::sleep(repeat_rate).await;
        if done {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        model::{ActionData, RepeatMode},
        test_support::RecordingPerformer,
    };

    fn repeating(limit: Option<u32>) -> Action {
        Action {
            repeat: true,
            repeat_mode: RepeatMode::LimitReached,
            repeat_rate: Some(100),
            repeat_limit: limit,
            ..Action::new("r", ActionData::new("page_down"))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn created_task_does_nothing_until_started() {
        let performer = RecordingPerformer::new();
        let mut task = RepeatTask::new(
            repeating(Some(1)),
            performer.clone(),
            DefaultsProvider::default(),
        );
        time::sleep(Duration::from_millis(500)).await;
        assert_eq!(task.state(), TaskState::Created);
        assert!(performer.events().is_empty());

        task.cancel();
        task.start(&Handle::current());
        time::sleep(Duration::from_millis(500)).await;
        assert_eq!(task.state(), TaskState::Cancelled);
        assert!(performer.events().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn limit_fires_one_more_than_the_limit_then_completes() {
        let performer = RecordingPerformer::new();
        let mut task = RepeatTask::new(
            repeating(Some(3)),
            performer.clone(),
            DefaultsProvider::default(),
        );
        task.start(&Handle::current());
        time::sleep(Duration::from_millis(1000)).await;

        let times: Vec<u64> = performer.events().iter().map(|e| e.at_ms).collect();
        assert_eq!(times, [0, 100, 200, 300]);
        assert_eq!(task.state(), TaskState::Completed);
    }

    #[tokio::test(start_paused = true)]
    async fn hold_down_repeat_sends_down_wait_up() {
        let performer = RecordingPerformer::new();
        let action = Action {
            hold_down: true,
            hold_down_duration: Some(30),
            ..repeating(Some(0))
        };
        let mut task = RepeatTask::new(action, performer.clone(), DefaultsProvider::default());
        task.start(&Handle::current());
        time::sleep(Duration::from_millis(500)).await;

        let seen: Vec<(u64, InputEventType)> = performer
            .events()
            .iter()
            .map(|e| (e.at_ms, e.signal))
            .collect();
        assert_eq!(
            seen,
            [(0, InputEventType::Down), (30, InputEventType::Up)]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_mid_hold_sends_no_trailing_up() {
        let performer = RecordingPerformer::new();
        let action = Action {
            hold_down: true,
            hold_down_duration: Some(100),
            ..repeating(None)
        };
        let mut task = RepeatTask::new(action, performer.clone(), DefaultsProvider::default());
        task.start(&Handle::current());
        time::sleep(Duration::from_millis(50)).await;
        task.cancel();
        time::sleep(Duration::from_millis(500)).await;

        let signals: Vec<InputEventType> = performer.events().iter().map(|e| e.signal).collect();
        assert_eq!(signals, [InputEventType::Down]);
        assert_eq!(task.state(), TaskState::Cancelled);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_stops_an_unbounded_repeat() {
        let performer = RecordingPerformer::new();
        let mut task = RepeatTask::new(repeating(None), performer.clone(), DefaultsProvider::default());
        task.start(&Handle::current());
        time::sleep(Duration::from_millis(250)).await;
        task.cancel();
        let fired = performer.events().len();
        assert_eq!(fired, 3);

        time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(performer.events().len(), fired);
        assert_eq!(task.state(), TaskState::Cancelled);
    }
}
