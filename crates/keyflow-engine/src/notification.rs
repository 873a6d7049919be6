use std::time::Duration;

use tokio::sync::mpsc::Sender;
use tracing::info;

use crate::{Error, Result, deps::FeedbackEmitter};

/// Feedback messages delivered to the UI layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feedback {
    /// Vibrate for `duration`.
    Vibrate {
        /// Vibration length.
        duration: Duration,
    },
    /// Show the "mapping triggered" toast.
    TriggeredToast,
}

/// Sends detection feedback to the UI layer over a channel.
#[derive(Clone)]
pub struct FeedbackDispatcher {
    /// Bounded channel to the UI.
    tx: Sender<Feedback>,
}

impl FeedbackDispatcher {
    /// Create a new dispatcher from a UI message channel.
    pub fn new(tx: Sender<Feedback>) -> Self {
        Self { tx }
    }

    /// Send one feedback message without waiting.
    fn send(&self, msg: Feedback) -> Result<()> {
        info!(feedback = ?msg, "feedback_emit");
        self.tx.try_send(msg).map_err(|_| Error::ChannelClosed)
    }
}

impl FeedbackEmitter for FeedbackDispatcher {
    fn vibrate(&self, duration: Duration) -> Result<()> {
        self.send(Feedback::Vibrate { duration })
    }

    fn show_triggered_toast(&self) -> Result<()> {
        self.send(Feedback::TriggeredToast)
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc;

    use super::*;

    #[test]
    fn forwards_feedback_in_order() {
        let (tx, mut rx) = mpsc::channel(4);
        let dispatcher = FeedbackDispatcher::new(tx);
        dispatcher.vibrate(Duration::from_millis(40)).unwrap();
        dispatcher.show_triggered_toast().unwrap();

        assert_eq!(
            rx.try_recv().unwrap(),
            Feedback::Vibrate {
                duration: Duration::from_millis(40)
            }
        );
        assert_eq!(rx.try_recv().unwrap(), Feedback::TriggeredToast);
    }

    #[test]
    fn closed_channel_is_an_error() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let dispatcher = FeedbackDispatcher::new(tx);
        assert!(matches!(
            dispatcher.show_triggered_toast(),
            Err(Error::ChannelClosed)
        ));
    }
}
