//! Read-through cache of user preferences with built-in fallbacks.
//!
//! The host owns a [`PreferencesHandle`] and pushes changes whenever its
//! settings store changes; the engine holds a [`DefaultsProvider`] and reads
//! the latest value at the moment it needs one. No change notifications are
//! consumed by the engine.

use std::{path::Path, sync::Arc, time::Duration};

use config::Preferences;
use tokio::sync::watch;
use tracing::debug;

use crate::Result;

/// Writer side: lets the host replace or edit the preferences.
#[derive(Clone)]
pub struct PreferencesHandle {
    /// Sender shared by every clone of this handle.
    tx: Arc<watch::Sender<Preferences>>,
}

impl PreferencesHandle {
    /// Replace all preferences.
    pub fn set(&self, prefs: Preferences) {
        debug!(?prefs, "preferences_set");
        self.tx.send_replace(prefs);
    }

    /// Edit the preferences in place.
    pub fn update(&self, f: impl FnOnce(&mut Preferences)) {
        self.tx.send_modify(f);
    }
}

/// Reader side: the four engine defaults, each resolved on demand.
#[derive(Clone)]
pub struct DefaultsProvider {
    /// Latest preferences pushed by the host.
    rx: watch::Receiver<Preferences>,
}

impl DefaultsProvider {
    /// Create a linked handle/provider pair seeded with `initial`.
    pub fn channel(initial: Preferences) -> (PreferencesHandle, Self) {
        let (tx, rx) = watch::channel(initial);
        (PreferencesHandle { tx: Arc::new(tx) }, Self { rx })
    }

    /// A provider that never changes.
    pub fn fixed(prefs: Preferences) -> Self {
        Self::channel(prefs).1
    }

    /// Load preferences from `explicit` (or the default location) and build a pair.
    pub fn load(explicit: Option<&Path>) -> Result<(PreferencesHandle, Self)> {
        let prefs = config::load_or_default(explicit)?;
        Ok(Self::channel(prefs))
    }

    /// Snapshot of the raw preferences.
    fn prefs(&self) -> Preferences {
        *self.rx.borrow()
    }

    /// Default interval between repeats.
    pub fn repeat_rate(&self) -> Duration {
        Duration::from_millis(self.prefs().repeat_rate_or_default())
    }

    /// Default DOWN-to-UP time for repeating hold-down actions.
    pub fn hold_down_duration(&self) -> Duration {
        Duration::from_millis(self.prefs().hold_down_duration_or_default())
    }

    /// Default vibration length.
    pub fn vibrate_duration(&self) -> Duration {
        Duration::from_millis(self.prefs().vibrate_duration_or_default())
    }

    /// Vibrate on every detection.
    pub fn force_vibrate(&self) -> bool {
        self.prefs().force_vibrate_or_default()
    }
}

impl Default for DefaultsProvider {
    fn default() -> Self {
        Self::fixed(Preferences::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_preferences_fall_back_to_constants() {
        let defaults = DefaultsProvider::default();
        assert_eq!(defaults.repeat_rate(), Duration::from_millis(50));
        assert_eq!(defaults.hold_down_duration(), Duration::from_millis(1000));
        assert_eq!(defaults.vibrate_duration(), Duration::from_millis(200));
        assert!(!defaults.force_vibrate());
    }

    #[test]
    fn reads_observe_latest_pushed_value() {
        let (handle, defaults) = DefaultsProvider::channel(Preferences::default());
        handle.update(|p| p.repeat_rate = Some(75));
        assert_eq!(defaults.repeat_rate(), Duration::from_millis(75));

        handle.set(Preferences {
            force_vibrate: Some(true),
            ..Preferences::default()
        });
        assert!(defaults.force_vibrate());
        assert_eq!(defaults.repeat_rate(), Duration::from_millis(50));
    }
}
