//! User preferences that supply default timings to the engine.

use serde::{Deserialize, Serialize};

use crate::{Error, defaults};

/// Slowly-changing user preferences.
///
/// Every field is optional; an unset field falls back to the matching
/// constant in this crate when resolved through the `*_or_default` accessors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Preferences {
    /// Default repeat rate in milliseconds.
    pub repeat_rate: Option<u64>,
    /// Default hold-down duration in milliseconds.
    pub hold_down_duration: Option<u64>,
    /// Default vibration duration in milliseconds.
    pub vibrate_duration: Option<u64>,
    /// Vibrate on every detection, even for mappings that do not ask for it.
    pub force_vibrate: Option<bool>,
}

impl Preferences {
    /// Parse preferences from a RON string.
    pub fn from_ron(text: &str) -> Result<Self, Error> {
        let prefs: Self = ron::from_str(text).map_err(|e| Error::Parse {
            path: None,
            message: e.to_string(),
        })?;
        prefs.validate()?;
        Ok(prefs)
    }

    /// Reject values the engine cannot schedule.
    pub fn validate(&self) -> Result<(), Error> {
        if self.repeat_rate == Some(0) {
            return Err(Error::Validation {
                path: None,
                message: "repeat_rate must be at least 1 ms".to_string(),
            });
        }
        Ok(())
    }

    /// Resolved default repeat rate.
    pub fn repeat_rate_or_default(&self) -> u64 {
        self.repeat_rate.unwrap_or(defaults::REPEAT_RATE_MS)
    }

    /// Resolved default hold-down duration.
    pub fn hold_down_duration_or_default(&self) -> u64 {
        self.hold_down_duration
            .unwrap_or(defaults::HOLD_DOWN_DURATION_MS)
    }

    /// Resolved default vibration duration.
    pub fn vibrate_duration_or_default(&self) -> u64 {
        self.vibrate_duration.unwrap_or(defaults::VIBRATE_DURATION_MS)
    }

    /// Resolved force-vibrate flag.
    pub fn force_vibrate_or_default(&self) -> bool {
        self.force_vibrate.unwrap_or(defaults::FORCE_VIBRATE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_builtin_defaults() {
        let prefs = Preferences::from_ron("()").unwrap();
        assert_eq!(prefs, Preferences::default());
        assert_eq!(prefs.repeat_rate_or_default(), 50);
        assert_eq!(prefs.hold_down_duration_or_default(), 1000);
        assert_eq!(prefs.vibrate_duration_or_default(), 200);
        assert!(!prefs.force_vibrate_or_default());
    }

    #[test]
    fn partial_file_overrides_only_named_fields() {
        let prefs = Preferences::from_ron("(repeat_rate: Some(120), force_vibrate: Some(true))")
            .unwrap();
        assert_eq!(prefs.repeat_rate_or_default(), 120);
        assert_eq!(prefs.hold_down_duration_or_default(), 1000);
        assert!(prefs.force_vibrate_or_default());
    }

    #[test]
    fn zero_repeat_rate_is_rejected() {
        let err = Preferences::from_ron("(repeat_rate: Some(0))").unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
    }

    #[test]
    fn unknown_field_is_a_parse_error() {
        let err = Preferences::from_ron("(repeat_delay: Some(400))").unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
        assert!(err.pretty().starts_with("Preferences parse error"));
    }
}
