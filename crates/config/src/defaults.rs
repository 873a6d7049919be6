//! Built-in fallbacks used when a preference is unset.

/// Interval between repeats of a repeating action, in milliseconds.
pub const REPEAT_RATE_MS: u64 = 50;

/// How long a repeating hold-down action stays down per cycle, in milliseconds.
pub const HOLD_DOWN_DURATION_MS: u64 = 1000;

/// Vibration length when a mapping does not specify one, in milliseconds.
pub const VIBRATE_DURATION_MS: u64 = 200;

/// Whether every detection vibrates regardless of the mapping's own flag.
pub const FORCE_VIBRATE: bool = false;
