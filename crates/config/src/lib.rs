//! User preferences for keyflow: default timings, vibration, and RON loading.

pub mod defaults;
mod error;
mod loader;
mod preferences;

pub use error::Error;
pub use loader::{default_config_path, load_from_path, load_or_default, resolve_config_path};
pub use preferences::Preferences;
