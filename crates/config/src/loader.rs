//! Locate and load the preferences file.

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::{Error, Preferences};

/// Determine the preferred preferences path (`~/.keyflow/preferences.ron`).
pub fn default_config_path() -> PathBuf {
    let mut p = PathBuf::from(env::var_os("HOME").unwrap_or_default());
    p.push(".keyflow");
    p.push("preferences.ron");
    p
}

/// Resolve the effective preferences path.
///
/// Policy:
/// 1) Use `explicit` when provided.
/// 2) Else use `~/.keyflow/preferences.ron` when it exists.
/// 3) Else `None`; the built-in defaults apply.
pub fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    let preferred = default_config_path();
    preferred.exists().then_some(preferred)
}

/// Load and validate preferences from the RON file at `path`.
pub fn load_from_path(path: &Path) -> Result<Preferences, Error> {
    let text = fs::read_to_string(path).map_err(|e| Error::Read {
        path: Some(path.to_path_buf()),
        message: format!("Failed to read preferences: {}", e),
    })?;
    let prefs = Preferences::from_ron(&text).map_err(|e| e.with_path(path))?;
    debug!(path = %path.display(), ?prefs, "preferences_loaded");
    Ok(prefs)
}

/// Load preferences from the resolved path, or the built-in defaults when no file exists.
pub fn load_or_default(explicit: Option<&Path>) -> Result<Preferences, Error> {
    match resolve_config_path(explicit) {
        Some(path) => load_from_path(&path),
        None => Ok(Preferences::default()),
    }
}
