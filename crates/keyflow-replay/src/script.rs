//! Replay scripts: mappings plus the timed events that drive them.

use std::{collections::BTreeMap, fs, path::Path};

use keyflow_engine::Mapping;
use serde::Deserialize;

use crate::error::{Error, Result};

/// One timed input to the scheduler. The first field is the offset in
/// milliseconds from the start of the replay.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub enum Event {
    /// Detect the named mapping.
    Detect(u64, String),
    /// Tear down all scheduler work.
    Reset(u64),
    /// Push a new default repeat rate (milliseconds) into the preferences.
    SetRepeatRate(u64, u64),
}

impl Event {
    /// Offset of this event from the start of the replay.
    pub fn at_ms(&self) -> u64 {
        match self {
            Self::Detect(at, _) | Self::Reset(at) | Self::SetRepeatRate(at, _) => *at,
        }
    }
}

/// A complete replay script.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Script {
    /// Mappings by id.
    pub mappings: BTreeMap<String, Mapping>,
    /// Action payloads the performer reports as unperformable.
    #[serde(default)]
    pub unavailable: Vec<String>,
    /// Constraints that hold for the whole replay.
    #[serde(default)]
    pub satisfied: Vec<String>,
    /// Timed events; replayed in offset order.
    pub events: Vec<Event>,
    /// Total replay length in milliseconds; the scheduler is reset at the end.
    pub run_for_ms: u64,
}

impl Script {
    /// Parse and validate a script from RON text.
    pub fn from_ron(text: &str) -> Result<Self> {
        Self::parse(text, "<inline>")
    }

    /// Load and validate a script from `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::parse(&text, &path.display().to_string())
    }

    /// Parse, check mapping references, and sort events by offset.
    fn parse(text: &str, origin: &str) -> Result<Self> {
        let mut script: Self = ron::from_str(text).map_err(|e| Error::ScriptParse {
            origin: origin.to_string(),
            message: e.to_string(),
        })?;
        for event in &script.events {
            if let Event::Detect(at_ms, id) = event
                && !script.mappings.contains_key(id)
            {
                return Err(Error::UnknownMapping {
                    at_ms: *at_ms,
                    mapping_id: id.clone(),
                });
            }
        }
        script.events.sort_by_key(Event::at_ms);
        Ok(script)
    }
}
