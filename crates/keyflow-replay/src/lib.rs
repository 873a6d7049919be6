//! Replay timed mapping detections against the keyflow engine.
//!
//! A replay script defines mappings and a list of timed events (detections,
//! resets, preference changes). The driver feeds them to a
//! `MappingActionScheduler` whose performer logs every action instead of
//! touching the system, which makes timing and repeat behaviour visible.

pub mod cli;
pub mod error;
pub mod replay;
pub mod script;
