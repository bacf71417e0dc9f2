//! Batch export: name lists, archive sinks and the orchestration loop.

/// Archive destinations.
pub mod archive;
/// Recipient names.
pub mod names;
/// The per-entry render/encode/archive loop.
pub mod orchestrator;
