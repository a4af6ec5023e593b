//! Cross-cutting registries replayed to every annotator.
//!
//! # Responsibility
//! - Keep event-handler registrations and plugins in arrival order.
//! - Apply them to one annotator on demand.
//!
//! # Invariants
//! - Replay order equals registration order.
//! - Registries never decide *when* to replay; the coordinator does, so one
//!   registration reaches one annotator exactly once.

pub mod handler;
pub mod plugin;
