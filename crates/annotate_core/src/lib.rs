//! Core annotation lifecycle coordination.
//! This crate is the single source of truth for the item/annotator invariants.

pub mod annotator;
pub mod config;
pub mod coordinator;
pub mod extension;
pub mod logging;
pub mod model;

pub use annotator::memory::{InMemoryAnnotator, NamedSelector, DEFAULT_SELECTOR_NAME};
pub use annotator::{Annotator, AnnotatorError, AnnotatorResult, Selector};
pub use config::ModuleConfig;
pub use coordinator::adapter::{ListenerKey, MediaAdapter, Viewport};
pub use coordinator::buffer::{MutationBuffer, MutationKind, ReconcileReport, RejectedMutation};
pub use coordinator::items::ItemState;
pub use coordinator::{AnnotationModule, MutationOutcome};
pub use extension::plugin::Plugin;
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::annotation::{
    Annotation, AnnotationId, Geometry, Point, Shape, ShapeType, ShapeValidationError, Units,
};
pub use model::event::{AnnotationEvent, EventType, Handler};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
