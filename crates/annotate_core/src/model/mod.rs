//! Annotation data model shared by annotators and the coordinator.
//!
//! # Responsibility
//! - Define the annotation record, its geometry and the event payloads
//!   handlers receive.
//!
//! # Invariants
//! - Annotation identity is the `AnnotationId`, never structural equality.

pub mod annotation;
pub mod event;
