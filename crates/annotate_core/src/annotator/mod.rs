//! Annotator contracts consumed by the coordinator.
//!
//! # Responsibility
//! - Define the capability set every per-item annotator exposes.
//! - Define selector and error contracts shared by annotator implementations.
//!
//! # Invariants
//! - `Annotator` stays object safe; the coordinator and plugins only ever
//!   see `dyn Annotator`.
//! - Mutating calls report failure instead of panicking, so the coordinator
//!   can keep a failed buffered mutation for later.

use crate::model::annotation::{Annotation, AnnotationId, ShapeType, ShapeValidationError};
use crate::model::event::{EventType, Handler};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod memory;

pub type AnnotatorResult<T> = Result<T, AnnotatorError>;

/// Named strategy for drawing annotation geometry on an item.
pub trait Selector {
    fn name(&self) -> &str;
    fn shape_type(&self) -> ShapeType;
}

/// Per-item annotation state and overlay interaction.
pub trait Annotator {
    /// Adds `annotation`, superseding `replace` when given.
    fn add_annotation(
        &mut self,
        annotation: Annotation,
        replace: Option<&Annotation>,
    ) -> AnnotatorResult<()>;

    fn remove_annotation(&mut self, annotation: &Annotation) -> AnnotatorResult<()>;

    /// Snapshot of live annotations in display order.
    fn annotations(&self) -> Vec<Annotation>;

    /// Highlights `annotation`, or clears the highlight when `None`.
    fn highlight_annotation(&mut self, annotation: Option<&Annotation>);

    fn add_handler(&mut self, event: EventType, handler: Handler);

    fn set_selection_enabled(&mut self, enabled: bool);

    fn enable_selection(&mut self);

    fn disable_selection(&mut self);

    fn add_selector(&mut self, selector: Box<dyn Selector>);

    fn set_active_selector(&mut self, name: &str);

    fn active_selector(&self) -> Option<&dyn Selector>;

    fn available_selectors(&self) -> Vec<&dyn Selector>;
}

/// Annotator-level mutation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnnotatorError {
    /// Annotator refused the annotation.
    Rejected {
        annotation_id: AnnotationId,
        reason: String,
    },
    /// Annotation to remove or replace is not on the annotator.
    UnknownAnnotation(AnnotationId),
    /// Annotation geometry failed validation.
    InvalidShape {
        annotation_id: AnnotationId,
        source: ShapeValidationError,
    },
}

impl Display for AnnotatorError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rejected {
                annotation_id,
                reason,
            } => write!(f, "annotation {annotation_id} rejected: {reason}"),
            Self::UnknownAnnotation(id) => write!(f, "annotation not found on annotator: {id}"),
            Self::InvalidShape {
                annotation_id,
                source,
            } => write!(f, "annotation {annotation_id} has invalid shape: {source}"),
        }
    }
}

impl Error for AnnotatorError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidShape { source, .. } => Some(source),
            _ => None,
        }
    }
}
