//! Annotator lifecycle events and handler type.

use crate::model::annotation::Annotation;
use serde::{Deserialize, Serialize};
use std::rc::Rc;

/// Lifecycle event types an annotator may emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    MouseOverItem,
    MouseOutOfItem,
    MouseOverAnnotation,
    MouseOutOfAnnotation,
    SelectionStarted,
    SelectionCompleted,
    SelectionCanceled,
    BeforeAnnotationRemoved,
    AnnotationRemoved,
    AnnotationCreated,
    AnnotationUpdated,
    BeforePopupHide,
}

impl EventType {
    /// Stable string id used in log events.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MouseOverItem => "mouse_over_item",
            Self::MouseOutOfItem => "mouse_out_of_item",
            Self::MouseOverAnnotation => "mouse_over_annotation",
            Self::MouseOutOfAnnotation => "mouse_out_of_annotation",
            Self::SelectionStarted => "selection_started",
            Self::SelectionCompleted => "selection_completed",
            Self::SelectionCanceled => "selection_canceled",
            Self::BeforeAnnotationRemoved => "before_annotation_removed",
            Self::AnnotationRemoved => "annotation_removed",
            Self::AnnotationCreated => "annotation_created",
            Self::AnnotationUpdated => "annotation_updated",
            Self::BeforePopupHide => "before_popup_hide",
        }
    }
}

/// Payload delivered to handlers.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationEvent {
    pub event: EventType,
    /// Identifying URL of the item whose annotator emitted the event.
    pub item_url: String,
    pub annotation: Option<Annotation>,
}

/// Event handler shared by every annotator it is attached to.
pub type Handler = Rc<dyn Fn(&AnnotationEvent)>;
