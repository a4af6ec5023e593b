//! Headless in-memory annotator.
//!
//! # Responsibility
//! - Keep annotation, selector and selection state for one item without any
//!   overlay rendering.
//! - Emit lifecycle events to attached handlers for every state change.
//!
//! # Invariants
//! - Every stored annotation has `src == item_url`.
//! - At most one annotation per `AnnotationId`.

use crate::annotator::{Annotator, AnnotatorError, AnnotatorResult, Selector};
use crate::model::annotation::{Annotation, AnnotationId, ShapeType};
use crate::model::event::{AnnotationEvent, EventType, Handler};

/// Name of the selector every in-memory annotator starts with.
pub const DEFAULT_SELECTOR_NAME: &str = "rect";

/// Selector identified only by name and shape family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedSelector {
    name: String,
    shape_type: ShapeType,
}

impl NamedSelector {
    pub fn new(name: impl Into<String>, shape_type: ShapeType) -> Self {
        Self {
            name: name.into(),
            shape_type,
        }
    }
}

impl Selector for NamedSelector {
    fn name(&self) -> &str {
        &self.name
    }

    fn shape_type(&self) -> ShapeType {
        self.shape_type
    }
}

/// Annotator keeping all state in memory.
pub struct InMemoryAnnotator {
    item_url: String,
    annotations: Vec<Annotation>,
    handlers: Vec<(EventType, Handler)>,
    selectors: Vec<Box<dyn Selector>>,
    active_selector: Option<usize>,
    selection_enabled: bool,
    highlighted: Option<AnnotationId>,
}

impl InMemoryAnnotator {
    /// Creates an annotator for `item_url` with the default rect selector
    /// active and selection enabled.
    pub fn new(item_url: impl Into<String>) -> Self {
        Self {
            item_url: item_url.into(),
            annotations: Vec::new(),
            handlers: Vec::new(),
            selectors: vec![Box::new(NamedSelector::new(
                DEFAULT_SELECTOR_NAME,
                ShapeType::Rect,
            ))],
            active_selector: Some(0),
            selection_enabled: true,
            highlighted: None,
        }
    }

    pub fn item_url(&self) -> &str {
        &self.item_url
    }

    pub fn is_selection_enabled(&self) -> bool {
        self.selection_enabled
    }

    pub fn highlighted(&self) -> Option<AnnotationId> {
        self.highlighted
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    fn position(&self, id: AnnotationId) -> Option<usize> {
        self.annotations.iter().position(|a| a.id == id)
    }

    fn emit(&self, event: EventType, annotation: Option<&Annotation>) {
        let payload = AnnotationEvent {
            event,
            item_url: self.item_url.clone(),
            annotation: annotation.cloned(),
        };
        for (registered, handler) in &self.handlers {
            if *registered == event {
                handler(&payload);
            }
        }
    }
}

impl Annotator for InMemoryAnnotator {
    fn add_annotation(
        &mut self,
        annotation: Annotation,
        replace: Option<&Annotation>,
    ) -> AnnotatorResult<()> {
        if annotation.src != self.item_url {
            return Err(AnnotatorError::Rejected {
                annotation_id: annotation.id,
                reason: format!("annotation targets `{}`", annotation.src),
            });
        }
        annotation
            .validate()
            .map_err(|source| AnnotatorError::InvalidShape {
                annotation_id: annotation.id,
                source,
            })?;

        let slot = match replace {
            Some(previous) => Some(
                self.position(previous.id)
                    .ok_or(AnnotatorError::UnknownAnnotation(previous.id))?,
            ),
            None => self.position(annotation.id),
        };

        match slot {
            Some(index) => {
                if self.highlighted == Some(self.annotations[index].id) {
                    self.highlighted = Some(annotation.id);
                }
                self.annotations[index] = annotation;
                self.emit(EventType::AnnotationUpdated, Some(&self.annotations[index]));
            }
            None => {
                self.annotations.push(annotation);
                self.emit(EventType::AnnotationCreated, self.annotations.last());
            }
        }
        Ok(())
    }

    fn remove_annotation(&mut self, annotation: &Annotation) -> AnnotatorResult<()> {
        let index = self
            .position(annotation.id)
            .ok_or(AnnotatorError::UnknownAnnotation(annotation.id))?;
        self.emit(
            EventType::BeforeAnnotationRemoved,
            Some(&self.annotations[index]),
        );
        let removed = self.annotations.remove(index);
        if self.highlighted == Some(removed.id) {
            self.highlighted = None;
        }
        self.emit(EventType::AnnotationRemoved, Some(&removed));
        Ok(())
    }

    fn annotations(&self) -> Vec<Annotation> {
        self.annotations.clone()
    }

    fn highlight_annotation(&mut self, annotation: Option<&Annotation>) {
        match annotation {
            Some(target) => {
                let Some(index) = self.position(target.id) else {
                    return;
                };
                self.highlighted = Some(target.id);
                self.emit(
                    EventType::MouseOverAnnotation,
                    Some(&self.annotations[index]),
                );
            }
            None => {
                let Some(previous) = self.highlighted.take() else {
                    return;
                };
                let annotation = self.position(previous).map(|i| &self.annotations[i]);
                self.emit(EventType::MouseOutOfAnnotation, annotation);
            }
        }
    }

    fn add_handler(&mut self, event: EventType, handler: Handler) {
        self.handlers.push((event, handler));
    }

    fn set_selection_enabled(&mut self, enabled: bool) {
        self.selection_enabled = enabled;
    }

    fn enable_selection(&mut self) {
        self.selection_enabled = true;
    }

    fn disable_selection(&mut self) {
        self.selection_enabled = false;
    }

    fn add_selector(&mut self, selector: Box<dyn Selector>) {
        self.selectors.push(selector);
    }

    fn set_active_selector(&mut self, name: &str) {
        if let Some(index) = self.selectors.iter().position(|s| s.name() == name) {
            self.active_selector = Some(index);
        }
    }

    fn active_selector(&self) -> Option<&dyn Selector> {
        self.active_selector
            .and_then(|index| self.selectors.get(index))
            .map(|selector| selector.as_ref())
    }

    fn available_selectors(&self) -> Vec<&dyn Selector> {
        self.selectors.iter().map(|s| s.as_ref()).collect()
    }
}
