//! Ordered event-handler registry.

use crate::annotator::Annotator;
use crate::model::event::{EventType, Handler};
use std::rc::Rc;

/// One `(event type, handler)` registration.
#[derive(Clone)]
pub struct HandlerRegistration {
    pub event: EventType,
    pub handler: Handler,
}

/// Handler registrations replayed to every annotator.
#[derive(Default)]
pub struct HandlerRegistry {
    registrations: Vec<HandlerRegistration>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one registration; registration order is replay order.
    pub fn register(&mut self, event: EventType, handler: Handler) {
        self.registrations.push(HandlerRegistration { event, handler });
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HandlerRegistration> {
        self.registrations.iter()
    }

    /// Attaches every registration to `annotator` in registration order.
    pub fn attach_all(&self, annotator: &mut dyn Annotator) {
        for registration in &self.registrations {
            annotator.add_handler(registration.event, Rc::clone(&registration.handler));
        }
    }
}
