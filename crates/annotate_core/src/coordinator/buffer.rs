//! Deferred annotation mutations for items without an annotator.
//!
//! # Responsibility
//! - Queue additions and removals that arrive while the target item is
//!   Pending.
//! - Replay them onto the item's annotator when it is created.
//!
//! # Invariants
//! - Both queues keep arrival order; replay for one URL never reorders
//!   entries of other URLs.
//! - Only entries for Pending items are held. Replay drains every entry for
//!   its URL: accepted ones are applied, refused ones are handed back as
//!   `RejectedMutation`s carrying the annotator's error.
//! - `supersede` only touches entries of the replacing annotation's URL.

use crate::annotator::{Annotator, AnnotatorError};
use crate::model::annotation::Annotation;
use log::warn;

/// Queue a buffered mutation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Addition,
    Removal,
}

impl MutationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Addition => "add",
            Self::Removal => "remove",
        }
    }
}

/// Buffered mutation the annotator refused during replay.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedMutation {
    pub kind: MutationKind,
    pub annotation: Annotation,
    pub error: AnnotatorError,
}

/// Outcome of replaying buffered mutations onto one annotator.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ReconcileReport {
    pub added: usize,
    pub removed: usize,
    /// Refused entries in replay order; no longer buffered.
    pub rejected: Vec<RejectedMutation>,
}

impl ReconcileReport {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }

    fn reject(&mut self, kind: MutationKind, annotation: &Annotation, error: AnnotatorError) {
        warn!(
            "event=buffer_reconcile module=coordinator status=error op={} item_url={} annotation_id={} error={}",
            kind.as_str(),
            annotation.src,
            annotation.id,
            error
        );
        self.rejected.push(RejectedMutation {
            kind,
            annotation: annotation.clone(),
            error,
        });
    }
}

/// Ordered addition/removal queues.
#[derive(Debug, Default)]
pub struct MutationBuffer {
    additions: Vec<Annotation>,
    removals: Vec<Annotation>,
}

impl MutationBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_addition(&mut self, annotation: Annotation) {
        self.additions.push(annotation);
    }

    pub fn push_removal(&mut self, annotation: Annotation) {
        self.removals.push(annotation);
    }

    /// Drops the first buffered addition for `url` that is `previous`.
    ///
    /// Returns whether an entry was dropped. Entries of other URLs are never
    /// touched, even when they carry the same id.
    pub fn supersede(&mut self, url: &str, previous: &Annotation) -> bool {
        match self
            .additions
            .iter()
            .position(|a| a.src == url && a.is_same(previous))
        {
            Some(index) => {
                self.additions.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn additions(&self) -> &[Annotation] {
        &self.additions
    }

    pub fn removals(&self) -> &[Annotation] {
        &self.removals
    }

    pub fn additions_for(&self, url: &str) -> Vec<Annotation> {
        self.additions
            .iter()
            .filter(|a| a.src == url)
            .cloned()
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.additions.is_empty() && self.removals.is_empty()
    }

    /// Replays every buffered mutation for `url` onto `annotator`:
    /// additions first, then removals, each in arrival order.
    ///
    /// Afterwards the buffer holds nothing for `url`.
    pub fn reconcile(&mut self, url: &str, annotator: &mut dyn Annotator) -> ReconcileReport {
        let mut report = ReconcileReport::default();

        self.additions.retain(|annotation| {
            if annotation.src != url {
                return true;
            }
            match annotator.add_annotation(annotation.clone(), None) {
                Ok(()) => report.added += 1,
                Err(error) => report.reject(MutationKind::Addition, annotation, error),
            }
            false
        });

        self.removals.retain(|annotation| {
            if annotation.src != url {
                return true;
            }
            match annotator.remove_annotation(annotation) {
                Ok(()) => report.removed += 1,
                Err(error) => report.reject(MutationKind::Removal, annotation, error),
            }
            false
        });

        report
    }
}
