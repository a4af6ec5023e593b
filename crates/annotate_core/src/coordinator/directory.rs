//! Annotator directory: item URL to annotator instance.
//!
//! # Invariants
//! - At most one annotator per item URL; entries are never replaced.
//! - Iteration order is materialization order.

use crate::annotator::Annotator;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// One materialized item and its annotator.
pub struct DirectoryEntry {
    url: String,
    annotator: Box<dyn Annotator>,
}

impl DirectoryEntry {
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn annotator(&self) -> &dyn Annotator {
        self.annotator.as_ref()
    }

    pub fn annotator_mut(&mut self) -> &mut dyn Annotator {
        self.annotator.as_mut()
    }
}

/// Directory insert failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    DuplicateItemUrl(String),
}

impl Display for DirectoryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateItemUrl(url) => write!(f, "annotator already exists for item: {url}"),
        }
    }
}

impl Error for DirectoryError {}

/// Single source of truth for "does this item have an annotator".
#[derive(Default)]
pub struct AnnotatorDirectory {
    entries: Vec<DirectoryEntry>,
    index: BTreeMap<String, usize>,
}

impl AnnotatorDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `annotator` for `url` and returns the stored instance.
    ///
    /// # Errors
    /// - `DuplicateItemUrl` when `url` already has an annotator; the
    ///   existing entry is left untouched.
    pub fn insert(
        &mut self,
        url: &str,
        annotator: Box<dyn Annotator>,
    ) -> Result<&mut dyn Annotator, DirectoryError> {
        if self.index.contains_key(url) {
            return Err(DirectoryError::DuplicateItemUrl(url.to_string()));
        }
        let index = self.entries.len();
        self.index.insert(url.to_string(), index);
        self.entries.push(DirectoryEntry {
            url: url.to_string(),
            annotator,
        });
        Ok(self.entries[index].annotator_mut())
    }

    pub fn contains(&self, url: &str) -> bool {
        self.index.contains_key(url)
    }

    pub fn get(&self, url: &str) -> Option<&dyn Annotator> {
        let index = *self.index.get(url)?;
        Some(self.entries[index].annotator())
    }

    pub fn get_mut(&mut self, url: &str) -> Option<&mut dyn Annotator> {
        let index = *self.index.get(url)?;
        Some(self.entries[index].annotator_mut())
    }

    pub fn entries(&self) -> std::slice::Iter<'_, DirectoryEntry> {
        self.entries.iter()
    }

    pub fn entries_mut(&mut self) -> std::slice::IterMut<'_, DirectoryEntry> {
        self.entries.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
