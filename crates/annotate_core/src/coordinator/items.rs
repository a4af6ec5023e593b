//! Item registry: every offered item and the Pending queue.
//!
//! # Invariants
//! - An item URL is recorded in the all-items list at most once.
//! - The Pending queue keeps arrival order and only holds recorded items.

use std::collections::BTreeSet;

/// Lifecycle state of a known item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemState {
    /// Known, annotator not created yet.
    Pending,
    /// Annotator exists.
    Active,
}

#[derive(Debug, Clone)]
struct TrackedItem<I> {
    url: String,
    item: I,
}

/// Registry of offered items.
#[derive(Debug)]
pub struct ItemRegistry<I> {
    all: Vec<TrackedItem<I>>,
    known_urls: BTreeSet<String>,
    pending: Vec<TrackedItem<I>>,
}

impl<I> Default for ItemRegistry<I> {
    fn default() -> Self {
        Self {
            all: Vec::new(),
            known_urls: BTreeSet::new(),
            pending: Vec::new(),
        }
    }
}

impl<I: Clone> ItemRegistry<I> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_known(&self, url: &str) -> bool {
        self.known_urls.contains(url)
    }

    /// Records `item` in the all-items list.
    ///
    /// Returns `false` (and records nothing) when `url` is already known.
    pub fn record(&mut self, url: &str, item: I) -> bool {
        if !self.known_urls.insert(url.to_string()) {
            return false;
        }
        self.all.push(TrackedItem {
            url: url.to_string(),
            item,
        });
        true
    }

    /// Appends `item` to the Pending queue unless `url` is already queued.
    pub fn enqueue_pending(&mut self, url: &str, item: I) {
        if self.is_pending(url) {
            return;
        }
        self.pending.push(TrackedItem {
            url: url.to_string(),
            item,
        });
    }

    pub fn is_pending(&self, url: &str) -> bool {
        self.pending.iter().any(|tracked| tracked.url == url)
    }

    pub fn pending_item(&self, url: &str) -> Option<&I> {
        self.pending
            .iter()
            .find(|tracked| tracked.url == url)
            .map(|tracked| &tracked.item)
    }

    /// Removes `url` from the Pending queue. Returns whether it was queued.
    pub fn remove_pending(&mut self, url: &str) -> bool {
        let before = self.pending.len();
        self.pending.retain(|tracked| tracked.url != url);
        self.pending.len() != before
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Snapshot of Pending items accepted by `is_visible`, in queue order.
    pub fn pending_matching(&self, mut is_visible: impl FnMut(&I) -> bool) -> Vec<(String, I)> {
        self.pending
            .iter()
            .filter(|tracked| is_visible(&tracked.item))
            .map(|tracked| (tracked.url.clone(), tracked.item.clone()))
            .collect()
    }

    /// Snapshot of every Pending item, in queue order.
    pub fn pending_snapshot(&self) -> Vec<(String, I)> {
        self.pending_matching(|_| true)
    }

    /// All recorded items in first-offer order.
    pub fn items(&self) -> impl Iterator<Item = &I> {
        self.all.iter().map(|tracked| &tracked.item)
    }

    pub fn len(&self) -> usize {
        self.all.len()
    }

    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }
}
