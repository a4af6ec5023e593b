//! Scroll listener lifecycle for lazy materialization.
//!
//! # Invariants
//! - The listener is attached at most once per module.
//! - Once released it is never re-attached; later Pending items need an
//!   explicit trigger.

use crate::coordinator::adapter::ListenerKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListenerState {
    Idle,
    Attached(ListenerKey),
    Released,
}

/// Owns the host subscription handle for scroll signals.
#[derive(Debug)]
pub struct ScrollListener {
    state: ListenerState,
}

impl Default for ScrollListener {
    fn default() -> Self {
        Self {
            state: ListenerState::Idle,
        }
    }
}

impl ScrollListener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a subscription may still be taken out.
    pub fn can_attach(&self) -> bool {
        self.state == ListenerState::Idle
    }

    /// Stores the host key. Ignored unless the listener was never attached.
    pub fn attach(&mut self, key: ListenerKey) -> bool {
        if !self.can_attach() {
            return false;
        }
        self.state = ListenerState::Attached(key);
        true
    }

    /// Marks the listener released and hands back the key to unsubscribe.
    ///
    /// Returns `None` when nothing is attached.
    pub fn release(&mut self) -> Option<ListenerKey> {
        match self.state {
            ListenerState::Attached(key) => {
                self.state = ListenerState::Released;
                Some(key)
            }
            _ => None,
        }
    }

    pub fn is_attached(&self) -> bool {
        matches!(self.state, ListenerState::Attached(_))
    }

    pub fn is_released(&self) -> bool {
        self.state == ListenerState::Released
    }
}
