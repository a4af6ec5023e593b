//! Contracts a concrete media module and its host page provide.

use crate::annotator::Annotator;

/// Media-specific capability interface implemented per item family
/// (images, maps, video frames, ...).
pub trait MediaAdapter {
    /// Opaque handle for one annotatable item.
    type Item: Clone;

    /// Whether this adapter can annotate `item`.
    fn supports(&self, item: &Self::Item) -> bool;

    /// Identifying URL of `item`.
    ///
    /// Must be stable and total over every item ever offered to the module.
    fn item_url(&self, item: &Self::Item) -> String;

    /// Creates the annotator for `item`. Called at most once per item URL.
    fn new_annotator(&mut self, item: &Self::Item) -> Box<dyn Annotator>;

    /// Performs adapter-specific setup and returns the items that should be
    /// made annotatable as soon as they are visible.
    fn init(&mut self) -> Vec<Self::Item>;
}

/// Host-side subscription token for scroll-equivalent signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerKey(pub u64);

/// Visibility test and scroll subscription offered by the host page.
pub trait Viewport<I> {
    fn is_in_viewport(&self, item: &I) -> bool;

    /// Starts forwarding scroll signals to the module.
    fn listen_scroll(&mut self) -> ListenerKey;

    /// Stops forwarding scroll signals for `key`.
    fn unlisten(&mut self, key: ListenerKey);
}
