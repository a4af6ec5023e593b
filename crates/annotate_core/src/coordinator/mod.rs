//! Lifecycle coordinator binding items to annotators.
//!
//! # Responsibility
//! - Track offered items and materialize their annotators (immediately or
//!   lazily as they scroll into view).
//! - Give callers one API for annotations, handlers, plugins, selectors and
//!   selection policy that works whether or not an item's annotator exists.
//!
//! # Invariants
//! - At most one annotator per item URL; Pending -> Active is one-way.
//! - Handlers and plugins reach every annotator exactly once, in
//!   registration order, whether registered before or after it was created.
//! - Buffered mutations for a URL are replayed in arrival order after
//!   handlers and plugins are attached. Replay empties the buffer for that
//!   URL; refused entries move to the rejected list with their error.
//! - Operations on URLs this module does not manage are silent no-ops.

use crate::annotator::{AnnotatorResult, Selector};
use crate::config::ModuleConfig;
use crate::extension::handler::HandlerRegistry;
use crate::extension::plugin::{init_plugin, Plugin, PluginRegistry};
use crate::model::annotation::Annotation;
use crate::model::event::{EventType, Handler};
use log::{debug, info, warn};
use std::rc::Rc;
use std::time::Instant;

pub mod adapter;
pub mod buffer;
pub mod directory;
pub mod items;
pub mod lazy_load;

use adapter::{MediaAdapter, Viewport};
use buffer::{MutationBuffer, RejectedMutation};
use directory::AnnotatorDirectory;
use items::{ItemRegistry, ItemState};
use lazy_load::ScrollListener;

/// What the module did with one add/remove request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    /// Delegated to the item's annotator.
    Applied,
    /// Queued until the item's annotator exists.
    Buffered,
    /// The module does not manage the annotation's item.
    Ignored,
}

/// Coordinator for one media family.
pub struct AnnotationModule<A: MediaAdapter> {
    adapter: A,
    viewport: Box<dyn Viewport<A::Item>>,
    config: ModuleConfig,
    items: ItemRegistry<A::Item>,
    directory: AnnotatorDirectory,
    buffer: MutationBuffer,
    rejected: Vec<RejectedMutation>,
    handlers: HandlerRegistry,
    plugins: PluginRegistry,
    selection_enabled: bool,
    scroll: ScrollListener,
    initialized: bool,
}

impl<A: MediaAdapter> AnnotationModule<A> {
    /// Creates a module with default configuration.
    pub fn new(adapter: A, viewport: Box<dyn Viewport<A::Item>>) -> Self {
        Self::with_config(adapter, viewport, ModuleConfig::default())
    }

    /// Creates a module with an explicit `config`.
    ///
    /// `config.selection_enabled` seeds the global selection policy.
    pub fn with_config(
        adapter: A,
        viewport: Box<dyn Viewport<A::Item>>,
        config: ModuleConfig,
    ) -> Self {
        Self {
            adapter,
            viewport,
            config,
            items: ItemRegistry::new(),
            directory: AnnotatorDirectory::new(),
            buffer: MutationBuffer::new(),
            rejected: Vec::new(),
            handlers: HandlerRegistry::new(),
            plugins: PluginRegistry::new(),
            selection_enabled: config.selection_enabled,
            scroll: ScrollListener::new(),
            initialized: false,
        }
    }

    /// Runs adapter setup, queues its predefined items as Pending, loads the
    /// visible ones and starts listening for scroll signals.
    ///
    /// A second call is ignored.
    pub fn init(&mut self) {
        if self.initialized {
            warn!("event=module_init module=coordinator status=skip reason=already_initialized");
            return;
        }
        self.initialized = true;

        let predefined = self.adapter.init();
        let offered = predefined.len();
        let mut queued = 0usize;
        for item in predefined {
            let url = self.adapter.item_url(&item);
            if self.items.record(&url, item.clone()) {
                self.items.enqueue_pending(&url, item);
                queued += 1;
            } else {
                debug!(
                    "event=item_register module=coordinator status=skip reason=duplicate item_url={}",
                    url
                );
            }
        }
        info!(
            "event=module_init module=coordinator status=ok offered={} queued={} lazy_load={}",
            offered, queued, self.config.lazy_load
        );

        if !self.config.lazy_load {
            for (url, item) in self.items.pending_snapshot() {
                self.materialize(&url, &item);
            }
            return;
        }

        self.lazy_load();
        if self.scroll.can_attach() {
            let key = self.viewport.listen_scroll();
            self.scroll.attach(key);
            info!(
                "event=scroll_listener module=coordinator status=ok action=attach key={}",
                key.0
            );
        }
    }

    /// Handles one scroll-equivalent signal from the host.
    ///
    /// Loads newly visible Pending items; the first signal that finds the
    /// Pending queue empty releases the listener for good.
    pub fn on_scroll(&mut self) {
        if !self.scroll.is_attached() {
            return;
        }
        if self.items.pending_len() > 0 {
            self.lazy_load();
            return;
        }
        if let Some(key) = self.scroll.release() {
            self.viewport.unlisten(key);
            info!(
                "event=scroll_listener module=coordinator status=ok action=release key={}",
                key.0
            );
        }
    }

    /// Explicit lazy-load sweep: materializes every visible Pending item.
    ///
    /// Returns the number of annotators created.
    pub fn load_visible(&mut self) -> usize {
        self.lazy_load()
    }

    /// Makes `item` annotatable right away, if the adapter supports it.
    ///
    /// Unsupported items and items that already have an annotator are
    /// ignored. A Pending item is materialized from its queued handle.
    pub fn make_annotatable(&mut self, item: A::Item) {
        if !self.adapter.supports(&item) {
            debug!("event=item_register module=coordinator status=skip reason=unsupported");
            return;
        }
        let url = self.adapter.item_url(&item);
        if self.directory.contains(&url) {
            debug!(
                "event=item_register module=coordinator status=skip reason=already_active item_url={}",
                url
            );
            return;
        }

        let item = match self.items.pending_item(&url) {
            Some(queued) => queued.clone(),
            None => {
                self.items.record(&url, item.clone());
                item
            }
        };
        self.materialize(&url, &item);
    }

    /// Registers `item` as Pending without materializing it.
    ///
    /// The item is picked up by the next lazy-load sweep; this does not
    /// re-attach a released scroll listener.
    pub fn defer_item(&mut self, item: A::Item) {
        if !self.adapter.supports(&item) {
            debug!("event=item_register module=coordinator status=skip reason=unsupported");
            return;
        }
        let url = self.adapter.item_url(&item);
        if !self.items.record(&url, item.clone()) {
            debug!(
                "event=item_register module=coordinator status=skip reason=duplicate item_url={}",
                url
            );
            return;
        }
        self.items.enqueue_pending(&url, item);
        debug!(
            "event=item_register module=coordinator status=ok state=pending item_url={}",
            url
        );
    }

    /// Whether this module manages the item identified by `item_url`.
    pub fn annotates_item(&self, item_url: &str) -> bool {
        self.directory.contains(item_url) || self.items.is_pending(item_url)
    }

    /// Lifecycle state of `item_url`, or `None` when the module does not
    /// manage it.
    pub fn item_state(&self, item_url: &str) -> Option<ItemState> {
        if self.directory.contains(item_url) {
            Some(ItemState::Active)
        } else if self.items.is_pending(item_url) {
            Some(ItemState::Pending)
        } else {
            None
        }
    }

    /// Adds `annotation` to its item, superseding `replace` when given.
    ///
    /// While the item is Pending the annotation is buffered and `replace` is
    /// dropped from that item's buffered additions without being applied
    /// anywhere. A `replace` belonging to another item is ignored.
    ///
    /// # Errors
    /// - Propagates annotator failures when the item is Active.
    pub fn add_annotation(
        &mut self,
        annotation: Annotation,
        replace: Option<&Annotation>,
    ) -> AnnotatorResult<MutationOutcome> {
        if !self.annotates_item(&annotation.src) {
            debug!(
                "event=annotation_add module=coordinator status=skip reason=unmanaged item_url={}",
                annotation.src
            );
            return Ok(MutationOutcome::Ignored);
        }

        if let Some(annotator) = self.directory.get_mut(&annotation.src) {
            annotator.add_annotation(annotation, replace)?;
            return Ok(MutationOutcome::Applied);
        }

        debug!(
            "event=annotation_add module=coordinator status=ok action=buffer item_url={} annotation_id={}",
            annotation.src, annotation.id
        );
        if let Some(previous) = replace {
            self.buffer.supersede(&annotation.src, previous);
        }
        self.buffer.push_addition(annotation);
        Ok(MutationOutcome::Buffered)
    }

    /// Removes `annotation` from its item, buffering the removal while the
    /// item is Pending.
    ///
    /// # Errors
    /// - Propagates annotator failures when the item is Active.
    pub fn remove_annotation(
        &mut self,
        annotation: &Annotation,
    ) -> AnnotatorResult<MutationOutcome> {
        if !self.annotates_item(&annotation.src) {
            return Ok(MutationOutcome::Ignored);
        }

        if let Some(annotator) = self.directory.get_mut(&annotation.src) {
            annotator.remove_annotation(annotation)?;
            return Ok(MutationOutcome::Applied);
        }

        debug!(
            "event=annotation_remove module=coordinator status=ok action=buffer item_url={} annotation_id={}",
            annotation.src, annotation.id
        );
        self.buffer.push_removal(annotation.clone());
        Ok(MutationOutcome::Buffered)
    }

    /// Annotations on one item, or on every item when `item_url` is `None`.
    ///
    /// Active items report their annotator's live state; Pending items
    /// report their buffered additions. Without a URL the result is every
    /// annotator's annotations (materialization order) followed by the
    /// buffered additions of Pending items.
    pub fn annotations(&self, item_url: Option<&str>) -> Vec<Annotation> {
        match item_url {
            Some(url) => match self.directory.get(url) {
                Some(annotator) => annotator.annotations(),
                None => self.buffer.additions_for(url),
            },
            None => {
                let mut all: Vec<Annotation> = self
                    .directory
                    .entries()
                    .flat_map(|entry| entry.annotator().annotations())
                    .collect();
                all.extend(
                    self.buffer
                        .additions()
                        .iter()
                        .filter(|annotation| !self.directory.contains(&annotation.src))
                        .cloned(),
                );
                all
            }
        }
    }

    /// Highlights `annotation` on its annotator, or clears the highlight on
    /// every annotator when `None`. Never buffered.
    pub fn highlight_annotation(&mut self, annotation: Option<&Annotation>) {
        match annotation {
            Some(target) => {
                if !self.annotates_item(&target.src) {
                    return;
                }
                if let Some(annotator) = self.directory.get_mut(&target.src) {
                    annotator.highlight_annotation(Some(target));
                }
            }
            None => {
                for entry in self.directory.entries_mut() {
                    entry.annotator_mut().highlight_annotation(None);
                }
            }
        }
    }

    /// Attaches `handler` to every existing annotator and to every annotator
    /// created later.
    pub fn add_handler(&mut self, event: EventType, handler: Handler) {
        for entry in self.directory.entries_mut() {
            entry.annotator_mut().add_handler(event, Rc::clone(&handler));
        }
        self.handlers.register(event, handler);
        info!(
            "event=handler_register module=coordinator status=ok type={} active_annotators={}",
            event.as_str(),
            self.directory.len()
        );
    }

    /// Registers `plugin` and runs its init hook on every existing annotator.
    pub fn add_plugin(&mut self, plugin: Rc<dyn Plugin>) {
        self.plugins.register(Rc::clone(&plugin));
        for entry in self.directory.entries_mut() {
            init_plugin(plugin.as_ref(), entry.annotator_mut());
        }
        info!(
            "event=plugin_register module=coordinator status=ok plugin={} active_annotators={}",
            plugin.name(),
            self.directory.len()
        );
    }

    /// Adds `selector` to an Active item's annotator. Dropped otherwise.
    pub fn add_selector(&mut self, item_url: &str, selector: Box<dyn Selector>) {
        if !self.annotates_item(item_url) {
            return;
        }
        if let Some(annotator) = self.directory.get_mut(item_url) {
            annotator.add_selector(selector);
        }
    }

    pub fn set_active_selector(&mut self, item_url: &str, selector_name: &str) {
        if !self.annotates_item(item_url) {
            return;
        }
        if let Some(annotator) = self.directory.get_mut(item_url) {
            annotator.set_active_selector(selector_name);
        }
    }

    /// Name of the active selector on an Active item.
    pub fn active_selector(&self, item_url: &str) -> Option<String> {
        if !self.annotates_item(item_url) {
            return None;
        }
        self.directory
            .get(item_url)?
            .active_selector()
            .map(|selector| selector.name().to_string())
    }

    /// Names of the selectors available on an Active item.
    pub fn available_selectors(&self, item_url: &str) -> Option<Vec<String>> {
        if !self.annotates_item(item_url) {
            return None;
        }
        let annotator = self.directory.get(item_url)?;
        Some(
            annotator
                .available_selectors()
                .iter()
                .map(|selector| selector.name().to_string())
                .collect(),
        )
    }

    /// Sets the global selection policy and pushes it to every annotator.
    ///
    /// Annotators created later start with selection disabled while the
    /// policy is `false`.
    pub fn set_selection_enabled(&mut self, enabled: bool) {
        self.selection_enabled = enabled;
        for entry in self.directory.entries_mut() {
            entry.annotator_mut().set_selection_enabled(enabled);
        }
        info!(
            "event=selection_policy module=coordinator status=ok enabled={} active_annotators={}",
            enabled,
            self.directory.len()
        );
    }

    pub fn is_selection_enabled(&self) -> bool {
        self.selection_enabled
    }

    /// Enables selection on one Active item, or on every annotator when
    /// `item_url` is `None`. Does not change the global policy.
    pub fn enable_selection(&mut self, item_url: Option<&str>) {
        match item_url {
            Some(url) => {
                if let Some(annotator) = self.directory.get_mut(url) {
                    annotator.enable_selection();
                }
            }
            None => {
                for entry in self.directory.entries_mut() {
                    entry.annotator_mut().enable_selection();
                }
            }
        }
    }

    /// Disables selection on one Active item, or on every annotator when
    /// `item_url` is `None`. Does not change the global policy.
    pub fn disable_selection(&mut self, item_url: Option<&str>) {
        match item_url {
            Some(url) => {
                if let Some(annotator) = self.directory.get_mut(url) {
                    annotator.disable_selection();
                }
            }
            None => {
                for entry in self.directory.entries_mut() {
                    entry.annotator_mut().disable_selection();
                }
            }
        }
    }

    /// Every item ever recorded, in first-offer order.
    pub fn items(&self) -> impl Iterator<Item = &A::Item> {
        self.items.items()
    }

    pub fn pending_count(&self) -> usize {
        self.items.pending_len()
    }

    pub fn active_count(&self) -> usize {
        self.directory.len()
    }

    /// Whether the scroll listener is currently attached.
    pub fn is_listening(&self) -> bool {
        self.scroll.is_attached()
    }

    pub fn config(&self) -> &ModuleConfig {
        &self.config
    }

    /// Mutations still waiting for their item's annotator.
    pub fn buffered(&self) -> &MutationBuffer {
        &self.buffer
    }

    /// Buffered mutations the annotator refused when its item materialized.
    pub fn rejected(&self) -> &[RejectedMutation] {
        &self.rejected
    }

    /// Drains the rejected list so the caller can fix and resubmit entries.
    ///
    /// The items are Active by now, so resubmitted mutations go straight to
    /// their annotator and report errors directly.
    pub fn take_rejected(&mut self) -> Vec<RejectedMutation> {
        std::mem::take(&mut self.rejected)
    }

    fn lazy_load(&mut self) -> usize {
        let viewport = &self.viewport;
        let visible = self
            .items
            .pending_matching(|item| viewport.is_in_viewport(item));
        let mut created = 0usize;
        for (url, item) in &visible {
            if self.materialize(url, item) {
                created += 1;
            }
        }
        debug!(
            "event=lazy_load module=coordinator status=ok visible={} created={} pending={}",
            visible.len(),
            created,
            self.items.pending_len()
        );
        created
    }

    fn materialize(&mut self, url: &str, item: &A::Item) -> bool {
        if self.directory.contains(url) {
            self.items.remove_pending(url);
            return false;
        }
        let started_at = Instant::now();

        let mut annotator = self.adapter.new_annotator(item);
        if !self.selection_enabled {
            annotator.set_selection_enabled(false);
        }
        self.handlers.attach_all(annotator.as_mut());
        self.plugins.init_annotator(annotator.as_mut());

        let stored = match self.directory.insert(url, annotator) {
            Ok(stored) => stored,
            Err(err) => {
                warn!(
                    "event=annotator_materialize module=coordinator status=error item_url={} error={}",
                    url, err
                );
                return false;
            }
        };
        let report = self.buffer.reconcile(url, stored);
        let rejected = report.rejected.len();
        self.rejected.extend(report.rejected);
        self.items.remove_pending(url);

        info!(
            "event=annotator_materialize module=coordinator status=ok item_url={} handlers={} plugins={} replayed_added={} replayed_removed={} rejected={} duration_ms={}",
            url,
            self.handlers.len(),
            self.plugins.len(),
            report.added,
            report.removed,
            rejected,
            started_at.elapsed().as_millis()
        );
        true
    }
}
