#![allow(dead_code)]

use annotate_core::{
    Annotation, AnnotationId, AnnotationModule, Annotator, AnnotatorError, AnnotatorResult,
    EventType, Handler, InMemoryAnnotator, ListenerKey, MediaAdapter, ModuleConfig, Selector,
    Viewport,
};
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

/// One observable call made on a recording annotator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Created(String),
    SelectionEnabled(String, bool),
    EnableSelection(String),
    DisableSelection(String),
    Handler(String, EventType),
    Added(String, AnnotationId),
    Removed(String, AnnotationId),
    Highlight(String, Option<AnnotationId>),
}

pub type Journal = Rc<RefCell<Vec<Call>>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageItem {
    pub url: String,
    pub kind: MediaKind,
}

pub fn image(url: &str) -> PageItem {
    PageItem {
        url: url.to_string(),
        kind: MediaKind::Image,
    }
}

pub fn video(url: &str) -> PageItem {
    PageItem {
        url: url.to_string(),
        kind: MediaKind::Video,
    }
}

/// Annotation text that recording annotators refuse.
pub const REJECTED_TEXT: &str = "reject-me";

/// In-memory annotator that journals every call it receives.
pub struct RecordingAnnotator {
    url: String,
    inner: InMemoryAnnotator,
    journal: Journal,
}

impl RecordingAnnotator {
    fn record(&self, call: Call) {
        self.journal.borrow_mut().push(call);
    }
}

impl Annotator for RecordingAnnotator {
    fn add_annotation(
        &mut self,
        annotation: Annotation,
        replace: Option<&Annotation>,
    ) -> AnnotatorResult<()> {
        if annotation.text == REJECTED_TEXT {
            return Err(AnnotatorError::Rejected {
                annotation_id: annotation.id,
                reason: "test rejection".to_string(),
            });
        }
        let id = annotation.id;
        self.inner.add_annotation(annotation, replace)?;
        self.record(Call::Added(self.url.clone(), id));
        Ok(())
    }

    fn remove_annotation(&mut self, annotation: &Annotation) -> AnnotatorResult<()> {
        self.inner.remove_annotation(annotation)?;
        self.record(Call::Removed(self.url.clone(), annotation.id));
        Ok(())
    }

    fn annotations(&self) -> Vec<Annotation> {
        self.inner.annotations()
    }

    fn highlight_annotation(&mut self, annotation: Option<&Annotation>) {
        self.record(Call::Highlight(self.url.clone(), annotation.map(|a| a.id)));
        self.inner.highlight_annotation(annotation);
    }

    fn add_handler(&mut self, event: EventType, handler: Handler) {
        self.record(Call::Handler(self.url.clone(), event));
        self.inner.add_handler(event, handler);
    }

    fn set_selection_enabled(&mut self, enabled: bool) {
        self.record(Call::SelectionEnabled(self.url.clone(), enabled));
        self.inner.set_selection_enabled(enabled);
    }

    fn enable_selection(&mut self) {
        self.record(Call::EnableSelection(self.url.clone()));
        self.inner.enable_selection();
    }

    fn disable_selection(&mut self) {
        self.record(Call::DisableSelection(self.url.clone()));
        self.inner.disable_selection();
    }

    fn add_selector(&mut self, selector: Box<dyn Selector>) {
        self.inner.add_selector(selector);
    }

    fn set_active_selector(&mut self, name: &str) {
        self.inner.set_active_selector(name);
    }

    fn active_selector(&self) -> Option<&dyn Selector> {
        self.inner.active_selector()
    }

    fn available_selectors(&self) -> Vec<&dyn Selector> {
        self.inner.available_selectors()
    }
}

/// Adapter supporting images only.
pub struct PageAdapter {
    predefined: Vec<PageItem>,
    journal: Journal,
}

impl MediaAdapter for PageAdapter {
    type Item = PageItem;

    fn supports(&self, item: &PageItem) -> bool {
        item.kind == MediaKind::Image
    }

    fn item_url(&self, item: &PageItem) -> String {
        item.url.clone()
    }

    fn new_annotator(&mut self, item: &PageItem) -> Box<dyn Annotator> {
        self.journal
            .borrow_mut()
            .push(Call::Created(item.url.clone()));
        Box::new(RecordingAnnotator {
            url: item.url.clone(),
            inner: InMemoryAnnotator::new(item.url.clone()),
            journal: Rc::clone(&self.journal),
        })
    }

    fn init(&mut self) -> Vec<PageItem> {
        std::mem::take(&mut self.predefined)
    }
}

#[derive(Debug, Default)]
pub struct ViewportState {
    pub visible: BTreeSet<String>,
    pub listen_calls: u64,
    pub unlistened: Vec<ListenerKey>,
    pub visibility_checks: usize,
}

/// Viewport whose visibility is toggled by the test.
pub struct ScriptedViewport {
    state: Rc<RefCell<ViewportState>>,
}

impl Viewport<PageItem> for ScriptedViewport {
    fn is_in_viewport(&self, item: &PageItem) -> bool {
        let mut state = self.state.borrow_mut();
        state.visibility_checks += 1;
        state.visible.contains(&item.url)
    }

    fn listen_scroll(&mut self) -> ListenerKey {
        let mut state = self.state.borrow_mut();
        state.listen_calls += 1;
        ListenerKey(state.listen_calls)
    }

    fn unlisten(&mut self, key: ListenerKey) {
        self.state.borrow_mut().unlistened.push(key);
    }
}

pub struct Harness {
    pub module: AnnotationModule<PageAdapter>,
    pub journal: Journal,
    pub viewport: Rc<RefCell<ViewportState>>,
}

impl Harness {
    pub fn new(predefined: &[&str]) -> Self {
        Self::with_config(predefined, ModuleConfig::default())
    }

    pub fn with_config(predefined: &[&str], config: ModuleConfig) -> Self {
        let journal: Journal = Rc::new(RefCell::new(Vec::new()));
        let viewport = Rc::new(RefCell::new(ViewportState::default()));
        let adapter = PageAdapter {
            predefined: predefined.iter().map(|url| image(url)).collect(),
            journal: Rc::clone(&journal),
        };
        let module = AnnotationModule::with_config(
            adapter,
            Box::new(ScriptedViewport {
                state: Rc::clone(&viewport),
            }),
            config,
        );
        Self {
            module,
            journal,
            viewport,
        }
    }

    pub fn show(&self, url: &str) {
        self.viewport.borrow_mut().visible.insert(url.to_string());
    }

    pub fn calls(&self) -> Vec<Call> {
        self.journal.borrow().clone()
    }

    pub fn created(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Created(url) => Some(url),
                _ => None,
            })
            .collect()
    }

    /// URLs that received a handler for `event`, in attachment order.
    pub fn handler_targets(&self, event: EventType) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Handler(url, registered) if registered == event => Some(url),
                _ => None,
            })
            .collect()
    }

    pub fn visibility_checks(&self) -> usize {
        self.viewport.borrow().visibility_checks
    }
}

pub fn noop_handler() -> Handler {
    Rc::new(|_: &annotate_core::AnnotationEvent| {})
}
