//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `annotate_core` linkage.
//! - Walk one lazy-load cycle over a fake page with deterministic output.

use annotate_core::{
    Annotation, AnnotationModule, Annotator, InMemoryAnnotator, ListenerKey, MediaAdapter, Shape,
    Viewport,
};
use log::info;
use std::cell::Cell;
use std::rc::Rc;

/// Image element on the fake page, identified by its vertical slot.
#[derive(Debug, Clone)]
struct PageImage {
    url: String,
    slot: usize,
}

struct ImageAdapter {
    page: Vec<PageImage>,
}

impl MediaAdapter for ImageAdapter {
    type Item = PageImage;

    fn supports(&self, item: &PageImage) -> bool {
        item.url.ends_with(".png") || item.url.ends_with(".jpg")
    }

    fn item_url(&self, item: &PageImage) -> String {
        item.url.clone()
    }

    fn new_annotator(&mut self, item: &PageImage) -> Box<dyn Annotator> {
        println!("annotator created url={}", item.url);
        Box::new(InMemoryAnnotator::new(item.url.clone()))
    }

    fn init(&mut self) -> Vec<PageImage> {
        self.page
            .iter()
            .filter(|item| self.supports(item))
            .cloned()
            .collect()
    }
}

/// Window of two slots starting at the shared scroll offset.
struct WindowViewport {
    offset: Rc<Cell<usize>>,
}

impl Viewport<PageImage> for WindowViewport {
    fn is_in_viewport(&self, item: &PageImage) -> bool {
        let top = self.offset.get();
        item.slot >= top && item.slot < top + 2
    }

    fn listen_scroll(&mut self) -> ListenerKey {
        ListenerKey(1)
    }

    fn unlisten(&mut self, _key: ListenerKey) {}
}

fn main() {
    println!("annotate_core ping={}", annotate_core::ping());
    println!("annotate_core version={}", annotate_core::core_version());

    let log_dir = std::env::temp_dir().join("annotate_cli");
    match log_dir.to_str() {
        Some(dir) => match annotate_core::init_logging(annotate_core::default_log_level(), dir) {
            Ok(()) => println!("logging dir={}", dir),
            Err(err) => println!("logging disabled error={}", err),
        },
        None => println!("logging disabled error=non-utf8 temp dir"),
    }

    let page = ["top.png", "middle.jpg", "bottom.png", "clip.mp4"]
        .iter()
        .enumerate()
        .map(|(slot, url)| PageImage {
            url: url.to_string(),
            slot,
        })
        .collect();
    let offset = Rc::new(Cell::new(0));
    let mut module = AnnotationModule::new(
        ImageAdapter { page },
        Box::new(WindowViewport {
            offset: Rc::clone(&offset),
        }),
    );

    module.init();
    info!("event=cli_demo status=ok stage=init");

    let note = Annotation::new("bottom.png", "below the fold")
        .with_shape(Shape::rect(10.0, 10.0, 40.0, 20.0));
    match module.add_annotation(note, None) {
        Ok(outcome) => println!("add bottom.png outcome={:?}", outcome),
        Err(err) => println!("add bottom.png error={}", err),
    }

    for top in [1, 2, 3] {
        offset.set(top);
        module.on_scroll();
        println!(
            "scroll offset={} active={} pending={} listening={}",
            top,
            module.active_count(),
            module.pending_count(),
            module.is_listening()
        );
    }

    for annotation in module.annotations(None) {
        println!(
            "annotation id={} src={} text={}",
            annotation.id, annotation.src, annotation.text
        );
    }
}
