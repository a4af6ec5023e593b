mod common;

use annotate_core::{Annotation, ItemState, ModuleConfig, MutationOutcome};
use common::{image, Call, Harness};

#[test]
fn init_materializes_only_visible_predefined_items() {
    let mut h = Harness::new(&["p1", "p2", "p3"]);
    h.show("p2");
    h.module.init();

    assert_eq!(h.created(), vec!["p2".to_string()]);
    assert_eq!(h.module.item_state("p1"), Some(ItemState::Pending));
    assert_eq!(h.module.item_state("p2"), Some(ItemState::Active));
    assert_eq!(h.module.pending_count(), 2);
    assert_eq!(h.module.items().count(), 3);
    assert!(h.module.is_listening());
    assert_eq!(h.viewport.borrow().listen_calls, 1);
}

#[test]
fn buffered_annotation_moves_to_annotator_when_item_scrolls_into_view() {
    let mut h = Harness::new(&["p1", "p2"]);
    h.module.init();
    assert_eq!(h.module.active_count(), 0);

    let annotation = Annotation::new("p1", "note on p1");
    assert_eq!(
        h.module.add_annotation(annotation.clone(), None),
        Ok(MutationOutcome::Buffered)
    );
    assert_eq!(h.module.annotations(Some("p1")), vec![annotation.clone()]);

    h.show("p1");
    h.module.on_scroll();

    assert_eq!(h.module.item_state("p1"), Some(ItemState::Active));
    assert_eq!(h.module.item_state("p2"), Some(ItemState::Pending));
    assert!(h.module.buffered().additions().is_empty());
    assert_eq!(h.module.annotations(Some("p1")), vec![annotation.clone()]);
    assert!(h
        .calls()
        .contains(&Call::Added("p1".to_string(), annotation.id)));
}

#[test]
fn scroll_sweep_materializes_every_visible_item_once() {
    let mut h = Harness::new(&["a", "b", "c"]);
    h.module.init();

    h.show("a");
    h.show("c");
    h.module.on_scroll();
    h.module.on_scroll();

    assert_eq!(h.created(), vec!["a".to_string(), "c".to_string()]);
    assert_eq!(h.module.pending_count(), 1);
}

#[test]
fn listener_detaches_on_first_scroll_with_empty_queue() {
    let mut h = Harness::new(&["only"]);
    h.module.init();
    h.show("only");

    h.module.on_scroll();
    assert_eq!(h.module.pending_count(), 0);
    assert!(h.module.is_listening());
    assert!(h.viewport.borrow().unlistened.is_empty());

    h.module.on_scroll();
    assert!(!h.module.is_listening());
    assert_eq!(h.viewport.borrow().unlistened.len(), 1);
}

#[test]
fn detached_listener_ignores_later_pending_items() {
    let mut h = Harness::new(&[]);
    h.module.init();
    h.module.on_scroll();
    assert!(!h.module.is_listening());

    h.module.defer_item(image("late"));
    h.show("late");
    let checks_before = h.visibility_checks();
    h.module.on_scroll();
    h.module.on_scroll();

    assert_eq!(h.visibility_checks(), checks_before);
    assert_eq!(h.module.item_state("late"), Some(ItemState::Pending));
    assert!(h.created().is_empty());
    assert_eq!(h.viewport.borrow().listen_calls, 1);
    assert_eq!(h.viewport.borrow().unlistened.len(), 1);
}

#[test]
fn explicit_triggers_still_materialize_after_detach() {
    let mut h = Harness::new(&[]);
    h.module.init();
    h.module.on_scroll();

    h.module.defer_item(image("late"));
    h.module.defer_item(image("later"));
    h.show("late");
    assert_eq!(h.module.load_visible(), 1);
    assert_eq!(h.module.item_state("late"), Some(ItemState::Active));

    h.module.make_annotatable(image("later"));
    assert_eq!(h.module.item_state("later"), Some(ItemState::Active));
    assert!(!h.module.is_listening());
}

#[test]
fn eager_config_materializes_predefined_items_without_listener() {
    let config = ModuleConfig {
        lazy_load: false,
        ..ModuleConfig::default()
    };
    let mut h = Harness::with_config(&["x", "y"], config);
    h.module.init();

    assert_eq!(h.created(), vec!["x".to_string(), "y".to_string()]);
    assert_eq!(h.module.pending_count(), 0);
    assert!(!h.module.is_listening());
    assert_eq!(h.viewport.borrow().listen_calls, 0);
}

#[test]
fn make_annotatable_bypasses_visibility() {
    let mut h = Harness::new(&[]);
    h.module.make_annotatable(image("hidden"));
    h.module.make_annotatable(common::video("clip"));

    assert_eq!(h.created(), vec!["hidden".to_string()]);
    assert_eq!(h.module.item_state("clip"), None);
    assert!(!h.module.annotates_item("clip"));
}
