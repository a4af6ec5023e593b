mod common;

use annotate_core::{Annotation, AnnotatorError, ItemState, MutationKind, MutationOutcome, Shape};
use common::{image, Call, Harness, REJECTED_TEXT};

#[test]
fn replace_while_pending_keeps_only_the_replacement() {
    let mut h = Harness::new(&["img"]);
    h.module.init();

    let a = Annotation::new("img", "draft");
    let b = Annotation::new("img", "final");
    h.module.add_annotation(a.clone(), None).unwrap();
    h.module.add_annotation(b.clone(), Some(&a)).unwrap();

    assert_eq!(h.module.annotations(Some("img")), vec![b.clone()]);

    h.show("img");
    h.module.on_scroll();
    assert_eq!(h.module.annotations(Some("img")), vec![b.clone()]);
    assert!(!h.calls().contains(&Call::Added("img".to_string(), a.id)));
}

#[test]
fn buffered_removal_is_applied_after_additions() {
    let mut h = Harness::new(&["img"]);
    h.module.init();

    let keep = Annotation::new("img", "keep");
    let gone = Annotation::new("img", "gone");
    h.module.add_annotation(keep.clone(), None).unwrap();
    h.module.add_annotation(gone.clone(), None).unwrap();
    assert_eq!(
        h.module.remove_annotation(&gone),
        Ok(MutationOutcome::Buffered)
    );

    h.module.make_annotatable(image("img"));

    assert_eq!(h.module.annotations(Some("img")), vec![keep.clone()]);
    assert!(h.module.buffered().is_empty());
    let replay: Vec<Call> = h
        .calls()
        .into_iter()
        .filter(|call| matches!(call, Call::Added(..) | Call::Removed(..)))
        .collect();
    assert_eq!(
        replay,
        vec![
            Call::Added("img".to_string(), keep.id),
            Call::Added("img".to_string(), gone.id),
            Call::Removed("img".to_string(), gone.id),
        ]
    );
}

#[test]
fn reconcile_leaves_other_items_buffered_in_order() {
    let mut h = Harness::new(&["one", "two"]);
    h.module.init();

    let two_a = Annotation::new("two", "a");
    let one = Annotation::new("one", "x");
    let two_b = Annotation::new("two", "b");
    for annotation in [&two_a, &one, &two_b] {
        h.module.add_annotation(annotation.clone(), None).unwrap();
    }

    h.show("one");
    h.module.on_scroll();

    assert_eq!(
        h.module.buffered().additions(),
        &[two_a.clone(), two_b.clone()]
    );
    assert_eq!(h.module.annotations(Some("two")), vec![two_a, two_b]);
}

#[test]
fn global_query_is_active_state_followed_by_buffer() {
    let mut h = Harness::new(&["pending"]);
    h.module.init();
    h.module.make_annotatable(image("live"));

    let live = Annotation::new("live", "on annotator");
    let queued = Annotation::new("pending", "in buffer");
    assert_eq!(
        h.module.add_annotation(live.clone(), None),
        Ok(MutationOutcome::Applied)
    );
    assert_eq!(
        h.module.add_annotation(queued.clone(), None),
        Ok(MutationOutcome::Buffered)
    );

    assert_eq!(h.module.annotations(None), vec![live.clone(), queued.clone()]);

    h.show("pending");
    h.module.on_scroll();
    let all = h.module.annotations(None);
    assert_eq!(all.len(), 2);
    assert!(all.iter().any(|a| a.is_same(&live)));
    assert!(all.iter().any(|a| a.is_same(&queued)));
}

#[test]
fn replace_never_touches_another_items_buffer() {
    let mut h = Harness::new(&["one", "two"]);
    h.module.init();

    let on_two = Annotation::new("two", "belongs to two");
    h.module.add_annotation(on_two.clone(), None).unwrap();
    let on_one = Annotation::new("one", "belongs to one");
    assert_eq!(
        h.module.add_annotation(on_one.clone(), Some(&on_two)),
        Ok(MutationOutcome::Buffered)
    );

    assert_eq!(h.module.annotations(Some("two")), vec![on_two.clone()]);
    assert_eq!(h.module.annotations(Some("one")), vec![on_one.clone()]);

    h.show("two");
    h.module.on_scroll();
    assert_eq!(h.module.annotations(Some("two")), vec![on_two]);
}

#[test]
fn rejected_replay_leaves_buffer_and_can_be_resubmitted() {
    let mut h = Harness::new(&["img"]);
    h.module.init();

    let bad = Annotation::new("img", REJECTED_TEXT);
    let good = Annotation::new("img", "fine");
    h.module.add_annotation(bad.clone(), None).unwrap();
    h.module.add_annotation(good.clone(), None).unwrap();

    h.module.make_annotatable(image("img"));

    assert_eq!(h.module.item_state("img"), Some(ItemState::Active));
    assert_eq!(h.module.annotations(Some("img")), vec![good.clone()]);
    assert_eq!(h.module.annotations(None), vec![good.clone()]);
    assert!(h.module.buffered().is_empty());

    let rejected = h.module.take_rejected();
    assert_eq!(rejected.len(), 1);
    assert_eq!(rejected[0].kind, MutationKind::Addition);
    assert!(rejected[0].annotation.is_same(&bad));
    assert!(matches!(
        rejected[0].error,
        AnnotatorError::Rejected { .. }
    ));
    assert!(h.module.rejected().is_empty());

    let mut fixed = rejected[0].annotation.clone();
    fixed.text = "fixed".to_string();
    assert_eq!(
        h.module.add_annotation(fixed.clone(), None),
        Ok(MutationOutcome::Applied)
    );
    assert_eq!(h.module.annotations(Some("img")), vec![good, fixed]);
}

#[test]
fn rejected_buffered_removal_is_reported_once() {
    let mut h = Harness::new(&["img"]);
    h.module.init();

    let never_added = Annotation::new("img", "ghost");
    assert_eq!(
        h.module.remove_annotation(&never_added),
        Ok(MutationOutcome::Buffered)
    );
    h.module.make_annotatable(image("img"));

    assert!(h.module.buffered().removals().is_empty());
    let rejected = h.module.take_rejected();
    assert_eq!(rejected.len(), 1);
    assert_eq!(rejected[0].kind, MutationKind::Removal);
    assert_eq!(
        rejected[0].error,
        AnnotatorError::UnknownAnnotation(never_added.id)
    );
    assert!(h.module.take_rejected().is_empty());
}

#[test]
fn active_item_errors_propagate_to_caller() {
    let mut h = Harness::new(&[]);
    h.module.make_annotatable(image("img"));

    let invalid = Annotation::new("img", "x").with_shape(Shape::rect(0.0, 0.0, -3.0, 1.0));
    assert!(matches!(
        h.module.add_annotation(invalid, None),
        Err(AnnotatorError::InvalidShape { .. })
    ));

    let missing = Annotation::new("img", "never added");
    assert_eq!(
        h.module.remove_annotation(&missing),
        Err(AnnotatorError::UnknownAnnotation(missing.id))
    );
    assert!(h.module.buffered().is_empty());
}

#[test]
fn replace_on_active_item_is_delegated() {
    let mut h = Harness::new(&[]);
    h.module.make_annotatable(image("img"));

    let first = Annotation::new("img", "v1");
    let second = Annotation::new("img", "v2");
    h.module.add_annotation(first.clone(), None).unwrap();
    h.module
        .add_annotation(second.clone(), Some(&first))
        .unwrap();

    assert_eq!(h.module.annotations(Some("img")), vec![second]);
}

#[test]
fn annotations_for_unknown_url_are_empty() {
    let mut h = Harness::new(&[]);
    h.module.init();
    assert!(h.module.annotations(Some("nope")).is_empty());
    assert_eq!(
        h.module
            .add_annotation(Annotation::new("nope", "x"), None)
            .unwrap(),
        MutationOutcome::Ignored
    );
    assert!(h.module.annotations(None).is_empty());
}
