use super::*;
use crate::engine::fixtures::{Layout, docked_texts, engine, role_id};
use crate::graph::model::Direction;

fn state(e: &Engine) -> Vec<(String, String, f64, crate::foundation::core::Quad)> {
    e.graph()
        .elements()
        .iter()
        .map(|x| (x.id.clone(), x.container_id.clone(), x.opacity, x.points))
        .collect()
}

#[test]
fn button_bundles_start_queued_in_the_top_slot() {
    let e = engine(&[("a", Layout::ring(3).with_button())]);
    let top = role_id("a", TeleportRole::Top);
    assert!(!e.is_bundle_initialized("a"));
    for x in e.graph().elements().iter().filter(|x| !x.is_duplicate()) {
        assert_eq!(x.container_id, top);
        assert_eq!(x.opacity, 0.0);
        assert!(x.home_container_id.is_some());
    }
    assert_eq!(docked_texts(&e, "a"), vec!["", "", ""]);
}

#[test]
fn open_cascade_delivers_each_resident_home() {
    let mut e = engine(&[("a", Layout::ring(3).with_button())]);
    e.activate_button("a");
    assert!(e.is_busy());
    assert!(e.settle());
    assert!(e.is_bundle_initialized("a"));
    assert_eq!(docked_texts(&e, "a"), vec!["Item 1", "Item 2", "Item 3"]);
    for c in e.graph().normal_containers("a") {
        let x = e.graph().docked(&c.id).unwrap();
        assert_eq!(x.opacity, 1.0);
        assert_eq!(x.points, c.points);
    }
}

#[test]
fn open_cascade_releases_bottommost_target_first() {
    let mut e = engine(&[("a", Layout::ring(3).with_button())]);
    e.cascade_delay = 0.5;
    e.activate_button("a");
    e.tick(0.2);
    assert_eq!(e.graph().element("a:element:2").unwrap().opacity, 1.0);
    assert_eq!(e.graph().element("a:element:1").unwrap().opacity, 0.0);
    assert_eq!(e.graph().element("a:element:0").unwrap().opacity, 0.0);
    e.tick(0.4);
    assert_eq!(e.graph().element("a:element:1").unwrap().opacity, 1.0);
    assert_eq!(e.graph().element("a:element:0").unwrap().opacity, 0.0);
}

#[test]
fn close_cascade_stows_everything_and_reopens() {
    let mut e = engine(&[("a", Layout::ring(4).with_button())]);
    e.activate_button("a");
    e.settle();
    e.activate_button("a");
    assert!(e.is_busy());
    assert!(e.settle());

    assert!(!e.is_bundle_initialized("a"));
    let top = role_id("a", TeleportRole::Top);
    for x in e.graph().elements() {
        assert_eq!(x.opacity, 0.0, "{}", x.id);
        if !x.is_duplicate() {
            assert_eq!(x.container_id, top);
        }
    }

    e.activate_button("a");
    e.settle();
    assert!(e.is_bundle_initialized("a"));
    assert_eq!(docked_texts(&e, "a"), vec!["Item 1", "Item 2", "Item 3", "Item 4"]);
}

#[test]
fn close_cascade_stacks_upward_before_fading() {
    let mut e = engine(&[("a", Layout::ring(3).with_button())]);
    e.activate_button("a");
    e.settle();
    e.close_cascade("a");
    // first climb (0.5 s) has landed: slot 2's resident covers slot 1
    for _ in 0..33 {
        e.tick(1.0 / 60.0);
    }
    let climber = e.graph().element("a:element:2").unwrap();
    assert_eq!(climber.container_id, crate::engine::fixtures::container_id("a", 1));
    assert_eq!(climber.opacity, 1.0);
    assert_eq!(e.graph().element("a:element:1").unwrap().opacity, 0.0);
    assert_eq!(e.graph().element("a:element:0").unwrap().opacity, 1.0);
}

#[test]
fn close_cascade_remembers_scrolled_positions() {
    let mut e = engine(&[("a", Layout::ring(3).with_button())]);
    e.activate_button("a");
    e.settle();
    e.scroll(Direction::Down, None);
    e.settle();
    let before = docked_texts(&e, "a");
    e.activate_button("a");
    e.settle();
    e.activate_button("a");
    e.settle();
    assert_eq!(docked_texts(&e, "a"), before);
}

#[test]
fn scroll_during_open_cascade_has_no_effect() {
    let mut with_scroll = engine(&[("a", Layout::ring(3).with_button())]);
    let mut without = engine(&[("a", Layout::ring(3).with_button())]);

    with_scroll.activate_button("a");
    without.activate_button("a");
    for _ in 0..10 {
        with_scroll.tick(1.0 / 60.0);
        without.tick(1.0 / 60.0);
    }
    with_scroll.scroll(Direction::Down, Some(20.0));
    with_scroll.settle();
    without.settle();
    assert_eq!(state(&with_scroll), state(&without));
}

#[test]
fn cascades_without_a_top_slot_are_no_ops() {
    let layout = Layout {
        top: false,
        ..Layout::ring(3).with_button()
    };
    let mut e = engine(&[("a", layout)]);
    assert!(e.is_bundle_initialized("a"));
    e.open_cascade("a");
    assert!(!e.is_busy());
    e.close_cascade("a");
    assert!(!e.is_busy());
}

#[test]
fn open_cascade_on_an_open_bundle_is_a_no_op() {
    let mut e = engine(&[("a", Layout::ring(2))]);
    e.open_cascade("a");
    assert!(!e.is_busy());
}

#[test]
fn cascades_in_scrolling_lists_keep_the_window() {
    let mut e = engine(&[("a", Layout::list(3, 5).with_button())]);
    e.activate_button("a");
    e.settle();
    assert_eq!(
        crate::engine::fixtures::docked_items(&e, "a"),
        vec![Some(0), Some(1), Some(2)]
    );
    e.scroll(Direction::Down, None);
    e.settle();
    assert_eq!(
        crate::engine::fixtures::docked_items(&e, "a"),
        vec![Some(1), Some(2), Some(3)]
    );
}
