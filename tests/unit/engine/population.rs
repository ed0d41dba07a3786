use super::*;
use crate::engine::fixtures::{Layout, config, docked_items, docked_texts, engine, staged};

#[test]
fn ring_residents_read_item_names_from_containers() {
    let e = engine(&[("a", Layout::ring(3))]);
    assert_eq!(docked_texts(&e, "a"), vec!["Item 1", "Item 2", "Item 3"]);
    let top = staged(&e, "a", TeleportRole::Top).unwrap();
    let bottom = staged(&e, "a", TeleportRole::Bottom).unwrap();
    assert_eq!(top.content.text, "Item 3");
    assert_eq!(bottom.content.text, "Item 1");
    assert_eq!(top.role, ElementRole::Duplicate);
}

#[test]
fn few_items_fill_ring_slots_in_order() {
    let e = engine(&[("a", Layout::list(3, 2))]);
    assert_eq!(docked_texts(&e, "a"), vec!["ITEM 1", "ITEM 2", "Item 3"]);
    assert!(e.visible_start_index("a").is_none());
}

#[test]
fn scrolling_list_pool_has_one_resident_per_container() {
    let e = engine(&[("a", Layout::list(4, 9))]);
    let residents = e.graph().bundle_elements("a").filter(|x| !x.is_duplicate()).count();
    assert_eq!(residents, 4);
    assert_eq!(docked_items(&e, "a"), vec![Some(0), Some(1), Some(2), Some(3)]);
    assert_eq!(staged(&e, "a", TeleportRole::Top).unwrap().content.item_index, Some(8));
    assert_eq!(staged(&e, "a", TeleportRole::Bottom).unwrap().content.item_index, Some(4));
}

#[test]
fn queued_list_stages_the_item_after_the_window() {
    let mut e = engine(&[("a", Layout::list(3, 7).with_button())]);
    assert!(!e.is_bundle_initialized("a"));
    let bottom = staged(&e, "a", TeleportRole::Bottom).unwrap();
    assert_eq!(bottom.content.item_index, Some(3));
    assert_eq!(staged(&e, "a", TeleportRole::Top).unwrap().content.item_index, Some(6));

    e.activate_button("a");
    assert!(e.settle());
    assert_eq!(docked_items(&e, "a"), vec![Some(0), Some(1), Some(2)]);
    assert_eq!(staged(&e, "a", TeleportRole::Bottom).unwrap().content.item_index, Some(3));
}

#[test]
fn bundles_without_staging_get_no_duplicates() {
    let e = engine(&[("a", Layout::bare(2))]);
    assert!(e.graph().elements().iter().all(|x| !x.is_duplicate()));
}

#[test]
fn bundles_without_ring_containers_are_empty() {
    let e = engine(&[("a", Layout::bare(0)), ("b", Layout::ring(2))]);
    assert_eq!(e.graph().bundle_elements("a").count(), 0);
    assert!(e.is_bundle_initialized("a"));
    assert_eq!(e.graph().bundle_elements("b").count(), 4);
}

#[test]
fn restage_repairs_displaced_duplicates() {
    let mut e = engine(&[("a", Layout::ring(3))]);
    let top_slot = crate::engine::fixtures::role_id("a", TeleportRole::Top);
    let bottom_slot = crate::engine::fixtures::role_id("a", TeleportRole::Bottom);
    let top_dup = staged(&e, "a", TeleportRole::Top).unwrap().id.clone();
    e.graph.teleport(&top_dup, &bottom_slot);
    e.graph.set_opacity(&top_dup, 1.0);

    e.restage("a");
    let top = staged(&e, "a", TeleportRole::Top).unwrap();
    let bottom = staged(&e, "a", TeleportRole::Bottom).unwrap();
    assert_ne!(top.id, bottom.id);
    assert_eq!(top.container_id, top_slot);
    assert_eq!(top.content.text, "Item 3");
    assert_eq!(bottom.content.text, "Item 1");
    assert!(e.graph().elements().iter().filter(|x| x.is_duplicate()).all(|x| x.opacity == 0.0));
}

#[test]
fn stow_parks_residents_hidden_in_the_top_slot() {
    let mut e = engine(&[("a", Layout::ring(2))]);
    e.stow("a");
    let top = crate::engine::fixtures::role_id("a", TeleportRole::Top);
    for x in e.graph().bundle_elements("a").filter(|x| !x.is_duplicate()) {
        assert_eq!(x.container_id, top);
        assert_eq!(x.opacity, 0.0);
    }
    assert!(e.graph().docked(&crate::engine::fixtures::container_id("a", 0)).is_none());
}

#[test]
fn exported_start_index_tracks_population() {
    let mut cfg = config(&[("a", Layout::list(2, 3))]);
    cfg.visible_start_index.insert("a".into(), 4);
    let mut e = Engine::from_config(cfg).unwrap();
    e.enter_mode();
    assert_eq!(e.to_config().visible_start_index.get("a"), Some(&1));
}
