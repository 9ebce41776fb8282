#![allow(clippy::float_cmp)]

use super::*;
use crate::config::{ItemSizing, LayoutConfig};

// =============================================================
// Helpers
// =============================================================

fn layout() -> LayoutConfig {
    LayoutConfig::default()
}

fn res(name: &str) -> ResourceRef {
    ResourceRef::new(format!("blob:{name}"))
}

fn store_with(n: usize) -> ItemStore {
    let mut store = ItemStore::new();
    for i in 0..n {
        store.append(res(&i.to_string()), 0.0, 0.0, &layout());
    }
    store
}

// =============================================================
// ResourceRef
// =============================================================

#[test]
fn resource_ref_round_trips_handle() {
    let r = ResourceRef::new("blob:abc");
    assert_eq!(r.as_str(), "blob:abc");
}

#[test]
fn resource_ref_serializes_transparently() {
    let r = ResourceRef::new("blob:abc");
    assert_eq!(serde_json::to_value(&r).unwrap(), serde_json::json!("blob:abc"));
}

// =============================================================
// append
// =============================================================

#[test]
fn new_store_is_empty() {
    let store = ItemStore::new();
    assert!(store.is_empty());
    assert_eq!(store.len(), 0);
}

#[test]
fn first_item_is_placed_at_origin() {
    let mut store = ItemStore::new();
    let item = store.append(res("a"), 0.0, 0.0, &layout());
    assert_eq!(item.x, 100.0);
    assert_eq!(item.y, 100.0);
    assert_eq!(item.width, 400.0);
    assert_eq!(item.height, 300.0);
}

#[test]
fn append_sets_processing_and_image_kind() {
    let mut store = ItemStore::new();
    let item = store.append(res("a"), 0.0, 0.0, &layout());
    assert!(item.processing);
    assert_eq!(item.kind, ItemKind::Image);
    assert_eq!(item.resource, res("a"));
}

#[test]
fn second_item_is_placed_right_of_first() {
    let mut store = ItemStore::new();
    let first = store.append(res("a"), 0.0, 0.0, &layout());
    let second = store.append(res("b"), 0.0, 0.0, &layout());
    assert_eq!(second.x, first.x + first.width + 50.0);
    assert_eq!(second.y, first.y);
    assert_eq!(second.stack_order, 2);
}

#[test]
fn placement_follows_variable_widths() {
    let sizing = LayoutConfig { sizing: ItemSizing::Natural, ..LayoutConfig::default() };
    let mut store = ItemStore::new();
    let first = store.append(res("a"), 200.0, 100.0, &sizing);
    let second = store.append(res("b"), 800.0, 600.0, &sizing);
    let third = store.append(res("c"), 10.0, 10.0, &sizing);
    assert_eq!(second.x, first.x + 200.0 + 50.0);
    assert_eq!(third.x, second.x + 800.0 + 50.0);
}

#[test]
fn stack_orders_are_one_through_n_in_insertion_order() {
    let store = store_with(5);
    let orders: Vec<u64> = store.in_append_order().iter().map(|i| i.stack_order).collect();
    assert_eq!(orders, vec![1, 2, 3, 4, 5]);
}

#[test]
fn ids_are_unique() {
    let store = store_with(10);
    let mut ids: Vec<ItemId> = store.in_append_order().iter().map(|i| i.id).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 10);
}

#[test]
fn stack_order_stays_unique_after_removal() {
    let mut store = store_with(3);
    let second = store.in_append_order()[1].id;
    store.remove(&second);
    let added = store.append(res("d"), 0.0, 0.0, &layout());
    assert_eq!(added.stack_order, 4);
}

#[test]
fn placement_after_removing_last_uses_new_last() {
    let mut store = store_with(2);
    let first = store.in_append_order()[0].clone();
    let last = store.in_append_order()[1].id;
    store.remove(&last);
    let added = store.append(res("c"), 0.0, 0.0, &layout());
    assert_eq!(added.x, first.x + first.width + 50.0);
}

// =============================================================
// mark_processed
// =============================================================

#[test]
fn mark_processed_clears_flag() {
    let mut store = store_with(1);
    let id = store.in_append_order()[0].id;
    assert!(store.mark_processed(&id));
    assert!(!store.get(&id).unwrap().processing);
}

#[test]
fn mark_processed_unknown_id_is_noop() {
    let mut store = store_with(2);
    let before: Vec<CanvasItem> = store.in_append_order().to_vec();
    assert!(!store.mark_processed(&Uuid::new_v4()));
    assert_eq!(store.in_append_order(), before.as_slice());
}

// =============================================================
// bring_to_front
// =============================================================

#[test]
fn bring_to_front_promotes_above_all() {
    let mut store = store_with(3);
    let first = store.in_append_order()[0].id;
    assert!(store.bring_to_front(&first));
    assert_eq!(store.get(&first).unwrap().stack_order, 4);
    assert_eq!(store.in_stack_order().last().unwrap().id, first);
}

#[test]
fn bring_to_front_topmost_is_noop() {
    let mut store = store_with(3);
    let last = store.in_append_order()[2].id;
    assert!(!store.bring_to_front(&last));
    assert_eq!(store.get(&last).unwrap().stack_order, 3);
}

#[test]
fn bring_to_front_unknown_is_noop() {
    let mut store = store_with(1);
    assert!(!store.bring_to_front(&Uuid::new_v4()));
}

#[test]
fn bring_to_front_keeps_layout_order() {
    let mut store = store_with(3);
    let first = store.in_append_order()[0].id;
    store.bring_to_front(&first);
    assert_eq!(store.in_append_order()[0].id, first);
}

// =============================================================
// remove / clear
// =============================================================

#[test]
fn remove_returns_item_with_resource() {
    let mut store = ItemStore::new();
    let item = store.append(res("a"), 0.0, 0.0, &layout());
    let removed = store.remove(&item.id).unwrap();
    assert_eq!(removed.resource, res("a"));
    assert!(store.is_empty());
}

#[test]
fn remove_unknown_returns_none() {
    let mut store = store_with(1);
    assert!(store.remove(&Uuid::new_v4()).is_none());
    assert_eq!(store.len(), 1);
}

#[test]
fn clear_returns_all_items() {
    let mut store = store_with(3);
    let removed = store.clear();
    assert_eq!(removed.len(), 3);
    assert!(store.is_empty());
}

// =============================================================
// Queries
// =============================================================

#[test]
fn contains_point_is_edge_inclusive() {
    let mut store = ItemStore::new();
    let item = store.append(res("a"), 0.0, 0.0, &layout());
    assert!(item.contains(Point::new(100.0, 100.0)));
    assert!(item.contains(Point::new(500.0, 400.0)));
    assert!(!item.contains(Point::new(99.9, 200.0)));
    assert!(!item.contains(Point::new(300.0, 400.1)));
}

#[test]
fn in_stack_order_sorts_bottom_first() {
    let mut store = store_with(3);
    let first = store.in_append_order()[0].id;
    store.bring_to_front(&first);
    let orders: Vec<u64> = store.in_stack_order().iter().map(|i| i.stack_order).collect();
    assert_eq!(orders, vec![2, 3, 4]);
}

#[test]
fn get_and_contains() {
    let store = store_with(1);
    let id = store.in_append_order()[0].id;
    assert!(store.contains(&id));
    assert!(store.get(&id).is_some());
    assert!(!store.contains(&Uuid::new_v4()));
}
