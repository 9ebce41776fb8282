#![allow(clippy::float_cmp)]

use uuid::Uuid;

use super::*;
use crate::camera::PanMode;
use crate::config::LayoutConfig;
use crate::issues::IssueBox;

// =============================================================
// Helpers
// =============================================================

fn issue(item: ItemId, bounds: IssueBox, severity: Severity) -> DesignIssue {
    DesignIssue {
        id: Uuid::new_v4(),
        item_id: item,
        category: IssueCategory::Contrast,
        severity,
        message: "Text contrast ratio is 3.5:1.".into(),
        bounds,
    }
}

struct Fixture {
    items: ItemStore,
    issues: IssueStore,
    selection: SelectionState,
    a: ItemId,
    b: ItemId,
}

/// Two items, A processed with two issues, B still processing with one.
fn fixture() -> Fixture {
    let mut items = ItemStore::new();
    let a = items.append(ResourceRef::new("mem://a"), 0.0, 0.0, &LayoutConfig::default()).id;
    let b = items.append(ResourceRef::new("mem://b"), 0.0, 0.0, &LayoutConfig::default()).id;
    items.mark_processed(&a);
    let mut issues = IssueStore::new();
    issues.append_batch(
        &a,
        vec![
            issue(a, IssueBox::new(0.0, 0.0, 50.0, 50.0), Severity::High),
            issue(a, IssueBox::new(50.0, 50.0, 25.0, 25.0), Severity::Low),
        ],
    );
    issues.append_batch(&b, vec![issue(b, IssueBox::new(0.0, 0.0, 10.0, 10.0), Severity::High)]);
    Fixture { items, issues, selection: SelectionState::new(), a, b }
}

fn project(f: &Fixture, camera: &Camera) -> Scene {
    Scene::project(&f.items, &f.issues, &f.selection, camera)
}

// =============================================================
// Scene
// =============================================================

#[test]
fn items_paint_in_stack_order() {
    let f = fixture();
    let scene = project(&f, &Camera::default());
    let order: Vec<ItemId> = scene.items.iter().map(|view| view.id).collect();
    assert_eq!(order, vec![f.a, f.b]);
}

#[test]
fn focused_item_paints_last() {
    let mut f = fixture();
    f.selection.focus(Some(f.a));
    let scene = project(&f, &Camera::default());
    let order: Vec<ItemId> = scene.items.iter().map(|view| view.id).collect();
    assert_eq!(order, vec![f.b, f.a]);
    assert!(scene.items[1].focused);
    assert!(!scene.items[0].focused);
}

#[test]
fn overlays_only_for_processed_items() {
    let f = fixture();
    let scene = project(&f, &Camera::default());
    assert_eq!(scene.overlays.len(), 2);
    assert!(scene.overlays.iter().all(|view| view.item_id == f.a));
    assert!(scene.items.iter().any(|view| view.id == f.b && view.processing));
}

#[test]
fn overlay_rects_follow_item_and_camera() {
    let f = fixture();
    let camera = Camera { pan_x: 0.0, pan_y: 0.0, zoom: 2.0, mode: PanMode::World };
    let scene = project(&f, &camera);
    let first = &scene.overlays[0];
    assert_eq!(first.world, Rect { x: 100.0, y: 100.0, width: 200.0, height: 150.0 });
    assert_eq!(first.screen, Rect { x: 200.0, y: 200.0, width: 400.0, height: 300.0 });
    assert_eq!(first.title, "Accessibility Risk");
}

#[test]
fn item_screen_rect_uses_camera() {
    let f = fixture();
    let camera = Camera { pan_x: 10.0, pan_y: 20.0, zoom: 0.5, mode: PanMode::Screen };
    let scene = project(&f, &camera);
    assert_eq!(scene.items[0].screen, Rect { x: 60.0, y: 70.0, width: 200.0, height: 150.0 });
    assert_eq!(scene.items[0].world, Rect { x: 100.0, y: 100.0, width: 400.0, height: 300.0 });
}

#[test]
fn active_when_hovered_or_selected() {
    let mut f = fixture();
    let ids: Vec<IssueId> = f.issues.for_item(&f.a).iter().map(|issue| issue.id).collect();
    f.selection.hover(Some(ids[0]));
    f.selection.select_issue(Some(ids[1]), &f.issues);
    let scene = project(&f, &Camera::default());

    let hovered = scene.overlays.iter().find(|view| view.id == ids[0]).unwrap();
    assert!(hovered.hovered && !hovered.selected && hovered.active);
    let selected = scene.overlays.iter().find(|view| view.id == ids[1]).unwrap();
    assert!(selected.selected && !selected.hovered && selected.active);
}

#[test]
fn idle_overlays_are_inactive() {
    let f = fixture();
    let scene = project(&f, &Camera::default());
    assert!(scene.overlays.iter().all(|view| !view.active));
}

#[test]
fn stroke_width_never_below_two() {
    let f = fixture();
    let at = |zoom: f64| project(&f, &Camera { zoom, ..Camera::default() }).overlays[0].stroke_width;
    assert_eq!(at(1.0), 2.5);
    assert_eq!(at(0.5), 5.0);
    assert_eq!(at(4.0), 2.0);
}

#[test]
fn popover_counter_scales_zoom() {
    let f = fixture();
    let scene = project(&f, &Camera { zoom: 2.0, ..Camera::default() });
    assert_eq!(scene.overlays[0].popover_scale, 0.5);
}

#[test]
fn grid_phase_wraps_offset() {
    let f = fixture();
    let scene = project(&f, &Camera { pan_x: 50.0, pan_y: -5.0, zoom: 1.0, mode: PanMode::Screen });
    assert_eq!(scene.grid_phase, Point::new(2.0, 19.0));
}

#[test]
fn scene_serializes_for_the_host() {
    let f = fixture();
    let json = serde_json::to_value(project(&f, &Camera::default())).unwrap();
    assert_eq!(json["items"].as_array().map(Vec::len), Some(2));
    assert_eq!(json["overlays"][0]["category"], "contrast");
}

// =============================================================
// IssuePanel
// =============================================================

#[test]
fn panel_empty_without_focus() {
    let f = fixture();
    let panel = IssuePanel::for_focus(&f.items, &f.issues, None);
    assert_eq!(panel, IssuePanel::Empty);
    assert_eq!(panel.header(), "No image selected");
}

#[test]
fn panel_scanning_while_processing() {
    let f = fixture();
    let panel = IssuePanel::for_focus(&f.items, &f.issues, Some(f.b));
    assert_eq!(panel, IssuePanel::Scanning { item_id: f.b });
    assert_eq!(panel.header(), "Analyzing...");
}

#[test]
fn panel_ready_lists_issues_in_order() {
    let f = fixture();
    let panel = IssuePanel::for_focus(&f.items, &f.issues, Some(f.a));
    let IssuePanel::Ready { item_id, issues, summary } = &panel else {
        panic!("expected ready panel, got {panel:?}");
    };
    assert_eq!(*item_id, f.a);
    let expected: Vec<IssueId> = f.issues.for_item(&f.a).iter().map(|issue| issue.id).collect();
    let listed: Vec<IssueId> = issues.iter().map(|issue| issue.id).collect();
    assert_eq!(listed, expected);
    assert_eq!(*summary, IssueSummary { total: 2, high: 1 });
    assert_eq!(panel.header(), "2 issues detected");
}

#[test]
fn panel_for_removed_focus_is_empty() {
    let f = fixture();
    assert_eq!(IssuePanel::for_focus(&f.items, &f.issues, Some(Uuid::new_v4())), IssuePanel::Empty);
}
