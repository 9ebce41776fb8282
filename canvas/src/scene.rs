//! Read-only projection of engine state for the presentation layer.
//!
//! A [`Scene`] is rebuilt on demand after `RenderNeeded`. It carries world
//! rectangles for a renderer that applies the camera transform itself and
//! screen rectangles for one that positions elements absolutely. Nothing in
//! here mutates state.

#[cfg(test)]
#[path = "scene_test.rs"]
mod scene_test;

use serde::Serialize;

use crate::camera::{Camera, Point};
use crate::consts::{GRID_SPACING_PX, ISSUE_STROKE_BASE_PX, ISSUE_STROKE_MIN_PX};
use crate::doc::{ItemId, ItemStore, ResourceRef};
use crate::hit::{self, Rect};
use crate::issues::{DesignIssue, IssueCategory, IssueId, IssueStore, IssueSummary, Severity};
use crate::selection::SelectionState;

/// One item as it should be painted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemView {
    pub id: ItemId,
    pub resource: ResourceRef,
    pub world: Rect,
    pub screen: Rect,
    /// Show the scanning indicator instead of issue boxes.
    pub processing: bool,
    pub focused: bool,
}

/// One issue box overlay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IssueView {
    pub id: IssueId,
    pub item_id: ItemId,
    pub category: IssueCategory,
    pub severity: Severity,
    pub title: &'static str,
    pub message: String,
    pub world: Rect,
    pub screen: Rect,
    pub hovered: bool,
    pub selected: bool,
    /// Hovered or selected: draw highlighted with the popover open.
    pub active: bool,
    /// Stroke width in world units, at least 2.
    pub stroke_width: f64,
    /// Counter-scale keeping the popover at a constant on-screen size.
    pub popover_scale: f64,
}

/// Everything the presentation layer draws for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub zoom: f64,
    /// Screen offset of the background dot grid.
    pub grid_phase: Point,
    /// Items in paint order, bottom first.
    pub items: Vec<ItemView>,
    /// Issue boxes in paint order, bottom first.
    pub overlays: Vec<IssueView>,
}

impl Scene {
    /// Build a snapshot.
    ///
    /// Items paint in stack order with the focused item last. Issue boxes are
    /// only shown for items whose annotation pass has finished.
    #[must_use]
    pub fn project(items: &ItemStore, issues: &IssueStore, selection: &SelectionState, camera: &Camera) -> Self {
        let focused = selection.focused_item();
        let mut ordered = items.in_stack_order();
        if let Some(pos) = focused.and_then(|id| ordered.iter().position(|item| item.id == id)) {
            let item = ordered.remove(pos);
            ordered.push(item);
        }

        let stroke_width = ISSUE_STROKE_MIN_PX.max(ISSUE_STROKE_BASE_PX / camera.zoom);
        let popover_scale = 1.0 / camera.zoom;

        let mut item_views = Vec::with_capacity(ordered.len());
        let mut overlays = Vec::new();
        for item in ordered {
            let world = Rect { x: item.x, y: item.y, width: item.width, height: item.height };
            item_views.push(ItemView {
                id: item.id,
                resource: item.resource.clone(),
                world,
                screen: hit::to_screen(world, camera),
                processing: item.processing,
                focused: focused == Some(item.id),
            });
            if item.processing {
                continue;
            }
            for issue in issues.for_item(&item.id) {
                let world = hit::issue_world_rect(item, issue);
                let hovered = selection.hovered_issue() == Some(issue.id);
                let selected = selection.selected_issue() == Some(issue.id);
                overlays.push(IssueView {
                    id: issue.id,
                    item_id: item.id,
                    category: issue.category,
                    severity: issue.severity,
                    title: issue.category.title(),
                    message: issue.message.clone(),
                    world,
                    screen: hit::to_screen(world, camera),
                    hovered,
                    selected,
                    active: hovered || selected,
                    stroke_width,
                    popover_scale,
                });
            }
        }

        Self { zoom: camera.zoom, grid_phase: camera.grid_phase(GRID_SPACING_PX), items: item_views, overlays }
    }
}

/// Contents of the side panel listing the focused item's issues.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum IssuePanel {
    /// Nothing focused.
    Empty,
    /// The focused item is still being annotated.
    Scanning { item_id: ItemId },
    Ready { item_id: ItemId, issues: Vec<DesignIssue>, summary: IssueSummary },
}

impl IssuePanel {
    /// Panel for the focused item, if any.
    #[must_use]
    pub fn for_focus(items: &ItemStore, issues: &IssueStore, focused: Option<ItemId>) -> Self {
        let Some(item) = focused.and_then(|id| items.get(&id)) else {
            return Self::Empty;
        };
        if item.processing {
            return Self::Scanning { item_id: item.id };
        }
        Self::Ready {
            item_id: item.id,
            issues: issues.for_item(&item.id).into_iter().cloned().collect(),
            summary: issues.summary(&item.id),
        }
    }

    /// Panel header line.
    #[must_use]
    pub fn header(&self) -> String {
        match self {
            Self::Empty => "No image selected".to_string(),
            Self::Scanning { .. } => "Analyzing...".to_string(),
            Self::Ready { summary, .. } => format!("{} issues detected", summary.total),
        }
    }
}
