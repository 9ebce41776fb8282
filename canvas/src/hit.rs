//! Hit-testing items and issue boxes against screen points.
//!
//! The focused item wins over anything stacked above it. An item still being
//! annotated exposes no issue hits.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::camera::{Camera, Point};
use crate::consts::PERCENT_MAX;
use crate::doc::{CanvasItem, ItemId, ItemStore};
use crate::issues::{DesignIssue, IssueId, IssueStore};

/// Axis-aligned rectangle in world or screen space.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }
}

/// World-space rectangle of an issue box on its item.
#[must_use]
pub fn issue_world_rect(item: &CanvasItem, issue: &DesignIssue) -> Rect {
    let b = issue.bounds;
    Rect {
        x: item.x + b.x * item.width / PERCENT_MAX,
        y: item.y + b.y * item.height / PERCENT_MAX,
        width: b.w * item.width / PERCENT_MAX,
        height: b.h * item.height / PERCENT_MAX,
    }
}

/// Screen-space rectangle of a world rectangle under `camera`.
#[must_use]
pub fn to_screen(rect: Rect, camera: &Camera) -> Rect {
    let top_left = camera.world_to_screen(Point::new(rect.x, rect.y));
    Rect {
        x: top_left.x,
        y: top_left.y,
        width: camera.world_dist_to_screen(rect.width),
        height: camera.world_dist_to_screen(rect.height),
    }
}

/// Items in hit-test priority: the focused item first, then highest stack order.
fn by_priority(items: &ItemStore, focused: Option<ItemId>) -> Vec<&CanvasItem> {
    let mut ordered = items.in_stack_order();
    ordered.reverse();
    if let Some(pos) = focused.and_then(|id| ordered.iter().position(|item| item.id == id)) {
        let item = ordered.remove(pos);
        ordered.insert(0, item);
    }
    ordered
}

/// The topmost item under a screen point, if any.
#[must_use]
pub fn item_at(screen: Point, items: &ItemStore, camera: &Camera, focused: Option<ItemId>) -> Option<ItemId> {
    let world = camera.screen_to_world(screen);
    by_priority(items, focused)
        .into_iter()
        .find(|item| item.contains(world))
        .map(|item| item.id)
}

/// The topmost visible issue box under a screen point, if any.
///
/// Only the topmost item under the point is considered; one still being
/// annotated shows no issues. Within the item, later issues are painted on top
/// and win.
#[must_use]
pub fn issue_at(
    screen: Point,
    items: &ItemStore,
    issues: &IssueStore,
    camera: &Camera,
    focused: Option<ItemId>,
) -> Option<IssueId> {
    let world = camera.screen_to_world(screen);
    let item = by_priority(items, focused).into_iter().find(|item| item.contains(world))?;
    if item.processing {
        return None;
    }
    issues
        .for_item(&item.id)
        .into_iter()
        .rev()
        .find(|issue| issue_world_rect(item, issue).contains(world))
        .map(|issue| issue.id)
}
