//! Item registry: placed images, their layout and stacking order.
//!
//! Items are kept in append order, which drives auto-placement: every new item
//! lands to the right of the previously appended one. `stack_order` is a
//! separate, unique priority used for paint and interaction precedence.
//!
//! Each item exclusively owns its [`ResourceRef`]. The registry never drops a
//! handle silently: [`ItemStore::remove`] and [`ItemStore::clear`] hand the
//! removed items back so the caller can release their resources.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::camera::Point;
use crate::config::LayoutConfig;

/// Unique identifier for a canvas item.
pub type ItemId = Uuid;

/// The kind of a canvas item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    /// A raster image supplied by the user.
    Image,
}

/// Opaque handle to a displayable bitmap (for example a blob URL).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceRef(String);

impl ResourceRef {
    #[must_use]
    pub fn new(handle: impl Into<String>) -> Self {
        Self(handle.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A visual item placed on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasItem {
    /// Unique identifier, generated on insertion.
    pub id: ItemId,
    pub kind: ItemKind,
    /// Handle to the displayed bitmap, owned by this item.
    pub resource: ResourceRef,
    /// Left edge in world coordinates.
    pub x: f64,
    /// Top edge in world coordinates.
    pub y: f64,
    /// Width in world units.
    pub width: f64,
    /// Height in world units.
    pub height: f64,
    /// Paint/interaction priority; higher values are on top.
    pub stack_order: u64,
    /// True until the annotation pass for this item completes.
    pub processing: bool,
}

impl CanvasItem {
    /// Whether `world` lies inside the item's bounds (edges inclusive).
    #[must_use]
    pub fn contains(&self, world: Point) -> bool {
        world.x >= self.x && world.x <= self.x + self.width && world.y >= self.y && world.y <= self.y + self.height
    }
}

/// In-memory registry of canvas items.
#[derive(Debug, Default)]
pub struct ItemStore {
    items: Vec<CanvasItem>,
}

impl ItemStore {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Append a new image item and return a copy of it.
    ///
    /// The first item is placed at `layout.origin`; later ones sit to the right
    /// of the last appended item, separated by `layout.gap`, on the same row.
    pub fn append(
        &mut self,
        resource: ResourceRef,
        natural_width: f64,
        natural_height: f64,
        layout: &LayoutConfig,
    ) -> CanvasItem {
        let (width, height) = layout.sizing.resolve(natural_width, natural_height);
        let origin = match self.items.last() {
            Some(last) => Point::new(last.x + last.width + layout.gap, last.y),
            None => layout.origin,
        };
        let item = CanvasItem {
            id: Uuid::new_v4(),
            kind: ItemKind::Image,
            resource,
            x: origin.x,
            y: origin.y,
            width,
            height,
            stack_order: self.next_stack_order(),
            processing: true,
        };
        self.items.push(item.clone());
        item
    }

    /// Clear the processing flag. Unknown ids are ignored and return `false`.
    pub fn mark_processed(&mut self, id: &ItemId) -> bool {
        let Some(item) = self.items.iter_mut().find(|item| item.id == *id) else {
            return false;
        };
        item.processing = false;
        true
    }

    /// Move an item above every other item. Returns `true` if its order changed.
    pub fn bring_to_front(&mut self, id: &ItemId) -> bool {
        let top = self.max_stack_order();
        let Some(item) = self.items.iter_mut().find(|item| item.id == *id) else {
            return false;
        };
        if item.stack_order == top {
            return false;
        }
        item.stack_order = top + 1;
        true
    }

    /// Remove an item, returning it so its resource can be released.
    pub fn remove(&mut self, id: &ItemId) -> Option<CanvasItem> {
        let index = self.items.iter().position(|item| item.id == *id)?;
        Some(self.items.remove(index))
    }

    /// Remove every item, returning them in append order.
    pub fn clear(&mut self) -> Vec<CanvasItem> {
        std::mem::take(&mut self.items)
    }

    /// Return a reference to an item by id.
    #[must_use]
    pub fn get(&self, id: &ItemId) -> Option<&CanvasItem> {
        self.items.iter().find(|item| item.id == *id)
    }

    /// Whether an item with this id exists.
    #[must_use]
    pub fn contains(&self, id: &ItemId) -> bool {
        self.get(id).is_some()
    }

    /// Items in append (layout) order.
    #[must_use]
    pub fn in_append_order(&self) -> &[CanvasItem] {
        &self.items
    }

    /// Items sorted by `stack_order`, bottom first.
    #[must_use]
    pub fn in_stack_order(&self) -> Vec<&CanvasItem> {
        let mut items: Vec<&CanvasItem> = self.items.iter().collect();
        items.sort_by_key(|item| item.stack_order);
        items
    }

    /// Number of items currently placed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if no items are placed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn max_stack_order(&self) -> u64 {
        self.items.iter().map(|item| item.stack_order).max().unwrap_or(0)
    }

    fn next_stack_order(&self) -> u64 {
        self.max_stack_order() + 1
    }
}
