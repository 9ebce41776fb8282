//! Interaction controller.
//!
//! `EngineCore` owns every piece of canvas state: the item and issue
//! registries, the selection, the camera and the gesture state machine. Input
//! handlers mutate that state and return a list of [`Action`]s describing what
//! the host must do next (request a scan, release a resource, repaint, ...).
//! Nothing here touches the DOM, so the whole controller runs natively in
//! tests and in the headless host.
//!
//! Gesture states:
//!
//! ```text
//! Idle --pointer down on background--> Panning --pointer up/leave--> Idle
//! Idle --drag enter with files--> DraggingFile --drop/drag leave--> Idle
//! ```
//!
//! Wheel and keyboard input are handled outside the state machine.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use tracing::{debug, info};

use crate::camera::{Camera, Point};
use crate::config::{CanvasConfig, CanvasVariant};
use crate::doc::{CanvasItem, ItemId, ItemStore, ResourceRef};
use crate::hit;
use crate::ingest::{IngestError, IngestedImage, MediaIngest, ingest_image};
use crate::input::{Button, Cursor, InputState, Key, Modifiers, WheelDelta};
use crate::issues::{DesignIssue, IssueId, IssueStore};
use crate::scene::{IssuePanel, Scene};
use crate::selection::{NavDirection, SelectionState};

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// A new item was placed on the canvas.
    ItemCreated(CanvasItem),
    /// An item left the canvas.
    ItemRemoved { id: ItemId },
    /// Start the annotation pass for a freshly created item.
    ScanRequested { item_id: ItemId },
    /// A resource handle is no longer owned by any item and must be freed.
    ReleaseResource(ResourceRef),
    /// A supplied file did not become an item.
    FileRejected { name: String, reason: IngestError },
    FocusChanged(Option<ItemId>),
    IssueSelected(Option<IssueId>),
    HoverChanged(Option<IssueId>),
    /// Drop-zone highlight on or off.
    DropTargetChanged(bool),
    SetCursor(Cursor),
    RenderNeeded,
}

/// Core engine state: all logic that doesn't depend on the browser.
#[derive(Debug)]
pub struct EngineCore {
    pub items: ItemStore,
    pub issues: IssueStore,
    pub selection: SelectionState,
    pub camera: Camera,
    pub input: InputState,
    pub config: CanvasConfig,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::new(CanvasConfig::default())
    }
}

impl EngineCore {
    #[must_use]
    pub fn new(config: CanvasConfig) -> Self {
        Self {
            items: ItemStore::new(),
            issues: IssueStore::new(),
            selection: SelectionState::new(),
            camera: Camera::new(config.initial_zoom(), config.pan_mode),
            input: InputState::default(),
            config,
        }
    }

    // --- Pointer ---

    /// Pointer pressed.
    ///
    /// On an item: focus it and select the issue box under the pointer, if
    /// any. On the background: start panning and clear focus. The secondary
    /// button is left to the context menu.
    pub fn on_pointer_down(&mut self, screen: Point, button: Button, _modifiers: Modifiers) -> Vec<Action> {
        if button == Button::Secondary {
            return Vec::new();
        }
        let before = self.selection.clone();
        let focused = self.selection.focused_item();
        let mut actions = Vec::new();

        match hit::item_at(screen, &self.items, &self.camera, focused) {
            Some(id) => {
                let issue = hit::issue_at(screen, &self.items, &self.issues, &self.camera, focused);
                self.selection.focus(Some(id));
                if issue.is_some() {
                    self.selection.select_issue(issue, &self.issues);
                }
                let raised = self.config.bring_to_front_on_select && self.items.bring_to_front(&id);
                push_selection_changes(&before, &self.selection, &mut actions);
                if raised && !actions.contains(&Action::RenderNeeded) {
                    actions.push(Action::RenderNeeded);
                }
            }
            None => {
                self.input = InputState::Panning { last_screen: screen };
                self.selection.focus(None);
                actions.push(Action::SetCursor(Cursor::Grabbing));
                push_selection_changes(&before, &self.selection, &mut actions);
            }
        }
        actions
    }

    /// Pointer moved. Pans while panning, tracks the hovered issue while idle.
    pub fn on_pointer_move(&mut self, screen: Point, _modifiers: Modifiers) -> Vec<Action> {
        match self.input {
            InputState::Panning { last_screen } => {
                let delta = Point::new(screen.x - last_screen.x, screen.y - last_screen.y);
                self.input = InputState::Panning { last_screen: screen };
                if delta == Point::default() {
                    return Vec::new();
                }
                self.camera.pan_by(delta);
                vec![Action::RenderNeeded]
            }
            InputState::Idle => {
                let focused = self.selection.focused_item();
                let issue = hit::issue_at(screen, &self.items, &self.issues, &self.camera, focused);
                self.hover_issue(issue)
            }
            InputState::DraggingFile => Vec::new(),
        }
    }

    /// Pointer released. Ends a pan.
    pub fn on_pointer_up(&mut self, _screen: Point, _button: Button) -> Vec<Action> {
        self.end_pan()
    }

    /// Pointer left the canvas. Ends a pan and drops the hover.
    pub fn on_pointer_leave(&mut self) -> Vec<Action> {
        let mut actions = self.end_pan();
        actions.extend(self.hover_issue(None));
        actions
    }

    fn end_pan(&mut self) -> Vec<Action> {
        if !matches!(self.input, InputState::Panning { .. }) {
            return Vec::new();
        }
        self.input = InputState::Idle;
        vec![Action::SetCursor(Cursor::Grab)]
    }

    // --- Wheel / keyboard ---

    /// Wheel or trackpad scroll.
    ///
    /// With Ctrl or Cmd held the wheel zooms, otherwise it pans against the
    /// scroll direction. Callers must suppress native scrolling for every
    /// wheel event that reaches the canvas, whichever branch runs.
    pub fn on_wheel(&mut self, delta: WheelDelta, modifiers: Modifiers) -> Vec<Action> {
        if modifiers.zoom_modifier() {
            if self.camera.wheel_zoom(delta.dy, true, &self.config.zoom) {
                return vec![Action::RenderNeeded];
            }
            return Vec::new();
        }
        if delta.dx == 0.0 && delta.dy == 0.0 {
            return Vec::new();
        }
        self.camera.pan_by(Point::new(-delta.dx, -delta.dy));
        vec![Action::RenderNeeded]
    }

    /// Key pressed anywhere in the window.
    ///
    /// Navigation keys walk the focused item's issues. Keys pressed with a
    /// Ctrl, Cmd or Alt chord belong to the browser and are ignored.
    pub fn on_key_down(&mut self, key: &Key, modifiers: Modifiers) -> Vec<Action> {
        if modifiers.has_chord() {
            return Vec::new();
        }
        match key.nav_direction() {
            Some(direction) => self.navigate(direction),
            None => Vec::new(),
        }
    }

    // --- Drag and drop ---

    /// Files dragged into the canvas.
    pub fn on_drag_enter(&mut self, has_files: bool) -> Vec<Action> {
        if !has_files || self.input != InputState::Idle {
            return Vec::new();
        }
        self.input = InputState::DraggingFile;
        vec![Action::DropTargetChanged(true)]
    }

    /// Files dragged over the canvas. Same as entering.
    pub fn on_drag_over(&mut self, has_files: bool) -> Vec<Action> {
        self.on_drag_enter(has_files)
    }

    /// Drag left the canvas without dropping.
    pub fn on_drag_leave(&mut self) -> Vec<Action> {
        if self.input != InputState::DraggingFile {
            return Vec::new();
        }
        self.input = InputState::Idle;
        vec![Action::DropTargetChanged(false)]
    }

    /// Files dropped on the canvas.
    pub fn on_drop<M: MediaIngest>(&mut self, files: &[M::File], media: &mut M) -> Vec<Action> {
        let mut actions = Vec::new();
        if self.input == InputState::DraggingFile {
            self.input = InputState::Idle;
            actions.push(Action::DropTargetChanged(false));
        }
        actions.extend(self.add_files(files, media));
        actions
    }

    /// Add files from a drop or the file picker.
    ///
    /// Every `image/*` file becomes an item; anything else is reported through
    /// [`Action::FileRejected`] and leaves the registry untouched. The
    /// single-image canvas keeps only the first image and replaces whatever it
    /// was showing.
    pub fn add_files<M: MediaIngest>(&mut self, files: &[M::File], media: &mut M) -> Vec<Action> {
        let was_empty = self.items.is_empty();
        let mut actions = Vec::new();

        for file in files {
            let image = match ingest_image(media, file) {
                Ok(image) => image,
                Err(reason) => {
                    let name = media.describe(file).name;
                    debug!(%name, %reason, "file rejected");
                    actions.push(Action::FileRejected { name, reason });
                    continue;
                }
            };
            if self.config.variant == CanvasVariant::SingleImage {
                actions.extend(self.remove_all());
                self.place(image, &mut actions);
                break;
            }
            self.place(image, &mut actions);
        }

        if self.config.variant == CanvasVariant::SingleImage && was_empty && !self.items.is_empty() {
            self.camera.reset(self.config.initial_zoom());
        }
        if actions.iter().any(|action| matches!(action, Action::ItemCreated(_))) {
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    fn place(&mut self, image: IngestedImage, actions: &mut Vec<Action>) {
        let item = self.items.append(image.resource, image.width, image.height, &self.config.layout);
        info!(item_id = %item.id, x = item.x, y = item.y, stack_order = item.stack_order, "item placed");
        let item_id = item.id;
        actions.push(Action::ItemCreated(item));
        actions.push(Action::ScanRequested { item_id });
    }

    // --- Annotation ---

    /// Apply a finished annotation pass.
    ///
    /// Marks the item processed and stores its issues in one step, so no
    /// snapshot ever shows a processed item without its issues. Completions for
    /// removed items and repeated completions are ignored.
    pub fn complete_scan(&mut self, item_id: ItemId, issues: Vec<DesignIssue>) -> Vec<Action> {
        match self.items.get(&item_id) {
            None => {
                debug!(%item_id, "scan completed for unknown item; ignoring");
                return Vec::new();
            }
            Some(item) if !item.processing => {
                debug!(%item_id, "duplicate scan completion; ignoring");
                return Vec::new();
            }
            Some(_) => {}
        }
        self.items.mark_processed(&item_id);
        let stored = self.issues.append_batch(&item_id, issues);
        info!(%item_id, stored, "scan completed");
        vec![Action::RenderNeeded]
    }

    // --- Selection ---

    /// Focus an item (or nothing). Unknown ids are ignored.
    pub fn focus_item(&mut self, item: Option<ItemId>) -> Vec<Action> {
        if let Some(id) = item {
            if !self.items.contains(&id) {
                debug!(item_id = %id, "focus on unknown item; ignoring");
                return Vec::new();
            }
        }
        let before = self.selection.clone();
        self.selection.focus(item);
        let raised = match item {
            Some(id) if self.config.bring_to_front_on_select => self.items.bring_to_front(&id),
            _ => false,
        };
        let mut actions = Vec::new();
        push_selection_changes(&before, &self.selection, &mut actions);
        if raised && !actions.contains(&Action::RenderNeeded) {
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    /// Set the hovered issue.
    pub fn hover_issue(&mut self, issue: Option<IssueId>) -> Vec<Action> {
        let before = self.selection.clone();
        self.selection.hover(issue);
        let mut actions = Vec::new();
        push_selection_changes(&before, &self.selection, &mut actions);
        actions
    }

    /// Select an issue (or nothing), focusing its item. Unknown ids are ignored.
    pub fn select_issue(&mut self, issue: Option<IssueId>) -> Vec<Action> {
        let before = self.selection.clone();
        if !self.selection.select_issue(issue, &self.issues) {
            if let Some(id) = issue {
                if self.issues.get(&id).is_none() {
                    debug!(issue_id = %id, "select of unknown issue; ignoring");
                }
            }
            return Vec::new();
        }
        let mut actions = Vec::new();
        push_selection_changes(&before, &self.selection, &mut actions);
        actions
    }

    /// Walk the focused item's issues.
    pub fn navigate(&mut self, direction: NavDirection) -> Vec<Action> {
        let before = self.selection.clone();
        if !self.selection.navigate(direction, &self.issues) {
            return Vec::new();
        }
        let mut actions = Vec::new();
        push_selection_changes(&before, &self.selection, &mut actions);
        actions
    }

    // --- View ---

    /// Zoom in by one button step.
    pub fn zoom_in(&mut self) -> Vec<Action> {
        self.step_zoom(self.config.zoom.step)
    }

    /// Zoom out by one button step.
    pub fn zoom_out(&mut self) -> Vec<Action> {
        self.step_zoom(-self.config.zoom.step)
    }

    fn step_zoom(&mut self, step: f64) -> Vec<Action> {
        if self.camera.step_zoom(step, &self.config.zoom) {
            vec![Action::RenderNeeded]
        } else {
            Vec::new()
        }
    }

    /// Restore the initial pan offset and zoom.
    pub fn reset_view(&mut self) -> Vec<Action> {
        self.camera.reset(self.config.initial_zoom());
        vec![Action::RenderNeeded]
    }

    // --- Removal ---

    /// Remove one item, releasing its resource and pruning its issues.
    pub fn remove_item(&mut self, id: &ItemId) -> Vec<Action> {
        let Some(item) = self.items.remove(id) else {
            debug!(item_id = %id, "remove of unknown item; ignoring");
            return Vec::new();
        };
        let before = self.selection.clone();
        let pruned = self.issues.remove_for_item(id);
        self.selection.prune(id, &pruned);
        info!(item_id = %id, pruned = pruned.len(), "item removed");

        let mut actions = vec![Action::ReleaseResource(item.resource), Action::ItemRemoved { id: *id }];
        push_selection_changes(&before, &self.selection, &mut actions);
        if !actions.contains(&Action::RenderNeeded) {
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    /// Remove every item.
    pub fn clear_canvas(&mut self) -> Vec<Action> {
        let mut actions = self.remove_all();
        if !actions.is_empty() {
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    fn remove_all(&mut self) -> Vec<Action> {
        if self.items.is_empty() {
            return Vec::new();
        }
        let before = self.selection.clone();
        let removed = self.items.clear();
        self.issues.clear();
        self.selection.reset();
        info!(count = removed.len(), "canvas cleared");

        let mut actions = Vec::new();
        for item in removed {
            actions.push(Action::ReleaseResource(item.resource));
            actions.push(Action::ItemRemoved { id: item.id });
        }
        push_selection_changes(&before, &self.selection, &mut actions);
        actions.retain(|action| *action != Action::RenderNeeded);
        actions
    }

    // --- Queries ---

    /// The current camera state.
    #[must_use]
    pub fn camera(&self) -> Camera {
        self.camera
    }

    /// Items in append order.
    #[must_use]
    pub fn items(&self) -> &[CanvasItem] {
        self.items.in_append_order()
    }

    /// Look up an item by id.
    #[must_use]
    pub fn item(&self, id: &ItemId) -> Option<&CanvasItem> {
        self.items.get(id)
    }

    /// Issues of one item in display order.
    #[must_use]
    pub fn issues_for(&self, id: &ItemId) -> Vec<&DesignIssue> {
        self.issues.for_item(id)
    }

    #[must_use]
    pub fn focused_item(&self) -> Option<ItemId> {
        self.selection.focused_item()
    }

    #[must_use]
    pub fn selected_issue(&self) -> Option<IssueId> {
        self.selection.selected_issue()
    }

    #[must_use]
    pub fn hovered_issue(&self) -> Option<IssueId> {
        self.selection.hovered_issue()
    }

    /// Snapshot for the presentation layer.
    #[must_use]
    pub fn scene(&self) -> Scene {
        Scene::project(&self.items, &self.issues, &self.selection, &self.camera)
    }

    /// Issues panel contents for the focused item.
    #[must_use]
    pub fn panel(&self) -> IssuePanel {
        IssuePanel::for_focus(&self.items, &self.issues, self.selection.focused_item())
    }
}

/// Report every selection field that differs, followed by a repaint.
fn push_selection_changes(before: &SelectionState, after: &SelectionState, actions: &mut Vec<Action>) {
    let mut changed = false;
    if before.focused_item() != after.focused_item() {
        actions.push(Action::FocusChanged(after.focused_item()));
        changed = true;
    }
    if before.selected_issue() != after.selected_issue() {
        actions.push(Action::IssueSelected(after.selected_issue()));
        changed = true;
    }
    if before.hovered_issue() != after.hovered_issue() {
        actions.push(Action::HoverChanged(after.hovered_issue()));
        changed = true;
    }
    if changed {
        actions.push(Action::RenderNeeded);
    }
}
