//! Scripted review session.
//!
//! DESIGN
//! ======
//! A session replays a list of input steps against one `EngineCore`. All
//! engine mutations happen on the session's own task: scan results arrive on
//! an mpsc channel and are applied between steps, during `wait` steps, and
//! while settling at the end. Settling waits for every outstanding scan up to
//! a timeout; scans still running after that are aborted and reported.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use review_canvas::camera::{Camera, Point};
use review_canvas::config::{CanvasConfig, CanvasVariant};
use review_canvas::doc::{CanvasItem, ItemId};
use review_canvas::engine::{Action, EngineCore};
use review_canvas::input::{Button, Key, Modifiers, WheelDelta};
use review_canvas::issues::IssueId;
use review_canvas::scene::Scene;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::HostError;
use crate::services::annotation::{Annotator, ScanCompleted, request_scan};
use crate::services::media::{FileSpec, MemoryMedia};

fn primary() -> Button {
    Button::Primary
}

/// One scripted input. Coordinates are screen pixels relative to the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ScriptStep {
    /// Drag files in and drop them.
    Drop { files: Vec<FileSpec> },
    /// Pick files through the file chooser.
    AddFiles { files: Vec<FileSpec> },
    DragEnter,
    DragLeave,
    PointerDown {
        x: f64,
        y: f64,
        #[serde(default = "primary")]
        button: Button,
        #[serde(default)]
        modifiers: Modifiers,
    },
    PointerMove {
        x: f64,
        y: f64,
        #[serde(default)]
        modifiers: Modifiers,
    },
    PointerUp {
        x: f64,
        y: f64,
        #[serde(default = "primary")]
        button: Button,
    },
    PointerLeave,
    Wheel {
        #[serde(default)]
        dx: f64,
        #[serde(default)]
        dy: f64,
        #[serde(default)]
        modifiers: Modifiers,
    },
    Key {
        key: String,
        #[serde(default)]
        modifiers: Modifiers,
    },
    ZoomIn,
    ZoomOut,
    ResetView,
    /// Focus the item at this append index, or nothing.
    Focus { item: Option<usize> },
    /// Remove the item at this append index.
    Remove { item: usize },
    Clear,
    /// Let time pass, applying scan results as they arrive.
    Wait { ms: u64 },
    /// Block until every outstanding scan has been applied.
    Settle,
}

/// Counters collected while a session runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    pub steps: usize,
    pub scans_requested: usize,
    pub scans_applied: usize,
    /// Results for items that were gone or already processed.
    pub scans_ignored: usize,
    pub files_rejected: usize,
    pub handles_released: usize,
}

/// Final state of a session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    pub variant: CanvasVariant,
    /// Every scan finished before the settle timeout.
    pub settled: bool,
    pub items: Vec<CanvasItem>,
    pub issue_count: usize,
    pub focused_item: Option<ItemId>,
    pub selected_issue: Option<IssueId>,
    pub panel: String,
    pub camera: Camera,
    pub live_handles: usize,
    pub stats: SessionStats,
    pub scene: Scene,
}

pub struct Session<A: Annotator> {
    core: EngineCore,
    media: MemoryMedia,
    annotator: Arc<A>,
    tx: mpsc::UnboundedSender<ScanCompleted>,
    rx: mpsc::UnboundedReceiver<ScanCompleted>,
    pending: HashSet<ItemId>,
    scans: Vec<JoinHandle<()>>,
    settle_timeout: Duration,
    stats: SessionStats,
}

impl<A: Annotator> Session<A> {
    #[must_use]
    pub fn new(config: CanvasConfig, annotator: Arc<A>, settle_timeout: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            core: EngineCore::new(config),
            media: MemoryMedia::new(),
            annotator,
            tx,
            rx,
            pending: HashSet::new(),
            scans: Vec::new(),
            settle_timeout,
            stats: SessionStats::default(),
        }
    }

    /// Replay `steps`, settle, and report.
    pub async fn run(mut self, steps: Vec<ScriptStep>) -> SessionReport {
        info!(steps = steps.len(), variant = ?self.core.config.variant, "session started");
        for step in steps {
            self.step(step).await;
        }
        let settled = self.settle().await;
        for scan in self.scans.drain(..) {
            if !scan.is_finished() {
                scan.abort();
            }
        }
        let report = self.report(settled);
        info!(
            items = report.items.len(),
            issues = report.issue_count,
            live_handles = report.live_handles,
            settled,
            "session finished"
        );
        report
    }

    async fn step(&mut self, step: ScriptStep) {
        self.stats.steps += 1;
        debug!(?step, "step");
        let actions = match step {
            ScriptStep::Drop { files } => {
                let mut actions = self.core.on_drag_enter(!files.is_empty());
                actions.extend(self.core.on_drop(&files, &mut self.media));
                actions
            }
            ScriptStep::AddFiles { files } => self.core.add_files(&files, &mut self.media),
            ScriptStep::DragEnter => self.core.on_drag_enter(true),
            ScriptStep::DragLeave => self.core.on_drag_leave(),
            ScriptStep::PointerDown { x, y, button, modifiers } => {
                self.core.on_pointer_down(Point::new(x, y), button, modifiers)
            }
            ScriptStep::PointerMove { x, y, modifiers } => self.core.on_pointer_move(Point::new(x, y), modifiers),
            ScriptStep::PointerUp { x, y, button } => self.core.on_pointer_up(Point::new(x, y), button),
            ScriptStep::PointerLeave => self.core.on_pointer_leave(),
            ScriptStep::Wheel { dx, dy, modifiers } => self.core.on_wheel(WheelDelta { dx, dy }, modifiers),
            ScriptStep::Key { key, modifiers } => self.core.on_key_down(&Key(key), modifiers),
            ScriptStep::ZoomIn => self.core.zoom_in(),
            ScriptStep::ZoomOut => self.core.zoom_out(),
            ScriptStep::ResetView => self.core.reset_view(),
            ScriptStep::Focus { item: None } => self.core.focus_item(None),
            ScriptStep::Focus { item: Some(index) } => match self.item_at_index(index) {
                Some(id) => self.core.focus_item(Some(id)),
                None => Vec::new(),
            },
            ScriptStep::Remove { item } => match self.item_at_index(item) {
                Some(id) => self.core.remove_item(&id),
                None => Vec::new(),
            },
            ScriptStep::Clear => self.core.clear_canvas(),
            ScriptStep::Wait { ms } => {
                self.wait(Duration::from_millis(ms)).await;
                Vec::new()
            }
            ScriptStep::Settle => {
                self.settle().await;
                Vec::new()
            }
        };
        self.handle(actions);
    }

    fn item_at_index(&self, index: usize) -> Option<ItemId> {
        let id = self.core.items().get(index).map(|item| item.id);
        if id.is_none() {
            warn!(index, count = self.core.items().len(), "script refers to a missing item");
        }
        id
    }

    /// Apply host-side effects of engine actions.
    fn handle(&mut self, actions: Vec<Action>) {
        for action in actions {
            match action {
                Action::ScanRequested { item_id } => {
                    self.pending.insert(item_id);
                    self.stats.scans_requested += 1;
                    self.scans.push(request_scan(Arc::clone(&self.annotator), item_id, self.tx.clone()));
                }
                Action::ReleaseResource(resource) => {
                    if self.media.release(&resource) {
                        self.stats.handles_released += 1;
                    }
                }
                Action::FileRejected { name, reason } => {
                    info!(%name, %reason, "file rejected");
                    self.stats.files_rejected += 1;
                }
                Action::ItemCreated(item) => {
                    info!(item_id = %item.id, x = item.x, y = item.y, "item created");
                }
                other => debug!(action = ?other, "action"),
            }
        }
    }

    fn apply_scan(&mut self, done: ScanCompleted) {
        self.pending.remove(&done.item_id);
        let actions = self.core.complete_scan(done.item_id, done.issues);
        if actions.is_empty() {
            self.stats.scans_ignored += 1;
        } else {
            self.stats.scans_applied += 1;
        }
        self.handle(actions);
    }

    async fn wait(&mut self, duration: Duration) {
        let sleep = tokio::time::sleep(duration);
        tokio::pin!(sleep);
        loop {
            let next = tokio::select! {
                () = &mut sleep => None,
                done = self.rx.recv() => done,
            };
            match next {
                Some(done) => self.apply_scan(done),
                None => return,
            }
        }
    }

    /// Wait for outstanding scans. Returns `false` on timeout.
    async fn settle(&mut self) -> bool {
        let deadline = tokio::time::sleep(self.settle_timeout);
        tokio::pin!(deadline);
        while !self.pending.is_empty() {
            let next = tokio::select! {
                () = &mut deadline => None,
                done = self.rx.recv() => done,
            };
            match next {
                Some(done) => self.apply_scan(done),
                None => {
                    warn!(pending = self.pending.len(), "settle timed out");
                    return false;
                }
            }
        }
        true
    }

    fn report(&self, settled: bool) -> SessionReport {
        SessionReport {
            variant: self.core.config.variant,
            settled,
            items: self.core.items().to_vec(),
            issue_count: self.core.issues.len(),
            focused_item: self.core.focused_item(),
            selected_issue: self.core.selected_issue(),
            panel: self.core.panel().header(),
            camera: self.core.camera(),
            live_handles: self.media.live_count(),
            stats: self.stats,
            scene: self.core.scene(),
        }
    }
}

/// Read a JSON script (an array of steps) from disk.
pub async fn load_script(path: &Path) -> Result<Vec<ScriptStep>, HostError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| HostError::ScriptRead { path: path.to_path_buf(), source })?;
    parse_script(&raw)
}

pub fn parse_script(raw: &str) -> Result<Vec<ScriptStep>, HostError> {
    serde_json::from_str(raw).map_err(HostError::ScriptParse)
}

/// Built-in walkthrough: two screenshots and a stray PDF, a scan, issue
/// navigation, zoom and a pan.
#[must_use]
pub fn demo_script() -> Vec<ScriptStep> {
    vec![
        ScriptStep::Drop {
            files: vec![
                FileSpec::new("landing.png", "image/png"),
                FileSpec::new("brief.pdf", "application/pdf"),
                FileSpec::new("checkout.png", "image/png"),
            ],
        },
        ScriptStep::PointerDown { x: 200.0, y: 200.0, button: Button::Primary, modifiers: Modifiers::default() },
        ScriptStep::Settle,
        ScriptStep::Key { key: "j".into(), modifiers: Modifiers::default() },
        ScriptStep::Key { key: "j".into(), modifiers: Modifiers::default() },
        ScriptStep::Key { key: "k".into(), modifiers: Modifiers::default() },
        ScriptStep::Wheel { dx: 0.0, dy: -200.0, modifiers: Modifiers { ctrl: true, ..Modifiers::default() } },
        ScriptStep::PointerDown { x: 20.0, y: 20.0, button: Button::Primary, modifiers: Modifiers::default() },
        ScriptStep::PointerMove { x: 80.0, y: 50.0, modifiers: Modifiers::default() },
        ScriptStep::PointerUp { x: 80.0, y: 50.0, button: Button::Primary },
        ScriptStep::Focus { item: Some(0) },
        ScriptStep::Key { key: "ArrowLeft".into(), modifiers: Modifiers::default() },
    ]
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
