//! Annotation service: produces design issues for a freshly placed item.
//!
//! DESIGN
//! ======
//! The canvas asks for a scan through `Action::ScanRequested`. The host
//! spawns one task per request; the task awaits the annotator and sends the
//! result back over a channel. The session loop applies results on its own
//! flow, so the engine is never touched from the task. There is no
//! cancellation: a result for an item removed in the meantime is simply
//! ignored by the engine.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use review_canvas::doc::ItemId;
use review_canvas::issues::{DesignIssue, IssueBox, IssueCategory, Severity};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};
use uuid::Uuid;

/// A finished scan, delivered back to the session loop.
#[derive(Debug, Clone)]
pub struct ScanCompleted {
    pub item_id: ItemId,
    pub issues: Vec<DesignIssue>,
}

/// Something that can review an item and report issues.
pub trait Annotator: Send + Sync + 'static {
    fn annotate(&self, item_id: ItemId) -> impl Future<Output = Vec<DesignIssue>> + Send;
}

/// Canned reviewer with a fixed latency.
#[derive(Debug, Clone, Copy)]
pub struct MockAnnotator {
    latency: Duration,
}

impl MockAnnotator {
    #[must_use]
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

impl Annotator for MockAnnotator {
    async fn annotate(&self, item_id: ItemId) -> Vec<DesignIssue> {
        tokio::time::sleep(self.latency).await;
        canned_issues(item_id)
    }
}

/// The four issues the mock reviewer reports for every item.
#[must_use]
pub fn canned_issues(item_id: ItemId) -> Vec<DesignIssue> {
    let issue = |category, severity, message: &str, bounds| DesignIssue {
        id: Uuid::new_v4(),
        item_id,
        category,
        severity,
        message: message.to_string(),
        bounds,
    };
    vec![
        issue(
            IssueCategory::Spacing,
            Severity::Low,
            "Inconsistent padding. Expected 24px, found 20px.",
            IssueBox::new(15.0, 15.0, 20.0, 10.0),
        ),
        issue(
            IssueCategory::Contrast,
            Severity::High,
            "Text contrast ratio is 3.5:1. WCAG AA requires 4.5:1.",
            IssueBox::new(45.0, 35.0, 30.0, 8.0),
        ),
        issue(
            IssueCategory::Alignment,
            Severity::Low,
            "Button is not aligned to the grid column.",
            IssueBox::new(70.0, 80.0, 15.0, 10.0),
        ),
        issue(
            IssueCategory::Brand,
            Severity::High,
            "Primary color hex #6D28D9 deviates from brand guidelines.",
            IssueBox::new(40.0, 60.0, 20.0, 15.0),
        ),
    ]
}

/// Spawn a scan for `item_id`. The result arrives on `tx`.
pub fn request_scan<A: Annotator>(
    annotator: Arc<A>,
    item_id: ItemId,
    tx: mpsc::UnboundedSender<ScanCompleted>,
) -> JoinHandle<()> {
    info!(%item_id, "scan requested");
    tokio::spawn(async move {
        let issues = annotator.annotate(item_id).await;
        if tx.send(ScanCompleted { item_id, issues }).is_err() {
            debug!(%item_id, "session gone; scan result dropped");
        }
    })
}

#[cfg(test)]
#[path = "annotation_test.rs"]
mod tests;
