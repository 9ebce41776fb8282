use review_canvas::issues::DesignIssue;

use super::*;
use crate::services::annotation::MockAnnotator;

// =============================================================
// Helpers
// =============================================================

const LATENCY: Duration = Duration::from_millis(2500);
const SETTLE: Duration = Duration::from_secs(10);

fn board_session() -> Session<MockAnnotator> {
    Session::new(CanvasConfig::board(), Arc::new(MockAnnotator::new(LATENCY)), SETTLE)
}

fn png(name: &str) -> FileSpec {
    FileSpec::new(name, "image/png")
}

fn key(name: &str) -> ScriptStep {
    ScriptStep::Key { key: name.into(), modifiers: Modifiers::default() }
}

/// Annotator that never answers.
struct Silent;

impl Annotator for Silent {
    async fn annotate(&self, _item_id: ItemId) -> Vec<DesignIssue> {
        std::future::pending::<()>().await;
        Vec::new()
    }
}

// =============================================================
// Script parsing
// =============================================================

#[test]
fn parse_script_reads_tagged_steps() {
    let steps = parse_script(
        r#"[
            {"op": "drop", "files": [{"name": "a.png", "mime": "image/png"}]},
            {"op": "pointer_down", "x": 200, "y": 150},
            {"op": "wheel", "dy": -100, "modifiers": {"ctrl": true}},
            {"op": "key", "key": "j"},
            {"op": "focus"},
            {"op": "wait", "ms": 10},
            {"op": "settle"}
        ]"#,
    )
    .unwrap();
    assert_eq!(steps.len(), 7);
    assert_eq!(
        steps[1],
        ScriptStep::PointerDown { x: 200.0, y: 150.0, button: Button::Primary, modifiers: Modifiers::default() }
    );
    assert_eq!(
        steps[2],
        ScriptStep::Wheel { dx: 0.0, dy: -100.0, modifiers: Modifiers { ctrl: true, ..Modifiers::default() } }
    );
    assert_eq!(steps[4], ScriptStep::Focus { item: None });
}

#[test]
fn parse_script_rejects_unknown_op() {
    let err = parse_script(r#"[{"op": "teleport"}]"#).unwrap_err();
    assert!(matches!(err, HostError::ScriptParse(_)));
}

#[tokio::test]
async fn load_script_reports_missing_file() {
    let err = load_script(Path::new("/definitely/not/here.json")).await.unwrap_err();
    assert!(matches!(err, HostError::ScriptRead { .. }));
}

// =============================================================
// Running sessions
// =============================================================

#[tokio::test(start_paused = true)]
async fn drop_then_settle_applies_every_scan() {
    let report = board_session()
        .run(vec![ScriptStep::Drop {
            files: vec![png("a.png"), FileSpec::new("b.pdf", "application/pdf"), png("c.png")],
        }])
        .await;

    assert!(report.settled);
    assert_eq!(report.items.len(), 2);
    assert!(report.items.iter().all(|item| !item.processing));
    assert_eq!(report.issue_count, 8);
    assert_eq!(report.stats.scans_requested, 2);
    assert_eq!(report.stats.scans_applied, 2);
    assert_eq!(report.stats.files_rejected, 1);
    assert_eq!(report.live_handles, 2);
}

#[tokio::test(start_paused = true)]
async fn wait_shorter_than_latency_leaves_item_scanning() {
    let mut session = board_session();
    session.step(ScriptStep::AddFiles { files: vec![png("a.png")] }).await;
    session.step(ScriptStep::Focus { item: Some(0) }).await;
    session.step(ScriptStep::Wait { ms: 1000 }).await;
    assert_eq!(session.core.panel().header(), "Analyzing...");

    session.step(ScriptStep::Wait { ms: 2000 }).await;
    assert_eq!(session.core.panel().header(), "4 issues detected");
}

#[tokio::test(start_paused = true)]
async fn keyboard_walks_issues_after_scan() {
    let report = board_session()
        .run(vec![
            ScriptStep::AddFiles { files: vec![png("a.png")] },
            ScriptStep::Focus { item: Some(0) },
            ScriptStep::Settle,
            key("j"),
            key("j"),
        ])
        .await;
    let item = report.items[0].id;
    let ids: Vec<IssueId> =
        report.scene.overlays.iter().filter(|view| view.item_id == item).map(|view| view.id).collect();
    assert_eq!(ids.len(), 4);
    assert_eq!(report.selected_issue, Some(ids[1]));
}

#[tokio::test(start_paused = true)]
async fn removal_before_scan_finishes_is_tolerated() {
    let report = board_session()
        .run(vec![
            ScriptStep::AddFiles { files: vec![png("a.png"), png("b.png")] },
            ScriptStep::Remove { item: 0 },
        ])
        .await;

    assert!(report.settled);
    assert_eq!(report.items.len(), 1);
    assert_eq!(report.issue_count, 4);
    assert_eq!(report.stats.scans_applied, 1);
    assert_eq!(report.stats.scans_ignored, 1);
    assert_eq!(report.stats.handles_released, 1);
    assert_eq!(report.live_handles, 1);
}

#[tokio::test(start_paused = true)]
async fn single_image_keeps_one_handle() {
    let mut session = Session::new(CanvasConfig::single_image(), Arc::new(MockAnnotator::new(LATENCY)), SETTLE);
    for name in ["v1.png", "v2.png", "v3.png"] {
        session.step(ScriptStep::AddFiles { files: vec![png(name)] }).await;
    }
    let report = session.run(Vec::new()).await;
    assert_eq!(report.items.len(), 1);
    assert_eq!(report.live_handles, 1);
    assert_eq!(report.stats.handles_released, 2);
    assert_eq!(report.issue_count, 4);
}

#[tokio::test(start_paused = true)]
async fn clear_releases_everything() {
    let report = board_session()
        .run(vec![ScriptStep::AddFiles { files: vec![png("a.png"), png("b.png")] }, ScriptStep::Settle, ScriptStep::Clear])
        .await;
    assert!(report.items.is_empty());
    assert_eq!(report.live_handles, 0);
    assert_eq!(report.panel, "No image selected");
}

#[tokio::test(start_paused = true)]
async fn settle_times_out_on_silent_annotator() {
    let session = Session::new(CanvasConfig::board(), Arc::new(Silent), Duration::from_millis(50));
    let report = session.run(vec![ScriptStep::AddFiles { files: vec![png("a.png")] }]).await;
    assert!(!report.settled);
    assert!(report.items[0].processing);
    assert_eq!(report.issue_count, 0);
}

#[tokio::test(start_paused = true)]
async fn missing_item_index_is_skipped() {
    let report = board_session().run(vec![ScriptStep::Remove { item: 3 }, ScriptStep::Focus { item: Some(1) }]).await;
    assert!(report.items.is_empty());
    assert_eq!(report.stats.steps, 2);
}

#[tokio::test(start_paused = true)]
async fn demo_script_runs_clean() {
    let report = board_session().run(demo_script()).await;
    assert!(report.settled);
    assert_eq!(report.items.len(), 2);
    assert_eq!(report.stats.files_rejected, 1);
    assert_eq!(report.focused_item, Some(report.items[0].id));
    assert!(report.selected_issue.is_some());
    assert_eq!(report.live_handles, report.items.len());
}

#[tokio::test(start_paused = true)]
async fn report_serializes() {
    let report = board_session().run(vec![ScriptStep::AddFiles { files: vec![png("a.png")] }]).await;
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["variant"], "board");
    assert_eq!(json["items"][0]["kind"], "image");
}
