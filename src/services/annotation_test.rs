use super::*;

#[test]
fn canned_issues_belong_to_item() {
    let item = Uuid::new_v4();
    let issues = canned_issues(item);
    assert_eq!(issues.len(), 4);
    assert!(issues.iter().all(|issue| issue.item_id == item));
}

#[test]
fn canned_issues_cover_every_category_once() {
    let issues = canned_issues(Uuid::new_v4());
    for category in [IssueCategory::Spacing, IssueCategory::Contrast, IssueCategory::Brand, IssueCategory::Alignment] {
        assert_eq!(issues.iter().filter(|issue| issue.category == category).count(), 1, "{category:?}");
    }
    assert_eq!(issues.iter().filter(|issue| issue.severity == Severity::High).count(), 2);
}

#[test]
fn canned_issue_ids_are_fresh() {
    let item = Uuid::new_v4();
    let first = canned_issues(item);
    let second = canned_issues(item);
    assert!(first.iter().zip(&second).all(|(a, b)| a.id != b.id));
}

#[tokio::test(start_paused = true)]
async fn mock_waits_for_latency() {
    let annotator = MockAnnotator::new(Duration::from_millis(2500));
    let start = tokio::time::Instant::now();
    let issues = annotator.annotate(Uuid::new_v4()).await;
    assert_eq!(issues.len(), 4);
    assert!(start.elapsed() >= Duration::from_millis(2500));
}

#[tokio::test(start_paused = true)]
async fn request_scan_delivers_result() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let item = Uuid::new_v4();
    let handle = request_scan(Arc::new(MockAnnotator::new(Duration::from_millis(100))), item, tx);

    let done = rx.recv().await.unwrap();
    assert_eq!(done.item_id, item);
    assert_eq!(done.issues.len(), 4);
    handle.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn request_scan_tolerates_closed_channel() {
    let (tx, rx) = mpsc::unbounded_channel();
    drop(rx);
    let handle = request_scan(Arc::new(MockAnnotator::new(Duration::from_millis(1))), Uuid::new_v4(), tx);
    handle.await.unwrap();
}
