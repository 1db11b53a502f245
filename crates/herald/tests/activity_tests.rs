use herald::activity::{ActivityLog, RequestContext};
use herald::Level;
use tempfile::TempDir;

#[tokio::test]
async fn test_records_and_reads_back_in_order() {
  let dir = TempDir::new().unwrap();
  let log = ActivityLog::open_with_echo(dir.path().join("activity.jsonl"), false).unwrap();

  log.info("analysis", "first").await;
  log.warn("fanout", "second").await;
  log.success("analysis", "third").await;

  let entries = log.entries(None, None).await.unwrap();
  let messages: Vec<&str> = entries.iter().map(|e| e.message.as_str()).collect();
  assert_eq!(messages, vec!["first", "second", "third"]);
}

#[tokio::test]
async fn test_limit_keeps_most_recent() {
  let dir = TempDir::new().unwrap();
  let log = ActivityLog::open_with_echo(dir.path().join("activity.jsonl"), false).unwrap();

  for i in 0..5 {
    log.info("analysis", &format!("entry {i}")).await;
  }

  let entries = log.entries(Some(2), None).await.unwrap();
  assert_eq!(entries.len(), 2);
  assert_eq!(entries[0].message, "entry 3");
  assert_eq!(entries[1].message, "entry 4");
}

#[tokio::test]
async fn test_level_filter_and_context() {
  let dir = TempDir::new().unwrap();
  let log = ActivityLog::open_with_echo(dir.path().join("nested/activity.jsonl"), false).unwrap();

  let context = RequestContext {
    request_id: Some("abc".to_string()),
    method: Some("GET".to_string()),
    path: Some("/status".to_string()),
    status_code: Some(200),
    duration_ms: Some(1.5),
  };

  log.info("http", "request").await;
  log.record(Level::Error, "http", "failed", Some(context.clone())).await;

  let errors = log.entries(None, Some(Level::Error)).await.unwrap();
  assert_eq!(errors.len(), 1);
  assert_eq!(errors[0].context.as_ref(), Some(&context));
}

#[tokio::test]
async fn test_malformed_lines_are_skipped() {
  let dir = TempDir::new().unwrap();
  let path = dir.path().join("activity.jsonl");
  std::fs::write(&path, "not json\n\n").unwrap();

  let log = ActivityLog::open_with_echo(&path, false).unwrap();
  log.info("analysis", "valid").await;

  let entries = log.entries(None, None).await.unwrap();
  assert_eq!(entries.len(), 1);
  assert_eq!(log.path().await, path);
}
