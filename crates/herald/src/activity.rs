//! Append-only activity log
//!
//! Entries are stored one JSON object per line. The log is shared between
//! request handlers and background analysis tasks, so all file access goes
//! through a tokio mutex.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::Level;

/// HTTP request details attached to an entry
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RequestContext {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub request_id: Option<String>,

  #[serde(skip_serializing_if = "Option::is_none")]
  pub method: Option<String>,

  #[serde(skip_serializing_if = "Option::is_none")]
  pub path: Option<String>,

  #[serde(skip_serializing_if = "Option::is_none")]
  pub status_code: Option<u16>,

  #[serde(skip_serializing_if = "Option::is_none")]
  pub duration_ms: Option<f64>,
}

/// One line of the activity log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityEntry {
  pub timestamp: DateTime<Utc>,
  pub level: Level,
  pub component: String,
  pub message: String,

  #[serde(skip_serializing_if = "Option::is_none")]
  pub context: Option<RequestContext>,
}

struct Inner {
  path: PathBuf,
  echo: bool,
}

/// Thread-safe JSONL activity log
#[derive(Clone)]
pub struct ActivityLog {
  inner: Arc<Mutex<Inner>>,
}

impl Inner {
  fn append(&self, entry: &ActivityEntry) -> std::io::Result<()> {
    let line = serde_json::to_string(entry)
      .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

    let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
    writeln!(file, "{line}")?;
    file.flush()
  }

  fn read(&self, limit: Option<usize>, level: Option<Level>) -> std::io::Result<Vec<ActivityEntry>> {
    if !self.path.exists() {
      return Ok(Vec::new());
    }

    let reader = BufReader::new(File::open(&self.path)?);
    let mut entries = Vec::new();

    for line in reader.lines() {
      let line = line?;
      if line.trim().is_empty() {
        continue;
      }

      // Skip lines that are not ours (partial writes, manual edits)
      let Ok(entry) = serde_json::from_str::<ActivityEntry>(&line) else {
        continue;
      };

      if level.is_none_or(|wanted| entry.level == wanted) {
        entries.push(entry);
      }
    }

    // Keep the most recent `limit`, oldest first
    if let Some(limit) = limit {
      let skip = entries.len().saturating_sub(limit);
      entries.drain(..skip);
    }

    Ok(entries)
  }
}

impl ActivityLog {
  /// Open (or create) the log at `path`, echoing entries to stderr
  pub fn open<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
    Self::open_with_echo(path, true)
  }

  /// Open (or create) the log at `path`; `echo` controls the stderr copy
  pub fn open_with_echo<P: AsRef<Path>>(path: P, echo: bool) -> std::io::Result<Self> {
    let path = path.as_ref().to_path_buf();

    if let Some(parent) = path.parent() {
      if !parent.as_os_str().is_empty() {
        std::fs::create_dir_all(parent)?;
      }
    }

    if !path.exists() {
      File::create(&path)?;
    }

    Ok(Self { inner: Arc::new(Mutex::new(Inner { path, echo })) })
  }

  /// Append an entry; write failures are reported on stderr and otherwise ignored
  pub async fn record(
    &self,
    level: Level,
    component: &str,
    message: &str,
    context: Option<RequestContext>,
  ) {
    let entry = ActivityEntry {
      timestamp: Utc::now(),
      level,
      component: component.to_string(),
      message: message.to_string(),
      context,
    };

    let guard = self.inner.lock().await;
    if let Err(e) = guard.append(&entry) {
      crate::warn(&format!("activity log write failed: {e}"));
    }

    if guard.echo {
      crate::emit(level, &format!("{component}: {message}"));
    }
  }

  pub async fn info(&self, component: &str, message: &str) {
    self.record(Level::Info, component, message, None).await;
  }

  pub async fn success(&self, component: &str, message: &str) {
    self.record(Level::Success, component, message, None).await;
  }

  pub async fn warn(&self, component: &str, message: &str) {
    self.record(Level::Warn, component, message, None).await;
  }

  pub async fn error(&self, component: &str, message: &str) {
    self.record(Level::Error, component, message, None).await;
  }

  /// Read back up to `limit` most recent entries, optionally of one level
  pub async fn entries(
    &self,
    limit: Option<usize>,
    level: Option<Level>,
  ) -> std::io::Result<Vec<ActivityEntry>> {
    let guard = self.inner.lock().await;
    guard.read(limit, level)
  }

  /// Location of the backing file
  pub async fn path(&self) -> PathBuf {
    self.inner.lock().await.path.clone()
  }
}
