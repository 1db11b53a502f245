//! Herald - console logging for the dossier tools
//!
//! - Leveled logging (`info`, `warn`, `error`, `debug`, `success`, `verbose`)
//! - Multi-line messages keep their prefix on every line
//! - Everything goes to stderr so stdout stays clean for JSON and HTML output
//! - `activity` (feature `activity`): an append-only JSONL log the server
//!   exposes over `/logs`

use colored::*;
use serde::{Deserialize, Serialize};

#[cfg(feature = "activity")]
pub mod activity;

/// Severity of a log line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
  Verbose,
  Debug,
  Info,
  Success,
  Warn,
  Error,
}

impl Level {
  /// Short tag printed inside the prefix brackets
  pub fn tag(&self) -> &'static str {
    match self {
      Level::Verbose => "verb",
      Level::Debug => "debug",
      Level::Info => "info",
      Level::Success => "sccs",
      Level::Warn => "warn",
      Level::Error => "error",
    }
  }

  fn color(&self) -> Color {
    match self {
      Level::Verbose => Color::Cyan,
      Level::Debug => Color::Magenta,
      Level::Info => Color::Blue,
      Level::Success => Color::Green,
      Level::Warn => Color::Yellow,
      Level::Error => Color::Red,
    }
  }

  /// Parse a level name as used in query strings (`info`, `warn`, ...)
  pub fn parse(name: &str) -> Option<Self> {
    match name.to_ascii_lowercase().as_str() {
      "verbose" | "verb" => Some(Level::Verbose),
      "debug" => Some(Level::Debug),
      "info" => Some(Level::Info),
      "success" | "sccs" => Some(Level::Success),
      "warn" | "warning" => Some(Level::Warn),
      "error" => Some(Level::Error),
      _ => None,
    }
  }
}

/// Write every line of `message` to stderr
pub fn log(message: &str) {
  for line in message.lines() {
    eprintln!("{line}");
  }
}

/// Format the bracketed, padded prefix for a level
pub fn prefix(level: Level) -> String {
  let tag = level.tag();
  let pad = 7usize.saturating_sub(tag.len() + 2);
  format!("[{}]{:<pad$}", tag.color(level.color()).bold(), "", pad = pad)
}

/// Log `message` at `level`, prefixing each line
pub fn emit(level: Level, message: &str) {
  let prefix = prefix(level);
  for line in message.lines() {
    log(&format!("{prefix} {line}"));
  }
}

pub fn verbose(message: &str) {
  emit(Level::Verbose, message);
}

/// General information
pub fn info(message: &str) {
  emit(Level::Info, message);
}

/// Something needs attention but the flow continues
pub fn warn(message: &str) {
  emit(Level::Warn, message);
}

/// Something failed
pub fn error(message: &str) {
  emit(Level::Error, message);
}

/// Diagnostic detail
pub fn debug(message: &str) {
  emit(Level::Debug, message);
}

/// Something completed
pub fn success(message: &str) {
  emit(Level::Success, message);
}

/// Print `message` between two rules of `width` characters
pub fn banner(message: &str, width: usize, border: char) {
  let rule = border.to_string().repeat(width);
  log(&rule.blue().bold().to_string());
  log(&message.blue().bold().to_string());
  log(&rule.blue().bold().to_string());
}

#[macro_export]
macro_rules! info {
  ($msg:expr) => {
    $crate::info($msg)
  };
}

#[macro_export]
macro_rules! warn {
  ($msg:expr) => {
    $crate::warn($msg)
  };
}

#[macro_export]
macro_rules! error {
  ($msg:expr) => {
    $crate::error($msg)
  };
}

#[macro_export]
macro_rules! debug {
  ($msg:expr) => {
    $crate::debug($msg)
  };
}

#[macro_export]
macro_rules! success {
  ($msg:expr) => {
    $crate::success($msg)
  };
}

#[macro_export]
macro_rules! verbose {
  ($msg:expr) => {
    $crate::verbose($msg)
  };
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn level_parse_accepts_tags_and_names() {
    assert_eq!(Level::parse("warning"), Some(Level::Warn));
    assert_eq!(Level::parse("sccs"), Some(Level::Success));
    assert_eq!(Level::parse("INFO"), Some(Level::Info));
    assert_eq!(Level::parse("all"), None);
  }

  #[test]
  fn prefix_contains_tag() {
    colored::control::set_override(false);
    assert_eq!(prefix(Level::Info), "[info] ");
    assert_eq!(prefix(Level::Error), "[error]");
  }

  #[test]
  fn level_serializes_lowercase() {
    let json = serde_json::to_string(&Level::Success).unwrap();
    assert_eq!(json, "\"success\"");
  }
}
