// hookpipe/src/core/stats.rs

//! Timing and outcome records for a pipeline run.

use chrono::{DateTime, Utc};
use std::time::{Duration, Instant};

/// Timing and outcome of a single hook invocation.
#[derive(Debug, Clone)]
pub struct HookStat {
  pub name: String,
  pub index: usize,
  pub start_time: DateTime<Utc>,
  pub end_time: DateTime<Utc>,
  /// Measured on a monotonic clock, independent of the wall-clock timestamps.
  pub duration: Duration,
  /// Rendered error (including its cause chain) if the hook failed.
  pub error: Option<String>,
}

impl HookStat {
  pub fn failed(&self) -> bool {
    self.error.is_some()
  }
}

/// Statistics for one `Pipeline::execute` call.
///
/// `hook_stats` only contains hooks that were actually invoked, in invocation
/// order. Hooks that were never reached because the run was aborted or had
/// already failed have no entry.
#[derive(Debug, Clone)]
pub struct ExecutionStats {
  pub pipeline_name: String,
  pub hook_stats: Vec<HookStat>,
  pub total_duration: Duration,
  pub start_time: Option<DateTime<Utc>>,
  pub end_time: Option<DateTime<Utc>>,
  pub success: bool,
  pub error: Option<String>,
  started_at: Option<Instant>,
}

impl ExecutionStats {
  pub fn new(pipeline_name: impl Into<String>) -> Self {
    Self {
      pipeline_name: pipeline_name.into(),
      hook_stats: Vec::new(),
      total_duration: Duration::ZERO,
      start_time: None,
      end_time: None,
      success: false,
      error: None,
      started_at: None,
    }
  }

  pub fn mark_start(&mut self) {
    self.start_time = Some(Utc::now());
    self.started_at = Some(Instant::now());
  }

  pub fn add_hook_stat(&mut self, stat: HookStat) {
    self.hook_stats.push(stat);
  }

  /// Closes the record. `error` is the run's terminal error, if any.
  pub fn mark_end(&mut self, error: Option<&dyn std::fmt::Display>) {
    self.end_time = Some(Utc::now());
    self.total_duration = self.started_at.map(|s| s.elapsed()).unwrap_or_default();
    self.success = error.is_none();
    self.error = error.map(|e| e.to_string());
  }

  pub fn hook_count(&self) -> usize {
    self.hook_stats.len()
  }

  /// Hooks that returned an error, including those whose failure was skipped.
  pub fn failed_hooks(&self) -> impl Iterator<Item = &HookStat> {
    self.hook_stats.iter().filter(|s| s.failed())
  }
}
