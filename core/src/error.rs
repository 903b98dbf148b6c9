// hookpipe/src/error.rs
use anyhow::Error as AnyhowError;
use std::time::Duration;
use thiserror::Error;

/// The terminal failure of a pipeline run.
///
/// Produced only by `Pipeline::execute` when a hook that is not marked
/// `skip_on_error` fails. The original hook error is kept as the `source`
/// and can be recovered with [`PipeError::cause`] or by downcasting.
#[derive(Debug, Error)]
#[error("{}", render_pipe_error(.pipeline_name, .hook_name, .hook_index, .source))]
pub struct PipeError {
  pub pipeline_name: String,
  pub hook_name: String,
  pub hook_index: usize,
  #[source]
  pub source: AnyhowError,
}

fn render_pipe_error(pipeline_name: &str, hook_name: &str, hook_index: &usize, source: &AnyhowError) -> String {
  if hook_name.is_empty() {
    format!(
      "pipeline '{}' failed at hook index {}: {:#}",
      pipeline_name, hook_index, source
    )
  } else {
    format!(
      "pipeline '{}' failed at hook '{}' (index {}): {:#}",
      pipeline_name, hook_name, hook_index, source
    )
  }
}

impl PipeError {
  pub(crate) fn new(pipeline_name: &str, hook_name: &str, hook_index: usize, source: AnyhowError) -> Self {
    Self {
      pipeline_name: pipeline_name.to_string(),
      hook_name: hook_name.to_string(),
      hook_index,
      source,
    }
  }

  /// The error returned by the failing hook.
  pub fn cause(&self) -> &AnyhowError {
    &self.source
  }

  /// Consumes the pipeline error and returns the hook's original error.
  pub fn into_cause(self) -> AnyhowError {
    self.source
  }

  /// Attempts to view the hook's original error as a concrete type.
  pub fn downcast_cause<E>(&self) -> Option<&E>
  where
    E: std::fmt::Display + std::fmt::Debug + Send + Sync + 'static,
  {
    self.source.downcast_ref::<E>()
  }
}

/// Failures manufactured by the built-in middleware.
///
/// These travel through the chain as ordinary `anyhow::Error`s, so callers
/// match on them with `err.downcast_ref::<HookError>()`.
#[derive(Debug, Error)]
pub enum HookError {
  #[error("hook timeout after {timeout:?}")]
  Timeout { timeout: Duration },

  #[error("failed after {retries} retries")]
  RetriesExhausted {
    retries: usize,
    #[source]
    source: AnyhowError,
  },

  #[error("panic recovered: {message}")]
  PanicRecovered { message: String },
}

pub type PipeResult<T, E = PipeError> = std::result::Result<T, E>;
