// hookpipe/src/middleware/timeout.rs

//! Bounds the wall-clock time of the wrapped handler.
//!
//! The handler runs on its own tokio task while the calling task races it
//! against a timer. When the timer wins, the worker task is aborted: it is
//! cancelled at its next `.await`, so it can no longer touch the run's
//! scratch space or result once the pipeline has moved on. Synchronous code
//! between two suspension points still runs to completion.
//!
//! Requires a tokio runtime.

use crate::core::context::Context;
use crate::core::hook::{hook_fn, HookHandler};
use crate::core::middleware::{middleware_fn, Middleware};
use crate::error::HookError;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{event, Level};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

struct AbortOnDrop<T>(JoinHandle<T>);

impl<T> Drop for AbortOnDrop<T> {
  fn drop(&mut self) {
    self.0.abort();
  }
}

/// Fails the hook with [`HookError::Timeout`] if it does not finish within `timeout`.
pub fn timeout<C, O, P, R>(timeout: Duration) -> Middleware<C, O, P, R>
where
  C: Context + Clone,
  O: Send + Sync + 'static,
  P: Send + Sync + 'static,
  R: Send + Sync + 'static,
{
  middleware_fn(move |next| bounded(next, timeout))
}

/// [`timeout`] with [`DEFAULT_TIMEOUT`].
pub fn timeout_default<C, O, P, R>() -> Middleware<C, O, P, R>
where
  C: Context + Clone,
  O: Send + Sync + 'static,
  P: Send + Sync + 'static,
  R: Send + Sync + 'static,
{
  timeout(DEFAULT_TIMEOUT)
}

pub(crate) fn bounded<C, O, P, R>(next: HookHandler<C, O, P, R>, timeout: Duration) -> HookHandler<C, O, P, R>
where
  C: Context + Clone,
  O: Send + Sync + 'static,
  P: Send + Sync + 'static,
  R: Send + Sync + 'static,
{
  hook_fn(move |ctx, pipe_ctx| {
    let next = next.clone();
    async move {
      let mut worker = AbortOnDrop(tokio::spawn(async move { next(ctx, pipe_ctx).await }));
      tokio::select! {
        joined = &mut worker.0 => match joined {
          Ok(res) => res,
          // Re-raised here so a recovery layer outside this one still sees it.
          Err(join_err) if join_err.is_panic() => std::panic::resume_unwind(join_err.into_panic()),
          Err(join_err) => Err(anyhow::Error::new(join_err)),
        },
        _ = tokio::time::sleep(timeout) => {
          event!(Level::WARN, ?timeout, "Hook exceeded its timeout; aborting worker.");
          Err(HookError::Timeout { timeout }.into())
        }
      }
    }
  })
}
