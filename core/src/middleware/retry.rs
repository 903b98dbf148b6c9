// hookpipe/src/middleware/retry.rs

use crate::core::context::Context;
use crate::core::hook::hook_fn;
use crate::core::middleware::{middleware_fn, Middleware};
use crate::error::HookError;
use std::time::Duration;
use tracing::{event, Level};

pub const DEFAULT_MAX_RETRIES: usize = 3;
pub const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_millis(100);

/// Re-invokes a failing handler up to `max_retries` more times.
///
/// Attempts run one after another on the calling task. Before retry `n`
/// (1-based) the middleware sleeps `backoff * n`. When every attempt fails
/// the hook fails with [`HookError::RetriesExhausted`] wrapping the last error.
pub fn retry<C, O, P, R>(max_retries: usize, backoff: Duration) -> Middleware<C, O, P, R>
where
  C: Context + Clone,
  O: Send + Sync + 'static,
  P: Send + Sync + 'static,
  R: Send + Sync + 'static,
{
  middleware_fn(move |next| {
    hook_fn(move |ctx: C, pipe_ctx| {
      let next = next.clone();
      async move {
        let mut attempt: usize = 0;
        loop {
          let err = match next(ctx.clone(), pipe_ctx.clone()).await {
            Ok(()) => return Ok(()),
            Err(err) => err,
          };
          if attempt >= max_retries {
            return Err(
              HookError::RetriesExhausted {
                retries: max_retries,
                source: err,
              }
              .into(),
            );
          }
          attempt += 1;
          let wait = backoff.saturating_mul(u32::try_from(attempt).unwrap_or(u32::MAX));
          event!(Level::DEBUG, attempt, ?wait, error = %format!("{:#}", err), "Hook failed, retrying.");
          tokio::time::sleep(wait).await;
        }
      }
    })
  })
}

/// [`retry`] with [`DEFAULT_MAX_RETRIES`] and [`DEFAULT_RETRY_BACKOFF`].
pub fn retry_default<C, O, P, R>() -> Middleware<C, O, P, R>
where
  C: Context + Clone,
  O: Send + Sync + 'static,
  P: Send + Sync + 'static,
  R: Send + Sync + 'static,
{
  retry(DEFAULT_MAX_RETRIES, DEFAULT_RETRY_BACKOFF)
}
