// hookpipe/src/middleware/recovery.rs

//! Panic containment. A recovery layer only protects the layers registered
//! after it (and the hook itself), so register it first.

use crate::core::context::Context;
use crate::core::hook::{hook_fn, HookHandler};
use crate::core::middleware::{middleware_fn, Middleware};
use crate::error::HookError;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use tracing::{event, Level};

/// Extracts a printable message from a panic payload.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
  if let Some(s) = payload.downcast_ref::<&str>() {
    (*s).to_string()
  } else if let Some(s) = payload.downcast_ref::<String>() {
    s.clone()
  } else {
    "unknown panic payload".to_string()
  }
}

fn catching<C, O, P, R>(next: HookHandler<C, O, P, R>, absorb: bool) -> HookHandler<C, O, P, R>
where
  C: Context + Clone,
  O: Send + Sync + 'static,
  P: Send + Sync + 'static,
  R: Send + Sync + 'static,
{
  hook_fn(move |ctx, pipe_ctx| {
    let next = next.clone();
    // The handler is invoked inside the guarded future so a panic raised
    // before its first `.await` is caught as well.
    let guarded = AssertUnwindSafe(async move { next(ctx, pipe_ctx).await }).catch_unwind();
    async move {
      match guarded.await {
        Ok(res) => res,
        Err(payload) => {
          let message = panic_message(payload.as_ref());
          if absorb {
            event!(Level::WARN, panic = %message, "Panic absorbed by recovery middleware.");
            Ok(())
          } else {
            event!(Level::ERROR, panic = %message, "Panic converted to hook error.");
            Err(HookError::PanicRecovered { message }.into())
          }
        }
      }
    }
  })
}

/// Catches a panic in the wrapped layers and reports the hook as successful.
pub fn recovery<C, O, P, R>() -> Middleware<C, O, P, R>
where
  C: Context + Clone,
  O: Send + Sync + 'static,
  P: Send + Sync + 'static,
  R: Send + Sync + 'static,
{
  middleware_fn(|next| catching(next, true))
}

/// Catches a panic in the wrapped layers and fails the hook with
/// [`HookError::PanicRecovered`].
pub fn recovery_with_error<C, O, P, R>() -> Middleware<C, O, P, R>
where
  C: Context + Clone,
  O: Send + Sync + 'static,
  P: Send + Sync + 'static,
  R: Send + Sync + 'static,
{
  middleware_fn(|next| catching(next, false))
}
