// hookpipe/src/core/middleware.rs

//! Middleware: decorators around a hook handler.

use crate::core::hook::HookHandler;
use std::sync::Arc;

/// A transformation from the next handler in the chain to a wrapped handler.
///
/// Middleware must not carry mutable state of its own: the same instance is
/// applied to every hook of every (possibly concurrent) run.
pub type Middleware<C, O, P, R> = Arc<dyn Fn(HookHandler<C, O, P, R>) -> HookHandler<C, O, P, R> + Send + Sync>;

/// Boxes a wrapping function into a [`Middleware`].
pub fn middleware_fn<C, O, P, R, F>(f: F) -> Middleware<C, O, P, R>
where
  F: Fn(HookHandler<C, O, P, R>) -> HookHandler<C, O, P, R> + Send + Sync + 'static,
{
  Arc::new(f)
}

/// Wraps `handler` with `middlewares`, folding from the last to the first so
/// that `middlewares[0]` ends up outermost: it sees the call first and the
/// result last.
pub fn apply_middlewares<C, O, P, R>(
  handler: HookHandler<C, O, P, R>,
  middlewares: &[Middleware<C, O, P, R>],
) -> HookHandler<C, O, P, R> {
  middlewares.iter().rev().fold(handler, |next, middleware| middleware(next))
}
