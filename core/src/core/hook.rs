// hookpipe/src/core/hook.rs

//! Defines the hook handler type and the `Hook` definition with its builder.

use crate::core::pipe_context::PipeContext;
use futures::future::BoxFuture;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Future returned by a hook handler.
pub type HookFuture = BoxFuture<'static, anyhow::Result<()>>;

/// Type alias for a hook handler.
///
/// A handler is an asynchronous function that receives its own clone of the
/// ambient context `C` and of the run's [`PipeContext`], and resolves to
/// `Ok(())` on success. Handlers are stored behind an `Arc` because
/// middleware may invoke them more than once (retry) or move them onto
/// another task (timeout).
///
/// Handlers that touch the `PipeContext` locks must drop the guards BEFORE
/// any `.await` suspension point.
pub type HookHandler<C, O, P, R> = Arc<dyn Fn(C, PipeContext<O, P, R>) -> HookFuture + Send + Sync>;

/// Boxes an async closure into a [`HookHandler`].
pub fn hook_fn<C, O, P, R, F, Fut>(f: F) -> HookHandler<C, O, P, R>
where
  F: Fn(C, PipeContext<O, P, R>) -> Fut + Send + Sync + 'static,
  Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
  Arc::new(move |ctx, pipe_ctx| Box::pin(f(ctx, pipe_ctx)))
}

/// A named unit of pipeline work together with its timeout and error policy.
///
/// Hooks are immutable once built; use [`HookBuilder`] to configure one.
pub struct Hook<C, O, P, R> {
  name: String,
  description: String,
  handler: HookHandler<C, O, P, R>,
  timeout: Option<Duration>,
  skip_on_error: bool,
}

impl<C, O, P, R> Hook<C, O, P, R> {
  /// Starts building a hook around `handler`.
  pub fn builder(handler: HookHandler<C, O, P, R>) -> HookBuilder<C, O, P, R> {
    HookBuilder::new(handler)
  }

  /// A named hook with default policy (no timeout, failures halt the run).
  pub fn named(name: impl Into<String>, handler: HookHandler<C, O, P, R>) -> Self {
    Self {
      name: name.into(),
      description: String::new(),
      handler,
      timeout: None,
      skip_on_error: false,
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn description(&self) -> &str {
    &self.description
  }

  /// Per-hook timeout; `None` means the hook is unbounded.
  pub fn timeout(&self) -> Option<Duration> {
    self.timeout
  }

  pub fn skip_on_error(&self) -> bool {
    self.skip_on_error
  }

  pub fn handler(&self) -> &HookHandler<C, O, P, R> {
    &self.handler
  }

  /// Invokes the hook's own handler, bypassing any middleware.
  pub fn execute(&self, ctx: C, pipe_ctx: PipeContext<O, P, R>) -> HookFuture {
    (self.handler)(ctx, pipe_ctx)
  }
}

impl<C, O, P, R> Clone for Hook<C, O, P, R> {
  fn clone(&self) -> Self {
    Self {
      name: self.name.clone(),
      description: self.description.clone(),
      handler: Arc::clone(&self.handler),
      timeout: self.timeout,
      skip_on_error: self.skip_on_error,
    }
  }
}

impl<C, O, P, R> std::fmt::Debug for Hook<C, O, P, R> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Hook")
      .field("name", &self.name)
      .field("description", &self.description)
      .field("timeout", &self.timeout)
      .field("skip_on_error", &self.skip_on_error)
      .finish()
  }
}

/// Fluent builder for [`Hook`]. No validation happens at build time; an
/// empty name is reported as an unnamed hook.
pub struct HookBuilder<C, O, P, R> {
  hook: Hook<C, O, P, R>,
}

impl<C, O, P, R> HookBuilder<C, O, P, R> {
  pub fn new(handler: HookHandler<C, O, P, R>) -> Self {
    Self {
      hook: Hook::named(String::new(), handler),
    }
  }

  pub fn with_name(mut self, name: impl Into<String>) -> Self {
    self.hook.name = name.into();
    self
  }

  pub fn with_description(mut self, description: impl Into<String>) -> Self {
    self.hook.description = description.into();
    self
  }

  /// `Duration::ZERO` clears the timeout.
  pub fn with_timeout(mut self, timeout: Duration) -> Self {
    self.hook.timeout = if timeout.is_zero() { None } else { Some(timeout) };
    self
  }

  pub fn skip_on_error(mut self) -> Self {
    self.hook.skip_on_error = true;
    self
  }

  pub fn build(self) -> Hook<C, O, P, R> {
    self.hook
  }
}
