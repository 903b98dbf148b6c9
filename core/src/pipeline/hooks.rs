// hookpipe/src/pipeline/hooks.rs

//! Methods for registering hooks, middleware and lifecycle callbacks.
//! Every method returns `&mut Self` so registrations can be chained.

use crate::core::context::Context;
use crate::core::hook::{hook_fn, Hook, HookHandler};
use crate::core::middleware::Middleware;
use crate::core::pipe_context::PipeContext;
use crate::error::PipeError;
use crate::pipeline::definition::Pipeline;
use std::future::Future;
use tracing::{event, Level};

impl<C, O, P, R> Pipeline<C, O, P, R>
where
  C: Context + Clone,
  O: Default + Send + Sync + 'static,
  P: Send + Sync + 'static,
  R: Default + Send + Sync + 'static,
{
  /// Appends an unnamed hook with default policy.
  pub fn add_hook<F, Fut>(&mut self, handler_fn: F) -> &mut Self
  where
    F: Fn(C, PipeContext<O, P, R>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
  {
    self.add_hooks([hook_fn(handler_fn)])
  }

  /// Appends one unnamed hook per handler, in iteration order.
  pub fn add_hooks<I>(&mut self, handlers: I) -> &mut Self
  where
    I: IntoIterator<Item = HookHandler<C, O, P, R>>,
  {
    for handler in handlers {
      self.add_hook_with_options(Hook::named(String::new(), handler));
    }
    self
  }

  /// Appends a named hook with default policy.
  pub fn add_named_hook<F, Fut>(&mut self, name: impl Into<String>, handler_fn: F) -> &mut Self
  where
    F: Fn(C, PipeContext<O, P, R>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
  {
    self.add_hook_with_options(Hook::named(name, hook_fn(handler_fn)))
  }

  /// Appends a fully configured hook (see [`Hook::builder`]).
  pub fn add_hook_with_options(&mut self, hook: Hook<C, O, P, R>) -> &mut Self {
    event!(
      Level::DEBUG,
      pipeline = %self.name,
      hook_name = %hook.name(),
      hook_index = self.hooks.len(),
      skip_on_error = hook.skip_on_error(),
      "Hook registered."
    );
    self.hooks.push(hook);
    self
  }

  /// Appends a middleware layer. Earlier registrations wrap later ones.
  pub fn use_middleware(&mut self, middleware: Middleware<C, O, P, R>) -> &mut Self {
    self.middlewares.push(middleware);
    self
  }

  pub fn use_middlewares<I>(&mut self, middlewares: I) -> &mut Self
  where
    I: IntoIterator<Item = Middleware<C, O, P, R>>,
  {
    self.middlewares.extend(middlewares);
    self
  }

  pub fn on_before_execute(&mut self, f: impl Fn(&C, &PipeContext<O, P, R>) + Send + Sync + 'static) -> &mut Self {
    self.before_execute.push(Box::new(f));
    self
  }

  pub fn on_after_execute(
    &mut self,
    f: impl Fn(&C, &PipeContext<O, P, R>, Option<&PipeError>) + Send + Sync + 'static,
  ) -> &mut Self {
    self.after_execute.push(Box::new(f));
    self
  }

  /// Registers a callback receiving `(ctx, hook_name, error)` for every failing hook.
  pub fn on_error(&mut self, f: impl Fn(&C, &str, &anyhow::Error) + Send + Sync + 'static) -> &mut Self {
    self.on_error.push(Box::new(f));
    self
  }
}
