// hookpipe/src/pipeline/execution.rs

//! Contains `Pipeline::execute()`, responsible for running the hooks of one
//! pipeline invocation and reporting the outcome.

use crate::core::context::Context;
use crate::core::hook::{Hook, HookHandler};
use crate::core::middleware::apply_middlewares;
use crate::core::pipe_context::PipeContext;
use crate::core::stats::HookStat;
use crate::error::{PipeError, PipeResult};
use crate::middleware::timeout;
use crate::pipeline::definition::Pipeline;
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;
use tracing::{event, instrument, span, Instrument, Level};

impl<C, O, P, R> Pipeline<C, O, P, R>
where
  C: Context + Clone,
  O: Default + Send + Sync + 'static,
  P: Send + Sync + 'static,
  R: Default + Send + Sync + 'static,
{
  /// Runs every hook in registration order against a fresh [`PipeContext`].
  ///
  /// - `before_execute` callbacks run first.
  /// - Before each hook the abort flag is checked; once set, the remaining
  ///   hooks are skipped and the run still counts as successful.
  /// - A failing hook triggers the `on_error` callbacks. If the hook is
  ///   `skip_on_error` the run continues, otherwise it stops with a
  ///   [`PipeError`] naming the hook and its index.
  /// - `after_execute` callbacks always run, with the terminal error if any.
  ///
  /// Returns the accumulated result on success. A panic raised by a hook
  /// (for example `PipeContext::must_get` on a missing key) is not turned
  /// into an error here; it unwinds out of `execute` unless a recovery
  /// middleware contains it.
  #[instrument(
        name = "Pipeline::execute",
        skip_all,
        fields(
            pipeline = %self.name,
            num_hooks = self.hooks.len(),
            num_middlewares = self.middlewares.len(),
        ),
        err(Display)
    )]
  pub async fn execute(&self, ctx: C, payload: P) -> PipeResult<R> {
    event!(Level::DEBUG, "Pipeline execution starting.");

    let pipe_ctx = PipeContext::new(&self.name, Arc::clone(&self.option), payload, R::default());

    for before in &self.before_execute {
      before(&ctx, &pipe_ctx);
    }

    let mut final_err: Option<PipeError> = None;

    for (hook_idx, hook) in self.hooks.iter().enumerate() {
      if pipe_ctx.is_aborted() {
        event!(
          Level::INFO,
          skipped_hooks = self.hooks.len() - hook_idx,
          "Pipeline aborted, remaining hooks skipped."
        );
        break;
      }

      let hook_span = span!(
        Level::INFO,
        "pipeline_hook_execution",
        hook_name = hook.name(),
        hook_index = hook_idx,
        skip_on_error = hook.skip_on_error()
      );

      let handler = self.compose(hook);

      let start_time = Utc::now();
      let started = Instant::now();
      let outcome = handler(ctx.clone(), pipe_ctx.clone())
        .instrument(hook_span.clone())
        .await;
      let duration = started.elapsed();

      pipe_ctx.stats_mut().add_hook_stat(HookStat {
        name: hook.name().to_string(),
        index: hook_idx,
        start_time,
        end_time: Utc::now(),
        duration,
        error: outcome.as_ref().err().map(|e| format!("{:#}", e)),
      });

      let err = match outcome {
        Ok(()) => {
          hook_span.in_scope(|| event!(Level::DEBUG, ?duration, "Hook finished."));
          continue;
        }
        Err(err) => err,
      };

      for on_error in &self.on_error {
        on_error(&ctx, hook.name(), &err);
      }

      if hook.skip_on_error() {
        hook_span.in_scope(|| event!(Level::WARN, error = %format!("{:#}", err), "Hook failed, continuing (skip_on_error)."));
        continue;
      }

      hook_span.in_scope(|| event!(Level::ERROR, error = %format!("{:#}", err), "Hook failed, stopping pipeline."));
      final_err = Some(PipeError::new(&self.name, hook.name(), hook_idx, err));
      break;
    }

    pipe_ctx
      .stats_mut()
      .mark_end(final_err.as_ref().map(|e| e as &dyn std::fmt::Display));

    for after in &self.after_execute {
      after(&ctx, &pipe_ctx, final_err.as_ref());
    }

    match final_err {
      Some(err) => Err(err),
      None => {
        event!(Level::DEBUG, "Pipeline execution completed successfully.");
        Ok(pipe_ctx.take_result())
      }
    }
  }

  /// Builds the invocation for one hook: its own timeout innermost, then the
  /// pipeline middleware with the first registered layer outermost.
  fn compose(&self, hook: &Hook<C, O, P, R>) -> HookHandler<C, O, P, R> {
    let mut handler = Arc::clone(hook.handler());
    if let Some(limit) = hook.timeout() {
      handler = timeout::bounded(handler, limit);
    }
    if self.middlewares.is_empty() {
      return handler;
    }
    apply_middlewares(handler, &self.middlewares)
  }
}
