// hookpipe/src/pipeline/definition.rs

//! Contains the `Pipeline<C, O, P, R>` struct definition and its constructors.

use crate::core::context::Context;
use crate::core::hook::Hook;
use crate::core::middleware::Middleware;
use crate::core::pipe_context::PipeContext;
use crate::error::PipeError;
use std::sync::Arc;

/// A configuration step applied to the zero-valued option at construction time.
pub type OptionConfigurator<O> = Box<dyn FnOnce(&mut O) + Send>;

/// Boxes a closure into an [`OptionConfigurator`].
pub fn option_fn<O>(f: impl FnOnce(&mut O) + Send + 'static) -> OptionConfigurator<O> {
  Box::new(f)
}

/// Called once per run, before the first hook.
pub type BeforeExecuteFn<C, O, P, R> = Box<dyn Fn(&C, &PipeContext<O, P, R>) + Send + Sync>;

/// Called once per run after the last hook, with the terminal error if any.
pub type AfterExecuteFn<C, O, P, R> = Box<dyn Fn(&C, &PipeContext<O, P, R>, Option<&PipeError>) + Send + Sync>;

/// Called for every failing hook, including those marked `skip_on_error`.
pub type OnErrorFn<C> = Box<dyn Fn(&C, &str, &anyhow::Error) + Send + Sync>;

/// The core Pipeline type.
///
/// - `C` is the caller's ambient [`Context`], cloned into every hook invocation.
/// - `O` is the configuration snapshot, built once in the constructor and
///   shared read-only by every run.
/// - `P` is the per-run input, `R` the per-run output (starting from `R::default()`).
///
/// A `Pipeline` holds no per-run state, so one instance (typically behind an
/// `Arc`) can serve any number of concurrent `execute` calls.
pub struct Pipeline<C, O, P, R>
where
  C: Context + Clone,
  O: Default + Send + Sync + 'static,
  P: Send + Sync + 'static,
  R: Default + Send + Sync + 'static,
{
  pub(crate) name: String,
  pub(crate) option: Arc<O>,

  /// Hooks in registration order.
  pub(crate) hooks: Vec<Hook<C, O, P, R>>,
  /// Middleware in registration order; index 0 is the outermost layer.
  pub(crate) middlewares: Vec<Middleware<C, O, P, R>>,

  // Lifecycle callbacks, each list invoked in registration order.
  pub(crate) before_execute: Vec<BeforeExecuteFn<C, O, P, R>>,
  pub(crate) after_execute: Vec<AfterExecuteFn<C, O, P, R>>,
  pub(crate) on_error: Vec<OnErrorFn<C>>,
}

impl<C, O, P, R> Pipeline<C, O, P, R>
where
  C: Context + Clone,
  O: Default + Send + Sync + 'static,
  P: Send + Sync + 'static,
  R: Default + Send + Sync + 'static,
{
  /// Creates an empty pipeline whose option is `O::default()`.
  pub fn new(name: impl Into<String>) -> Self {
    Self::with_options(name, Vec::new())
  }

  /// Creates an empty pipeline, applying `configurators` in order to
  /// `O::default()` to produce the option snapshot.
  pub fn with_options<I>(name: impl Into<String>, configurators: I) -> Self
  where
    I: IntoIterator<Item = OptionConfigurator<O>>,
  {
    let mut option = O::default();
    for configure in configurators {
      configure(&mut option);
    }

    Self {
      name: name.into(),
      option: Arc::new(option),
      hooks: Vec::new(),
      middlewares: Vec::new(),
      before_execute: Vec::new(),
      after_execute: Vec::new(),
      on_error: Vec::new(),
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  /// The configuration snapshot handed to every run.
  pub fn option(&self) -> &O {
    &self.option
  }

  pub fn hooks(&self) -> &[Hook<C, O, P, R>] {
    &self.hooks
  }

  pub fn middleware_count(&self) -> usize {
    self.middlewares.len()
  }
}

impl<C, O, P, R> std::fmt::Debug for Pipeline<C, O, P, R>
where
  C: Context + Clone,
  O: Default + Send + Sync + 'static,
  P: Send + Sync + 'static,
  R: Default + Send + Sync + 'static,
{
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Pipeline")
      .field("name", &self.name)
      .field("hooks", &self.hooks)
      .field("middlewares", &self.middlewares.len())
      .field("before_execute", &self.before_execute.len())
      .field("after_execute", &self.after_execute.len())
      .field("on_error", &self.on_error.len())
      .finish()
  }
}
