// hookpipe/src/lib.rs

//! hookpipe: a typed, asynchronous hook pipeline engine.
//!
//! A [`Pipeline`] runs an ordered list of named hooks over a shared,
//! per-run [`PipeContext`]:
//!  - Hooks execute one at a time, in registration order.
//!  - Any hook can `abort()` the run; the remaining hooks are skipped and the
//!    run still succeeds.
//!  - A failing hook either stops the run with a [`PipeError`] or, when marked
//!    `skip_on_error`, is recorded and skipped.
//!  - Middleware wraps every hook invocation (timeout, retry, panic recovery,
//!    logging, or your own), first registered outermost.
//!  - Before/after/error lifecycle callbacks and [`ExecutionStats`] expose
//!    timing and outcome of every run.
//!
//! The pipeline is generic over the caller's ambient [`Context`] (`C`), a
//! configuration snapshot (`O`), the input payload (`P`) and the output
//! result (`R`).

pub mod core;
pub mod error;
pub mod middleware;
pub mod pipeline;

// --- Re-exports for the Public API ---

pub use crate::core::context::{wrap_context, CancelToken, Context, NoopContext, TracingContext};
pub use crate::core::hook::{hook_fn, Hook, HookBuilder, HookFuture, HookHandler};
pub use crate::core::middleware::{apply_middlewares, middleware_fn, Middleware};
pub use crate::core::pipe_context::{PipeContext, ScratchValue};
pub use crate::core::stats::{ExecutionStats, HookStat};

pub use crate::pipeline::{option_fn, OptionConfigurator, Pipeline};

pub use crate::error::{HookError, PipeError, PipeResult};

/*
    Core Workflow:
    1. Define the option, payload and result types for your process.
    2. Create a `Pipeline<C, O, P, R>` with `Pipeline::new(name)` or
       `Pipeline::with_options(name, [option_fn(|o| ...)])`.
    3. Register hooks with `.add_hook()`, `.add_named_hook()` or
       `.add_hook_with_options(Hook::builder(handler)...build())`.
    4. Register middleware with `.use_middleware()` (first registered = outermost),
       e.g. `middleware::recovery_with_error()` before `middleware::retry(3, backoff)`.
    5. Optionally register `.on_before_execute()`, `.on_after_execute()`, `.on_error()`.
    6. Call `pipeline.execute(ctx, payload).await` to get `Ok(result)` or a `PipeError`.
*/
