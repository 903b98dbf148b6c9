pub mod context;
pub mod hook;
pub mod middleware;
pub mod pipe_context;
pub mod stats;

// Re-export key types for easier access from other modules (and lib.rs)
pub use context::{wrap_context, CancelToken, Context, NoopContext, TracingContext};
pub use hook::{hook_fn, Hook, HookBuilder, HookFuture, HookHandler};
pub use middleware::{apply_middlewares, middleware_fn, Middleware};
pub use pipe_context::{PipeContext, ScratchValue};
pub use stats::{ExecutionStats, HookStat};
