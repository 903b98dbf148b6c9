// hookpipe/src/middleware/logging.rs

use crate::core::context::Context;
use crate::core::hook::hook_fn;
use crate::core::middleware::{middleware_fn, Middleware};
use std::time::{Duration, Instant};

const CATEGORY: &str = "pipeline";

#[derive(Debug)]
#[allow(dead_code)] // Fields are read through the Debug payload only.
struct HookLogRecord<'a> {
  pipeline: &'a str,
  elapsed: Option<Duration>,
}

/// Reports each hook invocation through the ambient context's logger:
/// a `debug` entry on entry, then `info` with the elapsed time on success or
/// `error` on failure.
pub fn logging<C, O, P, R>() -> Middleware<C, O, P, R>
where
  C: Context + Clone,
  O: Send + Sync + 'static,
  P: Send + Sync + 'static,
  R: Send + Sync + 'static,
{
  middleware_fn(|next| {
    hook_fn(move |ctx: C, pipe_ctx| {
      let next = next.clone();
      async move {
        let pipeline = pipe_ctx.name().to_string();
        ctx.debug(
          CATEGORY,
          "hook_start",
          &HookLogRecord {
            pipeline: &pipeline,
            elapsed: None,
          },
        );

        let start = Instant::now();
        let res = next(ctx.clone(), pipe_ctx).await;
        let record = HookLogRecord {
          pipeline: &pipeline,
          elapsed: Some(start.elapsed()),
        };

        match &res {
          Ok(()) => ctx.info(CATEGORY, "hook_finish", &record),
          Err(err) => ctx.error(CATEGORY, "hook_failed", err, &record),
        }
        res
      }
    })
  })
}
