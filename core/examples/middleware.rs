// hookpipe/examples/middleware.rs

use hookpipe::middleware::{logging, recovery_with_error, retry, timeout};
use hookpipe::{CancelToken, Hook, PipeContext, Pipeline, TracingContext};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

#[derive(Debug, Default)]
struct FetchResult {
  body: Option<String>,
}

type FetchCtx = PipeContext<(), String, FetchResult>;

#[tokio::main]
async fn main() {
  tracing_subscriber::fmt().with_max_level(tracing::Level::DEBUG).init();
  info!("--- Middleware Example ---");

  let attempts = Arc::new(AtomicUsize::new(0));
  let counter = attempts.clone();

  let mut pipeline: Pipeline<TracingContext, (), String, FetchResult> = Pipeline::new("fetcher");

  // First registered is outermost: recovery sees panics from everything below it.
  pipeline
    .use_middleware(recovery_with_error())
    .use_middleware(logging())
    .use_middleware(retry(3, Duration::from_millis(20)))
    .use_middleware(timeout(Duration::from_millis(200)));

  pipeline
    .add_named_hook("fetch", move |_ctx, pc: FetchCtx| {
      let counter = counter.clone();
      async move {
        // Fails twice, then succeeds.
        let attempt = counter.fetch_add(1, Ordering::SeqCst) + 1;
        if attempt < 3 {
          anyhow::bail!("connection reset (attempt {})", attempt);
        }
        pc.result_mut().body = Some(format!("contents of {}", pc.payload()));
        Ok(())
      }
    })
    .add_hook_with_options(
      Hook::builder(hookpipe::hook_fn(|_ctx: TracingContext, pc: FetchCtx| async move {
        // Only runs when an upstream hook left a marker.
        let marker = pc.must_get("cache_marker");
        info!(?marker, "Cache marker present.");
        Ok(())
      }))
      .with_name("cache")
      .with_timeout(Duration::from_millis(50))
      .build(),
    );

  let ctx = TracingContext::new(CancelToken::with_timeout(Duration::from_secs(5)));
  match pipeline.execute(ctx, "https://example.invalid/data".to_string()).await {
    Ok(result) => info!(body = ?result.body, "Fetched."),
    Err(e) => {
      // The cache hook panics on the missing key; recovery turns it into an error.
      error!(error = %e, attempts = attempts.load(Ordering::SeqCst), "Pipeline failed.");
    }
  }
}
