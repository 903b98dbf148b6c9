// hookpipe/examples/basic_pipeline.rs

use hookpipe::{option_fn, wrap_context, CancelToken, NoopContext, PipeContext, PipeResult, Pipeline};
use tracing::info;

// 1. Define the option, payload and result types for the pipeline
#[derive(Debug, Default)]
struct GreetOption {
  shout: bool,
}

#[derive(Debug)]
struct GreetPayload {
  name: String,
}

#[derive(Debug, Default)]
struct GreetResult {
  greeting: String,
  steps: Vec<String>,
}

type GreetCtx = PipeContext<GreetOption, GreetPayload, GreetResult>;
type GreetPipeline = Pipeline<NoopContext, GreetOption, GreetPayload, GreetResult>;

#[tokio::main]
async fn main() -> PipeResult<()> {
  // Initialize tracing (optional, for demonstration)
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

  info!("--- Basic Pipeline Example ---");

  // 2. Create the pipeline; configurators run once, in order, against GreetOption::default()
  let mut pipeline = GreetPipeline::with_options("greeter", [option_fn(|o: &mut GreetOption| o.shout = true)]);

  // 3. Register hooks; they run in registration order
  pipeline
    .add_named_hook("normalize", |_ctx, pc: GreetCtx| async move {
      let name = pc.payload().name.trim().to_string();
      pc.set("name", name);
      pc.result_mut().steps.push("normalize".to_string());
      Ok(())
    })
    .add_named_hook("greet", |_ctx, pc: GreetCtx| async move {
      let name: String = pc.get_as("name").unwrap_or_default();
      let mut greeting = format!("hello, {}", name);
      if pc.option().shout {
        greeting = greeting.to_uppercase();
      }
      let mut result = pc.result_mut();
      result.greeting = greeting;
      result.steps.push("greet".to_string());
      Ok(())
    })
    .on_after_execute(|_ctx, pc, err| {
      let stats = pc.stats();
      info!(
        hooks = stats.hook_count(),
        duration = ?stats.total_duration,
        failed = err.is_some(),
        "Run finished."
      );
    });

  // 4. Run it with an ambient context built from a bare cancellation token
  let payload = GreetPayload {
    name: "  world ".to_string(),
  };
  let result = pipeline.execute(wrap_context(CancelToken::new()), payload).await?;

  // 5. Inspect the result
  info!(greeting = %result.greeting, steps = ?result.steps, "Pipeline completed.");
  assert_eq!(result.greeting, "HELLO, WORLD");

  Ok(())
}
