// hookpipe/examples/error_handling.rs

use hookpipe::{Hook, HookError, NoopContext, PipeContext, Pipeline};
use tracing::{error, info, warn};

// 1. Define a custom application error type
#[derive(Debug, thiserror::Error)]
enum ExampleAppError {
  #[error("inventory unavailable for sku {0}")]
  OutOfStock(String),
}

#[derive(Debug)]
struct Order {
  sku: String,
  quantity: u32,
}

#[derive(Debug, Default)]
struct Receipt {
  lines: Vec<String>,
}

type OrderCtx = PipeContext<(), Order, Receipt>;
type OrderPipeline = Pipeline<NoopContext, (), Order, Receipt>;

fn build_pipeline() -> OrderPipeline {
  let mut pipeline = OrderPipeline::new("orders");
  pipeline
    .add_hook_with_options(
      Hook::builder(hookpipe::hook_fn(|_ctx: NoopContext, pc: OrderCtx| async move {
        // Best-effort; a failure here is recorded and skipped.
        if pc.payload().quantity > 10 {
          anyhow::bail!("bulk discount service offline");
        }
        Ok(())
      }))
      .with_name("discount")
      .with_description("applies optional bulk discounts")
      .skip_on_error()
      .build(),
    )
    .add_named_hook("reserve", |_ctx, pc: OrderCtx| async move {
      if pc.payload().sku == "missing" {
        return Err(anyhow::Error::new(ExampleAppError::OutOfStock(pc.payload().sku.clone())));
      }
      let line = format!("{} x {}", pc.payload().quantity, pc.payload().sku);
      pc.result_mut().lines.push(line);
      Ok(())
    })
    .on_error(|_ctx, hook_name, err| {
      warn!(hook = %hook_name, error = %err, "Hook reported an error.");
    });
  pipeline
}

#[tokio::main]
async fn main() {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();
  info!("--- Error Handling Example ---");

  let pipeline = build_pipeline();

  // Scenario 1: optional hook fails, run still succeeds
  info!("\nScenario 1: skip_on_error hook fails");
  let order = Order {
    sku: "widget".to_string(),
    quantity: 12,
  };
  match pipeline.execute(NoopContext::default(), order).await {
    Ok(receipt) => info!(lines = ?receipt.lines, "Order accepted."),
    Err(e) => error!(error = %e, "Unexpected failure."),
  }

  // Scenario 2: required hook fails, run stops with a PipeError
  info!("\nScenario 2: required hook fails");
  let order = Order {
    sku: "missing".to_string(),
    quantity: 1,
  };
  match pipeline.execute(NoopContext::default(), order).await {
    Ok(_) => error!("Expected the order to be rejected."),
    Err(e) => {
      error!(error = %e, hook = %e.hook_name, index = e.hook_index, "Order rejected.");
      if let Some(app_err) = e.downcast_cause::<ExampleAppError>() {
        info!(cause = %app_err, "Recovered the application error from the pipeline error.");
      }
      if e.downcast_cause::<HookError>().is_none() {
        info!("The failure came from the hook itself, not from a middleware.");
      }
    }
  }
}
