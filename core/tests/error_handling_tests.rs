// tests/error_handling_tests.rs
mod common;

use common::*;
use futures::FutureExt;
use hookpipe::middleware::{panic_message, recovery, recovery_with_error};
use hookpipe::{hook_fn, Hook, HookError, NoopContext};
use std::panic::AssertUnwindSafe;

#[tokio::test]
async fn test_failing_hook_reports_pipeline_hook_and_index() {
  setup_tracing();
  let mut pipeline = TestPipeline::new("orders");
  pipeline
    .add_hooks([validate_handler()])
    .add_hook_with_options(Hook::named("charge", failing_handler()));

  let err = pipeline.execute(ctx(), payload(7, "data")).await.unwrap_err();

  assert_eq!(err.pipeline_name, "orders");
  assert_eq!(err.hook_name, "charge");
  assert_eq!(err.hook_index, 1);
  assert_eq!(err.to_string(), "pipeline 'orders' failed at hook 'charge' (index 1): test error");
  assert_eq!(err.downcast_cause::<TestError>(), Some(&TestError::Expected));
}

#[tokio::test]
async fn test_unnamed_hook_error_uses_index_only() {
  setup_tracing();
  let mut pipeline = TestPipeline::new("users");
  pipeline.add_hooks([validate_handler(), process_handler()]);

  let err = pipeline.execute(ctx(), payload(0, "data")).await.unwrap_err();

  assert_eq!(err.hook_index, 0);
  assert!(err.hook_name.is_empty());
  assert_eq!(err.to_string(), "pipeline 'users' failed at hook index 0: invalid user ID: 0");
  assert_eq!(err.into_cause().downcast::<TestError>().unwrap(), TestError::InvalidUser(0));
}

#[tokio::test]
async fn test_hooks_after_a_failure_do_not_run() {
  setup_tracing();
  let log = new_log();
  let mut pipeline = TestPipeline::new("halting");
  pipeline.add_hooks([
    recording_handler("first", log.clone()),
    failing_handler(),
    recording_handler("never", log.clone()),
  ]);

  let result = pipeline.execute(ctx(), payload(1, "data")).await;

  assert!(result.is_err());
  assert_eq!(entries(&log), vec!["first"]);
}

#[tokio::test]
async fn test_error_chain_is_preserved_in_cause() {
  setup_tracing();
  let mut pipeline = TestPipeline::new("chained");
  pipeline.add_named_hook("load", |_ctx, _pc: TestCtx| async {
    let inner: Result<(), TestError> = Err(TestError::Expected);
    anyhow::Context::context(inner, "loading profile")?;
    Ok(())
  });

  let err = pipeline.execute(ctx(), payload(1, "data")).await.unwrap_err();

  assert_eq!(format!("{:#}", err.cause()), "loading profile: test error");
  assert_eq!(err.downcast_cause::<TestError>(), Some(&TestError::Expected));
  assert!(std::error::Error::source(&err).is_some());
}

#[tokio::test]
async fn test_must_get_panic_escapes_execute() {
  setup_tracing();
  let log = new_log();
  let mut pipeline = TestPipeline::new("strict");
  pipeline
    .add_named_hook("lookup", |_ctx, pc: TestCtx| async move {
      let _ = pc.must_get("absent");
      Ok(())
    })
    .add_hooks([recording_handler("never", log.clone())]);

  let outcome = AssertUnwindSafe(pipeline.execute(ctx(), payload(1, "data")))
    .catch_unwind()
    .await;

  let panic_payload = outcome.err().expect("execute should have panicked");
  assert_eq!(panic_message(panic_payload.as_ref()), "key not found: absent");
  assert!(entries(&log).is_empty());
}

#[tokio::test]
async fn test_skip_on_error_does_not_absorb_panics() {
  setup_tracing();
  let mut pipeline = TestPipeline::new("panicky");
  pipeline.add_hook_with_options(
    Hook::builder(hook_fn(|_ctx: NoopContext, pc: TestCtx| async move {
      if pc.payload().user_id > 0 {
        panic!("boom");
      }
      Ok(())
    }))
    .with_name("explode")
    .skip_on_error()
    .build(),
  );

  let outcome = AssertUnwindSafe(pipeline.execute(ctx(), payload(1, "data")))
    .catch_unwind()
    .await;

  let panic_payload = outcome.err().expect("panic should propagate");
  assert_eq!(panic_message(panic_payload.as_ref()), "boom");
}

#[tokio::test]
async fn test_recovery_with_error_turns_panic_into_pipe_error() {
  setup_tracing();
  let log = new_log();
  let mut pipeline = TestPipeline::new("guarded");
  pipeline
    .use_middleware(recovery_with_error())
    .add_named_hook("lookup", |_ctx, pc: TestCtx| async move {
      let _ = pc.must_get("absent");
      Ok(())
    })
    .add_hooks([recording_handler("never", log.clone())]);

  let err = pipeline.execute(ctx(), payload(1, "data")).await.unwrap_err();

  assert_eq!(err.hook_name, "lookup");
  assert_eq!(err.cause().to_string(), "panic recovered: key not found: absent");
  assert!(matches!(
    err.downcast_cause::<HookError>(),
    Some(HookError::PanicRecovered { message }) if message == "key not found: absent"
  ));
  assert!(entries(&log).is_empty());
}

#[tokio::test]
async fn test_recovery_absorbs_panic_and_continues() {
  setup_tracing();
  let log = new_log();
  let mut pipeline = TestPipeline::new("forgiving");
  pipeline
    .use_middleware(recovery())
    .add_named_hook("explode", |_ctx, pc: TestCtx| async move {
      if pc.payload().user_id > 0 {
        panic!("ignored");
      }
      Ok(())
    })
    .add_hooks([recording_handler("after", log.clone())]);

  let result = pipeline.execute(ctx(), payload(1, "data")).await;

  assert!(result.is_ok());
  assert_eq!(entries(&log), vec!["after"]);
}
