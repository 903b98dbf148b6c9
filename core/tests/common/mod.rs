// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use hookpipe::{hook_fn, middleware_fn, HookHandler, Middleware, NoopContext, PipeContext, Pipeline};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};
use tracing::Level;

// --- Common Option / Payload / Result types ---
#[derive(Clone, Debug, Default)]
pub struct TestOption {
  pub enable_cache: bool,
  pub max_retries: u32,
}

#[derive(Clone, Debug, Default)]
pub struct TestPayload {
  pub user_id: i64,
  pub data: String,
}

#[derive(Clone, Debug, Default)]
pub struct TestResult {
  pub output: Vec<String>,
  pub metadata: HashMap<String, String>,
}

pub type TestCtx = PipeContext<TestOption, TestPayload, TestResult>;
pub type TestPipeline = Pipeline<NoopContext, TestOption, TestPayload, TestResult>;
pub type TestHandler = HookHandler<NoopContext, TestOption, TestPayload, TestResult>;
pub type TestMiddleware = Middleware<NoopContext, TestOption, TestPayload, TestResult>;

/// Shared, ordered record of what ran.
pub type ExecLog = Arc<Mutex<Vec<String>>>;

pub fn new_log() -> ExecLog {
  Arc::new(Mutex::new(Vec::new()))
}

pub fn entries(log: &ExecLog) -> Vec<String> {
  log.lock().clone()
}

// --- Common Error Type for Tests ---
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum TestError {
  #[error("test error")]
  Expected,

  #[error("invalid user ID: {0}")]
  InvalidUser(i64),
}

pub fn ctx() -> NoopContext {
  NoopContext::default()
}

pub fn payload(user_id: i64, data: &str) -> TestPayload {
  TestPayload {
    user_id,
    data: data.to_string(),
  }
}

// --- Common Handler Creators ---
pub fn validate_handler() -> TestHandler {
  hook_fn(|_ctx: NoopContext, pc: TestCtx| async move {
    let user_id = pc.payload().user_id;
    if user_id <= 0 {
      return Err(anyhow::Error::new(TestError::InvalidUser(user_id)));
    }
    Ok(())
  })
}

pub fn process_handler() -> TestHandler {
  hook_fn(|_ctx: NoopContext, pc: TestCtx| async move {
    let data = pc.payload().data.clone();
    pc.result_mut().output.push(data);
    pc.set("processed", true);
    Ok(())
  })
}

pub fn failing_handler() -> TestHandler {
  hook_fn(|_ctx: NoopContext, _pc: TestCtx| async move { Err(anyhow::Error::new(TestError::Expected)) })
}

pub fn recording_handler(label: &'static str, log: ExecLog) -> TestHandler {
  hook_fn(move |_ctx: NoopContext, _pc: TestCtx| {
    let log = log.clone();
    async move {
      log.lock().push(label.to_string());
      tracing::debug!(target: "test_handlers", hook = %label, "executed");
      Ok(())
    }
  })
}

/// Middleware that records `<tag>:enter` / `<tag>:exit` around each call.
pub fn tagging_middleware(tag: &'static str, log: ExecLog) -> TestMiddleware {
  middleware_fn(move |next: TestHandler| {
    let log = log.clone();
    hook_fn(move |ctx: NoopContext, pc: TestCtx| {
      let next = next.clone();
      let log = log.clone();
      async move {
        log.lock().push(format!("{}:enter", tag));
        let res = next(ctx, pc).await;
        log.lock().push(format!("{}:exit", tag));
        res
      }
    })
  })
}

// --- Helper for Tracing Setup (call once per test run if needed) ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok(); // Allow multiple initializations in tests (ok if fails)
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

// --- Atomic counters for checking execution counts ---
pub static HOOK_EXEC_COUNTER: Lazy<Arc<AtomicUsize>> = Lazy::new(|| Arc::new(AtomicUsize::new(0)));
pub static MIDDLEWARE_EXEC_COUNTER: Lazy<Arc<AtomicUsize>> = Lazy::new(|| Arc::new(AtomicUsize::new(0)));

pub fn reset_counters() {
  HOOK_EXEC_COUNTER.store(0, Ordering::SeqCst);
  MIDDLEWARE_EXEC_COUNTER.store(0, Ordering::SeqCst);
}

pub fn counting_handler() -> TestHandler {
  hook_fn(|_ctx: NoopContext, _pc: TestCtx| async move {
    HOOK_EXEC_COUNTER.fetch_add(1, Ordering::SeqCst);
    Ok(())
  })
}

pub fn counting_middleware() -> TestMiddleware {
  middleware_fn(|next: TestHandler| {
    hook_fn(move |ctx: NoopContext, pc: TestCtx| {
      let next = next.clone();
      async move {
        MIDDLEWARE_EXEC_COUNTER.fetch_add(1, Ordering::SeqCst);
        next(ctx, pc).await
      }
    })
  })
}
