// hookpipe/src/core/context.rs

//! The ambient execution context a caller hands to `Pipeline::execute`.
//!
//! The engine only needs two capabilities from its caller: a way to ask
//! whether the surrounding operation has been cancelled (or has a deadline),
//! and four structured logging calls. Hosts with richer request contexts
//! implement [`Context`] for their own type; callers with nothing but a
//! cancellation token use [`wrap_context`] or [`TracingContext`].

use std::fmt::{Debug, Display};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Notify;
use tracing::{event, Level};

/// Minimal capability set required from the caller's environment.
///
/// Hooks and middleware receive a clone of the context on every invocation.
/// The engine never enforces cancellation itself; a hook (or a timeout
/// middleware) decides what to do when `is_cancelled` reports true.
pub trait Context: Send + Sync + 'static {
  /// Whether the surrounding operation was cancelled or its deadline passed.
  fn is_cancelled(&self) -> bool;

  /// The point in time after which the surrounding operation is considered cancelled.
  fn deadline(&self) -> Option<Instant> {
    None
  }

  fn info(&self, category: &str, action: &str, data: &dyn Debug);
  fn warn(&self, category: &str, action: &str, data: &dyn Debug);
  fn error(&self, category: &str, action: &str, err: &dyn Display, data: &dyn Debug);
  fn debug(&self, category: &str, action: &str, data: &dyn Debug);
}

impl<T: Context + ?Sized> Context for Arc<T> {
  fn is_cancelled(&self) -> bool {
    (**self).is_cancelled()
  }

  fn deadline(&self) -> Option<Instant> {
    (**self).deadline()
  }

  fn info(&self, category: &str, action: &str, data: &dyn Debug) {
    (**self).info(category, action, data)
  }

  fn warn(&self, category: &str, action: &str, data: &dyn Debug) {
    (**self).warn(category, action, data)
  }

  fn error(&self, category: &str, action: &str, err: &dyn Display, data: &dyn Debug) {
    (**self).error(category, action, err, data)
  }

  fn debug(&self, category: &str, action: &str, data: &dyn Debug) {
    (**self).debug(category, action, data)
  }
}

// --- Cancellation ---

#[derive(Debug, Default)]
struct CancelState {
  cancelled: AtomicBool,
  notify: Notify,
  deadline: Option<Instant>,
}

/// A clonable cancellation handle with an optional deadline.
///
/// All clones observe the same state. Once cancelled (explicitly or because
/// the deadline elapsed) a token stays cancelled.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<CancelState>);

impl CancelToken {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_deadline(deadline: Instant) -> Self {
    CancelToken(Arc::new(CancelState {
      deadline: Some(deadline),
      ..Default::default()
    }))
  }

  pub fn with_timeout(timeout: Duration) -> Self {
    Self::with_deadline(Instant::now() + timeout)
  }

  pub fn cancel(&self) {
    self.0.cancelled.store(true, Ordering::SeqCst);
    self.0.notify.notify_waiters();
  }

  pub fn is_cancelled(&self) -> bool {
    if self.0.cancelled.load(Ordering::SeqCst) {
      return true;
    }
    match self.0.deadline {
      Some(deadline) => Instant::now() >= deadline,
      None => false,
    }
  }

  pub fn deadline(&self) -> Option<Instant> {
    self.0.deadline
  }

  /// Resolves once the token is cancelled or its deadline elapses.
  pub async fn cancelled(&self) {
    loop {
      // Registered before the flag check so a concurrent `cancel` cannot be missed.
      let notified = self.0.notify.notified();
      if self.is_cancelled() {
        return;
      }
      match self.0.deadline {
        Some(deadline) => {
          tokio::select! {
            _ = notified => {}
            _ = tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)) => return,
          }
        }
        None => notified.await,
      }
    }
  }
}

// --- Adapters ---

/// Adapter for callers that only have a cancellation token. Logging is a no-op.
#[derive(Debug, Clone, Default)]
pub struct NoopContext {
  token: CancelToken,
}

impl NoopContext {
  pub fn new(token: CancelToken) -> Self {
    Self { token }
  }

  pub fn token(&self) -> &CancelToken {
    &self.token
  }
}

/// Wraps a bare cancellation token into a [`Context`] whose logging calls do nothing.
pub fn wrap_context(token: CancelToken) -> NoopContext {
  NoopContext::new(token)
}

impl Context for NoopContext {
  fn is_cancelled(&self) -> bool {
    self.token.is_cancelled()
  }

  fn deadline(&self) -> Option<Instant> {
    self.token.deadline()
  }

  fn info(&self, _category: &str, _action: &str, _data: &dyn Debug) {}
  fn warn(&self, _category: &str, _action: &str, _data: &dyn Debug) {}
  fn error(&self, _category: &str, _action: &str, _err: &dyn Display, _data: &dyn Debug) {}
  fn debug(&self, _category: &str, _action: &str, _data: &dyn Debug) {}
}

/// Adapter that forwards the four logging calls to `tracing` events.
///
/// Every event carries `category` and `action` fields; the payload is
/// recorded with its `Debug` representation.
#[derive(Debug, Clone, Default)]
pub struct TracingContext {
  token: CancelToken,
}

impl TracingContext {
  pub fn new(token: CancelToken) -> Self {
    Self { token }
  }

  pub fn token(&self) -> &CancelToken {
    &self.token
  }
}

impl Context for TracingContext {
  fn is_cancelled(&self) -> bool {
    self.token.is_cancelled()
  }

  fn deadline(&self) -> Option<Instant> {
    self.token.deadline()
  }

  fn info(&self, category: &str, action: &str, data: &dyn Debug) {
    event!(Level::INFO, %category, %action, data = ?data);
  }

  fn warn(&self, category: &str, action: &str, data: &dyn Debug) {
    event!(Level::WARN, %category, %action, data = ?data);
  }

  fn error(&self, category: &str, action: &str, err: &dyn Display, data: &dyn Debug) {
    event!(Level::ERROR, %category, %action, error = %err, data = ?data);
  }

  fn debug(&self, category: &str, action: &str, data: &dyn Debug) {
    event!(Level::DEBUG, %category, %action, data = ?data);
  }
}
