// hookpipe/src/core/pipe_context.rs

//! The per-run execution context shared by every hook and middleware.

use crate::core::stats::ExecutionStats;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

/// A value stored in the scratch space.
pub type ScratchValue = Arc<dyn Any + Send + Sync>;

#[derive(Default)]
struct SharedState {
  data: HashMap<String, ScratchValue>,
  aborted: bool,
}

struct PipeContextInner<O, P, R> {
  name: String,
  option: Arc<O>,
  payload: Arc<P>,
  result: RwLock<R>,
  // Scratch map and abort flag share one lock.
  state: RwLock<SharedState>,
  stats: RwLock<ExecutionStats>,
}

/// Mutable state for a single `Pipeline::execute` call.
///
/// `PipeContext` is a cheap, clonable handle: every clone refers to the same
/// run. Exactly one is created per `execute` and the pipeline keeps nothing
/// from it once the call returns.
///
/// IMPORTANT: guards returned by `result()` / `result_mut()` are blocking
/// locks and MUST NOT be held across an `.await` point.
pub struct PipeContext<O, P, R>(Arc<PipeContextInner<O, P, R>>);

impl<O, P, R> PipeContext<O, P, R>
where
  O: Send + Sync + 'static,
  P: Send + Sync + 'static,
  R: Send + Sync + 'static,
{
  /// Creates the context for one run of pipeline `name`, with its stats
  /// start already marked. `Pipeline::execute` does this for every call; it
  /// is public so custom middleware can be driven directly in tests.
  pub fn new(name: &str, option: Arc<O>, payload: P, result: R) -> Self {
    let mut stats = ExecutionStats::new(name);
    stats.mark_start();
    PipeContext(Arc::new(PipeContextInner {
      name: name.to_string(),
      option,
      payload: Arc::new(payload),
      result: RwLock::new(result),
      state: RwLock::new(SharedState::default()),
      stats: RwLock::new(stats),
    }))
  }

  /// Name of the pipeline this run belongs to.
  pub fn name(&self) -> &str {
    &self.0.name
  }

  /// The pipeline's configuration snapshot. Shared by every run of the pipeline.
  pub fn option(&self) -> &O {
    &self.0.option
  }

  /// The caller-supplied input.
  pub fn payload(&self) -> &P {
    &self.0.payload
  }

  pub fn result(&self) -> RwLockReadGuard<'_, R> {
    self.0.result.read()
  }

  pub fn result_mut(&self) -> RwLockWriteGuard<'_, R> {
    self.0.result.write()
  }

  /// Stops the pipeline before the next hook. Idempotent; not an error.
  pub fn abort(&self) {
    self.0.state.write().aborted = true;
  }

  pub fn is_aborted(&self) -> bool {
    self.0.state.read().aborted
  }

  pub fn set<V: Any + Send + Sync>(&self, key: impl Into<String>, value: V) {
    self.0.state.write().data.insert(key.into(), Arc::new(value));
  }

  pub fn get(&self, key: &str) -> Option<ScratchValue> {
    self.0.state.read().data.get(key).cloned()
  }

  /// Returns a clone of the value under `key` if it exists and has type `T`.
  pub fn get_as<T: Any + Clone>(&self, key: &str) -> Option<T> {
    self
      .0
      .state
      .read()
      .data
      .get(key)
      .and_then(|v| v.downcast_ref::<T>())
      .cloned()
  }

  /// Like [`get`](Self::get), but a missing key is a programming error.
  ///
  /// # Panics
  ///
  /// Panics with `key not found: <key>` when the key is absent. This is never
  /// turned into a hook error; only a recovery middleware can contain it.
  pub fn must_get(&self, key: &str) -> ScratchValue {
    match self.get(key) {
      Some(value) => value,
      None => panic!("key not found: {}", key),
    }
  }

  /// Snapshot of the run's statistics. While the run is in progress this only
  /// contains the hooks that have already finished.
  pub fn stats(&self) -> ExecutionStats {
    self.0.stats.read().clone()
  }

  pub(crate) fn stats_mut(&self) -> RwLockWriteGuard<'_, ExecutionStats> {
    self.0.stats.write()
  }

  /// Moves the accumulated result out, leaving `R::default()` behind for any
  /// worker that still holds a clone of this context.
  pub(crate) fn take_result(&self) -> R
  where
    R: Default,
  {
    std::mem::take(&mut *self.0.result.write())
  }
}

impl<O, P, R> Clone for PipeContext<O, P, R> {
  fn clone(&self) -> Self {
    PipeContext(Arc::clone(&self.0))
  }
}

impl<O, P, R> std::fmt::Debug for PipeContext<O, P, R> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let state = self.0.state.read();
    let mut keys: Vec<&String> = state.data.keys().collect();
    keys.sort();
    f.debug_struct("PipeContext")
      .field("name", &self.0.name)
      .field("aborted", &state.aborted)
      .field("scratch_keys", &keys)
      .finish()
  }
}
