// preflight/src/registrar/definition.rs

//! Contains the `DefaultPrerequisiteRegistrar` struct and methods for
//! registering units and obtaining the shared load stream.

use crate::core::registrar_trait::{PrerequisiteRegistrar, UnitSource};
use crate::core::unit::{ErrorFormatter, UnitOperation, WorkUnit};
use crate::error::PreflightResult;
use crate::registrar::share::{LoadStream, SharedLoad};

use futures::{Stream, StreamExt};
use std::sync::Arc;
use tracing::{event, Level};

/// The default prerequisite load orchestrator.
///
/// Units are appended in the order the module host registers them and run
/// strictly in that order, each at most once. The run is shared: however
/// many times `load()` is called, and however many subscribers attach, the
/// underlying operations execute exactly once and the outcome is replayed.
///
/// All methods take `&self`; the registrar is safe to share as
/// `Arc<dyn PrerequisiteRegistrar>` across module wiring code.
pub struct DefaultPrerequisiteRegistrar {
  shared: Arc<SharedLoad>,
}

impl DefaultPrerequisiteRegistrar {
  pub fn new() -> Self {
    Self {
      shared: SharedLoad::new(),
    }
  }

  /// Registers an asynchronous source as one unit of work.
  ///
  /// Only the source's first item matters: the first `Ok` completes the
  /// unit, the first `Err` fails it, and end-of-stream with no items counts
  /// as success. Later items are ignored. The source is not polled until
  /// the pipeline reaches the unit.
  pub fn register_stream<S, T>(&self, source: S, name: impl Into<String>) -> PreflightResult<()>
  where
    S: Stream<Item = anyhow::Result<T>> + Send + 'static,
    T: Send + 'static,
  {
    self.push(WorkUnit::new(name.into(), stream_operation(source), None))
  }

  /// Like `register_stream`, with a custom failure-to-message formatter.
  pub fn register_stream_with<S, T, F>(
    &self,
    source: S,
    name: impl Into<String>,
    format_error: F,
  ) -> PreflightResult<()>
  where
    S: Stream<Item = anyhow::Result<T>> + Send + 'static,
    T: Send + 'static,
    F: Fn(&anyhow::Error) -> String + Send + Sync + 'static,
  {
    self.push(WorkUnit::new(
      name.into(),
      stream_operation(source),
      Some(Arc::new(format_error)),
    ))
  }

  /// Registers a unit whose source is built only when the pipeline reaches
  /// it, for sources that start work the moment they are constructed.
  pub fn register_stream_factory<F, S, T>(&self, factory: F, name: impl Into<String>) -> PreflightResult<()>
  where
    F: FnOnce() -> S + Send + 'static,
    S: Stream<Item = anyhow::Result<T>> + Send + 'static,
    T: Send + 'static,
  {
    self.push(WorkUnit::new(name.into(), factory_operation(factory), None))
  }

  /// Registers a synchronous one-shot unit. It runs when the pipeline
  /// reaches it; an `Err` return is routed exactly like an asynchronous
  /// unit's failure, never rethrown at the subscriber.
  pub fn register_action<A>(&self, action: A, name: impl Into<String>) -> PreflightResult<()>
  where
    A: FnOnce() -> anyhow::Result<()> + Send + 'static,
  {
    self.push(WorkUnit::new(name.into(), action_operation(action), None))
  }

  /// Like `register_action`, with a custom failure-to-message formatter.
  pub fn register_action_with<A, F>(
    &self,
    action: A,
    name: impl Into<String>,
    format_error: F,
  ) -> PreflightResult<()>
  where
    A: FnOnce() -> anyhow::Result<()> + Send + 'static,
    F: Fn(&anyhow::Error) -> String + Send + Sync + 'static,
  {
    self.push(WorkUnit::new(
      name.into(),
      action_operation(action),
      Some(Arc::new(format_error)),
    ))
  }

  /// Returns the shared multicast sequence of load results.
  ///
  /// We have to assume that by the time the returned stream is first
  /// polled, all units have been registered; the first poll seals the
  /// pipeline and starts the run. Subscribing again, before or after the
  /// terminal result, replays the same run without re-executing anything.
  pub fn load(&self) -> LoadStream {
    SharedLoad::subscribe(&self.shared)
  }

  /// Releases the registrar's resources: aborts a still-running pipeline,
  /// abandons the replay buffer and ends every open subscription.
  /// Idempotent, and a no-op after it has run once.
  pub fn dispose(&self) {
    self.shared.dispose();
  }

  fn push(&self, unit: WorkUnit) -> PreflightResult<()> {
    event!(Level::DEBUG, unit_name = %unit.name(), "Registering prerequisite unit.");
    self.shared.push_unit(unit)
  }
}

impl Default for DefaultPrerequisiteRegistrar {
  fn default() -> Self {
    Self::new()
  }
}

impl Drop for DefaultPrerequisiteRegistrar {
  fn drop(&mut self) {
    self.shared.dispose();
  }
}

impl PrerequisiteRegistrar for DefaultPrerequisiteRegistrar {
  fn register_boxed_stream(
    &self,
    source: UnitSource,
    name: String,
    format_error: Option<ErrorFormatter>,
  ) -> PreflightResult<()> {
    self.push(WorkUnit::new(name, stream_operation(source), format_error))
  }

  fn register_boxed_stream_factory(
    &self,
    factory: Box<dyn FnOnce() -> UnitSource + Send + 'static>,
    name: String,
  ) -> PreflightResult<()> {
    self.push(WorkUnit::new(name, factory_operation(factory), None))
  }

  fn register_boxed_action(
    &self,
    action: Box<dyn FnOnce() -> anyhow::Result<()> + Send + 'static>,
    name: String,
    format_error: Option<ErrorFormatter>,
  ) -> PreflightResult<()> {
    self.push(WorkUnit::new(name, action_operation(action), format_error))
  }

  fn load(&self) -> LoadStream {
    SharedLoad::subscribe(&self.shared)
  }
}

// --- Operation adapters ---
//
// Each adapter produces the unit's deferred thunk. Nothing inside the
// returned closure runs until the driver reaches the unit and awaits it.

fn stream_operation<S, T>(source: S) -> UnitOperation
where
  S: Stream<Item = anyhow::Result<T>> + Send + 'static,
  T: Send + 'static,
{
  Box::new(move || {
    Box::pin(async move {
      futures::pin_mut!(source);
      match source.next().await {
        Some(Ok(_)) => Ok(()),
        Some(Err(error)) => Err(error),
        // A source that ends without yielding counts as success.
        None => Ok(()),
      }
    })
  })
}

fn factory_operation<F, S, T>(factory: F) -> UnitOperation
where
  F: FnOnce() -> S + Send + 'static,
  S: Stream<Item = anyhow::Result<T>> + Send + 'static,
  T: Send + 'static,
{
  Box::new(move || {
    Box::pin(async move {
      // The factory itself is deferred: it only runs once the pipeline
      // reaches this unit.
      let source = factory();
      futures::pin_mut!(source);
      match source.next().await {
        Some(Ok(_)) => Ok(()),
        Some(Err(error)) => Err(error),
        None => Ok(()),
      }
    })
  })
}

fn action_operation<A>(action: A) -> UnitOperation
where
  A: FnOnce() -> anyhow::Result<()> + Send + 'static,
{
  Box::new(move || Box::pin(async move { action() }))
}
