// preflight/src/core/registrar_trait.rs

//! Defines the `PrerequisiteRegistrar` trait, the narrow registration
//! interface a module host hands to module code.

use crate::core::unit::ErrorFormatter;
use crate::error::PreflightResult;
use crate::registrar::share::LoadStream;
use futures::stream::BoxStream;

/// A boxed asynchronous source registered as one unit of work.
///
/// Only the source's first item matters: the first `Ok` completes the unit,
/// the first `Err` fails it, and end-of-stream with no items counts as
/// success. Later items are ignored.
pub type UnitSource = BoxStream<'static, anyhow::Result<()>>;

/// Type-erased registration interface for prerequisite work.
///
/// Module code receives this (typically as `Arc<dyn PrerequisiteRegistrar>`)
/// during module wiring, registers its load prerequisites, and never sees
/// the concrete orchestrator. All registrations must happen before the
/// stream returned by `load()` is first polled; afterwards they are
/// rejected.
///
/// The boxed signatures keep the trait object-safe. Callers holding the
/// concrete `DefaultPrerequisiteRegistrar` can use its generic inherent
/// methods instead and avoid boxing by hand.
pub trait PrerequisiteRegistrar: Send + Sync {
  /// Appends a lazily-started asynchronous unit to the pipeline.
  fn register_boxed_stream(
    &self,
    source: UnitSource,
    name: String,
    format_error: Option<ErrorFormatter>,
  ) -> PreflightResult<()>;

  /// Appends a unit whose source is built only when the pipeline reaches it.
  fn register_boxed_stream_factory(
    &self,
    factory: Box<dyn FnOnce() -> UnitSource + Send + 'static>,
    name: String,
  ) -> PreflightResult<()>;

  /// Appends a synchronous one-shot unit. An `Err` return is routed exactly
  /// like an asynchronous unit's failure.
  fn register_boxed_action(
    &self,
    action: Box<dyn FnOnce() -> anyhow::Result<()> + Send + 'static>,
    name: String,
    format_error: Option<ErrorFormatter>,
  ) -> PreflightResult<()>;

  /// Returns the shared multicast sequence of load results. Calling this
  /// any number of times observes one logical run.
  fn load(&self) -> LoadStream;
}
