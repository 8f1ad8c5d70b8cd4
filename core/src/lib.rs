// src/lib.rs

//! Preflight: an ordered, fail-fast, replayable prerequisite load pipeline.
//!
//! Preflight lets a module host register any number of named asynchronous
//! units of work (network calls, timers, one-shot actions) and then observe
//! a single shared load run with features like:
//!  - Strict registration-order execution, one unit at a time.
//!  - Lazily started units: registering work never starts its side effects.
//!  - Fail-fast short-circuit: after the first failure no later unit starts.
//!  - Failures reported as ordinary `Error`-stage data events, never as a
//!    stream error, so consumers branch on `ResultStage` alone.
//!  - Multicast with replay: every `load()` subscriber, however late,
//!    observes the same logical run without re-executing anything.

pub mod core;
pub mod registrar;
pub mod error;

// --- Re-exports for the Public API ---

// Result events emitted by the load pipeline
pub use crate::core::result::{LoadResult, ResultStage};
// The unit-of-work building blocks
pub use crate::core::unit::{ErrorFormatter, UnitFuture, UnitOperation, WorkUnit};
// The narrow registration interface handed to module hosts
pub use crate::core::registrar_trait::{PrerequisiteRegistrar, UnitSource};

// The concrete orchestrator and the subscriber handle returned by `load()`
pub use crate::registrar::definition::DefaultPrerequisiteRegistrar;
pub use crate::registrar::share::LoadStream;

pub use crate::error::{PreflightError, PreflightResult};

/*
    Core Workflow:
    1. Create a `DefaultPrerequisiteRegistrar`.
    2. Register units in the order they must run:
       - `register_stream(stream, name)` for an asynchronous source whose
         first item (or completion) decides the outcome.
       - `register_stream_factory(factory, name)` when even building the
         source must wait until the pipeline reaches it.
       - `register_action(action, name)` for a synchronous one-shot.
    3. Hand the registrar to module code as `&dyn PrerequisiteRegistrar`
       (or `Arc<dyn PrerequisiteRegistrar>`) so it can only register/load.
    4. Call `load()` and poll the returned stream; the run starts on the
       first poll and is shared by every subscriber.
    5. Branch on `ResultStage`: a terminal `Error` event means the module
       failed to load; stream completion without one means it is ready.
    6. Call `dispose()` (or drop the registrar) when tearing the module down.
*/
