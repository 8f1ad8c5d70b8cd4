// preflight/src/registrar/execution.rs

//! Contains the driver loop: the single task that runs registered units
//! strictly in order and publishes their results to the shared state.

use crate::core::result::LoadResult;
use crate::core::unit::WorkUnit;
use crate::registrar::share::SharedLoad;
use std::sync::Arc;
use tracing::{event, span, Instrument, Level};

/// Runs every unit in registration order, one at a time.
///
/// For each unit: a `Starting` result is published, then the operation is
/// built and awaited, then either `Completed` or `Error` is published. A
/// failure is converted into an `Error`-stage data event rather than
/// propagated, and ends the run: units after it are never built, so their
/// side effects never happen.
pub(crate) async fn drive(shared: Arc<SharedLoad>, units: Vec<WorkUnit>) {
  event!(
    Level::DEBUG,
    total_units = units.len(),
    "Load pipeline execution starting."
  );

  for (unit_index, unit) in units.into_iter().enumerate() {
    let unit_span = span!(Level::INFO, "prerequisite_load", unit_name = %unit.name, unit_index);
    shared.publish(LoadResult::starting(&unit.name));

    // The operation thunk is invoked here and nowhere else; unit k+1 is not
    // reached until unit k's outcome has been published.
    let outcome = (unit.operation)().instrument(unit_span).await;

    match outcome {
      Ok(()) => {
        event!(Level::DEBUG, unit_name = %unit.name, "Prerequisite completed.");
        shared.publish(LoadResult::completed(&unit.name));
      }
      Err(error) => {
        event!(Level::ERROR, unit_name = %unit.name, error = %error, "Error in async load for unit.");
        let message = (unit.format_error)(&error);
        shared.publish(LoadResult::failed(&unit.name, message));
        // First failure is terminal for the whole run.
        shared.finish();
        return;
      }
    }
  }

  event!(Level::DEBUG, "Load pipeline completed with no failures.");
  shared.finish();
}
