// preflight/src/registrar/share.rs

//! The shared, multicast, replay-capable execution state behind `load()`.
//!
//! One `SharedLoad` exists per registrar. It is a small state machine,
//! `Registering -> Running -> Terminal`, guarded by a `parking_lot::Mutex`.
//! The driver task is the only writer of load results; subscribers are
//! cursor-based readers of the replay buffer. Locks are held only for
//! short, non-awaiting critical sections.

use crate::core::result::LoadResult;
use crate::core::unit::WorkUnit;
use crate::error::{PreflightError, PreflightResult};
use crate::registrar::execution;

use futures::Stream;
use parking_lot::Mutex;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll, Waker};
use tracing::{event, Level};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoadPhase {
  /// Units may still be appended; nothing has run.
  Registering,
  /// The driver task owns the unit list and is emitting results.
  Running,
  /// The run finished (or the registrar was disposed); the buffer only
  /// replays from here on.
  Terminal,
}

struct LoadState {
  phase: LoadPhase,
  // Append-only while Registering; drained when the driver starts.
  units: Vec<WorkUnit>,
  // Full history of emitted results. Replaying the whole run is strictly
  // compatible with the minimum guarantee of replaying the terminal event.
  buffer: Vec<LoadResult>,
  wakers: Vec<Waker>,
  driver: Option<tokio::task::JoinHandle<()>>,
  disposed: bool,
}

pub(crate) struct SharedLoad {
  state: Mutex<LoadState>,
}

impl SharedLoad {
  pub(crate) fn new() -> Arc<Self> {
    Arc::new(Self {
      state: Mutex::new(LoadState {
        phase: LoadPhase::Registering,
        units: Vec::new(),
        buffer: Vec::new(),
        wakers: Vec::new(),
        driver: None,
        disposed: false,
      }),
    })
  }

  /// Appends a unit, failing once the pipeline is sealed or disposed.
  pub(crate) fn push_unit(&self, unit: WorkUnit) -> PreflightResult<()> {
    let mut state = self.state.lock();
    if state.disposed {
      return Err(PreflightError::Disposed {
        unit_name: unit.name().to_string(),
      });
    }
    match state.phase {
      LoadPhase::Registering => {
        state.units.push(unit);
        Ok(())
      }
      _ => Err(PreflightError::PipelineSealed {
        unit_name: unit.name().to_string(),
      }),
    }
  }

  pub(crate) fn subscribe(this: &Arc<Self>) -> LoadStream {
    LoadStream {
      shared: Arc::clone(this),
      cursor: 0,
    }
  }

  /// Starts the driver task on the first subscriber poll. No-op once the
  /// pipeline left the Registering phase.
  fn ensure_started(this: &Arc<Self>) {
    let mut state = this.state.lock();
    if state.phase != LoadPhase::Registering {
      return;
    }
    let units = std::mem::take(&mut state.units);
    state.phase = LoadPhase::Running;
    event!(
      Level::DEBUG,
      total_units = units.len(),
      "First subscriber polled, starting the load pipeline."
    );
    // tokio::spawn only schedules; holding the lock across it is fine.
    state.driver = Some(tokio::spawn(execution::drive(Arc::clone(this), units)));
  }

  /// Called by the driver for every emitted result.
  pub(crate) fn publish(&self, result: LoadResult) {
    let wakers = {
      let mut state = self.state.lock();
      if state.disposed {
        return;
      }
      state.buffer.push(result);
      std::mem::take(&mut state.wakers)
    };
    // Wake outside the lock so woken subscribers can re-poll immediately.
    for waker in wakers {
      waker.wake();
    }
  }

  /// Called by the driver exactly once, after the last result.
  pub(crate) fn finish(&self) {
    let wakers = {
      let mut state = self.state.lock();
      if state.disposed {
        return;
      }
      state.phase = LoadPhase::Terminal;
      std::mem::take(&mut state.wakers)
    };
    for waker in wakers {
      waker.wake();
    }
  }

  /// Idempotent teardown: aborts a running driver, abandons the replay
  /// buffer and ends every subscriber.
  pub(crate) fn dispose(&self) {
    let (driver, wakers) = {
      let mut state = self.state.lock();
      if state.disposed {
        return;
      }
      state.disposed = true;
      state.phase = LoadPhase::Terminal;
      state.units.clear();
      state.buffer.clear();
      (state.driver.take(), std::mem::take(&mut state.wakers))
    };
    if let Some(handle) = driver {
      // Aborting at an await point abandons the in-flight unit; disposal is
      // the only way to interrupt a run.
      handle.abort();
    }
    for waker in wakers {
      waker.wake();
    }
  }
}

/// One subscription to the shared load run, returned by `load()`.
///
/// The first poll of any `LoadStream` starts the run; every stream observes
/// the same execution. A stream created (or polled again) after the run
/// reached its terminal state replays the buffered results and then ends.
/// Unit failures arrive as `Error`-stage items; the stream itself always
/// completes normally.
///
/// Polling requires a tokio runtime context, since the run executes on a
/// spawned task.
pub struct LoadStream {
  shared: Arc<SharedLoad>,
  cursor: usize,
}

impl Stream for LoadStream {
  type Item = LoadResult;

  fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<LoadResult>> {
    let this = self.get_mut();
    SharedLoad::ensure_started(&this.shared);

    let mut state = this.shared.state.lock();
    if this.cursor < state.buffer.len() {
      let result = state.buffer[this.cursor].clone();
      this.cursor += 1;
      return Poll::Ready(Some(result));
    }
    if state.phase == LoadPhase::Terminal {
      return Poll::Ready(None);
    }
    if !state.wakers.iter().any(|waker| waker.will_wake(cx.waker())) {
      state.wakers.push(cx.waker().clone());
    }
    Poll::Pending
  }
}

impl std::fmt::Debug for LoadStream {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("LoadStream").field("cursor", &self.cursor).finish()
  }
}
