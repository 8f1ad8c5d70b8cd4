// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use once_cell::sync::Lazy;
use preflight::{LoadResult, ResultStage};
use tracing::Level;

// --- Live source helpers ---

pub type UnitSender = UnboundedSender<anyhow::Result<()>>;
pub type UnitReceiver = UnboundedReceiver<anyhow::Result<()>>;

/// The test analog of a live asynchronous source: the test side decides the
/// unit's outcome by pushing `Ok`, pushing `Err`, or dropping the sender
/// (which ends the source with no items).
pub fn live_source() -> (UnitSender, UnitReceiver) {
  mpsc::unbounded()
}

// --- Assertions ---

pub fn assert_stage(result: &LoadResult, stage: ResultStage, name: &str) {
  assert_eq!(result.stage, stage, "unexpected stage for {:?}", result);
  assert_eq!(result.name, name, "unexpected unit name for {:?}", result);
}

// --- Helper for Tracing Setup (call once per test run if needed) ---
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
