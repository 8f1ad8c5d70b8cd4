// preflight/src/core/unit.rs

//! Defines the structure for a single registered unit of work.

use futures::future::BoxFuture;
use std::sync::Arc;

/// The in-flight shape of a unit's operation: a boxed future resolving to
/// success or a user-level failure.
pub type UnitFuture = BoxFuture<'static, anyhow::Result<()>>;

/// A unit's deferred operation. The thunk is invoked at most once, and only
/// when the pipeline reaches the unit; nothing the unit does may run before
/// that point.
pub type UnitOperation = Box<dyn FnOnce() -> UnitFuture + Send + 'static>;

// Type alias for the error formatter closure.
// Uses Arc to be easily cloneable and shareable.
pub type ErrorFormatter = Arc<dyn Fn(&anyhow::Error) -> String + Send + Sync + 'static>;

/// One named, lazily-started unit of prerequisite work.
pub struct WorkUnit {
  pub(crate) name: String,
  pub(crate) operation: UnitOperation,
  // Maps the operation's failure into a user-facing message.
  pub(crate) format_error: ErrorFormatter,
}

impl WorkUnit {
  pub(crate) fn new(name: String, operation: UnitOperation, format_error: Option<ErrorFormatter>) -> Self {
    Self {
      name,
      operation,
      // Default to the failure's own message, like the operation raised it.
      format_error: format_error.unwrap_or_else(|| Arc::new(|error: &anyhow::Error| error.to_string())),
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }
}

// UnitOperation (Box<dyn FnOnce...>) doesn't implement Debug.
// We provide a placeholder debug output.
impl std::fmt::Debug for WorkUnit {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("WorkUnit").field("name", &self.name).finish()
  }
}
