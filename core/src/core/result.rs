// preflight/src/core/result.rs

//! Defines the progress events emitted by a load run.

/// Stage of a single unit's life within a load run.
///
/// `Completed` and `Error` are terminal for the unit that emitted them;
/// only `Error` is terminal for the pipeline as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultStage {
  /// The unit's operation is about to start.
  Starting,
  /// The unit's operation signalled success.
  Completed,
  /// The unit's operation signalled failure. No later unit will run.
  Error,
}

/// One progress event of a load run, tagged with the unit's name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadResult {
  pub stage: ResultStage,
  pub name: String,
  /// Present only when `stage == ResultStage::Error`.
  pub error_message: Option<String>,
}

impl LoadResult {
  pub(crate) fn starting(name: &str) -> Self {
    Self {
      stage: ResultStage::Starting,
      name: name.to_string(),
      error_message: None,
    }
  }

  pub(crate) fn completed(name: &str) -> Self {
    Self {
      stage: ResultStage::Completed,
      name: name.to_string(),
      error_message: None,
    }
  }

  pub(crate) fn failed(name: &str, message: impl Into<String>) -> Self {
    Self {
      stage: ResultStage::Error,
      name: name.to_string(),
      error_message: Some(message.into()),
    }
  }

  /// True when this event carries a unit failure.
  pub fn is_error(&self) -> bool {
    self.stage == ResultStage::Error
  }
}
