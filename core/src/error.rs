// preflight/src/error.rs
use thiserror::Error;

/// Framework-level errors surfaced by registration calls.
///
/// Failures of the registered units themselves are not represented here:
/// they are recovered inside the pipeline and delivered to `load()`
/// subscribers as `Error`-stage `LoadResult` events.
#[derive(Debug, Error)]
pub enum PreflightError {
  #[error("Registration rejected for unit '{unit_name}': the load pipeline has already started")]
  PipelineSealed { unit_name: String },

  #[error("Registration rejected for unit '{unit_name}': the registrar has been disposed")]
  Disposed { unit_name: String },
}

pub type PreflightResult<T, E = PreflightError> = std::result::Result<T, E>;
