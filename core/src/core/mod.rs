pub mod registrar_trait;
pub mod result;
pub mod unit;

// Re-export key types for easier access from other preflight modules (and lib.rs)
pub use registrar_trait::{PrerequisiteRegistrar, UnitSource};
pub use result::{LoadResult, ResultStage};
pub use unit::{ErrorFormatter, UnitFuture, UnitOperation, WorkUnit};
