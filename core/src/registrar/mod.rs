// preflight/src/registrar/mod.rs

//! Defines the `DefaultPrerequisiteRegistrar`, its registration surface,
//! the shared multicast execution state and the driver loop.

pub mod definition;
pub mod execution;
pub mod share;

// Re-export the main entry points
pub use definition::DefaultPrerequisiteRegistrar;
pub use share::LoadStream;
