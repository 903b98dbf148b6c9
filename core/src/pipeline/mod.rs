// hookpipe/src/pipeline/mod.rs

//! Defines the `Pipeline` struct, its construction, registration and execution logic.

pub mod definition;
pub mod execution;
pub mod hooks;

// Re-export the main Pipeline struct
pub use definition::{option_fn, AfterExecuteFn, BeforeExecuteFn, OnErrorFn, OptionConfigurator, Pipeline};
