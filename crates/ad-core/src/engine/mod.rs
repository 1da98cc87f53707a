pub mod builder;
pub mod core;

pub use builder::PipelineBuilder;
pub use core::{PipelineEngine, RunOutcome};
