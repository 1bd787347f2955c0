pub mod annotation;
pub mod cli;
pub mod pipeline;

pub use annotation::error_annotation;
pub use cli::Cli;
pub use pipeline::{Pipeline, RunOutcome};
