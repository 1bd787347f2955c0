//! Configuration for runway
//!
//! This crate turns the CI runner's named inputs and environment into the
//! typed, immutable configuration the pipeline runs from.

pub mod ci_env;
pub mod config;
pub mod inputs;
pub mod loader;


pub use ci_env::CiEnvironment;
pub use config::*;
pub use inputs::ActionInputs;
pub use loader::ConfigLoader;
