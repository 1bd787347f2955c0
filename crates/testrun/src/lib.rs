//! Test-runner argument construction

pub mod args;

pub use args::{build_test_args, TestOption};
