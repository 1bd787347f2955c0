//! Core domain types, errors, and constants for `runway`.
//!
//! ## Key Components
//!
//! - **`errors`**: the `Error` enum and `Result` alias shared by every crate.
//! - **`types`**: the per-run data model (cache descriptors, command specs,
//!   parallel run identities, artifact manifests).
//! - **`exports`**: the append-only environment handed to child processes.
//! - **`constants`**: environment variable names and defaults.

pub mod constants;
pub mod errors;
pub mod exports;
pub mod types;

pub use self::{
    constants::*,
    errors::{Error, Result},
    exports::EnvExports,
    types::*,
};
