//! Shared utilities and pure functions for runway
//!
//! This crate provides common utility functions that are used throughout
//! the runway workspace. All functions here are designed to be pure and
//! side-effect free where possible; `tracing::init` is the exception.

pub mod paths;
pub mod quoting;
pub mod tracing;

pub use paths::*;
pub use quoting::*;
