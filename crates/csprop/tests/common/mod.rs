//! Shared test utilities for csprop integration tests.

pub mod builders;

pub use builders::*;
