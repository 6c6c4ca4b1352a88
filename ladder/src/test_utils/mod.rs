//! Test utilities
//!
//! Manual mock implementations and test fixtures for unit testing.
//! Every service is generic over its repositories, so tests wire these
//! in-memory versions in place of a real store.

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
