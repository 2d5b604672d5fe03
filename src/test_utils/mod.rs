//! Shared helpers for unit tests.

mod common;

pub use common::*;
