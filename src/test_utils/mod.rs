//! Shared test utilities for modkit.

pub mod fixtures;
#[cfg(test)]
pub mod keys;
