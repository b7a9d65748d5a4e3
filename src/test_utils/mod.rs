//! Shared test utilities for skillmap.

pub mod fixtures;

#[cfg(test)]
pub mod arbitrary;
