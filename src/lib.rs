//! skillmap: the progress engine behind skill maps.
//!
//! Learners move through a DAG of activities; [`state::reduce`] turns each
//! intent into a new [`state::SkillMapState`] and the learner record is
//! persisted as versioned JSON that is upgraded on every load.

pub mod app;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod state;
pub mod storage;
pub mod test_utils;

pub use error::{Result, SkillMapError};

/// Package version from Cargo.toml.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
