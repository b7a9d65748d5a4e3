//! Integration suite entry point.

mod persistence_tests;
mod scenario_tests;
