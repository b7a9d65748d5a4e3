//! File persistence for learner records and skill map documents.
//!
//! The learner record is stored as a single JSON document and replaced
//! atomically on save. Maps are read-only content.

pub mod maps;
pub mod user;

pub use maps::{MapDocument, load_maps, parse_maps};
pub use user::UserStore;
