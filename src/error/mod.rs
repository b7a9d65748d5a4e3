//! Error handling for skillmap.
//!
//! The progress core never fails; these errors come from the shell around
//! it (configuration, file storage, the CLI).
//!
//! - [`SkillMapError`]: the main error enum
//! - [`ErrorCode`]: standardized codes for machine parsing
//! - [`StructuredError`]: rich error with suggestion and context for robot mode

mod codes;
mod suggestions;

use std::io;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub use codes::ErrorCode;
pub use suggestions::suggest_for_error;

/// Main error type for skillmap operations.
#[derive(Error, Debug)]
pub enum SkillMapError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Missing required config: {0}")]
    MissingConfig(String),

    #[error("Map not found: {0}")]
    MapNotFound(String),

    #[error("Activity {activity_id} not found in map {map_id}")]
    ActivityNotFound { map_id: String, activity_id: String },

    #[error("Invalid map document: {0}")]
    InvalidMap(String),

    #[error("Storage read error: {0}")]
    StorageRead(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl SkillMapError {
    /// Get the error code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Io(_) => ErrorCode::IoError,
            Self::Json(_) => ErrorCode::SerializationError,
            Self::Config(_) => ErrorCode::ConfigInvalid,
            Self::MissingConfig(_) => ErrorCode::ConfigMissingRequired,
            Self::MapNotFound(_) => ErrorCode::MapNotFound,
            Self::ActivityNotFound { .. } => ErrorCode::ActivityNotFound,
            Self::InvalidMap(_) => ErrorCode::MapParseError,
            Self::StorageRead(_) => ErrorCode::StorageReadError,
            Self::Storage(_) => ErrorCode::StorageWriteError,
            Self::Serialization(_) => ErrorCode::SerializationError,
        }
    }

    /// Get context information for this error as JSON.
    #[must_use]
    pub fn context(&self) -> Option<Value> {
        match self {
            Self::MapNotFound(id) => Some(serde_json::json!({ "map_id": id })),
            Self::ActivityNotFound {
                map_id,
                activity_id,
            } => Some(serde_json::json!({ "map_id": map_id, "activity_id": activity_id })),
            Self::MissingConfig(key) => Some(serde_json::json!({ "config_key": key })),
            _ => None,
        }
    }

    /// Convert this error to a structured error.
    #[must_use]
    pub fn to_structured(&self) -> StructuredError {
        StructuredError::from_error(self)
    }
}

/// A structured error with machine-readable code, suggestion, and context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    /// The error code (e.g., "MAP_NOT_FOUND")
    pub code: ErrorCode,

    /// The numeric error code (e.g., 101)
    pub numeric_code: u16,

    pub message: String,

    /// Actionable suggestion for recovery
    pub suggestion: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,

    pub recoverable: bool,

    /// Error category (e.g., "map", "config", "storage")
    pub category: String,
}

impl StructuredError {
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            numeric_code: code.numeric(),
            suggestion: code.suggestion().to_string(),
            context: None,
            recoverable: code.is_recoverable(),
            category: code.category().to_string(),
            code,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn from_error(err: &SkillMapError) -> Self {
        let code = err.code();
        let context = err.context();
        let suggestion = suggest_for_error(code, context.as_ref());

        Self {
            code,
            numeric_code: code.numeric(),
            message: err.to_string(),
            suggestion,
            context,
            recoverable: code.is_recoverable(),
            category: code.category().to_string(),
        }
    }
}

impl std::fmt::Display for StructuredError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl From<SkillMapError> for StructuredError {
    fn from(err: SkillMapError) -> Self {
        Self::from_error(&err)
    }
}

/// Result type alias using SkillMapError.
pub type Result<T> = std::result::Result<T, SkillMapError>;
