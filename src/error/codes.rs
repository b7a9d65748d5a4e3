//! Standardized error codes for machine-parseable output.
//!
//! Error codes follow a numeric taxonomy:
//! - 1xx: Skill map errors
//! - 3xx: Config errors
//! - 6xx: Storage errors
//! - 9xx: Internal errors

use serde::{Deserialize, Serialize};

/// Standardized error codes for robot mode output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // ========================================
    // Skill map errors (1xx)
    // ========================================
    /// E101: Requested map is not in the loaded documents
    MapNotFound,
    /// E102: Requested activity is not in its map
    ActivityNotFound,
    /// E103: Map document could not be parsed
    MapParseError,

    // ========================================
    // Config errors (3xx)
    // ========================================
    /// E302: Config file has invalid syntax or values
    ConfigInvalid,
    /// E304: Required config value is missing
    ConfigMissingRequired,

    // ========================================
    // Storage errors (6xx)
    // ========================================
    /// E601: Failed to read from storage
    StorageReadError,
    /// E602: Failed to write to storage
    StorageWriteError,
    /// E605: Serialization/deserialization failed
    SerializationError,

    // ========================================
    // Internal errors (9xx)
    // ========================================
    /// E906: IO operation failed
    IoError,
}

impl ErrorCode {
    /// Get the numeric error code (e.g., `MapNotFound` -> 101).
    #[must_use]
    pub const fn numeric(&self) -> u16 {
        match self {
            Self::MapNotFound => 101,
            Self::ActivityNotFound => 102,
            Self::MapParseError => 103,

            Self::ConfigInvalid => 302,
            Self::ConfigMissingRequired => 304,

            Self::StorageReadError => 601,
            Self::StorageWriteError => 602,
            Self::SerializationError => 605,

            Self::IoError => 906,
        }
    }

    /// Get the error code as a formatted string (e.g., "E101").
    #[must_use]
    pub fn code_string(&self) -> String {
        format!("E{}", self.numeric())
    }

    /// Get the default suggestion for this error code.
    #[must_use]
    pub const fn suggestion(&self) -> &'static str {
        match self {
            Self::MapNotFound => "Run `skillmap status --maps <file>` to list the maps in the document",
            Self::ActivityNotFound => "Check the activity id against the map's `activities` table",
            Self::MapParseError => "The map document must be a JSON array or object of skill maps",

            Self::ConfigInvalid => "Check TOML syntax in the config file and SKILLMAP_* environment values",
            Self::ConfigMissingRequired => "Pass the value on the command line or set it in config.toml",

            Self::StorageReadError => "Check the path and read permissions of the maps or progress file",
            Self::StorageWriteError => "Check disk space and write permissions on the progress directory",
            Self::SerializationError => "The data format may be corrupted. Check input data for validity",

            Self::IoError => "File operation failed. Check path exists and permissions are correct",
        }
    }

    /// Check if this error is potentially recoverable by the user.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        !matches!(self, Self::SerializationError)
    }

    /// Get the error category name.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self.numeric() / 100 {
            1 => "map",
            3 => "config",
            6 => "storage",
            9 => "internal",
            _ => "unknown",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code_string())
    }
}
