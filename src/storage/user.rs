use std::io::Write;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::core::progress::UserState;
use crate::error::{Result, SkillMapError};

/// JSON file holding one learner record.
///
/// Loading returns the raw document so that older schemas can be upgraded
/// by the reducer; saving always writes the current schema.
#[derive(Debug, Clone)]
pub struct UserStore {
    path: PathBuf,
}

impl UserStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw persisted record, or `None` when nothing has been saved yet.
    pub fn load_raw(&self) -> Result<Option<Value>> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no saved user record");
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&self.path).map_err(|err| {
            SkillMapError::StorageRead(format!("read user {}: {err}", self.path.display()))
        })?;
        if contents.trim().is_empty() {
            return Ok(None);
        }
        let value = serde_json::from_str(&contents)?;
        Ok(Some(value))
    }

    /// Write the record through a temp file in the same directory, then
    /// rename it over the target.
    pub fn save(&self, user: &UserState) -> Result<()> {
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&parent).map_err(|err| {
            SkillMapError::Storage(format!("create user dir {}: {err}", parent.display()))
        })?;

        let rendered = serde_json::to_string_pretty(user)?;
        let mut tmp = NamedTempFile::new_in(&parent)?;
        tmp.write_all(rendered.as_bytes())?;
        tmp.flush()?;
        tmp.persist(&self.path).map_err(|err| {
            SkillMapError::Storage(format!("write user {}: {}", self.path.display(), err.error))
        })?;

        info!(path = %self.path.display(), user = %user.id, "user saved");
        Ok(())
    }
}
