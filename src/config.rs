use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SkillMapError};
use crate::state::DEFAULT_SOURCE_URL;

/// Name of the per-project config directory.
pub const PROJECT_DIR: &str = ".skillmap";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Layer defaults, then either the explicit file (`--config` or
    /// `SKILLMAP_CONFIG`) or the global and project files, then env overrides.
    pub fn load(explicit_path: Option<&Path>, project_root: &Path) -> Result<Self> {
        let mut config = Self::default();

        let explicit = explicit_path
            .map(PathBuf::from)
            .or_else(|| std::env::var("SKILLMAP_CONFIG").ok().map(PathBuf::from));

        if let Some(path) = explicit {
            if let Some(patch) = Self::load_patch(&path)? {
                config.merge_patch(patch);
            }
        } else {
            if let Some(global) = Self::load_global()? {
                config.merge_patch(global);
            }
            if let Some(project) = Self::load_project(project_root)? {
                config.merge_patch(project);
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    fn load_global() -> Result<Option<ConfigPatch>> {
        let Some(dir) = dirs::config_dir() else {
            return Ok(None);
        };
        Self::load_patch(&dir.join("skillmap/config.toml"))
    }

    fn load_project(project_root: &Path) -> Result<Option<ConfigPatch>> {
        let path = project_root.join(PROJECT_DIR).join("config.toml");
        Self::load_patch(&path)
    }

    fn load_patch(path: &Path) -> Result<Option<ConfigPatch>> {
        if !path.exists() {
            return Ok(None);
        }

        let raw = std::fs::read_to_string(path).map_err(|err| {
            SkillMapError::Config(format!("read config {}: {err}", path.display()))
        })?;
        let patch = toml::from_str(&raw).map_err(|err| {
            SkillMapError::Config(format!("parse config {}: {err}", path.display()))
        })?;
        Ok(Some(patch))
    }

    fn merge_patch(&mut self, patch: ConfigPatch) {
        if let Some(patch) = patch.source {
            self.source.merge(patch);
        }
        if let Some(patch) = patch.storage {
            self.storage.merge(patch);
        }
        if let Some(patch) = patch.output {
            self.output.merge(patch);
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Some(value) = env_string("SKILLMAP_SOURCE_URL") {
            self.source.page_source_url = value;
        }
        if let Some(values) = env_list("SKILLMAP_ALTERNATE_URLS") {
            self.source.alternate_urls = merge_unique(values, &self.source.alternate_urls);
        }

        if let Some(value) = env_string("SKILLMAP_USER_PATH") {
            self.storage.user_path = Some(PathBuf::from(value));
        }
        if let Some(value) = env_string("SKILLMAP_MAPS_PATH") {
            self.storage.maps_path = Some(PathBuf::from(value));
        }

        if let Some(value) = env_string("SKILLMAP_OUTPUT_FORMAT") {
            self.output.format = value;
        }
        if env_bool("SKILLMAP_ROBOT").unwrap_or(false) {
            self.output.format = OutputConfig::JSON.to_string();
        }
    }

    fn validate(&self) -> Result<()> {
        if self.source.page_source_url.trim().is_empty() {
            return Err(SkillMapError::Config(
                "source.page_source_url must not be empty".to_string(),
            ));
        }
        if !matches!(
            self.output.format.as_str(),
            OutputConfig::HUMAN | OutputConfig::JSON
        ) {
            return Err(SkillMapError::Config(format!(
                "output.format must be \"human\" or \"json\", got {:?}",
                self.output.format
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigPatch {
    source: Option<SourcePatch>,
    storage: Option<StoragePatch>,
    output: Option<OutputPatch>,
}

/// Which page source progress is recorded under.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_source_url")]
    pub page_source_url: String,
    /// Earlier URLs of the same document; progress recorded under them is
    /// copied forward on load.
    #[serde(default)]
    pub alternate_urls: Vec<String>,
}

fn default_source_url() -> String {
    DEFAULT_SOURCE_URL.to_string()
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            page_source_url: default_source_url(),
            alternate_urls: Vec::new(),
        }
    }
}

impl SourceConfig {
    fn merge(&mut self, patch: SourcePatch) {
        if let Some(value) = patch.page_source_url {
            self.page_source_url = value;
        }
        if let Some(values) = patch.alternate_urls {
            self.alternate_urls = values;
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct SourcePatch {
    page_source_url: Option<String>,
    alternate_urls: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Learner record; defaults to `<data_dir>/skillmap/user.json`.
    #[serde(default)]
    pub user_path: Option<PathBuf>,
    /// Skill map document used when `--maps` is not given.
    #[serde(default)]
    pub maps_path: Option<PathBuf>,
}

impl StorageConfig {
    pub fn resolved_user_path(&self) -> PathBuf {
        if let Some(path) = &self.user_path {
            return path.clone();
        }
        dirs::data_dir()
            .map(|dir| dir.join("skillmap"))
            .unwrap_or_else(|| PathBuf::from(PROJECT_DIR))
            .join("user.json")
    }

    fn merge(&mut self, patch: StoragePatch) {
        if let Some(value) = patch.user_path {
            self.user_path = Some(value);
        }
        if let Some(value) = patch.maps_path {
            self.maps_path = Some(value);
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct StoragePatch {
    user_path: Option<PathBuf>,
    maps_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_format")]
    pub format: String,
}

impl OutputConfig {
    pub const HUMAN: &'static str = "human";
    pub const JSON: &'static str = "json";

    pub fn is_json(&self) -> bool {
        self.format == Self::JSON
    }

    fn merge(&mut self, patch: OutputPatch) {
        if let Some(value) = patch.format {
            self.format = value;
        }
    }
}

fn default_output_format() -> String {
    OutputConfig::HUMAN.to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_output_format(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct OutputPatch {
    format: Option<String>,
}

/// Whether the environment alone selects JSON output.
pub fn env_requests_json() -> bool {
    env_bool("SKILLMAP_ROBOT").unwrap_or(false)
        || env_string("SKILLMAP_OUTPUT_FORMAT").is_some_and(|format| format == OutputConfig::JSON)
}

fn merge_unique(values: Vec<String>, existing: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for value in values.into_iter().chain(existing.iter().cloned()) {
        if seen.insert(value.clone()) {
            out.push(value);
        }
    }
    out
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn env_bool(key: &str) -> Option<bool> {
    std::env::var(key).ok().map(|value| {
        matches!(
            value.to_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        )
    })
}

fn env_list(key: &str) -> Option<Vec<String>> {
    std::env::var(key).ok().map(|value| {
        value
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(str::to_string)
            .collect()
    })
}
