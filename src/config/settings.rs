// src/config/settings.rs
use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::render::template::DEFAULT_FRAME_NAME;

pub const APP_DIR: &str = "statguide";
const SETTINGS_FILE: &str = "settings.ron";
const ENV_PREFIX: &str = "STATGUIDE";

/// How free-text titles are matched against the catalog.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(into = "String", try_from = "String")]
pub enum MatchPolicy {
    #[default]
    Fuzzy,
    Exact,
}

/// What happens to a variable pick when the column it names disappears.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(into = "String", try_from = "String")]
pub enum SelectionPolicy {
    #[default]
    Preserve,
    ClearStale,
}

// Policies are stored as plain strings so RON files and environment
// variables spell them the same way.
impl From<MatchPolicy> for String {
    fn from(policy: MatchPolicy) -> Self {
        match policy {
            MatchPolicy::Fuzzy => "fuzzy".to_string(),
            MatchPolicy::Exact => "exact".to_string(),
        }
    }
}

impl TryFrom<String> for MatchPolicy {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "fuzzy" => Ok(MatchPolicy::Fuzzy),
            "exact" => Ok(MatchPolicy::Exact),
            other => Err(format!("unknown match policy \"{}\" (expected fuzzy or exact)", other)),
        }
    }
}

impl From<SelectionPolicy> for String {
    fn from(policy: SelectionPolicy) -> Self {
        match policy {
            SelectionPolicy::Preserve => "preserve".to_string(),
            SelectionPolicy::ClearStale => "clear_stale".to_string(),
        }
    }
}

impl TryFrom<String> for SelectionPolicy {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "preserve" => Ok(SelectionPolicy::Preserve),
            "clear_stale" => Ok(SelectionPolicy::ClearStale),
            other => Err(format!("unknown selection policy \"{}\" (expected preserve or clear_stale)", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    pub catalog_path: PathBuf,
    pub default_frame_name: String,
    pub match_policy: MatchPolicy,
    pub selection_policy: SelectionPolicy,
    pub export_dir: PathBuf,
    pub log_level: String,
    pub log_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from("data/catalog.json"),
            default_frame_name: DEFAULT_FRAME_NAME.to_string(),
            match_policy: MatchPolicy::Fuzzy,
            selection_policy: SelectionPolicy::Preserve,
            export_dir: PathBuf::from("."),
            log_level: "info".to_string(),
            log_file: default_log_file(),
        }
    }
}

pub fn default_settings_file() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(SETTINGS_FILE))
}

fn default_log_file() -> Option<PathBuf> {
    dirs::data_local_dir().map(|dir| dir.join(APP_DIR).join("statguide.log"))
}

impl Settings {
    /// Layers built-in defaults, the per-user settings file, an explicit file
    /// and `STATGUIDE_*` environment variables, in that order.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let user_file = default_settings_file();
        Self::load_from(user_file.as_deref(), explicit, true)
    }

    fn load_from(user_file: Option<&Path>, explicit: Option<&Path>, use_env: bool) -> Result<Self> {
        let defaults = Settings::default();
        let mut builder = Config::builder()
            .set_default("catalog_path", defaults.catalog_path.to_string_lossy().into_owned())?
            .set_default("default_frame_name", defaults.default_frame_name.clone())?
            .set_default("match_policy", "fuzzy")?
            .set_default("selection_policy", "preserve")?
            .set_default("export_dir", defaults.export_dir.to_string_lossy().into_owned())?
            .set_default("log_level", defaults.log_level.clone())?;

        if let Some(log_file) = &defaults.log_file {
            builder = builder.set_default("log_file", log_file.to_string_lossy().into_owned())?;
        }

        if let Some(path) = user_file {
            builder = builder.add_source(
                File::from(path.to_path_buf()).format(FileFormat::Ron).required(false)
            );
        }

        if let Some(path) = explicit {
            builder = builder.add_source(
                File::from(path.to_path_buf()).format(FileFormat::Ron).required(true)
            );
        }

        if use_env {
            builder = builder.add_source(Environment::with_prefix(ENV_PREFIX));
        }

        let settings: Settings = builder
            .build()
            .context("Failed to read settings")?
            .try_deserialize()
            .context("Failed to parse settings")?;

        Ok(settings.sanitized())
    }

    fn sanitized(mut self) -> Self {
        if self.default_frame_name.trim().is_empty() {
            self.default_frame_name = DEFAULT_FRAME_NAME.to_string();
        }
        self
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let content = ron::ser::to_string_pretty(
            self,
            ron::ser::PrettyConfig::new()
                .new_line("\n".to_string())
                .depth_limit(4)
        )?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write settings to {}", path.display()))?;
        Ok(())
    }
}
