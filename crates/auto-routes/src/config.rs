// File: src/config.rs
// Purpose: Configuration parsing from auto-routes.toml

use crate::walker::{WalkOptions, DEFAULT_BATCH_SIZE};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "auto-routes.toml";
pub const VERBOSE_ENV: &str = "AUTO_ROUTES_VERBOSE";

/// Route discovery configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AutoRoutesConfig {
    /// Log every discovery step
    #[serde(default)]
    pub verbose: bool,

    #[serde(default)]
    pub routes: RoutesConfig,

    /// Action discovery runs only when this section is present
    #[serde(default)]
    pub actions: Option<ActionsConfig>,
}

/// Route descriptor folder
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoutesConfig {
    /// Routes root (default: "routes")
    #[serde(default = "default_routes_dir")]
    pub dir: PathBuf,

    /// Modules loaded concurrently per folder (default: 10)
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

/// Action discovery
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActionsConfig {
    /// Tree searched for action folders (default: "src")
    #[serde(default = "default_actions_root")]
    pub root: PathBuf,

    /// Name of the folders holding action files (default: "actions")
    #[serde(default = "default_actions_folder")]
    pub folder: String,
}

fn default_routes_dir() -> PathBuf {
    PathBuf::from("routes")
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

fn default_actions_root() -> PathBuf {
    PathBuf::from("src")
}

fn default_actions_folder() -> String {
    "actions".to_string()
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            dir: default_routes_dir(),
            batch_size: default_batch_size(),
        }
    }
}

impl Default for ActionsConfig {
    fn default() -> Self {
        Self {
            root: default_actions_root(),
            folder: default_actions_folder(),
        }
    }
}

impl AutoRoutesConfig {
    /// Load configuration from a TOML file
    ///
    /// A missing or empty file yields the defaults. `AUTO_ROUTES_VERBOSE`
    /// overrides `verbose` when it parses as a bool.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let mut config = if !path.exists() {
            Self::default()
        } else {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;

            if content.trim().is_empty() {
                Self::default()
            } else {
                toml::from_str(&content)
                    .with_context(|| format!("Failed to parse config file: {:?}", path))?
            }
        };

        config.verbose = verbose_override(std::env::var(VERBOSE_ENV).ok().as_deref(), config.verbose);
        Ok(config)
    }

    /// Load configuration from default path (./auto-routes.toml)
    pub fn load_default() -> Result<Self> {
        Self::load(DEFAULT_CONFIG_FILE)
    }

    pub fn walk_options(&self) -> WalkOptions {
        WalkOptions::default()
            .verbose(self.verbose)
            .batch_size(self.routes.batch_size)
    }
}

fn verbose_override(raw: Option<&str>, current: bool) -> bool {
    raw.and_then(|v| v.trim().parse::<bool>().ok())
        .unwrap_or(current)
}
