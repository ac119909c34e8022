use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::app_dirs::AppDirs;
use crate::error::{Error, Result};
use crate::input::ActionKey;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

/// Preferences stored on disk. Results are never stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub action_key: String,
    pub theme: Theme,
    pub mouse: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            action_key: "space".to_string(),
            theme: Theme::Dark,
            mouse: true,
        }
    }
}

/// Validated settings the app runs with
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settings {
    pub action_key: ActionKey,
    pub theme: Theme,
    pub mouse: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            action_key: ActionKey::default(),
            theme: Theme::default(),
            mouse: true,
        }
    }
}

impl TryFrom<&Config> for Settings {
    type Error = Error;

    fn try_from(cfg: &Config) -> Result<Self> {
        Ok(Self {
            action_key: cfg.action_key.parse()?,
            theme: cfg.theme,
            mouse: cfg.mouse,
        })
    }
}

pub trait ConfigStore {
    fn load(&self) -> Result<Config>;
    fn save(&self, cfg: &Config) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = AppDirs::config_path().unwrap_or_else(|| PathBuf::from("lightsout_config.json"));
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    /// A missing file yields the defaults; a malformed one is an error.
    fn load(&self) -> Result<Config> {
        match fs::read(&self.path) {
            Ok(bytes) => serde_json::from_slice::<Config>(&bytes).map_err(|source| Error::Config {
                path: self.path.clone(),
                source,
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Config::default()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, cfg: &Config) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).map_err(|source| Error::Config {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}
