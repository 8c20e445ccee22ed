use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::error::ConfigError;
use crate::persist::RecoveryPolicy;
use crate::stopwatch::EngineOptions;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub tick_interval_ms: u64,
    pub checkpoint_interval_ms: u64,
    pub recovery_policy: RecoveryPolicy,
    pub state_db: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_interval_ms: 10,
            checkpoint_interval_ms: 1_000,
            recovery_policy: RecoveryPolicy::Isolated,
            state_db: None,
        }
    }
}

impl Config {
    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            checkpoint_interval_ms: self.checkpoint_interval_ms,
        }
    }
}

pub trait ConfigStore {
    fn try_load(&self) -> Result<Option<Config>, ConfigError>;
    fn save(&self, cfg: &Config) -> Result<(), ConfigError>;

    /// Missing or broken config falls back to defaults
    fn load(&self) -> Config {
        match self.try_load() {
            Ok(Some(cfg)) => cfg,
            Ok(None) => Config::default(),
            Err(err) => {
                warn!(error = %err, "using default config");
                Config::default()
            }
        }
    }

    /// Like [`ConfigStore::load`], but writes the defaults out when no
    /// config exists yet. A broken file is left for the user to fix.
    fn load_or_create(&self) -> Config {
        match self.try_load() {
            Ok(Some(cfg)) => cfg,
            Ok(None) => {
                let cfg = Config::default();
                if let Err(err) = self.save(&cfg) {
                    warn!(error = %err, "could not write default config");
                }
                cfg
            }
            Err(err) => {
                warn!(error = %err, "using default config");
                Config::default()
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "chronotrack") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("chronotrack_config.json")
        };
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
    fn try_load(&self) -> Result<Option<Config>, ConfigError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        serde_json::from_slice::<Config>(&bytes)
            .map(Some)
            .map_err(|source| ConfigError::Malformed {
                path: self.path.clone(),
                source,
            })
    }

    fn save(&self, cfg: &Config) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let data = serde_json::to_vec_pretty(cfg).map_err(|source| ConfigError::Malformed {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, data).map_err(io_err)
    }
}
