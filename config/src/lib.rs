//! Configuration for the parliament.
//!
//! Read from `~/.parliament/config.toml`. Every section is optional; a missing
//! file means defaults throughout.

use std::path::{Path, PathBuf};
use std::{env, fs, io};

use parliament_types::Constitution;
use serde::Deserialize;
use thiserror::Error;

/// Overrides `[storage] data_dir` when set.
pub const DATA_DIR_ENV: &str = "PARLIAMENT_DATA_DIR";

pub const DEFAULT_WINDOW_DAYS: u32 = 7;

const APP_DIR: &str = ".parliament";

#[derive(Debug, Default, Deserialize)]
pub struct ParliamentConfig {
    pub storage: Option<StorageConfig>,
    pub analytics: Option<AnalyticsConfig>,
    pub emergency: Option<EmergencyConfig>,
    pub constitution: Option<ConstitutionConfig>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid constitution {}: {source}", .path.display())]
    Constitution {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl ConfigError {
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::Constitution { path, .. } => path,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the state file, audit log and lock. `${VAR}` is expanded.
    pub data_dir: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AnalyticsConfig {
    pub window_days: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct EmergencyConfig {
    /// Appended to the built-in keyword list; they never replace it.
    #[serde(default)]
    pub extra_keywords: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ConstitutionConfig {
    pub path: Option<String>,
}

/// Replace `${VAR}` with the variable's value (empty when unset).
///
/// An unclosed `${` is kept literally.
#[must_use]
pub fn expand_env_vars(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            out.push_str(&rest[start..]);
            return out;
        };
        let var = &after[..end];
        if !var.is_empty() {
            out.push_str(&env::var(var).unwrap_or_default());
        }
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    out
}

impl ParliamentConfig {
    /// Load the user config, `Ok(None)` when there is no file.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        match config_path() {
            Some(path) if path.exists() => Self::load_from(&path).map(Some),
            _ => Ok(None),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| {
            tracing::warn!(path = %path.display(), "Failed to read config: {source}");
            ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }
        })?;
        Self::parse(&content).map_err(|source| {
            tracing::warn!(path = %path.display(), "Failed to parse config: {source}");
            ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            }
        })
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }

    /// Where state lives: `$PARLIAMENT_DATA_DIR`, then `[storage] data_dir`,
    /// then `~/.parliament`, then `./.parliament` when there is no home.
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir_with_override(env::var(DATA_DIR_ENV).ok())
    }

    fn data_dir_with_override(&self, env_override: Option<String>) -> PathBuf {
        if let Some(dir) = env_override.filter(|dir| !dir.trim().is_empty()) {
            return PathBuf::from(dir);
        }
        if let Some(dir) = self
            .storage
            .as_ref()
            .and_then(|storage| storage.data_dir.as_deref())
            .map(expand_env_vars)
            .filter(|dir| !dir.trim().is_empty())
        {
            return PathBuf::from(dir);
        }
        default_data_dir()
    }

    #[must_use]
    pub fn window_days(&self) -> u32 {
        self.analytics
            .as_ref()
            .and_then(|analytics| analytics.window_days)
            .filter(|days| *days > 0)
            .unwrap_or(DEFAULT_WINDOW_DAYS)
    }

    #[must_use]
    pub fn extra_keywords(&self) -> &[String] {
        self.emergency
            .as_ref()
            .map_or(&[][..], |emergency| emergency.extra_keywords.as_slice())
    }

    #[must_use]
    pub fn constitution_path(&self) -> Option<PathBuf> {
        self.constitution
            .as_ref()
            .and_then(|constitution| constitution.path.as_deref())
            .map(expand_env_vars)
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from)
    }

    /// Read the configured constitution, if one is configured.
    pub fn load_constitution(&self) -> Result<Option<Constitution>, ConfigError> {
        self.constitution_path()
            .map(|path| load_constitution(&path))
            .transpose()
    }
}

pub fn load_constitution(path: &Path) -> Result<Constitution, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ConfigError::Constitution {
        path: path.to_path_buf(),
        source,
    })
}

pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(APP_DIR).join("config.toml"))
}

#[must_use]
pub fn default_data_dir() -> PathBuf {
    dirs::home_dir().map_or_else(|| PathBuf::from(APP_DIR), |home| home.join(APP_DIR))
}
