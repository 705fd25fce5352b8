use crate::constants::{docker, env};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::warn;

#[cfg(test)]
mod tests;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Docker config directory used when DOCKER_CONFIG is unset
    #[serde(default = "default_docker_config")]
    pub default_docker_config: PathBuf,

    /// Directories searched for credential helpers before PATH
    #[serde(default)]
    pub helper_dirs: Vec<PathBuf>,
}

fn default_docker_config() -> PathBuf {
    PathBuf::from(docker::DEFAULT_CONFIG_DIR)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_docker_config: default_docker_config(),
            helper_dirs: Vec::new(),
        }
    }
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        match dirs::config_dir() {
            Some(config_dir) => Self::load_from(&config_dir.join("regcred").join("config.toml")),
            None => Ok(Config::default()),
        }
    }

    /// Load a config file, defaults if it does not exist
    pub fn load_from(config_path: &Path) -> anyhow::Result<Self> {
        if !config_path.exists() {
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;
        Ok(config)
    }

    /// Like [`Config::load`], but a broken file only warns and yields defaults
    pub fn load_or_default() -> Self {
        Self::or_default(Self::load())
    }

    fn or_default(loaded: anyhow::Result<Self>) -> Self {
        loaded.unwrap_or_else(|e| {
            warn!("Failed to load regcred config, using defaults: {:#}", e);
            Config::default()
        })
    }

    /// Docker config directory: DOCKER_CONFIG if set, else the default
    pub fn docker_config_dir(&self, env: &Env) -> PathBuf {
        env.docker_config
            .clone()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or_else(|| self.default_docker_config.clone())
    }

    /// Helper search path: configured directories followed by PATH
    ///
    /// `None` means "use the process PATH as is".
    pub fn helper_search_path(&self, env: &Env) -> Option<OsString> {
        if self.helper_dirs.is_empty() {
            return env.path.clone();
        }

        let path_dirs = env
            .path
            .as_ref()
            .map(std::env::split_paths)
            .into_iter()
            .flatten();

        std::env::join_paths(self.helper_dirs.iter().cloned().chain(path_dirs)).ok()
    }
}

/// Snapshot of the environment variables that affect credential resolution
///
/// Captured once at the entry point and passed down explicitly.
#[derive(Debug, Clone, Default)]
pub struct Env {
    pub repo_user: Option<String>,
    pub repo_pass: Option<String>,
    pub docker_config: Option<PathBuf>,
    pub path: Option<OsString>,
}

impl Env {
    pub fn from_process() -> Self {
        Self {
            repo_user: std::env::var(env::REPO_USER).ok(),
            repo_pass: std::env::var(env::REPO_PASS).ok(),
            docker_config: std::env::var_os(env::DOCKER_CONFIG).map(PathBuf::from),
            path: std::env::var_os(env::PATH),
        }
    }
}
