//! Credential backends and the chain that tries them in order

use super::Credential;
use crate::config::{Config, Env};
use crate::docker_config::DockerConfig;
use crate::error::Result;
use crate::reference::parse_server_address;
use crate::store::credentials_store;
use std::ffi::OsString;
use std::path::PathBuf;
use tracing::{debug, error, warn};

/// A source of registry credentials
///
/// `Ok(None)` means the backend has nothing for this reference and the next
/// backend should be asked. An error stops resolution.
pub trait AuthBackend: Send + Sync {
    /// Resolve the credential for a repository reference
    fn lookup(&self, reference: &str) -> Result<Option<Credential>>;
}

/// Credentials from `REPO_USER` / `REPO_PASS`
#[derive(Debug, Clone, Default)]
pub struct EnvBackend {
    username: Option<String>,
    password: Option<String>,
}

impl EnvBackend {
    pub fn new(username: Option<String>, password: Option<String>) -> Self {
        Self { username, password }
    }

    pub fn from_env(env: &Env) -> Self {
        Self::new(env.repo_user.clone(), env.repo_pass.clone())
    }
}

impl AuthBackend for EnvBackend {
    fn lookup(&self, _reference: &str) -> Result<Option<Credential>> {
        match (self.username.as_deref(), self.password.as_deref()) {
            (Some(username), Some(password)) if !username.is_empty() && !password.is_empty() => {
                debug!("Using credentials from environment");
                Ok(Some(Credential::new(username, password)))
            }
            _ => Ok(None),
        }
    }
}

/// Credentials from a Docker config directory and its credential stores
#[derive(Debug, Clone)]
pub struct ConfigBackend {
    config_dir: PathBuf,
    helper_path: Option<OsString>,
}

impl ConfigBackend {
    pub fn new(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
            helper_path: None,
        }
    }

    /// Search path for `docker-credential-*` helpers
    pub fn with_helper_path(mut self, path: Option<OsString>) -> Self {
        self.helper_path = path;
        self
    }

    pub fn from_config(config: &Config, env: &Env) -> Self {
        Self::new(config.docker_config_dir(env)).with_helper_path(config.helper_search_path(env))
    }

    pub fn config_dir(&self) -> &PathBuf {
        &self.config_dir
    }

    /// Server used as the lookup key, falling back to the raw reference
    fn server_for(reference: &str) -> String {
        match parse_server_address(reference) {
            Ok(server) => server,
            Err(e) => {
                warn!(
                    "Failed to parse reference {:?}, using it as the server address: {}",
                    reference, e
                );
                e.reference().to_string()
            }
        }
    }
}

impl AuthBackend for ConfigBackend {
    fn lookup(&self, reference: &str) -> Result<Option<Credential>> {
        let server = Self::server_for(reference);

        let config = DockerConfig::load_from_dir(&self.config_dir).inspect_err(|e| {
            error!("Unable to load Docker config: {}", e);
        })?;

        let store = credentials_store(&config, &server, self.helper_path.as_ref());
        let credential = store.get(&server)?;

        match &credential {
            Some(_) => debug!("Found credentials for {} in Docker config", server),
            None => debug!("No credentials for {} in Docker config", server),
        }
        Ok(credential)
    }
}

/// Backends tried in priority order
pub struct BackendChain {
    backends: Vec<Box<dyn AuthBackend>>,
}

impl BackendChain {
    pub fn new(backends: Vec<Box<dyn AuthBackend>>) -> Self {
        Self { backends }
    }

    /// The standard order: environment variables, then the Docker config
    pub fn from_config(config: &Config, env: &Env) -> Self {
        Self::new(vec![
            Box::new(EnvBackend::from_env(env)),
            Box::new(ConfigBackend::from_config(config, env)),
        ])
    }

    /// Return the first credential or error any backend produces
    pub fn resolve(&self, reference: &str) -> Result<Option<Credential>> {
        for backend in &self.backends {
            let credential = backend.lookup(reference)?;
            if credential.is_some() {
                return Ok(credential);
            }
        }

        Ok(None)
    }
}
