//! Credential stores backing the Docker config
//!
//! A store answers "what credential does this server have?" with an explicit
//! `Option`, so an entry that is not configured is never confused with an
//! empty credential.

use crate::auth::Credential;
use crate::docker_config::{convert_to_hostname, DockerAuthEntry, DockerConfig};
use crate::error::Result;
use std::ffi::OsString;
use std::fmt;
use tracing::debug;

mod native;

pub use native::NativeStore;

/// Capability shared by native helpers and the plain config file
pub trait CredentialStore: Send + Sync {
    /// Look up the credential stored for a server
    fn get(&self, server: &str) -> Result<Option<Credential>>;
}

/// Which store a config selects for a server
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreKind {
    /// `docker-credential-<helper>` binary
    Native(String),
    /// `auths` section of the config file
    File,
}

impl StoreKind {
    /// Select a store: `credsStore`, then `credHelpers[server]`, then the file
    pub fn select(config: &DockerConfig, server: &str) -> Self {
        if let Some(store) = config.creds_store.as_deref().filter(|s| !s.is_empty()) {
            return StoreKind::Native(store.to_string());
        }

        if let Some(helper) = config.cred_helpers.get(server) {
            return StoreKind::Native(helper.clone());
        }

        StoreKind::File
    }
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreKind::Native(helper) => write!(f, "native:{}", helper),
            StoreKind::File => write!(f, "file"),
        }
    }
}

/// Build the store the config selects for a server
///
/// `helper_path` is the search path used to locate native helpers.
pub fn credentials_store<'a>(
    config: &'a DockerConfig,
    server: &str,
    helper_path: Option<&OsString>,
) -> Box<dyn CredentialStore + 'a> {
    match StoreKind::select(config, server) {
        StoreKind::Native(helper) => {
            debug!("Using credential helper {} for {}", helper, server);
            let store = NativeStore::new(helper);
            match helper_path {
                Some(path) => Box::new(store.with_search_path(path.clone())),
                None => Box::new(store),
            }
        }
        StoreKind::File => {
            debug!("Using config file store for {}", server);
            Box::new(FileStore::new(config))
        }
    }
}

/// Reads credentials from the `auths` section of a loaded config
pub struct FileStore<'a> {
    config: &'a DockerConfig,
}

impl<'a> FileStore<'a> {
    pub fn new(config: &'a DockerConfig) -> Self {
        Self { config }
    }

    /// Find an entry by exact key, then by legacy URL-style keys
    fn find_entry(&self, server: &str) -> Option<&'a DockerAuthEntry> {
        if let Some(entry) = self.config.auths.get(server) {
            return Some(entry);
        }

        self.config
            .auths
            .iter()
            .find(|(key, _)| convert_to_hostname(key) == server)
            .map(|(_, entry)| entry)
    }
}

impl CredentialStore for FileStore<'_> {
    fn get(&self, server: &str) -> Result<Option<Credential>> {
        let Some(entry) = self.find_entry(server) else {
            debug!("No auth entry for {}", server);
            return Ok(None);
        };

        Ok(Credential::from_entry(entry, server))
    }
}
