//! Registry credential resolution
//!
//! Credentials are resolved by a chain of backends (environment variables,
//! then the Docker config and its credential helpers) and encoded for the
//! `X-Registry-Auth` header.

use crate::config::{Config, Env};
use crate::docker_config::DockerAuthEntry;
use crate::error::{AuthError, Result};
use base64::Engine;
use serde::{Deserialize, Serialize};
use tracing::debug;

mod backend;

pub use backend::{AuthBackend, BackendChain, ConfigBackend, EnvBackend};

/// Credential for a single registry
///
/// Serializes to the auth config JSON understood by the Docker engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub username: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(
        rename = "identitytoken",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub identity_token: Option<String>,
    #[serde(
        rename = "registrytoken",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub registry_token: Option<String>,
    #[serde(
        rename = "serveraddress",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub server_address: Option<String>,
}

impl Credential {
    /// Create a Credential with username and password
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            ..Default::default()
        }
    }

    /// Attach the server the credential belongs to
    pub fn with_server_address(mut self, server: impl Into<String>) -> Self {
        self.server_address = Some(server.into());
        self
    }

    /// Whether every credential field is empty
    ///
    /// The server address only labels the credential and is not considered.
    pub fn is_empty(&self) -> bool {
        let blank = |field: &Option<String>| field.as_deref().is_none_or(str::is_empty);
        self.username.is_empty()
            && self.password.is_empty()
            && blank(&self.email)
            && blank(&self.identity_token)
            && blank(&self.registry_token)
    }

    /// Convert a config file entry, `None` if every field is empty
    pub fn from_entry(entry: &DockerAuthEntry, server: &str) -> Option<Self> {
        let non_empty = |field: &Option<String>| field.clone().filter(|s| !s.is_empty());
        let credential = Credential {
            username: entry.username.clone().unwrap_or_default(),
            password: entry.password.clone().unwrap_or_default(),
            email: non_empty(&entry.email),
            identity_token: non_empty(&entry.identity_token),
            registry_token: non_empty(&entry.registry_token),
            server_address: Some(server.to_string()),
        };

        (!credential.is_empty()).then_some(credential)
    }
}

/// Base64 encode a Credential for the `X-Registry-Auth` header
pub fn encode_auth(credential: &Credential) -> Result<String> {
    let json = serde_json::to_vec(credential).map_err(AuthError::Encoding)?;
    Ok(base64::engine::general_purpose::URL_SAFE.encode(json))
}

/// Decode an `X-Registry-Auth` header value back into a Credential
pub fn decode_auth(encoded: &str) -> Result<Credential> {
    let json = base64::engine::general_purpose::URL_SAFE
        .decode(encoded)
        .map_err(|e| AuthError::Decoding(e.to_string()))?;
    serde_json::from_slice(&json).map_err(|e| AuthError::Decoding(e.to_string()))
}

/// Called when the registry rejected the credential we sent
///
/// Retrying with the same credential is pointless, so this returns an empty
/// header value and the request proceeds without authentication.
pub fn default_auth_handler() -> Result<String> {
    debug!("Authentication request was rejected, trying again without authentication");
    Ok(String::new())
}

/// Resolve and encode the credential for a reference
///
/// Uses the process environment and the tool config. Returns an empty string
/// when no credential is configured.
pub fn encoded_auth(reference: &str) -> Result<String> {
    let chain = BackendChain::from_config(&Config::load_or_default(), &Env::from_process());
    encoded_auth_with(&chain, reference)
}

/// Resolve and encode the credential for a reference using an explicit chain
pub fn encoded_auth_with(chain: &BackendChain, reference: &str) -> Result<String> {
    match chain.resolve(reference)? {
        Some(credential) => {
            debug!(
                "Loaded auth credentials for {} (user {:?})",
                reference, credential.username
            );
            encode_auth(&credential)
        }
        None => {
            debug!("No credentials for {}, using anonymous", reference);
            Ok(String::new())
        }
    }
}
