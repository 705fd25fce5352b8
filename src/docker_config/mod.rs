//! Docker config file parsing

use crate::constants::docker::CONFIG_FILE_NAME;
use crate::error::{AuthError, ConfigError, Result};
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Docker config file structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DockerConfig {
    /// Registry authentication entries
    #[serde(default)]
    pub auths: HashMap<String, DockerAuthEntry>,
    /// Registry-specific credential helpers
    #[serde(rename = "credHelpers", default)]
    pub cred_helpers: HashMap<String, String>,
    /// Credential store used for every registry
    #[serde(rename = "credsStore", skip_serializing_if = "Option::is_none")]
    pub creds_store: Option<String>,
}

/// Entry in the Docker config auths section
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct DockerAuthEntry {
    /// Base64-encoded username:password
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "identitytoken", skip_serializing_if = "Option::is_none")]
    pub identity_token: Option<String>,
    #[serde(rename = "registrytoken", skip_serializing_if = "Option::is_none")]
    pub registry_token: Option<String>,
}

impl DockerAuthEntry {
    /// Fill username and password from the base64 `auth` field
    fn decode_auth(&mut self, server: &str) -> std::result::Result<(), ConfigError> {
        let Some(auth) = self.auth.as_deref().filter(|a| !a.is_empty()) else {
            return Ok(());
        };

        let invalid = |reason: String| ConfigError::InvalidAuth {
            server: server.to_string(),
            reason,
        };

        let decoded = base64::engine::general_purpose::STANDARD
            .decode(auth)
            .map_err(|e| invalid(e.to_string()))?;
        let decoded = String::from_utf8(decoded).map_err(|e| invalid(e.to_string()))?;
        let (username, password) = decoded
            .split_once(':')
            .ok_or_else(|| invalid("missing ':' separator".to_string()))?;

        self.username = Some(username.to_string());
        self.password = Some(password.trim_matches('\0').to_string());
        Ok(())
    }
}

impl DockerConfig {
    /// Path of the config file inside a config directory
    pub fn path_in(dir: &Path) -> PathBuf {
        dir.join(CONFIG_FILE_NAME)
    }

    /// Parse a config file body, decoding every `auth` field
    pub fn from_json(content: &str) -> std::result::Result<Self, ConfigError> {
        let mut config: DockerConfig = serde_json::from_str(content)?;
        for (server, entry) in config.auths.iter_mut() {
            entry.decode_auth(server)?;
        }
        Ok(config)
    }

    /// Load `config.json` from a config directory
    ///
    /// A missing file is not an error and yields an empty config, the same as
    /// the Docker CLI. Unreadable or malformed files are.
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        let path = Self::path_in(dir);
        if !path.exists() {
            debug!("No Docker config at {}, using empty config", path.display());
            return Ok(DockerConfig::default());
        }

        debug!("Loading Docker config from: {}", path.display());
        let config = std::fs::read_to_string(&path)
            .map_err(ConfigError::from)
            .and_then(|content| Self::from_json(&content))
            .map_err(|source| AuthError::ConfigLoad {
                path: path.clone(),
                source,
            })?;

        debug!(
            "Loaded Docker config from {} ({} auths, {} helpers)",
            path.display(),
            config.auths.len(),
            config.cred_helpers.len()
        );
        Ok(config)
    }
}

/// Strip scheme and path from a config key to get a bare hostname
///
/// Keys written by older clients look like `https://index.docker.io/v1/`.
pub fn convert_to_hostname(url: &str) -> &str {
    let stripped = url
        .strip_prefix("http://")
        .or_else(|| url.strip_prefix("https://"))
        .unwrap_or(url);

    stripped.split('/').next().unwrap_or(stripped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_docker_config_parsing() {
        let config_json = r#"{
            "auths": {
                "docker.io": {
                    "auth": "dXNlcjpwYXNz"
                },
                "gcr.io": {
                    "username": "oauth2accesstoken",
                    "password": "ya29.token",
                    "registrytoken": "bearer-token"
                }
            },
            "credHelpers": {
                "ecr.amazonaws.com": "ecr-login"
            },
            "credsStore": "osxkeychain"
        }"#;

        let config = DockerConfig::from_json(config_json).unwrap();

        assert_eq!(config.auths.len(), 2);
        let docker_auth = &config.auths["docker.io"];
        assert_eq!(docker_auth.username, Some("user".to_string()));
        assert_eq!(docker_auth.password, Some("pass".to_string()));

        let gcr_auth = &config.auths["gcr.io"];
        assert_eq!(gcr_auth.username, Some("oauth2accesstoken".to_string()));
        assert_eq!(gcr_auth.registry_token, Some("bearer-token".to_string()));

        assert_eq!(config.cred_helpers["ecr.amazonaws.com"], "ecr-login");
        assert_eq!(config.creds_store, Some("osxkeychain".to_string()));
    }

    #[test]
    fn test_invalid_auth_field() {
        let err = DockerConfig::from_json(r#"{"auths": {"a.io": {"auth": "!!!"}}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidAuth { ref server, .. } if server == "a.io"));

        // "bm9jb2xvbg==" is "nocolon"
        let err =
            DockerConfig::from_json(r#"{"auths": {"a.io": {"auth": "bm9jb2xvbg=="}}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidAuth { .. }));
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let tmp_dir = TempDir::new().unwrap();
        let config = DockerConfig::load_from_dir(tmp_dir.path()).unwrap();
        assert!(config.auths.is_empty());
        assert!(config.creds_store.is_none());
    }

    #[test]
    fn test_load_malformed_file() {
        let tmp_dir = TempDir::new().unwrap();
        std::fs::write(tmp_dir.path().join("config.json"), "{ not json").unwrap();

        let err = DockerConfig::load_from_dir(tmp_dir.path()).unwrap_err();
        match err {
            AuthError::ConfigLoad { path, source } => {
                assert_eq!(path, tmp_dir.path().join("config.json"));
                assert!(matches!(source, ConfigError::Parse(_)));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_convert_to_hostname() {
        assert_eq!(convert_to_hostname("https://index.docker.io/v1/"), "index.docker.io");
        assert_eq!(convert_to_hostname("http://localhost:5000"), "localhost:5000");
        assert_eq!(convert_to_hostname("gcr.io"), "gcr.io");
    }
}
