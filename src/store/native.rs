//! Docker credential helper support

use super::CredentialStore;
use crate::auth::Credential;
use crate::constants::helper::{
    CREDENTIALS_NOT_FOUND, GET_COMMAND, PROGRAM_PREFIX, TOKEN_USERNAME,
};
use crate::error::{AuthError, Result};
use serde::Deserialize;
use std::ffi::OsString;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::debug;

/// Response from a Docker credential helper
#[derive(Deserialize)]
struct HelperResponse {
    #[serde(rename = "ServerURL")]
    server_url: Option<String>,
    #[serde(rename = "Username", default)]
    username: String,
    #[serde(rename = "Secret", default)]
    secret: String,
}

/// Store that shells out to `docker-credential-<helper> get`
///
/// The call blocks until the helper exits; there is no timeout.
#[derive(Debug, Clone)]
pub struct NativeStore {
    helper: String,
    search_path: Option<OsString>,
}

impl NativeStore {
    pub fn new(helper: impl Into<String>) -> Self {
        Self {
            helper: helper.into(),
            search_path: None,
        }
    }

    /// Look for the helper binary in `path` instead of the process `PATH`
    pub fn with_search_path(mut self, path: impl Into<OsString>) -> Self {
        self.search_path = Some(path.into());
        self
    }

    /// Name of the helper binary, e.g. `docker-credential-pass`
    pub fn program(&self) -> String {
        format!("{}{}", PROGRAM_PREFIX, self.helper)
    }

    fn lookup_error(&self, message: impl Into<String>) -> AuthError {
        AuthError::StoreLookup {
            helper: self.program(),
            message: message.into(),
        }
    }

    fn locate(&self) -> Result<PathBuf> {
        let program = self.program();
        let found = match &self.search_path {
            Some(path) => which::which_in(&program, Some(path), Path::new(".")),
            None => which::which(&program),
        };
        found.map_err(|e| self.lookup_error(format!("unable to locate helper: {}", e)))
    }

    fn execute(&self, server: &str) -> Result<Option<HelperResponse>> {
        let binary = self.locate()?;

        debug!(
            "Executing credential helper: {} for {}",
            binary.display(),
            server
        );

        let mut child = Command::new(&binary)
            .arg(GET_COMMAND)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.lookup_error(format!("failed to spawn: {}", e)))?;

        // Write registry URL to stdin. A helper that exits without reading it
        // closes the pipe early, which is not a failure on its own.
        if let Some(mut stdin) = child.stdin.take() {
            match stdin
                .write_all(server.as_bytes())
                .and_then(|_| stdin.write_all(b"\n"))
            {
                Err(e) if e.kind() != ErrorKind::BrokenPipe => {
                    return Err(self.lookup_error(format!("failed to write server: {}", e)));
                }
                _ => {}
            }
        }

        let output = child
            .wait_with_output()
            .map_err(|e| self.lookup_error(format!("failed to wait for helper: {}", e)))?;

        if !output.status.success() {
            let stdout = String::from_utf8_lossy(&output.stdout);
            if stdout.trim() == CREDENTIALS_NOT_FOUND {
                debug!("Credential helper {} has no entry for {}", self.program(), server);
                return Ok(None);
            }

            let stderr = String::from_utf8_lossy(&output.stderr);
            let message = [stdout.trim(), stderr.trim()]
                .into_iter()
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(": ");
            return Err(self.lookup_error(format!("{} ({})", message, output.status)));
        }

        let response: HelperResponse = serde_json::from_slice(&output.stdout)
            .map_err(|e| self.lookup_error(format!("invalid helper response: {}", e)))?;

        Ok(Some(response))
    }
}

impl CredentialStore for NativeStore {
    fn get(&self, server: &str) -> Result<Option<Credential>> {
        let Some(response) = self.execute(server)? else {
            return Ok(None);
        };

        let server_address = response
            .server_url
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| server.to_string());

        let credential = if response.username == TOKEN_USERNAME {
            Credential {
                identity_token: Some(response.secret),
                server_address: Some(server_address),
                ..Default::default()
            }
        } else {
            Credential {
                username: response.username,
                password: response.secret,
                server_address: Some(server_address),
                ..Default::default()
            }
        };

        Ok((!credential.is_empty()).then_some(credential))
    }
}
