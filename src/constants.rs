/// Environment variable names read into [`crate::config::Env`]
pub mod env {
    /// Username override for every registry
    pub const REPO_USER: &str = "REPO_USER";

    /// Password override for every registry
    pub const REPO_PASS: &str = "REPO_PASS";

    /// Directory holding the Docker `config.json`
    pub const DOCKER_CONFIG: &str = "DOCKER_CONFIG";

    /// Search path for credential helper binaries
    pub const PATH: &str = "PATH";
}

/// Docker configuration directory layout
pub mod docker {
    /// Config directory used when `DOCKER_CONFIG` is unset
    pub const DEFAULT_CONFIG_DIR: &str = "/";

    /// File name of the config inside the config directory
    pub const CONFIG_FILE_NAME: &str = "config.json";
}

/// Credential helper protocol
pub mod helper {
    /// Helper binaries are named `docker-credential-<name>`
    pub const PROGRAM_PREFIX: &str = "docker-credential-";

    /// Subcommand that reads a server address on stdin
    pub const GET_COMMAND: &str = "get";

    /// Message printed by helpers when the server has no stored credentials
    pub const CREDENTIALS_NOT_FOUND: &str = "credentials not found in native keychain";

    /// Username a helper returns when the secret is an identity token
    pub const TOKEN_USERNAME: &str = "<token>";
}
