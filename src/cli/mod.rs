use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "regcred")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory containing the Docker config.json
    #[arg(long, global = true, env = "DOCKER_CONFIG", value_name = "DIR")]
    pub docker_config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the encoded X-Registry-Auth value for a repository reference
    Auth {
        /// Repository reference (e.g., ghcr.io/user/app:latest)
        reference: String,
    },

    /// Print the server address credentials are looked up under
    Server {
        /// Repository reference (e.g., ghcr.io/user/app:latest)
        reference: String,
    },

    /// Show which credential store would be queried for a reference
    Store {
        /// Repository reference (e.g., ghcr.io/user/app:latest)
        reference: String,
    },

    /// Show version information
    Version,
}
