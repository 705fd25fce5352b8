use anyhow::{Context, Result};
use clap::Parser;
use regcred::{
    auth::{encoded_auth_with, BackendChain, ConfigBackend},
    cli::{Cli, Commands},
    config::{Config, Env},
    docker_config::DockerConfig,
    reference::parse_server_address,
    store::StoreKind,
};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging to stderr
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load_or_default();
    let mut env = Env::from_process();
    if cli.docker_config.is_some() {
        env.docker_config = cli.docker_config.clone();
    }

    match cli.command {
        Commands::Auth { reference } => {
            let chain = BackendChain::from_config(&config, &env);
            let encoded = encoded_auth_with(&chain, &reference)
                .with_context(|| format!("Failed to resolve credentials for {}", reference))?;

            // Print only the header value to stdout
            println!("{}", encoded);
        }
        Commands::Server { reference } => {
            let server = parse_server_address(&reference)
                .with_context(|| format!("Failed to parse reference {}", reference))?;
            println!("{}", server);
        }
        Commands::Store { reference } => {
            let server = parse_server_address(&reference).unwrap_or_else(|e| {
                warn!("{}, using the raw reference", e);
                reference.clone()
            });

            let backend = ConfigBackend::from_config(&config, &env);
            let config_dir = backend.config_dir();
            debug!("Using Docker config directory {}", config_dir.display());

            let docker_config = DockerConfig::load_from_dir(config_dir)?;
            println!("{}", StoreKind::select(&docker_config, &server));
            println!("{}", DockerConfig::path_in(config_dir).display());
        }
        Commands::Version => {
            println!("regcred {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
