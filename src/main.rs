//! distro_releases CLI application
//!
//! Command-line interface for discovering distribution releases on public
//! mirrors and exporting per-architecture release tables.

use std::process;

use tracing::info;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::{fmt, EnvFilter};

use distro_releases::cli::{
    handle_generate, handle_init_config, handle_inspect, handle_list, Cli, Commands,
};
use distro_releases::config::AppConfig;
use distro_releases::errors::{ConfigError, Result};

#[tokio::main]
async fn main() {
    let result = run().await;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        let mut source = std::error::Error::source(&e);
        while let Some(cause) = source {
            eprintln!("  Caused by: {}", cause);
            source = cause.source();
        }
        process::exit(1);
    }
}

/// Main application logic
async fn run() -> Result<()> {
    let cli = Cli::parse_args();

    // A broken config file must not prevent writing a fresh one
    let config = match cli.command {
        Commands::InitConfig(_) => AppConfig::default(),
        _ => AppConfig::load(cli.global.config.clone()).await?,
    };

    init_logging(&cli, &config)?;

    info!("distro_releases v{} starting", env!("CARGO_PKG_VERSION"));

    let show_progress = cli.show_progress();
    match cli.command {
        Commands::Generate(args) => {
            info!("Executing generate command");
            handle_generate(args, &config, show_progress).await
        }
        Commands::List(args) => {
            info!("Executing list command");
            handle_list(args, &config, show_progress).await
        }
        Commands::Inspect(args) => {
            info!("Executing inspect command");
            handle_inspect(args).await
        }
        Commands::InitConfig(args) => {
            info!("Executing init-config command");
            handle_init_config(args).await
        }
    }
}

/// Initialize logging from CLI verbosity flags, falling back to the
/// configured level
fn init_logging(cli: &Cli, config: &AppConfig) -> Result<()> {
    let log_level = cli
        .log_level()
        .map(|level| level.to_string().to_lowercase())
        .unwrap_or_else(|| config.logging.level.clone());

    let directive: Directive = format!("distro_releases={}", log_level)
        .parse()
        .map_err(|_| ConfigError::InvalidValue {
            field: "logging.level".to_string(),
            value: log_level.clone(),
            reason: "Expected one of error, warn, info, debug, trace".to_string(),
        })?;
    let filter = EnvFilter::from_default_env().add_directive(directive);

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(cli.global.very_verbose)
        .with_writer(std::io::stderr)
        .init();

    if cli.global.very_verbose {
        info!("Very verbose logging enabled");
    } else if cli.global.verbose {
        info!("Verbose logging enabled");
    }
    Ok(())
}
