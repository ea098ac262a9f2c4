use anyhow::Result;
use clap::Parser;
use token_manager::server;
use token_manager::tokens;
use token_manager::utils::config_loader;
use token_manager::utils::logging;
use token_manager::utils::logging::LogLevel;
use tracing::{error, info};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, env = "CONFIG", default_value = "token-manager.yaml")]
    config: String,
    #[arg(long, env = "LOG_LEVEL", value_enum)]
    log_level: Option<LogLevel>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // -------------------------------
    // 1. Load YAML config
    // -------------------------------

    let args = Args::parse();
    let service_config = config_loader::run(&args.config).await?;
    logging::run(&service_config, args.log_level)?;

    // -------------------------------
    // 2. Start refreshing tokens
    // -------------------------------

    let tokens = tokens::create(&service_config)?;
    info!("Service starting, mode {:?}", tokens.mode());

    // -------------------------------
    // 3. Serve tokens over http, if configured
    // -------------------------------

    let settings = &service_config.settings;
    let http_server = settings.server.to_owned().map(|server_config| {
        let metrics_config = settings.metrics.to_owned();
        let tokens = tokens.clone();
        tokio::spawn(async move {
            if let Err(e) = server::server::start(&server_config, &metrics_config, tokens).await {
                error!("{:#}", e);
            }
        })
    });

    // -------------------------------
    // 4. Wait for shutdown
    // -------------------------------

    tokio::signal::ctrl_c().await?;
    info!("Shutting down...");
    tokens.shutdown().await;
    if let Some(http_server) = http_server {
        http_server.abort();
    }

    Ok(())
}
