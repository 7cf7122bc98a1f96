//! Flowstate CLI and REST API entry point.
//!
//! Binary name: `flowstate`
//!
//! Parses CLI arguments, loads configuration, sets up tracing, then either
//! runs an offline command or starts the REST API server.

mod cli;
mod config;
mod http;
mod state;

use clap::Parser;
use clap_complete::generate;
use flowstate_observe::{LogOptions, init_tracing, shutdown_tracing};
use flowstate_types::config::ServerConfig;

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Shell completions don't need config or logging
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "flowstate", &mut std::io::stdout());
        return Ok(());
    }

    // Logging settings come from the config file, so load it first and
    // report any problem once the subscriber is up.
    let (file_config, config_error) = match config::load_server_config(cli.config.as_deref()).await
    {
        Ok(config) => (config, None),
        Err(err) => (ServerConfig::default(), Some(err)),
    };

    init_tracing(&LogOptions {
        default_filter: cli.log_filter().to_string(),
        json: file_config.json_logs,
        enable_otel: file_config.enable_otel,
    })
    .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    if let Some(err) = config_error {
        tracing::warn!("{err}, using defaults");
    }

    let result = match cli.command {
        Commands::Serve { port, host } => {
            let config = config::apply_overrides(file_config, host, port);
            serve(config, cli.quiet).await
        }
        Commands::Validate { file } => {
            cli::validate::validate_file(&file, cli.json, cli.quiet).await
        }
        Commands::Completions { .. } => unreachable!("handled above"),
    };

    shutdown_tracing();
    result
}

/// Run the REST API until Ctrl+C or SIGTERM.
async fn serve(config: ServerConfig, quiet: bool) -> anyhow::Result<()> {
    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    if !quiet {
        println!(
            "  {} Flowstate API listening on {}",
            console::style("⚡").bold(),
            console::style(format!("http://{addr}")).cyan()
        );
        println!("  {}", console::style("Press Ctrl+C to stop").dim());
    }
    tracing::info!(%addr, cors_allow_any = config.cors_allow_any, "server started");

    let router = http::router::build_router(AppState::new(), &config);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
