//! hxai CLI and HTTP server entry point.
//!
//! Binary name: `hxai`
//!
//! Parses CLI arguments, loads configuration, then dispatches to the
//! appropriate command handler or starts the HTTP server.

mod cli;
mod http;
mod state;

use anyhow::Context;
use clap::Parser;
use clap_complete::generate;

use cli::{Cli, Commands};
use hxai_infra::config::{apply_env_overrides, load_config, resolve_config_path};
use hxai_infra::secret::env_lookup;
use hxai_observe::tracing_setup::{default_directives, init_tracing, shutdown_tracing};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let debug_level = env_lookup("DEBUG_LEVEL").and_then(|v| v.trim().parse::<u8>().ok());
    let directives = default_directives(cli.verbose, cli.quiet, debug_level);
    if let Err(e) = init_tracing(&directives, cli.otel) {
        eprintln!("Warning: failed to initialize tracing: {e}");
    }

    let result = run(cli).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Shell completions don't need config or a provider
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "hxai", &mut std::io::stdout());
        return Ok(());
    }

    let config_path = resolve_config_path(cli.config.as_deref(), env_lookup);
    let config = apply_env_overrides(load_config(&config_path).await, env_lookup);
    tracing::debug!(
        path = %config_path.display(),
        mode = %config.document.mode,
        model = %config.llm.model,
        "Configuration loaded"
    );

    match cli.command {
        Commands::Reset => {
            cli::document::reset(&config, cli.json, cli.quiet).await?;
        }

        Commands::Generate { prompt, target } => {
            let state = AppState::init(config)?;
            cli::generate::generate_once(&state, prompt, target, cli.json).await?;
        }

        Commands::Serve { port, host } => {
            let mut config = config;
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(host) = host {
                config.server.host = host;
            }

            let state = AppState::init(config)?;
            if state.config.document.reset_on_startup {
                state
                    .service
                    .reset_document()
                    .await
                    .context("failed to reset the document on startup")?;
                tracing::info!(
                    path = %state.config.document.path.display(),
                    "Document reset from template"
                );
            }

            let addr = format!("{}:{}", state.config.server.host, state.config.server.port);
            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .with_context(|| format!("failed to bind {addr}"))?;

            tracing::info!(
                %addr,
                provider = state.service.provider_name(),
                mode = %state.config.document.mode,
                "hxai listening"
            );
            if !cli.quiet && !cli.json {
                println!("  hxai listening on http://{addr}");
                println!("  Press Ctrl+C to stop");
            }

            let router = http::router::build_router(state);

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            tracing::info!("Server stopped");
        }

        Commands::Completions { .. } => unreachable!("handled above"),
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {e}");
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
                tracing::error!("failed to install SIGTERM handler: {e}");
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

    tracing::info!("Shutdown signal received");
}
