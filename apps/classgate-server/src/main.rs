//! classgate server
//!
//! Serves the demo class API behind the gate, with stores loaded from the
//! configuration file.

mod config;
mod logging;
mod routes;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use classgate::infra::{
    CachedJwks, FileJwks, JwksProvider, JwtVerifier, SessionTokenSigner, StaticJwks,
};
use classgate::{Gate, GateStores};
use static_stores_plugin::StaticStores;

#[derive(Parser, Debug)]
#[command(name = "classgate-server")]
#[command(about = "Authentication and authorization gate for class workspaces", long_about = None)]
struct Cli {
    /// Path to YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the API (default)
    Serve,

    /// Print a signed session token for a session-tenant member
    IssueSessionToken {
        #[arg(long)]
        session_id: String,

        #[arg(long)]
        token: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = config::load(cli.config.as_deref())?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(&config).await,
        Command::IssueSessionToken { session_id, token } => {
            let signer =
                SessionTokenSigner::from_config(config.gate.session_signing_secret.as_ref())?;
            println!("{}", signer.issue_session_token(session_id, token)?);
            Ok(())
        }
    }
}

async fn serve(config: &config::ServerConfig) -> anyhow::Result<()> {
    logging::init(&config.logging)?;

    let idp = &config.gate.identity_provider;
    let jwks: Arc<dyn JwksProvider> = if let Some(path) = &idp.jwks_path {
        tracing::info!(path = %path.display(), "identity provider keys read from file");
        Arc::new(FileJwks::new(path))
    } else {
        tracing::warn!("no identity provider key set configured; external tokens will be rejected");
        Arc::new(StaticJwks::from_json(r#"{"keys":[]}"#)?)
    };
    let keys = Arc::new(CachedJwks::new(jwks, idp.jwks_min_refresh()));
    let verifier = Arc::new(JwtVerifier::new(idp, keys));

    let stores = Arc::new(StaticStores::from_config(&config.stores));
    let gate = Gate::new(
        &config.gate,
        GateStores {
            sessions: stores.clone(),
            projects: stores.clone(),
            tenant_policies: stores,
        },
        verifier,
    )?;

    let app = routes::router(&gate);
    let listener = tokio::net::TcpListener::bind(&config.listen)
        .await
        .with_context(|| format!("failed to bind {}", config.listen))?;
    tracing::info!(addr = %config.listen, "classgate listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
    tracing::info!("shutting down");
}
