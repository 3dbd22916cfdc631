use std::net::SocketAddr;

use clap::{Parser, Subcommand};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use vv_domain::config::Config;
use vv_gateway::{api, bootstrap};

#[derive(Parser)]
#[command(name = "vivavoce", about = "Voice interview session orchestrator")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "vivavoce.toml")]
    config: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP gateway (default).
    Serve,
    /// Validate the configuration and exit.
    CheckConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── Tracing ────────────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("vv_gateway=info,vv_orchestrator=info,tower_http=info")),
        )
        .json()
        .init();

    let cli = Cli::parse();

    // ── Config ─────────────────────────────────────────────────────
    let config = Config::load_or_default(&cli.config);
    tracing::info!(
        state_path = %config.workspace.state_path.display(),
        provider_url = %config.voice_provider.base_url,
        port = config.server.port,
        "configuration loaded"
    );

    if matches!(cli.command, Some(Command::CheckConfig)) {
        bootstrap::check_config(&config)?;
        tracing::info!("configuration ok");
        return Ok(());
    }

    // ── App state ──────────────────────────────────────────────────
    let state = bootstrap::build_state(config)?;
    let addr: SocketAddr = format!("{}:{}", state.config.server.host, state.config.server.port)
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid server address: {e}"))?;

    // ── Router ─────────────────────────────────────────────────────
    let app = api::router()
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // ── Server ─────────────────────────────────────────────────────
    tracing::info!(%addr, "listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
