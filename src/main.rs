use anyhow::{Context, Result};
use babel_relay::{create_router, AppState, CapabilityFactory, Config};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Real-time multilingual conversation relay
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Config file (extension optional)
    #[arg(short, long, default_value = "config/babel-relay")]
    config: String,

    /// Override service.http.bind
    #[arg(long)]
    bind: Option<String>,

    /// Override service.http.port
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let mut cfg = Config::load(&args.config)?;
    if let Some(bind) = args.bind {
        cfg.service.http.bind = bind;
    }
    if let Some(port) = args.port {
        cfg.service.http.port = port;
    }

    info!("{} v{}", cfg.service.name, env!("CARGO_PKG_VERSION"));
    info!(
        "Capabilities: {:?} (timeout {}ms)",
        cfg.capabilities.backend, cfg.capabilities.timeout_ms
    );
    info!(
        "Utterance threshold: {} bytes ({}ms at {}Hz x {} bytes x {} channel(s))",
        cfg.audio.utterance_bytes(),
        cfg.audio.utterance_ms,
        cfg.audio.sample_rate,
        cfg.audio.bytes_per_sample,
        cfg.audio.channels
    );

    let capabilities =
        CapabilityFactory::create(&cfg).context("Failed to create capability clients")?;
    let app = create_router(AppState::new(&cfg, capabilities));

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Listening on {} (WebSocket endpoint: /conversation)", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("Shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
