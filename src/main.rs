//! Forage HTTP server entrypoint.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tokio::signal;

use forage::config::Config;
use forage::gateway::{HandlerState, create_router_with_state};
use forage::lifecycle::{ServiceResolver, bootstrap, build_nutrition_client};
use forage::nutrition::NutritionLookup;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const DEFAULT_HEALTH_PORT: u16 = 8000;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if std::env::args().any(|arg| arg == "--health-check") {
        std::process::exit(run_health_check());
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    config.validate()?;
    let addr: SocketAddr = config.socket_addr().parse()?;

    tracing::info!(
        bind_addr = %config.bind_addr,
        port = config.port,
        threshold = config.fuzzy_threshold,
        "Forage starting"
    );

    let startup_config = config.clone();
    let resolver = tokio::task::spawn_blocking(move || bootstrap(&startup_config)).await??;

    if let Some(seed_path) = seed_arg() {
        warm_up_from_file(&resolver, &seed_path).await?;
    }

    let stub = resolver.semantic().embedder().is_stub();
    let mut state = HandlerState::new(Arc::clone(&resolver), config.storage_path.clone())
        .with_embedder_mode(stub);

    if let Some(client) = build_nutrition_client(&config)? {
        tracing::info!(url = %client.base_url(), "Nutrition enrichment enabled");
        let client: Arc<dyn NutritionLookup> = Arc::new(client);
        state = state.with_nutrition(client);
    }

    let app = create_router_with_state(state);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!(cached = resolver.size(), "Forage shutdown complete");
    Ok(())
}

/// Value following `--seed`, if any.
fn seed_arg() -> Option<PathBuf> {
    let mut args = std::env::args().skip_while(|arg| arg != "--seed");
    args.next()?;
    args.next().map(PathBuf::from)
}

/// Resolves every name in `path` (one per line, `#` comments allowed) into the cache.
async fn warm_up_from_file(resolver: &Arc<ServiceResolver>, path: &Path) -> anyhow::Result<()> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read seed file {}", path.display()))?;

    let names: Vec<String> = contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect();

    tracing::info!(path = %path.display(), names = names.len(), "Warming cache");

    let resolver = Arc::clone(resolver);
    let report = tokio::task::spawn_blocking(move || resolver.warm_up(names)).await?;
    if report.failed > 0 {
        tracing::warn!(failed = report.failed, "Some seed names could not be resolved");
    }
    Ok(())
}

fn run_health_check() -> i32 {
    let port = std::env::var(Config::ENV_PORT)
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(DEFAULT_HEALTH_PORT);

    let url = format!("http://127.0.0.1:{}/healthz", port);

    let Ok(rt) = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    else {
        return 1;
    };

    rt.block_on(async {
        let Ok(client) = reqwest::Client::builder()
            .timeout(Duration::from_secs(1))
            .build()
        else {
            return 1;
        };

        match client.get(&url).send().await {
            Ok(res) if res.status().is_success() => 0,
            _ => 1,
        }
    })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
