//! Sales Tracker - sales bookkeeping backend with role-based access

use anyhow::{Context, Result};
use chrono::Duration;
use clap::Parser;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::watch;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

mod bootstrap;
mod config;
mod logging;
mod redirect;
mod tls;

use config::Config;
use sales_api::{AppState, create_router};
use sales_auth::{Authenticator, JwtManager, PasswordHasher, Secret};
use sales_db::Database;

/// Sales Tracker - sales bookkeeping backend
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    config: String,

    /// Bind address
    #[arg(long, env = "SALES_TRACKER_BIND")]
    bind: Option<String>,

    /// Port
    #[arg(short, long, env = "SALES_TRACKER_PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config::load(&args.config)?;
    logging::init_logging(&config.logging)?;

    info!("Starting Sales Tracker v{}", env!("CARGO_PKG_VERSION"));
    match &config.source {
        Some(path) => info!("Loaded configuration from {}", path),
        None => info!("Config file not found at {}, using defaults", args.config),
    }

    let secret = Secret::from_file(&config.auth.key_path)
        .with_context(|| format!("Failed to load auth secret from {}", config.auth.key_path))?;

    if let Some(parent) = Path::new(&config.database.path).parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await?;
    }
    let db_url = format!("sqlite:{}?mode=rwc", config.database.path);
    let db = Database::new(&db_url, config.database.max_connections).await?;

    let hasher = PasswordHasher::new(secret.clone(), config.auth.bcrypt_cost);
    let jwt = Arc::new(JwtManager::new(
        &secret,
        Duration::seconds(config.auth.token_ttl_secs),
    ));
    info!(
        "bcrypt cost {}, token lifetime {}s",
        hasher.cost(),
        jwt.token_ttl().num_seconds()
    );
    bootstrap::bootstrap_admin(&db, &hasher, &config.auth).await?;

    let authenticator = Arc::new(Authenticator::new(db.clone(), hasher.clone(), jwt.clone())?);
    let state = AppState::new(db, jwt, hasher, authenticator);

    let static_dir = config.server.static_dir.as_deref().map(Path::new);
    if let Some(dir) = static_dir {
        info!("Serving frontend from {}", dir.display());
    }
    let app = create_router(state, static_dir).layer(TraceLayer::new_for_http());

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        shutdown_signal().await;
        let _ = shutdown_tx.send(true);
    });

    let bind_addr = args.bind.unwrap_or_else(|| config.server.bind_address.clone());
    let port = args.port.unwrap_or(config.server.port);

    let https = if config.tls.enabled {
        let (Some(cert_path), Some(key_path)) = (&config.tls.cert_path, &config.tls.key_path)
        else {
            anyhow::bail!("TLS is enabled but cert_path or key_path is missing");
        };
        // Only one crypto provider is compiled in; ignore an already-installed one
        let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();
        let tls_config = tls::load_tls_config(Path::new(cert_path), Path::new(key_path))?;

        let addr: SocketAddr = format!("{}:{}", bind_addr, config.tls.port).parse()?;
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind HTTPS listener on {}", addr))?;
        info!("Listening on https://{}", addr);

        Some(tokio::spawn(tls::serve_tls(
            listener,
            tls_config,
            app.clone(),
            shutdown_rx.clone(),
        )))
    } else {
        None
    };

    let addr: SocketAddr = format!("{}:{}", bind_addr, port).parse()?;
    let app = if config.tls.redirects_http() {
        info!("Listening on http://{}, redirecting to HTTPS port {}", addr, config.tls.port);
        redirect::redirect_router(config.tls.port).layer(TraceLayer::new_for_http())
    } else {
        info!("Listening on http://{}", addr);
        app
    };

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind HTTP listener on {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown(shutdown_rx))
        .await?;

    if let Some(handle) = https {
        handle.await??;
    }

    info!("Server stopped");
    Ok(())
}

/// Resolve once the shutdown flag flips
async fn wait_for_shutdown(mut rx: watch::Receiver<bool>) {
    let _ = rx.wait_for(|stop| *stop).await;
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to install CTRL+C handler: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
