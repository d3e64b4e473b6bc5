//! # StackIt Binary
//!
//! Loads configuration, connects PostgreSQL, wires the services and
//! serves the HTTP API until SIGINT or SIGTERM.

use std::sync::Arc;

use anyhow::Context;
use secrecy::ExposeSecret;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use api_adapters::{router, AppState, CookieSettings};
use auth_adapters::{Argon2Hasher, JwtSessionTokens};
use configs::{AppConfig, LogFormat};
use services::{Repositories, Services};
use storage_adapters::PgStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("loading configuration")?;
    init_tracing(config.log.format);

    let store = PgStore::connect(&config.database.url, config.database.max_connections)
        .await
        .context("connecting to PostgreSQL")?;
    store.run_migrations().await.context("running migrations")?;

    let tokens = JwtSessionTokens::new(
        config.auth.jwt_secret.expose_secret().as_bytes(),
        chrono::Duration::hours(config.auth.token_ttl_hours),
    );
    let services = Services::new(
        Repositories::from_store(Arc::new(store)),
        Arc::new(Argon2Hasher::new()),
        Arc::new(tokens),
    );
    let state = AppState::new(
        services,
        CookieSettings {
            ttl_hours: config.auth.token_ttl_hours,
            secure: config.auth.secure_cookie,
        },
    );

    let addr = config.server.addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!(%addr, "stackit listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("stackit stopped");
    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Plain => builder.init(),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for Ctrl-C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("shutdown requested");
}
