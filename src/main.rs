// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use drinks_server::{
    api::router,
    auth::{JwksManager, TokenVerifier},
    config::{AppConfig, LogFormat, DEFAULT_LOG_FILTER},
    state::AppState,
    store::InMemoryStore,
};
use tracing_subscriber::EnvFilter;

fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing(LogFormat::default());
            tracing::error!(error = %e, "Invalid configuration");
            return Err(e.into());
        }
    };
    init_tracing(config.log_format);

    let auth = &config.auth;
    let jwks = JwksManager::new(&auth.jwks_url, auth.fetch_timeout)?
        .with_cache_ttl(auth.cache_ttl)
        .with_min_refresh_interval(auth.min_refresh_interval);
    let verifier = TokenVerifier::new(Arc::new(jwks), auth);

    // Warm the key cache; verification still fetches on demand if this fails.
    if let Err(e) = verifier.jwks().refresh().await {
        tracing::warn!(error = %e, url = %auth.jwks_url, "Initial JWKS fetch failed");
    }

    let store = if config.seed_drinks {
        InMemoryStore::with_sample_drinks()
    } else {
        InMemoryStore::new()
    };

    let state = AppState::new(store, verifier);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(
        addr = %config.bind_addr,
        issuer = %auth.issuer,
        audience = %auth.audience,
        "Drinks server listening (docs at /docs)"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
