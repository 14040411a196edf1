// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{env, net::SocketAddr, process::ExitCode, sync::Arc};

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use bearer_identity::{
    api::router,
    config::{
        auth_header_from_lookup, parse_seed_users, SigningConfig, HOST_ENV, LOG_FORMAT_ENV,
        PORT_ENV, SEED_USERS_ENV,
    },
    error::ConfigError,
    state::AppState,
    store::InMemoryStore,
};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));

    let registry = tracing_subscriber::registry().with(filter);
    if env::var(LOG_FORMAT_ENV).is_ok_and(|format| format == "json") {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

fn build_state() -> Result<AppState, ConfigError> {
    let context = SigningConfig::from_env()?.build_context()?;
    let header_name = auth_header_from_lookup(|name| env::var(name).ok())?;

    let seed_users = match env::var(SEED_USERS_ENV) {
        Ok(raw) => parse_seed_users(&raw)?,
        Err(_) => Vec::new(),
    };

    let store = Arc::new(InMemoryStore::new());
    for user in &seed_users {
        store.insert_user(user.clone());
    }

    tracing::info!(
        algorithm = ?context.algorithm(),
        header = %header_name,
        users = store.len(),
        "authentication configured"
    );
    let state = AppState::new(store, context, header_name);

    // Development bootstrap: seeded users have no other way to obtain a first token.
    for user in &seed_users {
        match state.issuer.issue(user, None) {
            Ok(token) => println!("Seed token for user {} ({}): {token}", user.id, user.name),
            Err(e) => tracing::warn!(error = %e, user_id = user.id, "failed to issue seed token"),
        }
    }

    Ok(state)
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let state = match build_state() {
        Ok(state) => state,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let host = env::var(HOST_ENV).unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var(PORT_ENV)
        .unwrap_or_else(|_| "8080".to_string())
        .parse()
        .unwrap_or(8080);

    let addr: SocketAddr = match format!("{host}:{port}").parse() {
        Ok(addr) => addr,
        Err(e) => {
            tracing::error!(error = %e, %host, port, "invalid bind address");
            return ExitCode::FAILURE;
        }
    };

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, %addr, "failed to bind");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(%addr, "bearer-identity listening (OpenAPI at /api-doc/openapi.json)");

    let shutdown = async {
        let _ = tokio::signal::ctrl_c().await;
        tracing::info!("shutting down");
    };

    if let Err(e) = axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
    {
        tracing::error!(error = %e, "server failed");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
