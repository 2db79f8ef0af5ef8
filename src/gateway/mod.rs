//! HTTP gateway: routing, JSON mapping, and engine-error translation.
//!
//! The gateway is a thin layer over the account service; every business
//! rule lives below it. Status mapping: account not-found is 404, business
//! rejections are 400, lock contention is 409, storage faults are 500.

pub mod handlers;
pub mod state;
pub mod types;

use anyhow::Context;
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::config::GatewayConfig;
use state::AppState;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Users
        .route("/users", post(handlers::create_user))
        .route("/users/{user_id}", get(handlers::get_user))
        // Accounts
        .route("/accounts", post(handlers::create_account))
        .route("/accounts/{account_id}", get(handlers::get_account))
        .route("/accounts/{account_id}/deposits", post(handlers::deposit))
        .route(
            "/accounts/{account_id}/withdrawals",
            post(handlers::withdraw),
        )
        .route("/accounts/{account_id}/transfers", post(handlers::transfer))
        .route(
            "/accounts/{account_id}/transactions",
            get(handlers::get_transactions),
        )
        .with_state(state)
}

pub async fn run_gateway(state: Arc<AppState>, config: &GatewayConfig) -> anyhow::Result<()> {
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind gateway to {}", addr))?;

    println!("🚀 Gateway listening on http://{}", addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
