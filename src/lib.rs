//! Coupon API Library
//!
//! Coupon eligibility and discount computation: matching coupons against
//! cart contents and order value, enforcing expiry and usage constraints,
//! splitting discounts between items and charges, and serving the coupon
//! catalog through a write-invalidated cache.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod cache;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod openapi;
pub mod services;

use axum::{extract::State, response::Json, routing::get, Router};
use sea_orm::DatabaseConnection;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::events::EventSender;

/// Shared state wired into every request handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub event_sender: EventSender,
    pub services: handlers::AppServices,
}

/// Versioned API routes
pub fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .route("/status", get(api_status))
        .route("/health", get(health_check))
        .nest("/coupons", handlers::coupons::coupon_routes())
        .nest("/admin", handlers::coupons::admin_routes())
        .nest("/items", handlers::items::item_routes())
        .nest("/orders", handlers::orders::order_routes())
        .nest("/users", handlers::users::user_routes())
}

async fn api_status() -> Json<Value> {
    let status_data = json!({
        "status": "ok",
        "service": "coupon-api",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    Json(status_data)
}

async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let db_status = match state.db.ping().await {
        Ok(_) => "healthy",
        Err(_) => "unhealthy",
    };

    Json(json!({
        "status": db_status,
        "checks": {
            "database": db_status,
        },
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
