//! Basket API Library
//!
//! This crate provides the shopping basket backend: anonymous cookie-based
//! buyer identity, find-or-create basket semantics, and quantity arithmetic
//! over a basket-item collection, persisted through sea-orm.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod migrator;
pub mod openapi;
pub mod services;

use axum::Router;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub event_sender: events::EventSender,
    pub services: handlers::AppServices,
}

// API routes function
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .nest("/api/basket", handlers::basket_routes())
        .nest("/api/products", handlers::products_routes())
}
