//! Route definitions for the Flower Delivery Management Platform

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Supplier intake
        .nest("/suppliers", supplier_routes())
        // Delivery management
        .nest("/deliveries", delivery_routes())
        // Reject category catalog
        .nest("/categories", category_routes())
        // Reporting
        .nest("/reports", report_routes())
}

/// Supplier intake routes
fn supplier_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_suppliers))
        .route("/search", post(handlers::search_supplier))
        .route("/quick", post(handlers::quick_create_supplier))
        .route("/:supplier_id", get(handlers::get_supplier))
        .route("/:supplier_id/varieties", post(handlers::add_variety))
}

/// Delivery management routes
fn delivery_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_deliveries).post(handlers::create_delivery),
        )
        .route(
            "/:delivery_id",
            get(handlers::get_delivery).put(handlers::update_delivery),
        )
}

/// Reject category catalog routes
fn category_routes() -> Router<AppState> {
    Router::new().route("/", get(handlers::list_categories))
}

/// Reporting routes
fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/daily-intake", get(handlers::daily_intake_report))
        .route("/daily-intake/csv", get(handlers::daily_intake_csv))
}
