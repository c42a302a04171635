//! HTTP handlers for supplier intake endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::SupplierService;
use crate::AppState;
use shared::{
    AddVarietyInput, QuickSupplierInput, QuickSupplierResponse, SearchSupplierResponse, Supplier,
};

/// Body of the supplier search request
#[derive(Debug, Deserialize)]
pub struct SearchSupplierRequest {
    pub code: String,
}

/// Look up a supplier by intake code, probing for a same-day delivery
pub async fn search_supplier(
    State(state): State<AppState>,
    Json(input): Json<SearchSupplierRequest>,
) -> AppResult<Json<SearchSupplierResponse>> {
    let service = SupplierService::new(state.db);
    let response = service
        .search_by_code(&input.code, state.day_boundary, Utc::now())
        .await?;
    Ok(Json(response))
}

/// Create a supplier from the intake screen
pub async fn quick_create_supplier(
    State(state): State<AppState>,
    Json(input): Json<QuickSupplierInput>,
) -> AppResult<Json<QuickSupplierResponse>> {
    let service = SupplierService::new(state.db);
    let response = service.quick_create(input).await?;
    Ok(Json(response))
}

/// Get supplier by ID
pub async fn get_supplier(
    State(state): State<AppState>,
    Path(supplier_id): Path<Uuid>,
) -> AppResult<Json<Supplier>> {
    let service = SupplierService::new(state.db);
    let supplier = service.get_supplier(supplier_id).await?;
    Ok(Json(supplier))
}

/// List all suppliers
pub async fn list_suppliers(State(state): State<AppState>) -> AppResult<Json<Vec<Supplier>>> {
    let service = SupplierService::new(state.db);
    let suppliers = service.list_suppliers().await?;
    Ok(Json(suppliers))
}

/// Add a (species, variety) pair to a supplier's catalog
pub async fn add_variety(
    State(state): State<AppState>,
    Path(supplier_id): Path<Uuid>,
    Json(input): Json<AddVarietyInput>,
) -> AppResult<Json<Supplier>> {
    let service = SupplierService::new(state.db);
    let supplier = service.add_variety(supplier_id, input).await?;
    Ok(Json(supplier))
}
