//! HTTP handlers for delivery endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::delivery::DeliverySummary;
use crate::services::DeliveryService;
use crate::AppState;
use shared::{Delivery, SaveDeliveryInput, SaveDeliveryResponse, UpdateDeliveryInput};

/// Query parameters for the delivery list
#[derive(Debug, Deserialize)]
pub struct DeliveryListQuery {
    /// Local calendar day; defaults to today at the farm
    pub date: Option<NaiveDate>,
}

/// Persist a new delivery
pub async fn create_delivery(
    State(state): State<AppState>,
    Json(input): Json<SaveDeliveryInput>,
) -> AppResult<Json<SaveDeliveryResponse>> {
    let service = DeliveryService::new(state.db);
    let response = service.create_delivery(input, state.day_boundary).await?;
    Ok(Json(response))
}

/// Replace the line-items of an existing delivery
pub async fn update_delivery(
    State(state): State<AppState>,
    Path(delivery_id): Path<Uuid>,
    Json(input): Json<UpdateDeliveryInput>,
) -> AppResult<Json<SaveDeliveryResponse>> {
    let service = DeliveryService::new(state.db);
    let response = service.update_delivery(delivery_id, input).await?;
    Ok(Json(response))
}

/// Get a delivery with all of its line-items
pub async fn get_delivery(
    State(state): State<AppState>,
    Path(delivery_id): Path<Uuid>,
) -> AppResult<Json<Delivery>> {
    let service = DeliveryService::new(state.db);
    let delivery = service.get_delivery(delivery_id).await?;
    Ok(Json(delivery))
}

/// List deliveries for one local calendar day
pub async fn list_deliveries(
    State(state): State<AppState>,
    Query(query): Query<DeliveryListQuery>,
) -> AppResult<Json<Vec<DeliverySummary>>> {
    let date = query
        .date
        .unwrap_or_else(|| state.day_boundary.local_date(Utc::now()));
    let service = DeliveryService::new(state.db);
    let deliveries = service.list_deliveries(date, state.day_boundary).await?;
    Ok(Json(deliveries))
}
