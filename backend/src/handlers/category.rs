//! HTTP handlers for the reject category catalog

use axum::{extract::State, Json};

use crate::error::AppResult;
use crate::services::CategoryService;
use crate::AppState;
use shared::Category;

/// List active reject categories with their subcategories
pub async fn list_categories(State(state): State<AppState>) -> AppResult<Json<Vec<Category>>> {
    let service = CategoryService::new(state.db);
    let categories = service.list_categories().await?;
    Ok(Json(categories))
}
