use axum::{extract::State, Json};
use std::sync::Arc;

use crate::{models::Product, routes::AppState, services::recommendations};

/// Handler for the catalog listing endpoint
pub async fn list(State(state): State<Arc<AppState>>) -> Json<Vec<Product>> {
    Json(recommendations::list_products(&state.catalog).to_vec())
}
