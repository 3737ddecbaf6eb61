use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{RecommendationRequest, RecommendationResult},
    routes::AppState,
    services::recommendations,
};

/// Handler for the recommendations endpoint
///
/// Malformed bodies and limit violations are rejected with 422 before the
/// model is called.
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    payload: Result<Json<RecommendationRequest>, JsonRejection>,
) -> AppResult<Json<RecommendationResult>> {
    let Json(request) = payload.map_err(|rejection| {
        let message = rejection.body_text();
        tracing::info!(request_id = %request_id, error = %message, "Rejected request body");
        AppError::Validation(message)
    })?;

    let (preferences, history) = request.validate().map_err(|e| {
        tracing::info!(request_id = %request_id, error = %e, "Rejected recommendation request");
        e
    })?;

    tracing::info!(
        request_id = %request_id,
        history_len = history.len(),
        "Processing recommendation request"
    );

    let result = recommendations::get_recommendations(
        &state.catalog,
        state.model.as_ref(),
        &preferences,
        &history,
    )
    .await?;

    tracing::info!(
        request_id = %request_id,
        count = result.count(),
        "Recommendation request completed"
    );

    Ok(Json(result))
}
