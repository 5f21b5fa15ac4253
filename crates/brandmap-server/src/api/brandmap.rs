use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use brandmap_core::BrandMapRequest;
use brandmap_pipeline::BrandMap;

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

/// `POST /api/v1/brandmap`
///
/// Validates the whole body before any collaborator is contacted. The
/// pipeline runs on its own task so that a panic escaping it becomes a
/// generic 500 instead of a dropped connection.
pub(super) async fn create_brand_map(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    payload: Result<Json<BrandMapRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<BrandMap>>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::debug!(error = %rejection, "rejected brand map body");
        ApiError::new(req_id.0.clone(), "bad_request", rejection.body_text())
    })?;

    let descriptor = request.validate().map_err(|errors| {
        tracing::info!(error = %errors, "brand map request failed validation");
        ApiError::new(req_id.0.clone(), "validation_error", "invalid brand map request")
            .with_details(errors.0)
    })?;

    let pipeline = state.pipeline.clone();
    let brand_map = tokio::spawn(async move { pipeline.run(descriptor).await })
        .await
        .map_err(|e| {
            tracing::error!(request_id = %req_id.0, error = %e, "brand map pipeline aborted");
            ApiError::new(
                req_id.0.clone(),
                "internal_error",
                "An unexpected error occurred while building the brand map.",
            )
        })?;

    Ok(Json(ApiResponse {
        data: brand_map,
        meta: ResponseMeta::new(req_id.0),
    }))
}
