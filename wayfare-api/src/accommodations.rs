use axum::{extract::State, routing::get, Json, Router};
use wayfare_core::Accommodation;
use wayfare_shared::ApiResponse;

use crate::{error::AppError, middleware::AuthUser, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/v1/accommodations", get(list_accommodations))
}

/// GET /api/v1/accommodations
async fn list_accommodations(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<Accommodation>>>, AppError> {
    let accommodations = state.accommodations.list_accommodations().await?;
    Ok(Json(ApiResponse::ok("Accommodations retrieved successfully", accommodations)))
}
