use axum::{
    extract::{Path, State},
    routing::{get, patch},
    Json, Router,
};
use serde::Serialize;
use uuid::Uuid;
use wayfare_core::notification::NOTIFICATION_NOT_FOUND;
use wayfare_core::{Notification, Role, User};
use wayfare_shared::ApiResponse;

use crate::{error::AppError, middleware::AuthUser, state::AppState};

pub const USER_NOT_FOUND: &str = "User not found";
pub const MANAGER_NOT_FOUND: &str = "Manager not found";
pub const NOT_YOUR_NOTIFICATIONS: &str = "You are not allowed to view these notifications";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadReceipt {
    pub id: Uuid,
    pub is_read: bool,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/managerNotification/{id}", get(manager_notifications))
        .route("/api/v1/userNotification/{id}", get(user_notifications))
        .route("/api/v1/notifications/{id}/read", patch(mark_read))
}

/// Resolves `:id` and checks the caller may read that inbox. Admins may
/// read any inbox.
async fn load_recipient(
    state: &AppState,
    auth: &AuthUser,
    id: &str,
    require_manager: bool,
) -> Result<User, AppError> {
    let not_found = || AppError::NotFoundError(USER_NOT_FOUND.to_string());
    let id = Uuid::parse_str(id).map_err(|_| not_found())?;
    let user = state.users.find_by_id(id).await?.ok_or_else(not_found)?;

    if require_manager && !user.role.is_manager() {
        return Err(AppError::NotFoundError(MANAGER_NOT_FOUND.to_string()));
    }
    let viewer = state.current_user(auth.0.sub).await?;
    if viewer.id != user.id && viewer.role != Role::Admin {
        return Err(AppError::AuthorizationError(NOT_YOUR_NOTIFICATIONS.to_string()));
    }
    Ok(user)
}

/// GET /api/v1/managerNotification/{id}
async fn manager_notifications(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Vec<Notification>>>, AppError> {
    let manager = load_recipient(&state, &auth, &id, true).await?;
    let notifications = state.notifications.list_for_recipient(manager.id).await?;
    Ok(Json(ApiResponse::ok("Notifications retrieved successfully", notifications)))
}

/// GET /api/v1/userNotification/{id}
async fn user_notifications(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Vec<Notification>>>, AppError> {
    let user = load_recipient(&state, &auth, &id, false).await?;
    let notifications = state.notifications.list_for_recipient(user.id).await?;
    Ok(Json(ApiResponse::ok("Notifications retrieved successfully", notifications)))
}

/// PATCH /api/v1/notifications/{id}/read
async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ReadReceipt>>, AppError> {
    let not_found = || AppError::NotFoundError(NOTIFICATION_NOT_FOUND.to_string());
    let id = Uuid::parse_str(&id).map_err(|_| not_found())?;
    if !state.notifications.mark_read(id, auth.0.sub).await? {
        return Err(not_found());
    }

    Ok(Json(ApiResponse::ok(
        "Notification marked as read",
        ReadReceipt { id, is_read: true },
    )))
}
