use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;
use wayfare_core::accommodation::ACCOMMODATION_NOT_FOUND;
use wayfare_core::trip::{NewTrip, NOT_EDITABLE, REQUEST_NOT_FOUND};
use wayfare_core::{
    CoreError, Notification, NotificationKind, RequestStatus, Role, TripDetails, TripRequest, TripUpdate, User,
};
use wayfare_shared::ApiResponse;

use crate::{error::AppError, middleware::AuthUser, state::AppState};

pub const TRIP_BOOKED: &str = "Trip booked successfully";
// Spelling matches what deployed clients already compare against.
pub const TRIP_UPDATED: &str = "Trip udpdated successfully";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripBooked {
    pub success: bool,
    pub message: String,
    pub trip_created: TripRequest,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripUpdated {
    pub success: bool,
    pub message: String,
    pub updated_data: TripRequest,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/request/book_trip", post(book_trip))
        .route("/api/v1/request/book_return_trip", post(book_return_trip))
        .route("/api/v1/request", get(list_requests).patch(update_trip))
        .route("/api/v1/request/", get(list_requests).patch(update_trip))
        .route("/api/v1/request/{id}", get(get_request))
        .route("/api/v1/request/{id}/approve", patch(approve_request))
        .route("/api/v1/request/{id}/reject", patch(reject_request))
}

fn not_found() -> AppError {
    AppError::NotFoundError(REQUEST_NOT_FOUND.to_string())
}

async fn ensure_accommodation(state: &AppState, id: Uuid) -> Result<(), AppError> {
    match state.accommodations.get_accommodation(id).await? {
        Some(_) => Ok(()),
        None => Err(AppError::NotFoundError(ACCOMMODATION_NOT_FOUND.to_string())),
    }
}

/// Notifications are best-effort: a failure is logged and the request
/// itself still succeeds.
async fn notify(state: &AppState, recipient_id: Uuid, request: &TripRequest, kind: NotificationKind, requester: &User) {
    let notification = Notification::new(recipient_id, request, kind, requester);
    if let Err(e) = state.notifications.create_notification(&notification).await {
        warn!(request_id = %request.id, kind = kind.as_str(), "Failed to store notification: {}", e);
    }
}

async fn notify_manager(state: &AppState, requester: &User, request: &TripRequest, kind: NotificationKind) {
    if let Some(manager_id) = requester.manager_id {
        notify(state, manager_id, request, kind, requester).await;
    }
}

async fn create_trip(
    state: &AppState,
    auth: &AuthUser,
    trip: NewTrip,
) -> Result<(StatusCode, Json<ApiResponse<TripBooked>>), AppError> {
    let requester = state.current_user(auth.0.sub).await?;
    ensure_accommodation(state, trip.accommodation_id).await?;

    let request = TripRequest::new(requester.id, trip);
    state.requests.create_request(&request).await?;
    info!(
        request_id = %request.id,
        user_id = %requester.id,
        round_trip = request.is_round_trip(),
        "Trip booked"
    );

    notify_manager(state, &requester, &request, NotificationKind::TripRequested).await;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(
            TRIP_BOOKED,
            TripBooked {
                success: true,
                message: TRIP_BOOKED.to_string(),
                trip_created: request,
            },
        )),
    ))
}

/// POST /api/v1/request/book_trip
async fn book_trip(
    State(state): State<AppState>,
    auth: AuthUser,
    payload: Result<Json<TripDetails>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<TripBooked>>), AppError> {
    let Json(details) = payload?;
    let trip = details.validate_one_way()?;
    create_trip(&state, &auth, trip).await
}

/// POST /api/v1/request/book_return_trip
async fn book_return_trip(
    State(state): State<AppState>,
    auth: AuthUser,
    payload: Result<Json<TripDetails>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<TripBooked>>), AppError> {
    let Json(details) = payload?;
    let trip = details.validate_return()?;
    create_trip(&state, &auth, trip).await
}

/// PATCH /api/v1/request/
/// The lookup runs before the field checks, so an unknown id is a 404 even
/// when the body is otherwise invalid.
async fn update_trip(
    State(state): State<AppState>,
    auth: AuthUser,
    payload: Result<Json<TripUpdate>, JsonRejection>,
) -> Result<Json<ApiResponse<TripUpdated>>, AppError> {
    let Json(update) = payload?;
    let request_id = update.request_id()?;

    let mut request = state
        .requests
        .get_request(request_id)
        .await?
        .filter(|r| r.user_id == auth.0.sub)
        .ok_or_else(not_found)?;

    request.ensure_editable()?;
    if let Some(accommodation_id) = request.apply_update(&update)? {
        ensure_accommodation(&state, accommodation_id).await?;
    }

    if !state
        .requests
        .update_request(&request, RequestStatus::Pending)
        .await?
    {
        return Err(AppError::ValidationError(NOT_EDITABLE.to_string()));
    }
    info!(request_id = %request.id, "Trip updated");

    let requester = state.current_user(auth.0.sub).await?;
    notify_manager(&state, &requester, &request, NotificationKind::TripUpdated).await;

    Ok(Json(ApiResponse::ok(
        TRIP_UPDATED,
        TripUpdated {
            success: true,
            message: TRIP_UPDATED.to_string(),
            updated_data: request,
        },
    )))
}

/// GET /api/v1/request/
async fn list_requests(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<TripRequest>>>, AppError> {
    let requests = state.requests.list_for_user(auth.0.sub).await?;
    Ok(Json(ApiResponse::ok("Requests retrieved successfully", requests)))
}

/// GET /api/v1/request/{id}
/// Visible to the requester, the requester's line manager and admins.
async fn get_request(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<TripRequest>>, AppError> {
    let id = Uuid::parse_str(&id).map_err(|_| not_found())?;
    let request = state.requests.get_request(id).await?.ok_or_else(not_found)?;

    let viewer = state.current_user(auth.0.sub).await?;
    let visible = request.user_id == viewer.id
        || viewer.role == Role::Admin
        || state
            .users
            .find_by_id(request.user_id)
            .await?
            .is_some_and(|owner| owner.manager_id == Some(viewer.id));
    if !visible {
        return Err(not_found());
    }

    Ok(Json(ApiResponse::ok("Request retrieved successfully", request)))
}

async fn decide(
    state: &AppState,
    auth: &AuthUser,
    id: &str,
    to: RequestStatus,
) -> Result<TripRequest, AppError> {
    let manager = state.current_user(auth.0.sub).await?;
    if !manager.role.is_manager() {
        return Err(AppError::AuthorizationError(
            wayfare_core::user::NOT_A_MANAGER.to_string(),
        ));
    }

    let id = Uuid::parse_str(id).map_err(|_| not_found())?;
    let mut request = state.requests.get_request(id).await?.ok_or_else(not_found)?;
    let requester = state
        .users
        .find_by_id(request.user_id)
        .await?
        .ok_or_else(not_found)?;

    manager.ensure_can_decide_for(&requester)?;
    let read_status = request.status;
    request.transition(to)?;
    if !state.requests.update_request(&request, read_status).await? {
        // Someone else decided in between; report what the row holds now.
        let current = state.requests.get_request(id).await?.ok_or_else(not_found)?;
        return Err(CoreError::InvalidTransition {
            from: current.status,
            to,
        }
        .into());
    }
    info!(request_id = %request.id, manager_id = %manager.id, status = %request.status, "Request decided");

    if let Some(kind) = NotificationKind::for_decision(to) {
        notify(state, requester.id, &request, kind, &requester).await;
    }

    Ok(request)
}

/// PATCH /api/v1/request/{id}/approve
async fn approve_request(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<TripRequest>>, AppError> {
    let request = decide(&state, &auth, &id, RequestStatus::Approved).await?;
    Ok(Json(ApiResponse::ok("Request approved successfully", request)))
}

/// PATCH /api/v1/request/{id}/reject
async fn reject_request(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<TripRequest>>, AppError> {
    let request = decide(&state, &auth, &id, RequestStatus::Rejected).await?;
    Ok(Json(ApiResponse::ok("Request rejected successfully", request)))
}
