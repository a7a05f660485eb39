use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use once_cell::sync::Lazy;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;
use wayfare_core::password::{hash_password, verify_password};
use wayfare_core::repository::RepoError;
use wayfare_core::user::{Credentials, SignupDetails};
use wayfare_core::{Role, User};
use wayfare_shared::{ApiResponse, Masked};

use crate::{error::AppError, middleware::auth::Claims, state::AppState};

pub const INVALID_CREDENTIALS: &str = "Invalid email or password";
pub const EMAIL_TAKEN: &str = "Email already in use";

// Verified against when the e-mail is unknown so both failure paths cost
// one Argon2 run.
static DUMMY_HASH: Lazy<Option<String>> = Lazy::new(|| hash_password("wayfare-unknown-account").ok());

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDetails {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
    pub manager_id: Option<Uuid>,
    pub token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthData {
    pub user_details: UserDetails,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/auth/login", post(login))
        .route("/api/v1/auth/signup", post(signup))
}

fn issue(state: &AppState, user: User) -> Result<AuthData, AppError> {
    let token = Claims::for_user(&user, &state.auth)?.encode(&state.auth)?;
    Ok(AuthData {
        user_details: UserDetails {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            role: user.role,
            manager_id: user.manager_id,
            token,
        },
    })
}

async fn login(
    State(state): State<AppState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<Json<ApiResponse<AuthData>>, AppError> {
    let Json(credentials) = payload?;
    let (email, password) = credentials.validate()?;

    let Some(user) = state.users.find_by_email(&email).await? else {
        if let Some(dummy) = DUMMY_HASH.as_deref() {
            let _ = verify_password(&password, dummy);
        }
        info!(email = %Masked(&email), "Rejected login for unknown account");
        return Err(AppError::AuthenticationError(INVALID_CREDENTIALS.to_string()));
    };

    let valid = verify_password(&password, &user.password_hash)
        .map_err(|e| AppError::InternalServerError(format!("Stored hash unreadable: {}", e)))?;
    if !valid {
        info!(email = %Masked(&email), "Rejected login");
        return Err(AppError::AuthenticationError(INVALID_CREDENTIALS.to_string()));
    }

    info!(user_id = %user.id, "User logged in");
    Ok(Json(ApiResponse::ok("Login successful", issue(&state, user)?)))
}

async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<SignupDetails>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<AuthData>>), AppError> {
    let Json(details) = payload?;
    let (profile, password) = details.validate()?;

    if let Some(manager_id) = profile.manager_id {
        let manager = state.users.find_by_id(manager_id).await?;
        if !manager.is_some_and(|m| m.role.is_manager()) {
            return Err(AppError::NotFoundError("Manager not found".to_string()));
        }
    }

    let hash = hash_password(&password)
        .map_err(|e| AppError::InternalServerError(format!("Password hashing failed: {}", e)))?;
    let user = User::new(profile, hash);

    state.users.create_user(&user).await.map_err(|e| match e {
        RepoError::UniqueViolation(_) => AppError::ConflictError(EMAIL_TAKEN.to_string()),
        other => other.into(),
    })?;

    info!(user_id = %user.id, email = %Masked(&user.email), "User signed up");
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("User created successfully", issue(&state, user)?)),
    ))
}
