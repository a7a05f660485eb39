use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use wayfare_core::{Role, User};

use crate::error::AppError;
use crate::state::{AppState, AuthConfig};

pub const TOKEN_HEADER: &str = "x-access-token";
pub const MISSING_TOKEN: &str = "No token provided";
pub const INVALID_TOKEN: &str = "Invalid token";

// ============================================================================
// JWT Claims
// ============================================================================

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub role: Role,
    pub exp: usize,
}

impl Claims {
    /// Fails when the configured lifetime does not fit a timestamp.
    pub fn for_user(user: &User, auth: &AuthConfig) -> Result<Self, AppError> {
        let exp = i64::try_from(auth.expiration)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .and_then(|ttl| chrono::Utc::now().checked_add_signed(ttl))
            .and_then(|exp| usize::try_from(exp.timestamp()).ok())
            .ok_or_else(|| {
                AppError::InternalServerError(format!(
                    "Token lifetime of {}s is out of range",
                    auth.expiration
                ))
            })?;

        Ok(Self {
            sub: user.id,
            email: user.email.clone(),
            role: user.role,
            exp,
        })
    }

    pub fn encode(&self, auth: &AuthConfig) -> Result<String, AppError> {
        encode(&Header::default(), self, &EncodingKey::from_secret(auth.secret.as_bytes()))
            .map_err(|e| AppError::InternalServerError(format!("Token encoding failed: {}", e)))
    }

    pub fn decode(token: &str, auth: &AuthConfig) -> Result<Self, AppError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(auth.secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|e| {
            tracing::debug!("Rejected token: {}", e);
            AppError::AuthenticationError(INVALID_TOKEN.to_string())
        })
    }
}

// ============================================================================
// Authentication Middleware
// ============================================================================

/// Reads `x-access-token`, falling back to `Authorization: Bearer`, and
/// injects the decoded claims into the request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let token = match parts.headers.get(TOKEN_HEADER) {
        Some(value) => value
            .to_str()
            .map(|v| v.trim().to_string())
            .map_err(|_| AppError::AuthenticationError(INVALID_TOKEN.to_string()))?,
        None => TypedHeader::<Authorization<Bearer>>::from_request_parts(&mut parts, &state)
            .await
            .map(|TypedHeader(Authorization(bearer))| bearer.token().to_string())
            .map_err(|_| AppError::AuthenticationError(MISSING_TOKEN.to_string()))?,
    };

    if token.is_empty() {
        return Err(AppError::AuthenticationError(MISSING_TOKEN.to_string()));
    }

    let claims = Claims::decode(&token, &state.auth)?;
    let mut req = Request::from_parts(parts, body);
    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

/// Claims of the authenticated caller, as injected by `auth_middleware`.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| AppError::AuthenticationError(MISSING_TOKEN.to_string()))
    }
}
