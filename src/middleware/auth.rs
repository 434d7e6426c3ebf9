use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::error::{AppError, Result};
use crate::security::verify_token;
use crate::AppState;

/// Authenticated caller, inserted into request extensions
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub username: String,
}

/// Token from an `Authorization: Bearer <token>` header
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Middleware that rejects requests without a valid login token
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response> {
    let token = bearer_token(request.headers()).ok_or(AppError::MissingToken)?;

    let claims = verify_token(token, &state.config.jwt_secret).map_err(|e| {
        tracing::debug!("Rejected login token on {}: {}", request.uri().path(), e);
        e
    })?;

    tracing::debug!("Authenticated {} for {}", claims.username, request.uri().path());
    request.extensions_mut().insert(AuthUser {
        username: claims.username,
    });

    Ok(next.run(request).await)
}
