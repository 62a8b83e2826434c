use super::crypto::token_matches;
use crate::api::ErrorResponse;
use crate::AppState;
use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

/// Middleware that requires the shared function secret as a bearer token.
///
/// Does nothing when no secret is configured.
pub async fn require_function_secret(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let Some(secret) = state.function_secret.as_deref() else {
        return next.run(request).await;
    };

    let token = match bearer_token(&request) {
        Ok(token) => token,
        Err(message) => return unauthorized(message),
    };

    if !token_matches(token, secret) {
        return unauthorized("Invalid credentials");
    }

    next.run(request).await
}

fn bearer_token(request: &Request<Body>) -> Result<&str, &'static str> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or("Missing Authorization header")?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header")?;

    auth_str
        .strip_prefix("Bearer ")
        .ok_or("Invalid Authorization header format")
}

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorResponse::new(message)),
    )
        .into_response()
}
