//! API key authentication middleware

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};

use crate::app::hash_token;
use crate::error::AppError;
use crate::AppState;

/// Extract the bearer token from the Authorization header
fn extract_api_key(request: &Request<Body>) -> Option<&str> {
    request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
}

/// Optional authentication middleware
///
/// Resolves the API key to a User and injects it into request extensions.
/// Missing or unknown keys leave the request anonymous.
pub async fn optional_auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let api_key = extract_api_key(&request).map(str::to_owned);

    if let Some(api_key) = api_key {
        match state.user_service.authenticate(&api_key).await {
            Ok(Some(user)) => {
                tracing::debug!(
                    user_id = %user.id,
                    name = %user.full_name(),
                    "Authenticated request"
                );
                request.extensions_mut().insert(user);
            }
            Ok(None) => tracing::debug!("Unknown API key, continuing anonymously"),
            Err(e) => tracing::warn!(error = %e, "Failed to look up API key"),
        }
    }

    next.run(request).await
}

/// Admin middleware
///
/// Requires `Authorization: Bearer <ADMIN_TOKEN>`. Admin routes are closed
/// entirely when no admin token is configured.
pub async fn admin_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let expected = state.config.admin_token.as_deref().ok_or(AppError::Forbidden)?;
    let given = extract_api_key(&request).ok_or(AppError::Unauthorized)?;

    if hash_token(given) != hash_token(expected) {
        tracing::warn!("Rejected admin request with a wrong token");
        return Err(AppError::Unauthorized);
    }

    Ok(next.run(request).await)
}
