//! Session cookie middleware
//!
//! Every request gets a `SessionKey`. Returning visitors present it in the
//! session cookie; new visitors get a fresh random token, sent back with
//! `Set-Cookie`. Only the token's SHA-256 is ever stored.

use async_trait::async_trait;
use axum::{
    body::Body,
    extract::{FromRequestParts, State},
    http::{header, request::Parts, HeaderMap, HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use rand::Rng;

use crate::app::{hash_token, Shopper};
use crate::domain::entities::User;
use crate::error::AppError;
use crate::AppState;

/// Length of a session token in hex characters
const TOKEN_LEN: usize = 64;

/// The session of the current request
#[derive(Debug, Clone)]
pub struct SessionKey {
    token: String,
    fresh: bool,
}

impl SessionKey {
    pub fn new() -> Self {
        Self {
            token: generate_session_token(),
            fresh: true,
        }
    }

    /// Reuse a token presented by the client, if it is well formed
    pub fn from_token(token: &str) -> Option<Self> {
        is_valid_token(token).then(|| Self {
            token: token.to_string(),
            fresh: false,
        })
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// True when the token was minted for this request
    pub fn is_fresh(&self) -> bool {
        self.fresh
    }

    pub fn hash(&self) -> String {
        hash_token(&self.token)
    }
}

impl Default for SessionKey {
    fn default() -> Self {
        Self::new()
    }
}

fn generate_session_token() -> String {
    let mut rng = rand::thread_rng();
    let bytes: Vec<u8> = (0..TOKEN_LEN / 2).map(|_| rng.gen()).collect();
    hex::encode(bytes)
}

fn is_valid_token(token: &str) -> bool {
    token.len() == TOKEN_LEN && token.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Find a cookie value by name across all Cookie headers
fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim_matches('"').to_string())
}

fn session_cookie(name: &str, token: &str, secure: bool) -> String {
    let mut cookie = format!("{}={}; Path=/; HttpOnly; SameSite=Lax", name, token);
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Session middleware
///
/// Injects the `SessionKey` into request extensions and issues the cookie
/// when the session is new.
pub async fn session_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let cookie_name = state.config.session_cookie_name.as_str();
    let session = read_cookie(request.headers(), cookie_name)
        .and_then(|token| SessionKey::from_token(&token))
        .unwrap_or_default();

    request.extensions_mut().insert(session.clone());
    let mut response = next.run(request).await;

    if session.is_fresh() {
        let cookie = session_cookie(
            cookie_name,
            session.token(),
            state.config.session_cookie_secure,
        );
        match HeaderValue::from_str(&cookie) {
            Ok(value) => {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
            Err(e) => tracing::warn!(error = %e, "Failed to encode session cookie"),
        }
    }

    response
}

#[async_trait]
impl<S> FromRequestParts<S> for Shopper
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<SessionKey>()
            .ok_or_else(|| AppError::Internal("Session middleware is not installed".to_string()))?;

        let session_key_hash = session.hash();
        Ok(match parts.extensions.get::<User>().cloned() {
            Some(user) => Shopper::authenticated(user, session_key_hash),
            None => Shopper::anonymous(session_key_hash),
        })
    }
}
