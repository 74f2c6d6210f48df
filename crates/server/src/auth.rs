use axum::extract::{FromRef, FromRequestParts};
use axum::http::header;
use axum::http::request::Parts;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use moonwallet_core::HandlerError;
use serde::Deserialize;

use crate::error::ApiError;
use crate::routes::AppState;

#[derive(Debug, Deserialize)]
struct Claims {
    sub: String,
}

/// Extracts the authenticated identity from a bearer JWT.
/// Any missing/invalid token, and an empty subject, reject with
/// AuthenticationRequired before the handler body runs.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub String);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);

        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or(ApiError(HandlerError::AuthenticationRequired))?;

        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(state.jwt_secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .map_err(|_| ApiError(HandlerError::AuthenticationRequired))?;

        if data.claims.sub.is_empty() {
            return Err(ApiError(HandlerError::AuthenticationRequired));
        }

        Ok(AuthenticatedUser(data.claims.sub))
    }
}
