use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::constants::ERR_MISSING_JWT;
use crate::error::AppError;
use crate::security::{decode_token, extract_bearer_token};
use crate::AppState;

/// Authenticated caller, taken from a verified bearer token
///
/// Adding this extractor to a handler is what makes the route protected:
/// a missing or malformed header is a 400, a bad or expired token a 401.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthUser {
    pub user_id: i64,
    pub email: String,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(extract_bearer_token)
            .ok_or_else(|| {
                tracing::warn!("No bearer token on {}", parts.uri.path());
                AppError::bad_request(ERR_MISSING_JWT)
            })?;

        let claims = decode_token(token, &state.config.jwt_secret)?;

        Ok(AuthUser {
            user_id: claims.user_id,
            email: claims.email,
        })
    }
}
