use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

// =============================================================================
// Password Hashing
// =============================================================================

/// Hash a plaintext password with bcrypt
///
/// bcrypt is deliberately slow, so the work runs on the blocking pool
/// instead of stalling the async runtime.
pub async fn hash_password(password: String, cost: u32) -> Result<String> {
    let hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost)).await??;
    Ok(hash)
}

/// Check a plaintext password against a stored bcrypt hash
pub async fn verify_password(password: String, hash: String) -> Result<bool> {
    let matches = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash)).await??;
    Ok(matches)
}

// =============================================================================
// JWT
// =============================================================================

/// Claims carried by every access token
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    pub user_id: i64,
    pub email: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Sign an HS256 token for the given user
pub fn issue_token(user_id: i64, email: &str, secret: &str, ttl_hours: i64) -> Result<String> {
    let now = Utc::now();
    let claims = Claims {
        user_id,
        email: email.to_string(),
        iat: now.timestamp(),
        exp: (now + Duration::hours(ttl_hours)).timestamp(),
    };

    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}

/// Verify signature and expiry, returning the trusted claims
pub fn decode_token(token: &str, secret: &str) -> Result<Claims> {
    let validation = Validation::new(Algorithm::HS256);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| {
        tracing::warn!("JWT validation failed: {}", e);
        AppError::unauthorized(crate::constants::ERR_INVALID_JWT)
    })
}

/// Extract the token from an `Authorization: Bearer <token>` header value
pub fn extract_bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    let token = token.trim();

    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key";

    #[tokio::test]
    async fn test_hash_and_verify_password() {
        let hash = hash_password("hunter2".to_string(), 4).await.unwrap();

        assert_ne!(hash, "hunter2");
        assert!(verify_password("hunter2".to_string(), hash.clone())
            .await
            .unwrap());
        assert!(!verify_password("hunter3".to_string(), hash).await.unwrap());
    }

    #[tokio::test]
    async fn test_verify_password_rejects_garbage_hash() {
        let result = verify_password("hunter2".to_string(), "not-a-hash".to_string()).await;
        assert!(matches!(result, Err(AppError::PasswordHash(_))));
    }

    #[test]
    fn test_issue_and_decode_token() {
        let token = issue_token(42, "reader@example.com", SECRET, 72).unwrap();
        let claims = decode_token(&token, SECRET).unwrap();

        assert_eq!(claims.user_id, 42);
        assert_eq!(claims.email, "reader@example.com");
        assert_eq!(claims.exp - claims.iat, 72 * 3600);
    }

    #[test]
    fn test_decode_token_wrong_secret() {
        let token = issue_token(1, "a@b.c", SECRET, 1).unwrap();
        assert!(matches!(
            decode_token(&token, "other-secret"),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_decode_token_expired() {
        // Well past the default 60s leeway
        let token = issue_token(1, "a@b.c", SECRET, -2).unwrap();
        assert!(matches!(
            decode_token(&token, SECRET),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_decode_token_garbage() {
        assert!(decode_token("abc.def.ghi", SECRET).is_err());
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc.def"), Some("abc.def"));
        assert_eq!(extract_bearer_token("bearer  abc.def "), Some("abc.def"));
        assert_eq!(extract_bearer_token("Basic abc"), None);
        assert_eq!(extract_bearer_token("Bearer "), None);
        assert_eq!(extract_bearer_token("abc"), None);
    }
}
