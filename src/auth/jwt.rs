//! JWT token handling

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// JWT configuration
#[derive(Clone)]
pub struct JwtConfig {
    /// Secret key for signing tokens
    pub secret: String,
    /// Token expiration time in hours
    pub expiration_hours: i64,
    /// Issuer claim
    pub issuer: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: std::env::var("JWT_SECRET")
                .unwrap_or_else(|_| "super-secret-key-change-in-production".to_string()),
            expiration_hours: 24,
            issuer: "chargefinder".to_string(),
        }
    }
}

/// JWT claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Username
    pub username: String,
    /// User role
    pub role: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Issuer
    pub iss: String,
}

impl Claims {
    pub fn new(user_id: &str, username: &str, role: &str, config: &JwtConfig) -> Self {
        let now = Utc::now();
        let exp = now + Duration::hours(config.expiration_hours);

        Self {
            sub: user_id.to_string(),
            username: username.to_string(),
            role: role.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: config.issuer.clone(),
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }

    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

/// Authentication errors
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing authentication token")]
    MissingToken,
    #[error("Invalid authentication token")]
    InvalidToken,
    #[error("Authentication token expired")]
    ExpiredToken,
}

/// Create a signed JWT for a user
pub fn create_token(claims: &Claims, config: &JwtConfig) -> Result<String, AuthError> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
    .map_err(|_| AuthError::InvalidToken)
}

/// Verify a JWT and extract its claims
pub fn verify_token(token: &str, config: &JwtConfig) -> Result<Claims, AuthError> {
    let mut validation = Validation::default();
    validation.set_issuer(&[&config.issuer]);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
        _ => AuthError::InvalidToken,
    })
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret".into(),
            expiration_hours: 1,
            issuer: "chargefinder".into(),
        }
    }

    #[test]
    fn token_roundtrip() {
        let cfg = config();
        let claims = Claims::new("u-1", "alice", "user", &cfg);
        let token = create_token(&claims, &cfg).unwrap();

        let decoded = verify_token(&token, &cfg).unwrap();
        assert_eq!(decoded.sub, "u-1");
        assert_eq!(decoded.username, "alice");
        assert!(!decoded.is_admin());
        assert!(!decoded.is_expired());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let cfg = config();
        let claims = Claims::new("u-1", "alice", "user", &cfg);
        let token = create_token(&claims, &cfg).unwrap();

        let mut other = config();
        other.secret = "other-secret".into();
        assert!(verify_token(&token, &other).is_err());
    }

    #[test]
    fn wrong_issuer_is_rejected() {
        let cfg = config();
        let claims = Claims::new("u-1", "alice", "user", &cfg);
        let token = create_token(&claims, &cfg).unwrap();

        let mut other = config();
        other.issuer = "someone-else".into();
        assert!(verify_token(&token, &other).is_err());
    }

    #[test]
    fn admin_claim() {
        let cfg = config();
        let claims = Claims::new("u-1", "root", "admin", &cfg);
        assert!(claims.is_admin());
    }
}
