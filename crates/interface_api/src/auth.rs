//! Authentication
//!
//! Bearer tokens carry the user id, email and platform roles. The engine only
//! needs the resulting [`Actor`]; party powers are derived from the entity.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use core_kernel::{Actor, Role, UserId};

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    pub email: String,
    /// Platform roles; the most privileged one wins
    #[serde(default)]
    pub roles: Vec<String>,
    /// Expiration timestamp
    pub exp: i64,
    /// Issued at timestamp
    pub iat: i64,
}

impl Claims {
    /// Resolves the acting identity
    pub fn actor(&self) -> Result<Actor, AuthError> {
        let user_id: UserId = self.sub.parse().map_err(|_| AuthError::InvalidSubject)?;
        let role = self
            .roles
            .iter()
            .filter_map(|r| r.parse::<Role>().ok())
            .max_by_key(|r| match r {
                Role::User => 0,
                Role::Moderator => 1,
                Role::Admin => 2,
            })
            .unwrap_or(Role::User);
        Ok(Actor::new(user_id, role, self.email.clone()))
    }
}

/// Auth errors
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid token")]
    InvalidToken,
    #[error("Token expired")]
    TokenExpired,
    #[error("Token subject is not a user id")]
    InvalidSubject,
}

/// Creates a new JWT token
///
/// # Arguments
///
/// * `actor` - Identity the token stands for
/// * `secret` - JWT secret key
/// * `expiration_secs` - Token validity in seconds
pub fn create_token(
    actor: &Actor,
    secret: &str,
    expiration_secs: u64,
) -> Result<String, AuthError> {
    let now = Utc::now();
    let secs = i64::try_from(expiration_secs).unwrap_or(i64::MAX).min(i64::MAX / 1000);
    let exp = now + Duration::seconds(secs);

    let claims = Claims {
        sub: actor.user_id.as_uuid().to_string(),
        email: actor.email.clone(),
        roles: vec![actor.role.as_str().to_string()],
        exp: exp.timestamp(),
        iat: now.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|_| AuthError::InvalidToken)
}

/// Validates a JWT token
///
/// # Arguments
///
/// * `token` - The JWT token to validate
/// * `secret` - JWT secret key
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, AuthError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| match e.kind() {
        JwtErrorKind::ExpiredSignature => AuthError::TokenExpired,
        _ => AuthError::InvalidToken,
    })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    const SECRET: &str = "test-secret";

    #[test]
    fn test_token_round_trip_yields_actor() {
        let actor = Actor::moderator(UserId::new(), "mod@example.com");
        let token = create_token(&actor, SECRET, 60).unwrap();

        let claims = validate_token(&token, SECRET).unwrap();
        assert_eq!(claims.actor().unwrap(), actor);
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let actor = Actor::user(UserId::new(), "client@example.com");
        let token = create_token(&actor, SECRET, 60).unwrap();
        assert!(matches!(validate_token(&token, "other"), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_most_privileged_role_wins() {
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            email: "ops@example.com".to_string(),
            roles: vec!["user".to_string(), "admin".to_string(), "auditor".to_string()],
            exp: 0,
            iat: 0,
        };
        assert_eq!(claims.actor().unwrap().role, Role::Admin);
    }

    #[test]
    fn test_non_uuid_subject_is_rejected() {
        let claims = Claims {
            sub: "alice".to_string(),
            email: "alice@example.com".to_string(),
            roles: vec![],
            exp: 0,
            iat: 0,
        };
        assert!(matches!(claims.actor(), Err(AuthError::InvalidSubject)));
    }
}
