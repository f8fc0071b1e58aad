/// Bearer token issuance/validation and password hashing
///
/// Tokens are HS256 JWTs signed with the configured secret. OAuth state
/// tokens reuse the same signing key with a short TTL so provider callbacks
/// (which arrive without an Authorization header) can still be tied back to
/// the initiating user.
use crate::error::{AppError, Result};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const OAUTH_STATE_TTL_SECS: i64 = 600; // 10 minutes

/// Claims for API bearer tokens
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
}

/// Claims for one-time OAuth state tokens
#[derive(Debug, Serialize, Deserialize)]
pub struct OAuthStateClaims {
    pub sub: String,
    pub platform: String,
    pub exp: i64,
}

#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    token_ttl_secs: i64,
}

impl TokenIssuer {
    pub fn new(secret: &str, token_ttl_secs: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            token_ttl_secs,
        }
    }

    /// Issue an access token for a user
    pub fn issue(&self, user_id: Uuid) -> Result<String> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now,
            exp: now + self.token_ttl_secs,
        };
        Ok(encode(&Header::default(), &claims, &self.encoding)?)
    }

    /// Validate an access token and return the user id
    pub fn validate(&self, token: &str) -> Result<Uuid> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default())?;
        Uuid::parse_str(&data.claims.sub)
            .map_err(|_| AppError::Unauthorized("Invalid subject in token".to_string()))
    }

    /// Issue a short-lived state token for an OAuth redirect flow
    pub fn issue_oauth_state(&self, user_id: Uuid, platform: &str) -> Result<String> {
        let claims = OAuthStateClaims {
            sub: user_id.to_string(),
            platform: platform.to_string(),
            exp: Utc::now().timestamp() + OAUTH_STATE_TTL_SECS,
        };
        Ok(encode(&Header::default(), &claims, &self.encoding)?)
    }

    /// Validate an OAuth state token, returning (user_id, platform)
    pub fn validate_oauth_state(&self, state: &str) -> Result<(Uuid, String)> {
        let data = decode::<OAuthStateClaims>(state, &self.decoding, &Validation::default())?;
        let user_id = Uuid::parse_str(&data.claims.sub)
            .map_err(|_| AppError::Unauthorized("Invalid OAuth state".to_string()))?;
        Ok((user_id, data.claims.platform))
    }
}

/// Hash a password using Argon2id with a random per-password salt
pub fn hash_password(password: &str) -> Result<String> {
    if password.len() < 8 {
        return Err(AppError::Validation(
            "Password must be at least 8 characters".to_string(),
        ));
    }

    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?
        .to_string();

    Ok(password_hash)
}

/// Verify a password against its PHC-formatted hash
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|e| AppError::Internal(format!("Invalid password hash format: {}", e)))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(_) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AppError::Internal(format!(
            "Password verification failed: {}",
            e
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_password() {
        let hash = hash_password("sponsors4ever!").expect("should hash");
        assert!(verify_password("sponsors4ever!", &hash).expect("should verify"));
        assert!(!verify_password("wrong-password", &hash).expect("should verify"));
    }

    #[test]
    fn test_short_password_rejected() {
        assert!(matches!(
            hash_password("short"),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_token_round_trip() {
        let issuer = TokenIssuer::new("test-secret", 3600);
        let user_id = Uuid::new_v4();
        let token = issuer.issue(user_id).expect("should issue");
        assert_eq!(issuer.validate(&token).expect("should validate"), user_id);
    }

    #[test]
    fn test_token_rejected_with_wrong_secret() {
        let issuer = TokenIssuer::new("test-secret", 3600);
        let other = TokenIssuer::new("other-secret", 3600);
        let token = issuer.issue(Uuid::new_v4()).expect("should issue");
        assert!(other.validate(&token).is_err());
    }

    #[test]
    fn test_oauth_state_round_trip() {
        let issuer = TokenIssuer::new("test-secret", 3600);
        let user_id = Uuid::new_v4();
        let state = issuer
            .issue_oauth_state(user_id, "youtube")
            .expect("should issue");
        let (decoded_user, platform) = issuer
            .validate_oauth_state(&state)
            .expect("should validate");
        assert_eq!(decoded_user, user_id);
        assert_eq!(platform, "youtube");
    }
}
