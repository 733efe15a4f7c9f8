//! JWT issuance and validation (HS256).

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CatalogError, Result};

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    /// Subject (user id)
    pub sub: Uuid,
    pub email: String,
    /// Issued at (timestamp)
    pub iat: i64,
    /// Expiration time (timestamp)
    pub exp: i64,
}

pub struct JwtAuth {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtAuth {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Issues a token for a user.
    ///
    /// # Arguments
    /// * `user_id` - Becomes the `sub` claim
    /// * `email` - Carried for display; never used for authorization
    /// * `expires_in_hours` - Token lifetime
    pub fn generate_token(&self, user_id: &Uuid, email: &str, expires_in_hours: i64) -> Result<String> {
        let now = Utc::now();
        let exp = now + Duration::hours(expires_in_hours);

        let claims = Claims {
            sub: *user_id,
            email: email.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| CatalogError::Internal(format!("Failed to generate token: {}", e)))
    }

    pub fn validate_token(&self, token: &str) -> Result<Claims> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|_| CatalogError::Unauthorized("Invalid or expired token".to_string()))
    }

    /// Extract token from Authorization header (Bearer token)
    pub fn extract_bearer_token(auth_header: &str) -> Result<&str> {
        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| {
                CatalogError::Unauthorized("Invalid authorization header format".to_string())
            })?
            .trim();

        if token.is_empty() {
            return Err(CatalogError::Unauthorized("Empty token".to_string()));
        }
        Ok(token)
    }
}
