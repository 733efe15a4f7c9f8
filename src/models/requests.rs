//! Request DTOs for the catalog API
//!
//! Property create/patch payloads live in `models::property`; search
//! parameters are parsed by `catalog::SearchFilter`.

use serde::Deserialize;

/// Request body for `POST /api/auth/register` and `POST /api/auth/login`
#[derive(Debug, Clone, Deserialize)]
pub struct CredentialsRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl CredentialsRequest {
    /// Returns an error message if either field is blank, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.email.trim().is_empty() || self.password.is_empty() {
            return Some("Email and password are required".to_string());
        }
        None
    }
}
