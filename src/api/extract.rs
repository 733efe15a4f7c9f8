//! Bearer-token extractor for routes that need an authenticated user.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use uuid::Uuid;

use crate::api::AppState;
use crate::auth::JwtAuth;
use crate::error::CatalogError;

/// The caller identified by a valid `Authorization: Bearer <token>` header.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = CatalogError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or_else(|| CatalogError::Unauthorized("Access token is required".to_string()))?
            .to_str()
            .map_err(|_| {
                CatalogError::Unauthorized("Invalid authorization header format".to_string())
            })?;

        let token = JwtAuth::extract_bearer_token(header)?;
        let claims = state.auth.authenticate(token)?;

        Ok(AuthUser {
            id: claims.sub,
            email: claims.email,
        })
    }
}
