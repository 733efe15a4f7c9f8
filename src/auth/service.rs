//! Registration and login.

use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::auth::{hash_password, verify_password, Claims, JwtAuth};
use crate::error::{CatalogError, Result};
use crate::models::{CredentialsRequest, PublicUser, User};
use crate::store::UserStore;

const MIN_PASSWORD_LEN: usize = 8;
const INVALID_LOGIN: &str = "Invalid email or password";

pub struct AuthService {
    users: Arc<dyn UserStore>,
    jwt: JwtAuth,
    token_ttl_hours: i64,
    hash_cost: u32,
    /// Verified against when the email is unknown, so both login failures
    /// spend the same bcrypt work.
    decoy_hash: Arc<str>,
}

impl AuthService {
    /// Fails when `hash_cost` is outside bcrypt's accepted range.
    pub fn new(
        users: Arc<dyn UserStore>,
        secret: &str,
        token_ttl_hours: i64,
        hash_cost: u32,
    ) -> Result<Self> {
        let decoy_hash = hash_password(&Uuid::new_v4().to_string(), hash_cost)?;

        Ok(Self {
            users,
            jwt: JwtAuth::new(secret),
            token_ttl_hours,
            hash_cost,
            decoy_hash: decoy_hash.into(),
        })
    }

    /// Creates an account. Duplicate emails fail with ValidationFailed.
    pub async fn register(&self, req: &CredentialsRequest) -> Result<PublicUser> {
        if let Some(message) = req.validate() {
            return Err(CatalogError::ValidationFailed(message));
        }

        let email = normalize_email(&req.email);
        if !looks_like_email(&email) {
            return Err(CatalogError::ValidationFailed(
                "Invalid email format".to_string(),
            ));
        }
        if req.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(CatalogError::ValidationFailed(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        let password = req.password.clone();
        let cost = self.hash_cost;
        let password_hash = blocking(move || hash_password(&password, cost)).await?;

        let user = User::new(email, password_hash);
        let user = self.users.insert_user(user).await?;

        info!(user_id = %user.id, "user registered");
        Ok(user.public())
    }

    /// Checks credentials and issues a token.
    pub async fn login(&self, req: &CredentialsRequest) -> Result<String> {
        if let Some(message) = req.validate() {
            return Err(CatalogError::ValidationFailed(message));
        }

        let email = normalize_email(&req.email);
        let user = self.users.find_user_by_email(&email).await?;

        let password = req.password.clone();
        let stored: Arc<str> = match &user {
            Some(user) => Arc::from(user.password_hash.as_str()),
            None => Arc::clone(&self.decoy_hash),
        };
        let verified = blocking(move || verify_password(&password, &stored)).await?;

        let user = match user {
            Some(user) if verified => user,
            Some(user) => {
                warn!(user_id = %user.id, "failed login");
                return Err(CatalogError::Unauthorized(INVALID_LOGIN.to_string()));
            }
            None => {
                debug!("login for unknown email");
                return Err(CatalogError::Unauthorized(INVALID_LOGIN.to_string()));
            }
        };

        self.jwt
            .generate_token(&user.id, &user.email, self.token_ttl_hours)
    }

    /// Validates a bearer token and returns its claims.
    pub fn authenticate(&self, token: &str) -> Result<Claims> {
        self.jwt.validate_token(token)
    }
}

/// Runs bcrypt work off the async worker threads.
async fn blocking<T, F>(work: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| CatalogError::Internal(format!("password task failed: {}", e)))?
}

fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// `local@domain.tld`: one `@`, non-empty local part, dotted domain.
fn looks_like_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    !local.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
        && domain
            .split_once('.')
            .map(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
            .unwrap_or(false)
}
