//! API Handlers
//!
//! HTTP request handlers for the catalog endpoints. Handlers only translate
//! between HTTP and [`PropertyCatalog`] / [`AuthService`] calls.

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::api::AuthUser;
use crate::auth::AuthService;
use crate::cache::CacheBackend;
use crate::catalog::{PropertyCatalog, SearchFilter};
use crate::config::Config;
use crate::error::{CatalogError, Result};
use crate::models::{
    CredentialsRequest, HealthResponse, LoginResponse, MessageResponse, NewProperty,
    PropertiesResponse, PropertyPatch, PropertyResponse, RegisterResponse, StatsResponse,
};
use crate::store::MemoryStore;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<PropertyCatalog>,
    pub auth: Arc<AuthService>,
}

impl AppState {
    pub fn new(catalog: PropertyCatalog, auth: AuthService) -> Self {
        Self {
            catalog: Arc::new(catalog),
            auth: Arc::new(auth),
        }
    }

    /// Wires a catalog and auth service over one in-process store and the
    /// given cache backend.
    pub fn from_config(config: &Config, cache: Arc<dyn CacheBackend>) -> Result<Self> {
        let store = Arc::new(MemoryStore::new());
        let catalog = PropertyCatalog::from_config(config, store.clone(), cache);
        let auth = AuthService::new(
            store,
            &config.jwt_secret,
            config.token_ttl_hours,
            config.password_hash_cost,
        )?;
        Ok(Self::new(catalog, auth))
    }
}

/// Unwraps a JSON body, reporting malformed payloads as validation errors.
fn json_body<T>(payload: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| CatalogError::ValidationFailed(rejection.body_text()))
}

/// Unwraps query parameters, reporting malformed query strings as
/// validation errors.
fn query_params<T>(query: std::result::Result<Query<T>, QueryRejection>) -> Result<T> {
    query
        .map(|Query(params)| params)
        .map_err(|rejection| CatalogError::ValidationFailed(rejection.body_text()))
}

/// Reads the `:id` segment as a property id.
fn path_id(path: std::result::Result<Path<String>, PathRejection>) -> Result<Uuid> {
    let Path(raw) =
        path.map_err(|rejection| CatalogError::ValidationFailed(rejection.body_text()))?;

    Uuid::parse_str(&raw)
        .map_err(|_| CatalogError::ValidationFailed(format!("Invalid property id: {}", raw)))
}

// == Service Endpoints ==
pub async fn root_handler() -> Json<MessageResponse> {
    Json(MessageResponse::new("Property Catalog API"))
}

/// Handler for GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::new(state.catalog.cache_healthy().await))
}

/// Handler for GET /api/cache/stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let catalog = state.catalog.stats();

    Json(StatsResponse {
        backend: state.catalog.backend_name(),
        hit_rate: catalog.hit_rate(),
        catalog,
        engine: state.catalog.engine_stats().await,
    })
}

// == Auth Endpoints ==
/// Handler for POST /api/auth/register
pub async fn register_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RegisterResponse>)> {
    let req = json_body(payload)?;
    let user = state.auth.register(&req).await?;
    Ok((StatusCode::CREATED, Json(RegisterResponse::new(user))))
}

/// Handler for POST /api/auth/login
pub async fn login_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>> {
    let req = json_body(payload)?;
    let token = state.auth.login(&req).await?;
    Ok(Json(LoginResponse::new(token)))
}

// == Property Endpoints ==
/// Handler for POST /api/properties
pub async fn create_property_handler(
    State(state): State<AppState>,
    user: AuthUser,
    payload: std::result::Result<Json<NewProperty>, JsonRejection>,
) -> Result<(StatusCode, Json<PropertyResponse>)> {
    let new = json_body(payload)?;
    let listing = state.catalog.create(new, &user.id).await?;

    Ok((
        StatusCode::CREATED,
        Json(PropertyResponse::with_message(
            "Property created successfully",
            listing,
        )),
    ))
}

/// Handler for GET /api/properties
pub async fn list_properties_handler(
    State(state): State<AppState>,
) -> Result<Json<PropertiesResponse>> {
    let listings = state.catalog.get_all().await?;
    Ok(Json(PropertiesResponse::new(listings)))
}

/// Handler for GET /api/properties/search
pub async fn search_properties_handler(
    State(state): State<AppState>,
    query: std::result::Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<PropertiesResponse>> {
    let filter = SearchFilter::from_params(query_params(query)?)?;
    let listings = state.catalog.search(&filter).await?;
    Ok(Json(PropertiesResponse::new(listings)))
}

/// Handler for GET /api/properties/:id
pub async fn get_property_handler(
    State(state): State<AppState>,
    path: std::result::Result<Path<String>, PathRejection>,
) -> Result<Json<PropertyResponse>> {
    let id = path_id(path)?;
    let listing = state.catalog.get_by_id(&id).await?;
    Ok(Json(PropertyResponse::new(listing)))
}

/// Handler for PUT /api/properties/:id
pub async fn update_property_handler(
    State(state): State<AppState>,
    user: AuthUser,
    path: std::result::Result<Path<String>, PathRejection>,
    payload: std::result::Result<Json<PropertyPatch>, JsonRejection>,
) -> Result<Json<PropertyResponse>> {
    let id = path_id(path)?;
    let patch = json_body(payload)?;
    let listing = state.catalog.update(&id, &user.id, &patch).await?;

    Ok(Json(PropertyResponse::with_message(
        "Property updated successfully",
        listing,
    )))
}

/// Handler for DELETE /api/properties/:id
pub async fn delete_property_handler(
    State(state): State<AppState>,
    user: AuthUser,
    path: std::result::Result<Path<String>, PathRejection>,
) -> Result<Json<MessageResponse>> {
    let id = path_id(path)?;
    state.catalog.remove(&id, &user.id).await?;
    Ok(Json(MessageResponse::new("Property deleted successfully")))
}
