//! Response DTOs for the catalog API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::CacheStats;
use crate::catalog::CatalogStats;
use crate::models::{Listing, PublicUser};

/// Body for single-record responses (`GET/POST/PUT /api/properties[/:id]`)
#[derive(Debug, Clone, Serialize)]
pub struct PropertyResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub property: Listing,
}

impl PropertyResponse {
    pub fn new(property: Listing) -> Self {
        Self {
            message: None,
            property,
        }
    }

    pub fn with_message(message: impl Into<String>, property: Listing) -> Self {
        Self {
            message: Some(message.into()),
            property,
        }
    }
}

/// Body for collection responses (`GET /api/properties`, `/search`)
#[derive(Debug, Clone, Serialize)]
pub struct PropertiesResponse {
    pub count: usize,
    pub properties: Vec<Listing>,
}

impl PropertiesResponse {
    pub fn new(properties: Vec<Listing>) -> Self {
        Self {
            count: properties.len(),
            properties,
        }
    }
}

/// Body carrying only a confirmation message
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Body for `POST /api/auth/register`
#[derive(Debug, Clone, Serialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user: PublicUser,
}

impl RegisterResponse {
    pub fn new(user: PublicUser) -> Self {
        Self {
            message: "User registered successfully".to_string(),
            user,
        }
    }
}

/// Body for `POST /api/auth/login`
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
}

impl LoginResponse {
    pub fn new(token: String) -> Self {
        Self {
            message: "Login successful".to_string(),
            token,
        }
    }
}

/// Body for `GET /api/cache/stats`
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Backend name (`memory` or `redis`)
    pub backend: &'static str,
    /// Read-through counters kept by the coordinator
    pub catalog: CatalogStats,
    /// Hit rate of coordinator lookups
    pub hit_rate: f64,
    /// Engine counters, only for the in-process backend
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine: Option<CacheStats>,
}

/// Body for `GET /health`
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Always "healthy" while the process serves requests
    pub status: String,
    /// "up" or "down"; a down cache only costs latency
    pub cache: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    pub fn new(cache_up: bool) -> Self {
        Self {
            status: "healthy".to_string(),
            cache: if cache_up { "up" } else { "down" }.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_response_serialize() {
        let json = serde_json::to_string(&MessageResponse::new("Property deleted successfully")).unwrap();
        assert!(json.contains("deleted"));
    }

    #[test]
    fn test_health_response_serialize() {
        let json = serde_json::to_value(HealthResponse::new(false)).unwrap();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["cache"], "down");
        assert!(json.get("timestamp").is_some());
    }

    #[test]
    fn test_properties_response_counts() {
        let resp = PropertiesResponse::new(Vec::new());
        assert_eq!(resp.count, 0);
        let json = serde_json::to_value(&resp).unwrap();
        assert!(json["properties"].as_array().unwrap().is_empty());
    }
}
