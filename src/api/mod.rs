//! API Module
//!
//! HTTP handlers, routing and request extractors for the catalog REST API.

mod extract;
pub mod handlers;
pub mod routes;

pub use extract::AuthUser;
pub use handlers::*;
pub use routes::create_router;
