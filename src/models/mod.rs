//! Domain records and the DTOs used for HTTP request/response bodies.

pub mod property;
pub mod requests;
pub mod responses;
pub mod user;

// Re-export commonly used types
pub use property::{
    Creator, Furnishing, ListedBy, Listing, ListingType, NewProperty, Property, PropertyPatch,
};
pub use requests::CredentialsRequest;
pub use responses::{
    HealthResponse, LoginResponse, MessageResponse, PropertiesResponse, PropertyResponse,
    RegisterResponse, StatsResponse,
};
pub use user::{PublicUser, User};
