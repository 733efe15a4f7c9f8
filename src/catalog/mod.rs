//! Catalog Module
//!
//! The cache-aside core: key scheme, filter normalization, the ownership
//! check and the coordinator tying store and cache together.

mod access;
mod coordinator;
mod filter;
mod keys;

pub use access::authorize_owner;
pub use coordinator::{CatalogStats, PropertyCatalog};
pub use filter::{PropertyPredicate, SearchFilter, EMPTY_FILTER_TOKEN};
pub use keys::CacheKeys;
