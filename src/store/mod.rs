//! Backing Store Module
//!
//! The authoritative record store behind the cache. Reads return
//! [`Listing`]s with the creator already resolved to its public identity.

mod memory;

use async_trait::async_trait;
use uuid::Uuid;

use crate::catalog::PropertyPredicate;
use crate::error::StoreResult;
use crate::models::{Listing, Property, PropertyPatch, User};

pub use memory::MemoryStore;

/// Durable property records. The source of truth for every read.
#[async_trait]
pub trait PropertyStore: Send + Sync {
    async fn find_by_id(&self, id: &Uuid) -> StoreResult<Option<Listing>>;

    async fn find_all(&self) -> StoreResult<Vec<Listing>>;

    async fn find_by_predicate(&self, predicate: &PropertyPredicate) -> StoreResult<Vec<Listing>>;

    /// Fails with [`crate::error::StoreError::Conflict`] when the externalId is taken.
    async fn insert(&self, property: Property) -> StoreResult<Listing>;

    /// Returns `None` when no record has `id`.
    async fn update_by_id(&self, id: &Uuid, patch: &PropertyPatch)
        -> StoreResult<Option<Listing>>;

    /// Returns whether a record was removed.
    async fn delete_by_id(&self, id: &Uuid) -> StoreResult<bool>;
}

/// Account records.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Fails with [`crate::error::StoreError::Conflict`] when the email is taken.
    async fn insert_user(&self, user: User) -> StoreResult<User>;
}
