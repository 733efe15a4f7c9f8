//! In-process backing store
//!
//! Holds properties and users in one `RwLock`-guarded state so the creator
//! join sees a consistent snapshot. Unique fields (externalId, email) are
//! enforced on every write.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::catalog::PropertyPredicate;
use crate::error::{StoreError, StoreResult};
use crate::models::{Creator, Listing, Property, PropertyPatch, User};
use crate::store::{PropertyStore, UserStore};

#[derive(Debug, Default)]
struct State {
    properties: HashMap<Uuid, Property>,
    users: HashMap<Uuid, User>,
}

impl State {
    fn listing(&self, property: &Property) -> Listing {
        let email = self
            .users
            .get(&property.created_by)
            .map(|user| user.email.clone());

        Listing {
            property: property.clone(),
            creator: Creator {
                id: property.created_by,
                email,
            },
        }
    }

    /// Listings matching `keep`, oldest first.
    fn listings<F>(&self, keep: F) -> Vec<Listing>
    where
        F: Fn(&Property) -> bool,
    {
        let mut matched: Vec<&Property> = self.properties.values().filter(|p| keep(*p)).collect();
        matched.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        matched.into_iter().map(|p| self.listing(p)).collect()
    }

    fn external_id_taken(&self, external_id: &str, except: Option<&Uuid>) -> bool {
        self.properties
            .values()
            .any(|p| p.external_id == external_id && Some(&p.id) != except)
    }
}

/// Backing store kept in process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of property records held.
    pub async fn property_count(&self) -> usize {
        self.state.read().await.properties.len()
    }
}

fn duplicate_external_id(external_id: &str) -> StoreError {
    StoreError::Conflict(format!("externalId '{}' already exists", external_id))
}

#[async_trait]
impl PropertyStore for MemoryStore {
    async fn find_by_id(&self, id: &Uuid) -> StoreResult<Option<Listing>> {
        let state = self.state.read().await;
        Ok(state.properties.get(id).map(|p| state.listing(p)))
    }

    async fn find_all(&self) -> StoreResult<Vec<Listing>> {
        let state = self.state.read().await;
        Ok(state.listings(|_| true))
    }

    async fn find_by_predicate(&self, predicate: &PropertyPredicate) -> StoreResult<Vec<Listing>> {
        let state = self.state.read().await;
        Ok(state.listings(|p| predicate.matches(p)))
    }

    async fn insert(&self, property: Property) -> StoreResult<Listing> {
        let mut state = self.state.write().await;

        if state.external_id_taken(&property.external_id, None) {
            return Err(duplicate_external_id(&property.external_id));
        }

        let listing = state.listing(&property);
        debug!(id = %property.id, external_id = %property.external_id, "property inserted");
        state.properties.insert(property.id, property);
        Ok(listing)
    }

    async fn update_by_id(
        &self,
        id: &Uuid,
        patch: &PropertyPatch,
    ) -> StoreResult<Option<Listing>> {
        let mut state = self.state.write().await;

        if let Some(external_id) = &patch.external_id {
            if state.external_id_taken(external_id.trim(), Some(id)) {
                return Err(duplicate_external_id(external_id.trim()));
            }
        }

        let updated = match state.properties.get_mut(id) {
            Some(property) => {
                property.apply(patch);
                property.clone()
            }
            None => return Ok(None),
        };

        Ok(Some(state.listing(&updated)))
    }

    async fn delete_by_id(&self, id: &Uuid) -> StoreResult<bool> {
        let mut state = self.state.write().await;
        Ok(state.properties.remove(id).is_some())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state.users.values().find(|u| u.email == email).cloned())
    }

    async fn insert_user(&self, user: User) -> StoreResult<User> {
        let mut state = self.state.write().await;

        if state.users.values().any(|u| u.email == user.email) {
            return Err(StoreError::Conflict("Email already in use".to_string()));
        }

        state.users.insert(user.id, user.clone());
        Ok(user)
    }
}
