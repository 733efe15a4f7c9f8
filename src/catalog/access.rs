//! Ownership check gating updates and deletes.

use uuid::Uuid;

use crate::error::{CatalogError, Result};
use crate::models::Property;

/// Succeeds only when `actor` created `property`. Pure: no I/O, no caching.
pub fn authorize_owner(actor: &Uuid, property: &Property) -> Result<()> {
    if property.created_by == *actor {
        Ok(())
    } else {
        Err(CatalogError::Forbidden(
            "You are not authorized to perform this action".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::property::fixtures::new_property;

    #[test]
    fn test_creator_is_authorized() {
        let owner = Uuid::new_v4();
        let property = Property::from_new(new_property("P1", 1.0), owner);

        assert!(authorize_owner(&owner, &property).is_ok());
    }

    #[test]
    fn test_other_actor_is_forbidden() {
        let property = Property::from_new(new_property("P1", 1.0), Uuid::new_v4());

        let result = authorize_owner(&Uuid::new_v4(), &property);
        assert!(matches!(result, Err(CatalogError::Forbidden(_))));
    }
}
