//! Cache key scheme
//!
//! Every key the catalog writes lives under one namespace and one of three
//! shapes:
//!
//! | read            | key                              |
//! |-----------------|----------------------------------|
//! | all properties  | `<ns>:all`                       |
//! | property by id  | `<ns>:id:<uuid>`                 |
//! | search          | `<ns>:search:<normalized filter>`|
//!
//! The shapes differ in their second segment, so no two logical reads can
//! share a key. Search keys all sit under `<ns>:search:`, which is what
//! [`CacheKeys::search_pattern`] hands to pattern invalidation.

use uuid::Uuid;

use crate::catalog::SearchFilter;

/// Key builder for one cache namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheKeys {
    namespace: String,
}

impl CacheKeys {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
        }
    }

    /// Key for the unfiltered listing.
    pub fn all(&self) -> String {
        format!("{}:all", self.namespace)
    }

    /// Key for a single record.
    pub fn by_id(&self, id: &Uuid) -> String {
        format!("{}:id:{}", self.namespace, id)
    }

    /// Key for a search. The no-filter search gets its own entry, separate
    /// from [`CacheKeys::all`].
    pub fn search(&self, filter: &SearchFilter) -> String {
        format!("{}:search:{}", self.namespace, filter.normalize())
    }

    /// Glob covering every search key in this namespace.
    pub fn search_pattern(&self) -> String {
        format!("{}:search:*", escape_glob(&self.namespace))
    }
}

impl Default for CacheKeys {
    fn default() -> Self {
        Self::new("properties")
    }
}

/// Escapes glob metacharacters so a namespace only matches itself.
fn escape_glob(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::glob_matches;

    #[test]
    fn test_key_shapes() {
        let keys = CacheKeys::default();
        let id = Uuid::nil();

        assert_eq!(keys.all(), "properties:all");
        assert_eq!(
            keys.by_id(&id),
            "properties:id:00000000-0000-0000-0000-000000000000"
        );
        assert_eq!(keys.search(&SearchFilter::default()), "properties:search:{}");
    }

    #[test]
    fn test_empty_search_is_not_all() {
        let keys = CacheKeys::default();
        assert_ne!(keys.search(&SearchFilter::default()), keys.all());
    }

    #[test]
    fn test_search_pattern_covers_search_keys_only() {
        let keys = CacheKeys::default();
        let pattern = keys.search_pattern();
        let filter = SearchFilter {
            city: Some("Pune".to_string()),
            ..Default::default()
        };

        assert!(glob_matches(&pattern, &keys.search(&filter)));
        assert!(glob_matches(&pattern, &keys.search(&SearchFilter::default())));
        assert!(!glob_matches(&pattern, &keys.all()));
        assert!(!glob_matches(&pattern, &keys.by_id(&Uuid::new_v4())));
    }

    #[test]
    fn test_namespace_metacharacters_are_escaped() {
        let keys = CacheKeys::new("tenant*1");
        let pattern = keys.search_pattern();

        assert_eq!(pattern, "tenant\\*1:search:*");
        assert!(glob_matches(&pattern, &keys.search(&SearchFilter::default())));
        assert!(!glob_matches(&pattern, "tenantX1:search:{}"));
    }

    #[test]
    fn test_namespaces_do_not_overlap() {
        let a = CacheKeys::new("a");
        let b = CacheKeys::new("b");
        assert!(!glob_matches(&a.search_pattern(), &b.search(&SearchFilter::default())));
    }
}
