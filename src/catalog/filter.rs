//! Search filters
//!
//! A [`SearchFilter`] is the unordered set of optional predicates a search
//! request carries. It has two jobs:
//! - [`SearchFilter::normalize`] turns it into a byte-stable string for the
//!   cache key, independent of the order parameters were supplied in
//! - [`SearchFilter::to_predicate`] translates it into the
//!   [`PropertyPredicate`] the backing store evaluates

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CatalogError, Result};
use crate::models::{ListingType, Property};

/// Serialization of a filter with no predicates.
pub const EMPTY_FILTER_TOKEN: &str = "{}";

// == Search Filter ==
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilter {
    /// Case-insensitive substring of the title
    pub title: Option<String>,
    /// Inclusive lower price bound
    pub price_min: Option<f64>,
    /// Inclusive upper price bound
    pub price_max: Option<f64>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<u32>,
    pub listing_type: Option<ListingType>,
}

impl SearchFilter {
    /// Builds a filter from raw `(name, value)` parameters, e.g. a query string.
    ///
    /// Empty values count as absent, unknown names are ignored and a repeated
    /// name keeps its last value. Malformed numbers or listing types fail
    /// with [`CatalogError::ValidationFailed`].
    pub fn from_params<I, K, V>(params: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut filter = SearchFilter::default();

        for (name, value) in params {
            let value = value.as_ref().trim();
            if value.is_empty() {
                continue;
            }

            match name.as_ref() {
                "title" => filter.title = Some(value.to_string()),
                "priceMin" => filter.price_min = Some(parse_price("priceMin", value)?),
                "priceMax" => filter.price_max = Some(parse_price("priceMax", value)?),
                "state" => filter.state = Some(value.to_string()),
                "city" => filter.city = Some(value.to_string()),
                "bedrooms" => filter.bedrooms = Some(parse_count("bedrooms", value)?),
                "bathrooms" => filter.bathrooms = Some(parse_count("bathrooms", value)?),
                "listingType" => {
                    filter.listing_type = Some(ListingType::parse(value).ok_or_else(|| {
                        CatalogError::ValidationFailed(
                            "listingType must be \"rent\" or \"sale\"".to_string(),
                        )
                    })?)
                }
                _ => {}
            }
        }

        Ok(filter)
    }

    /// True when no predicate is present.
    pub fn is_empty(&self) -> bool {
        self.fields().is_empty()
    }

    /// Present fields keyed by wire name, in lexicographic order.
    fn fields(&self) -> BTreeMap<&'static str, Value> {
        let mut fields = BTreeMap::new();

        if let Some(v) = present(&self.title) {
            fields.insert("title", Value::from(v));
        }
        if let Some(v) = price_bound(self.price_min) {
            fields.insert("priceMin", Value::from(v));
        }
        if let Some(v) = price_bound(self.price_max) {
            fields.insert("priceMax", Value::from(v));
        }
        if let Some(v) = present(&self.state) {
            fields.insert("state", Value::from(v));
        }
        if let Some(v) = present(&self.city) {
            fields.insert("city", Value::from(v));
        }
        if let Some(v) = self.bedrooms {
            fields.insert("bedrooms", Value::from(v));
        }
        if let Some(v) = self.bathrooms {
            fields.insert("bathrooms", Value::from(v));
        }
        if let Some(v) = self.listing_type {
            fields.insert("listingType", Value::from(v.as_str()));
        }

        fields
    }

    // == Normalize ==
    /// Canonical serialization: present fields only, sorted by name, as a
    /// JSON object. Numbers render in serde_json's fixed form (`100.0` for
    /// prices, `3` for counts). The empty filter renders as
    /// [`EMPTY_FILTER_TOKEN`], which no non-empty filter can produce.
    pub fn normalize(&self) -> String {
        // Entries arrive in key order; string values are JSON-escaped so no
        // value can imitate a field boundary
        let object = self
            .fields()
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect();
        Value::Object(object).to_string()
    }

    // == Predicate Translation ==
    /// Translates the filter into a store predicate. Unset fields impose no
    /// constraint; set fields combine with AND.
    pub fn to_predicate(&self) -> PropertyPredicate {
        PropertyPredicate {
            title_contains: present(&self.title).map(str::to_lowercase),
            price_min: price_bound(self.price_min),
            price_max: price_bound(self.price_max),
            state: present(&self.state).map(str::to_string),
            city: present(&self.city).map(str::to_string),
            bedrooms: self.bedrooms,
            bathrooms: self.bathrooms,
            listing_type: self.listing_type,
        }
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// A usable price bound: finite, with `-0.0` folded into `0.0`. Non-finite
/// bounds constrain nothing and are dropped.
fn price_bound(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite()).map(|v| v + 0.0)
}

fn parse_price(field: &str, value: &str) -> Result<f64> {
    price_bound(value.parse::<f64>().ok())
        .filter(|v| *v >= 0.0)
        .ok_or_else(|| CatalogError::ValidationFailed(format!("{} must be a valid number", field)))
}

fn parse_count(field: &str, value: &str) -> Result<u32> {
    value
        .parse::<u32>()
        .map_err(|_| CatalogError::ValidationFailed(format!("{} must be a valid number", field)))
}

// == Property Predicate ==
/// A compiled, conjunctive set of constraints on a [`Property`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyPredicate {
    /// Lowercased needle for the title
    pub title_contains: Option<String>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<u32>,
    pub listing_type: Option<ListingType>,
}

impl PropertyPredicate {
    pub fn matches(&self, property: &Property) -> bool {
        if let Some(needle) = &self.title_contains {
            if !property.title.to_lowercase().contains(needle.as_str()) {
                return false;
            }
        }
        if matches!(self.price_min, Some(min) if property.price < min) {
            return false;
        }
        if matches!(self.price_max, Some(max) if property.price > max) {
            return false;
        }
        if matches!(&self.state, Some(state) if *state != property.state) {
            return false;
        }
        if matches!(&self.city, Some(city) if *city != property.city) {
            return false;
        }
        if matches!(self.bedrooms, Some(n) if n != property.bedrooms) {
            return false;
        }
        if matches!(self.bathrooms, Some(n) if n != property.bathrooms) {
            return false;
        }
        if matches!(self.listing_type, Some(kind) if kind != property.listing_type) {
            return false;
        }
        true
    }
}
