//! Property records
//!
//! The stored record, its read view with the creator resolved, and the
//! create/patch payloads accepted from clients.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Furnishing state of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Furnishing {
    Unfurnished,
    Furnished,
    Semi,
}

/// Who listed the property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListedBy {
    Builder,
    Owner,
    Agent,
}

/// Whether the property is offered for rent or for sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingType {
    Rent,
    Sale,
}

impl ListingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingType::Rent => "rent",
            ListingType::Sale => "sale",
        }
    }

    /// Parses the wire form (`rent` / `sale`).
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "rent" => Some(ListingType::Rent),
            "sale" => Some(ListingType::Sale),
            _ => None,
        }
    }
}

// == Property ==
/// A property record as held by the backing store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    /// Store-assigned identity
    pub id: Uuid,
    /// Client-supplied identity, unique across the catalog
    pub external_id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub property_type: String,
    pub price: f64,
    pub state: String,
    pub city: String,
    pub area_sq_ft: f64,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub amenities: Vec<String>,
    pub furnished: Furnishing,
    pub available_from: NaiveDate,
    pub listed_by: ListedBy,
    pub tags: Vec<String>,
    pub color_theme: String,
    pub rating: f64,
    pub is_verified: bool,
    pub listing_type: ListingType,
    /// Id of the user who created the record
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Property {
    /// Builds a fresh record from a create payload, owned by `creator`.
    pub fn from_new(new: NewProperty, creator: Uuid) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4(),
            external_id: new.external_id.trim().to_string(),
            title: new.title.trim().to_string(),
            property_type: new.property_type.trim().to_string(),
            price: new.price,
            state: new.state.trim().to_string(),
            city: new.city.trim().to_string(),
            area_sq_ft: new.area_sq_ft,
            bedrooms: new.bedrooms,
            bathrooms: new.bathrooms,
            amenities: new.amenities,
            furnished: new.furnished,
            available_from: new.available_from,
            listed_by: new.listed_by,
            tags: new.tags,
            color_theme: new.color_theme.trim().to_string(),
            rating: new.rating,
            is_verified: new.is_verified,
            listing_type: new.listing_type,
            created_by: creator,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies every field present in `patch` and refreshes `updated_at`.
    pub fn apply(&mut self, patch: &PropertyPatch) {
        if let Some(v) = &patch.external_id {
            self.external_id = v.trim().to_string();
        }
        if let Some(v) = &patch.title {
            self.title = v.trim().to_string();
        }
        if let Some(v) = &patch.property_type {
            self.property_type = v.trim().to_string();
        }
        if let Some(v) = patch.price {
            self.price = v;
        }
        if let Some(v) = &patch.state {
            self.state = v.trim().to_string();
        }
        if let Some(v) = &patch.city {
            self.city = v.trim().to_string();
        }
        if let Some(v) = patch.area_sq_ft {
            self.area_sq_ft = v;
        }
        if let Some(v) = patch.bedrooms {
            self.bedrooms = v;
        }
        if let Some(v) = patch.bathrooms {
            self.bathrooms = v;
        }
        if let Some(v) = &patch.amenities {
            self.amenities = v.clone();
        }
        if let Some(v) = patch.furnished {
            self.furnished = v;
        }
        if let Some(v) = patch.available_from {
            self.available_from = v;
        }
        if let Some(v) = patch.listed_by {
            self.listed_by = v;
        }
        if let Some(v) = &patch.tags {
            self.tags = v.clone();
        }
        if let Some(v) = &patch.color_theme {
            self.color_theme = v.trim().to_string();
        }
        if let Some(v) = patch.rating {
            self.rating = v;
        }
        if let Some(v) = patch.is_verified {
            self.is_verified = v;
        }
        if let Some(v) = patch.listing_type {
            self.listing_type = v;
        }
        self.updated_at = Utc::now();
    }
}

// == Creator ==
/// Public identity of a record's creator. Never carries credential material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creator {
    pub id: Uuid,
    /// `None` when the creating account no longer exists
    pub email: Option<String>,
}

// == Listing ==
/// Read view of a property: the record plus its resolved creator.
///
/// This is the shape returned to callers and the shape stored in the cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    #[serde(flatten)]
    pub property: Property,
    pub creator: Creator,
}

// == New Property ==
/// Payload for creating a property.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProperty {
    pub external_id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub property_type: String,
    pub price: f64,
    pub state: String,
    pub city: String,
    pub area_sq_ft: f64,
    pub bedrooms: u32,
    pub bathrooms: u32,
    #[serde(default)]
    pub amenities: Vec<String>,
    pub furnished: Furnishing,
    pub available_from: NaiveDate,
    pub listed_by: ListedBy,
    #[serde(default)]
    pub tags: Vec<String>,
    pub color_theme: String,
    pub rating: f64,
    pub is_verified: bool,
    pub listing_type: ListingType,
}

impl NewProperty {
    /// Validates the payload.
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        let required = [
            ("externalId", &self.external_id),
            ("title", &self.title),
            ("type", &self.property_type),
            ("state", &self.state),
            ("city", &self.city),
            ("colorTheme", &self.color_theme),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Some(format!("{} is required", field));
            }
        }

        check_non_negative("price", self.price)
            .or_else(|| check_non_negative("areaSqFt", self.area_sq_ft))
            .or_else(|| check_rating(self.rating))
    }
}

// == Property Patch ==
/// Partial update. Identity, creator and timestamps are not patchable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PropertyPatch {
    pub external_id: Option<String>,
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub property_type: Option<String>,
    pub price: Option<f64>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub area_sq_ft: Option<f64>,
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<u32>,
    pub amenities: Option<Vec<String>>,
    pub furnished: Option<Furnishing>,
    pub available_from: Option<NaiveDate>,
    pub listed_by: Option<ListedBy>,
    pub tags: Option<Vec<String>>,
    pub color_theme: Option<String>,
    pub rating: Option<f64>,
    pub is_verified: Option<bool>,
    pub listing_type: Option<ListingType>,
}

impl PropertyPatch {
    /// Validates the fields that are present.
    pub fn validate(&self) -> Option<String> {
        let texts = [
            ("externalId", &self.external_id),
            ("title", &self.title),
            ("type", &self.property_type),
            ("state", &self.state),
            ("city", &self.city),
            ("colorTheme", &self.color_theme),
        ];
        for (field, value) in texts {
            if matches!(value, Some(v) if v.trim().is_empty()) {
                return Some(format!("{} cannot be empty", field));
            }
        }

        self.price
            .and_then(|v| check_non_negative("price", v))
            .or_else(|| self.area_sq_ft.and_then(|v| check_non_negative("areaSqFt", v)))
            .or_else(|| self.rating.and_then(check_rating))
    }
}

fn check_non_negative(field: &str, value: f64) -> Option<String> {
    if !value.is_finite() || value < 0.0 {
        Some(format!("{} cannot be negative", field))
    } else {
        None
    }
}

fn check_rating(value: f64) -> Option<String> {
    if !(0.0..=5.0).contains(&value) {
        Some("rating must be between 0 and 5".to_string())
    } else {
        None
    }
}
