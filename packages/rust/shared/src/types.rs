//! Core domain types for canonical mall directories.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// The closed store taxonomy. A store's category is always one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Food & Beverage")]
    FoodAndBeverage,
    Fashion,
    Beauty,
    Electronics,
    Sports,
    Books,
    #[serde(rename = "Home & Garden")]
    HomeAndGarden,
    #[serde(rename = "Health & Pharmacy")]
    HealthAndPharmacy,
    Entertainment,
    #[serde(rename = "Kids & Baby")]
    KidsAndBaby,
    Jewelry,
    Watches,
    #[serde(rename = "Bags & Accessories")]
    BagsAndAccessories,
    Shoes,
    Automotive,
    Banking,
    Travel,
    #[default]
    Services,
}

impl Category {
    /// Every taxonomy member, in canonical order.
    pub const ALL: [Category; 18] = [
        Category::FoodAndBeverage,
        Category::Fashion,
        Category::Beauty,
        Category::Electronics,
        Category::Sports,
        Category::Books,
        Category::HomeAndGarden,
        Category::HealthAndPharmacy,
        Category::Entertainment,
        Category::KidsAndBaby,
        Category::Jewelry,
        Category::Watches,
        Category::BagsAndAccessories,
        Category::Shoes,
        Category::Automotive,
        Category::Banking,
        Category::Travel,
        Category::Services,
    ];

    /// The display string used in directory documents.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::FoodAndBeverage => "Food & Beverage",
            Category::Fashion => "Fashion",
            Category::Beauty => "Beauty",
            Category::Electronics => "Electronics",
            Category::Sports => "Sports",
            Category::Books => "Books",
            Category::HomeAndGarden => "Home & Garden",
            Category::HealthAndPharmacy => "Health & Pharmacy",
            Category::Entertainment => "Entertainment",
            Category::KidsAndBaby => "Kids & Baby",
            Category::Jewelry => "Jewelry",
            Category::Watches => "Watches",
            Category::BagsAndAccessories => "Bags & Accessories",
            Category::Shoes => "Shoes",
            Category::Automotive => "Automotive",
            Category::Banking => "Banking",
            Category::Travel => "Travel",
            Category::Services => "Services",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// StoreStatus
// ---------------------------------------------------------------------------

/// Trading status of a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StoreStatus {
    #[default]
    Active,
    Closed,
}

// ---------------------------------------------------------------------------
// Store / Floor / Directory
// ---------------------------------------------------------------------------

/// One normalized directory listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    /// Primary (usually Latin-script) name.
    pub name: String,
    /// Localized name, when the source provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_local: Option<String>,
    pub category: Category,
    /// The source's own category wording, kept for traceability.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_label: Option<String>,
    pub floor_id: String,
    pub floor_label: String,
    /// Unit number; empty when unknown.
    #[serde(default)]
    pub unit: String,
    /// Opening hours as `HH:MM-HH:MM`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub status: StoreStatus,
    #[serde(default)]
    pub landmarks: Vec<String>,
}

/// A canonical level grouping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Floor {
    pub id: String,
    pub label: String,
    pub name: String,
    /// Sort key only; may be negative for basements.
    pub order: i32,
    pub stores: Vec<Store>,
}

/// Authoritative floor metadata published by a source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloorInfo {
    pub name: String,
    pub order: i32,
}

/// Where a directory's data came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceMeta {
    pub name: String,
    pub url: Url,
    #[serde(with = "utc_seconds")]
    pub retrieved_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// The canonical output document for one mall.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Directory {
    pub mall_slug: String,
    pub source: SourceMeta,
    #[serde(with = "utc_seconds")]
    pub retrieved_at: DateTime<Utc>,
    pub floor_count: usize,
    pub store_count: usize,
    pub floors: Vec<Floor>,
}

impl Directory {
    /// Number of stores actually present across all floors.
    pub fn listed_store_count(&self) -> usize {
        self.floors.iter().map(|f| f.stores.len()).sum()
    }
}

/// Format a timestamp as ISO-8601 UTC with second precision and a literal `Z`.
pub fn format_utc_seconds(at: &DateTime<Utc>) -> String {
    at.format(utc_seconds::FORMAT).to_string()
}

/// Serde adapter for `YYYY-MM-DDTHH:MM:SSZ` timestamps.
pub mod utc_seconds {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub(crate) const FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

    pub fn serialize<S: Serializer>(at: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&super::format_utc_seconds(at))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        // Accept anything RFC 3339 as well, so older documents with
        // fractional seconds or offsets still load.
        if let Ok(naive) = NaiveDateTime::parse_from_str(&raw, FORMAT) {
            return Ok(naive.and_utc());
        }
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
