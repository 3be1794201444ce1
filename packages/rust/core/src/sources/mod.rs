//! Source inputs and their conversion into normalized stores.
//!
//! Token streams go through the strategy's classifier; API documents are
//! read field by field. Both end up as `Listing`s with a resolved floor.

pub mod listings;
pub mod occupants;
pub mod tokens;

use malldir_normalize::NormalizedFloor;
use malldir_shared::{Category, Store, StoreStatus};
use serde::Deserialize;
use serde_json::Value;

use crate::aggregator::NormalizedStore;

/// Everything one run reads, already materialized by a collaborator.
#[derive(Debug, Clone)]
pub enum SourceInput {
    /// Visible text fragments of a rendered directory page, in order.
    Tokens(Vec<String>),
    /// Listing documents per feed plus the floor documents, if any.
    Listings {
        feeds: Vec<ListingFeed>,
        floors: Vec<Value>,
    },
    /// Decoded page payload embedding an `occupantsByCategory` object.
    OccupantPayload(String),
}

impl SourceInput {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Tokens(tokens) => tokens.is_empty(),
            Self::Listings { feeds, .. } => feeds.iter().all(|f| f.docs.is_empty()),
            Self::OccupantPayload(payload) => payload.trim().is_empty(),
        }
    }
}

/// Which listing endpoint a batch of documents came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedKind {
    Shops,
    /// Every entry is forced to Food & Beverage.
    Dinings,
}

impl FeedKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Shops => "shops",
            Self::Dinings => "dinings",
        }
    }

    pub fn forced_category(self) -> Option<Category> {
        match self {
            Self::Shops => None,
            Self::Dinings => Some(Category::FoodAndBeverage),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ListingFeed {
    pub kind: FeedKind,
    pub docs: Vec<Value>,
}

impl ListingFeed {
    pub fn new(kind: FeedKind, docs: Vec<Value>) -> Self {
        Self { kind, docs }
    }
}

/// A store as read from any source, before it is placed in a directory.
#[derive(Debug, Clone)]
pub(crate) struct Listing {
    pub name: String,
    pub name_local: Option<String>,
    pub category: Category,
    pub category_label: Option<String>,
    pub floor: NormalizedFloor,
    pub unit: String,
    pub hours: Option<String>,
    pub phone: Option<String>,
    pub status: StoreStatus,
    pub landmarks: Vec<String>,
}

impl From<Listing> for NormalizedStore {
    fn from(listing: Listing) -> Self {
        let store = Store {
            name: listing.name,
            name_local: listing.name_local,
            category: listing.category,
            category_label: listing.category_label,
            floor_id: listing.floor.id.clone(),
            floor_label: listing.floor.label.clone(),
            unit: listing.unit,
            hours: listing.hours,
            phone: listing.phone,
            status: listing.status,
            landmarks: listing.landmarks,
        };
        NormalizedStore {
            store,
            floor: listing.floor,
        }
    }
}

/// Text that a source publishes either as a plain string or per language.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum LocalizedText {
    Plain(String),
    Localized {
        #[serde(default)]
        en: Option<String>,
        #[serde(default)]
        th: Option<String>,
        #[serde(default)]
        zh: Option<String>,
    },
}

impl LocalizedText {
    /// English text, falling back to Thai then Chinese. Blank values count
    /// as missing.
    pub fn primary(&self) -> Option<&str> {
        match self {
            Self::Plain(text) => non_blank(text),
            Self::Localized { en, th, zh } => [en, th, zh]
                .into_iter()
                .find_map(|text| text.as_deref().and_then(non_blank)),
        }
    }

    pub fn thai(&self) -> Option<&str> {
        match self {
            Self::Plain(_) => None,
            Self::Localized { th, .. } => th.as_deref().and_then(non_blank),
        }
    }
}

fn non_blank(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}
