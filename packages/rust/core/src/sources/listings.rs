//! Paginated listing documents (shops, dinings) and floor documents.

use malldir_normalize::{collapse_whitespace, format_hours, normalize_unit};
use malldir_shared::{Category, FloorInfo, MallDirError, Result, StoreStatus};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use super::{Listing, ListingFeed, LocalizedText};
use crate::aggregator::{FloorMetadata, NormalizedStore};
use crate::strategies::MallStrategy;

#[derive(Debug, Deserialize)]
struct ListingDoc {
    #[serde(default)]
    title: Option<LocalizedText>,
    #[serde(default)]
    floor: Option<FloorRef>,
    #[serde(default)]
    location_zone: Option<String>,
    #[serde(default)]
    location_shop_number: Option<LocalizedText>,
    #[serde(default)]
    contact_info: Option<ContactInfo>,
    #[serde(default)]
    opening_hours: Option<OpeningHours>,
    #[serde(default)]
    categories: Option<Vec<CategoryRef>>,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FloorRef {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ContactInfo {
    #[serde(default)]
    phone: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpeningHours {
    #[serde(default)]
    same_hours_every_day: Option<bool>,
    #[serde(default)]
    open: Option<String>,
    #[serde(default)]
    close: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CategoryRef {
    #[serde(default)]
    display_name: Option<LocalizedText>,
    #[serde(default)]
    name: Option<LocalizedText>,
}

impl CategoryRef {
    fn label(&self) -> Option<&str> {
        self.display_name
            .as_ref()
            .and_then(LocalizedText::primary)
            .or_else(|| self.name.as_ref().and_then(LocalizedText::primary))
    }
}

#[derive(Debug, Deserialize)]
struct FloorDoc {
    name: String,
    #[serde(default)]
    order: Value,
}

/// Decode one document, naming it in the error when its shape is wrong.
fn decode<T: DeserializeOwned>(feed: &str, index: usize, doc: &Value) -> Result<T> {
    let label = match doc.get("id") {
        Some(id) => format!("{feed} document {index} (id {id})"),
        None => format!("{feed} document {index}"),
    };
    if !doc.is_object() {
        return Err(MallDirError::malformed(format!("{label} is not an object")));
    }
    serde_json::from_value(doc.clone())
        .map_err(|e| MallDirError::malformed(format!("{label}: {e}")))
}

/// Read every feed in order. Documents without any title text are skipped.
pub(crate) fn read_listings(
    feeds: &[ListingFeed],
    strategy: &dyn MallStrategy,
) -> Result<Vec<NormalizedStore>> {
    let mut stores = Vec::new();
    for feed in feeds {
        let feed_name = feed.kind.as_str();
        let mut skipped = 0usize;
        for (index, raw) in feed.docs.iter().enumerate() {
            let doc: ListingDoc = decode(feed_name, index, raw)?;
            match listing_from_doc(doc, feed.kind.forced_category(), strategy) {
                Some(listing) => stores.push(listing.into()),
                None => skipped += 1,
            }
        }
        debug!(
            feed = feed_name,
            docs = feed.docs.len(),
            skipped,
            "read listing feed"
        );
    }
    Ok(stores)
}

fn listing_from_doc(
    doc: ListingDoc,
    forced: Option<Category>,
    strategy: &dyn MallStrategy,
) -> Option<Listing> {
    let title = doc.title?;
    let name = collapse_whitespace(title.primary()?);
    let name_local = title
        .thai()
        .filter(|thai| *thai != name)
        .map(str::to_string);

    let floor_name = doc.floor.and_then(|f| f.name).unwrap_or_default();
    let floor = strategy.normalize_floor(&floor_name);

    let labels: Vec<String> = doc
        .categories
        .unwrap_or_default()
        .iter()
        .filter_map(CategoryRef::label)
        .map(str::to_string)
        .collect();
    let (category_label, keywords) = match labels.split_first() {
        Some((first, rest)) => (Some(first.clone()), rest.to_vec()),
        None => (None, Vec::new()),
    };
    let category = strategy.normalize_category(category_label.as_deref(), &keywords, forced);

    let hours = doc.opening_hours.and_then(|h| {
        format_hours(
            h.same_hours_every_day.unwrap_or(false),
            h.open.as_deref(),
            h.close.as_deref(),
        )
    });

    let status = match doc.status.as_deref().map(str::trim) {
        None => StoreStatus::Active,
        Some(s) if s.eq_ignore_ascii_case("ACTIVE") => StoreStatus::Active,
        Some(_) => StoreStatus::Closed,
    };

    let landmarks = doc
        .location_zone
        .as_deref()
        .map(str::trim)
        .filter(|zone| !zone.is_empty())
        .map(|zone| vec![format!("Zone: {zone}")])
        .unwrap_or_default();

    Some(Listing {
        name,
        name_local,
        category,
        category_label,
        floor,
        unit: normalize_unit(
            doc.location_shop_number
                .as_ref()
                .and_then(LocalizedText::primary),
        ),
        hours,
        phone: doc
            .contact_info
            .and_then(|c| c.phone)
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty()),
        status,
        landmarks,
    })
}

/// Floor documents keyed by floor name. A non-integer `order` counts as 0.
pub(crate) fn read_floor_metadata(docs: &[Value]) -> Result<FloorMetadata> {
    let mut metadata = FloorMetadata::new();
    for (index, raw) in docs.iter().enumerate() {
        let doc: FloorDoc = decode("floors", index, raw)?;
        let order = doc
            .order
            .as_i64()
            .and_then(|n| i32::try_from(n).ok())
            .unwrap_or(0);
        let name = doc.name.trim().to_string();
        metadata.insert(name.clone(), FloorInfo { name, order });
    }
    debug!(floors = metadata.len(), "read floor metadata");
    Ok(metadata)
}
