//! Raw classifier entries to listings.

use malldir_classifier::RawEntry;
use malldir_normalize::{collapse_whitespace, normalize_unit, status_from_text};

use super::Listing;
use crate::aggregator::NormalizedStore;
use crate::strategies::MallStrategy;

/// Normalize one classified entry. Names have their whitespace collapsed;
/// the building line, when present, becomes the store's only landmark.
pub(crate) fn store_from_entry(entry: RawEntry, strategy: &dyn MallStrategy) -> NormalizedStore {
    let floor = strategy.normalize_floor(entry.floor_text.as_deref().unwrap_or_default());
    let category = strategy.normalize_category(entry.category_context.as_deref(), &[], None);

    Listing {
        name: collapse_whitespace(&entry.name),
        name_local: entry.name_local.as_deref().map(collapse_whitespace),
        category,
        category_label: entry.category_context,
        floor,
        unit: normalize_unit(entry.unit_text.as_deref()),
        hours: None,
        phone: None,
        status: status_from_text(entry.status_text.as_deref()),
        landmarks: entry.building_text.into_iter().collect(),
    }
    .into()
}
