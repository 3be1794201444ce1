//! Occupant payload embedded in a rendered directory page.
//!
//! The page ships its data as a script payload rather than markup. Only the
//! `occupantsByCategory` object inside it matters; it is located by its key
//! and parsed on its own, ignoring whatever surrounds it.

use std::sync::LazyLock;

use malldir_normalize::collapse_whitespace;
use malldir_shared::{Category, MallDirError, Result, StoreStatus};
use regex::Regex;
use serde::Deserialize;
use tracing::debug;

use super::{Listing, LocalizedText};
use crate::aggregator::NormalizedStore;
use crate::strategies::MallStrategy;

static MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""occupantsByCategory"\s*:"#).expect("occupants marker regex")
});

#[derive(Debug, Default, Deserialize)]
struct OccupantGroups {
    #[serde(default)]
    shop: Vec<Occupant>,
    #[serde(default)]
    dine: Vec<Occupant>,
    #[serde(default, rename = "seeAndDo")]
    see_and_do: Vec<Occupant>,
}

#[derive(Debug, Deserialize)]
struct Occupant {
    #[serde(default)]
    properties: Option<OccupantProperties>,
}

#[derive(Debug, Default, Deserialize)]
struct OccupantProperties {
    #[serde(default)]
    name: Option<LocalizedText>,
    #[serde(default)]
    level_name: Option<String>,
    #[serde(default)]
    keywords: Option<Vec<String>>,
}

/// Stores read from a payload, plus how many occupants it declared.
#[derive(Debug)]
pub(crate) struct OccupantRead {
    pub stores: Vec<NormalizedStore>,
    pub declared: usize,
}

/// Locate and parse the occupant object, then read its groups in the order
/// `shop`, `dine`, `seeAndDo`.
pub(crate) fn read_occupants(payload: &str, strategy: &dyn MallStrategy) -> Result<OccupantRead> {
    let groups = locate_groups(payload)?;

    let mut stores = Vec::new();
    let mut declared = 0usize;
    for (key, forced, occupants) in [
        ("shop", None, groups.shop),
        ("dine", Some(Category::FoodAndBeverage), groups.dine),
        ("seeAndDo", None, groups.see_and_do),
    ] {
        declared += occupants.len();
        for occupant in occupants {
            if let Some(listing) = listing_from_occupant(occupant, key, forced, strategy) {
                stores.push(listing.into());
            }
        }
    }

    if stores.len() != declared {
        debug!(
            declared,
            listed = stores.len(),
            "occupants without a name were dropped"
        );
    }
    Ok(OccupantRead { stores, declared })
}

fn locate_groups(payload: &str) -> Result<OccupantGroups> {
    let marker = MARKER_RE
        .find(payload)
        .ok_or_else(|| MallDirError::malformed("occupantsByCategory marker not found"))?;

    let rest = payload[marker.end()..].trim_start();
    if !rest.starts_with('{') {
        return Err(MallDirError::malformed(
            "occupantsByCategory is not followed by an object",
        ));
    }

    serde_json::Deserializer::from_str(rest)
        .into_iter::<OccupantGroups>()
        .next()
        .ok_or_else(|| MallDirError::malformed("occupantsByCategory value is missing"))?
        .map_err(|e| MallDirError::malformed(format!("occupantsByCategory: {e}")))
}

fn listing_from_occupant(
    occupant: Occupant,
    group: &str,
    forced: Option<Category>,
    strategy: &dyn MallStrategy,
) -> Option<Listing> {
    let props = occupant.properties.unwrap_or_default();
    let name = collapse_whitespace(props.name.as_ref()?.primary()?);
    let name_local = props
        .name
        .as_ref()
        .and_then(LocalizedText::thai)
        .filter(|thai| *thai != name)
        .map(str::to_string);

    let level = props.level_name.as_deref().unwrap_or_default().trim().to_uppercase();
    let floor = strategy.normalize_floor(&level);

    let keywords: Vec<String> = props
        .keywords
        .unwrap_or_default()
        .into_iter()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .collect();
    let category = strategy.normalize_category(Some(group), &keywords, forced);

    Some(Listing {
        name,
        name_local,
        category,
        category_label: Some(group.to_string()),
        floor,
        unit: String::new(),
        hours: None,
        phone: None,
        status: StoreStatus::Active,
        landmarks: Vec::new(),
    })
}
