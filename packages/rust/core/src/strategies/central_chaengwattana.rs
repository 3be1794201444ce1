//! Central Chaengwattana shop list (token stream).

use std::sync::LazyLock;

use malldir_classifier::ClassifierRules;
use malldir_normalize::{CategoryRules, FloorNormalizer, UnknownFloorPlacement, shoplist_rules};
use regex::Regex;

use super::MallStrategy;

static RULES: LazyLock<ClassifierRules> = LazyLock::new(|| {
    ClassifierRules::new()
        .start_markers(["ALL SHOPS"])
        .noise([
            "Shop search",
            "BANGKOK",
            "NORTHERN",
            "SOUTHERN",
            "EASTERN",
            "NORTHEASTERN",
            "ALL SHOPS",
            "A-Z",
            "Category",
        ])
        .category_headers([
            "Speciality",
            "Fashion",
            "Services",
            "Beauty",
            "Lifestyle",
            "Technology",
            "Food & Beverage",
            "Supermarket",
            "Kids",
            "Entertainment",
            "Home",
        ])
        .floor_pattern(
            Regex::new(r"(?i)^(B\d+|GF|G|UG|LG|MF|M|\d{1,2}F)$").expect("shoplist floor regex"),
        )
});

static FLOORS: LazyLock<FloorNormalizer> =
    LazyLock::new(|| FloorNormalizer::arithmetic().with_unknown(UnknownFloorPlacement::Last));

/// Every listing closes on a floor token; the category comes from the
/// section header above it.
pub struct CentralChaengwattana;

impl MallStrategy for CentralChaengwattana {
    fn slug(&self) -> &str {
        "central-chaengwattana"
    }

    fn source_name(&self) -> &str {
        "Central Chaengwattana Shop Directory (official)"
    }

    fn source_url(&self) -> &str {
        "https://dg-directory-physical.cpn.co.th/directory/line/CWN/en/shoplist/"
    }

    fn classifier_rules(&self) -> Option<&ClassifierRules> {
        Some(&RULES)
    }

    fn floors(&self) -> &FloorNormalizer {
        &FLOORS
    }

    fn category_rules(&self) -> &CategoryRules {
        shoplist_rules()
    }
}
