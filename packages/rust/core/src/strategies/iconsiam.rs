//! ICONSIAM listing API (shops and dinings feeds plus floor documents).

use std::sync::LazyLock;

use malldir_normalize::FloorNormalizer;

use super::MallStrategy;

static FLOORS: LazyLock<FloorNormalizer> = LazyLock::new(|| FloorNormalizer::verbatim());

/// Floors are the API's own names; their order comes from the floor feed.
pub struct IconSiam;

impl MallStrategy for IconSiam {
    fn slug(&self) -> &str {
        "iconsiam"
    }

    fn source_name(&self) -> &str {
        "ICONSIAM Directory (official)"
    }

    fn source_url(&self) -> &str {
        "https://www.iconsiam.com/en/directory"
    }

    fn source_note(&self) -> Option<&str> {
        Some("Listings from the shops and dinings API endpoints; floor order from the floors endpoint")
    }

    fn floors(&self) -> &FloorNormalizer {
        &FLOORS
    }
}
