//! Siam Paragon directory page (embedded occupant payload).

use std::sync::LazyLock;

use malldir_normalize::FloorNormalizer;

use super::{MallStrategy, StoreCountSource};

static FLOORS: LazyLock<FloorNormalizer> = LazyLock::new(|| FloorNormalizer::table());

/// Occupants come grouped by category from the page's embedded data; the
/// published count is the number of occupants the payload lists.
pub struct SiamParagon;

impl MallStrategy for SiamParagon {
    fn slug(&self) -> &str {
        "siam-paragon"
    }

    fn source_name(&self) -> &str {
        "Siam Paragon Directory"
    }

    fn source_url(&self) -> &str {
        "https://www.siamparagon.co.th/directory"
    }

    fn floors(&self) -> &FloorNormalizer {
        &FLOORS
    }

    fn store_count(&self) -> StoreCountSource {
        StoreCountSource::Declared
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_floors_shift_numbers_above_mezzanine() {
        let m = SiamParagon.normalize_floor("M");
        let first = SiamParagon.normalize_floor("1");
        let ground = SiamParagon.normalize_floor("gf");
        assert_eq!((m.id.as_str(), m.order), ("M", 1));
        assert_eq!((first.id.as_str(), first.order), ("1", 2));
        assert_eq!((ground.id.as_str(), ground.order), ("G", 0));
    }
}
