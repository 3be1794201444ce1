//! Grouping normalized stores into an ordered directory.

use std::collections::HashMap;

use chrono::SubsecRound;
use malldir_normalize::NormalizedFloor;
use malldir_shared::{Directory, Floor, FloorInfo, SourceMeta, Store};
use tracing::{debug, warn};

/// Authoritative floor name and order, keyed by floor id.
pub type FloorMetadata = HashMap<String, FloorInfo>;

/// A store together with the floor it normalized to.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedStore {
    pub store: Store,
    pub floor: NormalizedFloor,
}

/// How the published store count is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreCount {
    /// Sum of the per-floor store lists.
    Summed,
    /// A total the source declared.
    Declared(usize),
}

/// Directory fields that do not come from the stores themselves.
#[derive(Debug, Clone)]
pub struct DirectoryHeader {
    pub mall_slug: String,
    pub source: SourceMeta,
    pub store_count: StoreCount,
}

/// Assemble a directory.
///
/// Floors appear in first-seen order of their ids, then are stably sorted by
/// `order`, so ties keep that first-seen order. Metadata for an id replaces
/// the computed floor name and order but never touches the stores. The
/// timestamp is truncated to whole seconds.
pub fn aggregate(
    stores: Vec<NormalizedStore>,
    floor_metadata: Option<&FloorMetadata>,
    header: DirectoryHeader,
) -> Directory {
    let mut groups: Vec<(NormalizedFloor, Vec<Store>)> = Vec::new();
    let mut index_by_id: HashMap<String, usize> = HashMap::new();

    for NormalizedStore { store, floor } in stores {
        match index_by_id.get(&floor.id) {
            Some(&index) => groups[index].1.push(store),
            None => {
                index_by_id.insert(floor.id.clone(), groups.len());
                groups.push((floor, vec![store]));
            }
        }
    }

    let mut floors: Vec<Floor> = groups
        .into_iter()
        .map(|(floor, stores)| {
            let meta = floor_metadata.and_then(|m| m.get(&floor.id));
            Floor {
                name: meta.map_or_else(|| floor.label.clone(), |m| m.name.clone()),
                order: meta.map_or(floor.order, |m| m.order),
                id: floor.id,
                label: floor.label,
                stores,
            }
        })
        .collect();
    floors.sort_by_key(|f| f.order);

    let summed: usize = floors.iter().map(|f| f.stores.len()).sum();
    let store_count = match header.store_count {
        StoreCount::Summed => summed,
        StoreCount::Declared(declared) => {
            if declared != summed {
                warn!(
                    mall = %header.mall_slug,
                    declared,
                    summed,
                    "declared store count differs from stores placed on floors"
                );
            }
            declared
        }
    };

    let mut source = header.source;
    source.retrieved_at = source.retrieved_at.trunc_subsecs(0);
    debug!(floors = floors.len(), stores = summed, "aggregated directory");

    Directory {
        mall_slug: header.mall_slug,
        retrieved_at: source.retrieved_at,
        source,
        floor_count: floors.len(),
        store_count,
        floors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use malldir_shared::{Category, StoreStatus};

    fn header(store_count: StoreCount) -> DirectoryHeader {
        DirectoryHeader {
            mall_slug: "test-mall".into(),
            source: SourceMeta {
                name: "Test Mall".into(),
                url: "https://example.com/directory".parse().unwrap(),
                retrieved_at: Utc
                    .with_ymd_and_hms(2026, 3, 1, 8, 30, 0)
                    .unwrap()
                    + chrono::Duration::milliseconds(750),
                note: None,
            },
            store_count,
        }
    }

    fn store(name: &str, id: &str, order: i32) -> NormalizedStore {
        let floor = NormalizedFloor {
            id: id.into(),
            label: format!("{id} Floor"),
            order,
        };
        NormalizedStore {
            store: Store {
                name: name.into(),
                name_local: None,
                category: Category::Services,
                category_label: None,
                floor_id: floor.id.clone(),
                floor_label: floor.label.clone(),
                unit: String::new(),
                hours: None,
                phone: None,
                status: StoreStatus::Active,
                landmarks: vec![],
            },
            floor,
        }
    }

    #[test]
    fn floors_sort_by_order() {
        let stores = vec![
            store("a", "B1", -1),
            store("b", "G", 0),
            store("c", "2", 2),
            store("d", "1", 1),
        ];
        let dir = aggregate(stores, None, header(StoreCount::Summed));
        let orders: Vec<i32> = dir.floors.iter().map(|f| f.order).collect();
        assert_eq!(orders, [-1, 0, 1, 2]);
        assert_eq!(dir.floor_count, 4);
        assert_eq!(dir.store_count, 4);
    }

    #[test]
    fn groups_keep_first_seen_order_and_ties_are_stable() {
        let stores = vec![
            store("a", "M", 0),
            store("b", "G", 0),
            store("c", "M", 0),
            store("d", "UG", 0),
        ];
        let dir = aggregate(stores, None, header(StoreCount::Summed));
        let ids: Vec<&str> = dir.floors.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, ["M", "G", "UG"]);
        let names: Vec<&str> = dir.floors[0].stores.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["a", "c"]);
    }

    #[test]
    fn metadata_overrides_name_and_order_only() {
        let mut metadata = FloorMetadata::new();
        metadata.insert(
            "UG".into(),
            FloorInfo {
                name: "Upper Ground".into(),
                order: -1,
            },
        );
        let stores = vec![store("a", "G", 0), store("b", "UG", 7)];
        let dir = aggregate(stores, Some(&metadata), header(StoreCount::Summed));

        let ug = &dir.floors[0];
        assert_eq!(ug.id, "UG");
        assert_eq!(ug.name, "Upper Ground");
        assert_eq!(ug.label, "UG Floor");
        assert_eq!(ug.order, -1);
        assert_eq!(ug.stores[0].floor_label, "UG Floor");
        assert_eq!(dir.floors[1].name, "G Floor");
    }

    #[test]
    fn empty_input_yields_empty_directory() {
        let dir = aggregate(vec![], None, header(StoreCount::Summed));
        assert_eq!(dir.floor_count, 0);
        assert_eq!(dir.store_count, 0);
        assert!(dir.floors.is_empty());
    }

    #[test]
    fn declared_count_is_published() {
        let stores = vec![store("a", "G", 0)];
        let dir = aggregate(stores, None, header(StoreCount::Declared(3)));
        assert_eq!(dir.store_count, 3);
        assert_eq!(dir.listed_store_count(), 1);
    }

    #[test]
    fn timestamp_is_whole_seconds() {
        let dir = aggregate(vec![], None, header(StoreCount::Summed));
        let json = serde_json::to_value(&dir).unwrap();
        assert_eq!(json["retrievedAt"], "2026-03-01T08:30:00Z");
        assert_eq!(json["source"]["retrievedAt"], "2026-03-01T08:30:00Z");
        assert_eq!(dir.retrieved_at.timestamp_subsec_nanos(), 0);
    }
}
