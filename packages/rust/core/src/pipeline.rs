//! End-to-end build: source input → stores → directory.

use chrono::{DateTime, Utc};
use malldir_shared::{Directory, MallDirError, MallRegistryEntry, Result, SourceMeta};
use tracing::{debug, info, instrument};
use url::Url;

use crate::aggregator::{DirectoryHeader, FloorMetadata, NormalizedStore, StoreCount, aggregate};
use crate::sources::{SourceInput, listings, occupants, tokens};
use crate::strategies::{MallStrategy, StoreCountSource};

/// Source metadata for a run: the strategy's defaults, overridden by a
/// registry entry when one is configured.
pub fn source_meta(
    strategy: &dyn MallStrategy,
    entry: Option<&MallRegistryEntry>,
    retrieved_at: DateTime<Utc>,
) -> Result<SourceMeta> {
    let name = entry
        .and_then(|e| e.source_name.clone())
        .unwrap_or_else(|| strategy.source_name().to_string());
    let raw_url = entry
        .and_then(|e| e.source_url.as_deref())
        .unwrap_or(strategy.source_url());
    let url = Url::parse(raw_url)
        .map_err(|e| MallDirError::config(format!("invalid source url '{raw_url}': {e}")))?;

    Ok(SourceMeta {
        name,
        url,
        retrieved_at,
        note: strategy.source_note().map(str::to_string),
    })
}

/// Build one mall's directory.
///
/// A pure function of its arguments: the same input always yields the same
/// directory. The only error is [`MallDirError::MalformedSource`], raised
/// when an API document lacks a structure it must have or when the input
/// kind does not fit the strategy; nothing partial is returned then.
#[instrument(skip_all, fields(mall = %mall_slug, strategy = strategy.slug()))]
pub fn build_directory(
    mall_slug: &str,
    source: SourceMeta,
    input: SourceInput,
    strategy: &dyn MallStrategy,
) -> Result<Directory> {
    let (stores, metadata, declared) = read_input(input, strategy)?;
    debug!(stores = stores.len(), "normalized stores");

    let store_count = match strategy.store_count() {
        StoreCountSource::Summed => StoreCount::Summed,
        StoreCountSource::Declared => StoreCount::Declared(declared),
    };
    let directory = aggregate(
        stores,
        metadata.as_ref(),
        DirectoryHeader {
            mall_slug: mall_slug.to_string(),
            source,
            store_count,
        },
    );

    info!(
        floors = directory.floor_count,
        stores = directory.store_count,
        "directory built"
    );
    Ok(directory)
}

/// Stores, optional floor metadata, and the number of listings the input
/// declared.
type ReadOutput = (Vec<NormalizedStore>, Option<FloorMetadata>, usize);

fn read_input(input: SourceInput, strategy: &dyn MallStrategy) -> Result<ReadOutput> {
    match input {
        SourceInput::Tokens(stream) => {
            if strategy.classifier_rules().is_none() {
                return Err(MallDirError::malformed(format!(
                    "{} does not read token streams",
                    strategy.slug()
                )));
            }
            let entries = strategy.classify_tokens(&stream);
            debug!(tokens = stream.len(), entries = entries.len(), "classified tokens");
            let declared = entries.len();
            let stores = entries
                .into_iter()
                .map(|entry| tokens::store_from_entry(entry, strategy))
                .collect();
            Ok((stores, None, declared))
        }
        SourceInput::Listings { feeds, floors } => {
            let stores = listings::read_listings(&feeds, strategy)?;
            let metadata = if floors.is_empty() {
                None
            } else {
                Some(listings::read_floor_metadata(&floors)?)
            };
            let declared = stores.len();
            Ok((stores, metadata, declared))
        }
        SourceInput::OccupantPayload(payload) => {
            let read = occupants::read_occupants(&payload, strategy)?;
            Ok((read.stores, None, read.declared))
        }
    }
}
