//! Directory building for malldir.
//!
//! Ties the classifier and normalizers together behind per-mall strategies:
//! a [`SourceInput`] goes through [`build_directory`] with a
//! [`MallStrategy`] and comes out as a canonical [`Directory`].
//!
//! [`Directory`]: malldir_shared::Directory

pub mod aggregator;
pub mod pipeline;
pub mod sources;
pub mod strategies;

pub use aggregator::{DirectoryHeader, FloorMetadata, NormalizedStore, StoreCount, aggregate};
pub use pipeline::{build_directory, source_meta};
pub use sources::{FeedKind, ListingFeed, SourceInput};
pub use strategies::{MallStrategy, StoreCountSource, StrategyRegistry};
