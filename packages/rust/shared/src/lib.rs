//! Shared types, error model, and configuration for malldir.
//!
//! This crate is the foundation depended on by all other malldir crates.
//! It provides:
//! - [`MallDirError`]: the unified error type
//! - Domain types ([`Directory`], [`Floor`], [`Store`], [`Category`])
//! - Configuration ([`AppConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DefaultsConfig, MallRegistryEntry, config_dir, config_file_path, init_config,
    init_config_at, load_config, load_config_from,
};
pub use error::{MallDirError, Result};
pub use types::{
    Category, Directory, Floor, FloorInfo, SourceMeta, Store, StoreStatus, format_utc_seconds,
};
