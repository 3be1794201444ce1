//! Floor, category, and field normalization for mall directory sources.
//!
//! This crate provides:
//! - [`floor`]: free-text floor labels to stable id/label/order
//! - [`category`]: free text and keywords to the closed [`Category`] taxonomy
//! - [`hours`]: opening times to `HH:MM-HH:MM`
//! - [`fields`]: unit, status, and whitespace cleanups
//!
//! Nothing here fails: unparseable input falls back to a documented value.
//!
//! [`Category`]: malldir_shared::Category

pub mod category;
pub mod fields;
pub mod floor;
pub mod hours;

pub use category::{
    CategoryRule, CategoryRules, normalize_category, shoplist_rules, standard_rules,
};
pub use fields::{collapse_whitespace, normalize_unit, status_from_text};
pub use floor::{
    FloorNormalizer, FloorScheme, NormalizedFloor, OrderTable, UNKNOWN_FLOOR,
    UnknownFloorPlacement, normalize_floor,
};
pub use hours::{format_hours, normalize_time};
