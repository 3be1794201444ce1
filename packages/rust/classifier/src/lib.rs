//! Token-stream classification for scraped mall directory pages.
//!
//! This crate provides:
//! - [`ClassifierRules`]: one source's markers, noise, headers, and field prefixes
//! - [`classify`]: the single-pass state machine producing [`RawEntry`] values
//!
//! Classification never fails; see [`classify`] for the drop rules.

pub mod classify;
pub mod rules;

pub use classify::{RawEntry, classify};
pub use rules::{ClassifierRules, Field, LocalScript, StructuralPrefix, TokenKind};
