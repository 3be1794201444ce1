//! Per-mall strategy trait and the built-in strategies.
//!
//! A strategy bundles everything that differs between mall sources: the
//! classifier vocabulary for token streams, the floor scheme, the category
//! rules, and where the published store count comes from. Adding a mall means
//! adding one implementation here and registering it.

mod central_chaengwattana;
mod charn;
mod iconsiam;
mod siam_paragon;

use malldir_classifier::{ClassifierRules, RawEntry, classify};
use malldir_normalize::{CategoryRules, FloorNormalizer, NormalizedFloor, standard_rules};
use malldir_shared::Category;
use tracing::debug;

pub use central_chaengwattana::CentralChaengwattana;
pub use charn::CharnAtTheAvenue;
pub use iconsiam::IconSiam;
pub use siam_paragon::SiamParagon;

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Which figure a mall publishes as its `storeCount`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreCountSource {
    /// Sum of the stores actually placed on floors.
    #[default]
    Summed,
    /// The number of listings the source itself declares.
    Declared,
}

/// Classification and normalization rules for one mall source.
pub trait MallStrategy: Send + Sync {
    /// Registry key and default output file stem.
    fn slug(&self) -> &str;

    /// Human-readable source name recorded in the directory metadata.
    fn source_name(&self) -> &str;

    /// Canonical page or endpoint the source is read from.
    fn source_url(&self) -> &str;

    fn source_note(&self) -> Option<&str> {
        None
    }

    /// Vocabulary for token-stream input. `None` for API-only sources.
    fn classifier_rules(&self) -> Option<&ClassifierRules> {
        None
    }

    fn floors(&self) -> &FloorNormalizer;

    fn category_rules(&self) -> &CategoryRules {
        standard_rules()
    }

    /// Category applied to every entry regardless of its text.
    fn forced_category(&self) -> Option<Category> {
        None
    }

    fn store_count(&self) -> StoreCountSource {
        StoreCountSource::Summed
    }

    /// Run the classifier over a token stream with this strategy's rules.
    fn classify_tokens(&self, tokens: &[String]) -> Vec<RawEntry> {
        match self.classifier_rules() {
            Some(rules) => classify(tokens, rules),
            None => {
                debug!(strategy = self.slug(), "strategy has no token rules");
                Vec::new()
            }
        }
    }

    fn normalize_floor(&self, label: &str) -> NormalizedFloor {
        self.floors().normalize(label)
    }

    /// Map text onto the taxonomy. A feed-level `forced` category takes
    /// precedence over the strategy-wide one.
    fn normalize_category(
        &self,
        label: Option<&str>,
        keywords: &[String],
        forced: Option<Category>,
    ) -> Category {
        malldir_normalize::normalize_category(
            label,
            keywords,
            forced.or(self.forced_category()),
            self.category_rules(),
        )
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Strategies in registration order, resolvable by slug.
pub struct StrategyRegistry {
    strategies: Vec<Box<dyn MallStrategy>>,
}

impl StrategyRegistry {
    /// A registry holding every built-in strategy.
    pub fn new() -> Self {
        Self {
            strategies: vec![
                Box::new(CentralChaengwattana),
                Box::new(CharnAtTheAvenue),
                Box::new(IconSiam),
                Box::new(SiamParagon),
            ],
        }
    }

    /// Add a strategy. A later registration with the same slug shadows the
    /// earlier one.
    pub fn register(&mut self, strategy: Box<dyn MallStrategy>) {
        self.strategies.push(strategy);
    }

    pub fn get(&self, slug: &str) -> Option<&dyn MallStrategy> {
        self.strategies
            .iter()
            .rev()
            .find(|s| s.slug() == slug)
            .map(|s| s.as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn MallStrategy> {
        self.strategies
            .iter()
            .map(|s| s.as_ref() as &dyn MallStrategy)
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::new()
    }
}
