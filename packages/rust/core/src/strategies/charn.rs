//! Charn at the Avenue directory page (token stream).

use std::sync::LazyLock;

use malldir_classifier::{ClassifierRules, Field, LocalScript};
use malldir_normalize::FloorNormalizer;

use super::MallStrategy;

static RULES: LazyLock<ClassifierRules> = LazyLock::new(|| {
    ClassifierRules::new()
        .start_markers(["DIRECTORY"])
        .end_markers(["Site Index"])
        .statuses(["Now Open", "Opening Soon", "Coming Soon"])
        .prefix("Building", Field::Building)
        .prefix("Floor", Field::Floor)
        .prefix("Unit no.", Field::Unit)
        .local_script(LocalScript::Thai)
});

static FLOORS: LazyLock<FloorNormalizer> = LazyLock::new(|| FloorNormalizer::arithmetic());

/// Cards carry building, floor and unit lines plus a Thai name, and close
/// on their opening-status badge.
pub struct CharnAtTheAvenue;

impl MallStrategy for CharnAtTheAvenue {
    fn slug(&self) -> &str {
        "charn-at-the-avenue"
    }

    fn source_name(&self) -> &str {
        "Charn at the Avenue Directory (official)"
    }

    fn source_url(&self) -> &str {
        "https://www.charnattheavenue.com/directory"
    }

    fn classifier_rules(&self) -> Option<&ClassifierRules> {
        Some(&RULES)
    }

    fn floors(&self) -> &FloorNormalizer {
        &FLOORS
    }
}
