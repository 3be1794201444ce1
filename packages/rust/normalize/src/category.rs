//! Free-text category normalization onto the closed taxonomy.

use std::sync::LazyLock;

use malldir_shared::Category;

/// One `(keywords, category)` rule. Keywords are stored lower-cased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRule {
    keywords: Vec<String>,
    category: Category,
}

impl CategoryRule {
    pub fn new<S: AsRef<str>>(keywords: impl IntoIterator<Item = S>, category: Category) -> Self {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().to_lowercase())
                .collect(),
            category,
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    fn matches(&self, haystack: &str) -> bool {
        self.keywords.iter().any(|k| haystack.contains(k.as_str()))
    }
}

/// An ordered rule list; earlier rules win.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CategoryRules {
    rules: Vec<CategoryRule>,
}

impl CategoryRules {
    pub fn new(rules: Vec<CategoryRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    /// First rule with a keyword contained in any of `texts`.
    pub fn classify<'a>(&self, texts: impl IntoIterator<Item = &'a str>) -> Option<Category> {
        let lowered: Vec<String> = texts
            .into_iter()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_lowercase)
            .collect();
        if lowered.is_empty() {
            return None;
        }

        self.rules
            .iter()
            .find(|rule| lowered.iter().any(|text| rule.matches(text)))
            .map(CategoryRule::category)
    }
}

/// Broad rule set used for API listings and most token sources.
pub fn standard_rules() -> &'static CategoryRules {
    static RULES: LazyLock<CategoryRules> = LazyLock::new(|| {
        use Category::*;
        CategoryRules::new(vec![
            CategoryRule::new(
                [
                    "food", "dining", "restaurant", "cafe", "dessert", "bar", "bakery", "snack",
                    "beverage", "eat",
                ],
                FoodAndBeverage,
            ),
            CategoryRule::new(["fashion", "apparel", "clothing", "luxury"], Fashion),
            CategoryRule::new(["beauty", "cosmetic", "fragrance", "wellness"], Beauty),
            CategoryRule::new(["electronic", "gadget", "tech"], Electronics),
            CategoryRule::new(["sport", "fitness"], Sports),
            CategoryRule::new(["book", "education"], Books),
            CategoryRule::new(
                ["home", "living", "lifestyle", "department store"],
                HomeAndGarden,
            ),
            CategoryRule::new(["health", "pharmacy"], HealthAndPharmacy),
            CategoryRule::new(
                ["entertainment", "leisure", "hub of vdo", "vdo", "cinema"],
                Entertainment,
            ),
            CategoryRule::new(["service", "co-working", "hall", "office"], Services),
            CategoryRule::new(["jewelry"], Jewelry),
            CategoryRule::new(["watch"], Watches),
            CategoryRule::new(
                ["bag", "accessories", "eyewear", "optical"],
                BagsAndAccessories,
            ),
            CategoryRule::new(["shoe"], Shoes),
            CategoryRule::new(["kids", "toys", "hobbies"], KidsAndBaby),
            CategoryRule::new(["automotive"], Automotive),
            CategoryRule::new(["bank", "credit card"], Banking),
            CategoryRule::new(["travel", "tourist", "souvenir"], Travel),
        ])
    });
    &RULES
}

/// Narrower rule set for shop-list pages whose headers fold jewelry, shoes
/// and bags into fashion.
pub fn shoplist_rules() -> &'static CategoryRules {
    static RULES: LazyLock<CategoryRules> = LazyLock::new(|| {
        use Category::*;
        CategoryRules::new(vec![
            CategoryRule::new(
                [
                    "food", "dine", "restaurant", "cafe", "beverage", "dessert", "bakery", "snack",
                ],
                FoodAndBeverage,
            ),
            CategoryRule::new(
                ["fashion", "apparel", "clothing", "gold", "jewelry", "shoe", "bag"],
                Fashion,
            ),
            CategoryRule::new(
                ["beauty", "cosmetic", "clinic", "spa", "massage", "hair", "nail"],
                Beauty,
            ),
            CategoryRule::new(
                ["tech", "camera", "computer", "mobile", "electronics", "gadget"],
                Electronics,
            ),
            CategoryRule::new(["sport", "fitness"], Sports),
            CategoryRule::new(["book", "education"], Books),
            CategoryRule::new(["home", "living", "lifestyle"], HomeAndGarden),
            CategoryRule::new(["health", "pharmacy"], HealthAndPharmacy),
            CategoryRule::new(["entertainment", "cinema"], Entertainment),
            CategoryRule::new(["kids", "toys"], KidsAndBaby),
        ])
    });
    &RULES
}

/// Map a source label plus keywords onto the taxonomy.
///
/// A forced category wins unconditionally. Otherwise the first matching rule
/// decides, and anything unmatched (or empty) becomes [`Category::Services`].
pub fn normalize_category(
    label: Option<&str>,
    keywords: &[String],
    forced: Option<Category>,
    rules: &CategoryRules,
) -> Category {
    if let Some(category) = forced {
        return category;
    }

    let texts = label.into_iter().chain(keywords.iter().map(String::as_str));
    rules.classify(texts).unwrap_or_else(|| {
        tracing::trace!(?label, "no category rule matched, defaulting to Services");
        Category::Services
    })
}
