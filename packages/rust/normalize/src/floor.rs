//! Floor label normalization.
//!
//! Every scheme maps a free-text label to a [`NormalizedFloor`] whose `label`
//! normalizes back to the same `id` and `order`, so a floor can be
//! re-derived from a store's `floor_label` at any later stage.

use std::sync::LazyLock;

use regex::Regex;

/// Id and label used for floors no scheme can place.
pub const UNKNOWN_FLOOR: &str = "UNKNOWN";

/// Ground-level tokens that all sort at order 0.
const GROUND_FAMILY: [&str; 6] = ["G", "GF", "UG", "LG", "M", "MF"];

/// `FLOOR 3` style phrase anywhere in the label (input is already
/// upper-cased). Text after the floor token is ignored.
static FLOOR_PHRASE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bFLOOR\s+(\d+|(?:B\d+|GF|UG|LG|MF|G|M)\b)").expect("floor phrase regex")
});

/// `3 FLOOR` / `GFLOOR` style suffix.
static FLOOR_SUFFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+?)\s*FLOOR$").expect("floor suffix regex"));

/// Canonical floor token accepted by the arithmetic scheme.
static CANONICAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(B\d+|GF|G|UG|LG|MF|M|\d{1,2})F?$").expect("canonical floor regex")
});

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A floor label reduced to a stable identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedFloor {
    /// Short normalized form (e.g. `3`, `G`, `B1`).
    pub id: String,
    /// Human-readable form (e.g. `3 Floor`).
    pub label: String,
    /// Sort key.
    pub order: i32,
}

impl NormalizedFloor {
    fn unknown(order: i32) -> Self {
        Self {
            id: UNKNOWN_FLOOR.into(),
            label: UNKNOWN_FLOOR.into(),
            order,
        }
    }

    fn labelled(id: String, order: i32) -> Self {
        Self {
            label: format!("{id} Floor"),
            id,
            order,
        }
    }

    /// Whether this is the fallback floor.
    pub fn is_unknown(&self) -> bool {
        self.id == UNKNOWN_FLOOR
    }
}

/// Where floors a scheme cannot place end up in the sort order.
///
/// Sources disagree here, so each strategy picks one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownFloorPlacement {
    /// Order 0, alongside ground level.
    #[default]
    Ground,
    /// Before every other floor.
    First,
    /// After every other floor.
    Last,
}

impl UnknownFloorPlacement {
    /// Sort key assigned to unplaced floors.
    pub fn order(self) -> i32 {
        match self {
            Self::Ground => 0,
            Self::First => i32::MIN,
            Self::Last => i32::MAX,
        }
    }
}

/// First-character ordering table for the table scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderTable {
    entries: Vec<(char, i32)>,
}

impl OrderTable {
    /// Build a table from `(first character, order)` pairs. Characters are
    /// matched case-insensitively.
    pub fn new(entries: impl IntoIterator<Item = (char, i32)>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|(c, order)| (c.to_ascii_uppercase(), order))
                .collect(),
        }
    }

    /// Basement, ground, mezzanine, then numbered floors shifted above the
    /// mezzanine.
    pub fn standard() -> Self {
        Self::new([
            ('B', -1),
            ('G', 0),
            ('M', 1),
            ('1', 2),
            ('2', 3),
            ('3', 4),
            ('4', 5),
            ('5', 6),
            ('6', 7),
        ])
    }

    fn lookup(&self, first: char) -> Option<i32> {
        let first = first.to_ascii_uppercase();
        self.entries
            .iter()
            .find(|(c, _)| *c == first)
            .map(|(_, order)| *order)
    }
}

impl Default for OrderTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// How a strategy turns floor labels into ids and orders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FloorScheme {
    /// Strip `Floor`/`F` and order by the first character.
    Table(OrderTable),
    /// Parse basement/ground/numbered tokens into signed orders.
    Arithmetic,
    /// Keep the label as the id; ordering comes from source metadata.
    Verbatim,
}

/// A floor scheme plus its placement policy for unplaceable labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FloorNormalizer {
    scheme: FloorScheme,
    unknown: UnknownFloorPlacement,
}

impl FloorNormalizer {
    pub fn new(scheme: FloorScheme) -> Self {
        Self {
            scheme,
            unknown: UnknownFloorPlacement::default(),
        }
    }

    pub fn table() -> Self {
        Self::new(FloorScheme::Table(OrderTable::standard()))
    }

    pub fn arithmetic() -> Self {
        Self::new(FloorScheme::Arithmetic)
    }

    pub fn verbatim() -> Self {
        Self::new(FloorScheme::Verbatim)
    }

    /// Override where unplaceable floors sort.
    pub fn with_unknown(mut self, placement: UnknownFloorPlacement) -> Self {
        self.unknown = placement;
        self
    }

    pub fn scheme(&self) -> &FloorScheme {
        &self.scheme
    }

    /// Normalize a label. Never fails; unplaceable input yields the
    /// `UNKNOWN` floor.
    pub fn normalize(&self, label: &str) -> NormalizedFloor {
        let fallback = self.unknown.order();
        let normalized = match &self.scheme {
            FloorScheme::Table(table) => normalize_table(label, table, fallback),
            FloorScheme::Arithmetic => normalize_arithmetic(label, fallback),
            FloorScheme::Verbatim => normalize_verbatim(label, fallback),
        };
        if normalized.is_unknown() && !label.trim().is_empty() {
            tracing::debug!(label, "floor label not recognized, using fallback");
        }
        normalized
    }
}

impl Default for FloorNormalizer {
    fn default() -> Self {
        Self::arithmetic()
    }
}

/// Free-function form of [`FloorNormalizer::normalize`].
pub fn normalize_floor(label: &str, normalizer: &FloorNormalizer) -> NormalizedFloor {
    normalizer.normalize(label)
}

// ---------------------------------------------------------------------------
// Schemes
// ---------------------------------------------------------------------------

fn normalize_table(label: &str, table: &OrderTable, fallback: i32) -> NormalizedFloor {
    let Some(token) = floor_token(label) else {
        return NormalizedFloor::unknown(fallback);
    };
    if token == UNKNOWN_FLOOR {
        return NormalizedFloor::unknown(fallback);
    }

    let id = strip_trailing_f(&token).to_string();
    let order = id
        .chars()
        .next()
        .and_then(|first| table.lookup(first))
        .unwrap_or(fallback);

    NormalizedFloor::labelled(id, order)
}

fn normalize_arithmetic(label: &str, fallback: i32) -> NormalizedFloor {
    let Some(token) = floor_token(label) else {
        return NormalizedFloor::unknown(fallback);
    };
    let Some(caps) = CANONICAL_RE.captures(&token) else {
        return NormalizedFloor::unknown(fallback);
    };
    let value = &caps[1];

    if let Some(digits) = value.strip_prefix('B') {
        // The regex guarantees digits; only overflow can fail here.
        return match digits.parse::<i32>() {
            Ok(n) => NormalizedFloor::labelled(format!("B{n}"), -n),
            Err(_) => NormalizedFloor::unknown(fallback),
        };
    }

    if GROUND_FAMILY.contains(&value) {
        return NormalizedFloor::labelled(strip_trailing_f(value).to_string(), 0);
    }

    match value.parse::<i32>() {
        Ok(n) => NormalizedFloor::labelled(n.to_string(), n),
        Err(_) => NormalizedFloor::unknown(fallback),
    }
}

fn normalize_verbatim(label: &str, fallback: i32) -> NormalizedFloor {
    let trimmed = label.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(UNKNOWN_FLOOR) {
        return NormalizedFloor::unknown(fallback);
    }
    NormalizedFloor {
        id: trimmed.to_string(),
        label: trimmed.to_string(),
        order: 0,
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Upper-case the label and peel off any `Floor` wording around the token.
fn floor_token(label: &str) -> Option<String> {
    let upper = label
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase();

    let token = if let Some(caps) = FLOOR_PHRASE_RE.captures(&upper) {
        caps[1].to_string()
    } else if let Some(caps) = FLOOR_SUFFIX_RE.captures(&upper) {
        caps[1].trim().to_string()
    } else {
        upper
    };

    (!token.is_empty() && token != "FLOOR").then_some(token)
}

/// `3F` → `3`, `GF` → `G`; a token made only of `F`s is kept.
fn strip_trailing_f(token: &str) -> &str {
    match token.trim_end_matches('F') {
        "" => token,
        rest => rest,
    }
}
