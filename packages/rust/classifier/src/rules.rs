//! Per-source token vocabularies and how a single token is recognized.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

/// Any character of the Thai block.
static THAI_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\x{0E00}-\x{0E7F}]").expect("thai script regex"));

// ---------------------------------------------------------------------------
// Vocabulary types
// ---------------------------------------------------------------------------

/// Structured field a prefixed token fills on the pending entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Floor,
    Unit,
    Building,
}

/// A token prefix (e.g. `Unit no.`) that routes the token to a [`Field`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuralPrefix {
    pub prefix: String,
    pub field: Field,
}

/// Which scripts count as a localized (secondary) name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalScript {
    /// Any Thai character.
    Thai,
    /// Any alphabetic character outside the Latin blocks.
    NonLatin,
}

impl LocalScript {
    pub fn matches(self, token: &str) -> bool {
        match self {
            Self::Thai => THAI_RE.is_match(token),
            Self::NonLatin => token.chars().any(|c| c.is_alphabetic() && !is_latin(c)),
        }
    }
}

fn is_latin(c: char) -> bool {
    c.is_ascii_alphabetic()
        || matches!(c, '\u{00C0}'..='\u{024F}' | '\u{1E00}'..='\u{1EFF}')
        || c == '\u{00AA}'
        || c == '\u{00BA}'
}

/// What a single token means to the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Closes the directory region for good.
    End,
    /// Chrome or navigation text (or a repeated start marker) to discard.
    Noise,
    /// Sets the sticky category context.
    CategoryHeader,
    /// A floor token that closes the pending entry.
    Floor,
    /// A status token that closes the pending entry.
    Status,
    /// Fills a structured field without closing the entry.
    Field(Field),
    /// Localized-name text.
    LocalName,
    /// Shop-name text (the default).
    Name,
}

// ---------------------------------------------------------------------------
// ClassifierRules
// ---------------------------------------------------------------------------

/// The heuristics one source needs to turn its token stream into entries.
///
/// Built with chained setters:
///
/// ```
/// use malldir_classifier::{ClassifierRules, Field};
///
/// let rules = ClassifierRules::new()
///     .start_markers(["DIRECTORY"])
///     .statuses(["Now Open"])
///     .prefix("Unit no.", Field::Unit);
/// assert!(rules.has_start_markers());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ClassifierRules {
    start_markers: Vec<String>,
    end_markers: Vec<String>,
    noise: HashSet<String>,
    category_headers: HashSet<String>,
    floor_pattern: Option<Regex>,
    statuses: HashSet<String>,
    prefixes: Vec<StructuralPrefix>,
    local_script: Option<LocalScript>,
}

impl ClassifierRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Markers (matched case-insensitively) that open the directory region.
    /// Without any, classification starts immediately.
    pub fn start_markers<S: Into<String>>(mut self, markers: impl IntoIterator<Item = S>) -> Self {
        self.start_markers.extend(markers.into_iter().map(Into::into));
        self
    }

    /// Markers (matched case-insensitively) that end classification.
    pub fn end_markers<S: Into<String>>(mut self, markers: impl IntoIterator<Item = S>) -> Self {
        self.end_markers.extend(markers.into_iter().map(Into::into));
        self
    }

    pub fn noise<S: Into<String>>(mut self, tokens: impl IntoIterator<Item = S>) -> Self {
        self.noise.extend(tokens.into_iter().map(Into::into));
        self
    }

    pub fn category_headers<S: Into<String>>(
        mut self,
        headers: impl IntoIterator<Item = S>,
    ) -> Self {
        self.category_headers
            .extend(headers.into_iter().map(Into::into));
        self
    }

    /// Tokens matching `pattern` are floors that close the pending entry.
    pub fn floor_pattern(mut self, pattern: Regex) -> Self {
        self.floor_pattern = Some(pattern);
        self
    }

    pub fn statuses<S: Into<String>>(mut self, statuses: impl IntoIterator<Item = S>) -> Self {
        self.statuses.extend(statuses.into_iter().map(Into::into));
        self
    }

    pub fn prefix(mut self, prefix: impl Into<String>, field: Field) -> Self {
        self.prefixes.push(StructuralPrefix {
            prefix: prefix.into(),
            field,
        });
        self
    }

    pub fn local_script(mut self, script: LocalScript) -> Self {
        self.local_script = Some(script);
        self
    }

    pub fn has_start_markers(&self) -> bool {
        !self.start_markers.is_empty()
    }

    pub fn is_start(&self, token: &str) -> bool {
        self.start_markers
            .iter()
            .any(|m| m.eq_ignore_ascii_case(token))
    }

    /// Recognize a token inside the directory region.
    ///
    /// Checks run in a fixed precedence: end marker, noise (including a
    /// repeated start marker), category header, closing floor, status,
    /// structural prefix, local script, and finally plain name text.
    pub fn kind_of(&self, token: &str) -> TokenKind {
        if self.end_markers.iter().any(|m| m.eq_ignore_ascii_case(token)) {
            return TokenKind::End;
        }
        if self.noise.contains(token) || self.is_start(token) {
            return TokenKind::Noise;
        }
        if self.category_headers.contains(token) {
            return TokenKind::CategoryHeader;
        }
        if self
            .floor_pattern
            .as_ref()
            .is_some_and(|re| re.is_match(token))
        {
            return TokenKind::Floor;
        }
        if self.statuses.contains(token) {
            return TokenKind::Status;
        }
        if let Some(p) = self.prefixes.iter().find(|p| token.starts_with(&p.prefix)) {
            return TokenKind::Field(p.field);
        }
        if self.local_script.is_some_and(|script| script.matches(token)) {
            return TokenKind::LocalName;
        }
        TokenKind::Name
    }
}
