//! Single-pass state machine from token stream to raw entries.
//!
//! Shop names are rebuilt by joining consecutive name tokens with a space.
//! The stream does not distinguish a multi-word name from stray text between
//! listings, so this join is a best-effort heuristic and nothing tries to
//! second-guess it.

use tracing::{debug, trace};

use crate::rules::{ClassifierRules, Field, TokenKind};

/// One listing as it appeared in the token stream, before normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawEntry {
    pub name: String,
    pub name_local: Option<String>,
    pub floor_text: Option<String>,
    /// Category header in effect when the entry closed.
    pub category_context: Option<String>,
    pub unit_text: Option<String>,
    pub building_text: Option<String>,
    pub status_text: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Seeking,
    Active,
    Done,
}

/// Fields collected since the last closing token.
#[derive(Debug, Default)]
struct Pending {
    name: String,
    name_local: Option<String>,
    floor_text: Option<String>,
    unit_text: Option<String>,
    building_text: Option<String>,
}

impl Pending {
    fn is_empty(&self) -> bool {
        self.name.is_empty()
            && self.name_local.is_none()
            && self.floor_text.is_none()
            && self.unit_text.is_none()
            && self.building_text.is_none()
    }
}

fn append_word(target: &mut String, token: &str) {
    if !target.is_empty() {
        target.push(' ');
    }
    target.push_str(token);
}

/// Classifier run over one token stream.
struct Scan<'r> {
    rules: &'r ClassifierRules,
    state: State,
    category: Option<String>,
    pending: Pending,
    entries: Vec<RawEntry>,
    dropped: usize,
}

impl<'r> Scan<'r> {
    fn new(rules: &'r ClassifierRules) -> Self {
        let state = if rules.has_start_markers() {
            State::Seeking
        } else {
            State::Active
        };
        Self {
            rules,
            state,
            category: None,
            pending: Pending::default(),
            entries: Vec::new(),
            dropped: 0,
        }
    }

    fn feed(&mut self, token: &str) {
        match self.state {
            State::Done => {}
            State::Seeking => {
                if self.rules.is_start(token) {
                    trace!(token, "directory region opened");
                    self.state = State::Active;
                }
            }
            State::Active => self.feed_active(token),
        }
    }

    fn feed_active(&mut self, token: &str) {
        match self.rules.kind_of(token) {
            TokenKind::End => {
                trace!(token, "directory region closed");
                self.state = State::Done;
            }
            TokenKind::Noise => {}
            TokenKind::CategoryHeader => self.category = Some(token.to_string()),
            TokenKind::Floor => self.close(Some(token.to_uppercase()), None),
            TokenKind::Status => self.close(None, Some(token.to_string())),
            TokenKind::Field(field) => {
                let slot = match field {
                    Field::Floor => &mut self.pending.floor_text,
                    Field::Unit => &mut self.pending.unit_text,
                    Field::Building => &mut self.pending.building_text,
                };
                *slot = Some(token.to_string());
            }
            TokenKind::LocalName => {
                append_word(self.pending.name_local.get_or_insert_with(String::new), token);
            }
            TokenKind::Name => append_word(&mut self.pending.name, token),
        }
    }

    /// Emit the pending entry (if it has a name) and clear the buffer.
    ///
    /// A card carrying only a local-script name keeps that name as its
    /// primary one.
    fn close(&mut self, floor_text: Option<String>, status_text: Option<String>) {
        let mut pending = std::mem::take(&mut self.pending);
        if pending.name.is_empty() {
            pending.name = pending.name_local.take().unwrap_or_default();
        }
        if pending.name.is_empty() {
            if !pending.is_empty() {
                self.dropped += 1;
            }
            trace!(?floor_text, ?status_text, "closing token without a pending name");
            return;
        }

        self.entries.push(RawEntry {
            name: pending.name,
            name_local: pending.name_local,
            floor_text: floor_text.or(pending.floor_text),
            category_context: self.category.clone(),
            unit_text: pending.unit_text,
            building_text: pending.building_text,
            status_text,
        });
    }

    fn finish(self) -> Vec<RawEntry> {
        if !self.pending.name.is_empty() {
            debug!(name = %self.pending.name, "discarding unterminated entry at end of stream");
        }
        if self.state == State::Seeking {
            debug!("start marker never seen; no entries classified");
        }
        if self.dropped > 0 {
            debug!(dropped = self.dropped, "dropped entries without a name");
        }
        self.entries
    }
}

/// Classify a token stream into raw entries.
///
/// Tokens are trimmed and blanks skipped. Never fails: unrecognized tokens
/// become name text, closing tokens without a pending name are consumed
/// silently, and an entry still open at the end of input is discarded.
pub fn classify<S: AsRef<str>>(tokens: &[S], rules: &ClassifierRules) -> Vec<RawEntry> {
    let mut scan = Scan::new(rules);
    for token in tokens {
        let token = token.as_ref().trim();
        if token.is_empty() {
            continue;
        }
        scan.feed(token);
        if scan.state == State::Done {
            break;
        }
    }
    scan.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::LocalScript;
    use regex::Regex;

    fn shoplist_rules() -> ClassifierRules {
        ClassifierRules::new()
            .start_markers(["ALL SHOPS"])
            .noise(["ALL SHOPS", "A-Z", "Category", "Shop search"])
            .category_headers(["Fashion", "Food & Beverage"])
            .floor_pattern(Regex::new(r"(?i)^(B\d+|GF|G|UG|LG|MF|M|\d{1,2}F)$").unwrap())
    }

    fn charn_rules() -> ClassifierRules {
        ClassifierRules::new()
            .start_markers(["DIRECTORY"])
            .end_markers(["Site Index"])
            .statuses(["Now Open", "Opening Soon", "Coming Soon"])
            .prefix("Building", Field::Building)
            .prefix("Floor", Field::Floor)
            .prefix("Unit no.", Field::Unit)
            .local_script(LocalScript::Thai)
    }

    #[test]
    fn category_headers_and_floor_tokens() {
        let tokens = [
            "ALL SHOPS",
            "Fashion",
            "Zara",
            "3F",
            "Food & Beverage",
            "Starbucks",
            "GF",
        ];
        let entries = classify(&tokens, &shoplist_rules());

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "Zara");
        assert_eq!(entries[0].floor_text.as_deref(), Some("3F"));
        assert_eq!(entries[0].category_context.as_deref(), Some("Fashion"));
        assert_eq!(entries[1].name, "Starbucks");
        assert_eq!(entries[1].floor_text.as_deref(), Some("GF"));
        assert_eq!(entries[1].category_context.as_deref(), Some("Food & Beverage"));
    }

    #[test]
    fn tokens_before_start_marker_are_ignored() {
        let tokens = ["Shop search", "Uniqlo", "2F", "ALL SHOPS", "H&M", "1F"];
        let entries = classify(&tokens, &shoplist_rules());
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "H&M");
        assert_eq!(entries[0].category_context, None);
    }

    #[test]
    fn consecutive_name_tokens_are_joined() {
        let tokens = ["ALL SHOPS", "Tops", "Daily", "B1"];
        let entries = classify(&tokens, &shoplist_rules());
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "Tops Daily");
        assert_eq!(entries[0].floor_text.as_deref(), Some("B1"));
    }

    #[test]
    fn closing_token_without_name_yields_nothing() {
        let entries = classify(&["ALL SHOPS", "3F", "GF"], &shoplist_rules());
        assert!(entries.is_empty());

        let entries = classify(&["DIRECTORY", "Now Open", "Opening Soon"], &charn_rules());
        assert!(entries.is_empty());
    }

    #[test]
    fn unterminated_entry_is_discarded() {
        let entries = classify(&["ALL SHOPS", "Zara", "3F", "Uniqlo"], &shoplist_rules());
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "Zara");
    }

    #[test]
    fn empty_input_yields_nothing() {
        let tokens: [&str; 0] = [];
        assert!(classify(&tokens, &shoplist_rules()).is_empty());
        assert!(classify(&tokens, &charn_rules()).is_empty());
    }

    #[test]
    fn missing_start_marker_yields_nothing() {
        let entries = classify(&["Zara", "3F"], &shoplist_rules());
        assert!(entries.is_empty());
    }

    #[test]
    fn rules_without_start_marker_begin_active() {
        let rules = ClassifierRules::new()
            .floor_pattern(Regex::new(r"^\d{1,2}F$").unwrap());
        let entries = classify(&["Zara", "3F"], &rules);
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn status_closes_and_structural_fields_attach() {
        let tokens = [
            "Home",
            "DIRECTORY",
            "Building A",
            "Floor 2",
            "Unit no. 2-105",
            "Greyhound",
            "Café",
            "เกรฮาวด์ คาเฟ่",
            "Now Open",
            "Floor 1",
            "Boots",
            "Opening Soon",
            "Site Index",
            "Ignored",
            "Now Open",
        ];
        let entries = classify(&tokens, &charn_rules());
        assert_eq!(entries.len(), 2);

        let first = &entries[0];
        assert_eq!(first.name, "Greyhound Café");
        assert_eq!(first.name_local.as_deref(), Some("เกรฮาวด์ คาเฟ่"));
        assert_eq!(first.building_text.as_deref(), Some("Building A"));
        assert_eq!(first.floor_text.as_deref(), Some("Floor 2"));
        assert_eq!(first.unit_text.as_deref(), Some("Unit no. 2-105"));
        assert_eq!(first.status_text.as_deref(), Some("Now Open"));

        let second = &entries[1];
        assert_eq!(second.name, "Boots");
        assert_eq!(second.floor_text.as_deref(), Some("Floor 1"));
        assert_eq!(second.unit_text, None);
        assert_eq!(second.status_text.as_deref(), Some("Opening Soon"));
    }

    #[test]
    fn status_clears_nameless_structural_fields() {
        let tokens = ["DIRECTORY", "Floor 9", "Now Open", "Boots", "Now Open"];
        let entries = classify(&tokens, &charn_rules());
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].floor_text, None);
    }

    #[test]
    fn local_only_name_becomes_primary_name() {
        let tokens = [
            "DIRECTORY",
            "Floor 1",
            "ร้านข้าวแกง",
            "Now Open",
            "Boots",
            "Now Open",
        ];
        let entries = classify(&tokens, &charn_rules());
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "ร้านข้าวแกง");
        assert_eq!(entries[0].name_local, None);
        assert_eq!(entries[0].floor_text.as_deref(), Some("Floor 1"));
        assert_eq!(entries[1].name, "Boots");
    }

    #[test]
    fn blank_tokens_are_skipped_and_tokens_trimmed() {
        let tokens = ["ALL SHOPS", "  ", " Zara ", "", "3F "];
        let entries = classify(&tokens, &shoplist_rules());
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "Zara");
        assert_eq!(entries[0].floor_text.as_deref(), Some("3F"));
    }

    #[test]
    fn category_context_is_sticky() {
        let tokens = ["ALL SHOPS", "Fashion", "Zara", "3F", "Uniqlo", "2F"];
        let entries = classify(&tokens, &shoplist_rules());
        assert!(entries
            .iter()
            .all(|e| e.category_context.as_deref() == Some("Fashion")));
    }
}
