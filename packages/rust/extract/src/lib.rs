//! Page extraction for malldir: the markup side of token-stream and
//! embedded-payload sources.
//!
//! - [`text_tokens`] turns a rendered directory page into the ordered token
//!   stream the classifier consumes.
//! - [`flight_payload`] reassembles the data a streamed page pushes through
//!   `self.__next_f.push(..)` script calls.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};
use tracing::{debug, trace};

/// Elements whose text never reaches the reader.
const HIDDEN_ELEMENTS: [&str; 4] = ["script", "style", "noscript", "template"];

/// `self.__next_f.push([<n>,"<chunk>"])` with a JSON string literal chunk.
static PUSH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"self\.__next_f\.push\(\[\s*\d+\s*,\s*"((?:[^"\\]|\\.)*)"\s*\]\)"#)
        .expect("flight push regex")
});

/// Every non-empty trimmed text node of `html`, in document order.
pub fn text_tokens(html: &str) -> Vec<String> {
    let doc = Html::parse_document(html);
    let tokens: Vec<String> = doc
        .tree
        .root()
        .descendants()
        .filter_map(|node| {
            let text = node.value().as_text()?;
            let hidden = node.ancestors().any(|a| {
                a.value()
                    .as_element()
                    .is_some_and(|el| HIDDEN_ELEMENTS.contains(&el.name()))
            });
            let text = text.trim();
            (!hidden && !text.is_empty()).then(|| text.to_string())
        })
        .collect();
    debug!(tokens = tokens.len(), "extracted text tokens");
    tokens
}

/// Concatenated string chunks of every flight push in the page's scripts.
///
/// Chunks are JSON string literals and are decoded as such; a chunk that
/// does not decode is kept as written.
pub fn flight_payload(html: &str) -> String {
    let doc = Html::parse_document(html);
    let script_sel = Selector::parse("script").expect("script selector");

    let mut payload = String::new();
    let mut chunks = 0usize;
    for script in doc.select(&script_sel) {
        let source: String = script.text().collect();
        for caps in PUSH_RE.captures_iter(&source) {
            let raw = &caps[1];
            match serde_json::from_str::<String>(&format!("\"{raw}\"")) {
                Ok(decoded) => payload.push_str(&decoded),
                Err(e) => {
                    trace!(error = %e, "keeping undecodable flight chunk verbatim");
                    payload.push_str(raw);
                }
            }
            chunks += 1;
        }
    }
    debug!(chunks, bytes = payload.len(), "assembled flight payload");
    payload
}
