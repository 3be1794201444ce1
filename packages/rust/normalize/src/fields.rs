//! Small per-field cleanups shared by every source.

use malldir_shared::StoreStatus;

/// Label some sources put in front of unit numbers.
const UNIT_PREFIX: &str = "Unit no.";

/// The one status phrase that means a store is trading.
const OPEN_STATUS: &str = "Now Open";

/// Strip a leading `Unit no.` label; absent or blank input becomes `""`.
pub fn normalize_unit(text: Option<&str>) -> String {
    let Some(text) = text else {
        return String::new();
    };
    let text = text.trim();
    let rest = match text.get(..UNIT_PREFIX.len()) {
        Some(head) if head.eq_ignore_ascii_case(UNIT_PREFIX) => &text[UNIT_PREFIX.len()..],
        _ => text,
    };
    rest.trim().to_string()
}

/// Sources without status text list only trading stores; otherwise only
/// "Now Open" counts as active.
pub fn status_from_text(text: Option<&str>) -> StoreStatus {
    match text.map(str::trim) {
        None => StoreStatus::Active,
        Some(t) if t.eq_ignore_ascii_case(OPEN_STATUS) => StoreStatus::Active,
        Some(_) => StoreStatus::Closed,
    }
}

/// Collapse internal whitespace runs and trim.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
