use std::cmp::Ordering;
use std::fmt;

use icu_collator::{Collator, CollatorOptions};
use icu_locid::Locale;
use serde_json::{Map, Value};
use tracing::warn;

/// How mapping keys are ordered before a save.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Keep insertion order
    #[default]
    Unsorted,
    /// Plain code-unit order
    Lexicographic,
    /// Collation for a BCP 47 tag (e.g. "en", "fr-CA").
    /// Unknown or malformed tags fall back to the root collation.
    Locale(String),
}

impl SortOrder {
    pub fn is_sorted(&self) -> bool {
        !matches!(self, SortOrder::Unsorted)
    }
}

/// Key comparison resolved once per sort
enum KeyOrder {
    CodeUnits,
    Collated(Collator),
}

impl KeyOrder {
    fn new(order: &SortOrder) -> Self {
        let SortOrder::Locale(tag) = order else {
            return KeyOrder::CodeUnits;
        };

        let locale = tag.parse::<Locale>().unwrap_or_else(|e| {
            warn!(locale = %tag, error = %e, "Invalid locale tag, using root collation");
            Locale::UND
        });
        match Collator::try_new(&(&locale).into(), CollatorOptions::new()) {
            Ok(collator) => KeyOrder::Collated(collator),
            Err(e) => {
                warn!(locale = %tag, error = %e, "No collation data, using code-unit order");
                KeyOrder::CodeUnits
            }
        }
    }

    fn compare(&self, a: &str, b: &str) -> Ordering {
        match self {
            // UTF-16 order, matching how the stored text is fingerprinted
            KeyOrder::CodeUnits => a.encode_utf16().cmp(b.encode_utf16()),
            KeyOrder::Collated(collator) => collator.compare(a, b),
        }
    }
}

impl From<bool> for SortOrder {
    fn from(sort: bool) -> Self {
        if sort {
            SortOrder::Lexicographic
        } else {
            SortOrder::Unsorted
        }
    }
}

impl From<&str> for SortOrder {
    fn from(locale: &str) -> Self {
        if locale.is_empty() {
            SortOrder::Lexicographic
        } else {
            SortOrder::Locale(locale.to_string())
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Unsorted => write!(f, "false"),
            SortOrder::Lexicographic => write!(f, "true"),
            SortOrder::Locale(tag) => write!(f, "{}", tag),
        }
    }
}

/// Return `value` with mapping keys reordered.
///
/// Without `recursive` only the top-level mapping is reordered. With it,
/// nested mappings are reordered too, including mappings inside sequences.
/// Sequence order itself is never changed.
pub fn sort_by_key(value: Value, order: &SortOrder, recursive: bool) -> Value {
    if !order.is_sorted() {
        return value;
    }
    sort_value(value, &KeyOrder::new(order), recursive)
}

fn sort_value(value: Value, order: &KeyOrder, recursive: bool) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|(a, _), (b, _)| order.compare(a, b));

            let sorted: Map<String, Value> = entries
                .into_iter()
                .map(|(key, child)| {
                    let child = if recursive {
                        sort_value(child, order, recursive)
                    } else {
                        child
                    };
                    (key, child)
                })
                .collect();
            Value::Object(sorted)
        }
        Value::Array(items) if recursive => Value::Array(
            items
                .into_iter()
                .map(|item| sort_value(item, order, recursive))
                .collect(),
        ),
        other => other,
    }
}
