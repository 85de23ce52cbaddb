//! Bundled default vocabulary.

use std::collections::HashSet;

use serde::Deserialize;

use crate::error::Result;
use crate::types::{Word, WordInput};

/// One entry of a default word list.
#[derive(Debug, Clone, Deserialize)]
pub struct DefaultWord {
    pub source: String,
    pub target: String,
}

/// Default words not yet present among `existing_defaults`.
///
/// Matching is on normalized source text; duplicates inside `defaults` are
/// collapsed so seeding twice never inserts anything the second time.
pub fn missing_defaults(
    defaults: &[DefaultWord],
    existing_defaults: &[Word],
) -> Result<Vec<WordInput>> {
    let mut present: HashSet<String> = existing_defaults
        .iter()
        .filter(|w| w.is_default)
        .map(|w| w.source_text.clone())
        .collect();

    let mut missing = Vec::new();
    for entry in defaults {
        let input = WordInput::default_word(&entry.source, &entry.target)?;
        if present.insert(input.source_text().to_string()) {
            missing.push(input);
        }
    }
    Ok(missing)
}
