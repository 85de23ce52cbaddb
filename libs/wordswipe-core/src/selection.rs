//! Review queue selection.
//!
//! Words never reviewed by the user come first, then words the user last
//! marked unknown. Words marked known are left out. Input order is kept within
//! both groups; there is no shuffling and no weighting by recency or count.

use std::collections::HashSet;

use uuid::Uuid;

use crate::types::{ProgressRecord, Word};

/// Build the ordered list of words a user should review.
///
/// The result holds each word id at most once. Progress records that refer to
/// words outside `words` have no effect.
pub fn build_review_queue(words: &[Word], progress: &[ProgressRecord]) -> Vec<Word> {
    let reviewed: HashSet<Uuid> = progress.iter().map(|p| p.word_id).collect();
    let known: HashSet<Uuid> = progress
        .iter()
        .filter(|p| p.is_known)
        .map(|p| p.word_id)
        .collect();

    let mut seen = HashSet::with_capacity(words.len());
    let mut unseen = Vec::new();
    let mut seen_but_unknown = Vec::new();

    for word in words {
        if !seen.insert(word.id) {
            continue;
        }
        if !reviewed.contains(&word.id) {
            unseen.push(word.clone());
        } else if !known.contains(&word.id) {
            seen_but_unknown.push(word.clone());
        }
    }

    unseen.extend(seen_but_unknown);
    unseen
}
