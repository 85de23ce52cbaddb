//! Per-user learning statistics.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{ProgressRecord, Word};

/// How many recent reviews the dashboard lists.
pub const RECENT_LIMIT: usize = 5;

/// Dashboard summary for one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_words: usize,
    pub known_words: usize,
    pub unknown_words: usize,
    pub not_reviewed: usize,
    pub percent_complete: u32,
    pub recent: Vec<RecentReview>,
}

/// A recently reviewed word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentReview {
    pub word_id: Uuid,
    pub source_text: String,
    pub target_text: String,
    pub is_known: bool,
    pub review_count: i32,
    pub last_reviewed: DateTime<Utc>,
}

impl DashboardStats {
    pub fn compute(words: &[Word], progress: &[ProgressRecord]) -> Self {
        let total_words = words.len();
        let known_words = progress.iter().filter(|p| p.is_known).count();
        let unknown_words = progress.len() - known_words;
        let not_reviewed = total_words.saturating_sub(progress.len());
        let percent_complete = if total_words == 0 {
            0
        } else {
            ((known_words as f64 / total_words as f64) * 100.0).round() as u32
        };

        let by_id: HashMap<Uuid, &Word> = words.iter().map(|w| (w.id, w)).collect();
        let mut ordered: Vec<&ProgressRecord> = progress.iter().collect();
        ordered.sort_by(|a, b| b.last_reviewed.cmp(&a.last_reviewed));

        let recent = ordered
            .into_iter()
            .filter_map(|p| {
                by_id.get(&p.word_id).map(|w| RecentReview {
                    word_id: w.id,
                    source_text: w.source_text.clone(),
                    target_text: w.target_text.clone(),
                    is_known: p.is_known,
                    review_count: p.review_count,
                    last_reviewed: p.last_reviewed,
                })
            })
            .take(RECENT_LIMIT)
            .collect();

        Self {
            total_words,
            known_words,
            unknown_words,
            not_reviewed,
            percent_complete,
            recent,
        }
    }
}

/// A word annotated with the viewer's progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordWithProgress {
    #[serde(flatten)]
    pub word: Word,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_known: Option<bool>,
    pub review_count: i32,
}

/// Join words with a user's progress, keeping word order.
pub fn annotate_words(words: Vec<Word>, progress: &[ProgressRecord]) -> Vec<WordWithProgress> {
    let by_word: HashMap<Uuid, &ProgressRecord> =
        progress.iter().map(|p| (p.word_id, p)).collect();

    words
        .into_iter()
        .map(|word| {
            let record = by_word.get(&word.id);
            WordWithProgress {
                is_known: record.map(|p| p.is_known),
                review_count: record.map(|p| p.review_count).unwrap_or(0),
                word,
            }
        })
        .collect()
}
