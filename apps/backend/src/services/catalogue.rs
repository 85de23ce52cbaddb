//! Word catalogue: user additions, default seeding and annotated listings.

use wordswipe_core::{
    annotate_words, missing_defaults, DefaultWord, Result, User, VocabError, Word, WordInput,
    WordWithProgress,
};

use crate::error::ApiError;
use crate::store::{ProgressStore, WordFilter, WordStore};

/// Default vocabulary shipped with the server.
const DEFAULT_WORDS_JSON: &str = include_str!("../../data/default-words.json");

/// Parse the bundled default word list.
pub fn bundled_defaults() -> std::result::Result<Vec<DefaultWord>, ApiError> {
    serde_json::from_str(DEFAULT_WORDS_JSON)
        .map_err(|e| ApiError::Internal(format!("Invalid default word list: {}", e)))
}

/// Add a user-contributed word. Input is validated before the store is called.
pub async fn add_word(words: &dyn WordStore, user: &User, source: &str, target: &str) -> Result<Word> {
    let input = WordInput::user(source, target, user.id)?;
    let word = words
        .insert_words(vec![input])
        .await?
        .pop()
        .ok_or_else(|| VocabError::StoreWrite("insert returned no word".to_string()))?;
    tracing::info!(user_id = %user.id, word_id = %word.id, "word added");
    Ok(word)
}

/// Insert the default words that are not stored yet. Returns how many were added.
pub async fn seed_default_words(words: &dyn WordStore, defaults: &[DefaultWord]) -> Result<usize> {
    let existing = words.list_words(WordFilter::defaults()).await?;
    let missing = missing_defaults(defaults, &existing)?;
    if missing.is_empty() {
        tracing::info!("all default words already present");
        return Ok(0);
    }

    let inserted = words.insert_words(missing).await?.len();
    tracing::info!(inserted, "default words seeded");
    Ok(inserted)
}

/// Words newest first with the user's progress on each. With `only_own`
/// the list is limited to words the user added.
pub async fn list_with_progress(
    words: &dyn WordStore,
    progress: &dyn ProgressStore,
    user: &User,
    only_own: bool,
) -> Result<Vec<WordWithProgress>> {
    let filter = if only_own {
        WordFilter::created_by(user.id)
    } else {
        WordFilter::all()
    };
    let all_words = words.list_words(filter.newest_first()).await?;
    let records = progress.list_progress(user.id).await?;
    Ok(annotate_words(all_words, &records))
}
