//! Word endpoints

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    Extension, Json,
};

use crate::error::Result;
use crate::models::*;
use crate::routes::auth::AuthenticatedUser;
use crate::services::catalogue;
use crate::AppState;

/// GET /api/words?mine=true
/// Words newest first with the caller's progress; `mine` keeps only the caller's own words
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    query: std::result::Result<Query<WordListQuery>, QueryRejection>,
) -> Result<Json<WordListResponse>> {
    let Query(query) = query?;
    let words = catalogue::list_with_progress(
        state.words.as_ref(),
        state.progress.as_ref(),
        &auth.user,
        query.mine,
    )
    .await?;

    Ok(Json(WordListResponse {
        total: words.len(),
        words,
    }))
}

/// POST /api/words
pub async fn add(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    payload: std::result::Result<Json<AddWordRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Word>)> {
    let Json(payload) = payload?;
    let word = catalogue::add_word(
        state.words.as_ref(),
        &auth.user,
        &payload.source_text,
        &payload.target_text,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(word)))
}

/// POST /api/words/seed
/// Inserts the bundled default words that are missing
pub async fn seed(State(state): State<AppState>) -> Result<Json<SeedResponse>> {
    let defaults = catalogue::bundled_defaults()?;
    let inserted = catalogue::seed_default_words(state.words.as_ref(), &defaults).await?;

    let message = if inserted == 0 {
        "All default words already present".to_string()
    } else {
        format!("{} words added", inserted)
    };

    Ok(Json(SeedResponse { inserted, message }))
}
