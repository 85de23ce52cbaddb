//! Learn session endpoints

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::routes::auth::AuthenticatedUser;
use crate::services::learning;
use crate::services::sessions::SessionHandle;
use crate::AppState;

fn find_session(
    state: &AppState,
    auth: &AuthenticatedUser,
    session_id: Uuid,
) -> Result<SessionHandle> {
    state
        .reviews
        .get(auth.user.id, session_id)
        .ok_or_else(|| ApiError::NotFound("Review session not found".to_string()))
}

/// POST /api/learn/sessions
/// Builds the review queue and starts a new session, replacing any previous one
pub async fn start(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<SessionView>> {
    let session =
        learning::start_session(state.words.as_ref(), state.progress.as_ref(), &auth.user).await?;
    let view = SessionView::of(&session);
    state.reviews.insert(session);

    Ok(Json(view))
}

/// GET /api/learn/sessions/:id
pub async fn show(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionView>> {
    let handle = find_session(&state, &auth, session_id)?;
    let session = handle.lock().await;
    Ok(Json(SessionView::of(&session)))
}

/// POST /api/learn/sessions/:id/decision
///
/// A failed store write is reported in the body with the session unchanged,
/// so the client can retry the same card.
pub async fn decide(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(session_id): Path<Uuid>,
    payload: std::result::Result<Json<DecisionRequest>, JsonRejection>,
) -> Result<Json<DecisionResponse>> {
    let Json(payload) = payload?;
    let handle = find_session(&state, &auth, session_id)?;
    let mut session = handle.lock().await;

    let commit = learning::record_decision(
        state.progress.as_ref(),
        &mut session,
        &auth.user,
        payload.word_id,
        payload.decision,
    )
    .await?;

    Ok(Json(DecisionResponse {
        commit,
        session: SessionView::of(&session),
    }))
}
