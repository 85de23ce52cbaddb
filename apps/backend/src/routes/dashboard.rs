//! Dashboard endpoint

use axum::{extract::State, Extension, Json};

use crate::error::Result;
use crate::models::DashboardStats;
use crate::routes::auth::AuthenticatedUser;
use crate::services::learning;
use crate::AppState;

/// GET /api/dashboard
pub async fn stats(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<DashboardStats>> {
    let stats =
        learning::dashboard(state.words.as_ref(), state.progress.as_ref(), &auth.user).await?;
    Ok(Json(stats))
}
