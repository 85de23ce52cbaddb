//! Authentication middleware and account endpoints

use axum::{
    body::Body,
    extract::{rejection::JsonRejection, Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
    Extension, Json,
};

use crate::error::{ApiError, Result};
use crate::models::{AuthResponse, RegisterRequest, SignInRequest, SignOutResponse, User};
use crate::services::auth as accounts;
use crate::AppState;

/// Authenticated user info stored in request extensions
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user: User,
    pub token: String,
}

/// Auth middleware - resolves the bearer token to the current user
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response> {
    // Extract Bearer token
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::Unauthorized("Invalid Authorization format".to_string()))?
        .trim()
        .to_string();

    let user = state
        .auth
        .current_user(&token)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid or expired token".to_string()))?;

    request
        .extensions_mut()
        .insert(AuthenticatedUser { user, token });

    Ok(next.run(request).await)
}

/// POST /api/auth/register
/// Creates a new account and returns its bearer token
pub async fn register(
    State(state): State<AppState>,
    payload: std::result::Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>> {
    let Json(request) = payload?;
    let (user, token) =
        accounts::register_account(state.auth.as_ref(), &request.username, &request.password)
            .await?;

    Ok(Json(AuthResponse { user, token }))
}

/// POST /api/auth/sign-in
/// Checks credentials and issues a new bearer token
pub async fn sign_in(
    State(state): State<AppState>,
    payload: std::result::Result<Json<SignInRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>> {
    let Json(request) = payload?;
    let (user, token) =
        accounts::sign_in(state.auth.as_ref(), &request.username, &request.password).await?;

    Ok(Json(AuthResponse { user, token }))
}

/// GET /api/auth/me
pub async fn me(Extension(auth): Extension<AuthenticatedUser>) -> Json<User> {
    Json(auth.user)
}

/// POST /api/auth/sign-out
/// Revokes the token and drops the user's review session
pub async fn sign_out(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<SignOutResponse>> {
    let signed_out = state.auth.sign_out(&auth.token).await?;
    state.reviews.remove_user(auth.user.id);

    Ok(Json(SignOutResponse { signed_out }))
}
