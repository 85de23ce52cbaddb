//! Database models and API types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// Re-export shared types from wordswipe-core
pub use wordswipe_core::{
    CommitResult, DashboardStats, Decision, ProgressRecord, ReviewSession, SessionState, User,
    Word, WordWithProgress,
};

// === Database Entity Types ===

/// User row
#[derive(Debug, Clone, FromRow)]
pub struct DbUser {
    pub id: Uuid,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

impl From<DbUser> for User {
    fn from(row: DbUser) -> Self {
        User {
            id: row.id,
            username: row.username,
            created_at: row.created_at,
        }
    }
}

/// Account row with its password hash
#[derive(Debug, Clone, FromRow)]
pub struct DbAccount {
    #[sqlx(flatten)]
    pub user: DbUser,
    pub password_hash: String,
}

/// Word row
#[derive(Debug, Clone, FromRow)]
pub struct DbWord {
    pub id: Uuid,
    pub source_text: String,
    pub target_text: String,
    pub is_default: bool,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<DbWord> for Word {
    fn from(row: DbWord) -> Self {
        Word {
            id: row.id,
            source_text: row.source_text,
            target_text: row.target_text,
            is_default: row.is_default,
            created_by: row.created_by,
            created_at: row.created_at,
        }
    }
}

/// Progress row
#[derive(Debug, Clone, FromRow)]
pub struct DbProgress {
    pub id: Uuid,
    pub user_id: Uuid,
    pub word_id: Uuid,
    pub is_known: bool,
    pub last_reviewed: DateTime<Utc>,
    pub review_count: i32,
}

impl From<DbProgress> for ProgressRecord {
    fn from(row: DbProgress) -> Self {
        ProgressRecord {
            id: row.id,
            user_id: row.user_id,
            word_id: row.word_id,
            is_known: row.is_known,
            last_reviewed: row.last_reviewed,
            review_count: row.review_count,
        }
    }
}

// === API Request/Response Types ===

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SignInRequest {
    pub username: String,
    pub password: String,
}

/// Returned by register and sign-in
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SignOutResponse {
    pub signed_out: bool,
}

// Word types
#[derive(Debug, Serialize, Deserialize)]
pub struct AddWordRequest {
    pub source_text: String,
    pub target_text: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct WordListQuery {
    #[serde(default)]
    pub mine: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WordListResponse {
    pub total: usize,
    pub words: Vec<WordWithProgress>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SeedResponse {
    pub inserted: usize,
    pub message: String,
}

// Learn types
#[derive(Debug, Serialize, Deserialize)]
pub struct DecisionRequest {
    pub word_id: Uuid,
    pub decision: Decision,
}

/// Client view of a review session
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionView {
    pub session_id: Uuid,
    pub complete: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<Word>,
    pub remaining: usize,
    pub total: usize,
}

impl SessionView {
    pub fn of(session: &ReviewSession) -> Self {
        let position = match session.state() {
            SessionState::Reviewing { index } => Some(index),
            SessionState::Complete => None,
        };
        Self {
            session_id: session.id(),
            complete: session.is_complete(),
            position,
            current: session.current().cloned(),
            remaining: session.remaining(),
            total: session.len(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DecisionResponse {
    pub commit: CommitResult,
    pub session: SessionView,
}
