//! Storage and identity collaborators.
//!
//! Routes and services only talk to these traits. [`crate::db::Database`]
//! backs them with PostgreSQL; [`memory::MemoryStore`] keeps everything in
//! process for local runs and tests.

pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use wordswipe_core::{Decision, ProgressRecord, Result, User, Word, WordInput};

/// Which words to list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordScope {
    All,
    Defaults,
    CreatedBy(Uuid),
}

/// Listing order by creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordOrder {
    OldestFirst,
    NewestFirst,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordFilter {
    pub scope: WordScope,
    pub order: WordOrder,
}

impl WordFilter {
    /// Every word, oldest first. This is the order review queues are built from.
    pub fn all() -> Self {
        Self {
            scope: WordScope::All,
            order: WordOrder::OldestFirst,
        }
    }

    pub fn newest_first(mut self) -> Self {
        self.order = WordOrder::NewestFirst;
        self
    }

    pub fn defaults() -> Self {
        Self {
            scope: WordScope::Defaults,
            order: WordOrder::OldestFirst,
        }
    }

    pub fn created_by(user_id: Uuid) -> Self {
        Self {
            scope: WordScope::CreatedBy(user_id),
            order: WordOrder::OldestFirst,
        }
    }

    pub fn matches(&self, word: &Word) -> bool {
        match self.scope {
            WordScope::All => true,
            WordScope::Defaults => word.is_default,
            WordScope::CreatedBy(user_id) => word.created_by == Some(user_id),
        }
    }
}

/// Word persistence.
#[async_trait]
pub trait WordStore: Send + Sync {
    async fn list_words(&self, filter: WordFilter) -> Result<Vec<Word>>;

    /// Insert all words or none of them.
    async fn insert_words(&self, words: Vec<WordInput>) -> Result<Vec<Word>>;
}

/// Per-user progress persistence.
#[async_trait]
pub trait ProgressStore: Send + Sync {
    async fn get_progress(&self, user_id: Uuid, word_id: Uuid) -> Result<Option<ProgressRecord>>;

    async fn list_progress(&self, user_id: Uuid) -> Result<Vec<ProgressRecord>>;

    /// Record a decision in one atomic write keyed by (user, word).
    ///
    /// Creates the record with `review_count = 1` or bumps the existing count.
    async fn upsert_progress(
        &self,
        user_id: Uuid,
        word_id: Uuid,
        decision: Decision,
        now: DateTime<Utc>,
    ) -> Result<ProgressRecord>;
}

/// A user to create. The password arrives already hashed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub username: String,
    pub password_hash: String,
}

/// Bearer-token identity.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Create a user and return it with a freshly issued token.
    ///
    /// Usernames are unique ignoring case; a taken name is a validation error.
    async fn register(&self, account: NewAccount) -> Result<(User, String)>;

    /// The user with this username (ignoring case) and its password hash.
    async fn find_account(&self, username: &str) -> Result<Option<(User, String)>>;

    /// Issue another token for an existing user.
    async fn issue_token(&self, user_id: Uuid) -> Result<String>;

    async fn current_user(&self, token: &str) -> Result<Option<User>>;

    /// Revoke a token. Returns whether it was live.
    async fn sign_out(&self, token: &str) -> Result<bool>;
}
