//! Core types for the vocabulary application.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, VocabError};

/// Longest accepted text on either side of a word pair, in characters.
pub const MAX_WORD_LEN: usize = 200;

/// A vocabulary entry: one source/target text pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    pub id: Uuid,
    pub source_text: String,
    pub target_text: String,
    pub is_default: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// A validated word ready to be inserted.
///
/// Only constructible through [`WordInput::user`] and [`WordInput::default_word`],
/// so texts are always trimmed, lowercased and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordInput {
    source_text: String,
    target_text: String,
    is_default: bool,
    created_by: Option<Uuid>,
}

impl WordInput {
    /// A word contributed by a user.
    pub fn user(source: &str, target: &str, created_by: Uuid) -> Result<Self> {
        Ok(Self {
            source_text: normalize_text("source", source)?,
            target_text: normalize_text("target", target)?,
            is_default: false,
            created_by: Some(created_by),
        })
    }

    /// A system-seeded word with no owner.
    pub fn default_word(source: &str, target: &str) -> Result<Self> {
        Ok(Self {
            source_text: normalize_text("source", source)?,
            target_text: normalize_text("target", target)?,
            is_default: true,
            created_by: None,
        })
    }

    pub fn source_text(&self) -> &str {
        &self.source_text
    }

    pub fn target_text(&self) -> &str {
        &self.target_text
    }

    pub fn is_default(&self) -> bool {
        self.is_default
    }

    pub fn created_by(&self) -> Option<Uuid> {
        self.created_by
    }

    /// Materialize into a stored word.
    pub fn into_word(self, id: Uuid, created_at: DateTime<Utc>) -> Word {
        Word {
            id,
            source_text: self.source_text,
            target_text: self.target_text,
            is_default: self.is_default,
            created_by: self.created_by,
            created_at,
        }
    }
}

/// Trim and lowercase a word text, rejecting empty or oversized input.
pub fn normalize_text(field: &str, raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(VocabError::Validation(format!("{field} text must not be empty")));
    }
    if trimmed.chars().count() > MAX_WORD_LEN {
        return Err(VocabError::Validation(format!(
            "{field} text exceeds {MAX_WORD_LEN} characters"
        )));
    }
    Ok(trimmed.to_lowercase())
}

/// Per-user familiarity state for one word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub word_id: Uuid,
    pub is_known: bool,
    pub last_reviewed: DateTime<Utc>,
    pub review_count: i32,
}

impl ProgressRecord {
    /// Apply a decision to an optional existing record.
    ///
    /// A first decision starts the count at 1; later ones overwrite `is_known`
    /// and add one to the count, keeping the record id.
    pub fn apply(
        existing: Option<&ProgressRecord>,
        user_id: Uuid,
        word_id: Uuid,
        decision: Decision,
        now: DateTime<Utc>,
    ) -> Self {
        match existing {
            Some(prev) => Self {
                id: prev.id,
                user_id,
                word_id,
                is_known: decision.is_known(),
                last_reviewed: now,
                review_count: prev.review_count + 1,
            },
            None => Self {
                id: Uuid::new_v4(),
                user_id,
                word_id,
                is_known: decision.is_known(),
                last_reviewed: now,
                review_count: 1,
            },
        }
    }
}

/// Binary swipe judgment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Known,
    Unknown,
}

impl Decision {
    pub fn is_known(self) -> bool {
        matches!(self, Self::Known)
    }
}

/// An authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

pub const MAX_USERNAME_LEN: usize = 64;
pub const MIN_PASSWORD_LEN: usize = 6;
pub const MAX_PASSWORD_LEN: usize = 128;

/// Trim a username and check its length.
pub fn normalize_username(raw: &str) -> Result<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(VocabError::Validation(
            "username must not be empty".to_string(),
        ));
    }
    if name.chars().count() > MAX_USERNAME_LEN {
        return Err(VocabError::Validation(format!(
            "username exceeds {} characters",
            MAX_USERNAME_LEN
        )));
    }
    Ok(name.to_string())
}

/// Passwords are taken as given, only their length is checked.
pub fn validate_password(password: &str) -> Result<()> {
    let len = password.chars().count();
    if len < MIN_PASSWORD_LEN {
        return Err(VocabError::Validation(format!(
            "password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    if len > MAX_PASSWORD_LEN {
        return Err(VocabError::Validation(format!(
            "password exceeds {} characters",
            MAX_PASSWORD_LEN
        )));
    }
    Ok(())
}
