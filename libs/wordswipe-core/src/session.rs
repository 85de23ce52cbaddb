//! Review session: a cursor over a queue fixed at session start.
//!
//! ```text
//! reviewing(i) --commit ok, i+1 < len--> reviewing(i+1)
//! reviewing(i) --commit ok, i+1 == len--> complete
//! reviewing(i) --commit failed--------> reviewing(i)
//! empty queue at start ---------------> complete
//! ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, VocabError};
use crate::types::Word;

/// Where a session currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionState {
    Reviewing { index: usize },
    Complete,
}

/// Outcome of recording one decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum CommitResult {
    Committed { review_count: i32 },
    Failed { reason: String, message: String },
}

impl CommitResult {
    pub fn failed(error: &VocabError) -> Self {
        Self::Failed {
            reason: error.kind().to_string(),
            message: error.to_string(),
        }
    }

    pub fn is_committed(&self) -> bool {
        matches!(self, Self::Committed { .. })
    }
}

/// Per-user review session owned by the caller.
#[derive(Debug, Clone)]
pub struct ReviewSession {
    id: Uuid,
    user_id: Uuid,
    queue: Vec<Word>,
    state: SessionState,
}

impl ReviewSession {
    pub fn new(user_id: Uuid, queue: Vec<Word>) -> Self {
        let state = if queue.is_empty() {
            SessionState::Complete
        } else {
            SessionState::Reviewing { index: 0 }
        };
        Self {
            id: Uuid::new_v4(),
            user_id,
            queue,
            state,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn queue(&self) -> &[Word] {
        &self.queue
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.state == SessionState::Complete
    }

    /// The card on screen, if any.
    pub fn current(&self) -> Option<&Word> {
        match self.state {
            SessionState::Reviewing { index } => self.queue.get(index),
            SessionState::Complete => None,
        }
    }

    /// Cards left including the current one.
    pub fn remaining(&self) -> usize {
        match self.state {
            SessionState::Reviewing { index } => self.queue.len() - index,
            SessionState::Complete => 0,
        }
    }

    /// Check that a decision targets the current card before anything is written.
    pub fn expect_current(&self, word_id: Uuid) -> Result<&Word> {
        let current = self
            .current()
            .ok_or_else(|| VocabError::Validation("review session is complete".to_string()))?;
        if current.id != word_id {
            return Err(VocabError::Validation(format!(
                "word {word_id} is not the current card"
            )));
        }
        Ok(current)
    }

    /// Fold the store outcome of a decision into the session.
    ///
    /// The cursor only moves when the write succeeded.
    pub fn commit(&mut self, outcome: Result<i32>) -> CommitResult {
        match outcome {
            Ok(review_count) => {
                self.advance();
                CommitResult::Committed { review_count }
            }
            Err(e) => CommitResult::failed(&e),
        }
    }

    fn advance(&mut self) {
        if let SessionState::Reviewing { index } = self.state {
            self.state = if index + 1 < self.queue.len() {
                SessionState::Reviewing { index: index + 1 }
            } else {
                SessionState::Complete
            };
        }
    }
}
