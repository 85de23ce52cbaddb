//! In-process store.
//!
//! Every operation takes a single lock, so `upsert_progress` is atomic in the
//! same way the PostgreSQL `ON CONFLICT` write is.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use wordswipe_core::{Decision, ProgressRecord, Result, User, VocabError, Word, WordInput};

use super::{NewAccount, ProgressStore, SessionProvider, WordFilter, WordOrder, WordStore};
use crate::services::auth::{generate_token, hash_token};

#[derive(Default)]
struct Inner {
    /// Insertion order doubles as creation order.
    words: Vec<Word>,
    progress: HashMap<(Uuid, Uuid), ProgressRecord>,
    users: HashMap<Uuid, User>,
    /// user id -> password hash
    passwords: HashMap<Uuid, String>,
    /// token hash -> user id
    tokens: HashMap<String, Uuid>,
}

/// Store that keeps all records in memory.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
    fail_writes: AtomicBool,
    fail_reads: AtomicBool,
    progress_writes: AtomicU32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail until switched off again.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent read fail until switched off again.
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Number of progress writes attempted so far.
    pub fn progress_writes(&self) -> u32 {
        self.progress_writes.load(Ordering::SeqCst)
    }

    fn check_read(&self) -> Result<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(VocabError::StoreRead("memory store reads disabled".to_string()));
        }
        Ok(())
    }

    fn check_write(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(VocabError::StoreWrite("memory store writes disabled".to_string()));
        }
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| VocabError::StoreRead("memory store lock poisoned".to_string()))
    }
}

#[async_trait]
impl WordStore for MemoryStore {
    async fn list_words(&self, filter: WordFilter) -> Result<Vec<Word>> {
        self.check_read()?;
        let inner = self.lock()?;
        let matching = inner.words.iter().filter(|w| filter.matches(w)).cloned();
        Ok(match filter.order {
            WordOrder::OldestFirst => matching.collect(),
            WordOrder::NewestFirst => {
                let mut words: Vec<Word> = matching.collect();
                words.reverse();
                words
            }
        })
    }

    async fn insert_words(&self, words: Vec<WordInput>) -> Result<Vec<Word>> {
        self.check_write()?;
        let mut inner = self.lock()?;
        let now = Utc::now();
        let created: Vec<Word> = words
            .into_iter()
            .map(|input| input.into_word(Uuid::new_v4(), now))
            .collect();
        inner.words.extend(created.iter().cloned());
        Ok(created)
    }
}

#[async_trait]
impl ProgressStore for MemoryStore {
    async fn get_progress(&self, user_id: Uuid, word_id: Uuid) -> Result<Option<ProgressRecord>> {
        self.check_read()?;
        let inner = self.lock()?;
        Ok(inner.progress.get(&(user_id, word_id)).cloned())
    }

    async fn list_progress(&self, user_id: Uuid) -> Result<Vec<ProgressRecord>> {
        self.check_read()?;
        let inner = self.lock()?;
        let mut records: Vec<ProgressRecord> = inner
            .progress
            .values()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect();
        records.sort_by_key(|p| p.last_reviewed);
        Ok(records)
    }

    async fn upsert_progress(
        &self,
        user_id: Uuid,
        word_id: Uuid,
        decision: Decision,
        now: DateTime<Utc>,
    ) -> Result<ProgressRecord> {
        self.progress_writes.fetch_add(1, Ordering::SeqCst);
        self.check_write()?;
        let mut inner = self.lock()?;

        if !inner.words.iter().any(|w| w.id == word_id) {
            return Err(VocabError::StoreWrite(format!("word {word_id} does not exist")));
        }

        let key = (user_id, word_id);
        let record = ProgressRecord::apply(inner.progress.get(&key), user_id, word_id, decision, now);
        inner.progress.insert(key, record.clone());
        Ok(record)
    }
}

#[async_trait]
impl SessionProvider for MemoryStore {
    async fn register(&self, account: NewAccount) -> Result<(User, String)> {
        self.check_write()?;
        let mut inner = self.lock()?;

        let wanted = account.username.to_lowercase();
        if inner
            .users
            .values()
            .any(|u| u.username.to_lowercase() == wanted)
        {
            return Err(VocabError::Validation(
                "username is already taken".to_string(),
            ));
        }

        let user = User {
            id: Uuid::new_v4(),
            username: account.username,
            created_at: Utc::now(),
        };
        let token = generate_token();
        inner.tokens.insert(hash_token(&token), user.id);
        inner.passwords.insert(user.id, account.password_hash);
        inner.users.insert(user.id, user.clone());
        Ok((user, token))
    }

    async fn find_account(&self, username: &str) -> Result<Option<(User, String)>> {
        self.check_read()?;
        let inner = self.lock()?;
        let wanted = username.to_lowercase();
        Ok(inner
            .users
            .values()
            .find(|u| u.username.to_lowercase() == wanted)
            .and_then(|u| {
                inner
                    .passwords
                    .get(&u.id)
                    .map(|hash| (u.clone(), hash.clone()))
            }))
    }

    async fn issue_token(&self, user_id: Uuid) -> Result<String> {
        self.check_write()?;
        let mut inner = self.lock()?;
        if !inner.users.contains_key(&user_id) {
            return Err(VocabError::StoreWrite(format!("user {user_id} does not exist")));
        }
        let token = generate_token();
        inner.tokens.insert(hash_token(&token), user_id);
        Ok(token)
    }

    async fn current_user(&self, token: &str) -> Result<Option<User>> {
        self.check_read()?;
        let inner = self.lock()?;
        Ok(inner
            .tokens
            .get(&hash_token(token))
            .and_then(|id| inner.users.get(id))
            .cloned())
    }

    async fn sign_out(&self, token: &str) -> Result<bool> {
        self.check_write()?;
        let mut inner = self.lock()?;
        Ok(inner.tokens.remove(&hash_token(token)).is_some())
    }
}

/// Register a user directly, skipping password hashing.
#[cfg(test)]
pub(crate) async fn test_user(store: &MemoryStore, username: &str) -> User {
    let (user, _) = store
        .register(NewAccount {
            username: username.to_string(),
            password_hash: "unused".to_string(),
        })
        .await
        .unwrap();
    user
}
