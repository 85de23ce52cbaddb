//! PostgreSQL database operations

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use wordswipe_core::{Decision, ProgressRecord, User, VocabError, Word, WordInput};

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::services::auth::{generate_token, hash_token};
use crate::store::{
    NewAccount, ProgressStore, SessionProvider, WordFilter, WordOrder, WordScope, WordStore,
};

/// Database wrapper with connection pool
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Connect to PostgreSQL and create connection pool
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Run database migrations
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| ApiError::Migration(e.to_string()))?;
        Ok(())
    }

    /// Get the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn read_failure(op: &str, e: sqlx::Error) -> VocabError {
    tracing::error!(operation = op, error = %e, "store read failed");
    VocabError::StoreRead(e.to_string())
}

fn write_failure(op: &str, e: sqlx::Error) -> VocabError {
    tracing::error!(operation = op, error = %e, "store write failed");
    VocabError::StoreWrite(e.to_string())
}

async fn insert_token(
    conn: &mut sqlx::PgConnection,
    token: &str,
    user_id: Uuid,
) -> std::result::Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO auth_sessions (token_hash, user_id)
        VALUES ($1, $2)
        "#,
    )
    .bind(hash_token(token))
    .bind(user_id)
    .execute(conn)
    .await?;
    Ok(())
}

// === Word Repository ===

#[async_trait]
impl WordStore for Database {
    async fn list_words(&self, filter: WordFilter) -> wordswipe_core::Result<Vec<Word>> {
        // seq breaks ties between words inserted in the same transaction
        let order = match filter.order {
            WordOrder::OldestFirst => "ORDER BY created_at ASC, seq ASC",
            WordOrder::NewestFirst => "ORDER BY created_at DESC, seq DESC",
        };
        let select = "SELECT id, source_text, target_text, is_default, created_by, created_at FROM words";

        let rows = match filter.scope {
            WordScope::All => {
                sqlx::query_as::<_, DbWord>(&format!("{select} {order}"))
                    .fetch_all(&self.pool)
                    .await
            }
            WordScope::Defaults => {
                sqlx::query_as::<_, DbWord>(&format!("{select} WHERE is_default {order}"))
                    .fetch_all(&self.pool)
                    .await
            }
            WordScope::CreatedBy(user_id) => {
                sqlx::query_as::<_, DbWord>(&format!("{select} WHERE created_by = $1 {order}"))
                    .bind(user_id)
                    .fetch_all(&self.pool)
                    .await
            }
        }
        .map_err(|e| read_failure("list_words", e))?;

        Ok(rows.into_iter().map(Word::from).collect())
    }

    async fn insert_words(&self, words: Vec<WordInput>) -> wordswipe_core::Result<Vec<Word>> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| write_failure("insert_words", e))?;

        let mut created = Vec::with_capacity(words.len());
        for input in &words {
            let row = sqlx::query_as::<_, DbWord>(
                r#"
                INSERT INTO words (id, source_text, target_text, is_default, created_by)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING id, source_text, target_text, is_default, created_by, created_at
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(input.source_text())
            .bind(input.target_text())
            .bind(input.is_default())
            .bind(input.created_by())
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| write_failure("insert_words", e))?;
            created.push(Word::from(row));
        }

        tx.commit()
            .await
            .map_err(|e| write_failure("insert_words", e))?;

        Ok(created)
    }
}

// === Progress Repository ===

#[async_trait]
impl ProgressStore for Database {
    async fn get_progress(
        &self,
        user_id: Uuid,
        word_id: Uuid,
    ) -> wordswipe_core::Result<Option<ProgressRecord>> {
        let row = sqlx::query_as::<_, DbProgress>(
            r#"
            SELECT id, user_id, word_id, is_known, last_reviewed, review_count
            FROM user_progress
            WHERE user_id = $1 AND word_id = $2
            "#,
        )
        .bind(user_id)
        .bind(word_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| read_failure("get_progress", e))?;

        Ok(row.map(ProgressRecord::from))
    }

    async fn list_progress(&self, user_id: Uuid) -> wordswipe_core::Result<Vec<ProgressRecord>> {
        let rows = sqlx::query_as::<_, DbProgress>(
            r#"
            SELECT id, user_id, word_id, is_known, last_reviewed, review_count
            FROM user_progress
            WHERE user_id = $1
            ORDER BY last_reviewed
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| read_failure("list_progress", e))?;

        Ok(rows.into_iter().map(ProgressRecord::from).collect())
    }

    async fn upsert_progress(
        &self,
        user_id: Uuid,
        word_id: Uuid,
        decision: Decision,
        now: DateTime<Utc>,
    ) -> wordswipe_core::Result<ProgressRecord> {
        let row = sqlx::query_as::<_, DbProgress>(
            r#"
            INSERT INTO user_progress (id, user_id, word_id, is_known, last_reviewed, review_count)
            VALUES ($1, $2, $3, $4, $5, 1)
            ON CONFLICT (user_id, word_id) DO UPDATE SET
                is_known = EXCLUDED.is_known,
                last_reviewed = EXCLUDED.last_reviewed,
                review_count = user_progress.review_count + 1
            RETURNING id, user_id, word_id, is_known, last_reviewed, review_count
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(word_id)
        .bind(decision.is_known())
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_failure("upsert_progress", e))?;

        Ok(ProgressRecord::from(row))
    }
}

// === Session Repository ===

#[async_trait]
impl SessionProvider for Database {
    async fn register(&self, account: NewAccount) -> wordswipe_core::Result<(User, String)> {
        let token = generate_token();
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| write_failure("register", e))?;

        let user = sqlx::query_as::<_, DbUser>(
            r#"
            INSERT INTO users (id, username, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, username, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&account.username)
        .bind(&account.password_hash)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            let taken = e
                .as_database_error()
                .is_some_and(|db| db.is_unique_violation());
            if taken {
                VocabError::Validation("username is already taken".to_string())
            } else {
                write_failure("register", e)
            }
        })?;

        insert_token(&mut tx, &token, user.id)
            .await
            .map_err(|e| write_failure("register", e))?;

        tx.commit()
            .await
            .map_err(|e| write_failure("register", e))?;

        Ok((User::from(user), token))
    }

    async fn find_account(&self, username: &str) -> wordswipe_core::Result<Option<(User, String)>> {
        let row = sqlx::query_as::<_, DbAccount>(
            r#"
            SELECT id, username, created_at, password_hash
            FROM users
            WHERE LOWER(username) = LOWER($1)
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| read_failure("find_account", e))?;

        Ok(row.map(|account| (User::from(account.user), account.password_hash)))
    }

    async fn issue_token(&self, user_id: Uuid) -> wordswipe_core::Result<String> {
        let token = generate_token();
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| write_failure("issue_token", e))?;

        insert_token(&mut conn, &token, user_id)
            .await
            .map_err(|e| write_failure("issue_token", e))?;

        Ok(token)
    }

    async fn current_user(&self, token: &str) -> wordswipe_core::Result<Option<User>> {
        let user = sqlx::query_as::<_, DbUser>(
            r#"
            UPDATE auth_sessions s
            SET last_seen_at = NOW()
            FROM users u
            WHERE s.token_hash = $1 AND u.id = s.user_id
            RETURNING u.id, u.username, u.created_at
            "#,
        )
        .bind(hash_token(token))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| read_failure("current_user", e))?;

        Ok(user.map(User::from))
    }

    async fn sign_out(&self, token: &str) -> wordswipe_core::Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM auth_sessions
            WHERE token_hash = $1
            "#,
        )
        .bind(hash_token(token))
        .execute(&self.pool)
        .await
        .map_err(|e| write_failure("sign_out", e))?;

        Ok(result.rows_affected() > 0)
    }
}
