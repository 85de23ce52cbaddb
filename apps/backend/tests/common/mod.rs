//! Common test utilities for integration tests.
//!
//! [`TestContext::new`] runs the router against the in-memory store, so most
//! tests need nothing external. [`TestContext::with_database`] uses
//! PostgreSQL and requires DATABASE_URL to be set.

#![allow(dead_code)]

pub mod fixtures;

use std::sync::Arc;

use axum::http::{header::AUTHORIZATION, HeaderName};
use axum::Router;
use axum_test::TestServer;
use serde_json::Value;
use uuid::Uuid;

use wordswipe_backend::db::Database;
use wordswipe_backend::store::memory::MemoryStore;
use wordswipe_backend::{router, AppState};

/// Test context holding the store behind the router.
pub struct TestContext {
    pub memory: Option<Arc<MemoryStore>>,
    pub db: Option<Arc<Database>>,
    app: Router,
}

impl TestContext {
    /// Create a test context backed by the in-memory store.
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let app = router(AppState::from_store(store.clone()));

        Self {
            memory: Some(store),
            db: None,
            app,
        }
    }

    /// Create a test context backed by PostgreSQL.
    ///
    /// # Panics
    /// Panics if DATABASE_URL is not set or database connection fails.
    pub async fn with_database() -> Self {
        dotenvy::dotenv().ok();

        let database_url =
            std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for integration tests");

        let db = Database::connect(&database_url, 5)
            .await
            .expect("Failed to connect to test database");

        db.run_migrations()
            .await
            .expect("Failed to run migrations");

        let db = Arc::new(db);
        let app = router(AppState::from_store(db.clone()));

        Self {
            memory: None,
            db: Some(db),
            app,
        }
    }

    /// Get the router for use with axum-test.
    pub fn router(&self) -> Router {
        self.app.clone()
    }

    pub fn server(&self) -> TestServer {
        TestServer::new(self.router()).expect("Failed to start test server")
    }

    /// The in-memory store, for failure injection.
    pub fn store(&self) -> &MemoryStore {
        self.memory
            .as_deref()
            .expect("context is not backed by the memory store")
    }

    /// Format authorization header value.
    pub fn auth_header_value(token: &str) -> String {
        format!("Bearer {}", token)
    }

    /// Remove everything a test user created.
    pub async fn cleanup_user(&self, user_id: Uuid) {
        let Some(db) = &self.db else { return };

        // Delete in order due to foreign keys
        let _ = sqlx::query("DELETE FROM user_progress WHERE user_id = $1")
            .bind(user_id)
            .execute(db.pool())
            .await;

        let _ = sqlx::query("DELETE FROM words WHERE created_by = $1")
            .bind(user_id)
            .execute(db.pool())
            .await;

        let _ = sqlx::query("DELETE FROM auth_sessions WHERE user_id = $1")
            .bind(user_id)
            .execute(db.pool())
            .await;

        let _ = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(db.pool())
            .await;
    }
}

/// Register a user through the API, returning its id and token.
pub async fn register(server: &TestServer) -> (Uuid, String) {
    register_as(server, &fixtures::unique_username()).await
}

/// Register a user with a chosen username and the shared test password.
pub async fn register_as(server: &TestServer, username: &str) -> (Uuid, String) {
    let response = server
        .post("/api/auth/register")
        .json(&fixtures::register_request(username, fixtures::PASSWORD))
        .await;
    response.assert_status_ok();
    user_and_token(&response.json())
}

/// Sign in through the API, returning the user id and the new token.
pub async fn sign_in(server: &TestServer, username: &str, password: &str) -> (Uuid, String) {
    let response = server
        .post("/api/auth/sign-in")
        .json(&fixtures::sign_in_request(username, password))
        .await;
    response.assert_status_ok();
    user_and_token(&response.json())
}

fn user_and_token(body: &Value) -> (Uuid, String) {
    let user_id = body["user"]["id"]
        .as_str()
        .and_then(|id| Uuid::parse_str(id).ok())
        .expect("auth response has a user id");
    let token = body["token"].as_str().expect("token").to_string();
    (user_id, token)
}

/// Header pair for an authenticated request.
pub fn auth(token: &str) -> (HeaderName, String) {
    (AUTHORIZATION, TestContext::auth_header_value(token))
}

/// Add a word through the API and return its id.
pub async fn add_word(server: &TestServer, token: &str, source: &str, target: &str) -> Uuid {
    let (name, value) = auth(token);
    let response = server
        .post("/api/words")
        .add_header(name, value)
        .json(&fixtures::add_word_request(source, target))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);

    let body: Value = response.json();
    body["id"]
        .as_str()
        .and_then(|id| Uuid::parse_str(id).ok())
        .expect("word response has an id")
}

/// Start a review session, returning the session body.
pub async fn start_session(server: &TestServer, token: &str) -> Value {
    let (name, value) = auth(token);
    let response = server
        .post("/api/learn/sessions")
        .add_header(name, value)
        .await;
    response.assert_status_ok();
    response.json()
}

/// Submit a decision for a card.
pub async fn decide(
    server: &TestServer,
    token: &str,
    session_id: &str,
    word_id: &str,
    decision: &str,
) -> axum_test::TestResponse {
    let (name, value) = auth(token);
    server
        .post(&format!("/api/learn/sessions/{}/decision", session_id))
        .add_header(name, value)
        .json(&fixtures::decision_request(word_id, decision))
        .await
}
