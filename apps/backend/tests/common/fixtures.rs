//! Request bodies for integration tests.

use serde_json::{json, Value};
use uuid::Uuid;

/// Password used for every test account.
pub const PASSWORD: &str = "swipe-right";

/// A username no other test has taken.
pub fn unique_username() -> String {
    format!("user-{}", Uuid::new_v4().simple())
}

pub fn register_request(username: &str, password: &str) -> Value {
    json!({
        "username": username,
        "password": password,
    })
}

pub fn sign_in_request(username: &str, password: &str) -> Value {
    json!({
        "username": username,
        "password": password,
    })
}

pub fn add_word_request(source: &str, target: &str) -> Value {
    json!({
        "source_text": source,
        "target_text": target,
    })
}

pub fn decision_request(word_id: &str, decision: &str) -> Value {
    json!({
        "word_id": word_id,
        "decision": decision,
    })
}

/// Word pairs with a per-test suffix so shared databases do not collide.
pub fn word_pairs(count: usize, tag: &str) -> Vec<(String, String)> {
    (0..count)
        .map(|i| (format!("word{}-{}", i, tag), format!("kelime{}-{}", i, tag)))
        .collect()
}
