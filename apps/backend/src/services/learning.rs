//! Learning flow: queue building, decision recording and statistics.

use chrono::Utc;
use uuid::Uuid;

use wordswipe_core::{
    build_review_queue, CommitResult, DashboardStats, Decision, Result, ReviewSession, User,
    VocabError,
};

use crate::store::{ProgressStore, WordFilter, WordStore};

/// Build a fresh review session for `user` from the current stores.
pub async fn start_session(
    words: &dyn WordStore,
    progress: &dyn ProgressStore,
    user: &User,
) -> Result<ReviewSession> {
    let all_words = words.list_words(WordFilter::all()).await?;
    let records = progress.list_progress(user.id).await?;
    let queue = build_review_queue(&all_words, &records);

    tracing::info!(
        user_id = %user.id,
        total_words = all_words.len(),
        queued = queue.len(),
        "review session started"
    );

    Ok(ReviewSession::new(user.id, queue))
}

/// Record one swipe decision for the current card and advance the session.
///
/// Rejections (wrong user, wrong card, finished session) return `Err` before
/// the store is touched. Otherwise exactly one progress write is issued and
/// its outcome comes back as a [`CommitResult`]; a failed write leaves the
/// session on the same card so the user can retry it.
pub async fn record_decision(
    progress: &dyn ProgressStore,
    session: &mut ReviewSession,
    user: &User,
    word_id: Uuid,
    decision: Decision,
) -> Result<CommitResult> {
    if session.user_id() != user.id {
        return Err(VocabError::NotAuthenticated);
    }
    session.expect_current(word_id)?;

    let outcome = progress
        .upsert_progress(user.id, word_id, decision, Utc::now())
        .await
        .map(|record| record.review_count);

    if let Err(e) = &outcome {
        tracing::error!(user_id = %user.id, word_id = %word_id, error = %e, "failed to record decision");
    }

    Ok(session.commit(outcome))
}

/// Dashboard statistics for `user`.
pub async fn dashboard(
    words: &dyn WordStore,
    progress: &dyn ProgressStore,
    user: &User,
) -> Result<DashboardStats> {
    let all_words = words.list_words(WordFilter::all()).await?;
    let records = progress.list_progress(user.id).await?;
    Ok(DashboardStats::compute(&all_words, &records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::{test_user, MemoryStore};
    use pretty_assertions::assert_eq;
    use wordswipe_core::{SessionState, WordInput};

    async fn setup(n: usize) -> (MemoryStore, User) {
        let store = MemoryStore::new();
        let inputs = (0..n)
            .map(|i| WordInput::default_word(&format!("word{i}"), &format!("kelime{i}")).unwrap())
            .collect();
        store.insert_words(inputs).await.unwrap();
        let user = test_user(&store, "ada").await;
        (store, user)
    }

    #[tokio::test]
    async fn empty_store_gives_complete_session() {
        let (store, user) = setup(0).await;
        let session = start_session(&store, &store, &user).await.unwrap();
        assert_eq!(session.state(), SessionState::Complete);
    }

    #[tokio::test]
    async fn first_decision_creates_record() {
        let (store, user) = setup(2).await;
        let mut session = start_session(&store, &store, &user).await.unwrap();
        let word_id = session.current().unwrap().id;

        let result = record_decision(&store, &mut session, &user, word_id, Decision::Unknown)
            .await
            .unwrap();

        assert_eq!(result, CommitResult::Committed { review_count: 1 });
        let record = store.get_progress(user.id, word_id).await.unwrap().unwrap();
        assert!(!record.is_known);
        assert_eq!(session.state(), SessionState::Reviewing { index: 1 });
        assert_eq!(store.progress_writes(), 1);
    }

    #[tokio::test]
    async fn repeat_decision_increments_count() {
        let (store, user) = setup(1).await;

        let mut session = start_session(&store, &store, &user).await.unwrap();
        let word_id = session.current().unwrap().id;
        record_decision(&store, &mut session, &user, word_id, Decision::Unknown)
            .await
            .unwrap();

        // unknown words come back in the next session
        let mut session = start_session(&store, &store, &user).await.unwrap();
        assert_eq!(session.current().map(|w| w.id), Some(word_id));
        let result = record_decision(&store, &mut session, &user, word_id, Decision::Known)
            .await
            .unwrap();

        assert_eq!(result, CommitResult::Committed { review_count: 2 });
        let record = store.get_progress(user.id, word_id).await.unwrap().unwrap();
        assert!(record.is_known);

        let session = start_session(&store, &store, &user).await.unwrap();
        assert!(session.is_complete());
    }

    #[tokio::test]
    async fn known_swipe_on_last_card_completes() {
        let (store, user) = setup(1).await;
        let mut session = start_session(&store, &store, &user).await.unwrap();
        assert_eq!(session.state(), SessionState::Reviewing { index: 0 });
        let word_id = session.current().unwrap().id;

        record_decision(&store, &mut session, &user, word_id, Decision::Known)
            .await
            .unwrap();

        assert_eq!(session.state(), SessionState::Complete);
    }

    #[tokio::test]
    async fn write_failure_keeps_cursor() {
        let (store, user) = setup(3).await;
        let mut session = start_session(&store, &store, &user).await.unwrap();
        let word_id = session.current().unwrap().id;

        store.set_fail_writes(true);
        let result = record_decision(&store, &mut session, &user, word_id, Decision::Known)
            .await
            .unwrap();

        assert!(matches!(
            result,
            CommitResult::Failed { ref reason, .. } if reason == "store_write_failure"
        ));
        assert_eq!(session.state(), SessionState::Reviewing { index: 0 });
        assert_eq!(store.progress_writes(), 1);

        // retry of the same card succeeds once the store recovers
        store.set_fail_writes(false);
        let result = record_decision(&store, &mut session, &user, word_id, Decision::Known)
            .await
            .unwrap();
        assert_eq!(result, CommitResult::Committed { review_count: 1 });
        assert_eq!(session.state(), SessionState::Reviewing { index: 1 });
    }

    #[tokio::test]
    async fn rejected_decisions_never_touch_the_store() {
        let (store, user) = setup(2).await;
        let mut session = start_session(&store, &store, &user).await.unwrap();
        let second = session.queue()[1].id;

        let err = record_decision(&store, &mut session, &user, second, Decision::Known)
            .await
            .unwrap_err();
        assert!(matches!(err, VocabError::Validation(_)));

        let stranger = test_user(&store, "stranger").await;
        let current = session.current().unwrap().id;
        let err = record_decision(&store, &mut session, &stranger, current, Decision::Known)
            .await
            .unwrap_err();
        assert_eq!(err, VocabError::NotAuthenticated);

        assert_eq!(store.progress_writes(), 0);
    }

    #[tokio::test]
    async fn read_failure_surfaces_on_start() {
        let (store, user) = setup(2).await;
        store.set_fail_reads(true);
        let err = start_session(&store, &store, &user).await.unwrap_err();
        assert!(matches!(err, VocabError::StoreRead(_)));
    }

    #[tokio::test]
    async fn dashboard_reflects_decisions() {
        let (store, user) = setup(4).await;
        let mut session = start_session(&store, &store, &user).await.unwrap();
        for decision in [Decision::Known, Decision::Unknown] {
            let word_id = session.current().unwrap().id;
            record_decision(&store, &mut session, &user, word_id, decision)
                .await
                .unwrap();
        }

        let stats = dashboard(&store, &store, &user).await.unwrap();
        assert_eq!(stats.total_words, 4);
        assert_eq!(stats.known_words, 1);
        assert_eq!(stats.unknown_words, 1);
        assert_eq!(stats.not_reviewed, 2);
        assert_eq!(stats.percent_complete, 25);
        assert_eq!(stats.recent.len(), 2);
    }
}
