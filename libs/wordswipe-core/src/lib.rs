//! Core vocabulary library shared by the backend and its stores.
//!
//! Provides:
//! - Review queue selection (unseen words first, then words marked unknown)
//! - Review session cursor and commit outcomes
//! - Validated word input and progress bookkeeping
//! - Dashboard statistics and default word seeding

pub mod catalogue;
pub mod error;
pub mod selection;
pub mod session;
pub mod stats;
pub mod types;

pub use catalogue::{missing_defaults, DefaultWord};
pub use error::{Result, VocabError};
pub use selection::build_review_queue;
pub use session::{CommitResult, ReviewSession, SessionState};
pub use stats::{annotate_words, DashboardStats, RecentReview, WordWithProgress};
pub use types::{Decision, ProgressRecord, User, Word, WordInput};
