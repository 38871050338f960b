//! Storage Trait
//!
//! This module defines the `Storage` trait, the interface every relational
//! persistence backend implements.
//!
//! Implementors of this trait are responsible for:
//! - Persisting sessions together with their suggested KAUs
//! - Looking up sessions by their human-chosen code
//! - Reading and finalizing a session's KAUs
//! - Persisting submissions and their feedback
//!
//! All methods return a `Result` to handle potential storage errors.

use crate::error_handling::types::StorageError;
use crate::storage::types::{Feedback, Kau, Session, Submission, SuggestedKau};
use async_trait::async_trait;
use uuid::Uuid;

#[async_trait]
pub trait Storage: Send + Sync {
    /// Persists a new session and its suggested KAUs (all `finalized = false`)
    /// in a single transaction, so a KAU insert failure never leaves an
    /// orphan session behind.
    async fn create_session_with_kaus(
        &self,
        session: &Session,
        kaus: &[SuggestedKau],
    ) -> Result<(), StorageError>;

    /// Looks up a session by its human-chosen code. `Ok(None)` when absent.
    async fn find_session(&self, session_code: &str) -> Result<Option<Session>, StorageError>;

    /// All KAUs belonging to a session, in insertion order.
    async fn session_kaus(&self, session_id: Uuid) -> Result<Vec<Kau>, StorageError>;

    /// Only the finalized KAUs of a session, in insertion order.
    async fn finalized_kaus(&self, session_id: Uuid) -> Result<Vec<Kau>, StorageError>;

    /// Sets `finalized = true` on the session's KAUs whose category is in
    /// `categories` (exact match). Categories with no matching KAU are
    /// ignored. Returns the number of rows updated.
    async fn finalize_kaus(
        &self,
        session_id: Uuid,
        categories: &[String],
    ) -> Result<u64, StorageError>;

    /// Persists a submission row.
    async fn insert_submission(&self, submission: &Submission) -> Result<(), StorageError>;

    /// Persists the feedback row for a submission. At most one per submission.
    async fn insert_feedback(&self, feedback: &Feedback) -> Result<(), StorageError>;

    /// Feedback for one submission. `Ok(None)` when absent.
    async fn find_feedback(&self, submission_id: Uuid) -> Result<Option<Feedback>, StorageError>;

    /// Every feedback row reachable through the session's submissions,
    /// ordered by submission creation time.
    async fn session_feedback(&self, session_id: Uuid) -> Result<Vec<Feedback>, StorageError>;
}
