use std::sync::Arc;

use log::info;

use crate::error_handling::types::ServiceError;
use crate::storage::storage_trait::Storage;

/// Marks a subset of a session's KAUs as finalized, selected by exact
/// category match. Categories with no matching KAU are silently ignored, and
/// re-finalizing the same set is a no-op state-wise.
pub struct KauFinalizer {
    storage: Arc<dyn Storage>,
}

impl KauFinalizer {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub async fn finalize(
        &self,
        session_code: &str,
        categories: &[String],
    ) -> Result<(), ServiceError> {
        let session = self
            .storage
            .find_session(session_code)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Session not found".into()))?;
        let changed = self.storage.finalize_kaus(session.id, categories).await?;
        info!(
            "Finalized {} KAU(s) for session {} ({} requested)",
            changed,
            session_code,
            categories.len()
        );
        Ok(())
    }
}
