use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::Utc;
use log::info;
use uuid::Uuid;

use crate::error_handling::types::{GenerationError, ServiceError};
use crate::generation::client::GenerationService;
use crate::generation::prompts;
use crate::session_management::extract;
use crate::storage::storage_trait::Storage;
use crate::storage::types::{Session, SuggestedKau};

/// Upper bound on suggested KAUs kept from a generation response.
const MAX_SUGGESTED_KAUS: usize = 10;

/// Inputs for session creation, as received at the web boundary.
#[derive(Debug, Clone)]
pub struct CreateSessionRequest {
    pub session_id: String,
    pub title: String,
    pub file_base64: Option<String>,
    pub file_type: Option<String>,
    pub is_professor: bool,
}

#[derive(Debug, Clone)]
pub struct CreatedSession {
    pub session: Session,
    pub suggested_kaus: Vec<SuggestedKau>,
}

/// The structure related to session management
///
/// Creates a learning session from an uploaded document: extracts the
/// document text, asks the generation service for suggested KAUs, and
/// persists the session together with the suggestions in one transaction.
pub struct SessionManager {
    storage: Arc<dyn Storage>,
    generation: Arc<dyn GenerationService>,
}

impl SessionManager {
    pub fn new(storage: Arc<dyn Storage>, generation: Arc<dyn GenerationService>) -> Self {
        Self {
            storage,
            generation,
        }
    }

    pub async fn create_session(
        &self,
        request: CreateSessionRequest,
    ) -> Result<CreatedSession, ServiceError> {
        let session_code = request.session_id.trim();
        let title = request.title.trim();
        if session_code.is_empty() || title.is_empty() {
            return Err(ServiceError::Validation(
                "Session ID and title required".into(),
            ));
        }
        if !request.is_professor {
            return Err(ServiceError::Forbidden(
                "Only professors can create sessions".into(),
            ));
        }

        let document_text = match &request.file_base64 {
            Some(encoded) => {
                let bytes = BASE64.decode(encoded.as_bytes()).map_err(|_| {
                    ServiceError::Validation("fileBase64 is not valid base64".into())
                })?;
                extract::document_text(&bytes, request.file_type.as_deref())
            }
            None => String::new(),
        };

        let raw = self
            .generation
            .generate(prompts::kau_request(&document_text))
            .await?;
        let suggested_kaus = parse_suggested_kaus(&raw)?;

        let session = Session {
            id: Uuid::new_v4(),
            session_id: session_code.to_string(),
            title: title.to_string(),
            document_path: None,
            created_at: Utc::now(),
        };
        self.storage
            .create_session_with_kaus(&session, &suggested_kaus)
            .await?;
        info!(
            "Created session {} with {} suggested KAU(s)",
            session.session_id,
            suggested_kaus.len()
        );

        Ok(CreatedSession {
            session,
            suggested_kaus,
        })
    }
}

/// Strict parse of the generation response: a JSON array of
/// `{category, description}`, blank entries dropped, at most
/// `MAX_SUGGESTED_KAUS` kept.
fn parse_suggested_kaus(raw: &str) -> Result<Vec<SuggestedKau>, GenerationError> {
    let mut kaus: Vec<SuggestedKau> = serde_json::from_str(raw.trim())
        .map_err(|e| GenerationError::BadResponse(e.to_string()))?;
    kaus.retain(|k| !k.category.trim().is_empty() && !k.description.trim().is_empty());
    kaus.truncate(MAX_SUGGESTED_KAUS);
    Ok(kaus)
}
