use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::Utc;
use log::info;
use serde::Deserialize;
use uuid::Uuid;

use crate::error_handling::types::{GenerationError, ServiceError};
use crate::generation::client::GenerationService;
use crate::generation::prompts;
use crate::storage::file_store::FileStore;
use crate::storage::remarks;
use crate::storage::storage_trait::Storage;
use crate::storage::types::{Feedback, Submission};

const ANONYMOUS_PLACEHOLDER: &str = "Anonymous";

/// Inputs for a student submission, as received at the web boundary.
#[derive(Debug, Clone)]
pub struct SubmitRequest {
    pub session_id: String,
    pub student_placeholder: Option<String>,
    pub filename: String,
    pub file_base64: String,
}

#[derive(Debug, Clone)]
pub struct ProcessedSubmission {
    pub submission_id: Uuid,
    pub feedback: Feedback,
}

// The shape the feedback prompt's schema asks the model for: four
// semicolon-delimited strings.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FeedbackDraft {
    highlights: String,
    missing_points: String,
    reflective_questions: String,
    prescriptive_suggestions: String,
}

/// Runs the submit flow: validate the session reference, store the upload,
/// grade it against the finalized KAUs, persist submission and feedback.
///
/// The upload and the submission row are written before the generation call,
/// so a generation failure leaves a submission without feedback; the
/// dashboard only counts submissions that received feedback.
pub struct SubmissionProcessor {
    storage: Arc<dyn Storage>,
    files: Arc<FileStore>,
    generation: Arc<dyn GenerationService>,
}

impl SubmissionProcessor {
    pub fn new(
        storage: Arc<dyn Storage>,
        files: Arc<FileStore>,
        generation: Arc<dyn GenerationService>,
    ) -> Self {
        Self {
            storage,
            files,
            generation,
        }
    }

    pub async fn submit(&self, request: SubmitRequest) -> Result<ProcessedSubmission, ServiceError> {
        let session_code = request.session_id.trim();
        let filename = request.filename.trim();
        if session_code.is_empty() || filename.is_empty() || request.file_base64.is_empty() {
            return Err(ServiceError::Validation(
                "Session ID, filename, and file required".into(),
            ));
        }
        let bytes = BASE64
            .decode(request.file_base64.as_bytes())
            .map_err(|_| ServiceError::Validation("fileBase64 is not valid base64".into()))?;
        if bytes.is_empty() {
            return Err(ServiceError::Validation("Uploaded file is empty".into()));
        }

        let session = self
            .storage
            .find_session(session_code)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Invalid Session ID".into()))?;
        let kaus = self.storage.finalized_kaus(session.id).await?;

        // Lossy for binary formats, matching upload-time extraction policy.
        let submission_text = String::from_utf8_lossy(&bytes).into_owned();

        // Timestamped path so repeated uploads of the same filename never
        // collide; the store rejects duplicates rather than overwrite.
        let file_path = format!(
            "submissions/{}/{}-{}",
            session_code,
            Utc::now().timestamp_millis(),
            filename
        );
        self.files.put(&file_path, &bytes)?;

        let submission = Submission {
            id: Uuid::new_v4(),
            session_id: session.id,
            student_placeholder: placeholder_or_anonymous(request.student_placeholder),
            filename: filename.to_string(),
            file_path,
            created_at: Utc::now(),
        };
        self.storage.insert_submission(&submission).await?;

        let raw = self
            .generation
            .generate(prompts::feedback_request(&kaus, &submission_text))
            .await?;
        let feedback = parse_feedback(submission.id, &raw)?;
        self.storage.insert_feedback(&feedback).await?;
        info!(
            "Processed submission {} for session {}",
            submission.id, session_code
        );

        Ok(ProcessedSubmission {
            submission_id: submission.id,
            feedback,
        })
    }

    /// Looks up the stored feedback for a submission.
    pub async fn feedback(&self, submission_id: Uuid) -> Result<Feedback, ServiceError> {
        self.storage
            .find_feedback(submission_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Feedback not found".into()))
    }
}

fn placeholder_or_anonymous(placeholder: Option<String>) -> String {
    placeholder
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| ANONYMOUS_PLACEHOLDER.into())
}

/// Strict parse of the generation response into the four remark lists.
fn parse_feedback(submission_id: Uuid, raw: &str) -> Result<Feedback, GenerationError> {
    let draft: FeedbackDraft = serde_json::from_str(raw.trim())
        .map_err(|e| GenerationError::BadResponse(e.to_string()))?;
    Ok(Feedback {
        submission_id,
        highlights: remarks::decode(&draft.highlights),
        missing_points: remarks::decode(&draft.missing_points),
        reflective_questions: remarks::decode(&draft.reflective_questions),
        prescriptive_suggestions: remarks::decode(&draft.prescriptive_suggestions),
    })
}
