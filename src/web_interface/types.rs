use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::storage::remarks;
use crate::storage::types::{Feedback, Kau, Session, SuggestedKau};

/// API error payload
#[derive(Serialize)]
pub struct ApiError {
    pub error: String,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionBody {
    pub session_id: String,
    pub title: String,
    #[serde(default)]
    pub file_base64: Option<String>,
    #[serde(default)]
    pub file_type: Option<String>,
    #[serde(default)]
    pub is_professor: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionResponse {
    pub session: Session,
    pub suggested_kaus: Vec<SuggestedKau>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalizeBody {
    pub kau_categories: Vec<String>,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitBody {
    pub session_id: String,
    #[serde(default)]
    pub student_placeholder: Option<String>,
    pub filename: String,
    pub file_base64: String,
}

/// Feedback as it travels on the wire: the four remark lists re-encoded as
/// semicolon-joined strings (the original frontend contract).
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackBody {
    pub submission_id: Uuid,
    pub highlights: String,
    pub missing_points: String,
    pub reflective_questions: String,
    pub prescriptive_suggestions: String,
}

impl From<&Feedback> for FeedbackBody {
    fn from(feedback: &Feedback) -> Self {
        Self {
            submission_id: feedback.submission_id,
            highlights: remarks::encode(&feedback.highlights),
            missing_points: remarks::encode(&feedback.missing_points),
            reflective_questions: remarks::encode(&feedback.reflective_questions),
            prescriptive_suggestions: remarks::encode(&feedback.prescriptive_suggestions),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub submission_id: Uuid,
    pub feedback: FeedbackBody,
}

#[derive(Serialize)]
pub struct SessionWithKaus {
    #[serde(flatten)]
    pub session: Session,
    pub kaus: Vec<Kau>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub session: SessionWithKaus,
    pub submissions_count: usize,
    pub top_gaps: Vec<(String, u64)>,
    pub suggestions: Vec<String>,
}
