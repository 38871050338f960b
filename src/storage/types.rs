use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One lecture/assignment context: a source document, its KAUs, and all
/// submissions graded against it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: Uuid,
    /// Human-chosen session code (e.g. "CHEM101"), unique across sessions.
    pub session_id: String,
    pub title: String,
    pub document_path: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Key Area of Understanding: a learning concept tied to a session.
///
/// Suggested by the generation service at session creation, finalized by the
/// instructor to become part of the grading rubric.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Kau {
    pub session_id: Uuid,
    pub category: String,
    pub description: String,
    pub finalized: bool,
}

/// The `{category, description}` shape the generation service proposes,
/// before any session is attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestedKau {
    pub category: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: Uuid,
    pub session_id: Uuid,
    pub student_placeholder: String,
    pub filename: String,
    /// Object-store path of the raw uploaded bytes.
    pub file_path: String,
    pub created_at: DateTime<Utc>,
}

/// Generated feedback, 1:1 with its submission.
///
/// The four fields are ordered remark lists in memory; the semicolon-joined
/// single-string encoding lives only at the persistence and wire boundaries
/// (see `storage::remarks`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub submission_id: Uuid,
    pub highlights: Vec<String>,
    pub missing_points: Vec<String>,
    pub reflective_questions: Vec<String>,
    pub prescriptive_suggestions: Vec<String>,
}
