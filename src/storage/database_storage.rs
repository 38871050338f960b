use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use log::error;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Sqlite,
};
use uuid::Uuid;

use crate::error_handling::types::StorageError;
use crate::storage::remarks;
use crate::storage::storage_trait::Storage;
use crate::storage::types::{Feedback, Kau, Session, Submission, SuggestedKau};

// Internal row mappings to avoid manual try_get

#[derive(Debug, sqlx::FromRow)]
struct SessionRow {
    id: String,
    session_id: String,
    title: String,
    document_path: Option<String>,
    created_at: String,
}

impl SessionRow {
    fn into_session(self) -> Result<Session, StorageError> {
        Ok(Session {
            id: Uuid::parse_str(&self.id).map_err(|_| StorageError::ReadFailed)?,
            session_id: self.session_id,
            title: self.title,
            document_path: self.document_path,
            created_at: DateTime::parse_from_rfc3339(&self.created_at)
                .map_err(|_| StorageError::ReadFailed)?
                .with_timezone(&Utc),
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct KauRow {
    session_id: String,
    category: String,
    description: String,
    finalized: i64,
}

impl KauRow {
    fn into_kau(self) -> Result<Kau, StorageError> {
        Ok(Kau {
            session_id: Uuid::parse_str(&self.session_id).map_err(|_| StorageError::ReadFailed)?,
            category: self.category,
            description: self.description,
            finalized: self.finalized != 0,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct FeedbackRow {
    submission_id: String,
    highlights: String,
    missing_points: String,
    reflective_questions: String,
    prescriptive_suggestions: String,
}

impl FeedbackRow {
    fn into_feedback(self) -> Result<Feedback, StorageError> {
        Ok(Feedback {
            submission_id: Uuid::parse_str(&self.submission_id)
                .map_err(|_| StorageError::ReadFailed)?,
            highlights: remarks::decode(&self.highlights),
            missing_points: remarks::decode(&self.missing_points),
            reflective_questions: remarks::decode(&self.reflective_questions),
            prescriptive_suggestions: remarks::decode(&self.prescriptive_suggestions),
        })
    }
}

fn write_error(e: sqlx::Error) -> StorageError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => StorageError::Conflict,
        _ => {
            error!("Database write failed: {}", e);
            StorageError::WriteFailed
        }
    }
}

pub struct DatabaseStorage {
    pool: Pool<Sqlite>,
}

impl DatabaseStorage {
    /// Create or open the database file, running schema setup on the way.
    pub async fn new_file<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let path_ref = path.as_ref();
        if let Some(parent) = path_ref.parent() {
            std::fs::create_dir_all(parent).map_err(|_| StorageError::WriteFailed)?;
        }
        let opts = SqliteConnectOptions::from_str("sqlite://")
            .map_err(|_| StorageError::ConnectionFailed)?
            .filename(path_ref)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .map_err(|_| StorageError::ConnectionFailed)?;
        // ensure foreign keys
        sqlx::query("PRAGMA foreign_keys = ON;")
            .execute(&pool)
            .await
            .map_err(|_| StorageError::WriteFailed)?;
        // create schema
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS sessions (
                id TEXT PRIMARY KEY,
                session_id TEXT NOT NULL UNIQUE,
                title TEXT NOT NULL,
                document_path TEXT,
                created_at TEXT NOT NULL
            );",
        )
        .execute(&pool)
        .await
        .map_err(|_| StorageError::WriteFailed)?;
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS kaus (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                session_id TEXT NOT NULL,
                category TEXT NOT NULL,
                description TEXT NOT NULL,
                finalized INTEGER NOT NULL DEFAULT 0,
                FOREIGN KEY(session_id) REFERENCES sessions(id) ON DELETE CASCADE
            );",
        )
        .execute(&pool)
        .await
        .map_err(|_| StorageError::WriteFailed)?;
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS submissions (
                id TEXT PRIMARY KEY,
                session_id TEXT NOT NULL,
                student_placeholder TEXT NOT NULL,
                filename TEXT NOT NULL,
                file_path TEXT NOT NULL,
                created_at TEXT NOT NULL,
                FOREIGN KEY(session_id) REFERENCES sessions(id) ON DELETE CASCADE
            );",
        )
        .execute(&pool)
        .await
        .map_err(|_| StorageError::WriteFailed)?;
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS feedback (
                submission_id TEXT PRIMARY KEY,
                highlights TEXT NOT NULL,
                missing_points TEXT NOT NULL,
                reflective_questions TEXT NOT NULL,
                prescriptive_suggestions TEXT NOT NULL,
                FOREIGN KEY(submission_id) REFERENCES submissions(id) ON DELETE CASCADE
            );",
        )
        .execute(&pool)
        .await
        .map_err(|_| StorageError::WriteFailed)?;
        Ok(Self { pool })
    }
}

#[async_trait::async_trait]
impl Storage for DatabaseStorage {
    async fn create_session_with_kaus(
        &self,
        session: &Session,
        kaus: &[SuggestedKau],
    ) -> Result<(), StorageError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|_| StorageError::WriteFailed)?;
        sqlx::query(
            "INSERT INTO sessions (id, session_id, title, document_path, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(session.id.to_string())
        .bind(&session.session_id)
        .bind(&session.title)
        .bind(session.document_path.clone())
        .bind(session.created_at.to_rfc3339())
        .execute(&mut *tx)
        .await
        .map_err(write_error)?;
        for kau in kaus {
            sqlx::query(
                "INSERT INTO kaus (session_id, category, description, finalized)
                 VALUES (?1, ?2, ?3, 0)",
            )
            .bind(session.id.to_string())
            .bind(&kau.category)
            .bind(&kau.description)
            .execute(&mut *tx)
            .await
            .map_err(write_error)?;
        }
        tx.commit().await.map_err(|_| StorageError::WriteFailed)?;
        Ok(())
    }

    async fn find_session(&self, session_code: &str) -> Result<Option<Session>, StorageError> {
        let row: Option<SessionRow> = sqlx::query_as(
            "SELECT id, session_id, title, document_path, created_at FROM sessions
             WHERE session_id = ?1",
        )
        .bind(session_code)
        .fetch_optional(&self.pool)
        .await
        .map_err(|_| StorageError::ReadFailed)?;
        row.map(SessionRow::into_session).transpose()
    }

    async fn session_kaus(&self, session_id: Uuid) -> Result<Vec<Kau>, StorageError> {
        let rows: Vec<KauRow> = sqlx::query_as(
            "SELECT session_id, category, description, finalized FROM kaus
             WHERE session_id = ?1 ORDER BY id ASC",
        )
        .bind(session_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|_| StorageError::ReadFailed)?;
        rows.into_iter().map(KauRow::into_kau).collect()
    }

    async fn finalized_kaus(&self, session_id: Uuid) -> Result<Vec<Kau>, StorageError> {
        let rows: Vec<KauRow> = sqlx::query_as(
            "SELECT session_id, category, description, finalized FROM kaus
             WHERE session_id = ?1 AND finalized = 1 ORDER BY id ASC",
        )
        .bind(session_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|_| StorageError::ReadFailed)?;
        rows.into_iter().map(KauRow::into_kau).collect()
    }

    async fn finalize_kaus(
        &self,
        session_id: Uuid,
        categories: &[String],
    ) -> Result<u64, StorageError> {
        if categories.is_empty() {
            return Ok(0);
        }
        let placeholders = vec!["?"; categories.len()].join(", ");
        let sql = format!(
            "UPDATE kaus SET finalized = 1 WHERE session_id = ? AND category IN ({})",
            placeholders
        );
        let mut q = sqlx::query(&sql).bind(session_id.to_string());
        for category in categories {
            q = q.bind(category);
        }
        let result = q.execute(&self.pool).await.map_err(write_error)?;
        Ok(result.rows_affected())
    }

    async fn insert_submission(&self, submission: &Submission) -> Result<(), StorageError> {
        sqlx::query(
            "INSERT INTO submissions (id, session_id, student_placeholder, filename, file_path, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(submission.id.to_string())
        .bind(submission.session_id.to_string())
        .bind(&submission.student_placeholder)
        .bind(&submission.filename)
        .bind(&submission.file_path)
        .bind(submission.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(write_error)?;
        Ok(())
    }

    async fn insert_feedback(&self, feedback: &Feedback) -> Result<(), StorageError> {
        sqlx::query(
            "INSERT INTO feedback (submission_id, highlights, missing_points, reflective_questions, prescriptive_suggestions)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(feedback.submission_id.to_string())
        .bind(remarks::encode(&feedback.highlights))
        .bind(remarks::encode(&feedback.missing_points))
        .bind(remarks::encode(&feedback.reflective_questions))
        .bind(remarks::encode(&feedback.prescriptive_suggestions))
        .execute(&self.pool)
        .await
        .map_err(write_error)?;
        Ok(())
    }

    async fn find_feedback(&self, submission_id: Uuid) -> Result<Option<Feedback>, StorageError> {
        let row: Option<FeedbackRow> = sqlx::query_as(
            "SELECT submission_id, highlights, missing_points, reflective_questions, prescriptive_suggestions
             FROM feedback WHERE submission_id = ?1",
        )
        .bind(submission_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|_| StorageError::ReadFailed)?;
        row.map(FeedbackRow::into_feedback).transpose()
    }

    async fn session_feedback(&self, session_id: Uuid) -> Result<Vec<Feedback>, StorageError> {
        let rows: Vec<FeedbackRow> = sqlx::query_as(
            "SELECT f.submission_id, f.highlights, f.missing_points, f.reflective_questions, f.prescriptive_suggestions
             FROM feedback f
             JOIN submissions s ON s.id = f.submission_id
             WHERE s.session_id = ?1
             ORDER BY s.created_at ASC, s.id ASC",
        )
        .bind(session_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|_| StorageError::ReadFailed)?;
        rows.into_iter().map(FeedbackRow::into_feedback).collect()
    }
}
