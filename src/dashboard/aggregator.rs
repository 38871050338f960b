use std::collections::HashMap;
use std::sync::Arc;

use log::debug;

use crate::error_handling::types::ServiceError;
use crate::storage::storage_trait::Storage;
use crate::storage::types::{Feedback, Kau, Session};

const MAX_TOP_GAPS: usize = 10;
const REMEDIATION_PREFIX: &str = "Reinforce: ";

/// Aggregated class view for one session.
#[derive(Debug, Clone)]
pub struct DashboardView {
    pub session: Session,
    pub kaus: Vec<Kau>,
    /// Number of feedback rows examined; submissions that never received
    /// feedback (e.g. after a generation failure) are not counted.
    pub submissions_count: usize,
    pub top_gaps: Vec<(String, u64)>,
    pub suggestions: Vec<String>,
}

pub struct DashboardAggregator {
    storage: Arc<dyn Storage>,
}

impl DashboardAggregator {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub async fn fetch(&self, session_code: &str) -> Result<DashboardView, ServiceError> {
        let session = self
            .storage
            .find_session(session_code)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Session not found".into()))?;
        let kaus = self.storage.session_kaus(session.id).await?;
        let feedback = self.storage.session_feedback(session.id).await?;

        let top_gaps = top_gaps(&feedback);
        let suggestions = top_gaps
            .iter()
            .map(|(phrase, _)| format!("{}{}", REMEDIATION_PREFIX, phrase))
            .collect();
        debug!(
            "Dashboard for {}: {} feedback row(s), {} gap(s)",
            session_code,
            feedback.len(),
            top_gaps.len()
        );

        Ok(DashboardView {
            session,
            kaus,
            submissions_count: feedback.len(),
            top_gaps,
            suggestions,
        })
    }
}

/// Tallies missing-point phrases by exact string (no normalization beyond the
/// trimming done by remark decoding; case and punctuation variants count
/// separately). Returns at most `MAX_TOP_GAPS` entries, descending by count,
/// ties broken by first-encounter order.
fn top_gaps(feedback: &[Feedback]) -> Vec<(String, u64)> {
    let mut counts: HashMap<&str, u64> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();
    for fb in feedback {
        for phrase in &fb.missing_points {
            let count = counts.entry(phrase.as_str()).or_insert(0);
            if *count == 0 {
                order.push(phrase.as_str());
            }
            *count += 1;
        }
    }
    let mut gaps: Vec<(String, u64)> = order
        .into_iter()
        .map(|phrase| (phrase.to_owned(), counts[phrase]))
        .collect();
    // stable sort keeps encounter order within equal counts
    gaps.sort_by(|a, b| b.1.cmp(&a.1));
    gaps.truncate(MAX_TOP_GAPS);
    gaps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::database_storage::DatabaseStorage;
    use crate::storage::remarks;
    use crate::storage::types::{Submission, SuggestedKau};
    use chrono::Utc;
    use tempfile::TempDir;
    use uuid::Uuid;

    fn feedback(missing_points: &str) -> Feedback {
        Feedback {
            submission_id: Uuid::new_v4(),
            highlights: vec![],
            missing_points: remarks::decode(missing_points),
            reflective_questions: vec![],
            prescriptive_suggestions: vec![],
        }
    }

    #[test]
    fn test_single_feedback_tally() {
        let gaps = top_gaps(&[feedback("A; B ;A")]);
        assert_eq!(gaps, vec![("A".to_string(), 2), ("B".to_string(), 1)]);
    }

    #[test]
    fn test_ties_keep_encounter_order() {
        let gaps = top_gaps(&[feedback("beta; alpha"), feedback("alpha; beta; gamma")]);
        // beta and alpha both count 2; beta was seen first
        assert_eq!(
            gaps,
            vec![
                ("beta".to_string(), 2),
                ("alpha".to_string(), 2),
                ("gamma".to_string(), 1)
            ]
        );
    }

    #[test]
    fn test_case_variants_count_separately() {
        let gaps = top_gaps(&[feedback("Entropy; entropy; Entropy")]);
        assert_eq!(
            gaps,
            vec![("Entropy".to_string(), 2), ("entropy".to_string(), 1)]
        );
    }

    #[test]
    fn test_at_most_ten_gaps() {
        let encoded = (0..15).map(|i| format!("gap {}", i)).collect::<Vec<_>>();
        let gaps = top_gaps(&[feedback(&encoded.join("; "))]);
        assert_eq!(gaps.len(), 10);
        assert_eq!(gaps[0].0, "gap 0");
    }

    #[test]
    fn test_empty_feedback_set() {
        assert!(top_gaps(&[]).is_empty());
    }

    async fn seeded_storage() -> (Arc<DatabaseStorage>, Session) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("test.sqlite3");
        Box::leak(Box::new(dir));
        let storage = Arc::new(DatabaseStorage::new_file(path).await.unwrap());
        let session = Session {
            id: Uuid::new_v4(),
            session_id: "CHEM101".into(),
            title: "Thermo".into(),
            document_path: None,
            created_at: Utc::now(),
        };
        storage
            .create_session_with_kaus(
                &session,
                &[SuggestedKau {
                    category: "Knowledge: Heat".into(),
                    description: "d".into(),
                }],
            )
            .await
            .unwrap();
        (storage, session)
    }

    async fn add_submission(
        storage: &DatabaseStorage,
        session: &Session,
        missing_points: Option<&str>,
    ) {
        let sub = Submission {
            id: Uuid::new_v4(),
            session_id: session.id,
            student_placeholder: "Anonymous".into(),
            filename: "a.txt".into(),
            file_path: format!("submissions/CHEM101/{}-a.txt", Uuid::new_v4()),
            created_at: Utc::now(),
        };
        storage.insert_submission(&sub).await.unwrap();
        if let Some(points) = missing_points {
            storage
                .insert_feedback(&Feedback {
                    submission_id: sub.id,
                    highlights: vec![],
                    missing_points: remarks::decode(points),
                    reflective_questions: vec![],
                    prescriptive_suggestions: vec![],
                })
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn test_fetch_counts_feedback_not_submissions() {
        let (storage, session) = seeded_storage().await;
        add_submission(&storage, &session, Some("entropy; enthalpy")).await;
        add_submission(&storage, &session, Some("entropy")).await;
        add_submission(&storage, &session, None).await; // no feedback

        let aggregator = DashboardAggregator::new(storage);
        let view = aggregator.fetch("CHEM101").await.unwrap();
        assert_eq!(view.submissions_count, 2);
        assert_eq!(view.top_gaps[0], ("entropy".to_string(), 2));
        assert_eq!(view.suggestions[0], "Reinforce: entropy");
        assert_eq!(view.kaus.len(), 1);
        assert_eq!(view.session.session_id, "CHEM101");
    }

    #[tokio::test]
    async fn test_fetch_unknown_session() {
        let (storage, _session) = seeded_storage().await;
        let aggregator = DashboardAggregator::new(storage);
        let err = aggregator.fetch("GHOST101").await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }
}
