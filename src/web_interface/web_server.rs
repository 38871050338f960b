use std::net::SocketAddr;
use std::sync::Arc;

use log::info;
use warp::{Filter, Rejection, Reply};

use crate::dashboard::aggregator::DashboardAggregator;
use crate::generation::client::GenerationService;
use crate::kau_finalization::kau_finalizer::KauFinalizer;
use crate::session_management::session_manager::SessionManager;
use crate::storage::file_store::FileStore;
use crate::storage::storage_trait::Storage;
use crate::submission_processing::submission_processor::SubmissionProcessor;
use crate::web_interface::routes;

/// Web server for the HTTP API
pub struct WebServer {
    session_manager: Arc<SessionManager>,
    kau_finalizer: Arc<KauFinalizer>,
    submission_processor: Arc<SubmissionProcessor>,
    dashboard: Arc<DashboardAggregator>,
}

impl WebServer {
    /// Create a new WebServer instance wiring the four flows onto shared
    /// storage and generation backends.
    pub fn new(
        storage: Arc<dyn Storage>,
        files: Arc<FileStore>,
        generation: Arc<dyn GenerationService>,
    ) -> Self {
        Self {
            session_manager: Arc::new(SessionManager::new(storage.clone(), generation.clone())),
            kau_finalizer: Arc::new(KauFinalizer::new(storage.clone())),
            submission_processor: Arc::new(SubmissionProcessor::new(
                storage.clone(),
                files,
                generation,
            )),
            dashboard: Arc::new(DashboardAggregator::new(storage)),
        }
    }

    /// The composed route tree, exposed separately so tests can drive it
    /// without binding a socket.
    pub fn routes(&self) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
        routes::health_route()
            .or(routes::create_session_route(self.session_manager.clone()))
            .or(routes::finalize_kaus_route(self.kau_finalizer.clone()))
            .or(routes::submit_route(self.submission_processor.clone()))
            .or(routes::get_feedback_route(self.submission_processor.clone()))
            .or(routes::dashboard_route(self.dashboard.clone()))
    }

    /// Start the web server on the given port
    pub async fn start(&self, port: u16) {
        let routes = self.routes();
        let addr: SocketAddr = ([0, 0, 0, 0], port).into();
        info!("Web server listening on {}", addr);
        warp::serve(routes).run(addr).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_handling::types::GenerationError;
    use crate::generation::client::GenerationRequest;
    use crate::storage::database_storage::DatabaseStorage;
    use async_trait::async_trait;
    use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
    use tempfile::TempDir;

    struct StubGeneration {
        reply: String,
    }

    #[async_trait]
    impl GenerationService for StubGeneration {
        async fn generate(&self, _request: GenerationRequest) -> Result<String, GenerationError> {
            Ok(self.reply.clone())
        }
    }

    async fn server(reply: &str) -> WebServer {
        let dir = TempDir::new().unwrap();
        let db_path = dir.path().join("test.sqlite3");
        let files_dir = dir.path().join("files");
        Box::leak(Box::new(dir));
        let storage = Arc::new(DatabaseStorage::new_file(db_path).await.unwrap());
        let files = Arc::new(FileStore::new(files_dir).unwrap());
        let generation = Arc::new(StubGeneration {
            reply: reply.into(),
        });
        WebServer::new(storage, files, generation)
    }

    const KAU_REPLY: &str =
        r#"[{"category":"Knowledge: Heat","description":"recall heat transfer"}]"#;
    const FEEDBACK_REPLY: &str = r#"{
        "highlights": "clear structure",
        "missingPoints": "entropy; enthalpy",
        "reflectiveQuestions": "what if T doubles?",
        "prescriptiveSuggestions": "pair work"
    }"#;

    fn create_session_body(session_id: &str, is_professor: bool) -> serde_json::Value {
        serde_json::json!({
            "sessionId": session_id,
            "title": "Thermo",
            "isProfessor": is_professor,
        })
    }

    #[tokio::test]
    async fn test_health() {
        let server = server(KAU_REPLY).await;
        let res = warp::test::request()
            .method("GET")
            .path("/health")
            .reply(&server.routes())
            .await;
        assert_eq!(res.status(), 200);
        let body: serde_json::Value = serde_json::from_slice(res.body()).unwrap();
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_create_session_roundtrip() {
        let server = server(KAU_REPLY).await;
        let routes = server.routes();

        let res = warp::test::request()
            .method("POST")
            .path("/sessions")
            .json(&create_session_body("CHEM101", true))
            .reply(&routes)
            .await;
        assert_eq!(res.status(), 200);
        let body: serde_json::Value = serde_json::from_slice(res.body()).unwrap();
        assert_eq!(body["session"]["sessionId"], "CHEM101");
        assert_eq!(body["suggestedKaus"][0]["category"], "Knowledge: Heat");

        // dashboard shows the session with its (unfinalized) KAUs
        let res = warp::test::request()
            .method("GET")
            .path("/sessions/CHEM101")
            .reply(&routes)
            .await;
        assert_eq!(res.status(), 200);
        let body: serde_json::Value = serde_json::from_slice(res.body()).unwrap();
        assert_eq!(body["submissionsCount"], 0);
        assert_eq!(body["session"]["kaus"][0]["finalized"], false);
    }

    #[tokio::test]
    async fn test_create_session_requires_professor() {
        let server = server(KAU_REPLY).await;
        let res = warp::test::request()
            .method("POST")
            .path("/sessions")
            .json(&create_session_body("CHEM101", false))
            .reply(&server.routes())
            .await;
        assert_eq!(res.status(), 403);
    }

    #[tokio::test]
    async fn test_create_session_missing_fields() {
        let server = server(KAU_REPLY).await;
        let res = warp::test::request()
            .method("POST")
            .path("/sessions")
            .json(&serde_json::json!({"sessionId": "", "title": "Thermo", "isProfessor": true}))
            .reply(&server.routes())
            .await;
        assert_eq!(res.status(), 400);
    }

    #[tokio::test]
    async fn test_finalize_flow() {
        let server = server(KAU_REPLY).await;
        let routes = server.routes();
        warp::test::request()
            .method("POST")
            .path("/sessions")
            .json(&create_session_body("CHEM101", true))
            .reply(&routes)
            .await;

        let res = warp::test::request()
            .method("PUT")
            .path("/kaus/CHEM101/finalize")
            .json(&serde_json::json!({"kauCategories": ["Knowledge: Heat"]}))
            .reply(&routes)
            .await;
        assert_eq!(res.status(), 200);

        let res = warp::test::request()
            .method("PUT")
            .path("/kaus/GHOST101/finalize")
            .json(&serde_json::json!({"kauCategories": ["Knowledge: Heat"]}))
            .reply(&routes)
            .await;
        assert_eq!(res.status(), 404);

        // non-array body shape is rejected before the handler runs
        let res = warp::test::request()
            .method("PUT")
            .path("/kaus/CHEM101/finalize")
            .json(&serde_json::json!({"kauCategories": "Knowledge: Heat"}))
            .reply(&routes)
            .await;
        assert_eq!(res.status(), 400);
    }

    // Answers KAU prompts and feedback prompts differently, so one stub can
    // drive the whole lifecycle.
    struct RoutingStub;

    #[async_trait]
    impl GenerationService for RoutingStub {
        async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError> {
            if request.prompt.contains("extract 5-10 Key Areas") {
                Ok(KAU_REPLY.into())
            } else {
                Ok(FEEDBACK_REPLY.into())
            }
        }
    }

    #[tokio::test]
    async fn test_full_lifecycle() {
        let dir = TempDir::new().unwrap();
        let db_path = dir.path().join("test.sqlite3");
        let files_dir = dir.path().join("files");
        Box::leak(Box::new(dir));
        let storage = Arc::new(DatabaseStorage::new_file(db_path).await.unwrap());
        let files = Arc::new(FileStore::new(files_dir).unwrap());
        let server = WebServer::new(storage, files, Arc::new(RoutingStub));
        let routes = server.routes();

        warp::test::request()
            .method("POST")
            .path("/sessions")
            .json(&create_session_body("CHEM101", true))
            .reply(&routes)
            .await;
        warp::test::request()
            .method("PUT")
            .path("/kaus/CHEM101/finalize")
            .json(&serde_json::json!({"kauCategories": ["Knowledge: Heat"]}))
            .reply(&routes)
            .await;

        let res = warp::test::request()
            .method("POST")
            .path("/submissions")
            .json(&serde_json::json!({
                "sessionId": "CHEM101",
                "filename": "essay.txt",
                "fileBase64": BASE64.encode(b"heat flows"),
            }))
            .reply(&routes)
            .await;
        assert_eq!(res.status(), 200);
        let body: serde_json::Value = serde_json::from_slice(res.body()).unwrap();
        let submission_id = body["submissionId"].as_str().unwrap().to_string();
        assert_eq!(body["feedback"]["missingPoints"], "entropy; enthalpy");

        let res = warp::test::request()
            .method("GET")
            .path(&format!("/submissions/{}/feedback", submission_id))
            .reply(&routes)
            .await;
        assert_eq!(res.status(), 200);

        let res = warp::test::request()
            .method("GET")
            .path("/sessions/CHEM101")
            .reply(&routes)
            .await;
        assert_eq!(res.status(), 200);
        let body: serde_json::Value = serde_json::from_slice(res.body()).unwrap();
        assert_eq!(body["submissionsCount"], 1);
        assert_eq!(body["topGaps"][0][0], "entropy");
        assert_eq!(body["suggestions"][0], "Reinforce: entropy");
    }

    #[tokio::test]
    async fn test_submit_to_unknown_session_is_404() {
        let server = server(FEEDBACK_REPLY).await;
        let res = warp::test::request()
            .method("POST")
            .path("/submissions")
            .json(&serde_json::json!({
                "sessionId": "GHOST101",
                "filename": "essay.txt",
                "fileBase64": BASE64.encode(b"text"),
            }))
            .reply(&server.routes())
            .await;
        assert_eq!(res.status(), 404);
    }

    #[tokio::test]
    async fn test_feedback_lookup_not_found() {
        let server = server(KAU_REPLY).await;
        let routes = server.routes();

        // malformed id and unknown id both read as absent
        let res = warp::test::request()
            .method("GET")
            .path("/submissions/not-a-uuid/feedback")
            .reply(&routes)
            .await;
        assert_eq!(res.status(), 404);

        let res = warp::test::request()
            .method("GET")
            .path(&format!(
                "/submissions/{}/feedback",
                uuid::Uuid::new_v4()
            ))
            .reply(&routes)
            .await;
        assert_eq!(res.status(), 404);
    }
}
