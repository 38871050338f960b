use std::sync::Arc;

use log::error;
use uuid::Uuid;
use warp::{http::StatusCode, reply, Filter, Rejection, Reply};

use crate::dashboard::aggregator::DashboardAggregator;
use crate::error_handling::types::ServiceError;
use crate::kau_finalization::kau_finalizer::KauFinalizer;
use crate::session_management::session_manager::{CreateSessionRequest, SessionManager};
use crate::submission_processing::submission_processor::{SubmissionProcessor, SubmitRequest};
use crate::web_interface::types::*;

/// Maps a flow error to its HTTP response at the boundary.
///
/// User-correctable errors carry their message; backend failures surface as a
/// short generic message and are logged with detail here.
pub(crate) fn error_reply(context: &str, err: &ServiceError) -> warp::reply::Response {
    let (status, message) = match err {
        ServiceError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
        ServiceError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
        ServiceError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
        other => {
            error!("{} failed: {}", context, other);
            (StatusCode::INTERNAL_SERVER_ERROR, context.to_string())
        }
    };
    reply::with_status(reply::json(&ApiError { error: message }), status).into_response()
}

/// GET /health
pub fn health_route() -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .and_then(|| async move {
            Ok::<_, Rejection>(reply::json(&HealthResponse {
                status: "ok".into(),
                message: "closetheloop is running".into(),
            }))
        })
}

/// POST /sessions
pub fn create_session_route(
    session_manager: Arc<SessionManager>,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    warp::path("sessions")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::json())
        .and_then(move |body: CreateSessionBody| {
            let session_manager = session_manager.clone();
            async move {
                let request = CreateSessionRequest {
                    session_id: body.session_id,
                    title: body.title,
                    file_base64: body.file_base64,
                    file_type: body.file_type,
                    is_professor: body.is_professor,
                };
                match session_manager.create_session(request).await {
                    Ok(created) => {
                        let res = reply::with_status(
                            reply::json(&CreateSessionResponse {
                                session: created.session,
                                suggested_kaus: created.suggested_kaus,
                            }),
                            StatusCode::OK,
                        )
                        .into_response();
                        Ok::<_, Rejection>(res)
                    }
                    Err(e) => Ok::<_, Rejection>(error_reply("Failed to create session", &e)),
                }
            }
        })
}

/// PUT /kaus/:sessionId/finalize
pub fn finalize_kaus_route(
    kau_finalizer: Arc<KauFinalizer>,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    warp::path!("kaus" / String / "finalize")
        .and(warp::put())
        .and(warp::body::json())
        .and_then(move |session_code: String, body: FinalizeBody| {
            let kau_finalizer = kau_finalizer.clone();
            async move {
                match kau_finalizer
                    .finalize(&session_code, &body.kau_categories)
                    .await
                {
                    Ok(()) => {
                        let res = reply::with_status(
                            reply::json(&MessageResponse {
                                message: "KAUs finalized successfully".into(),
                            }),
                            StatusCode::OK,
                        )
                        .into_response();
                        Ok::<_, Rejection>(res)
                    }
                    Err(e) => Ok::<_, Rejection>(error_reply("Failed to finalize KAUs", &e)),
                }
            }
        })
}

/// POST /submissions
pub fn submit_route(
    submission_processor: Arc<SubmissionProcessor>,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    warp::path("submissions")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::json())
        .and_then(move |body: SubmitBody| {
            let submission_processor = submission_processor.clone();
            async move {
                let request = SubmitRequest {
                    session_id: body.session_id,
                    student_placeholder: body.student_placeholder,
                    filename: body.filename,
                    file_base64: body.file_base64,
                };
                match submission_processor.submit(request).await {
                    Ok(processed) => {
                        let res = reply::with_status(
                            reply::json(&SubmitResponse {
                                submission_id: processed.submission_id,
                                feedback: FeedbackBody::from(&processed.feedback),
                            }),
                            StatusCode::OK,
                        )
                        .into_response();
                        Ok::<_, Rejection>(res)
                    }
                    Err(e) => Ok::<_, Rejection>(error_reply("Failed to process submission", &e)),
                }
            }
        })
}

/// GET /submissions/:id/feedback
pub fn get_feedback_route(
    submission_processor: Arc<SubmissionProcessor>,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    warp::path!("submissions" / String / "feedback")
        .and(warp::get())
        .and_then(move |id_str: String| {
            let submission_processor = submission_processor.clone();
            async move {
                let id = match Uuid::parse_str(&id_str) {
                    Ok(u) => u,
                    Err(_) => {
                        let res = reply::with_status(
                            reply::json(&ApiError {
                                error: "Feedback not found".into(),
                            }),
                            StatusCode::NOT_FOUND,
                        )
                        .into_response();
                        return Ok::<_, Rejection>(res);
                    }
                };
                match submission_processor.feedback(id).await {
                    Ok(feedback) => {
                        let res = reply::with_status(
                            reply::json(&FeedbackBody::from(&feedback)),
                            StatusCode::OK,
                        )
                        .into_response();
                        Ok::<_, Rejection>(res)
                    }
                    Err(e) => Ok::<_, Rejection>(error_reply("Failed to fetch feedback", &e)),
                }
            }
        })
}

/// GET /sessions/:sessionId
pub fn dashboard_route(
    dashboard: Arc<DashboardAggregator>,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    warp::path!("sessions" / String)
        .and(warp::get())
        .and_then(move |session_code: String| {
            let dashboard = dashboard.clone();
            async move {
                match dashboard.fetch(&session_code).await {
                    Ok(view) => {
                        let res = reply::with_status(
                            reply::json(&DashboardResponse {
                                session: SessionWithKaus {
                                    session: view.session,
                                    kaus: view.kaus,
                                },
                                submissions_count: view.submissions_count,
                                top_gaps: view.top_gaps,
                                suggestions: view.suggestions,
                            }),
                            StatusCode::OK,
                        )
                        .into_response();
                        Ok::<_, Rejection>(res)
                    }
                    Err(e) => Ok::<_, Rejection>(error_reply("Failed to fetch dashboard", &e)),
                }
            }
        })
}
