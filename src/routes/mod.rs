// Route exports
pub mod dashboard;
pub mod matches;
pub mod profiles;

use crate::config::MatchingSettings;
use crate::core::Ranker;
use crate::models::{ErrorResponse, MatchRecord, MenteeProfile, MentorProfile};
use crate::services::{InMemoryRepository, NotificationDispatcher, Repository, RepositoryError};
use actix_web::{error, http::StatusCode, web, HttpRequest, HttpResponse};
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub mentors: Arc<dyn Repository<MentorProfile>>,
    pub mentees: Arc<dyn Repository<MenteeProfile>>,
    pub matches: Arc<dyn Repository<MatchRecord>>,
    pub ranker: Ranker,
    pub matching: MatchingSettings,
    pub notifier: NotificationDispatcher,
    pub from_address: String,
}

impl AppState {
    /// State backed by fresh in-memory stores
    pub fn in_memory(
        ranker: Ranker,
        matching: MatchingSettings,
        notifier: NotificationDispatcher,
        from_address: String,
    ) -> Self {
        Self {
            mentors: Arc::new(InMemoryRepository::<MentorProfile>::new()),
            mentees: Arc::new(InMemoryRepository::<MenteeProfile>::new()),
            matches: Arc::new(InMemoryRepository::<MatchRecord>::new()),
            ranker,
            matching,
            notifier,
            from_address,
        }
    }
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(dashboard::configure)
            .configure(profiles::configure)
            .configure(matches::configure),
    );
}

/// Turn malformed JSON bodies into the standard error body
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    let response = error_response(StatusCode::BAD_REQUEST, "invalid_json", format!("Invalid JSON: {}", err));
    error::InternalError::from_response(err, response).into()
}

/// Turn malformed query strings into the standard error body
pub fn handle_query_payload_error(err: error::QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("Query payload error on {}: {}", req.path(), err);
    let response = error_response(StatusCode::BAD_REQUEST, "invalid_query", format!("Invalid query: {}", err));
    error::InternalError::from_response(err, response).into()
}

pub(crate) fn error_response(status: StatusCode, error: &str, message: impl ToString) -> HttpResponse {
    HttpResponse::build(status).json(ErrorResponse {
        error: error.to_string(),
        message: message.to_string(),
        status_code: status.as_u16(),
    })
}

pub(crate) fn repository_error(err: RepositoryError) -> HttpResponse {
    let message = err.to_string();
    match err {
        RepositoryError::NotFound(_) => error_response(StatusCode::NOT_FOUND, "Not found", message),
        RepositoryError::Duplicate(_) => error_response(StatusCode::CONFLICT, "Duplicate id", message),
        RepositoryError::Poisoned => {
            tracing::error!("Record store unavailable: {}", message);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Record store unavailable", message)
        }
    }
}

pub(crate) fn csv_response(filename: &str, body: Vec<u8>) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{}\"", filename),
        ))
        .body(body)
}
