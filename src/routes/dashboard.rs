use crate::models::HealthResponse;
use crate::routes::{error_response, repository_error, AppState};
use crate::services::{compute_stats, export_workbook};
use actix_web::{http::StatusCode, web, HttpResponse, Responder};

const XLSX_CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Configure health, overview and complete export routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/dashboard", web::get().to(dashboard))
        .route("/export", web::get().to(export_all));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let status = if state.mentors.list().is_ok() && state.mentees.list().is_ok() {
        "healthy"
    } else {
        "degraded"
    };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Program overview
///
/// GET /api/v1/dashboard
async fn dashboard(state: web::Data<AppState>) -> impl Responder {
    let mentors = match state.mentors.snapshot() {
        Ok(mentors) => mentors,
        Err(e) => return repository_error(e),
    };
    let mentees = match state.mentees.snapshot() {
        Ok(mentees) => mentees,
        Err(e) => return repository_error(e),
    };
    let matches = match state.matches.snapshot() {
        Ok(matches) => matches,
        Err(e) => return repository_error(e),
    };

    HttpResponse::Ok().json(compute_stats(&mentors, &mentees, &matches))
}

/// Complete export: mentors, mentees and matches in one workbook
///
/// GET /api/v1/export
async fn export_all(state: web::Data<AppState>) -> impl Responder {
    let mentors = match state.mentors.snapshot() {
        Ok(mentors) => mentors,
        Err(e) => return repository_error(e),
    };
    let mentees = match state.mentees.snapshot() {
        Ok(mentees) => mentees,
        Err(e) => return repository_error(e),
    };
    let matches = match state.matches.snapshot() {
        Ok(matches) => matches,
        Err(e) => return repository_error(e),
    };

    let body = match export_workbook(&mentors, &mentees, &matches) {
        Ok(body) => body,
        Err(e) => {
            tracing::error!("Failed to build workbook export: {}", e);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Export failed", e);
        }
    };

    let filename = format!(
        "mentor_matching_export_{}.xlsx",
        chrono::Utc::now().format("%Y%m%d")
    );

    HttpResponse::Ok()
        .content_type(XLSX_CONTENT_TYPE)
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{}\"", filename),
        ))
        .body(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MatchingSettings;
    use crate::core::Ranker;
    use crate::services::NotificationDispatcher;
    use actix_web::{test as actix_test, App};

    fn state() -> AppState {
        AppState::in_memory(
            Ranker::default(),
            MatchingSettings::default(),
            NotificationDispatcher::disabled(),
            "program@example.org".to_string(),
        )
    }

    #[actix_web::test]
    async fn test_health_check_reports_version() {
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(state()))
                .configure(configure),
        )
        .await;

        let req = actix_test::TestRequest::get().uri("/health").to_request();
        let health: HealthResponse = actix_test::call_and_read_body_json(&app, req).await;

        assert_eq!(health.status, "healthy");
        assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
    }

    #[actix_web::test]
    async fn test_export_returns_workbook() {
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(state()))
                .configure(configure),
        )
        .await;

        let req = actix_test::TestRequest::get().uri("/export").to_request();
        let resp = actix_test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get("content-type").and_then(|v| v.to_str().ok()),
            Some(XLSX_CONTENT_TYPE)
        );

        let body = actix_test::read_body(resp).await;
        // xlsx files are zip archives
        assert!(body.starts_with(b"PK"));
    }
}
