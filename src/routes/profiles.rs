use crate::models::{ImportResponse, MenteeProfile, MentorProfile};
use crate::routes::{csv_response, error_response, repository_error, AppState};
use crate::services::{csv_io, CsvError, ImportOutcome, Record, Repository};
use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use serde::Serialize;
use validator::Validate;

/// Configure mentor and mentee record routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/mentors", web::post().to(create_mentor))
        .route("/mentors", web::get().to(list_mentors))
        .route("/mentors/import", web::post().to(import_mentors))
        .route("/mentors/export", web::get().to(export_mentors))
        .route("/mentors/{id}", web::get().to(get_mentor))
        .route("/mentors/{id}", web::delete().to(delete_mentor))
        .route("/mentees", web::post().to(create_mentee))
        .route("/mentees", web::get().to(list_mentees))
        .route("/mentees/import", web::post().to(import_mentees))
        .route("/mentees/export", web::get().to(export_mentees))
        .route("/mentees/{id}", web::get().to(get_mentee))
        .route("/mentees/{id}", web::delete().to(delete_mentee));
}

fn create_record<T>(repo: &dyn Repository<T>, record: T) -> HttpResponse
where
    T: Record + Serialize + Validate,
{
    if let Err(errors) = record.validate() {
        tracing::info!("Validation failed for new record: field_errors={:?}", errors);
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", errors);
    }

    match repo.create(record) {
        Ok(created) => {
            tracing::info!("Created record {}", created.id());
            HttpResponse::Created().json(created)
        }
        Err(e) => repository_error(e),
    }
}

fn list_records<T: Record + Serialize>(repo: &dyn Repository<T>) -> HttpResponse {
    match repo.list() {
        Ok(records) => HttpResponse::Ok().json(records),
        Err(e) => repository_error(e),
    }
}

fn get_record<T: Record + Serialize>(repo: &dyn Repository<T>, id: &str) -> HttpResponse {
    match repo.get(id) {
        Ok(record) => HttpResponse::Ok().json(record),
        Err(e) => repository_error(e),
    }
}

fn delete_record<T: Record>(repo: &dyn Repository<T>, id: &str) -> HttpResponse {
    match repo.delete(id) {
        Ok(()) => {
            tracing::info!("Deleted record {}", id);
            HttpResponse::NoContent().finish()
        }
        Err(e) => repository_error(e),
    }
}

fn store_import<T: Record>(
    repo: &dyn Repository<T>,
    parsed: Result<ImportOutcome<T>, CsvError>,
) -> HttpResponse {
    let outcome = match parsed {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::info!("Rejected CSV import: {}", e);
            return error_response(StatusCode::BAD_REQUEST, "Invalid CSV", e);
        }
    };

    let skipped = outcome.skipped;
    match repo.create_many(outcome.records) {
        Ok(created) => {
            tracing::info!("Imported {} records ({} skipped)", created.len(), skipped);
            HttpResponse::Ok().json(ImportResponse {
                imported: created.len(),
                skipped,
            })
        }
        Err(e) => repository_error(e),
    }
}

fn export_records<T: Record>(
    repo: &dyn Repository<T>,
    filename: &str,
    write: fn(&[T]) -> Result<Vec<u8>, CsvError>,
) -> HttpResponse {
    let records = match repo.list() {
        Ok(records) => records,
        Err(e) => return repository_error(e),
    };

    match write(&records) {
        Ok(body) => csv_response(filename, body),
        Err(e) => {
            tracing::error!("Failed to export {}: {}", filename, e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Export failed", e)
        }
    }
}

/// POST /api/v1/mentors
async fn create_mentor(state: web::Data<AppState>, req: web::Json<MentorProfile>) -> impl Responder {
    create_record(state.mentors.as_ref(), req.into_inner())
}

/// GET /api/v1/mentors
async fn list_mentors(state: web::Data<AppState>) -> impl Responder {
    list_records(state.mentors.as_ref())
}

/// GET /api/v1/mentors/{id}
async fn get_mentor(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    get_record(state.mentors.as_ref(), &path)
}

/// DELETE /api/v1/mentors/{id}
async fn delete_mentor(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    delete_record(state.mentors.as_ref(), &path)
}

/// POST /api/v1/mentors/import
///
/// Body is CSV text with the mentor spreadsheet headers.
async fn import_mentors(state: web::Data<AppState>, body: String) -> impl Responder {
    store_import(state.mentors.as_ref(), csv_io::import_mentors(body.as_bytes()))
}

/// GET /api/v1/mentors/export
async fn export_mentors(state: web::Data<AppState>) -> impl Responder {
    export_records(state.mentors.as_ref(), "mentors.csv", csv_io::export_mentors)
}

/// POST /api/v1/mentees
async fn create_mentee(state: web::Data<AppState>, req: web::Json<MenteeProfile>) -> impl Responder {
    create_record(state.mentees.as_ref(), req.into_inner())
}

/// GET /api/v1/mentees
async fn list_mentees(state: web::Data<AppState>) -> impl Responder {
    list_records(state.mentees.as_ref())
}

/// GET /api/v1/mentees/{id}
async fn get_mentee(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    get_record(state.mentees.as_ref(), &path)
}

/// DELETE /api/v1/mentees/{id}
async fn delete_mentee(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    delete_record(state.mentees.as_ref(), &path)
}

/// POST /api/v1/mentees/import
async fn import_mentees(state: web::Data<AppState>, body: String) -> impl Responder {
    store_import(state.mentees.as_ref(), csv_io::import_mentees(body.as_bytes()))
}

/// GET /api/v1/mentees/export
async fn export_mentees(state: web::Data<AppState>) -> impl Responder {
    export_records(state.mentees.as_ref(), "mentees.csv", csv_io::export_mentees)
}
