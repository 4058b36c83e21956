use crate::core::{apply_min_score, group_by_mentee};
use crate::models::{
    ApproveMatchResponse, MatchListQuery, MatchRecord, RankedGroup, RunMatchingRequest,
    RunMatchingResponse, ScoredCandidate, UpdateMatchRequest,
};
use crate::routes::{csv_response, error_response, repository_error, AppState};
use crate::services::{csv_io, Notification};
use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use validator::Validate;

/// Configure matching and match tracking routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/matching/run", web::post().to(run_matching))
        .route("/matches", web::post().to(approve_match))
        .route("/matches", web::get().to(list_matches))
        .route("/matches/export", web::get().to(export_matches))
        .route("/matches/{id}", web::patch().to(update_match));
}

/// Run matching endpoint
///
/// POST /api/v1/matching/run
///
/// Request body:
/// ```json
/// {
///   "topN": 3,
///   "minScore": 40
/// }
/// ```
async fn run_matching(
    state: web::Data<AppState>,
    req: web::Json<RunMatchingRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!(
            "Validation failed for run_matching request: field_errors={:?}, topN={:?}, minScore={:?}",
            errors,
            req.top_n,
            req.min_score
        );
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", errors);
    }

    let top_n = req.top_n.unwrap_or(state.matching.default_top_n);
    if top_n > state.matching.max_top_n {
        return error_response(
            StatusCode::BAD_REQUEST,
            "Validation failed",
            format!("topN must be at most {}", state.matching.max_top_n),
        );
    }
    let min_score = req.min_score.unwrap_or(state.matching.default_min_score);

    let mentors = match state.mentors.snapshot() {
        Ok(mentors) => mentors,
        Err(e) => return repository_error(e),
    };
    let mentees = match state.mentees.snapshot() {
        Ok(mentees) => mentees,
        Err(e) => return repository_error(e),
    };

    tracing::info!(
        "Running matching for {} mentees against {} mentors (topN={}, minScore={})",
        mentees.len(),
        mentors.len(),
        top_n,
        min_score
    );

    let candidates = match state
        .ranker
        .rank_matches(&mentors, &mentees, top_n as usize)
        .and_then(|ranked| apply_min_score(ranked, min_score))
    {
        Ok(candidates) => candidates,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, "Invalid matching parameters", e),
    };

    let response = RunMatchingResponse {
        total_candidates: candidates.len(),
        groups: group_by_mentee(&candidates)
            .into_iter()
            .map(RankedGroup::from)
            .collect(),
        mentors_considered: mentors.len(),
        mentees_considered: mentees.len(),
        top_n: top_n as usize,
        min_score,
    };

    tracing::info!(
        "Returning {} candidates across {} mentees",
        response.total_candidates,
        response.groups.len()
    );

    HttpResponse::Ok().json(response)
}

/// Approve a candidate
///
/// POST /api/v1/matches
///
/// Body is a `ScoredCandidate` as returned by the run endpoint. Creates a
/// `Proposed` match record and queues an introduction to both parties.
async fn approve_match(
    state: web::Data<AppState>,
    req: web::Json<ScoredCandidate>,
) -> impl Responder {
    let candidate = req.into_inner();

    if let Err(e) = state.mentors.get(&candidate.mentor_id) {
        return repository_error(e);
    }
    if let Err(e) = state.mentees.get(&candidate.mentee_id) {
        return repository_error(e);
    }
    if !(0.0..=100.0).contains(&candidate.score) {
        return error_response(
            StatusCode::BAD_REQUEST,
            "Validation failed",
            format!("score must be within [0, 100], got {}", candidate.score),
        );
    }

    let record = match state.matches.create(MatchRecord::proposed(&candidate)) {
        Ok(record) => record,
        Err(e) => return repository_error(e),
    };

    tracing::info!(
        "Match {} created: {} <-> {} (score {:.1})",
        record.match_id,
        candidate.mentee_name,
        candidate.mentor_name,
        record.priority_score
    );

    let notification = Notification::for_approved_match(&record, &candidate, &state.from_address);
    let notification_queued = match state.notifier.dispatch(notification) {
        Ok(queued) => queued,
        Err(e) => {
            // The match stands even if the introduction cannot be queued
            tracing::warn!("Failed to queue notification for match {}: {}", record.match_id, e);
            false
        }
    };

    HttpResponse::Created().json(ApproveMatchResponse {
        record,
        notification_queued,
    })
}

/// List matches
///
/// GET /api/v1/matches?status=Proposed,Active
///
/// Lists open matches when no status is given, every match for `status=all`.
async fn list_matches(
    state: web::Data<AppState>,
    query: web::Query<MatchListQuery>,
) -> impl Responder {
    let statuses = match query.statuses() {
        Ok(statuses) => statuses,
        Err(message) => return error_response(StatusCode::BAD_REQUEST, "Invalid status filter", message),
    };

    match state.matches.list() {
        Ok(records) => {
            let filtered: Vec<MatchRecord> = records
                .into_iter()
                .filter(|r| statuses.contains(&r.status))
                .collect();
            HttpResponse::Ok().json(filtered)
        }
        Err(e) => repository_error(e),
    }
}

/// Update a match
///
/// PATCH /api/v1/matches/{id}
async fn update_match(
    state: web::Data<AppState>,
    path: web::Path<String>,
    req: web::Json<UpdateMatchRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", errors);
    }

    let mut record = match state.matches.get(&path) {
        Ok(record) => record,
        Err(e) => return repository_error(e),
    };

    let update = req.into_inner();
    if let Some(status) = update.status {
        tracing::info!("Match {}: {} -> {}", record.match_id, record.status, status);
        record.set_status(status, chrono::Utc::now().date_naive());
    }
    if update.start_date.is_some() {
        record.start_date = update.start_date;
    }
    if update.session1.is_some() {
        record.session1 = update.session1;
    }
    if update.session2.is_some() {
        record.session2 = update.session2;
    }
    if update.session3.is_some() {
        record.session3 = update.session3;
    }
    if update.mentee_satisfaction.is_some() {
        record.mentee_satisfaction = update.mentee_satisfaction;
    }
    if update.mentor_satisfaction.is_some() {
        record.mentor_satisfaction = update.mentor_satisfaction;
    }
    if update.outcome.is_some() {
        record.outcome = update.outcome;
    }
    if update.converted_to_mentor.is_some() {
        record.converted_to_mentor = update.converted_to_mentor;
    }
    if update.lpoc.is_some() {
        record.lpoc = update.lpoc;
    }

    match state.matches.update(record) {
        Ok(updated) => HttpResponse::Ok().json(updated),
        Err(e) => repository_error(e),
    }
}

/// GET /api/v1/matches/export
async fn export_matches(state: web::Data<AppState>) -> impl Responder {
    let records = match state.matches.list() {
        Ok(records) => records,
        Err(e) => return repository_error(e),
    };

    match csv_io::export_matches(&records) {
        Ok(body) => csv_response("matches.csv", body),
        Err(e) => {
            tracing::error!("Failed to export matches: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Export failed", e)
        }
    }
}
