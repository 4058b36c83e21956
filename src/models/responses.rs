use crate::core::MenteeCandidates;
use crate::models::domain::{MatchRecord, ScoreTier, ScoredCandidate};
use serde::{Deserialize, Serialize};

/// Candidate as returned to the presentation layer
#[derive(Debug, Clone, Serialize)]
pub struct CandidateView {
    #[serde(flatten)]
    pub candidate: ScoredCandidate,
    pub tier: ScoreTier,
}

/// Ranked candidates of a single mentee
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedGroup {
    pub mentee_id: String,
    pub mentee_name: String,
    pub candidates: Vec<CandidateView>,
}

impl From<MenteeCandidates> for RankedGroup {
    fn from(group: MenteeCandidates) -> Self {
        Self {
            mentee_id: group.mentee_id,
            mentee_name: group.mentee_name,
            candidates: group
                .candidates
                .into_iter()
                .map(|candidate| CandidateView {
                    tier: candidate.tier(),
                    candidate,
                })
                .collect(),
        }
    }
}

/// Response for the run matching endpoint
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunMatchingResponse {
    pub groups: Vec<RankedGroup>,
    pub total_candidates: usize,
    pub mentors_considered: usize,
    pub mentees_considered: usize,
    pub top_n: usize,
    pub min_score: f64,
}

/// Response for approving a candidate
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApproveMatchResponse {
    #[serde(rename = "match")]
    pub record: MatchRecord,
    pub notification_queued: bool,
}

/// Response for a CSV import
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportResponse {
    pub imported: usize,
    pub skipped: usize,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
