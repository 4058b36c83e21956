// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{MatchRecord, MatchStatus, MenteeProfile, MentorProfile, ScoreTier, ScoredCandidate, TagSet};
pub use requests::{MatchListQuery, RunMatchingRequest, UpdateMatchRequest};
pub use responses::{
    ApproveMatchResponse, CandidateView, ErrorResponse, HealthResponse, ImportResponse, RankedGroup,
    RunMatchingResponse,
};
