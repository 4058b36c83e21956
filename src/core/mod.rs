// Core algorithm exports
pub mod ranker;
pub mod scoring;
pub mod similarity;

pub use ranker::{apply_min_score, group_by_mentee, MenteeCandidates, RankError, Ranker};
pub use scoring::{score_pair, PairScore, ScoreBreakdown, ScoringWeights};
pub use similarity::{
    formats_compatible, languages_share_one, tag_overlap, timezones_compatible,
    timezones_compatible_with, TimezonePolicy,
};
