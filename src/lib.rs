//! Mentor Match - mentor/mentee pairing service
//!
//! Scores every mentor against every mentee on sector and expertise overlap,
//! shared language, meeting format, timezone, availability and function
//! coverage, then keeps the top candidates per mentee. Approved candidates
//! become tracked match records.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{score_pair, tag_overlap, PairScore, RankError, Ranker, ScoringWeights, TimezonePolicy};
pub use crate::models::{MatchRecord, MatchStatus, MenteeProfile, MentorProfile, ScoredCandidate, TagSet};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let a = TagSet::parse("Fintech, Retail");
        let b = TagSet::parse("retail");
        assert_eq!(tag_overlap(&a, &b), 50.0);
        assert!(ScoringWeights::default().validate().is_ok());
    }
}
