use crate::core::scoring::{score_pair, ScoringWeights};
use crate::core::similarity::TimezonePolicy;
use crate::models::{MenteeProfile, MentorProfile, ScoredCandidate};
use rayon::prelude::*;
use serde::Serialize;
use std::cmp::Ordering;
use thiserror::Error;

/// Errors raised by the ranking core
#[derive(Debug, Error, PartialEq)]
pub enum RankError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Candidates of one mentee, best first
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenteeCandidates {
    pub mentee_id: String,
    pub mentee_name: String,
    pub candidates: Vec<ScoredCandidate>,
}

/// Per-mentee top-N ranking over a mentor pool
///
/// # Pipeline Stages
/// 1. Score every (mentor, mentee) pair
/// 2. Stable sort each mentee's candidates by score, descending
/// 3. Truncate each mentee's list to `top_n`
/// 4. Concatenate in mentee input order
///
/// The minimum-score filter is a separate step, see [`apply_min_score`].
#[derive(Debug, Clone)]
pub struct Ranker {
    weights: ScoringWeights,
    timezone_policy: TimezonePolicy,
    parallel: bool,
}

impl Ranker {
    pub fn new(weights: ScoringWeights, timezone_policy: TimezonePolicy) -> Self {
        Self {
            weights,
            timezone_policy,
            parallel: false,
        }
    }

    pub fn with_default_weights() -> Self {
        Self::new(ScoringWeights::default(), TimezonePolicy::default())
    }

    /// Spread mentees across the rayon pool. Output order is unchanged.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Rank mentors for every mentee
    ///
    /// # Arguments
    /// * `mentors` - Mentor pool snapshot
    /// * `mentees` - Mentees to rank for, in output order
    /// * `top_n` - Maximum candidates kept per mentee (must be positive)
    ///
    /// # Returns
    /// Flat list grouped by mentee, each group sorted by score descending
    pub fn rank_matches(
        &self,
        mentors: &[MentorProfile],
        mentees: &[MenteeProfile],
        top_n: usize,
    ) -> Result<Vec<ScoredCandidate>, RankError> {
        if top_n == 0 {
            return Err(RankError::InvalidArgument(
                "top_n must be a positive integer".to_string(),
            ));
        }

        let groups: Vec<Vec<ScoredCandidate>> = if self.parallel {
            mentees
                .par_iter()
                .map(|mentee| self.rank_for_mentee(mentors, mentee, top_n))
                .collect()
        } else {
            mentees
                .iter()
                .map(|mentee| self.rank_for_mentee(mentors, mentee, top_n))
                .collect()
        };

        let ranked: Vec<ScoredCandidate> = groups.into_iter().flatten().collect();

        tracing::debug!(
            "Ranked {} mentees against {} mentors, kept {} candidates (top_n={})",
            mentees.len(),
            mentors.len(),
            ranked.len(),
            top_n
        );

        Ok(ranked)
    }

    fn rank_for_mentee(
        &self,
        mentors: &[MentorProfile],
        mentee: &MenteeProfile,
        top_n: usize,
    ) -> Vec<ScoredCandidate> {
        let mut candidates: Vec<ScoredCandidate> = mentors
            .iter()
            .map(|mentor| {
                let pair = score_pair(mentor, mentee, &self.weights, self.timezone_policy);
                ScoredCandidate {
                    mentee_id: mentee.mentee_id.clone(),
                    mentee_name: mentee.name.clone(),
                    mentor_id: mentor.mentor_id.clone(),
                    mentor_name: mentor.name.clone(),
                    score: pair.score,
                    rationale: pair.rationale,
                    mentor_email: mentor.email.clone(),
                    mentee_email: mentee.email.clone(),
                }
            })
            .collect();

        // sort_by is stable: ties keep mentor input order
        candidates.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        candidates.truncate(top_n);
        candidates
    }
}

impl Default for Ranker {
    fn default() -> Self {
        Self::with_default_weights()
    }
}

/// Drop candidates scoring below `min_score`
///
/// Applied after top-N truncation, so a mentee may end up with fewer than
/// `top_n` candidates or none at all. Never adds candidates.
pub fn apply_min_score(
    candidates: Vec<ScoredCandidate>,
    min_score: f64,
) -> Result<Vec<ScoredCandidate>, RankError> {
    if !(0.0..=100.0).contains(&min_score) {
        return Err(RankError::InvalidArgument(format!(
            "min_score must be within [0, 100], got {}",
            min_score
        )));
    }

    Ok(candidates
        .into_iter()
        .filter(|candidate| candidate.score >= min_score)
        .collect())
}

/// Regroup a ranked list by mentee, in order of first appearance
pub fn group_by_mentee(candidates: &[ScoredCandidate]) -> Vec<MenteeCandidates> {
    let mut groups: Vec<MenteeCandidates> = Vec::new();

    for candidate in candidates {
        match groups.last_mut() {
            Some(group) if group.mentee_id == candidate.mentee_id => {
                group.candidates.push(candidate.clone());
            }
            _ => groups.push(MenteeCandidates {
                mentee_id: candidate.mentee_id.clone(),
                mentee_name: candidate.mentee_name.clone(),
                candidates: vec![candidate.clone()],
            }),
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TagSet;

    fn mentor(id: &str, sectors: &str, languages: &str) -> MentorProfile {
        MentorProfile {
            mentor_id: id.to_string(),
            name: format!("Mentor {}", id),
            email: format!("{}@mentors.example", id.to_lowercase()),
            sectors: TagSet::parse(sectors),
            languages: TagSet::parse(languages),
            ..Default::default()
        }
    }

    fn mentee(id: &str, sector: &str, languages: &str) -> MenteeProfile {
        MenteeProfile {
            mentee_id: id.to_string(),
            name: format!("Mentee {}", id),
            email: format!("{}@mentees.example", id.to_lowercase()),
            sector: TagSet::parse(sector),
            languages: TagSet::parse(languages),
            ..Default::default()
        }
    }

    #[test]
    fn test_rank_keeps_top_n_sorted() {
        let ranker = Ranker::with_default_weights();
        let mentors = vec![
            mentor("M001", "EdTech", "Spanish"),
            mentor("M002", "FinTech", "English"),
            mentor("M003", "FinTech, AI", "English"),
            mentor("M004", "AI", "English"),
            mentor("M005", "FinTech", "Spanish"),
        ];
        let mentees = vec![mentee("ME001", "FinTech", "English")];

        let ranked = ranker.rank_matches(&mentors, &mentees, 3).unwrap();

        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0].mentor_id, "M002");
        assert_eq!(ranked[1].mentor_id, "M003");
        assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_ties_keep_mentor_input_order() {
        let ranker = Ranker::with_default_weights();
        let mentors: Vec<MentorProfile> = ["M003", "M001", "M002"]
            .iter()
            .map(|id| mentor(id, "FinTech", "English"))
            .collect();
        let mentees = vec![mentee("ME001", "FinTech", "English")];

        let ranked = ranker.rank_matches(&mentors, &mentees, 3).unwrap();
        let ids: Vec<&str> = ranked.iter().map(|c| c.mentor_id.as_str()).collect();

        assert_eq!(ids, vec!["M003", "M001", "M002"]);
    }

    #[test]
    fn test_groups_follow_mentee_order() {
        let ranker = Ranker::with_default_weights();
        let mentors = vec![mentor("M001", "FinTech", "English"), mentor("M002", "AI", "English")];
        let mentees = vec![
            mentee("ME002", "AI", "English"),
            mentee("ME001", "FinTech", "English"),
        ];

        let ranked = ranker.rank_matches(&mentors, &mentees, 1).unwrap();

        assert_eq!(ranked.len(), 2);
        assert_eq!((ranked[0].mentee_id.as_str(), ranked[0].mentor_id.as_str()), ("ME002", "M002"));
        assert_eq!((ranked[1].mentee_id.as_str(), ranked[1].mentor_id.as_str()), ("ME001", "M001"));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let mentors: Vec<MentorProfile> = (0..12)
            .map(|i| {
                let sectors = if i % 3 == 0 { "FinTech" } else { "AI, EdTech" };
                mentor(&format!("M{:03}", i), sectors, "English")
            })
            .collect();
        let mentees: Vec<MenteeProfile> = (0..20)
            .map(|i| {
                let sector = if i % 2 == 0 { "FinTech" } else { "EdTech" };
                mentee(&format!("ME{:03}", i), sector, "English")
            })
            .collect();

        let sequential = Ranker::with_default_weights()
            .rank_matches(&mentors, &mentees, 4)
            .unwrap();
        let parallel = Ranker::with_default_weights()
            .with_parallel(true)
            .rank_matches(&mentors, &mentees, 4)
            .unwrap();

        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_empty_pools_yield_empty() {
        let ranker = Ranker::with_default_weights();
        let mentees = vec![mentee("ME001", "FinTech", "English")];
        let mentors = vec![mentor("M001", "FinTech", "English")];

        assert!(ranker.rank_matches(&[], &mentees, 3).unwrap().is_empty());
        assert!(ranker.rank_matches(&mentors, &[], 3).unwrap().is_empty());
    }

    #[test]
    fn test_zero_top_n_rejected() {
        let ranker = Ranker::with_default_weights();
        let result = ranker.rank_matches(&[], &[], 0);
        assert!(matches!(result, Err(RankError::InvalidArgument(_))));
    }

    #[test]
    fn test_min_score_filters_after_truncation() {
        let ranker = Ranker::with_default_weights();
        let mentors = vec![
            mentor("M001", "FinTech", "English"),
            mentor("M002", "AI", "Spanish"),
        ];
        let mentees = vec![mentee("ME001", "FinTech", "English")];

        let ranked = ranker.rank_matches(&mentors, &mentees, 2).unwrap();
        let kept = apply_min_score(ranked.clone(), 50.0).unwrap();

        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].mentor_id, "M001");

        let none = apply_min_score(ranked, 100.0).unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn test_min_score_out_of_range_rejected() {
        assert!(apply_min_score(vec![], -1.0).is_err());
        assert!(apply_min_score(vec![], 100.5).is_err());
        assert!(apply_min_score(vec![], f64::NAN).is_err());
        assert!(apply_min_score(vec![], 0.0).is_ok());
    }

    #[test]
    fn test_group_by_mentee() {
        let ranker = Ranker::with_default_weights();
        let mentors = vec![mentor("M001", "FinTech", "English"), mentor("M002", "AI", "English")];
        let mentees = vec![
            mentee("ME001", "FinTech", "English"),
            mentee("ME002", "AI", "English"),
        ];

        let ranked = ranker.rank_matches(&mentors, &mentees, 2).unwrap();
        let groups = group_by_mentee(&ranked);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].mentee_id, "ME001");
        assert_eq!(groups[0].candidates.len(), 2);
        assert_eq!(groups[1].mentee_name, "Mentee ME002");
    }
}
