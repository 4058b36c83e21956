use crate::models::{MatchRecord, MatchStatus, MenteeProfile, MentorProfile};
use serde::Serialize;
use std::collections::HashMap;

const TOP_SECTORS: usize = 5;

/// A label and how often it occurs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelCount {
    pub label: String,
    pub count: usize,
}

/// Program overview statistics
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_mentors: usize,
    pub total_mentees: usize,
    pub active_matches: usize,
    pub average_match_score: f64,
    pub top_mentor_sectors: Vec<LabelCount>,
    pub mentee_stages: Vec<LabelCount>,
}

/// Summarize the current pools and match records
pub fn compute_stats(
    mentors: &[MentorProfile],
    mentees: &[MenteeProfile],
    matches: &[MatchRecord],
) -> DashboardStats {
    let active_matches = matches
        .iter()
        .filter(|m| m.status == MatchStatus::Active)
        .count();

    let average_match_score = if matches.is_empty() {
        0.0
    } else {
        let total: f64 = matches.iter().map(|m| m.priority_score).sum();
        total / matches.len() as f64
    };

    let mut top_mentor_sectors = ranked_counts(
        mentors
            .iter()
            .flat_map(|mentor| mentor.sectors.iter().map(str::to_string)),
    );
    top_mentor_sectors.truncate(TOP_SECTORS);

    let mentee_stages = ranked_counts(
        mentees
            .iter()
            .filter_map(|mentee| mentee.stage.as_deref())
            .map(str::trim)
            .filter(|stage| !stage.is_empty())
            .map(str::to_string),
    );

    DashboardStats {
        total_mentors: mentors.len(),
        total_mentees: mentees.len(),
        active_matches,
        average_match_score,
        top_mentor_sectors,
        mentee_stages,
    }
}

/// Count labels, most frequent first, ties alphabetical
fn ranked_counts(labels: impl Iterator<Item = String>) -> Vec<LabelCount> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for label in labels {
        *counts.entry(label).or_insert(0) += 1;
    }

    let mut ranked: Vec<LabelCount> = counts
        .into_iter()
        .map(|(label, count)| LabelCount { label, count })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ScoredCandidate, TagSet};

    fn record(score: f64, status: MatchStatus) -> MatchRecord {
        let candidate = ScoredCandidate {
            mentee_id: "ME001".to_string(),
            mentee_name: "Bea".to_string(),
            mentor_id: "M001".to_string(),
            mentor_name: "Ana".to_string(),
            score,
            rationale: String::new(),
            mentor_email: "ana@example.org".to_string(),
            mentee_email: "bea@example.org".to_string(),
        };
        let mut record = MatchRecord::proposed(&candidate);
        record.status = status;
        record
    }

    #[test]
    fn test_empty_dashboard() {
        let stats = compute_stats(&[], &[], &[]);
        assert_eq!(stats.total_mentors, 0);
        assert_eq!(stats.average_match_score, 0.0);
        assert!(stats.top_mentor_sectors.is_empty());
    }

    #[test]
    fn test_dashboard_counts() {
        let mentors: Vec<MentorProfile> = ["FinTech, AI", "fintech", "EdTech, AI", "FinTech"]
            .iter()
            .map(|sectors| MentorProfile {
                sectors: TagSet::parse(sectors),
                ..Default::default()
            })
            .collect();
        let mentees: Vec<MenteeProfile> = [Some("MVP"), Some("idea"), Some("MVP"), None, Some(" ")]
            .iter()
            .map(|stage| MenteeProfile {
                stage: stage.map(str::to_string),
                ..Default::default()
            })
            .collect();
        let matches = vec![
            record(80.0, MatchStatus::Active),
            record(60.0, MatchStatus::Proposed),
            record(70.0, MatchStatus::Active),
        ];

        let stats = compute_stats(&mentors, &mentees, &matches);

        assert_eq!(stats.total_mentors, 4);
        assert_eq!(stats.total_mentees, 5);
        assert_eq!(stats.active_matches, 2);
        assert_eq!(stats.average_match_score, 70.0);
        assert_eq!(
            stats.top_mentor_sectors,
            vec![
                LabelCount { label: "fintech".to_string(), count: 3 },
                LabelCount { label: "ai".to_string(), count: 2 },
                LabelCount { label: "edtech".to_string(), count: 1 },
            ]
        );
        assert_eq!(stats.mentee_stages[0], LabelCount { label: "MVP".to_string(), count: 2 });
        assert_eq!(stats.mentee_stages.len(), 2);
    }
}
