use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use validator::{Validate, ValidationError};

/// Case-insensitive set of comma-delimited tags
///
/// Parsing trims each token, lowercases it, drops empty tokens and collapses
/// duplicates. Serialized form is the sorted tokens joined with `", "`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub struct TagSet(BTreeSet<String>);

impl TagSet {
    pub fn parse(raw: &str) -> Self {
        Self(
            raw.split(',')
                .map(|token| token.trim().to_lowercase())
                .filter(|token| !token.is_empty())
                .collect(),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.0.contains(&tag.trim().to_lowercase())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Number of tags present in both sets
    pub fn intersection_len(&self, other: &TagSet) -> usize {
        self.0.intersection(&other.0).count()
    }

    /// Number of distinct tags across both sets
    pub fn union_len(&self, other: &TagSet) -> usize {
        self.0.union(&other.0).count()
    }
}

impl From<&str> for TagSet {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl From<Option<String>> for TagSet {
    fn from(raw: Option<String>) -> Self {
        raw.as_deref().map(Self::parse).unwrap_or_default()
    }
}

impl From<TagSet> for String {
    fn from(tags: TagSet) -> Self {
        tags.to_string()
    }
}

impl FromStr for TagSet {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl fmt::Display for TagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<&str> = self.iter().collect();
        write!(f, "{}", joined.join(", "))
    }
}

fn non_empty_tags(tags: &TagSet) -> Result<(), ValidationError> {
    if tags.is_empty() {
        return Err(ValidationError::new("empty_tags"));
    }
    Ok(())
}

/// Mentor record as held by the record store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MentorProfile {
    #[serde(default)]
    pub mentor_id: String,
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    pub institution: Option<String>,
    pub role: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub timezone: Option<String>,
    pub gender: Option<String>,
    #[serde(default)]
    #[validate(custom(function = "non_empty_tags"))]
    pub languages: TagSet,
    #[serde(default)]
    pub sectors: TagSet,
    #[serde(default)]
    pub expertise: TagSet,
    #[serde(default)]
    pub functions: TagSet,
    pub seniority: Option<String>,
    #[validate(range(min = 1, max = 10))]
    pub max_mentees: Option<u8>,
    pub availability: Option<String>,
    pub format: Option<String>,
    pub linkedin: Option<String>,
    pub conflicts: Option<String>,
    pub notes: Option<String>,
}

/// Mentee (founder, student or team lead) record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MenteeProfile {
    #[serde(default)]
    pub mentee_id: String,
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    pub institution: Option<String>,
    /// Local point of contact
    pub lpoc: Option<String>,
    pub participant_type: Option<String>,
    #[validate(required, length(min = 1))]
    pub project_name: Option<String>,
    pub stage: Option<String>,
    #[serde(default)]
    #[validate(custom(function = "non_empty_tags"))]
    pub sector: TagSet,
    #[serde(default)]
    #[validate(custom(function = "non_empty_tags"))]
    pub needs: TagSet,
    pub top_decision: Option<String>,
    pub goals: Option<String>,
    #[serde(default)]
    #[validate(custom(function = "non_empty_tags"))]
    pub languages: TagSet,
    pub city: Option<String>,
    pub country: Option<String>,
    pub timezone: Option<String>,
    pub availability: Option<String>,
    pub format: Option<String>,
    pub brief: Option<String>,
    pub gender: Option<String>,
    pub consent: Option<String>,
    pub notes: Option<String>,
}

/// One mentor suggestion for one mentee, produced by a ranking run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredCandidate {
    pub mentee_id: String,
    pub mentee_name: String,
    pub mentor_id: String,
    pub mentor_name: String,
    pub score: f64,
    pub rationale: String,
    pub mentor_email: String,
    pub mentee_email: String,
}

impl ScoredCandidate {
    pub fn tier(&self) -> ScoreTier {
        ScoreTier::from_score(self.score)
    }
}

/// Display banding of a match score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreTier {
    High,
    Medium,
    Low,
}

impl ScoreTier {
    pub fn from_score(score: f64) -> Self {
        if score >= 70.0 {
            ScoreTier::High
        } else if score >= 50.0 {
            ScoreTier::Medium
        } else {
            ScoreTier::Low
        }
    }
}

/// Lifecycle of an approved pairing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchStatus {
    Proposed,
    Confirmed,
    Active,
    Completed,
    Declined,
}

impl MatchStatus {
    pub const ALL: [MatchStatus; 5] = [
        MatchStatus::Proposed,
        MatchStatus::Confirmed,
        MatchStatus::Active,
        MatchStatus::Completed,
        MatchStatus::Declined,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::Proposed => "Proposed",
            MatchStatus::Confirmed => "Confirmed",
            MatchStatus::Active => "Active",
            MatchStatus::Completed => "Completed",
            MatchStatus::Declined => "Declined",
        }
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, MatchStatus::Completed | MatchStatus::Declined)
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                format!(
                    "Unknown match status '{}', expected one of: Proposed, Confirmed, Active, Completed, Declined",
                    wanted
                )
            })
    }
}

/// Approved pairing tracked through sessions to closure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecord {
    #[serde(default)]
    pub match_id: String,
    pub mentee_id: String,
    pub mentor_id: String,
    pub status: MatchStatus,
    pub priority_score: f64,
    pub rationale: String,
    pub start_date: Option<NaiveDate>,
    pub session1: Option<NaiveDate>,
    pub session2: Option<NaiveDate>,
    pub session3: Option<NaiveDate>,
    pub mentee_satisfaction: Option<u8>,
    pub mentor_satisfaction: Option<u8>,
    pub outcome: Option<String>,
    pub converted_to_mentor: Option<String>,
    pub closed_date: Option<NaiveDate>,
    pub lpoc: Option<String>,
}

impl MatchRecord {
    /// New `Proposed` record for an approved candidate. The id is assigned by the store.
    pub fn proposed(candidate: &ScoredCandidate) -> Self {
        Self {
            match_id: String::new(),
            mentee_id: candidate.mentee_id.clone(),
            mentor_id: candidate.mentor_id.clone(),
            status: MatchStatus::Proposed,
            priority_score: candidate.score,
            rationale: candidate.rationale.clone(),
            start_date: None,
            session1: None,
            session2: None,
            session3: None,
            mentee_satisfaction: None,
            mentor_satisfaction: None,
            outcome: None,
            converted_to_mentor: None,
            closed_date: None,
            lpoc: None,
        }
    }

    /// Move to `status`, stamping `closed_date` on first closure
    pub fn set_status(&mut self, status: MatchStatus, today: NaiveDate) {
        self.status = status;
        if status.is_closed() && self.closed_date.is_none() {
            self.closed_date = Some(today);
        }
    }
}
