use crate::models::domain::MatchStatus;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to run the matching algorithm over the current pools
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct RunMatchingRequest {
    #[validate(range(min = 1))]
    #[serde(alias = "top_n", rename = "topN", default)]
    pub top_n: Option<u16>,
    #[validate(range(min = 0.0, max = 100.0))]
    #[serde(alias = "min_score", rename = "minScore", default)]
    pub min_score: Option<f64>,
}

/// Partial update of a match record
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMatchRequest {
    pub status: Option<MatchStatus>,
    pub start_date: Option<NaiveDate>,
    pub session1: Option<NaiveDate>,
    pub session2: Option<NaiveDate>,
    pub session3: Option<NaiveDate>,
    #[validate(range(min = 1, max = 5))]
    pub mentee_satisfaction: Option<u8>,
    #[validate(range(min = 1, max = 5))]
    pub mentor_satisfaction: Option<u8>,
    pub outcome: Option<String>,
    pub converted_to_mentor: Option<String>,
    pub lpoc: Option<String>,
}

/// Query string for listing matches, e.g. `?status=Proposed,Active`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatchListQuery {
    pub status: Option<String>,
}

impl MatchListQuery {
    /// Parse the comma-separated status filter
    ///
    /// Without a filter only open matches (`Proposed`, `Confirmed`,
    /// `Active`) are listed. An empty filter or `all` lists every status.
    pub fn statuses(&self) -> Result<Vec<MatchStatus>, String> {
        let Some(raw) = self.status.as_deref() else {
            return Ok(MatchStatus::ALL
                .into_iter()
                .filter(|status| !status.is_closed())
                .collect());
        };

        let raw = raw.trim();
        if raw.is_empty() || raw.eq_ignore_ascii_case("all") {
            return Ok(MatchStatus::ALL.to_vec());
        }

        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::parse)
            .collect()
    }
}
