use crate::core::ranker::RankError;
use crate::core::similarity::{
    formats_compatible, languages_share_one, tag_overlap, timezones_compatible_with, TimezonePolicy,
};
use crate::models::{MenteeProfile, MentorProfile};
use serde::Serialize;

/// Split of the sector/expertise component between its two overlaps
const SECTOR_SHARE: f64 = 0.4;
const EXPERTISE_SHARE: f64 = 0.6;

/// Raw values used when a boolean component does not match
const FORMAT_MISMATCH_RAW: f64 = 30.0;
const TIMEZONE_MISMATCH_RAW: f64 = 50.0;
const AVAILABILITY_MISSING_RAW: f64 = 50.0;

/// Overlap percentages above which a rationale clause is emitted
const SECTOR_CLAUSE_THRESHOLD: f64 = 50.0;
const EXPERTISE_CLAUSE_THRESHOLD: f64 = 50.0;
const FUNCTION_CLAUSE_THRESHOLD: f64 = 40.0;

pub const COMMON_LANGUAGE_CLAUSE: &str = "Common language";
pub const NO_LANGUAGE_CLAUSE: &str = "⚠️ No language overlap";
pub const FORMAT_CLAUSE: &str = "Format compatible";
pub const TIMEZONE_CLAUSE: &str = "Same timezone";

/// Scoring weights. Must be non-negative and sum to 1.0 so that the total
/// stays within 0-100.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub sector_expertise: f64,
    pub language: f64,
    pub format: f64,
    pub timezone: f64,
    pub availability: f64,
    pub functions: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            sector_expertise: 0.30,
            language: 0.20,
            format: 0.15,
            timezone: 0.10,
            availability: 0.15,
            functions: 0.10,
        }
    }
}

impl ScoringWeights {
    pub fn sum(&self) -> f64 {
        self.sector_expertise
            + self.language
            + self.format
            + self.timezone
            + self.availability
            + self.functions
    }

    pub fn validate(&self) -> Result<(), RankError> {
        let all = [
            self.sector_expertise,
            self.language,
            self.format,
            self.timezone,
            self.availability,
            self.functions,
        ];

        if all.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(RankError::InvalidArgument(format!(
                "scoring weights must be finite and non-negative: {:?}",
                self
            )));
        }

        let sum = self.sum();
        if (sum - 1.0).abs() > 1e-6 {
            return Err(RankError::InvalidArgument(format!(
                "scoring weights must sum to 1.0, got {:.4}",
                sum
            )));
        }

        Ok(())
    }
}

/// Raw (unweighted) component values of a pair score, each in 0-100
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub sector_overlap: f64,
    pub expertise_overlap: f64,
    pub sector_expertise: f64,
    pub language: f64,
    pub format: f64,
    pub timezone: f64,
    pub availability: f64,
    pub functions: f64,
}

/// Score, rationale and breakdown for one (mentor, mentee) pair
#[derive(Debug, Clone, PartialEq)]
pub struct PairScore {
    pub score: f64,
    pub rationale: String,
    pub breakdown: ScoreBreakdown,
}

/// Calculate a compatibility score (0-100) and rationale for a pair
///
/// Scoring formula:
/// score = (
///     sector_expertise * 0.30 +    # sector overlap * 0.4 + expertise/needs overlap * 0.6
///     language * 0.20 +            # 100 if a language is shared, else 0
///     format * 0.15 +              # 100 if formats compatible, else 30
///     timezone * 0.10 +            # 100 if timezones compatible, else 50
///     availability * 0.15 +        # 100 if both sides gave availability, else 50
///     functions * 0.10             # functions/needs overlap
/// )
///
/// Missing attributes never fail; they only lower their component.
pub fn score_pair(
    mentor: &MentorProfile,
    mentee: &MenteeProfile,
    weights: &ScoringWeights,
    timezone_policy: TimezonePolicy,
) -> PairScore {
    let mut rationale: Vec<String> = Vec::new();

    // Sector and expertise
    let sector_overlap = tag_overlap(&mentor.sectors, &mentee.sector);
    let expertise_overlap = tag_overlap(&mentor.expertise, &mentee.needs);
    let sector_expertise = sector_overlap * SECTOR_SHARE + expertise_overlap * EXPERTISE_SHARE;

    if sector_overlap > SECTOR_CLAUSE_THRESHOLD {
        rationale.push(format!("Strong sector alignment ({:.0}%)", sector_overlap));
    }
    if expertise_overlap > EXPERTISE_CLAUSE_THRESHOLD {
        rationale.push(format!("High expertise-needs match ({:.0}%)", expertise_overlap));
    }

    // Language
    let shares_language = languages_share_one(&mentor.languages, &mentee.languages);
    let language = if shares_language { 100.0 } else { 0.0 };
    let language_clause = if shares_language {
        COMMON_LANGUAGE_CLAUSE
    } else {
        NO_LANGUAGE_CLAUSE
    };
    rationale.push(language_clause.to_string());

    // Meeting format
    let format_ok = formats_compatible(mentor.format.as_deref(), mentee.format.as_deref());
    let format = if format_ok { 100.0 } else { FORMAT_MISMATCH_RAW };
    if format_ok {
        rationale.push(FORMAT_CLAUSE.to_string());
    }

    // Timezone
    let timezone_ok = timezones_compatible_with(
        mentor.timezone.as_deref(),
        mentee.timezone.as_deref(),
        timezone_policy,
    );
    let timezone = if timezone_ok { 100.0 } else { TIMEZONE_MISMATCH_RAW };
    if timezone_ok {
        rationale.push(TIMEZONE_CLAUSE.to_string());
    }

    // Availability is presence-only
    let availability = if has_text(&mentor.availability) && has_text(&mentee.availability) {
        100.0
    } else {
        AVAILABILITY_MISSING_RAW
    };

    // Functional fit
    let functions = tag_overlap(&mentor.functions, &mentee.needs);
    if functions > FUNCTION_CLAUSE_THRESHOLD {
        rationale.push(format!("Functional fit ({:.0}%)", functions));
    }

    let total = sector_expertise * weights.sector_expertise
        + language * weights.language
        + format * weights.format
        + timezone * weights.timezone
        + availability * weights.availability
        + functions * weights.functions;

    PairScore {
        score: round_one_decimal(total).clamp(0.0, 100.0),
        rationale: rationale.join("; "),
        breakdown: ScoreBreakdown {
            sector_overlap,
            expertise_overlap,
            sector_expertise,
            language,
            format,
            timezone,
            availability,
            functions,
        },
    }
}

#[inline]
fn has_text(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

#[inline]
fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
