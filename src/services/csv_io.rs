//! Spreadsheet-compatible CSV import and export of mentors, mentees and matches.
//!
//! Column headers follow the program's shared spreadsheet (`MentorID`,
//! `Role/Title`, `TimeZone`, ...) rather than the JSON field names.

use crate::models::{MatchRecord, MatchStatus, MenteeProfile, MentorProfile, TagSet};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::io::Read;
use thiserror::Error;

/// Errors that can occur reading or writing CSV
#[derive(Debug, Error)]
pub enum CsvError {
    #[error("CSV error on row {row}: {source}")]
    Read {
        row: usize,
        #[source]
        source: csv::Error,
    },

    #[error("CSV write error: {0}")]
    Write(#[from] csv::Error),

    #[error("CSV output error: {0}")]
    Io(#[from] std::io::Error),
}

pub const MENTOR_HEADERS: [&str; 20] = [
    "MentorID", "Name", "Email", "Institution", "Role/Title", "City", "Country", "TimeZone",
    "Gender", "Languages", "Sectors", "Expertise", "Functions", "Seniority", "MaxMentees",
    "Availability", "Format", "LinkedIn", "Conflicts", "Notes",
];

pub const MENTEE_HEADERS: [&str; 22] = [
    "MenteeID", "Name", "Email", "Institution", "LPOC", "ParticipantType", "ProjectName", "Stage",
    "Sector", "Needs", "TopDecision", "Goals", "Languages", "City", "Country", "TimeZone",
    "Availability", "Format", "Brief", "Gender", "Consent", "Notes",
];

pub const MATCH_HEADERS: [&str; 16] = [
    "MatchID", "MenteeID", "MentorID", "Status", "PriorityScore", "Rationale", "StartDate",
    "Session1", "Session2", "Session3", "MenteeSatisfaction", "MentorSatisfaction", "Outcome",
    "ConvertedToMentor", "ClosedDate", "LPOC",
];

/// Records parsed from an import, plus the number of blank-name rows skipped
#[derive(Debug)]
pub struct ImportOutcome<T> {
    pub records: Vec<T>,
    pub skipped: usize,
}

#[derive(Debug, Serialize, Deserialize)]
struct MentorRow {
    #[serde(rename = "MentorID")]
    mentor_id: Option<String>,
    #[serde(rename = "Name")]
    name: Option<String>,
    #[serde(rename = "Email")]
    email: Option<String>,
    #[serde(rename = "Institution")]
    institution: Option<String>,
    #[serde(rename = "Role/Title")]
    role: Option<String>,
    #[serde(rename = "City")]
    city: Option<String>,
    #[serde(rename = "Country")]
    country: Option<String>,
    #[serde(rename = "TimeZone")]
    timezone: Option<String>,
    #[serde(rename = "Gender")]
    gender: Option<String>,
    #[serde(rename = "Languages")]
    languages: Option<String>,
    #[serde(rename = "Sectors")]
    sectors: Option<String>,
    #[serde(rename = "Expertise")]
    expertise: Option<String>,
    #[serde(rename = "Functions")]
    functions: Option<String>,
    #[serde(rename = "Seniority")]
    seniority: Option<String>,
    #[serde(rename = "MaxMentees")]
    max_mentees: Option<String>,
    #[serde(rename = "Availability")]
    availability: Option<String>,
    #[serde(rename = "Format")]
    format: Option<String>,
    #[serde(rename = "LinkedIn")]
    linkedin: Option<String>,
    #[serde(rename = "Conflicts")]
    conflicts: Option<String>,
    #[serde(rename = "Notes")]
    notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct MenteeRow {
    #[serde(rename = "MenteeID")]
    mentee_id: Option<String>,
    #[serde(rename = "Name")]
    name: Option<String>,
    #[serde(rename = "Email")]
    email: Option<String>,
    #[serde(rename = "Institution")]
    institution: Option<String>,
    #[serde(rename = "LPOC")]
    lpoc: Option<String>,
    #[serde(rename = "ParticipantType")]
    participant_type: Option<String>,
    #[serde(rename = "ProjectName")]
    project_name: Option<String>,
    #[serde(rename = "Stage")]
    stage: Option<String>,
    #[serde(rename = "Sector")]
    sector: Option<String>,
    #[serde(rename = "Needs")]
    needs: Option<String>,
    #[serde(rename = "TopDecision")]
    top_decision: Option<String>,
    #[serde(rename = "Goals")]
    goals: Option<String>,
    #[serde(rename = "Languages")]
    languages: Option<String>,
    #[serde(rename = "City")]
    city: Option<String>,
    #[serde(rename = "Country")]
    country: Option<String>,
    #[serde(rename = "TimeZone")]
    timezone: Option<String>,
    #[serde(rename = "Availability")]
    availability: Option<String>,
    #[serde(rename = "Format")]
    format: Option<String>,
    #[serde(rename = "Brief")]
    brief: Option<String>,
    #[serde(rename = "Gender")]
    gender: Option<String>,
    #[serde(rename = "Consent")]
    consent: Option<String>,
    #[serde(rename = "Notes")]
    notes: Option<String>,
}

#[derive(Debug, Serialize)]
struct MatchRow<'a> {
    #[serde(rename = "MatchID")]
    match_id: &'a str,
    #[serde(rename = "MenteeID")]
    mentee_id: &'a str,
    #[serde(rename = "MentorID")]
    mentor_id: &'a str,
    #[serde(rename = "Status")]
    status: MatchStatus,
    #[serde(rename = "PriorityScore")]
    priority_score: f64,
    #[serde(rename = "Rationale")]
    rationale: &'a str,
    #[serde(rename = "StartDate")]
    start_date: Option<NaiveDate>,
    #[serde(rename = "Session1")]
    session1: Option<NaiveDate>,
    #[serde(rename = "Session2")]
    session2: Option<NaiveDate>,
    #[serde(rename = "Session3")]
    session3: Option<NaiveDate>,
    #[serde(rename = "MenteeSatisfaction")]
    mentee_satisfaction: Option<u8>,
    #[serde(rename = "MentorSatisfaction")]
    mentor_satisfaction: Option<u8>,
    #[serde(rename = "Outcome")]
    outcome: Option<&'a str>,
    #[serde(rename = "ConvertedToMentor")]
    converted_to_mentor: Option<&'a str>,
    #[serde(rename = "ClosedDate")]
    closed_date: Option<NaiveDate>,
    #[serde(rename = "LPOC")]
    lpoc: Option<&'a str>,
}

fn text(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn has_name(name: &Option<String>) -> bool {
    name.as_deref().is_some_and(|n| !n.trim().is_empty())
}

/// Capacity is informational only; spreadsheets often write `3.0`
fn parse_capacity(raw: Option<String>, row: usize) -> Option<u8> {
    let raw = text(raw)?;
    match raw.parse::<f64>() {
        Ok(value) if value.fract() == 0.0 && (0.0..=f64::from(u8::MAX)).contains(&value) => {
            Some(value as u8)
        }
        _ => {
            tracing::warn!("Ignoring malformed MaxMentees '{}' on row {}", raw, row);
            None
        }
    }
}

impl MentorRow {
    fn into_profile(self, row: usize) -> MentorProfile {
        MentorProfile {
            mentor_id: text(self.mentor_id).unwrap_or_default(),
            name: text(self.name).unwrap_or_default(),
            email: text(self.email).unwrap_or_default(),
            institution: text(self.institution),
            role: text(self.role),
            city: text(self.city),
            country: text(self.country),
            timezone: text(self.timezone),
            gender: text(self.gender),
            languages: TagSet::from(self.languages),
            sectors: TagSet::from(self.sectors),
            expertise: TagSet::from(self.expertise),
            functions: TagSet::from(self.functions),
            seniority: text(self.seniority),
            max_mentees: parse_capacity(self.max_mentees, row),
            availability: text(self.availability),
            format: text(self.format),
            linkedin: text(self.linkedin),
            conflicts: text(self.conflicts),
            notes: text(self.notes),
        }
    }

    fn from_profile(profile: &MentorProfile) -> Self {
        Self {
            mentor_id: Some(profile.mentor_id.clone()),
            name: Some(profile.name.clone()),
            email: Some(profile.email.clone()),
            institution: profile.institution.clone(),
            role: profile.role.clone(),
            city: profile.city.clone(),
            country: profile.country.clone(),
            timezone: profile.timezone.clone(),
            gender: profile.gender.clone(),
            languages: Some(profile.languages.to_string()),
            sectors: Some(profile.sectors.to_string()),
            expertise: Some(profile.expertise.to_string()),
            functions: Some(profile.functions.to_string()),
            seniority: profile.seniority.clone(),
            max_mentees: profile.max_mentees.map(|n| n.to_string()),
            availability: profile.availability.clone(),
            format: profile.format.clone(),
            linkedin: profile.linkedin.clone(),
            conflicts: profile.conflicts.clone(),
            notes: profile.notes.clone(),
        }
    }
}

impl MenteeRow {
    fn into_profile(self) -> MenteeProfile {
        MenteeProfile {
            mentee_id: text(self.mentee_id).unwrap_or_default(),
            name: text(self.name).unwrap_or_default(),
            email: text(self.email).unwrap_or_default(),
            institution: text(self.institution),
            lpoc: text(self.lpoc),
            participant_type: text(self.participant_type),
            project_name: text(self.project_name),
            stage: text(self.stage),
            sector: TagSet::from(self.sector),
            needs: TagSet::from(self.needs),
            top_decision: text(self.top_decision),
            goals: text(self.goals),
            languages: TagSet::from(self.languages),
            city: text(self.city),
            country: text(self.country),
            timezone: text(self.timezone),
            availability: text(self.availability),
            format: text(self.format),
            brief: text(self.brief),
            gender: text(self.gender),
            consent: text(self.consent),
            notes: text(self.notes),
        }
    }

    fn from_profile(profile: &MenteeProfile) -> Self {
        Self {
            mentee_id: Some(profile.mentee_id.clone()),
            name: Some(profile.name.clone()),
            email: Some(profile.email.clone()),
            institution: profile.institution.clone(),
            lpoc: profile.lpoc.clone(),
            participant_type: profile.participant_type.clone(),
            project_name: profile.project_name.clone(),
            stage: profile.stage.clone(),
            sector: Some(profile.sector.to_string()),
            needs: Some(profile.needs.to_string()),
            top_decision: profile.top_decision.clone(),
            goals: profile.goals.clone(),
            languages: Some(profile.languages.to_string()),
            city: profile.city.clone(),
            country: profile.country.clone(),
            timezone: profile.timezone.clone(),
            availability: profile.availability.clone(),
            format: profile.format.clone(),
            brief: profile.brief.clone(),
            gender: profile.gender.clone(),
            consent: profile.consent.clone(),
            notes: profile.notes.clone(),
        }
    }
}

impl<'a> From<&'a MatchRecord> for MatchRow<'a> {
    fn from(record: &'a MatchRecord) -> Self {
        Self {
            match_id: &record.match_id,
            mentee_id: &record.mentee_id,
            mentor_id: &record.mentor_id,
            status: record.status,
            priority_score: record.priority_score,
            rationale: &record.rationale,
            start_date: record.start_date,
            session1: record.session1,
            session2: record.session2,
            session3: record.session3,
            mentee_satisfaction: record.mentee_satisfaction,
            mentor_satisfaction: record.mentor_satisfaction,
            outcome: record.outcome.as_deref(),
            converted_to_mentor: record.converted_to_mentor.as_deref(),
            closed_date: record.closed_date,
            lpoc: record.lpoc.as_deref(),
        }
    }
}

fn reader<R: Read>(input: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(input)
}

/// Read mentors from CSV. Rows without a name are skipped; any malformed
/// row fails the whole import.
pub fn import_mentors<R: Read>(input: R) -> Result<ImportOutcome<MentorProfile>, CsvError> {
    let mut reader = reader(input);
    let mut records = Vec::new();
    let mut skipped = 0;

    for (idx, result) in reader.deserialize::<MentorRow>().enumerate() {
        // Header is row 1
        let row_number = idx + 2;
        let row = result.map_err(|source| CsvError::Read { row: row_number, source })?;

        if !has_name(&row.name) {
            skipped += 1;
            continue;
        }

        records.push(row.into_profile(row_number));
    }

    tracing::debug!("Parsed {} mentors from CSV ({} skipped)", records.len(), skipped);
    Ok(ImportOutcome { records, skipped })
}

/// Read mentees from CSV, with the same skip and failure rules as mentors
pub fn import_mentees<R: Read>(input: R) -> Result<ImportOutcome<MenteeProfile>, CsvError> {
    let mut reader = reader(input);
    let mut records = Vec::new();
    let mut skipped = 0;

    for (idx, result) in reader.deserialize::<MenteeRow>().enumerate() {
        let row_number = idx + 2;
        let row = result.map_err(|source| CsvError::Read { row: row_number, source })?;

        if !has_name(&row.name) {
            skipped += 1;
            continue;
        }

        records.push(row.into_profile());
    }

    tracing::debug!("Parsed {} mentees from CSV ({} skipped)", records.len(), skipped);
    Ok(ImportOutcome { records, skipped })
}

fn write_all<S: Serialize>(headers: &[&str], rows: impl IntoIterator<Item = S>) -> Result<Vec<u8>, CsvError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    // Explicit header so an empty export still names its columns
    writer.write_record(headers)?;
    for row in rows {
        writer.serialize(row)?;
    }

    writer.into_inner().map_err(|e| CsvError::Io(e.into_error()))
}

pub fn export_mentors(mentors: &[MentorProfile]) -> Result<Vec<u8>, CsvError> {
    write_all(&MENTOR_HEADERS, mentors.iter().map(MentorRow::from_profile))
}

pub fn export_mentees(mentees: &[MenteeProfile]) -> Result<Vec<u8>, CsvError> {
    write_all(&MENTEE_HEADERS, mentees.iter().map(MenteeRow::from_profile))
}

pub fn export_matches(matches: &[MatchRecord]) -> Result<Vec<u8>, CsvError> {
    write_all(&MATCH_HEADERS, matches.iter().map(MatchRow::from))
}
