//! Complete export of the program data as one `.xlsx` workbook with a
//! `Mentors`, `Mentees` and `Matches` sheet.
//!
//! Sheet contents come from the CSV writers, so columns always match the
//! spreadsheet headers used by the CSV export.

use crate::models::{MatchRecord, MenteeProfile, MentorProfile};
use crate::services::csv_io::{self, CsvError};
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use thiserror::Error;

pub const SHEET_NAMES: [&str; 3] = ["Mentors", "Mentees", "Matches"];

/// Columns written as numbers rather than text
const NUMERIC_COLUMNS: [&str; 4] = [
    "MaxMentees",
    "PriorityScore",
    "MenteeSatisfaction",
    "MentorSatisfaction",
];

/// Errors that can occur building the workbook
#[derive(Debug, Error)]
pub enum WorkbookError {
    #[error(transparent)]
    Csv(#[from] CsvError),

    #[error("Workbook error: {0}")]
    Xlsx(#[from] XlsxError),
}

/// Build the complete workbook in memory
pub fn export_workbook(
    mentors: &[MentorProfile],
    mentees: &[MenteeProfile],
    matches: &[MatchRecord],
) -> Result<Vec<u8>, WorkbookError> {
    let tables = [
        (SHEET_NAMES[0], csv_io::export_mentors(mentors)?),
        (SHEET_NAMES[1], csv_io::export_mentees(mentees)?),
        (SHEET_NAMES[2], csv_io::export_matches(matches)?),
    ];

    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();

    for (name, table) in &tables {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(*name)?;
        fill_sheet(worksheet, table, &header)?;
    }

    let bytes = workbook.save_to_buffer()?;
    tracing::debug!(
        "Built workbook: {} mentors, {} mentees, {} matches ({} bytes)",
        mentors.len(),
        mentees.len(),
        matches.len(),
        bytes.len()
    );

    Ok(bytes)
}

fn fill_sheet(worksheet: &mut Worksheet, table: &[u8], header: &Format) -> Result<(), WorkbookError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(table);
    let mut numeric: Vec<bool> = Vec::new();

    for (idx, record) in reader.records().enumerate() {
        let record = record.map_err(|source| CsvError::Read { row: idx + 1, source })?;
        let row = idx as u32;

        for (col_idx, cell) in record.iter().enumerate() {
            let col = col_idx as u16;

            if row == 0 {
                numeric.push(NUMERIC_COLUMNS.contains(&cell));
                worksheet.write_string_with_format(row, col, cell, header)?;
                continue;
            }

            if cell.is_empty() {
                continue;
            }

            match cell.parse::<f64>() {
                Ok(value) if numeric.get(col_idx).copied().unwrap_or(false) => {
                    worksheet.write_number(row, col, value)?;
                }
                _ => {
                    worksheet.write_string(row, col, cell)?;
                }
            }
        }
    }

    Ok(())
}
