//! Lookup tables for registry conventions.

use chrono::NaiveDate;

const CENTRE_KEYS: &[&str] = &["centre_id"];
const PATIENT_KEYS: &[&str] = &["centre_id", "patient_id"];
const VISIT_KEYS: &[&str] = &["centre_id", "patient_id", "visit_date"];

const GROUPING_LEVELS: &[&str] = &["centre", "patient", "visit"];

const IDENTIFIER_COLUMNS: &[&str] = &["ssn", "nhs_number", "medicare_no"];

/// Earliest event date the registry treats as plausible.
///
/// Earlier values are sentinels left over from legacy spreadsheet
/// exports (most commonly 1899-01-01 00:00:00) and are repaired to
/// missing during normalization.
pub fn reference_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1900, 1, 1).expect("fixed calendar date")
}

/// Sort keys for a named grouping level, outermost first.
pub fn grouping_keys(level: &str) -> Option<&'static [&'static str]> {
    match level {
        "centre" => Some(CENTRE_KEYS),
        "patient" => Some(PATIENT_KEYS),
        "visit" => Some(VISIT_KEYS),
        _ => None,
    }
}

/// Grouping levels with built-in key sets, narrowest scope last.
pub fn grouping_levels() -> &'static [&'static str] {
    GROUPING_LEVELS
}

/// Direct identifiers that must not leave the staging workspace.
pub fn identifier_columns() -> &'static [&'static str] {
    IDENTIFIER_COLUMNS
}
