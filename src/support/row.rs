//! Tabular input rows
//!
//! One row of external input is a string-keyed field map; the helpers here
//! pull typed values out of it.

use std::collections::HashMap;

use super::errors::{AppResult, DomainError};

/// One input record, keyed by column header.
pub type Row = HashMap<String, String>;

/// Required text field.
pub fn required<'a>(row: &'a Row, entity: &'static str, field: &'static str) -> AppResult<&'a str> {
    row.get(field)
        .map(String::as_str)
        .ok_or_else(|| DomainError::MissingField { entity, field }.into())
}

/// Optional text field. Blank values count as absent.
pub fn optional(row: &Row, field: &str) -> Option<String> {
    row.get(field)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Parse an integer out of text, surrounding whitespace ignored.
pub fn parse_int(value: &str, entity: &'static str, field: &'static str) -> AppResult<i32> {
    value.trim().parse::<i32>().map_err(|_| {
        DomainError::InvalidNumber {
            entity,
            field,
            value: value.to_string(),
        }
        .into()
    })
}

/// Required integer field.
pub fn required_int(row: &Row, entity: &'static str, field: &'static str) -> AppResult<i32> {
    parse_int(required(row, entity, field)?, entity, field)
}

/// Optional integer field; present but malformed is still an error.
pub fn optional_int(row: &Row, entity: &'static str, field: &'static str) -> AppResult<Option<i32>> {
    match row.get(field).map(|v| v.trim()).filter(|v| !v.is_empty()) {
        Some(v) => parse_int(v, entity, field).map(Some),
        None => Ok(None),
    }
}
