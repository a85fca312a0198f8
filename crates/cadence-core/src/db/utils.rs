//! Row decoding helpers shared by the query modules.

use std::{fmt::Display, str::FromStr};

use rusqlite::{Row, types::Type};
use serde_json::{Map, Value};

use crate::models::WeekdaySet;

fn conversion_error(idx: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, message.into())
}

/// Parses a text column into any `FromStr` type.
pub(crate) fn parse_text<T>(row: &Row, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    let text: String = row.get(idx)?;
    text.parse::<T>()
        .map_err(|e| conversion_error(idx, format!("Invalid value '{text}': {e}")))
}

/// Parses a nullable text column.
pub(crate) fn parse_optional_text<T>(row: &Row, idx: usize) -> rusqlite::Result<Option<T>>
where
    T: FromStr,
    T::Err: Display,
{
    let text: Option<String> = row.get(idx)?;
    text.map(|text| {
        text.parse::<T>()
            .map_err(|e| conversion_error(idx, format!("Invalid value '{text}': {e}")))
    })
    .transpose()
}

/// Decodes a JSON object column. Empty text reads as an empty map.
pub(crate) fn parse_json_map(row: &Row, idx: usize) -> rusqlite::Result<Map<String, Value>> {
    let text: String = row.get(idx)?;
    if text.trim().is_empty() {
        return Ok(Map::new());
    }
    serde_json::from_str(&text)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Stored form of a weekday set: comma-separated lowercase names.
pub(crate) fn weekdays_to_sql(weekdays: &WeekdaySet) -> String {
    Vec::<String>::from(*weekdays).join(",")
}
