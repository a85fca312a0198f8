//! Program shape, metadata and the persisted program record.

use jiff::{Timestamp, civil::Date};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::weekday::{WEEK, WeekdaySet};
use crate::error::{CoachError, Result};

/// The abstract shape of a program: how many weeks, which weekdays, and
/// from when.
///
/// Days per week is always the size of the weekday set, so the two can never
/// drift apart. Edits to either side go through [`set_days_per_week`] and
/// [`toggle_weekday`], which never leave the set empty.
///
/// [`set_days_per_week`]: ProgramSpec::set_days_per_week
/// [`toggle_weekday`]: ProgramSpec::toggle_weekday
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProgramSpec {
    /// Requested first day of the program
    pub start_date: Date,

    /// Program length in weeks (at least 1)
    pub number_of_weeks: u32,

    /// Weekdays that carry a workout
    pub weekdays: WeekdaySet,
}

impl ProgramSpec {
    pub fn new(start_date: Date, number_of_weeks: u32, weekdays: WeekdaySet) -> Self {
        Self {
            start_date,
            number_of_weeks,
            weekdays,
        }
    }

    pub fn days_per_week(&self) -> usize {
        self.weekdays.len()
    }

    /// Number of scheduled workouts the program calls for.
    pub fn total_workouts(&self) -> usize {
        self.number_of_weeks as usize * self.days_per_week()
    }

    /// Checks the inputs the scheduler cannot work without.
    pub fn validate(&self) -> Result<()> {
        validate_shape(self.number_of_weeks, &self.weekdays)
    }

    /// Adjusts the weekday set to hold exactly `days` entries.
    ///
    /// Growing adds the earliest unselected days Monday-first; shrinking drops
    /// the latest selected days. `days` is clamped to `1..=7`.
    pub fn set_days_per_week(&mut self, days: usize) {
        let target = days.clamp(1, 7);
        for day in WEEK {
            if self.weekdays.len() >= target {
                break;
            }
            self.weekdays.insert(day);
        }
        while self.weekdays.len() > target {
            if let Some(day) = self.weekdays.last() {
                self.weekdays.remove(day);
            }
        }
    }

    /// Selects or deselects a weekday. Deselecting the only remaining day is
    /// refused. Returns whether the set changed.
    pub fn toggle_weekday(&mut self, day: jiff::civil::Weekday) -> bool {
        if self.weekdays.contains(day) {
            if self.weekdays.len() == 1 {
                return false;
            }
            self.weekdays.remove(day)
        } else {
            self.weekdays.insert(day)
        }
    }
}

/// Shared validation for scheduling inputs.
pub(crate) fn validate_shape(number_of_weeks: u32, weekdays: &WeekdaySet) -> Result<()> {
    if number_of_weeks < 1 {
        return Err(CoachError::invalid_spec("number_of_weeks").with_reason("must be at least 1"));
    }
    if weekdays.is_empty() {
        return Err(
            CoachError::invalid_spec("weekdays").with_reason("at least one weekday must be selected")
        );
    }
    Ok(())
}

/// Free-form program description. The core only reads `name` and
/// `description`; everything else rides along in `details`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProgramMetadata {
    /// Display name of the program
    pub name: String,

    /// Coach-provided description and requirements
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Goal, difficulty, equipment and any other opaque settings
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub details: Map<String, Value>,
}

impl ProgramMetadata {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Returns a detail rendered as text, joining arrays with commas.
    pub fn detail_text(&self, key: &str) -> Option<String> {
        match self.details.get(key)? {
            Value::Null => None,
            Value::String(s) if s.trim().is_empty() => None,
            Value::String(s) => Some(s.clone()),
            Value::Array(items) if items.is_empty() => None,
            Value::Array(items) => Some(
                items
                    .iter()
                    .map(|item| match item {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(", "),
            ),
            other => Some(other.to_string()),
        }
    }
}

/// A persisted program.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Program {
    /// Unique identifier for the program
    pub id: u64,

    pub metadata: ProgramMetadata,

    pub spec: ProgramSpec,

    /// Date of the last scheduled workout, when known
    pub end_date: Option<Date>,

    /// Timestamp when the program was created (UTC)
    pub created_at: Timestamp,

    /// Timestamp when the program was last updated (UTC)
    pub updated_at: Timestamp,
}
