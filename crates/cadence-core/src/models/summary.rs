//! Program summary types.

use jiff::{Timestamp, civil::Date};
use serde::{Deserialize, Serialize};

use super::{Program, WeekdaySet};

/// Summary information about a program with workout counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgramSummary {
    pub id: u64,
    pub name: String,
    pub description: Option<String>,
    pub start_date: Date,
    pub end_date: Option<Date>,
    pub number_of_weeks: u32,
    pub weekdays: WeekdaySet,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    /// Number of generated workouts
    pub workout_count: u32,
    /// Number of reference workouts
    pub reference_count: u32,
}

impl ProgramSummary {
    /// Create a ProgramSummary from a Program and workout counts
    pub fn from_program(program: Program, workout_count: u32, reference_count: u32) -> Self {
        Self {
            id: program.id,
            name: program.metadata.name,
            description: program.metadata.description,
            start_date: program.spec.start_date,
            end_date: program.end_date,
            number_of_weeks: program.spec.number_of_weeks,
            weekdays: program.spec.weekdays,
            created_at: program.created_at,
            updated_at: program.updated_at,
            workout_count,
            reference_count,
        }
    }
}
