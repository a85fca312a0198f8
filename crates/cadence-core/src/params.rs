//! Parameter structures for Cadence operations.
//!
//! These structures are shared by every interface and carry no framework
//! derives beyond serde. Interface layers define their own argument types
//! (for example clap `Args` in the CLI) and convert into these via `From`.

use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::{ProgramMetadata, ProgramSpec, WeekdaySet};

/// Generic parameters for operations requiring just an ID.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Id {
    /// The ID of the resource to operate on
    pub id: u64,
}

/// Parameters for computing a schedule without storing anything.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule {
    pub start_date: Date,
    pub number_of_weeks: u32,
    pub weekdays: WeekdaySet,
}

/// Parameters for creating a new program.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProgram {
    /// Display name (required)
    pub name: String,
    /// Coach-provided description and requirements
    pub description: Option<String>,
    pub start_date: Date,
    pub number_of_weeks: u32,
    pub weekdays: WeekdaySet,
    /// Goal, difficulty, equipment and other free-form settings
    #[serde(default)]
    pub details: Map<String, Value>,
}

impl CreateProgram {
    pub fn metadata(&self) -> ProgramMetadata {
        ProgramMetadata {
            name: self.name.clone(),
            description: self.description.clone(),
            details: self.details.clone(),
        }
    }

    pub fn spec(&self) -> ProgramSpec {
        ProgramSpec::new(self.start_date, self.number_of_weeks, self.weekdays)
    }
}

/// Parameters for listing programs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListPrograms {
    /// Case-insensitive name fragment to filter by
    pub name: Option<String>,
}

/// Edits to a program's metadata or shape. Unset fields keep their value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProgram {
    pub id: u64,
    pub name: Option<String>,
    pub description: Option<String>,
    pub number_of_weeks: Option<u32>,
    /// Replaces the weekday selection
    pub weekdays: Option<WeekdaySet>,
    /// Grows or shrinks the weekday selection; applied after `weekdays`
    pub days_per_week: Option<usize>,
    /// Details to merge into the existing ones
    #[serde(default)]
    pub details: Map<String, Value>,
}

impl UpdateProgram {
    /// True when no field would change anything.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.number_of_weeks.is_none()
            && self.weekdays.is_none()
            && self.days_per_week.is_none()
            && self.details.is_empty()
    }

    /// Applies the edits to an editor's copy of the program.
    pub fn apply(&self, metadata: &mut ProgramMetadata, spec: &mut ProgramSpec) {
        if let Some(name) = &self.name {
            metadata.name = name.clone();
        }
        if let Some(description) = &self.description {
            metadata.description = Some(description.clone()).filter(|d| !d.trim().is_empty());
        }
        for (key, value) in &self.details {
            metadata.details.insert(key.clone(), value.clone());
        }
        if let Some(weeks) = self.number_of_weeks {
            spec.number_of_weeks = weeks;
        }
        if let Some(weekdays) = self.weekdays {
            spec.weekdays = weekdays;
        }
        if let Some(days) = self.days_per_week {
            spec.set_days_per_week(days);
        }
    }
}

/// Parameters for moving a program to a new start date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RescheduleProgram {
    pub id: u64,
    pub start_date: Date,
}

/// Parameters for importing a raw generation response into a program.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportGeneration {
    pub program_id: u64,
    /// Reply text, possibly wrapping the JSON in prose or a code fence
    pub response: String,
    /// Copy the response's program description onto the program
    #[serde(default)]
    pub update_description: bool,
}

/// Parameters for adding a reference workout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddReference {
    pub program_id: u64,
    pub title: String,
    pub body: String,
    pub date: Option<Date>,
}

/// Parameters for dating one workout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignDate {
    pub workout_id: u64,
    pub date: Date,
}

/// Parameters for editing one workout's content.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EditWorkout {
    pub workout_id: u64,
    pub title: Option<String>,
    pub body: Option<String>,
}
