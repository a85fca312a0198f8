//! Canonical workouts and their persisted records.

use jiff::{Timestamp, civil::Date};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Free-form workout tags, kept in insertion order.
pub type Tags = Map<String, Value>;

/// The normalized representation every downstream step works with.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CanonicalWorkout {
    pub title: String,

    /// Markdown-like body with `## Section` headers
    pub body: String,

    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub tags: Tags,

    pub scheduled_date: Option<Date>,

    /// Store-assigned id; `None` until the record exists
    #[serde(default)]
    pub persisted_id: Option<u64>,

    /// User-supplied style example, never touched by reconciliation
    #[serde(default)]
    pub is_reference: bool,
}

impl CanonicalWorkout {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            tags: Tags::new(),
            scheduled_date: None,
            persisted_id: None,
            is_reference: false,
        }
    }

    /// Creates a reference workout.
    pub fn reference(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            is_reference: true,
            ..Self::new(title, body)
        }
    }

    pub fn with_date(mut self, date: Date) -> Self {
        self.scheduled_date = Some(date);
        self
    }

    /// Compares everything except the store-assigned id.
    pub fn same_content(&self, other: &CanonicalWorkout) -> bool {
        self.title == other.title
            && self.body == other.body
            && self.tags == other.tags
            && self.scheduled_date == other.scheduled_date
            && self.is_reference == other.is_reference
    }
}

impl From<&WorkoutRecord> for CanonicalWorkout {
    fn from(record: &WorkoutRecord) -> Self {
        Self {
            title: record.title.clone(),
            body: record.body.clone(),
            tags: record.tags.clone(),
            scheduled_date: record.scheduled_date,
            persisted_id: Some(record.id),
            is_reference: record.is_reference,
        }
    }
}

/// Which workouts of a program a query covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkoutScope {
    /// Only workouts produced by generation or manual entry
    Generated,
    /// Only reference workouts
    Reference,
    #[default]
    All,
}

/// A workout row in the backing store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkoutRecord {
    pub id: u64,

    /// ID of the parent program
    pub program_id: u64,

    pub title: String,

    pub body: String,

    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub tags: Tags,

    /// Dedicated schedule field; mirrors the schedule entry
    pub scheduled_date: Option<Date>,

    pub is_reference: bool,

    /// Order of the workout within the program (0-indexed)
    pub position: u32,

    pub created_at: Timestamp,

    pub updated_at: Timestamp,
}

/// A workout about to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewWorkout {
    pub program_id: u64,
    pub title: String,
    pub body: String,
    pub tags: Tags,
    pub scheduled_date: Option<Date>,
    pub is_reference: bool,
    pub position: u32,
}

impl NewWorkout {
    pub fn from_canonical(program_id: u64, position: u32, workout: &CanonicalWorkout) -> Self {
        Self {
            program_id,
            title: workout.title.clone(),
            body: workout.body.clone(),
            tags: workout.tags.clone(),
            scheduled_date: workout.scheduled_date,
            is_reference: workout.is_reference,
            position,
        }
    }
}

/// A date assignment for one workout; at most one exists per workout.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScheduleEntry {
    pub program_id: u64,
    pub workout_id: u64,
    pub scheduled_date: Date,
}
