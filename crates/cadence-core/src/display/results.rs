//! Result wrapper types for displaying operation outcomes.

use std::fmt;

use crate::{
    coach::workout_ops::ImportOutcome,
    models::{Program, ProgramState, WorkoutRecord},
    reconcile::ReconcileReport,
};

/// Wrapper type for displaying the result of create operations.
pub struct CreateResult<T> {
    pub resource: T,
}

impl<T> CreateResult<T> {
    pub fn new(resource: T) -> Self {
        Self { resource }
    }
}

impl fmt::Display for CreateResult<Program> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Created program with ID: {}", self.resource.id)?;
        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

impl fmt::Display for CreateResult<WorkoutRecord> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.resource.is_reference {
            "reference workout"
        } else {
            "workout"
        };
        writeln!(f, "Created {kind} with ID: {}", self.resource.id)?;
        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

/// Wrapper type for displaying the result of update operations, with an
/// optional list of the changes made.
///
/// # Examples
///
/// ```rust
/// use cadence_core::{
///     display::UpdateResult,
///     models::{ProgramMetadata, ProgramSpec, ProgramState},
/// };
/// use jiff::civil::date;
///
/// let state = ProgramState {
///     program_id: 4,
///     spec: ProgramSpec::new(date(2024, 6, 3), 4, "mon,thu".parse().unwrap()),
///     metadata: ProgramMetadata::new("Base"),
///     workouts: vec![],
/// };
///
/// let result = UpdateResult::with_changes(state, vec!["Set 4 week(s)".to_string()]);
/// let output = result.to_string();
/// assert!(output.contains("Updated program with ID: 4"));
/// assert!(output.contains("- Set 4 week(s)"));
/// ```
pub struct UpdateResult<T> {
    pub resource: T,
    pub changes: Vec<String>,
}

impl<T> UpdateResult<T> {
    pub fn new(resource: T) -> Self {
        Self {
            resource,
            changes: Vec::new(),
        }
    }

    pub fn with_changes(resource: T, changes: Vec<String>) -> Self {
        Self { resource, changes }
    }

    fn fmt_changes(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.changes.is_empty() {
            writeln!(f)?;
            writeln!(f, "Changes made:")?;
            for change in &self.changes {
                writeln!(f, "- {change}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for UpdateResult<ProgramState> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Updated program with ID: {}", self.resource.program_id)?;
        self.fmt_changes(f)?;
        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

impl fmt::Display for UpdateResult<WorkoutRecord> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Updated workout with ID: {}", self.resource.id)?;
        self.fmt_changes(f)?;
        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

/// Wrapper type for displaying the result of delete operations.
pub struct DeleteResult<T> {
    pub resource: T,
}

impl<T> DeleteResult<T> {
    pub fn new(resource: T) -> Self {
        Self { resource }
    }
}

impl fmt::Display for DeleteResult<Program> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Deleted program '{}' (ID: {})",
            self.resource.metadata.name, self.resource.id
        )
    }
}

impl fmt::Display for DeleteResult<WorkoutRecord> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Deleted workout '{}' (ID: {})",
            self.resource.title, self.resource.id
        )
    }
}

impl fmt::Display for ReconcileReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} workout(s) replaced, {} written, {} scheduled",
            self.deleted_workouts, self.inserted_workouts, self.scheduled_workouts
        )
    }
}

impl fmt::Display for ImportOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Imported {} workout(s) into program {}: {}",
            self.workouts.len(),
            self.program.id,
            self.report
        )?;
        writeln!(f)?;
        for workout in &self.workouts {
            write!(f, "{workout}")?;
        }
        Ok(())
    }
}
