//! The persistence seam used by reconciliation.

use jiff::civil::Date;

use crate::{
    db::Database,
    error::Result,
    models::{NewWorkout, WorkoutRecord, WorkoutScope},
};

/// Workout bodies and their schedule entries, as two record sets.
///
/// Every method is a single store call; callers decide how calls are
/// staged. Only [`delete_workouts`](WorkoutStore::delete_workouts) and
/// [`delete_schedule_entries`](WorkoutStore::delete_schedule_entries) touch
/// more than one record, and both spare reference workouts.
pub trait WorkoutStore {
    fn list_workouts(&self, program_id: u64, scope: WorkoutScope) -> Result<Vec<WorkoutRecord>>;

    /// Deletes the program's non-reference workouts.
    fn delete_workouts(&mut self, program_id: u64) -> Result<usize>;

    /// Inserts workouts, returning stored records in input order.
    fn insert_workouts(&mut self, workouts: &[NewWorkout]) -> Result<Vec<WorkoutRecord>>;

    fn upsert_schedule_entry(&mut self, program_id: u64, workout_id: u64, date: Date) -> Result<()>;

    /// Deletes the schedule entries of the program's non-reference workouts.
    fn delete_schedule_entries(&mut self, program_id: u64) -> Result<usize>;

    fn get_workout(&self, id: u64) -> Result<Option<WorkoutRecord>>;

    /// Updates title and body; returns false when the workout is missing.
    fn update_workout_content(&mut self, id: u64, title: &str, body: &str) -> Result<bool>;

    /// Updates the dedicated date field; returns false when the workout is
    /// missing.
    fn set_workout_date(&mut self, id: u64, date: Date) -> Result<bool>;

    /// Deletes one workout and its schedule entry; returns false when the
    /// workout is missing.
    fn delete_workout(&mut self, id: u64) -> Result<bool>;
}

impl WorkoutStore for Database {
    fn list_workouts(&self, program_id: u64, scope: WorkoutScope) -> Result<Vec<WorkoutRecord>> {
        Database::list_workouts(self, program_id, scope)
    }

    fn delete_workouts(&mut self, program_id: u64) -> Result<usize> {
        self.delete_generated_workouts(program_id)
    }

    fn insert_workouts(&mut self, workouts: &[NewWorkout]) -> Result<Vec<WorkoutRecord>> {
        Database::insert_workouts(self, workouts)
    }

    fn upsert_schedule_entry(&mut self, program_id: u64, workout_id: u64, date: Date) -> Result<()> {
        Database::upsert_schedule_entry(self, program_id, workout_id, date)
    }

    fn delete_schedule_entries(&mut self, program_id: u64) -> Result<usize> {
        Database::delete_schedule_entries(self, program_id)
    }

    fn get_workout(&self, id: u64) -> Result<Option<WorkoutRecord>> {
        Database::get_workout(self, id)
    }

    fn update_workout_content(&mut self, id: u64, title: &str, body: &str) -> Result<bool> {
        Database::update_workout_content(self, id, title, body)
    }

    fn set_workout_date(&mut self, id: u64, date: Date) -> Result<bool> {
        Database::set_workout_date(self, id, Some(date))
    }

    fn delete_workout(&mut self, id: u64) -> Result<bool> {
        Database::delete_workout(self, id)
    }
}
