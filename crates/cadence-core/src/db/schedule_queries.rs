//! Schedule entry operations.

use jiff::civil::Date;
use rusqlite::params;

use super::utils::parse_text;
use crate::{
    error::{DatabaseResultExt, Result},
    models::ScheduleEntry,
};

const DELETE_GENERATED_SCHEDULE_SQL: &str = "DELETE FROM workout_schedule WHERE program_id = ?1 AND workout_id IN (SELECT id FROM workouts WHERE program_id = ?1 AND is_reference = 0)";
const UPSERT_SCHEDULE_SQL: &str = "INSERT INTO workout_schedule (program_id, workout_id, scheduled_date) VALUES (?1, ?2, ?3) \
     ON CONFLICT(workout_id) DO UPDATE SET program_id = excluded.program_id, scheduled_date = excluded.scheduled_date";
const SELECT_SCHEDULE_SQL: &str = "SELECT program_id, workout_id, scheduled_date FROM workout_schedule WHERE program_id = ?1 ORDER BY scheduled_date, workout_id";

impl super::Database {
    /// Removes the schedule entries of a program's non-reference workouts.
    pub fn delete_schedule_entries(&mut self, program_id: u64) -> Result<usize> {
        self.connection
            .execute(DELETE_GENERATED_SCHEDULE_SQL, params![program_id as i64])
            .db_context("Failed to delete schedule entries")
    }

    /// Creates or moves the schedule entry for a workout.
    pub fn upsert_schedule_entry(&mut self, program_id: u64, workout_id: u64, date: Date) -> Result<()> {
        self.connection
            .execute(
                UPSERT_SCHEDULE_SQL,
                params![program_id as i64, workout_id as i64, date.to_string()],
            )
            .db_context("Failed to upsert schedule entry")?;
        Ok(())
    }

    /// Lists a program's schedule entries in date order.
    pub fn list_schedule_entries(&self, program_id: u64) -> Result<Vec<ScheduleEntry>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_SCHEDULE_SQL)
            .db_context("Failed to prepare query")?;

        stmt.query_map(params![program_id as i64], |row| {
            Ok(ScheduleEntry {
                program_id: row.get::<_, i64>(0)? as u64,
                workout_id: row.get::<_, i64>(1)? as u64,
                scheduled_date: parse_text(row, 2)?,
            })
        })
        .db_context("Failed to query schedule entries")?
        .collect::<std::result::Result<Vec<_>, _>>()
        .db_context("Failed to fetch schedule entries")
    }
}
