//! Workout CRUD operations and queries.

use jiff::{Timestamp, civil::Date};
use rusqlite::{OptionalExtension, params};

use super::utils::{parse_json_map, parse_optional_text, parse_text};
use crate::{
    error::{CoachError, DatabaseResultExt, Result},
    models::{NewWorkout, WorkoutRecord, WorkoutScope},
};

const WORKOUT_COLUMNS: &str = "id, program_id, title, body, tags, scheduled_date, is_reference, position, created_at, updated_at";
const CHECK_PROGRAM_EXISTS_SQL: &str = "SELECT EXISTS(SELECT 1 FROM programs WHERE id = ?1)";
const INSERT_WORKOUT_SQL: &str = "INSERT INTO workouts (program_id, title, body, tags, scheduled_date, is_reference, position, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)";
const DELETE_GENERATED_WORKOUTS_SQL: &str =
    "DELETE FROM workouts WHERE program_id = ?1 AND is_reference = 0";
const UPDATE_WORKOUT_CONTENT_SQL: &str =
    "UPDATE workouts SET title = ?1, body = ?2, updated_at = ?3 WHERE id = ?4";
const UPDATE_WORKOUT_DATE_SQL: &str =
    "UPDATE workouts SET scheduled_date = ?1, updated_at = ?2 WHERE id = ?3";
const DELETE_WORKOUT_SQL: &str = "DELETE FROM workouts WHERE id = ?1";

impl WorkoutScope {
    fn sql_condition(&self) -> &'static str {
        match self {
            WorkoutScope::Generated => " AND is_reference = 0",
            WorkoutScope::Reference => " AND is_reference = 1",
            WorkoutScope::All => "",
        }
    }
}

impl super::Database {
    /// Helper function to construct a WorkoutRecord from a database row
    fn build_workout_from_row(row: &rusqlite::Row) -> rusqlite::Result<WorkoutRecord> {
        Ok(WorkoutRecord {
            id: row.get::<_, i64>(0)? as u64,
            program_id: row.get::<_, i64>(1)? as u64,
            title: row.get(2)?,
            body: row.get(3)?,
            tags: parse_json_map(row, 4)?,
            scheduled_date: parse_optional_text::<Date>(row, 5)?,
            is_reference: row.get(6)?,
            position: row.get::<_, i64>(7)? as u32,
            created_at: parse_text(row, 8)?,
            updated_at: parse_text(row, 9)?,
        })
    }

    /// Lists a program's workouts: references first, then by position.
    pub fn list_workouts(&self, program_id: u64, scope: WorkoutScope) -> Result<Vec<WorkoutRecord>> {
        let query = format!(
            "SELECT {WORKOUT_COLUMNS} FROM workouts WHERE program_id = ?1{} \
             ORDER BY is_reference DESC, position, id",
            scope.sql_condition()
        );

        let mut stmt = self
            .connection
            .prepare(&query)
            .db_context("Failed to prepare query")?;

        stmt.query_map(params![program_id as i64], Self::build_workout_from_row)
            .db_context("Failed to query workouts")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to fetch workouts")
    }

    /// Retrieves a workout by its ID.
    pub fn get_workout(&self, id: u64) -> Result<Option<WorkoutRecord>> {
        let query = format!("SELECT {WORKOUT_COLUMNS} FROM workouts WHERE id = ?1");
        self.connection
            .query_row(&query, params![id as i64], Self::build_workout_from_row)
            .optional()
            .db_context("Failed to query workout")
    }

    /// Inserts workouts in one transaction, returning the stored records in
    /// input order.
    pub fn insert_workouts(&mut self, workouts: &[NewWorkout]) -> Result<Vec<WorkoutRecord>> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let now = Timestamp::now();
        let now_str = now.to_string();
        let mut records = Vec::with_capacity(workouts.len());

        for workout in workouts {
            let exists: bool = tx
                .query_row(
                    CHECK_PROGRAM_EXISTS_SQL,
                    params![workout.program_id as i64],
                    |row| row.get(0),
                )
                .db_context("Failed to check program existence")?;
            if !exists {
                return Err(CoachError::ProgramNotFound {
                    id: workout.program_id,
                });
            }

            let tags = serde_json::to_string(&workout.tags)?;
            tx.execute(
                INSERT_WORKOUT_SQL,
                params![
                    workout.program_id as i64,
                    workout.title,
                    workout.body,
                    tags,
                    workout.scheduled_date.map(|d| d.to_string()),
                    workout.is_reference,
                    workout.position as i64,
                    &now_str,
                    &now_str
                ],
            )
            .db_context("Failed to insert workout")?;

            records.push(WorkoutRecord {
                id: tx.last_insert_rowid() as u64,
                program_id: workout.program_id,
                title: workout.title.clone(),
                body: workout.body.clone(),
                tags: workout.tags.clone(),
                scheduled_date: workout.scheduled_date,
                is_reference: workout.is_reference,
                position: workout.position,
                created_at: now,
                updated_at: now,
            });
        }

        tx.commit().db_context("Failed to commit transaction")?;
        Ok(records)
    }

    /// Deletes every non-reference workout of a program. Their schedule
    /// entries go with them.
    pub fn delete_generated_workouts(&mut self, program_id: u64) -> Result<usize> {
        self.connection
            .execute(DELETE_GENERATED_WORKOUTS_SQL, params![program_id as i64])
            .db_context("Failed to delete workouts")
    }

    /// Updates title and body only. Returns false if the workout is missing.
    pub fn update_workout_content(&mut self, id: u64, title: &str, body: &str) -> Result<bool> {
        let rows_affected = self
            .connection
            .execute(
                UPDATE_WORKOUT_CONTENT_SQL,
                params![title, body, Timestamp::now().to_string(), id as i64],
            )
            .db_context("Failed to update workout")?;
        Ok(rows_affected > 0)
    }

    /// Sets the dedicated date field. Returns false if the workout is missing.
    pub fn set_workout_date(&mut self, id: u64, date: Option<Date>) -> Result<bool> {
        let rows_affected = self
            .connection
            .execute(
                UPDATE_WORKOUT_DATE_SQL,
                params![date.map(|d| d.to_string()), Timestamp::now().to_string(), id as i64],
            )
            .db_context("Failed to update workout date")?;
        Ok(rows_affected > 0)
    }

    /// Deletes one workout. Returns false if it did not exist.
    pub fn delete_workout(&mut self, id: u64) -> Result<bool> {
        let rows_affected = self
            .connection
            .execute(DELETE_WORKOUT_SQL, params![id as i64])
            .db_context("Failed to delete workout")?;
        Ok(rows_affected > 0)
    }
}
