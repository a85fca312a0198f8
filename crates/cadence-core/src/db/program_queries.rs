//! Program CRUD operations and queries.

use jiff::{Timestamp, civil::Date};
use rusqlite::{OptionalExtension, params};

use super::utils::{parse_json_map, parse_optional_text, parse_text, weekdays_to_sql};
use crate::{
    error::{DatabaseResultExt, Result},
    models::{Program, ProgramMetadata, ProgramSpec, ProgramSummary},
};

const INSERT_PROGRAM_SQL: &str = "INSERT INTO programs (name, description, details, start_date, number_of_weeks, weekdays, end_date, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)";
const SELECT_PROGRAM_SQL: &str = "SELECT id, name, description, details, start_date, number_of_weeks, weekdays, end_date, created_at, updated_at FROM programs WHERE id = ?1";
const UPDATE_PROGRAM_SQL: &str = "UPDATE programs SET name = ?1, description = ?2, details = ?3, start_date = ?4, number_of_weeks = ?5, weekdays = ?6, end_date = ?7, updated_at = ?8 WHERE id = ?9";
const DELETE_PROGRAM_SQL: &str = "DELETE FROM programs WHERE id = ?1";
const TOUCH_PROGRAM_SQL: &str = "UPDATE programs SET updated_at = ?1 WHERE id = ?2";
const LIST_PROGRAM_SUMMARIES_SQL: &str = "SELECT p.id, p.name, p.description, p.details, p.start_date, p.number_of_weeks, p.weekdays, p.end_date, p.created_at, p.updated_at, \
     (SELECT COUNT(*) FROM workouts w WHERE w.program_id = p.id AND w.is_reference = 0), \
     (SELECT COUNT(*) FROM workouts w WHERE w.program_id = p.id AND w.is_reference = 1) \
     FROM programs p";

impl super::Database {
    /// Helper function to construct a Program from a database row
    fn build_program_from_row(row: &rusqlite::Row) -> rusqlite::Result<Program> {
        Ok(Program {
            id: row.get::<_, i64>(0)? as u64,
            metadata: ProgramMetadata {
                name: row.get(1)?,
                description: row.get(2)?,
                details: parse_json_map(row, 3)?,
            },
            spec: ProgramSpec {
                start_date: parse_text(row, 4)?,
                number_of_weeks: row.get::<_, i64>(5)? as u32,
                weekdays: parse_text(row, 6)?,
            },
            end_date: parse_optional_text(row, 7)?,
            created_at: parse_text(row, 8)?,
            updated_at: parse_text(row, 9)?,
        })
    }

    /// Creates a new program.
    pub fn create_program(
        &mut self,
        metadata: &ProgramMetadata,
        spec: &ProgramSpec,
        end_date: Option<Date>,
    ) -> Result<Program> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let now = Timestamp::now();
        let now_str = now.to_string();
        let details = serde_json::to_string(&metadata.details)?;

        tx.execute(
            INSERT_PROGRAM_SQL,
            params![
                metadata.name,
                metadata.description,
                details,
                spec.start_date.to_string(),
                spec.number_of_weeks as i64,
                weekdays_to_sql(&spec.weekdays),
                end_date.map(|d| d.to_string()),
                &now_str,
                &now_str
            ],
        )
        .db_context("Failed to insert program")?;

        let id = tx.last_insert_rowid() as u64;

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(Program {
            id,
            metadata: metadata.clone(),
            spec: spec.clone(),
            end_date,
            created_at: now,
            updated_at: now,
        })
    }

    /// Retrieves a program by its ID.
    pub fn get_program(&self, id: u64) -> Result<Option<Program>> {
        self.connection
            .query_row(SELECT_PROGRAM_SQL, params![id as i64], Self::build_program_from_row)
            .optional()
            .db_context("Failed to query program")
    }

    /// Lists programs, newest first, optionally filtered by a case-insensitive
    /// name fragment.
    pub fn list_programs(&self, name_contains: Option<&str>) -> Result<Vec<ProgramSummary>> {
        let mut query = LIST_PROGRAM_SUMMARIES_SQL.to_string();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(name) = name_contains {
            query.push_str(" WHERE p.name LIKE ?");
            params_vec.push(Box::new(format!("%{name}%")));
        }
        query.push_str(" ORDER BY p.created_at DESC, p.id DESC");

        let mut stmt = self
            .connection
            .prepare(&query)
            .db_context("Failed to prepare query")?;

        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|b| &**b).collect();

        stmt.query_map(&params_refs[..], |row| {
            let program = Self::build_program_from_row(row)?;
            let workout_count: i64 = row.get(10)?;
            let reference_count: i64 = row.get(11)?;
            Ok(ProgramSummary::from_program(
                program,
                workout_count as u32,
                reference_count as u32,
            ))
        })
        .db_context("Failed to query programs")?
        .collect::<std::result::Result<Vec<_>, _>>()
        .db_context("Failed to fetch programs")
    }

    /// Replaces a program's metadata, spec and end date. Returns the updated
    /// program, or `None` if it does not exist.
    pub fn update_program(
        &mut self,
        id: u64,
        metadata: &ProgramMetadata,
        spec: &ProgramSpec,
        end_date: Option<Date>,
    ) -> Result<Option<Program>> {
        let details = serde_json::to_string(&metadata.details)?;
        let rows_affected = self
            .connection
            .execute(
                UPDATE_PROGRAM_SQL,
                params![
                    metadata.name,
                    metadata.description,
                    details,
                    spec.start_date.to_string(),
                    spec.number_of_weeks as i64,
                    weekdays_to_sql(&spec.weekdays),
                    end_date.map(|d| d.to_string()),
                    Timestamp::now().to_string(),
                    id as i64
                ],
            )
            .db_context("Failed to update program")?;

        if rows_affected == 0 {
            return Ok(None);
        }
        self.get_program(id)
    }

    /// Bumps a program's `updated_at`.
    pub fn touch_program(&mut self, id: u64) -> Result<()> {
        self.connection
            .execute(TOUCH_PROGRAM_SQL, params![Timestamp::now().to_string(), id as i64])
            .db_context("Failed to update program timestamp")?;
        Ok(())
    }

    /// Deletes a program together with its workouts and schedule entries.
    /// Returns the deleted program, or `None` if it did not exist.
    pub fn delete_program(&mut self, id: u64) -> Result<Option<Program>> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let program = tx
            .query_row(SELECT_PROGRAM_SQL, params![id as i64], Self::build_program_from_row)
            .optional()
            .db_context("Failed to query program")?;

        if program.is_some() {
            tx.execute(DELETE_PROGRAM_SQL, params![id as i64])
                .db_context("Failed to delete program")?;
        }

        tx.commit().db_context("Failed to commit transaction")?;
        Ok(program)
    }
}
