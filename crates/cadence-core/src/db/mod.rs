//! Database operations and SQLite management for programs and workouts.
//!
//! Workout bodies and their schedule assignments live in two tables. The
//! query modules expose each table's operations on [`Database`]; the
//! [`WorkoutStore`](crate::store::WorkoutStore) trait bundles the subset the
//! reconciliation engine needs.

use std::path::Path;

use rusqlite::Connection;

use crate::error::{DatabaseResultExt, Result};

pub mod program_queries;
pub mod schedule_queries;
pub mod schema;
pub mod utils;
pub mod workout_queries;

/// Database connection and operations handler.
pub struct Database {
    connection: Connection,
}

impl Database {
    /// Creates a new database connection and initializes the schema.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = Connection::open(path).db_context("Failed to open database connection")?;

        let db = Self { connection };
        db.initialize_schema()?;
        Ok(db)
    }
}
