//! High-level async API for managing training programs.
//!
//! [`Coach`] is the entry point for every interface. It owns the database
//! path and a [`Scheduler`], and runs each store call on tokio's blocking
//! pool with its own SQLite connection.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │     Coach       │    │ schedule,       │    │    Database     │
//! │ (program_ops,   │───▶│ normalize,      │───▶│   (via store)   │
//! │  workout_ops)   │    │ reconcile       │    │                 │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use cadence_core::{CoachBuilder, params::{CreateProgram, ImportGeneration}};
//! use jiff::civil::date;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let coach = CoachBuilder::new()
//!     .with_database_path(Some("/tmp/cadence.db"))
//!     .build()
//!     .await?;
//!
//! let program = coach
//!     .create_program(&CreateProgram {
//!         name: "Summer Strength".to_string(),
//!         description: None,
//!         start_date: date(2024, 6, 3),
//!         number_of_weeks: 4,
//!         weekdays: "mon,wed,fri".parse()?,
//!         details: Default::default(),
//!     })
//!     .await?;
//!
//! let prompt = coach.build_prompt(program.id).await?;
//! # let reply = String::new();
//! // Send `prompt` to a model, then import its reply.
//! coach
//!     .import_generation(&ImportGeneration {
//!         program_id: program.id,
//!         response: reply,
//!         update_description: true,
//!     })
//!     .await?;
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};

use tokio::task;

use crate::{
    db::Database,
    error::{CoachError, Result},
    schedule::Scheduler,
};

pub mod builder;
pub mod program_ops;
pub mod session;
pub mod workout_ops;


pub use builder::CoachBuilder;

/// Main interface for managing programs and their workouts.
#[derive(Debug, Clone)]
pub struct Coach {
    pub(crate) db_path: PathBuf,
    pub(crate) scheduler: Scheduler,
}

impl Coach {
    pub(crate) fn new(db_path: PathBuf, scheduler: Scheduler) -> Self {
        Self { db_path, scheduler }
    }

    pub fn database_path(&self) -> &Path {
        &self.db_path
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Opens a connection on the blocking pool and runs `op` against it.
    pub(crate) async fn with_database<T, F>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&mut Database) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let db_path = self.db_path.clone();

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            op(&mut db)
        })
        .await
        .map_err(|e| CoachError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }
}
