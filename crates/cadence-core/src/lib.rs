//! Core library for the Cadence training program builder.
//!
//! Cadence turns a program shape (start date, weeks, weekdays) into a dated
//! schedule, normalizes generated workout payloads into a canonical form,
//! and keeps the stored workouts of a program in line with an editor's
//! state.
//!
//! - [`schedule`]: calendar scheduling, pure and deterministic
//! - [`normalize`]: generated payloads to [`CanonicalWorkout`]
//! - [`reconcile`]: staged delete-then-insert against a [`WorkoutStore`]
//! - [`autosave`]: debounced, single-flight saving of a program state
//! - [`coach`]: the async facade over the SQLite store
//! - [`display`]: markdown rendering of models and operation results
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use cadence_core::{CoachBuilder, params::{CreateProgram, Schedule}};
//! use jiff::civil::date;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let coach = CoachBuilder::new()
//!     .with_database_path(Some("test.db"))
//!     .build()
//!     .await?;
//!
//! let slots = coach.schedule(&Schedule {
//!     start_date: date(2030, 6, 3),
//!     number_of_weeks: 2,
//!     weekdays: "mon,wed,fri".parse()?,
//! })?;
//! assert_eq!(slots.len(), 6);
//!
//! let program = coach
//!     .create_program(&CreateProgram {
//!         name: "Summer Strength".to_string(),
//!         description: Some("Squat twice a week".to_string()),
//!         start_date: date(2030, 6, 3),
//!         number_of_weeks: 2,
//!         weekdays: "mon,wed,fri".parse()?,
//!         details: Default::default(),
//!     })
//!     .await?;
//! println!("{program}");
//! # Ok(())
//! # }
//! ```

pub mod autosave;
pub mod coach;
pub mod db;
pub mod display;
pub mod error;
pub mod models;
pub mod normalize;
pub mod params;
pub mod prompt;
pub mod reconcile;
pub mod schedule;
pub mod store;

// Re-export commonly used types
pub use autosave::{AutosaveConfig, AutosaveController, ProgramWriter};
pub use coach::{Coach, CoachBuilder, workout_ops::ImportOutcome};
pub use db::Database;
pub use display::{
    CreateResult, DeleteResult, OperationStatus, ProgramSummaries, Slots, UpdateResult, Workouts,
};
pub use error::{CoachError, ErrorKind, Result};
pub use models::{
    CanonicalWorkout, Program, ProgramMetadata, ProgramSpec, ProgramState, ProgramSummary,
    SaveState, ScheduledSlot, WeekdaySet, WorkoutRecord, WorkoutScope,
};
pub use normalize::{coerce_workouts_array, normalize, parse_generation_response};
pub use reconcile::{ReconcileReport, reconcile};
pub use schedule::Scheduler;
pub use store::WorkoutStore;
