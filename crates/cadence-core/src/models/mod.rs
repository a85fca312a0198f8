//! Data models for programs, workouts and schedules.
//!
//! Display implementations for these models live in
//! [`crate::display::models`], keeping the data structures free of
//! presentation logic.
//!
//! # Examples
//!
//! ```rust
//! use cadence_core::models::{ProgramSpec, WeekdaySet};
//! use jiff::civil::date;
//!
//! let mut spec = ProgramSpec::new(date(2024, 6, 3), 2, "mon,wed,fri".parse().unwrap());
//! assert_eq!(spec.days_per_week(), 3);
//! assert_eq!(spec.total_workouts(), 6);
//!
//! spec.set_days_per_week(4);
//! assert_eq!(spec.weekdays.to_string(), "Mon, Tue, Wed, Fri");
//! # let _ = WeekdaySet::all();
//! ```

pub mod program;
pub mod slot;
pub mod state;
pub mod status;
pub mod summary;
pub mod weekday;
pub mod workout;

#[cfg(test)]
mod tests;

pub use program::{Program, ProgramMetadata, ProgramSpec};
pub use slot::ScheduledSlot;
pub use state::ProgramState;
pub use status::SaveState;
pub use summary::ProgramSummary;
pub use weekday::{WeekdaySet, parse_weekday, weekday_abbrev, weekday_name};
pub use workout::{CanonicalWorkout, NewWorkout, ScheduleEntry, Tags, WorkoutRecord, WorkoutScope};
