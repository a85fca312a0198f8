//! Display formatting for domain models and operation results.
//!
//! Domain models implement `Display` directly; newtype wrappers cover
//! collections and the outcome of create, update and delete operations.
//! Everything renders as markdown so the CLI can pass it through a terminal
//! renderer unchanged.
//!
//! - [`collections`]: [`ProgramSummaries`], [`Workouts`], [`Slots`]
//! - [`results`]: [`CreateResult`], [`UpdateResult`], [`DeleteResult`]
//! - [`status`]: [`OperationStatus`]
//! - [`datetime`]: [`LocalDateTime`], [`DayDate`]
//! - [`models`]: `Display` for programs, workouts and slots
//!
//! ```rust
//! use cadence_core::display::OperationStatus;
//!
//! let status = OperationStatus::success("Program saved");
//! assert_eq!(status.to_string(), "Success: Program saved\n");
//! ```

pub mod collections;
pub mod datetime;
pub mod models;
pub mod results;
pub mod status;

pub use collections::{ProgramSummaries, Slots, Workouts};
pub use datetime::{DayDate, LocalDateTime};
pub use results::{CreateResult, DeleteResult, UpdateResult};
pub use status::{OperationStatus, Outcome};
