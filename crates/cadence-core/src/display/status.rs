//! Status and confirmation message types for operation feedback.

use std::fmt;

use crate::{error::CoachError, models::SaveState};

/// How an operation ended, from the user's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    /// Finished, but something needs the user's attention
    Warning,
    Failure,
}

/// Wrapper type for displaying operation confirmation messages.
pub struct OperationStatus {
    pub message: String,
    pub outcome: Outcome,
}

impl OperationStatus {
    /// Create a new success status.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            outcome: Outcome::Success,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            outcome: Outcome::Warning,
        }
    }

    /// Create a new failure status.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            outcome: Outcome::Failure,
        }
    }

    /// Describes a failed operation. Failures that left workouts missing are
    /// flagged with a retry hint.
    pub fn from_error(error: &CoachError) -> Self {
        if error.is_data_loss() {
            Self::failure(format!(
                "{error}. Some workouts are missing until the operation is retried."
            ))
        } else {
            Self::failure(error.to_string())
        }
    }

    /// Describes where an autosave session ended up.
    pub fn from_save_state(state: SaveState, last_error: Option<&str>) -> Self {
        match (state, last_error) {
            (SaveState::Done | SaveState::Idle, _) => Self::success(state.with_icon()),
            (SaveState::Error, Some(error)) => {
                Self::failure(format!("{}: {error}", state.with_icon()))
            }
            (SaveState::Error, None) => Self::failure(state.with_icon()),
            (SaveState::Dirty | SaveState::Saving, _) => Self::warning(state.with_icon()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome == Outcome::Success
    }
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.outcome {
            Outcome::Success => "Success:",
            Outcome::Warning => "Warning:",
            Outcome::Failure => "Error:",
        };
        writeln!(f, "{label} {}", self.message)
    }
}
