//! Save status reported by the autosave controller.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Where the autosave controller stands relative to the last persisted
/// snapshot.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SaveState {
    /// In-memory state matches the last saved snapshot
    #[default]
    Idle,

    /// Mutated since the last save; waiting for the debounce window
    Dirty,

    /// A write is in flight
    Saving,

    /// Shut down with everything persisted
    Done,

    /// The last write failed; the next mutation or explicit save retries
    Error,
}

impl FromStr for SaveState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "idle" => Ok(SaveState::Idle),
            "dirty" => Ok(SaveState::Dirty),
            "saving" => Ok(SaveState::Saving),
            "done" => Ok(SaveState::Done),
            "error" => Ok(SaveState::Error),
            _ => Err(format!("Invalid save state: {s}")),
        }
    }
}

impl SaveState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SaveState::Idle => "idle",
            SaveState::Dirty => "dirty",
            SaveState::Saving => "saving",
            SaveState::Done => "done",
            SaveState::Error => "error",
        }
    }

    /// Status with an icon for terminal display.
    ///
    /// ```rust
    /// use cadence_core::models::SaveState;
    ///
    /// assert_eq!(SaveState::Done.with_icon(), "✓ Saved");
    /// assert_eq!(SaveState::Error.with_icon(), "✗ Save failed");
    /// ```
    pub fn with_icon(&self) -> &'static str {
        match self {
            SaveState::Idle => "○ Up to date",
            SaveState::Dirty => "● Unsaved changes",
            SaveState::Saving => "➤ Saving",
            SaveState::Done => "✓ Saved",
            SaveState::Error => "✗ Save failed",
        }
    }

    /// True for states that may still hold unpersisted edits.
    pub fn is_pending(&self) -> bool {
        matches!(self, SaveState::Dirty | SaveState::Saving | SaveState::Error)
    }
}
