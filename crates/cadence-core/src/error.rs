//! Error types for the cadence core library.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Which half of a delete-then-insert write failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WritePhase {
    /// Removing the previous generated workouts or their schedule entries
    Delete,
    /// Writing the new workouts or their schedule entries
    Insert,
}

impl fmt::Display for WritePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WritePhase::Delete => write!(f, "delete"),
            WritePhase::Insert => write!(f, "insert"),
        }
    }
}

/// Coarse classification of [`CoachError`] for callers that only need to
/// pick a message or a severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidSpec,
    MalformedGenerationResponse,
    PersistenceFailure,
    PartialReconciliation,
    NotFound,
    Environment,
}

/// Comprehensive error type for all cadence operations.
#[derive(Error, Debug)]
pub enum CoachError {
    /// Scheduling inputs that cannot produce a program
    #[error("Invalid program spec for '{field}': {reason}")]
    InvalidSpec { field: String, reason: String },
    /// Generated content with no recognizable workouts
    #[error("Malformed generation response: {reason}")]
    MalformedGenerationResponse { reason: String },
    /// A backing-store write failed before anything was lost
    #[error(
        "Persistence failure during {phase} phase \
         ({removed_entries} schedule entries removed): {message}"
    )]
    Persistence {
        phase: WritePhase,
        /// Schedule entries already deleted when the failure happened
        removed_entries: usize,
        message: String,
    },
    /// Old workouts were deleted but their replacements were not fully
    /// written. The program shows missing workouts until a retry succeeds.
    #[error(
        "Partial reconciliation at stage '{stage}': {deleted} workout(s) removed, \
         {inserted} written before failure: {message}"
    )]
    PartialReconciliation {
        stage: String,
        deleted: usize,
        inserted: usize,
        message: String,
    },
    /// Database connection or query errors
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: rusqlite::Error,
    },
    /// Program not found for the given ID
    #[error("Program with ID {id} not found")]
    ProgramNotFound { id: u64 },
    /// Workout not found for the given ID
    #[error("Workout with ID {id} not found")]
    WorkoutNotFound { id: u64 },
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// XDG directory specification errors
    #[error("XDG directory error: {0}")]
    XdgDirectory(String),
    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    /// Configuration and runtime plumbing errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Builder for creating database errors with optional context.
pub struct DatabaseErrorBuilder {
    message: String,
}

impl DatabaseErrorBuilder {
    /// Create a new database error builder with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Build the error with the given source.
    pub fn with_source(self, source: rusqlite::Error) -> CoachError {
        CoachError::Database {
            message: self.message,
            source,
        }
    }
}

/// Builder for creating spec validation errors.
pub struct InvalidSpecBuilder {
    field: String,
}

impl InvalidSpecBuilder {
    /// Create a new invalid spec error builder for a field.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Build the error with the given reason.
    pub fn with_reason(self, reason: impl Into<String>) -> CoachError {
        CoachError::InvalidSpec {
            field: self.field,
            reason: reason.into(),
        }
    }
}

impl CoachError {
    /// Creates a builder for database errors.
    pub fn database(message: impl Into<String>) -> DatabaseErrorBuilder {
        DatabaseErrorBuilder::new(message)
    }

    /// Creates a builder for spec validation errors.
    pub fn invalid_spec(field: impl Into<String>) -> InvalidSpecBuilder {
        InvalidSpecBuilder::new(field)
    }

    /// Creates a malformed generation response error.
    pub fn malformed(reason: impl Into<String>) -> Self {
        CoachError::MalformedGenerationResponse {
            reason: reason.into(),
        }
    }

    /// Wraps any store error as a persistence failure of the given phase.
    pub fn persistence(phase: WritePhase, removed_entries: usize, source: &CoachError) -> Self {
        CoachError::Persistence {
            phase,
            removed_entries,
            message: source.to_string(),
        }
    }

    /// Returns the coarse kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoachError::InvalidSpec { .. } => ErrorKind::InvalidSpec,
            CoachError::MalformedGenerationResponse { .. } | CoachError::Serialization { .. } => {
                ErrorKind::MalformedGenerationResponse
            }
            CoachError::Persistence { .. } | CoachError::Database { .. } => {
                ErrorKind::PersistenceFailure
            }
            CoachError::PartialReconciliation { .. } => ErrorKind::PartialReconciliation,
            CoachError::ProgramNotFound { .. } | CoachError::WorkoutNotFound { .. } => {
                ErrorKind::NotFound
            }
            CoachError::FileSystem { .. }
            | CoachError::XdgDirectory(_)
            | CoachError::Configuration { .. } => ErrorKind::Environment,
        }
    }

    /// True when the failure left previously visible workouts deleted.
    pub fn is_data_loss(&self) -> bool {
        matches!(self, CoachError::PartialReconciliation { .. })
    }
}

/// Specialized extension trait for database-related Results.
pub trait DatabaseResultExt<T> {
    /// Map database errors with a message.
    fn db_context(self, message: &str) -> Result<T>;
}

impl<T> DatabaseResultExt<T> for std::result::Result<T, rusqlite::Error> {
    fn db_context(self, message: &str) -> Result<T> {
        self.map_err(|e| CoachError::database(message).with_source(e))
    }
}

/// Result type alias for cadence operations
pub type Result<T> = std::result::Result<T, CoachError>;
