//! Command-line argument definitions.
//!
//! Each argument struct carries the clap attributes and converts into the
//! matching interface-agnostic parameter type from `cadence_core::params`.

use std::path::PathBuf;

use cadence_core::{
    WeekdaySet,
    params::{
        AddReference, AssignDate, CreateProgram, EditWorkout, Id, ListPrograms, RescheduleProgram,
        Schedule, UpdateProgram,
    },
};
use clap::{Args as ClapArgs, Parser, Subcommand};
use jiff::civil::Date;
use serde_json::{Map, Value};

/// Build, import and schedule generated training programs
///
/// Cadence turns a program shape (start date, weeks, training days) into a
/// dated schedule, builds generation prompts, imports generated workouts and
/// keeps them stored in a local SQLite database.
#[derive(Parser)]
#[command(version, about, name = "cadence")]
pub struct Args {
    /// Path to the SQLite database file. Defaults to
    /// $XDG_DATA_HOME/cadence/cadence.db
    #[arg(long, global = true)]
    pub database_file: Option<PathBuf>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Schedule as if today were this date (YYYY-MM-DD)
    #[arg(long, global = true, hide = true)]
    pub today: Option<Date>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute the dated schedule for a program shape
    #[command(alias = "s")]
    Schedule(ScheduleArgs),
    /// Manage programs
    #[command(alias = "p")]
    Program {
        #[command(subcommand)]
        command: ProgramCommands,
    },
    /// Print the generation prompt for a program
    Prompt(PromptArgs),
    /// Normalize a generation reply and print the workouts without storing
    /// them
    Normalize(NormalizeArgs),
    /// Import a generation reply into a program
    #[command(alias = "i")]
    Import(ImportArgs),
    /// Manage individual workouts
    #[command(alias = "w")]
    Workout {
        #[command(subcommand)]
        command: WorkoutCommands,
    },
}

/// Parses `key=value`. The value is read as JSON when it parses, otherwise
/// as a string.
fn parse_detail(s: &str) -> Result<(String, Value), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{s}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing key in '{s}'"));
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

fn details_map(details: Vec<(String, Value)>) -> Map<String, Value> {
    details.into_iter().collect()
}

#[derive(ClapArgs)]
pub struct ScheduleArgs {
    /// First day of the program (YYYY-MM-DD)
    pub start_date: Date,
    /// Program length in weeks
    pub weeks: u32,
    /// Training days as a comma-separated list, e.g. mon,wed,fri
    #[arg(short, long)]
    pub days: WeekdaySet,
}

impl From<ScheduleArgs> for Schedule {
    fn from(val: ScheduleArgs) -> Self {
        Schedule {
            start_date: val.start_date,
            number_of_weeks: val.weeks,
            weekdays: val.days,
        }
    }
}

#[derive(ClapArgs)]
pub struct CreateProgramArgs {
    /// Name of the program
    pub name: String,
    /// First day of the program (YYYY-MM-DD)
    #[arg(short, long)]
    pub start: Date,
    /// Program length in weeks
    #[arg(short, long)]
    pub weeks: u32,
    /// Training days as a comma-separated list, e.g. mon,wed,fri
    #[arg(long)]
    pub days: WeekdaySet,
    /// Requirements and context for the generated program
    #[arg(short, long)]
    pub description: Option<String>,
    /// Extra settings such as goal=Strength or equipment='["Barbell"]'
    #[arg(long = "detail", value_parser = parse_detail)]
    pub details: Vec<(String, Value)>,
}

impl From<CreateProgramArgs> for CreateProgram {
    fn from(val: CreateProgramArgs) -> Self {
        CreateProgram {
            name: val.name,
            description: val.description,
            start_date: val.start,
            number_of_weeks: val.weeks,
            weekdays: val.days,
            details: details_map(val.details),
        }
    }
}

#[derive(ClapArgs)]
pub struct ListProgramsArgs {
    /// Only show programs whose name contains this text
    #[arg(long)]
    pub name: Option<String>,
}

impl From<ListProgramsArgs> for ListPrograms {
    fn from(val: ListProgramsArgs) -> Self {
        ListPrograms { name: val.name }
    }
}

#[derive(ClapArgs)]
pub struct IdArgs {
    /// ID of the program or workout
    pub id: u64,
}

impl From<IdArgs> for Id {
    fn from(val: IdArgs) -> Self {
        Id { id: val.id }
    }
}

#[derive(ClapArgs)]
pub struct UpdateProgramArgs {
    /// ID of the program to update
    pub id: u64,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(short, long)]
    pub description: Option<String>,
    /// New program length in weeks
    #[arg(short, long)]
    pub weeks: Option<u32>,
    /// Replace the training days
    #[arg(long)]
    pub days: Option<WeekdaySet>,
    /// Grow or shrink the training days to this many per week
    #[arg(long)]
    pub days_per_week: Option<usize>,
    /// Settings to add or replace, as key=value
    #[arg(long = "detail", value_parser = parse_detail)]
    pub details: Vec<(String, Value)>,
}

impl From<UpdateProgramArgs> for UpdateProgram {
    fn from(val: UpdateProgramArgs) -> Self {
        UpdateProgram {
            id: val.id,
            name: val.name,
            description: val.description,
            number_of_weeks: val.weeks,
            weekdays: val.days,
            days_per_week: val.days_per_week,
            details: details_map(val.details),
        }
    }
}

#[derive(ClapArgs)]
pub struct RescheduleProgramArgs {
    /// ID of the program to move
    pub id: u64,
    /// New first day (YYYY-MM-DD)
    pub start_date: Date,
}

impl From<RescheduleProgramArgs> for RescheduleProgram {
    fn from(val: RescheduleProgramArgs) -> Self {
        RescheduleProgram {
            id: val.id,
            start_date: val.start_date,
        }
    }
}

#[derive(ClapArgs)]
pub struct DeleteProgramArgs {
    /// ID of the program to permanently delete
    pub id: u64,
    /// Confirm the deletion
    #[arg(long)]
    pub confirm: bool,
}

#[derive(Subcommand)]
pub enum ProgramCommands {
    /// Create a new program
    #[command(alias = "c")]
    Create(CreateProgramArgs),
    /// List programs
    #[command(aliases = ["l", "ls"])]
    List(ListProgramsArgs),
    /// Show a program with its workouts
    #[command(alias = "s")]
    Show(IdArgs),
    /// Change a program's name, description or shape
    #[command(alias = "u")]
    Update(UpdateProgramArgs),
    /// Move a program to a new start date
    #[command(alias = "r")]
    Reschedule(RescheduleProgramArgs),
    /// Permanently delete a program and its workouts
    #[command(aliases = ["d", "rm"])]
    Delete(DeleteProgramArgs),
}

#[derive(ClapArgs)]
pub struct PromptArgs {
    /// ID of the program
    pub program_id: u64,
}

#[derive(ClapArgs)]
pub struct NormalizeArgs {
    /// File holding the generation reply; reads stdin when omitted
    pub file: Option<PathBuf>,
}

#[derive(ClapArgs)]
pub struct ImportArgs {
    /// ID of the program to import into
    pub program_id: u64,
    /// File holding the generation reply; reads stdin when omitted
    pub file: Option<PathBuf>,
    /// Use the reply's program description for the program
    #[arg(long)]
    pub update_description: bool,
}

#[derive(ClapArgs)]
pub struct AddReferenceArgs {
    /// ID of the program
    pub program_id: u64,
    /// Title of the reference workout
    pub title: String,
    /// Workout body
    #[arg(short, long, conflicts_with = "file")]
    pub body: Option<String>,
    /// Read the workout body from a file
    #[arg(short, long)]
    pub file: Option<PathBuf>,
    /// Date the reference workout was done (YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<Date>,
}

impl AddReferenceArgs {
    /// Converts into core parameters once the body is known.
    pub fn into_params(self, body: String) -> AddReference {
        AddReference {
            program_id: self.program_id,
            title: self.title,
            body,
            date: self.date,
        }
    }
}

#[derive(ClapArgs)]
pub struct AssignDateArgs {
    /// ID of the workout
    pub id: u64,
    /// New date (YYYY-MM-DD)
    pub date: Date,
}

impl From<AssignDateArgs> for AssignDate {
    fn from(val: AssignDateArgs) -> Self {
        AssignDate {
            workout_id: val.id,
            date: val.date,
        }
    }
}

#[derive(ClapArgs)]
pub struct EditWorkoutArgs {
    /// ID of the workout
    pub id: u64,
    #[arg(short, long)]
    pub title: Option<String>,
    #[arg(short, long)]
    pub body: Option<String>,
}

impl From<EditWorkoutArgs> for EditWorkout {
    fn from(val: EditWorkoutArgs) -> Self {
        EditWorkout {
            workout_id: val.id,
            title: val.title,
            body: val.body,
        }
    }
}

#[derive(Subcommand)]
pub enum WorkoutCommands {
    /// Add a reference workout to a program
    #[command(alias = "ref")]
    Reference(AddReferenceArgs),
    /// Move one workout to a new date
    #[command(alias = "date")]
    AssignDate(AssignDateArgs),
    /// Change one workout's title or body
    #[command(alias = "e")]
    Edit(EditWorkoutArgs),
    /// Delete one workout
    #[command(aliases = ["d", "rm"])]
    Delete(IdArgs),
}
