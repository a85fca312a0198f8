//! Command handlers.
//!
//! Each handler converts its clap arguments into core parameters, calls the
//! [`Coach`] and renders the result as markdown.

use std::{
    fs,
    io::{self, Read},
    path::Path,
};

use anyhow::{Context, Result};
use cadence_core::{
    AutosaveConfig, AutosaveController, Coach, CoachError, CreateResult, DeleteResult,
    OperationStatus, ProgramSummaries, SaveState, Slots, UpdateResult, WorkoutScope, Workouts,
    normalize::{normalize_at, parse_generation_response},
    params::{
        AddReference, AssignDate, CreateProgram, EditWorkout, Id, ImportGeneration, ListPrograms,
        RescheduleProgram, UpdateProgram,
    },
};
use log::debug;

use crate::{
    args::{
        AddReferenceArgs, DeleteProgramArgs, ImportArgs, ProgramCommands, PromptArgs,
        WorkoutCommands,
    },
    renderer::TerminalRenderer,
};

/// Reads a generation reply or workout body from `file`, or from stdin.
pub fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut input = String::new();
            io::stdin()
                .read_to_string(&mut input)
                .context("Failed to read stdin")?;
            Ok(input)
        }
    }
}

/// Describes the edits an update request makes.
fn describe_update(params: &UpdateProgram) -> Vec<String> {
    let mut changes = Vec::new();
    if let Some(name) = &params.name {
        changes.push(format!("Renamed to '{name}'"));
    }
    if let Some(description) = &params.description {
        if description.trim().is_empty() {
            changes.push("Cleared description".to_string());
        } else {
            changes.push("Updated description".to_string());
        }
    }
    if let Some(weeks) = params.number_of_weeks {
        changes.push(format!("Set {weeks} week(s)"));
    }
    if let Some(weekdays) = &params.weekdays {
        changes.push(format!("Training days set to {weekdays}"));
    }
    if let Some(days) = params.days_per_week {
        changes.push(format!("Set {days} day(s) per week"));
    }
    for key in params.details.keys() {
        changes.push(format!("Set {key}"));
    }
    changes
}

/// Renders the normalized workouts of a reply without storing them.
pub fn normalize_reply(renderer: &TerminalRenderer, reply: &str) -> Result<()> {
    let response = parse_generation_response(reply)?;
    let mut output = String::new();
    if let Some(title) = &response.title {
        output.push_str(&format!("# {title}\n\n"));
    }
    if let Some(overview) = &response.overview {
        output.push_str(&format!("{overview}\n\n"));
    }
    output.push_str(&format!(
        "Normalized {} workout(s):\n\n",
        response.workouts.len()
    ));
    for (index, raw) in response.workouts.iter().enumerate() {
        output.push_str(&normalize_at(raw, index).to_string());
    }
    renderer.render(&output)
}

pub struct Cli {
    coach: Coach,
    renderer: TerminalRenderer,
}

impl Cli {
    pub fn new(coach: Coach, renderer: TerminalRenderer) -> Self {
        Self { coach, renderer }
    }

    pub async fn handle_program_command(&self, command: ProgramCommands) -> Result<()> {
        match command {
            ProgramCommands::Create(args) => self.create_program(&args.into()).await,
            ProgramCommands::List(args) => self.list_programs(&args.into()).await,
            ProgramCommands::Show(args) => self.show_program(&args.into()).await,
            ProgramCommands::Update(args) => self.update_program(args.into()).await,
            ProgramCommands::Reschedule(args) => self.reschedule_program(&args.into()).await,
            ProgramCommands::Delete(args) => self.delete_program(args).await,
        }
    }

    pub async fn handle_workout_command(&self, command: WorkoutCommands) -> Result<()> {
        match command {
            WorkoutCommands::Reference(args) => self.add_reference(args).await,
            WorkoutCommands::AssignDate(args) => self.assign_date(&args.into()).await,
            WorkoutCommands::Edit(args) => self.edit_workout(&args.into()).await,
            WorkoutCommands::Delete(args) => self.delete_workout(&args.into()).await,
        }
    }

    async fn create_program(&self, params: &CreateProgram) -> Result<()> {
        let program = self.coach.create_program(params).await?;
        self.renderer
            .render(&CreateResult::new(program).to_string())
    }

    pub async fn list_programs(&self, params: &ListPrograms) -> Result<()> {
        let programs = self.coach.list_programs(params).await?;
        self.renderer
            .render(&ProgramSummaries(programs).to_string())
    }

    async fn show_program(&self, params: &Id) -> Result<()> {
        let program = self
            .coach
            .get_program(params)
            .await?
            .ok_or(CoachError::ProgramNotFound { id: params.id })?;
        let workouts = self
            .coach
            .list_workouts(params.id, WorkoutScope::All)
            .await?;

        self.renderer
            .render(&format!("{program}\n{}", Workouts(workouts)))
    }

    /// Applies the edits through an autosave session so the end date and
    /// the schedule follow a shape change.
    async fn update_program(&self, params: UpdateProgram) -> Result<()> {
        if params.is_empty() {
            return self
                .renderer
                .status(&OperationStatus::warning("No changes requested"));
        }

        let state = self.coach.load_session(&Id { id: params.id }).await?;
        let controller =
            AutosaveController::spawn(state, self.coach.clone(), AutosaveConfig::default());
        controller.update(|state| params.apply(&mut state.metadata, &mut state.spec));

        if let Err(e) = controller.save_now().await {
            self.renderer.status(&OperationStatus::from_save_state(
                controller.status(),
                controller.last_error().as_deref(),
            ))?;
            return Err(e.into());
        }

        let state = controller.snapshot();
        controller.shutdown().await?;
        debug!("Update session for program {} closed", params.id);

        let result = UpdateResult::with_changes(state, describe_update(&params));
        self.renderer.render(&result.to_string())?;
        self.renderer
            .status(&OperationStatus::from_save_state(SaveState::Done, None))
    }

    async fn reschedule_program(&self, params: &RescheduleProgram) -> Result<()> {
        let state = self.coach.reschedule_program(params).await?;
        let changes = vec![format!("Moved start to {}", params.start_date)];
        self.renderer
            .render(&UpdateResult::with_changes(state, changes).to_string())
    }

    async fn delete_program(&self, args: DeleteProgramArgs) -> Result<()> {
        if !args.confirm {
            return self.renderer.status(&OperationStatus::warning(format!(
                "Deleting program {} removes all of its workouts. Re-run with --confirm.",
                args.id
            )));
        }

        match self.coach.delete_program(&Id { id: args.id }).await? {
            Some(program) => self
                .renderer
                .render(&DeleteResult::new(program).to_string()),
            None => Err(CoachError::ProgramNotFound { id: args.id }.into()),
        }
    }

    pub async fn prompt(&self, args: &PromptArgs) -> Result<()> {
        let prompt = self.coach.build_prompt(args.program_id).await?;
        self.renderer.raw(&prompt);
        Ok(())
    }

    pub async fn import(&self, args: ImportArgs) -> Result<()> {
        let response = read_input(args.file.as_deref())?;
        let params = ImportGeneration {
            program_id: args.program_id,
            response,
            update_description: args.update_description,
        };
        let outcome = self.coach.import_generation(&params).await?;
        self.renderer.render(&outcome.to_string())
    }

    async fn add_reference(&self, args: AddReferenceArgs) -> Result<()> {
        let body = match &args.body {
            Some(body) => body.clone(),
            None => read_input(args.file.as_deref())?,
        };
        let params: AddReference = args.into_params(body);
        let record = self.coach.add_reference_workout(&params).await?;
        self.renderer.render(&CreateResult::new(record).to_string())
    }

    async fn assign_date(&self, params: &AssignDate) -> Result<()> {
        let record = self.coach.assign_date(params).await?;
        let changes = vec![format!("Scheduled on {}", params.date)];
        self.renderer
            .render(&UpdateResult::with_changes(record, changes).to_string())
    }

    async fn edit_workout(&self, params: &EditWorkout) -> Result<()> {
        if params.title.is_none() && params.body.is_none() {
            return self
                .renderer
                .status(&OperationStatus::warning("No changes requested"));
        }

        let record = self.coach.edit_workout(params).await?;
        let mut changes = Vec::new();
        if params.title.is_some() {
            changes.push("Updated title".to_string());
        }
        if params.body.is_some() {
            changes.push("Updated body".to_string());
        }
        self.renderer
            .render(&UpdateResult::with_changes(record, changes).to_string())
    }

    async fn delete_workout(&self, params: &Id) -> Result<()> {
        let record = self.coach.delete_workout(params).await?;
        self.renderer.render(&DeleteResult::new(record).to_string())
    }
}

/// Renders a schedule and its end date.
pub fn render_schedule(renderer: &TerminalRenderer, slots: Slots) -> Result<()> {
    let mut output = format!("{slots}");
    if let Some(end) = slots.end_date() {
        output.push_str(&format!("\nEnd date: {end}\n"));
    }
    renderer.render(&output)
}
