//! Program operations for the Coach.

use log::{debug, info};

use super::Coach;
use crate::{
    error::{CoachError, Result},
    models::{Program, ProgramState, ProgramSummary, ScheduledSlot, WorkoutScope},
    params::{CreateProgram, Id, ListPrograms, RescheduleProgram, Schedule},
    prompt::PromptRequest,
    reconcile,
};

impl Coach {
    /// Computes the dated slots for a program shape without storing
    /// anything.
    pub fn schedule(&self, params: &Schedule) -> Result<Vec<ScheduledSlot>> {
        self.scheduler
            .schedule_slots(params.start_date, params.number_of_weeks, &params.weekdays)
    }

    /// Creates a new program and stores its computed end date.
    pub async fn create_program(&self, params: &CreateProgram) -> Result<Program> {
        let metadata = params.metadata();
        let spec = params.spec();
        if metadata.name.trim().is_empty() {
            return Err(CoachError::invalid_spec("name").with_reason("name cannot be empty"));
        }
        let end_date = self.scheduler.end_date_for(&spec)?;

        let program = self
            .with_database(move |db| db.create_program(&metadata, &spec, Some(end_date)))
            .await?;
        info!("Created program {} ending {end_date}", program.id);
        Ok(program)
    }

    /// Retrieves a program by its ID.
    pub async fn get_program(&self, params: &Id) -> Result<Option<Program>> {
        let id = params.id;
        self.with_database(move |db| db.get_program(id)).await
    }

    /// Lists programs, newest first.
    pub async fn list_programs(&self, params: &ListPrograms) -> Result<Vec<ProgramSummary>> {
        let name = params.name.clone();
        self.with_database(move |db| db.list_programs(name.as_deref()))
            .await
    }

    /// Permanently deletes a program with all its workouts. Returns the
    /// deleted program, or `None` if it did not exist.
    pub async fn delete_program(&self, params: &Id) -> Result<Option<Program>> {
        let id = params.id;
        let deleted = self.with_database(move |db| db.delete_program(id)).await?;
        if deleted.is_some() {
            info!("Deleted program {id}");
        }
        Ok(deleted)
    }

    /// Moves a program to a new start date.
    ///
    /// The end date is recomputed and every generated workout gets a new
    /// date in its existing order before the program is reconciled.
    /// Reference workouts keep their dates.
    pub async fn reschedule_program(&self, params: &RescheduleProgram) -> Result<ProgramState> {
        let id = params.id;
        let start_date = params.start_date;
        let scheduler = self.scheduler;

        self.with_database(move |db| {
            let mut program = db
                .get_program(id)?
                .ok_or(CoachError::ProgramNotFound { id })?;
            let records = db.list_workouts(id, WorkoutScope::All)?;

            program.spec.start_date = start_date;
            let end_date = scheduler.end_date_for(&program.spec)?;

            let mut state = ProgramState::from_records(&program, &records);
            scheduler.reschedule(&mut state.workouts, start_date, &state.spec.weekdays)?;

            db.update_program(id, &program.metadata, &program.spec, Some(end_date))?
                .ok_or(CoachError::ProgramNotFound { id })?;
            let report = reconcile::reconcile(db, id, &mut state.workouts)?;
            debug!(
                "Rescheduled program {id} from {start_date}: {} workout(s) moved",
                report.inserted_workouts
            );
            Ok(state)
        })
        .await
    }

    /// Builds the generation prompt for a program from its stored shape,
    /// metadata and reference workouts.
    pub async fn build_prompt(&self, program_id: u64) -> Result<String> {
        let scheduler = self.scheduler;

        self.with_database(move |db| {
            let program = db
                .get_program(program_id)?
                .ok_or(CoachError::ProgramNotFound { id: program_id })?;
            let references = db.list_workouts(program_id, WorkoutScope::Reference)?;
            let state = ProgramState::from_records(&program, &references);
            let slots = scheduler.slots_for(&program.spec)?;

            Ok(PromptRequest::new(&program.spec, &program.metadata, &slots)
                .with_references(&state.workouts)
                .build())
        })
        .await
    }
}
