//! Workout operations for the Coach.

use log::{debug, info, warn};
use serde_json::Value;

use super::Coach;
use crate::{
    db::Database,
    error::{CoachError, Result},
    models::{CanonicalWorkout, Program, ScheduledSlot, WorkoutRecord, WorkoutScope},
    normalize::{normalize_at, parse_generation_response},
    params::{AddReference, AssignDate, EditWorkout, Id, ImportGeneration},
    reconcile::{self, ReconcileReport},
};

/// Result of importing a generation response.
#[derive(Debug, Clone)]
pub struct ImportOutcome {
    /// The program after the import
    pub program: Program,
    pub report: ReconcileReport,
    /// The imported workouts with their persisted ids
    pub workouts: Vec<CanonicalWorkout>,
    /// Program-level overview text from the response, if any
    pub overview: Option<String>,
}

fn require_program(db: &Database, id: u64) -> Result<Program> {
    db.get_program(id)?.ok_or(CoachError::ProgramNotFound { id })
}

fn require_workout(db: &Database, id: u64) -> Result<WorkoutRecord> {
    db.get_workout(id)?.ok_or(CoachError::WorkoutNotFound { id })
}

/// Dates normalized workouts from the schedule, by position.
///
/// Slot dates always win over dates suggested in the reply. Every workout
/// that lines up with a slot gets `week` and `day` tags; workouts past the
/// last slot stay undated.
fn apply_slots(workouts: &mut [CanonicalWorkout], slots: &[ScheduledSlot]) {
    for (index, workout) in workouts.iter_mut().enumerate() {
        let Some(slot) = slots.get(index) else {
            workout.scheduled_date = None;
            continue;
        };
        if let Some(suggested) = workout.scheduled_date
            && suggested != slot.date
        {
            debug!(
                "Workout {} suggested {suggested}, scheduled on {}",
                index + 1,
                slot.date
            );
        }
        workout.scheduled_date = Some(slot.date);
        workout.tags.insert("week".to_string(), Value::from(slot.week));
        workout.tags.insert("day".to_string(), Value::from(slot.day_in_week));
    }
}

impl Coach {
    /// Lists a program's workouts in display order.
    pub async fn list_workouts(
        &self,
        program_id: u64,
        scope: WorkoutScope,
    ) -> Result<Vec<WorkoutRecord>> {
        self.with_database(move |db| {
            require_program(db, program_id)?;
            db.list_workouts(program_id, scope)
        })
        .await
    }

    /// Retrieves a workout by its ID.
    pub async fn get_workout(&self, params: &Id) -> Result<Option<WorkoutRecord>> {
        let id = params.id;
        self.with_database(move |db| db.get_workout(id)).await
    }

    /// Replaces a program's generated workouts with `workouts` and returns
    /// them with their new ids.
    pub async fn reconcile_workouts(
        &self,
        program_id: u64,
        workouts: Vec<CanonicalWorkout>,
    ) -> Result<(ReconcileReport, Vec<CanonicalWorkout>)> {
        self.with_database(move |db| {
            let mut workouts = workouts;
            require_program(db, program_id)?;
            let report = reconcile::reconcile(db, program_id, &mut workouts)?;
            db.touch_program(program_id)?;
            Ok((report, workouts))
        })
        .await
    }

    /// Parses a raw generation reply, normalizes its workouts onto the
    /// program's schedule and reconciles them.
    pub async fn import_generation(&self, params: &ImportGeneration) -> Result<ImportOutcome> {
        let response = parse_generation_response(&params.response)?;
        let program_id = params.program_id;
        let update_description = params.update_description;
        let scheduler = self.scheduler;

        self.with_database(move |db| {
            let mut program = require_program(db, program_id)?;
            let slots = scheduler.slots_for(&program.spec)?;

            let mut workouts: Vec<CanonicalWorkout> = response
                .workouts
                .iter()
                .enumerate()
                .map(|(index, raw)| normalize_at(raw, index))
                .collect();
            for workout in &mut workouts {
                workout.is_reference = false;
                workout.persisted_id = None;
            }
            if workouts.len() != slots.len() {
                warn!(
                    "Generation returned {} workout(s) for {} scheduled slot(s)",
                    workouts.len(),
                    slots.len()
                );
            }
            apply_slots(&mut workouts, &slots);

            let report = reconcile::reconcile(db, program_id, &mut workouts)?;

            if update_description && let Some(description) = response.description {
                program.metadata.description = Some(description);
                if let Some(overview) = &response.overview {
                    program
                        .metadata
                        .details
                        .insert("overview".to_string(), Value::from(overview.as_str()));
                }
                program = db
                    .update_program(program_id, &program.metadata, &program.spec, program.end_date)?
                    .ok_or(CoachError::ProgramNotFound { id: program_id })?;
            } else {
                db.touch_program(program_id)?;
            }

            info!(
                "Imported {} workout(s) into program {program_id}",
                report.inserted_workouts
            );
            Ok(ImportOutcome {
                program,
                report,
                workouts,
                overview: response.overview,
            })
        })
        .await
    }

    /// Adds a reference workout after the program's existing references.
    pub async fn add_reference_workout(&self, params: &AddReference) -> Result<WorkoutRecord> {
        let program_id = params.program_id;
        let mut workout = CanonicalWorkout::reference(params.title.clone(), params.body.clone());
        workout.scheduled_date = params.date;

        self.with_database(move |db| {
            require_program(db, program_id)?;
            reconcile::add_reference_workout(db, program_id, &mut workout)
        })
        .await
    }

    /// Dates one workout. Other workouts of the program are untouched.
    pub async fn assign_date(&self, params: &AssignDate) -> Result<WorkoutRecord> {
        let id = params.workout_id;
        let date = params.date;

        self.with_database(move |db| {
            let record = require_workout(db, id)?;
            let mut workout = CanonicalWorkout::from(&record);
            reconcile::assign_single_date(db, record.program_id, &mut workout, date)?;
            require_workout(db, id)
        })
        .await
    }

    /// Edits one workout's title or body. Its date is left as stored.
    pub async fn edit_workout(&self, params: &EditWorkout) -> Result<WorkoutRecord> {
        let id = params.workout_id;
        let title = params.title.clone();
        let body = params.body.clone();

        self.with_database(move |db| {
            let record = require_workout(db, id)?;
            let mut workout = CanonicalWorkout::from(&record);
            if let Some(title) = title {
                workout.title = title;
            }
            if let Some(body) = body {
                workout.body = body;
            }
            reconcile::edit_workout(db, &workout)?;
            require_workout(db, id)
        })
        .await
    }

    /// Deletes one workout and returns it as it was.
    pub async fn delete_workout(&self, params: &Id) -> Result<WorkoutRecord> {
        let id = params.id;

        self.with_database(move |db| {
            let record = require_workout(db, id)?;
            reconcile::delete_workout(db, id)?;
            Ok(record)
        })
        .await
    }
}
