//! Loading and saving whole program states.

use log::debug;

use super::Coach;
use crate::{
    autosave::ProgramWriter,
    error::{CoachError, Result},
    models::{ProgramState, WorkoutScope},
    params::Id,
    reconcile,
};

impl Coach {
    /// Loads a program with all its workouts as an editable state.
    pub async fn load_session(&self, params: &Id) -> Result<ProgramState> {
        let id = params.id;
        self.with_database(move |db| {
            let program = db
                .get_program(id)?
                .ok_or(CoachError::ProgramNotFound { id })?;
            let records = db.list_workouts(id, WorkoutScope::All)?;
            Ok(ProgramState::from_records(&program, &records))
        })
        .await
    }

    /// Writes a whole program state and returns it as stored.
    ///
    /// The program row is updated first. When the shape changed, the end
    /// date is recomputed and the generated workouts are re-dated onto the
    /// new schedule, so the returned state can differ from the one passed in.
    /// Reference workouts are synced record by record, then the generated
    /// workouts are reconciled.
    pub async fn save_session(&self, state: ProgramState) -> Result<ProgramState> {
        let scheduler = self.scheduler;

        self.with_database(move |db| {
            let mut state = state;
            let id = state.program_id;
            state.spec.validate()?;

            let stored = db
                .get_program(id)?
                .ok_or(CoachError::ProgramNotFound { id })?;
            let end_date = if stored.spec == state.spec {
                stored.end_date
            } else {
                scheduler.reschedule(
                    &mut state.workouts,
                    state.spec.start_date,
                    &state.spec.weekdays,
                )?;
                Some(scheduler.end_date_for(&state.spec)?)
            };
            db.update_program(id, &state.metadata, &state.spec, end_date)?
                .ok_or(CoachError::ProgramNotFound { id })?;

            reconcile::sync_references(db, id, &mut state.workouts)?;
            let report = reconcile::reconcile(db, id, &mut state.workouts)?;
            debug!(
                "Saved program {id}: {} workout(s) written",
                report.inserted_workouts
            );
            Ok(state)
        })
        .await
    }
}

impl ProgramWriter for Coach {
    async fn save(&self, state: ProgramState) -> Result<ProgramState> {
        self.save_session(state).await
    }
}
