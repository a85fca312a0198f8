//! Reconciliation of a program's workouts against the backing store.
//!
//! [`reconcile`] replaces every non-reference workout of a program with a
//! target list in four stages:
//!
//! 1. delete schedule entries of non-reference workouts
//! 2. delete non-reference workout records
//! 3. insert the target workouts
//! 4. upsert schedule entries for inserted workouts that carry a date
//!
//! The stages are not wrapped in one transaction. A failure in the delete
//! stages is a [`CoachError::Persistence`] in the delete phase. A failure in
//! the insert stages is a [`CoachError::PartialReconciliation`] when workouts
//! were deleted, and the program shows missing workouts until the next
//! successful call; with nothing deleted it is a
//! [`CoachError::Persistence`] in the insert phase. One call is the unit of
//! retry.

mod targeted;

#[cfg(test)]
mod tests;

use std::fmt;

use log::{debug, warn};

pub use targeted::{
    add_reference_workout, assign_single_date, delete_workout, edit_workout, sync_references,
};

use crate::{
    error::{CoachError, Result, WritePhase},
    models::{CanonicalWorkout, NewWorkout},
    store::WorkoutStore,
};

/// The four reconciliation stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    DeleteScheduleEntries,
    DeleteWorkouts,
    InsertWorkouts,
    UpsertScheduleEntries,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::DeleteScheduleEntries => "delete_schedule_entries",
            Stage::DeleteWorkouts => "delete_workouts",
            Stage::InsertWorkouts => "insert_workouts",
            Stage::UpsertScheduleEntries => "upsert_schedule_entries",
        }
    }

    pub fn phase(&self) -> WritePhase {
        match self {
            Stage::DeleteScheduleEntries | Stage::DeleteWorkouts => WritePhase::Delete,
            Stage::InsertWorkouts | Stage::UpsertScheduleEntries => WritePhase::Insert,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Counts from a successful reconciliation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub deleted_entries: usize,
    pub deleted_workouts: usize,
    pub inserted_workouts: usize,
    pub scheduled_workouts: usize,
}

/// Makes the program's non-reference workouts match `target`.
///
/// Reference entries in `target` are skipped. On success every
/// non-reference entry receives the id of its new record, by position. When
/// the insert stage fails their ids are cleared, since the records they
/// pointed to are gone.
pub fn reconcile<S>(
    store: &mut S,
    program_id: u64,
    target: &mut [CanonicalWorkout],
) -> Result<ReconcileReport>
where
    S: WorkoutStore + ?Sized,
{
    let mut report = ReconcileReport::default();

    debug!("Reconcile program {program_id}: {}", Stage::DeleteScheduleEntries);
    report.deleted_entries = store
        .delete_schedule_entries(program_id)
        .map_err(|e| CoachError::persistence(WritePhase::Delete, 0, &e))?;

    debug!("Reconcile program {program_id}: {}", Stage::DeleteWorkouts);
    let removed_entries = report.deleted_entries;
    report.deleted_workouts = store
        .delete_workouts(program_id)
        .map_err(|e| CoachError::persistence(WritePhase::Delete, removed_entries, &e))?;

    let new_workouts: Vec<NewWorkout> = target
        .iter()
        .filter(|w| !w.is_reference)
        .enumerate()
        .map(|(position, w)| NewWorkout::from_canonical(program_id, position as u32, w))
        .collect();

    debug!(
        "Reconcile program {program_id}: {} ({} workout(s))",
        Stage::InsertWorkouts,
        new_workouts.len()
    );
    let records = match store.insert_workouts(&new_workouts) {
        Ok(records) => records,
        Err(e) => {
            for workout in target.iter_mut().filter(|w| !w.is_reference) {
                workout.persisted_id = None;
            }
            return Err(insert_failure(program_id, Stage::InsertWorkouts, &report, 0, &e));
        }
    };
    report.inserted_workouts = records.len();

    let generated = target.iter_mut().filter(|w| !w.is_reference);
    for (workout, record) in generated.zip(&records) {
        workout.persisted_id = Some(record.id);
    }

    debug!("Reconcile program {program_id}: {}", Stage::UpsertScheduleEntries);
    for record in &records {
        if let Some(date) = record.scheduled_date {
            store
                .upsert_schedule_entry(program_id, record.id, date)
                .map_err(|e| {
                    insert_failure(
                        program_id,
                        Stage::UpsertScheduleEntries,
                        &report,
                        records.len(),
                        &e,
                    )
                })?;
            report.scheduled_workouts += 1;
        }
    }

    debug!(
        "Reconciled program {program_id}: removed {}, inserted {}, scheduled {}",
        report.deleted_workouts, report.inserted_workouts, report.scheduled_workouts
    );
    Ok(report)
}

/// Classifies a failure after the delete stages. Only a failure that
/// follows deleted workouts leaves the program short.
fn insert_failure(
    program_id: u64,
    stage: Stage,
    report: &ReconcileReport,
    inserted: usize,
    source: &CoachError,
) -> CoachError {
    if report.deleted_workouts == 0 {
        warn!("Reconcile program {program_id} failed at {stage} before any loss: {source}");
        return CoachError::persistence(stage.phase(), report.deleted_entries, source);
    }

    warn!(
        "Partial reconciliation for program {program_id} at {stage}: \
         {} workout(s) removed, {inserted} written: {source}",
        report.deleted_workouts
    );
    CoachError::PartialReconciliation {
        stage: stage.as_str().to_string(),
        deleted: report.deleted_workouts,
        inserted,
        message: source.to_string(),
    }
}
