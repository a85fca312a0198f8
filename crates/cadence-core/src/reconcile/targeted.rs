//! Single-record operations that never touch other workouts.

use std::collections::HashSet;

use jiff::civil::Date;
use log::debug;

use crate::{
    error::{CoachError, Result},
    models::{CanonicalWorkout, NewWorkout, WorkoutRecord, WorkoutScope},
    store::WorkoutStore,
};

fn next_position<S>(store: &S, program_id: u64, is_reference: bool) -> Result<u32>
where
    S: WorkoutStore + ?Sized,
{
    let scope = if is_reference {
        WorkoutScope::Reference
    } else {
        WorkoutScope::Generated
    };
    Ok(store
        .list_workouts(program_id, scope)?
        .iter()
        .map(|record| record.position + 1)
        .max()
        .unwrap_or(0))
}

fn insert_one<S>(store: &mut S, program_id: u64, workout: &CanonicalWorkout) -> Result<WorkoutRecord>
where
    S: WorkoutStore + ?Sized,
{
    let position = next_position(store, program_id, workout.is_reference)?;
    insert_at(store, program_id, position, workout)
}

fn insert_at<S>(
    store: &mut S,
    program_id: u64,
    position: u32,
    workout: &CanonicalWorkout,
) -> Result<WorkoutRecord>
where
    S: WorkoutStore + ?Sized,
{
    let new_workout = NewWorkout::from_canonical(program_id, position, workout);
    store
        .insert_workouts(std::slice::from_ref(&new_workout))?
        .into_iter()
        .next()
        .ok_or_else(|| CoachError::Configuration {
            message: "Store returned no record for an inserted workout".to_string(),
        })
}

fn require_id(workout: &CanonicalWorkout) -> Result<u64> {
    workout.persisted_id.ok_or_else(|| {
        CoachError::invalid_spec("persisted_id").with_reason("workout has not been saved yet")
    })
}

/// Dates one workout, creating its record first when it has none. Only this
/// workout's record and schedule entry are written.
pub fn assign_single_date<S>(
    store: &mut S,
    program_id: u64,
    workout: &mut CanonicalWorkout,
    date: Date,
) -> Result<()>
where
    S: WorkoutStore + ?Sized,
{
    workout.scheduled_date = Some(date);

    let id = match workout.persisted_id {
        Some(id) => {
            if !store.set_workout_date(id, date)? {
                return Err(CoachError::WorkoutNotFound { id });
            }
            id
        }
        None => {
            let record = insert_one(store, program_id, workout)?;
            workout.persisted_id = Some(record.id);
            record.id
        }
    };

    store.upsert_schedule_entry(program_id, id, date)?;
    debug!("Assigned {date} to workout {id} of program {program_id}");
    Ok(())
}

/// Deletes one workout by id.
pub fn delete_workout<S>(store: &mut S, id: u64) -> Result<()>
where
    S: WorkoutStore + ?Sized,
{
    if !store.delete_workout(id)? {
        return Err(CoachError::WorkoutNotFound { id });
    }
    debug!("Deleted workout {id}");
    Ok(())
}

/// Writes a workout's title and body. Its date is left as stored.
pub fn edit_workout<S>(store: &mut S, workout: &CanonicalWorkout) -> Result<()>
where
    S: WorkoutStore + ?Sized,
{
    let id = require_id(workout)?;
    if !store.update_workout_content(id, &workout.title, &workout.body)? {
        return Err(CoachError::WorkoutNotFound { id });
    }
    debug!("Edited workout {id}");
    Ok(())
}

/// Stores a reference workout after the program's existing references.
pub fn add_reference_workout<S>(
    store: &mut S,
    program_id: u64,
    workout: &mut CanonicalWorkout,
) -> Result<WorkoutRecord>
where
    S: WorkoutStore + ?Sized,
{
    workout.is_reference = true;
    let record = insert_one(store, program_id, workout)?;
    workout.persisted_id = Some(record.id);
    if let Some(date) = record.scheduled_date {
        store.upsert_schedule_entry(program_id, record.id, date)?;
    }
    Ok(record)
}

/// Writes the reference workouts of `workouts` back to the store.
///
/// New references are appended. Stored references missing from `workouts`
/// are deleted. A changed title, body or date is written in place; a change
/// of tags or a cleared date replaces the record at its position, which gives
/// it a new id. Returns the number of records written.
pub fn sync_references<S>(
    store: &mut S,
    program_id: u64,
    workouts: &mut [CanonicalWorkout],
) -> Result<usize>
where
    S: WorkoutStore + ?Sized,
{
    let stored = store.list_workouts(program_id, WorkoutScope::Reference)?;
    let kept: HashSet<u64> = workouts
        .iter()
        .filter(|w| w.is_reference)
        .filter_map(|w| w.persisted_id)
        .collect();
    let mut written = 0;

    for record in stored.iter().filter(|r| !kept.contains(&r.id)) {
        delete_workout(store, record.id)?;
        written += 1;
    }

    for workout in workouts.iter_mut().filter(|w| w.is_reference) {
        let Some(record) = workout
            .persisted_id
            .and_then(|id| stored.iter().find(|r| r.id == id))
        else {
            workout.persisted_id = None;
            add_reference_workout(store, program_id, workout)?;
            written += 1;
            continue;
        };

        let date_changed = record.scheduled_date != workout.scheduled_date;
        if record.tags != workout.tags || (date_changed && workout.scheduled_date.is_none()) {
            delete_workout(store, record.id)?;
            let replacement = insert_at(store, program_id, record.position, workout)?;
            workout.persisted_id = Some(replacement.id);
            if let Some(date) = replacement.scheduled_date {
                store.upsert_schedule_entry(program_id, replacement.id, date)?;
            }
            written += 1;
            continue;
        }

        if record.title != workout.title || record.body != workout.body {
            edit_workout(store, workout)?;
            written += 1;
        }
        if date_changed && let Some(date) = workout.scheduled_date {
            assign_single_date(store, program_id, workout, date)?;
            written += 1;
        }
    }

    if written > 0 {
        debug!("Synced {written} reference workout record(s) of program {program_id}");
    }
    Ok(written)
}
