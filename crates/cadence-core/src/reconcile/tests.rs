use std::collections::BTreeMap;

use jiff::{
    Timestamp,
    civil::{Date, date},
};

use super::*;
use crate::{
    error::ErrorKind,
    models::{WorkoutRecord, WorkoutScope},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FailPoint {
    DeleteScheduleEntries,
    DeleteWorkouts,
    InsertWorkouts,
    UpsertScheduleEntry,
}

/// In-memory store with a switchable failure point.
#[derive(Default)]
struct MemoryStore {
    workouts: BTreeMap<u64, WorkoutRecord>,
    schedule: BTreeMap<u64, (u64, Date)>,
    next_id: u64,
    fail: Option<FailPoint>,
}

impl MemoryStore {
    fn check(&self, point: FailPoint) -> crate::error::Result<()> {
        if self.fail == Some(point) {
            return Err(CoachError::Configuration {
                message: format!("injected failure at {point:?}"),
            });
        }
        Ok(())
    }

    fn seed_reference(&mut self, program_id: u64, title: &str) -> u64 {
        let record = self
            .insert_workouts(&[NewWorkout::from_canonical(
                program_id,
                0,
                &CanonicalWorkout::reference(title, "Reference body").with_date(date(2024, 5, 1)),
            )])
            .unwrap()
            .remove(0);
        self.schedule
            .insert(record.id, (program_id, date(2024, 5, 1)));
        record.id
    }

    fn generated(&self, program_id: u64) -> Vec<WorkoutRecord> {
        self.list_workouts(program_id, WorkoutScope::Generated).unwrap()
    }
}

impl WorkoutStore for MemoryStore {
    fn list_workouts(
        &self,
        program_id: u64,
        scope: WorkoutScope,
    ) -> crate::error::Result<Vec<WorkoutRecord>> {
        let mut records: Vec<WorkoutRecord> = self
            .workouts
            .values()
            .filter(|r| r.program_id == program_id)
            .filter(|r| match scope {
                WorkoutScope::Generated => !r.is_reference,
                WorkoutScope::Reference => r.is_reference,
                WorkoutScope::All => true,
            })
            .cloned()
            .collect();
        records.sort_by_key(|r| (!r.is_reference, r.position, r.id));
        Ok(records)
    }

    fn delete_workouts(&mut self, program_id: u64) -> crate::error::Result<usize> {
        self.check(FailPoint::DeleteWorkouts)?;
        let doomed: Vec<u64> = self
            .workouts
            .values()
            .filter(|r| r.program_id == program_id && !r.is_reference)
            .map(|r| r.id)
            .collect();
        for id in &doomed {
            self.workouts.remove(id);
            self.schedule.remove(id);
        }
        Ok(doomed.len())
    }

    fn insert_workouts(
        &mut self,
        workouts: &[NewWorkout],
    ) -> crate::error::Result<Vec<WorkoutRecord>> {
        self.check(FailPoint::InsertWorkouts)?;
        let mut records = Vec::new();
        for workout in workouts {
            self.next_id += 1;
            let record = WorkoutRecord {
                id: self.next_id,
                program_id: workout.program_id,
                title: workout.title.clone(),
                body: workout.body.clone(),
                tags: workout.tags.clone(),
                scheduled_date: workout.scheduled_date,
                is_reference: workout.is_reference,
                position: workout.position,
                created_at: Timestamp::UNIX_EPOCH,
                updated_at: Timestamp::UNIX_EPOCH,
            };
            self.workouts.insert(record.id, record.clone());
            records.push(record);
        }
        Ok(records)
    }

    fn upsert_schedule_entry(
        &mut self,
        program_id: u64,
        workout_id: u64,
        date: Date,
    ) -> crate::error::Result<()> {
        self.check(FailPoint::UpsertScheduleEntry)?;
        self.schedule.insert(workout_id, (program_id, date));
        Ok(())
    }

    fn delete_schedule_entries(&mut self, program_id: u64) -> crate::error::Result<usize> {
        self.check(FailPoint::DeleteScheduleEntries)?;
        let doomed: Vec<u64> = self
            .schedule
            .iter()
            .filter(|(id, (pid, _))| {
                *pid == program_id && self.workouts.get(*id).is_some_and(|r| !r.is_reference)
            })
            .map(|(id, _)| *id)
            .collect();
        for id in &doomed {
            self.schedule.remove(id);
        }
        Ok(doomed.len())
    }

    fn get_workout(&self, id: u64) -> crate::error::Result<Option<WorkoutRecord>> {
        Ok(self.workouts.get(&id).cloned())
    }

    fn update_workout_content(
        &mut self,
        id: u64,
        title: &str,
        body: &str,
    ) -> crate::error::Result<bool> {
        Ok(match self.workouts.get_mut(&id) {
            Some(record) => {
                record.title = title.to_string();
                record.body = body.to_string();
                true
            }
            None => false,
        })
    }

    fn set_workout_date(&mut self, id: u64, date: Date) -> crate::error::Result<bool> {
        Ok(match self.workouts.get_mut(&id) {
            Some(record) => {
                record.scheduled_date = Some(date);
                true
            }
            None => false,
        })
    }

    fn delete_workout(&mut self, id: u64) -> crate::error::Result<bool> {
        self.schedule.remove(&id);
        Ok(self.workouts.remove(&id).is_some())
    }
}

fn target_workouts() -> Vec<CanonicalWorkout> {
    vec![
        CanonicalWorkout::new("Day 1", "Squat").with_date(date(2024, 6, 3)),
        CanonicalWorkout::new("Day 2", "Bench").with_date(date(2024, 6, 5)),
        CanonicalWorkout::new("Unscheduled", "Mobility"),
    ]
}

#[test]
fn test_reconcile_inserts_and_writes_ids_back() {
    let mut store = MemoryStore::default();
    let mut target = target_workouts();

    let report = reconcile(&mut store, 1, &mut target).unwrap();

    assert_eq!(report.inserted_workouts, 3);
    assert_eq!(report.scheduled_workouts, 2);
    let stored = store.generated(1);
    assert_eq!(stored.len(), 3);
    for (workout, record) in target.iter().zip(&stored) {
        assert_eq!(workout.persisted_id, Some(record.id));
        assert_eq!(workout.title, record.title);
    }
    assert_eq!(stored[2].position, 2);
    assert_eq!(store.schedule.len(), 2);
}

#[test]
fn test_reconcile_replaces_previous_set_without_duplicates() {
    let mut store = MemoryStore::default();
    let mut target = target_workouts();
    reconcile(&mut store, 1, &mut target).unwrap();

    target.remove(0);
    target[0].body = "Bench (heavy)".to_string();
    let report = reconcile(&mut store, 1, &mut target).unwrap();

    assert_eq!(report.deleted_workouts, 3);
    assert_eq!(report.deleted_entries, 2);
    let stored = store.generated(1);
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[0].body, "Bench (heavy)");
    assert_eq!(store.schedule.len(), 1);
}

#[test]
fn test_reconcile_never_touches_references() {
    let mut store = MemoryStore::default();
    let reference_id = store.seed_reference(1, "Style sample");
    let before = store.get_workout(reference_id).unwrap();

    let mut target = target_workouts();
    let mut edited_reference = CanonicalWorkout::reference("Rewritten", "Should not be stored");
    edited_reference.persisted_id = Some(reference_id);
    target.insert(1, edited_reference);

    reconcile(&mut store, 1, &mut target).unwrap();
    reconcile(&mut store, 1, &mut target).unwrap();

    assert_eq!(store.get_workout(reference_id).unwrap(), before);
    assert_eq!(store.schedule.get(&reference_id), Some(&(1, date(2024, 5, 1))));
    assert_eq!(target[1].persisted_id, Some(reference_id));
    assert_eq!(store.generated(1).len(), 3);
}

#[test]
fn test_reconcile_leaves_other_programs_alone() {
    let mut store = MemoryStore::default();
    reconcile(&mut store, 2, &mut target_workouts()).unwrap();
    reconcile(&mut store, 1, &mut target_workouts()).unwrap();
    reconcile(&mut store, 1, &mut Vec::<CanonicalWorkout>::new()).unwrap();

    assert!(store.generated(1).is_empty());
    assert_eq!(store.generated(2).len(), 3);
}

#[test]
fn test_delete_failure_is_persistence_error_without_loss() {
    let mut store = MemoryStore::default();
    let mut target = target_workouts();
    reconcile(&mut store, 1, &mut target).unwrap();

    for (point, removed) in [
        (FailPoint::DeleteScheduleEntries, 0),
        (FailPoint::DeleteWorkouts, 2),
    ] {
        store.fail = Some(point);
        let err = reconcile(&mut store, 1, &mut target).unwrap_err();
        match &err {
            CoachError::Persistence {
                phase: WritePhase::Delete,
                removed_entries,
                ..
            } => assert_eq!(*removed_entries, removed, "{point:?}"),
            other => panic!("expected delete-phase persistence error, got {other:?}"),
        }
        assert_eq!(err.kind(), ErrorKind::PersistenceFailure);
        assert!(!err.is_data_loss());
    }
    assert_eq!(store.generated(1).len(), 3);
}

#[test]
fn test_insert_failure_with_nothing_deleted_is_not_data_loss() {
    let mut store = MemoryStore::default();
    store.fail = Some(FailPoint::InsertWorkouts);
    let mut target = target_workouts();

    let err = reconcile(&mut store, 1, &mut target).unwrap_err();
    assert!(matches!(
        err,
        CoachError::Persistence {
            phase: WritePhase::Insert,
            removed_entries: 0,
            ..
        }
    ));
    assert!(!err.is_data_loss());
    assert!(target.iter().all(|w| w.persisted_id.is_none()));
}

#[test]
fn test_insert_failure_is_partial_and_retry_restores() {
    let mut store = MemoryStore::default();
    let mut target = target_workouts();
    reconcile(&mut store, 1, &mut target).unwrap();

    store.fail = Some(FailPoint::InsertWorkouts);
    let err = reconcile(&mut store, 1, &mut target).unwrap_err();
    match &err {
        CoachError::PartialReconciliation {
            stage,
            deleted,
            inserted,
            ..
        } => {
            assert_eq!(stage, "insert_workouts");
            assert_eq!(*deleted, 3);
            assert_eq!(*inserted, 0);
        }
        other => panic!("expected partial reconciliation, got {other:?}"),
    }
    assert!(err.is_data_loss());
    assert!(store.generated(1).is_empty());
    assert!(target.iter().all(|w| w.persisted_id.is_none()));

    store.fail = None;
    reconcile(&mut store, 1, &mut target).unwrap();
    let stored = store.generated(1);
    assert_eq!(
        stored.iter().map(|r| r.title.as_str()).collect::<Vec<_>>(),
        vec!["Day 1", "Day 2", "Unscheduled"]
    );
    assert!(target.iter().all(|w| w.persisted_id.is_some()));
    assert_eq!(store.schedule.len(), 2);
}

#[test]
fn test_schedule_failure_reports_inserted_count() {
    let mut store = MemoryStore::default();
    let mut target = target_workouts();
    reconcile(&mut store, 1, &mut target).unwrap();

    store.fail = Some(FailPoint::UpsertScheduleEntry);
    let err = reconcile(&mut store, 1, &mut target).unwrap_err();
    assert!(matches!(
        err,
        CoachError::PartialReconciliation {
            deleted: 3,
            inserted: 3,
            ..
        }
    ));
    assert!(target.iter().all(|w| w.persisted_id.is_some()));

    let mut fresh = MemoryStore::default();
    fresh.fail = Some(FailPoint::UpsertScheduleEntry);
    let err = reconcile(&mut fresh, 1, &mut target_workouts()).unwrap_err();
    assert!(matches!(
        err,
        CoachError::Persistence {
            phase: WritePhase::Insert,
            ..
        }
    ));
}

#[test]
fn test_assign_single_date_creates_then_updates() {
    let mut store = MemoryStore::default();
    let mut target = target_workouts();
    reconcile(&mut store, 1, &mut target).unwrap();

    let mut extra = CanonicalWorkout::new("Bonus", "Sprints");
    assign_single_date(&mut store, 1, &mut extra, date(2024, 6, 8)).unwrap();
    let id = extra.persisted_id.unwrap();
    let record = store.get_workout(id).unwrap().unwrap();
    assert_eq!(record.scheduled_date, Some(date(2024, 6, 8)));
    assert_eq!(record.position, 3);
    assert_eq!(store.schedule.get(&id), Some(&(1, date(2024, 6, 8))));

    let untouched = store.get_workout(target[0].persisted_id.unwrap()).unwrap();
    assign_single_date(&mut store, 1, &mut extra, date(2024, 6, 9)).unwrap();
    assert_eq!(extra.persisted_id, Some(id));
    assert_eq!(store.schedule.get(&id), Some(&(1, date(2024, 6, 9))));
    assert_eq!(store.generated(1).len(), 4);
    assert_eq!(
        store.get_workout(target[0].persisted_id.unwrap()).unwrap(),
        untouched
    );
}

#[test]
fn test_assign_date_to_missing_record() {
    let mut store = MemoryStore::default();
    let mut ghost = CanonicalWorkout::new("Ghost", "Gone");
    ghost.persisted_id = Some(404);
    let err = assign_single_date(&mut store, 1, &mut ghost, date(2024, 6, 8)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn test_edit_workout_keeps_date() {
    let mut store = MemoryStore::default();
    let mut target = target_workouts();
    reconcile(&mut store, 1, &mut target).unwrap();

    let mut edited = target[0].clone();
    edited.title = "Day 1: Squat focus".to_string();
    edited.scheduled_date = Some(date(2030, 1, 1));
    edit_workout(&mut store, &edited).unwrap();

    let record = store.get_workout(edited.persisted_id.unwrap()).unwrap().unwrap();
    assert_eq!(record.title, "Day 1: Squat focus");
    assert_eq!(record.scheduled_date, Some(date(2024, 6, 3)));

    let unsaved = CanonicalWorkout::new("New", "Body");
    assert_eq!(
        edit_workout(&mut store, &unsaved).unwrap_err().kind(),
        ErrorKind::InvalidSpec
    );
}

#[test]
fn test_delete_workout_targets_one_record() {
    let mut store = MemoryStore::default();
    let mut target = target_workouts();
    reconcile(&mut store, 1, &mut target).unwrap();

    let id = target[1].persisted_id.unwrap();
    delete_workout(&mut store, id).unwrap();
    assert_eq!(store.generated(1).len(), 2);
    assert!(!store.schedule.contains_key(&id));

    assert_eq!(
        delete_workout(&mut store, id).unwrap_err().kind(),
        ErrorKind::NotFound
    );
}

#[test]
fn test_add_reference_workout_survives_reconcile() {
    let mut store = MemoryStore::default();
    let mut reference = CanonicalWorkout::new("Favorite", "EMOM 12");
    let record = add_reference_workout(&mut store, 1, &mut reference).unwrap();
    assert!(record.is_reference);
    assert!(reference.is_reference);

    reconcile(&mut store, 1, &mut target_workouts()).unwrap();
    assert_eq!(
        store
            .list_workouts(1, WorkoutScope::Reference)
            .unwrap()
            .len(),
        1
    );
}

fn reference_state(store: &MemoryStore, program_id: u64) -> Vec<CanonicalWorkout> {
    store
        .list_workouts(program_id, WorkoutScope::Reference)
        .unwrap()
        .iter()
        .map(CanonicalWorkout::from)
        .collect()
}

#[test]
fn test_sync_references_writes_edits_in_place() {
    let mut store = MemoryStore::default();
    let id = store.seed_reference(1, "Favorite");
    let mut workouts = reference_state(&store, 1);
    workouts[0].body = "EMOM 12".to_string();
    workouts[0].scheduled_date = Some(date(2024, 5, 8));

    assert_eq!(sync_references(&mut store, 1, &mut workouts).unwrap(), 2);

    let record = store.get_workout(id).unwrap().unwrap();
    assert_eq!(record.body, "EMOM 12");
    assert_eq!(record.scheduled_date, Some(date(2024, 5, 8)));
    assert_eq!(store.schedule[&id], (1, date(2024, 5, 8)));
    assert_eq!(workouts[0].persisted_id, Some(id));
}

#[test]
fn test_sync_references_deletes_removed_and_adds_new() {
    let mut store = MemoryStore::default();
    let keep = store.seed_reference(1, "Keep");
    let dropped = store.seed_reference(1, "Drop");
    let mut workouts = reference_state(&store, 1);
    workouts.retain(|w| w.persisted_id != Some(dropped));
    workouts.push(CanonicalWorkout::reference("Fresh", "Tempo run"));

    sync_references(&mut store, 1, &mut workouts).unwrap();

    assert!(store.get_workout(dropped).unwrap().is_none());
    assert!(!store.schedule.contains_key(&dropped));
    let titles: Vec<String> = reference_state(&store, 1)
        .into_iter()
        .map(|w| w.title)
        .collect();
    assert_eq!(titles, vec!["Keep", "Fresh"]);
    assert_eq!(workouts[0].persisted_id, Some(keep));
    assert!(workouts[1].persisted_id.is_some());
}

#[test]
fn test_sync_references_replaces_record_when_tags_change() {
    let mut store = MemoryStore::default();
    let id = store.seed_reference(1, "Favorite");
    let mut workouts = reference_state(&store, 1);
    workouts[0]
        .tags
        .insert("focus".to_string(), serde_json::json!("legs"));

    sync_references(&mut store, 1, &mut workouts).unwrap();

    assert!(store.get_workout(id).unwrap().is_none());
    let replacement = workouts[0].persisted_id.unwrap();
    assert_ne!(replacement, id);
    let record = store.get_workout(replacement).unwrap().unwrap();
    assert_eq!(record.tags["focus"], serde_json::json!("legs"));
    assert_eq!(record.position, 0);
    assert_eq!(store.schedule[&replacement], (1, date(2024, 5, 1)));
}

#[test]
fn test_sync_references_without_changes_writes_nothing() {
    let mut store = MemoryStore::default();
    store.seed_reference(1, "Favorite");
    let mut workouts = reference_state(&store, 1);
    workouts.push(CanonicalWorkout::new("Day 1", "Squat"));

    assert_eq!(sync_references(&mut store, 1, &mut workouts).unwrap(), 0);
    assert!(store.generated(1).is_empty());
}
