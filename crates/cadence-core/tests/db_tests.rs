use cadence_core::{
    CanonicalWorkout, Database, ProgramMetadata, ProgramSpec, WorkoutScope, WorkoutStore,
    models::NewWorkout, reconcile,
};
use jiff::civil::date;
use serde_json::json;
use tempfile::NamedTempFile;

/// Helper function to create a temporary database for testing
fn create_test_db() -> (NamedTempFile, Database) {
    let temp_file = NamedTempFile::new().expect("Failed to create temporary file");
    let db = Database::new(temp_file.path()).expect("Failed to create test database");
    (temp_file, db)
}

fn spec() -> ProgramSpec {
    ProgramSpec::new(date(2024, 6, 3), 2, "mon,wed,fri".parse().unwrap())
}

fn create_program(db: &mut Database, name: &str) -> u64 {
    db.create_program(&ProgramMetadata::new(name), &spec(), Some(date(2024, 6, 14)))
        .expect("Failed to create program")
        .id
}

fn new_workout(program_id: u64, position: u32, title: &str) -> NewWorkout {
    NewWorkout::from_canonical(
        program_id,
        position,
        &CanonicalWorkout::new(title, "## Main Workout\nSquat").with_date(date(2024, 6, 3)),
    )
}

#[test]
fn test_database_initialization() {
    let (temp_file, _db) = create_test_db();
    assert!(temp_file.path().exists());

    // Opening an initialized database again is a no-op.
    Database::new(temp_file.path()).expect("Failed to reopen database");
}

#[test]
fn test_create_and_get_program() {
    let (_temp_file, mut db) = create_test_db();

    let mut metadata = ProgramMetadata::new("Summer Strength");
    metadata.description = Some("Get strong".to_string());
    metadata.details.insert("goal".to_string(), json!("Strength"));
    metadata
        .details
        .insert("equipment".to_string(), json!(["Barbell", "Rower"]));

    let created = db
        .create_program(&metadata, &spec(), Some(date(2024, 6, 14)))
        .expect("Failed to create program");
    assert!(created.id > 0);

    let fetched = db
        .get_program(created.id)
        .expect("Failed to get program")
        .expect("Program should exist");
    assert_eq!(fetched.metadata, metadata);
    assert_eq!(fetched.spec, spec());
    assert_eq!(fetched.end_date, Some(date(2024, 6, 14)));
    assert_eq!(fetched.created_at, created.created_at);

    assert!(db.get_program(created.id + 100).unwrap().is_none());
}

#[test]
fn test_list_programs_with_counts() {
    let (_temp_file, mut db) = create_test_db();

    let first = create_program(&mut db, "Summer Strength");
    let second = create_program(&mut db, "Winter Base");
    db.insert_workouts(&[new_workout(first, 0, "Day 1"), new_workout(first, 1, "Day 2")])
        .unwrap();
    let mut reference = new_workout(first, 0, "Style");
    reference.is_reference = true;
    db.insert_workouts(&[reference]).unwrap();

    let all = db.list_programs(None).unwrap();
    assert_eq!(all.len(), 2);
    // Newest first
    assert_eq!(all[0].id, second);
    assert_eq!(all[1].workout_count, 2);
    assert_eq!(all[1].reference_count, 1);

    let filtered = db.list_programs(Some("WINTER")).unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].name, "Winter Base");
}

#[test]
fn test_update_and_delete_program() {
    let (_temp_file, mut db) = create_test_db();
    let id = create_program(&mut db, "Summer Strength");

    let mut new_spec = spec();
    new_spec.set_days_per_week(4);
    let updated = db
        .update_program(id, &ProgramMetadata::new("Renamed"), &new_spec, None)
        .unwrap()
        .expect("Program should exist");
    assert_eq!(updated.metadata.name, "Renamed");
    assert_eq!(updated.spec.days_per_week(), 4);
    assert_eq!(updated.end_date, None);

    assert!(
        db.update_program(id + 1, &ProgramMetadata::new("x"), &new_spec, None)
            .unwrap()
            .is_none()
    );

    db.insert_workouts(&[new_workout(id, 0, "Day 1")]).unwrap();
    let deleted = db.delete_program(id).unwrap().expect("Program should exist");
    assert_eq!(deleted.metadata.name, "Renamed");
    assert!(db.get_program(id).unwrap().is_none());
    assert!(db.list_workouts(id, WorkoutScope::All).unwrap().is_empty());
    assert!(db.delete_program(id).unwrap().is_none());
}

#[test]
fn test_invalid_weeks_rejected_by_schema() {
    let (_temp_file, mut db) = create_test_db();
    let bad = ProgramSpec::new(date(2024, 6, 3), 0, "mon".parse().unwrap());
    assert!(db.create_program(&ProgramMetadata::new("Bad"), &bad, None).is_err());
}

#[test]
fn test_insert_workouts_returns_records_in_order() {
    let (_temp_file, mut db) = create_test_db();
    let id = create_program(&mut db, "Summer Strength");

    let records = db
        .insert_workouts(&[new_workout(id, 0, "Day 1"), new_workout(id, 1, "Day 2")])
        .unwrap();
    assert_eq!(records.len(), 2);
    assert!(records[0].id < records[1].id);

    let listed = db.list_workouts(id, WorkoutScope::Generated).unwrap();
    assert_eq!(listed, records);
    assert_eq!(listed[0].body, "## Main Workout\nSquat");
}

#[test]
fn test_insert_workouts_is_atomic() {
    let (_temp_file, mut db) = create_test_db();
    let id = create_program(&mut db, "Summer Strength");

    let result = db.insert_workouts(&[new_workout(id, 0, "Day 1"), new_workout(id + 50, 1, "Orphan")]);
    assert!(result.is_err());
    assert!(db.list_workouts(id, WorkoutScope::All).unwrap().is_empty());
}

#[test]
fn test_scopes_and_generated_delete() {
    let (_temp_file, mut db) = create_test_db();
    let id = create_program(&mut db, "Summer Strength");

    let mut reference = new_workout(id, 0, "Style");
    reference.is_reference = true;
    db.insert_workouts(&[reference, new_workout(id, 0, "Day 1")]).unwrap();

    assert_eq!(db.list_workouts(id, WorkoutScope::Reference).unwrap().len(), 1);
    assert_eq!(db.list_workouts(id, WorkoutScope::Generated).unwrap().len(), 1);

    let all = db.list_workouts(id, WorkoutScope::All).unwrap();
    assert!(all[0].is_reference);

    assert_eq!(db.delete_generated_workouts(id).unwrap(), 1);
    let remaining = db.list_workouts(id, WorkoutScope::All).unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].title, "Style");
}

#[test]
fn test_schedule_entries() {
    let (_temp_file, mut db) = create_test_db();
    let id = create_program(&mut db, "Summer Strength");
    let records = db
        .insert_workouts(&[new_workout(id, 0, "Day 1"), new_workout(id, 1, "Day 2")])
        .unwrap();

    db.upsert_schedule_entry(id, records[0].id, date(2024, 6, 5)).unwrap();
    db.upsert_schedule_entry(id, records[1].id, date(2024, 6, 3)).unwrap();
    // Upserting again moves the entry instead of duplicating it.
    db.upsert_schedule_entry(id, records[0].id, date(2024, 6, 7)).unwrap();

    let entries = db.list_schedule_entries(id).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].workout_id, records[1].id);
    assert_eq!(entries[1].scheduled_date, date(2024, 6, 7));

    assert_eq!(db.delete_schedule_entries(id).unwrap(), 2);
    assert!(db.list_schedule_entries(id).unwrap().is_empty());
}

#[test]
fn test_delete_workout_cascades_schedule_entry() {
    let (_temp_file, mut db) = create_test_db();
    let id = create_program(&mut db, "Summer Strength");
    let records = db.insert_workouts(&[new_workout(id, 0, "Day 1")]).unwrap();
    db.upsert_schedule_entry(id, records[0].id, date(2024, 6, 3)).unwrap();

    assert!(db.delete_workout(records[0].id).unwrap());
    assert!(!db.delete_workout(records[0].id).unwrap());
    assert!(db.list_schedule_entries(id).unwrap().is_empty());
}

#[test]
fn test_single_record_updates() {
    let (_temp_file, mut db) = create_test_db();
    let id = create_program(&mut db, "Summer Strength");
    let records = db.insert_workouts(&[new_workout(id, 0, "Day 1")]).unwrap();
    let workout_id = records[0].id;

    assert!(db.update_workout_content(workout_id, "Renamed", "New body").unwrap());
    assert!(db.set_workout_date(workout_id, Some(date(2024, 6, 12))).unwrap());

    let fetched = db.get_workout(workout_id).unwrap().unwrap();
    assert_eq!(fetched.title, "Renamed");
    assert_eq!(fetched.body, "New body");
    assert_eq!(fetched.scheduled_date, Some(date(2024, 6, 12)));

    assert!(!db.update_workout_content(workout_id + 1, "x", "y").unwrap());
    assert!(!db.set_workout_date(workout_id + 1, None).unwrap());
}

#[test]
fn test_reconcile_against_sqlite() {
    let (_temp_file, mut db) = create_test_db();
    let id = create_program(&mut db, "Summer Strength");
    let mut reference = CanonicalWorkout::reference("Style", "Heavy singles");
    reconcile::add_reference_workout(&mut db, id, &mut reference).unwrap();

    let mut target: Vec<CanonicalWorkout> = (1..=3)
        .map(|n| CanonicalWorkout::new(format!("Day {n}"), "Squat").with_date(date(2024, 6, n * 2 + 1)))
        .collect();
    let report = reconcile(&mut db, id, &mut target).unwrap();
    assert_eq!(report.inserted_workouts, 3);
    assert_eq!(report.scheduled_workouts, 3);

    target.truncate(2);
    let report = reconcile(&mut db, id, &mut target).unwrap();
    assert_eq!(report.deleted_workouts, 3);
    assert_eq!(report.deleted_entries, 3);

    let generated = WorkoutStore::list_workouts(&db, id, WorkoutScope::Generated).unwrap();
    let ids: Vec<u64> = generated.iter().map(|w| w.id).collect();
    let target_ids: Vec<u64> = target.iter().filter_map(|w| w.persisted_id).collect();
    assert_eq!(ids, target_ids);

    let references = db.list_workouts(id, WorkoutScope::Reference).unwrap();
    assert_eq!(references.len(), 1);
    assert_eq!(Some(references[0].id), reference.persisted_id);
    assert_eq!(db.list_schedule_entries(id).unwrap().len(), 2);
}
