#[cfg(test)]
mod model_tests {
    use jiff::civil::{Weekday, date};
    use serde_json::json;

    use crate::{
        error::ErrorKind,
        models::{
            CanonicalWorkout, ProgramMetadata, ProgramSpec, ProgramState, SaveState,
            ScheduledSlot, WeekdaySet,
        },
    };

    fn mwf() -> WeekdaySet {
        "mon,wed,fri".parse().unwrap()
    }

    fn create_test_state() -> ProgramState {
        ProgramState {
            program_id: 7,
            spec: ProgramSpec::new(date(2024, 6, 3), 2, mwf()),
            metadata: ProgramMetadata::new("Strength Block"),
            workouts: vec![
                CanonicalWorkout::reference("Style sample", "## Main Workout\nSquat"),
                CanonicalWorkout::new("Day 1", "## Warm-up\nRow").with_date(date(2024, 6, 3)),
                CanonicalWorkout::new("Day 2", "## Warm-up\nBike").with_date(date(2024, 6, 5)),
            ],
        }
    }

    #[test]
    fn test_weekday_set_parsing_and_order() {
        let set: WeekdaySet = "Fri, monday,WED".parse().unwrap();
        assert_eq!(set.len(), 3);
        assert_eq!(
            set.iter().collect::<Vec<_>>(),
            vec![Weekday::Monday, Weekday::Wednesday, Weekday::Friday]
        );
        assert_eq!(set.first(), Some(Weekday::Monday));
        assert_eq!(set.last(), Some(Weekday::Friday));
        assert_eq!(set.to_string(), "Mon, Wed, Fri");

        assert!("mon,funday".parse::<WeekdaySet>().is_err());
        assert!("".parse::<WeekdaySet>().unwrap().is_empty());
    }

    #[test]
    fn test_weekday_set_serializes_as_names() {
        let json = serde_json::to_value(mwf()).unwrap();
        assert_eq!(json, json!(["monday", "wednesday", "friday"]));

        let back: WeekdaySet = serde_json::from_value(json).unwrap();
        assert_eq!(back, mwf());
        assert!(serde_json::from_value::<WeekdaySet>(json!(["someday"])).is_err());
    }

    #[test]
    fn test_set_days_per_week_grows_monday_first() {
        let mut spec = ProgramSpec::new(date(2024, 6, 3), 1, mwf());
        spec.set_days_per_week(5);
        assert_eq!(spec.weekdays.to_string(), "Mon, Tue, Wed, Thu, Fri");
        assert_eq!(spec.days_per_week(), 5);
    }

    #[test]
    fn test_set_days_per_week_drops_latest_and_clamps() {
        let mut spec = ProgramSpec::new(date(2024, 6, 3), 1, mwf());
        spec.set_days_per_week(2);
        assert_eq!(spec.weekdays.to_string(), "Mon, Wed");

        spec.set_days_per_week(0);
        assert_eq!(spec.weekdays.to_string(), "Mon");

        spec.set_days_per_week(12);
        assert_eq!(spec.weekdays, WeekdaySet::all());
    }

    #[test]
    fn test_toggle_weekday_keeps_one_day() {
        let mut spec = ProgramSpec::new(date(2024, 6, 3), 1, "tue".parse().unwrap());
        assert!(!spec.toggle_weekday(Weekday::Tuesday));
        assert_eq!(spec.days_per_week(), 1);

        assert!(spec.toggle_weekday(Weekday::Saturday));
        assert_eq!(spec.days_per_week(), 2);
        assert!(spec.toggle_weekday(Weekday::Tuesday));
        assert_eq!(spec.weekdays.to_string(), "Sat");
    }

    #[test]
    fn test_spec_validation() {
        assert!(ProgramSpec::new(date(2024, 6, 3), 2, mwf()).validate().is_ok());

        let err = ProgramSpec::new(date(2024, 6, 3), 0, mwf())
            .validate()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidSpec);

        let err = ProgramSpec::new(date(2024, 6, 3), 2, WeekdaySet::new())
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("weekdays"));
    }

    #[test]
    fn test_slot_week_and_day() {
        let slot = ScheduledSlot::new(4, 3, date(2024, 6, 12));
        assert_eq!(slot.week, 2);
        assert_eq!(slot.day_in_week, 2);

        let first = ScheduledSlot::new(0, 3, date(2024, 6, 3));
        assert_eq!((first.week, first.day_in_week), (1, 1));
    }

    #[test]
    fn test_same_content_ignores_persisted_id() {
        let a = create_test_state();
        let mut b = a.clone();
        for (i, workout) in b.workouts.iter_mut().enumerate() {
            workout.persisted_id = Some(100 + i as u64);
        }
        assert!(a.same_content(&b));

        b.workouts[1].body.push_str("\nMore");
        assert!(!a.same_content(&b));
    }

    #[test]
    fn test_adopt_ids_from_matching_positions_only() {
        let mut saved = create_test_state();
        saved.workouts[0].persisted_id = Some(1);
        saved.workouts[1].persisted_id = Some(2);
        saved.workouts[2].persisted_id = Some(3);

        let mut current = create_test_state();
        current.workouts[0].persisted_id = Some(1);
        current.workouts[2].persisted_id = Some(99);
        current.workouts[2].title = "Day 2 (edited)".to_string();

        current.adopt_ids_from(&saved);
        assert_eq!(current.workouts[0].persisted_id, Some(1));
        assert_eq!(current.workouts[1].persisted_id, Some(2));
        assert_eq!(current.workouts[2].persisted_id, None);
    }

    #[test]
    fn test_generated_and_reference_views() {
        let state = create_test_state();
        assert_eq!(state.generated().count(), 2);
        assert_eq!(state.references().count(), 1);
    }

    #[test]
    fn test_metadata_detail_text() {
        let mut metadata = ProgramMetadata::new("Block");
        metadata
            .details
            .insert("equipment".to_string(), json!(["barbell", "rower"]));
        metadata.details.insert("goal".to_string(), json!("strength"));
        metadata.details.insert("notes".to_string(), json!(""));

        assert_eq!(metadata.detail_text("equipment").as_deref(), Some("barbell, rower"));
        assert_eq!(metadata.detail_text("goal").as_deref(), Some("strength"));
        assert_eq!(metadata.detail_text("notes"), None);
        assert_eq!(metadata.detail_text("missing"), None);
    }

    #[test]
    fn test_save_state_strings() {
        assert_eq!("saving".parse::<SaveState>().unwrap(), SaveState::Saving);
        assert_eq!(SaveState::Dirty.as_str(), "dirty");
        assert!(SaveState::Error.is_pending());
        assert!(!SaveState::Done.is_pending());
        assert!("napping".parse::<SaveState>().is_err());
    }
}
