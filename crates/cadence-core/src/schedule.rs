//! Calendar scheduling for training programs.
//!
//! The [`Scheduler`] maps a program shape (weeks × weekdays from a start
//! date) onto concrete dates. It holds its own notion of "today" so every
//! result is a pure function of its inputs.
//!
//! Dates are emitted in groups of `days_per_week`. After each group the scan
//! jumps to the next Monday, so a mid-week start yields a short first
//! calendar week followed by Monday-aligned weeks.
//!
//! ```rust
//! use cadence_core::schedule::Scheduler;
//! use jiff::civil::date;
//!
//! let scheduler = Scheduler::new(date(2024, 6, 1));
//! let weekdays = "mon,wed,fri".parse().unwrap();
//! let dates = scheduler.schedule_dates(date(2024, 6, 3), 2, &weekdays).unwrap();
//! assert_eq!(dates.len(), 6);
//! assert_eq!(
//!     scheduler.compute_end_date(date(2024, 6, 3), 2, &weekdays).unwrap(),
//!     date(2024, 6, 14)
//! );
//! ```

use jiff::{
    ToSpan, Zoned,
    civil::{Date, Weekday},
};
use log::debug;
use serde_json::Value;

use crate::{
    error::{CoachError, Result},
    models::{CanonicalWorkout, ProgramSpec, ScheduledSlot, WeekdaySet, program::validate_shape},
};

/// Turns program shapes into dated schedules relative to a fixed "today".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scheduler {
    today: Date,
}

impl Scheduler {
    pub fn new(today: Date) -> Self {
        Self { today }
    }

    /// Reads the local date once.
    pub fn from_system_clock() -> Self {
        Self::new(Zoned::now().date())
    }

    pub fn today(&self) -> Date {
        self.today
    }

    /// The date scheduling actually starts from: never in the past.
    pub fn effective_start(&self, start_date: Date) -> Date {
        start_date.max(self.today)
    }

    /// Produces `number_of_weeks * |weekdays|` dates in ascending order.
    pub fn schedule_dates(
        &self,
        start_date: Date,
        number_of_weeks: u32,
        weekdays: &WeekdaySet,
    ) -> Result<Vec<Date>> {
        validate_shape(number_of_weeks, weekdays)?;
        let count = number_of_weeks as usize * weekdays.len();
        generate(self.effective_start(start_date), weekdays, count)
    }

    /// Same as [`schedule_dates`](Self::schedule_dates) with week and day
    /// positions attached.
    pub fn schedule_slots(
        &self,
        start_date: Date,
        number_of_weeks: u32,
        weekdays: &WeekdaySet,
    ) -> Result<Vec<ScheduledSlot>> {
        let dates = self.schedule_dates(start_date, number_of_weeks, weekdays)?;
        Ok(slots_from_dates(dates, weekdays.len()))
    }

    pub fn slots_for(&self, spec: &ProgramSpec) -> Result<Vec<ScheduledSlot>> {
        self.schedule_slots(spec.start_date, spec.number_of_weeks, &spec.weekdays)
    }

    /// Date of the last slot, computed without walking the whole schedule.
    pub fn compute_end_date(
        &self,
        start_date: Date,
        number_of_weeks: u32,
        weekdays: &WeekdaySet,
    ) -> Result<Date> {
        validate_shape(number_of_weeks, weekdays)?;

        let first = first_selected_on_or_after(self.effective_start(start_date), weekdays)?;
        let week_one_end = latest_selected_on_or_before(shift(first, 6)?, weekdays)?;
        if number_of_weeks == 1 {
            return Ok(week_one_end);
        }

        let monday = monday_on_or_after(shift(week_one_end, 1)?)?;
        let remaining_days = 7 * (i64::from(number_of_weeks) - 1) - 1;
        latest_selected_on_or_before(shift(monday, remaining_days)?, weekdays)
    }

    pub fn end_date_for(&self, spec: &ProgramSpec) -> Result<Date> {
        self.compute_end_date(spec.start_date, spec.number_of_weeks, &spec.weekdays)
    }

    /// Reassigns dates to the generated workouts from a new start date,
    /// keeping their order. Reference workouts are left untouched.
    ///
    /// Workouts that carry `week`/`day` tags get them refreshed for the new
    /// weekday pattern.
    pub fn reschedule(
        &self,
        workouts: &mut [CanonicalWorkout],
        new_start: Date,
        weekdays: &WeekdaySet,
    ) -> Result<()> {
        if weekdays.is_empty() {
            return Err(
                CoachError::invalid_spec("weekdays").with_reason("at least one weekday must be selected")
            );
        }

        let count = workouts.iter().filter(|w| !w.is_reference).count();
        let dates = generate(self.effective_start(new_start), weekdays, count)?;
        let slots = slots_from_dates(dates, weekdays.len());
        debug!("Rescheduling {count} workout(s) from {new_start}");

        let generated = workouts.iter_mut().filter(|w| !w.is_reference);
        for (workout, slot) in generated.zip(slots) {
            workout.scheduled_date = Some(slot.date);
            if workout.tags.contains_key("week") {
                workout.tags.insert("week".to_string(), Value::from(slot.week));
            }
            if workout.tags.contains_key("day") {
                workout.tags.insert("day".to_string(), Value::from(slot.day_in_week));
            }
        }
        Ok(())
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::from_system_clock()
    }
}

fn slots_from_dates(dates: Vec<Date>, days_per_week: usize) -> Vec<ScheduledSlot> {
    dates
        .into_iter()
        .enumerate()
        .map(|(index, date)| ScheduledSlot::new(index, days_per_week, date))
        .collect()
}

/// Scans forward from `start`, emitting selected days and jumping to the
/// next Monday after every full group.
fn generate(start: Date, weekdays: &WeekdaySet, count: usize) -> Result<Vec<Date>> {
    let per_week = weekdays.len();
    let mut dates = Vec::with_capacity(count);
    let mut current = start;
    let mut in_group = 0;

    while dates.len() < count {
        current = first_selected_on_or_after(current, weekdays)?;
        dates.push(current);
        current = shift(current, 1)?;
        in_group += 1;

        if in_group == per_week {
            in_group = 0;
            current = monday_on_or_after(current)?;
        }
    }
    Ok(dates)
}

fn shift(date: Date, days: i64) -> Result<Date> {
    date.checked_add(days.days()).map_err(|e| {
        CoachError::invalid_spec("start_date")
            .with_reason(format!("schedule leaves the supported calendar range: {e}"))
    })
}

fn first_selected_on_or_after(date: Date, weekdays: &WeekdaySet) -> Result<Date> {
    let mut current = date;
    for _ in 0..7 {
        if weekdays.contains(current.weekday()) {
            return Ok(current);
        }
        current = shift(current, 1)?;
    }
    Err(CoachError::invalid_spec("weekdays").with_reason("at least one weekday must be selected"))
}

fn latest_selected_on_or_before(date: Date, weekdays: &WeekdaySet) -> Result<Date> {
    let mut current = date;
    for _ in 0..7 {
        if weekdays.contains(current.weekday()) {
            return Ok(current);
        }
        current = shift(current, -1)?;
    }
    Err(CoachError::invalid_spec("weekdays").with_reason("at least one weekday must be selected"))
}

fn monday_on_or_after(date: Date) -> Result<Date> {
    let offset = (7 - date.weekday().to_monday_zero_offset()) % 7;
    let monday = shift(date, i64::from(offset))?;
    debug_assert_eq!(monday.weekday(), Weekday::Monday);
    Ok(monday)
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use serde_json::json;

    use super::*;
    use crate::{error::ErrorKind, models::weekday::WEEK};

    fn days(s: &str) -> WeekdaySet {
        s.parse().unwrap()
    }

    fn scheduler() -> Scheduler {
        Scheduler::new(date(2024, 6, 1))
    }

    #[test]
    fn test_schedule_three_days_two_weeks() {
        let dates = scheduler()
            .schedule_dates(date(2024, 6, 3), 2, &days("mon,wed,fri"))
            .unwrap();
        assert_eq!(
            dates,
            vec![
                date(2024, 6, 3),
                date(2024, 6, 5),
                date(2024, 6, 7),
                date(2024, 6, 10),
                date(2024, 6, 12),
                date(2024, 6, 14),
            ]
        );
    }

    #[test]
    fn test_end_date_matches_scenario() {
        let end = scheduler()
            .compute_end_date(date(2024, 6, 3), 2, &days("mon,wed,fri"))
            .unwrap();
        assert_eq!(end, date(2024, 6, 14));
    }

    #[test]
    fn test_past_start_uses_today() {
        let scheduler = Scheduler::new(date(2024, 6, 10));
        let dates = scheduler
            .schedule_dates(date(2024, 1, 1), 1, &days("mon,thu"))
            .unwrap();
        assert_eq!(dates, vec![date(2024, 6, 10), date(2024, 6, 13)]);
        assert_eq!(scheduler.effective_start(date(2024, 1, 1)), date(2024, 6, 10));
    }

    #[test]
    fn test_mid_week_start_wraps_then_aligns_to_monday() {
        let dates = scheduler()
            .schedule_dates(date(2024, 6, 5), 2, &days("mon,wed,fri"))
            .unwrap();
        assert_eq!(
            dates,
            vec![
                date(2024, 6, 5),
                date(2024, 6, 7),
                date(2024, 6, 10),
                date(2024, 6, 17),
                date(2024, 6, 19),
                date(2024, 6, 21),
            ]
        );
        assert_eq!(
            scheduler()
                .compute_end_date(date(2024, 6, 5), 2, &days("mon,wed,fri"))
                .unwrap(),
            date(2024, 6, 21)
        );
    }

    #[test]
    fn test_group_ending_sunday_keeps_following_monday() {
        let dates = scheduler()
            .schedule_dates(date(2024, 6, 8), 2, &days("sat,sun"))
            .unwrap();
        assert_eq!(
            dates,
            vec![date(2024, 6, 8), date(2024, 6, 9), date(2024, 6, 15), date(2024, 6, 16)]
        );
    }

    #[test]
    fn test_slots_carry_week_and_day() {
        let slots = scheduler()
            .schedule_slots(date(2024, 6, 3), 2, &days("tue,thu"))
            .unwrap();
        let positions: Vec<_> = slots.iter().map(|s| (s.index, s.week, s.day_in_week)).collect();
        assert_eq!(positions, vec![(0, 1, 1), (1, 1, 2), (2, 2, 1), (3, 2, 2)]);
        assert_eq!(slots[0].date, date(2024, 6, 4));
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        let err = scheduler()
            .schedule_dates(date(2024, 6, 3), 0, &days("mon"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidSpec);

        let err = scheduler()
            .compute_end_date(date(2024, 6, 3), 2, &WeekdaySet::new())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidSpec);
    }

    #[test]
    fn test_schedule_is_deterministic() {
        let a = scheduler().schedule_dates(date(2024, 6, 6), 3, &days("mon,tue,sat"));
        let b = scheduler().schedule_dates(date(2024, 6, 6), 3, &days("mon,tue,sat"));
        assert_eq!(a.unwrap(), b.unwrap());
    }

    #[test]
    fn test_schedule_invariants_hold_for_all_shapes() {
        let scheduler = scheduler();
        for mask in 1u8..128 {
            let weekdays: WeekdaySet = WEEK
                .iter()
                .enumerate()
                .filter(|(bit, _)| mask & (1 << bit) != 0)
                .map(|(_, day)| *day)
                .collect();

            for offset in 0..14 {
                let start = date(2024, 6, 1).checked_add(offset.days()).unwrap();
                for weeks in 1..=4u32 {
                    let dates = scheduler.schedule_dates(start, weeks, &weekdays).unwrap();
                    assert_eq!(dates.len(), weeks as usize * weekdays.len());
                    assert!(dates.iter().all(|d| weekdays.contains(d.weekday())));
                    assert!(dates.windows(2).all(|pair| pair[0] < pair[1]));
                    assert!(dates[0] >= start);

                    let end = scheduler.compute_end_date(start, weeks, &weekdays).unwrap();
                    assert_eq!(
                        Some(&end),
                        dates.last(),
                        "end date mismatch for {weekdays} from {start} over {weeks} week(s)"
                    );
                }
            }
        }
    }

    #[test]
    fn test_reschedule_preserves_order_and_references() {
        let mut reference = CanonicalWorkout::reference("Sample", "Squat");
        reference.scheduled_date = Some(date(2024, 5, 1));

        let mut first = CanonicalWorkout::new("A", "a").with_date(date(2024, 6, 3));
        first.tags.insert("week".to_string(), json!(1));
        first.tags.insert("day".to_string(), json!(1));
        let second = CanonicalWorkout::new("B", "b").with_date(date(2024, 6, 5));
        let third = CanonicalWorkout::new("C", "c").with_date(date(2024, 6, 7));

        let mut workouts = vec![first, reference.clone(), second, third];
        scheduler()
            .reschedule(&mut workouts, date(2024, 7, 1), &days("tue,thu"))
            .unwrap();

        assert_eq!(workouts[0].scheduled_date, Some(date(2024, 7, 2)));
        assert_eq!(workouts[1], reference);
        assert_eq!(workouts[2].scheduled_date, Some(date(2024, 7, 4)));
        assert_eq!(workouts[3].scheduled_date, Some(date(2024, 7, 9)));
        assert_eq!(workouts[3].title, "C");
        assert_eq!(workouts[0].tags.get("week"), Some(&json!(1)));
        assert_eq!(workouts[0].tags.get("day"), Some(&json!(1)));
        assert!(!workouts[2].tags.contains_key("week"));
    }
}
