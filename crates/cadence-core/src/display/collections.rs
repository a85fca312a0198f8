//! Collection wrapper types for displaying groups of domain objects.

use std::{fmt, ops::Index};

use crate::models::{ProgramSummary, ScheduledSlot, WorkoutRecord};

/// Newtype wrapper for displaying collections of program summaries.
///
/// # Examples
///
/// ```rust
/// use cadence_core::{display::ProgramSummaries, models::ProgramSummary};
/// use jiff::{Timestamp, civil::date};
///
/// let summary = ProgramSummary {
///     id: 1,
///     name: "Summer Strength".to_string(),
///     description: None,
///     start_date: date(2024, 6, 3),
///     end_date: Some(date(2024, 6, 14)),
///     number_of_weeks: 2,
///     weekdays: "mon,wed,fri".parse().unwrap(),
///     created_at: Timestamp::now(),
///     updated_at: Timestamp::now(),
///     workout_count: 6,
///     reference_count: 0,
/// };
///
/// let output = ProgramSummaries(vec![summary]).to_string();
/// assert!(output.contains("Summer Strength (ID: 1) (6 workouts)"));
/// ```
pub struct ProgramSummaries(pub Vec<ProgramSummary>);

impl ProgramSummaries {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ProgramSummary> {
        self.0.iter()
    }
}

impl Index<usize> for ProgramSummaries {
    type Output = ProgramSummary;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl<'a> IntoIterator for &'a ProgramSummaries {
    type Item = &'a ProgramSummary;
    type IntoIter = std::slice::Iter<'a, ProgramSummary>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for ProgramSummaries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            writeln!(f, "No programs found.")
        } else {
            for program in &self.0 {
                write!(f, "{program}")?;
            }
            Ok(())
        }
    }
}

/// Newtype wrapper for displaying a program's workouts, references first.
pub struct Workouts(pub Vec<WorkoutRecord>);

impl Workouts {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, WorkoutRecord> {
        self.0.iter()
    }
}

impl IntoIterator for Workouts {
    type Item = WorkoutRecord;
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl fmt::Display for Workouts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No workouts in this program.");
        }

        let references: Vec<&WorkoutRecord> = self.0.iter().filter(|w| w.is_reference).collect();
        if !references.is_empty() {
            writeln!(f, "## Reference Workouts")?;
            writeln!(f)?;
            for workout in references {
                write!(f, "{workout}")?;
            }
        }

        let mut generated = self.0.iter().filter(|w| !w.is_reference).peekable();
        if generated.peek().is_some() {
            writeln!(f, "## Workouts")?;
            writeln!(f)?;
            for workout in generated {
                write!(f, "{workout}")?;
            }
        }
        Ok(())
    }
}

/// Newtype wrapper for displaying a computed schedule, one slot per line.
pub struct Slots(pub Vec<ScheduledSlot>);

impl Slots {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Date of the last slot.
    pub fn end_date(&self) -> Option<jiff::civil::Date> {
        self.0.last().map(|slot| slot.date)
    }
}

impl fmt::Display for Slots {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No scheduled dates.");
        }
        for slot in &self.0 {
            writeln!(f, "- {slot}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use jiff::{Timestamp, civil::date};

    use super::*;

    fn record(id: u64, title: &str, is_reference: bool) -> WorkoutRecord {
        WorkoutRecord {
            id,
            program_id: 1,
            title: title.to_string(),
            body: String::new(),
            tags: Default::default(),
            scheduled_date: None,
            is_reference,
            position: 0,
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        }
    }

    #[test]
    fn test_workouts_grouped() {
        let workouts = Workouts(vec![record(1, "Style", true), record(2, "Day 1", false)]);
        let output = workouts.to_string();

        let references = output.find("## Reference Workouts").unwrap();
        let generated = output.find("## Workouts").unwrap();
        assert!(references < generated);
        assert!(output.contains("### 1. Style [reference]"));
        assert!(output.contains("### 2. Day 1\n"));
    }

    #[test]
    fn test_empty_collections() {
        assert_eq!(Workouts(vec![]).to_string(), "No workouts in this program.\n");
        assert_eq!(ProgramSummaries(vec![]).to_string(), "No programs found.\n");
        assert_eq!(Slots(vec![]).to_string(), "No scheduled dates.\n");
    }

    #[test]
    fn test_slots() {
        let slots = Slots(vec![
            ScheduledSlot::new(0, 2, date(2024, 6, 3)),
            ScheduledSlot::new(1, 2, date(2024, 6, 5)),
        ]);
        assert_eq!(slots.end_date(), Some(date(2024, 6, 5)));
        assert_eq!(
            slots.to_string(),
            "- Workout 1: Mon 2024-06-03 (Week 1, Day 1)\n- Workout 2: Wed 2024-06-05 (Week 1, Day 2)\n"
        );
    }
}
