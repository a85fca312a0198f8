//! Display implementations for domain models.
//!
//! All output is markdown for rich terminal display.

use std::fmt;

use super::datetime::{DayDate, LocalDateTime};
use crate::models::{
    CanonicalWorkout, Program, ProgramState, ProgramSummary, SaveState, ScheduledSlot, Tags,
    WorkoutRecord,
};

impl fmt::Display for SaveState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn fmt_optional_date(date: Option<jiff::civil::Date>) -> String {
    date.map_or_else(|| "unscheduled".to_string(), |d| DayDate(d).to_string())
}

fn fmt_tags(f: &mut fmt::Formatter<'_>, tags: &Tags) -> fmt::Result {
    if tags.is_empty() {
        return Ok(());
    }
    let rendered: Vec<String> = tags
        .iter()
        .map(|(key, value)| match value {
            serde_json::Value::String(s) => format!("{key}={s}"),
            other => format!("{key}={other}"),
        })
        .collect();
    writeln!(f, "- Tags: {}", rendered.join(", "))
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {}. {}", self.id, self.metadata.name)?;
        writeln!(f)?;

        writeln!(f, "- Start: {}", DayDate(self.spec.start_date))?;
        if let Some(end) = self.end_date {
            writeln!(f, "- End: {}", DayDate(end))?;
        }
        writeln!(
            f,
            "- Schedule: {} week(s), {} day(s) per week ({})",
            self.spec.number_of_weeks,
            self.spec.days_per_week(),
            self.spec.weekdays
        )?;
        for key in self.metadata.details.keys().filter(|k| *k != "overview") {
            if let Some(text) = self.metadata.detail_text(key) {
                writeln!(f, "- {key}: {text}")?;
            }
        }
        writeln!(f, "- Created: {}", LocalDateTime(&self.created_at))?;
        writeln!(f, "- Updated: {}", LocalDateTime(&self.updated_at))?;

        if let Some(desc) = &self.metadata.description {
            writeln!(f)?;
            writeln!(f, "{desc}")?;
        }

        if let Some(overview) = self.metadata.detail_text("overview") {
            writeln!(f)?;
            writeln!(f, "## Overview")?;
            writeln!(f)?;
            writeln!(f, "{overview}")?;
        }

        Ok(())
    }
}

impl fmt::Display for ProgramSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts = if self.reference_count > 0 {
            format!(
                " ({} workouts, {} references)",
                self.workout_count, self.reference_count
            )
        } else {
            format!(" ({} workouts)", self.workout_count)
        };

        writeln!(f, "## {} (ID: {}){counts}", self.name, self.id)?;
        writeln!(f)?;

        if let Some(desc) = &self.description {
            writeln!(f, "- **Description**: {desc}")?;
        }
        match self.end_date {
            Some(end) => writeln!(f, "- **Dates**: {} to {end}", self.start_date)?,
            None => writeln!(f, "- **Start**: {}", self.start_date)?,
        }
        writeln!(
            f,
            "- **Schedule**: {} week(s) on {}",
            self.number_of_weeks, self.weekdays
        )?;
        writeln!(f, "- **Updated**: {}", LocalDateTime(&self.updated_at))?;
        writeln!(f)?;

        Ok(())
    }
}

impl fmt::Display for WorkoutRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = if self.is_reference { " [reference]" } else { "" };
        writeln!(f, "### {}. {}{marker}", self.id, self.title)?;
        writeln!(f)?;
        writeln!(f, "- Date: {}", fmt_optional_date(self.scheduled_date))?;
        fmt_tags(f, &self.tags)?;
        writeln!(f)?;

        if !self.body.trim().is_empty() {
            // Demote body headers below the workout title.
            for line in self.body.lines() {
                if line.starts_with("## ") {
                    writeln!(f, "#{line}")?;
                } else {
                    writeln!(f, "{line}")?;
                }
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

impl fmt::Display for CanonicalWorkout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "### {}", self.title)?;
        writeln!(f)?;
        writeln!(f, "- Date: {}", fmt_optional_date(self.scheduled_date))?;
        fmt_tags(f, &self.tags)?;
        writeln!(f)?;
        if !self.body.trim().is_empty() {
            writeln!(f, "{}", self.body)?;
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Display for ScheduledSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Workout {}: {} (Week {}, Day {})",
            self.index + 1,
            DayDate(self.date),
            self.week,
            self.day_in_week
        )
    }
}

impl fmt::Display for ProgramState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {}. {}", self.program_id, self.metadata.name)?;
        writeln!(f)?;
        writeln!(
            f,
            "- Schedule: {} week(s) on {} from {}",
            self.spec.number_of_weeks, self.spec.weekdays, self.spec.start_date
        )?;
        writeln!(
            f,
            "- Workouts: {} generated, {} reference",
            self.generated().count(),
            self.references().count()
        )?;
        Ok(())
    }
}
