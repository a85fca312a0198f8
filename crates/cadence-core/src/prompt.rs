//! Generation prompt assembly.
//!
//! The prompt lists the program parameters, the body section layout the
//! normalizer expects, the JSON response shape, and one line per scheduled
//! slot. Optional metadata details are read from
//! [`ProgramMetadata::details`] by key: `goal`, `difficulty`,
//! `program_type`, `focus_area`, `equipment`, `workout_format` and
//! `personalization`.

use std::fmt::Write;

use crate::models::{CanonicalWorkout, ProgramMetadata, ProgramSpec, ScheduledSlot};
use crate::normalize::SectionName;

/// System message sent alongside the prompt.
pub const SYSTEM_PROMPT: &str = "You are an expert strength and conditioning coach who \
specializes in creating effective, periodized training programs. Create programs that follow \
sound exercise science principles with appropriate progression, variation, and specificity.";

const DEFAULT_GOAL: &str = "General fitness";
const DEFAULT_DIFFICULTY: &str = "Intermediate";
const DEFAULT_PROGRAM_TYPE: &str = "linear";

/// Inputs for one generation request.
#[derive(Debug, Clone, Copy)]
pub struct PromptRequest<'a> {
    pub spec: &'a ProgramSpec,
    pub metadata: &'a ProgramMetadata,
    pub slots: &'a [ScheduledSlot],
    pub references: &'a [CanonicalWorkout],
}

impl<'a> PromptRequest<'a> {
    pub fn new(
        spec: &'a ProgramSpec,
        metadata: &'a ProgramMetadata,
        slots: &'a [ScheduledSlot],
    ) -> Self {
        Self {
            spec,
            metadata,
            slots,
            references: &[],
        }
    }

    pub fn with_references(mut self, references: &'a [CanonicalWorkout]) -> Self {
        self.references = references;
        self
    }

    /// Renders the user prompt.
    pub fn build(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_to(&mut out);
        out
    }

    fn write_to(&self, out: &mut String) -> std::fmt::Result {
        let weeks = self.spec.number_of_weeks;
        let metadata = self.metadata;
        let goal = metadata
            .detail_text("goal")
            .unwrap_or_else(|| DEFAULT_GOAL.to_string());
        let difficulty = metadata
            .detail_text("difficulty")
            .unwrap_or_else(|| DEFAULT_DIFFICULTY.to_string());
        let program_type = metadata
            .detail_text("program_type")
            .unwrap_or_else(|| DEFAULT_PROGRAM_TYPE.to_string());

        writeln!(
            out,
            "Generate a {weeks}-week training program with the following parameters:\n"
        )?;

        if let Some(description) = metadata.description.as_deref().map(str::trim)
            && !description.is_empty()
        {
            writeln!(out, "IMPORTANT REQUIREMENTS FROM THE CLIENT: {description}")?;
            writeln!(
                out,
                "Please prioritize these specific requirements above all else in program design.\n"
            )?;
        }

        writeln!(out, "Program: {}", metadata.name)?;
        writeln!(out, "Goal: {goal}")?;
        writeln!(out, "Difficulty: {difficulty}")?;
        writeln!(out, "Program Type: {program_type}")?;
        writeln!(out, "Days Per Week: {} days", self.spec.days_per_week())?;
        writeln!(out, "Selected Training Days: {}", self.spec.weekdays)?;
        writeln!(out, "Total Length: {weeks} weeks")?;
        if let Some(focus) = metadata.detail_text("focus_area") {
            writeln!(out, "Focus Area: {focus}")?;
        }
        match metadata.detail_text("equipment") {
            Some(equipment) => writeln!(out, "Available Equipment: {equipment}")?,
            None => writeln!(out, "Available Equipment: Basic fitness equipment")?,
        }
        if let Some(formats) = metadata.detail_text("workout_format") {
            writeln!(out, "Workout Formats to Include: {formats}")?;
        }
        if let Some(personalization) = metadata.detail_text("personalization") {
            writeln!(out, "Personalization: {personalization}")?;
        }

        self.write_references(out)?;

        writeln!(out)?;
        writeln!(out, "Format each workout body with these sections, in this order:")?;
        for section in SectionName::ORDERED {
            writeln!(out, "## {}", section.title())?;
        }
        writeln!(out)?;
        writeln!(
            out,
            "The program should follow logical progression based on the selected program type \
             ({program_type})."
        )?;
        writeln!(
            out,
            "IMPORTANT: The workouts must be scheduled on the dates listed below. DO NOT create \
             workouts on any other day."
        )?;
        writeln!(out)?;
        writeln!(out, "Your response MUST be in this exact JSON format:")?;
        writeln!(out, "{{")?;
        writeln!(out, "  \"title\": \"Training Program for {goal}\",")?;
        writeln!(
            out,
            "  \"description\": \"A {weeks}-week {difficulty} program summary\","
        )?;
        writeln!(
            out,
            "  \"overview\": \"Methodology, periodization approach and expected outcomes\","
        )?;
        writeln!(out, "  \"workouts\": [")?;
        writeln!(out, "    {{")?;
        writeln!(
            out,
            "      \"title\": \"Week X, Day Y: [Focus Area] and [Training Focus]\","
        )?;
        writeln!(
            out,
            "      \"body\": \"Workout description using the sections above\","
        )?;
        writeln!(out, "      \"date\": \"YYYY-MM-DD\"")?;
        writeln!(out, "    }}")?;
        writeln!(out, "  ]")?;
        writeln!(out, "}}")?;
        writeln!(out)?;
        writeln!(
            out,
            "The workouts array must contain exactly {} workouts.",
            self.slots.len()
        )?;
        writeln!(out)?;
        writeln!(out, "Use the following dates for each workout:")?;
        for line in slot_lines(self.slots) {
            writeln!(out, "{line}")?;
        }
        Ok(())
    }

    fn write_references(&self, out: &mut String) -> std::fmt::Result {
        if self.references.is_empty() {
            return Ok(());
        }
        writeln!(out)?;
        writeln!(
            out,
            "Reference workouts from the client (match their style and level):"
        )?;
        for reference in self.references {
            writeln!(out, "### {}", reference.title)?;
            let body = reference.body.trim();
            if !body.is_empty() {
                writeln!(out, "{body}")?;
            }
        }
        Ok(())
    }
}

/// One `Workout N: <date> (Week w, Day d)` line per slot.
pub fn slot_lines(slots: &[ScheduledSlot]) -> Vec<String> {
    slots
        .iter()
        .map(|slot| {
            format!(
                "Workout {}: {} (Week {}, Day {})",
                slot.index + 1,
                slot.date,
                slot.week,
                slot.day_in_week
            )
        })
        .collect()
}

/// Builds the prompt for a program without reference workouts.
pub fn build_prompt(
    spec: &ProgramSpec,
    metadata: &ProgramMetadata,
    slots: &[ScheduledSlot],
) -> String {
    PromptRequest::new(spec, metadata, slots).build()
}
