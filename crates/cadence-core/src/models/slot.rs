//! Concrete schedule slots.

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

/// One dated position in a program schedule.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScheduledSlot {
    /// Position in the schedule (0-indexed)
    pub index: usize,

    /// Program week (1-indexed)
    pub week: u32,

    /// Training day within the week (1-indexed)
    pub day_in_week: u32,

    pub date: Date,
}

impl ScheduledSlot {
    /// Builds the slot at `index` for a program with `days_per_week` training
    /// days.
    pub fn new(index: usize, days_per_week: usize, date: Date) -> Self {
        let per_week = days_per_week.max(1);
        Self {
            index,
            week: (index / per_week) as u32 + 1,
            day_in_week: (index % per_week) as u32 + 1,
            date,
        }
    }
}
