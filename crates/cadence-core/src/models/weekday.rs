//! Compact set of training weekdays.

use std::{fmt, str::FromStr};

use jiff::civil::Weekday;
use serde::{Deserialize, Serialize};

/// Weekdays in Monday-first order.
pub const WEEK: [Weekday; 7] = [
    Weekday::Monday,
    Weekday::Tuesday,
    Weekday::Wednesday,
    Weekday::Thursday,
    Weekday::Friday,
    Weekday::Saturday,
    Weekday::Sunday,
];

fn bit(day: Weekday) -> u8 {
    1 << (day.to_monday_zero_offset() as u8)
}

/// Full lowercase name of a weekday.
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Monday => "monday",
        Weekday::Tuesday => "tuesday",
        Weekday::Wednesday => "wednesday",
        Weekday::Thursday => "thursday",
        Weekday::Friday => "friday",
        Weekday::Saturday => "saturday",
        Weekday::Sunday => "sunday",
    }
}

/// Three-letter capitalized abbreviation of a weekday.
pub fn weekday_abbrev(day: Weekday) -> &'static str {
    match day {
        Weekday::Monday => "Mon",
        Weekday::Tuesday => "Tue",
        Weekday::Wednesday => "Wed",
        Weekday::Thursday => "Thu",
        Weekday::Friday => "Fri",
        Weekday::Saturday => "Sat",
        Weekday::Sunday => "Sun",
    }
}

/// Parses a weekday from its full name or a common abbreviation,
/// case-insensitively.
pub fn parse_weekday(s: &str) -> Option<Weekday> {
    let day = match s.trim().to_lowercase().as_str() {
        "monday" | "mon" | "mo" => Weekday::Monday,
        "tuesday" | "tue" | "tues" | "tu" => Weekday::Tuesday,
        "wednesday" | "wed" | "we" => Weekday::Wednesday,
        "thursday" | "thu" | "thur" | "thurs" | "th" => Weekday::Thursday,
        "friday" | "fri" | "fr" => Weekday::Friday,
        "saturday" | "sat" | "sa" => Weekday::Saturday,
        "sunday" | "sun" | "su" => Weekday::Sunday,
        _ => return None,
    };
    Some(day)
}

/// A set of weekdays, iterated Monday-first.
///
/// Serialized as a list of lowercase weekday names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct WeekdaySet(u8);

impl WeekdaySet {
    /// An empty set.
    pub const fn new() -> Self {
        Self(0)
    }

    /// All seven days.
    pub const fn all() -> Self {
        Self(0b0111_1111)
    }

    /// Adds a day, returning true if it was not already present.
    pub fn insert(&mut self, day: Weekday) -> bool {
        let added = !self.contains(day);
        self.0 |= bit(day);
        added
    }

    /// Removes a day, returning true if it was present.
    pub fn remove(&mut self, day: Weekday) -> bool {
        let removed = self.contains(day);
        self.0 &= !bit(day);
        removed
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.0 & bit(day) != 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Iterates the selected days Monday-first.
    pub fn iter(&self) -> impl Iterator<Item = Weekday> + '_ {
        WEEK.into_iter().filter(|day| self.contains(*day))
    }

    /// Earliest selected day of the week.
    pub fn first(&self) -> Option<Weekday> {
        self.iter().next()
    }

    /// Latest selected day of the week.
    pub fn last(&self) -> Option<Weekday> {
        self.iter().last()
    }
}

impl FromIterator<Weekday> for WeekdaySet {
    fn from_iter<I: IntoIterator<Item = Weekday>>(iter: I) -> Self {
        let mut set = WeekdaySet::new();
        for day in iter {
            set.insert(day);
        }
        set
    }
}

impl fmt::Display for WeekdaySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(weekday_abbrev).collect();
        write!(f, "{}", names.join(", "))
    }
}

impl FromStr for WeekdaySet {
    type Err = String;

    /// Parses a comma-separated list such as `mon,wed,fri`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| parse_weekday(part).ok_or_else(|| format!("Invalid weekday: {part}")))
            .collect()
    }
}

impl TryFrom<Vec<String>> for WeekdaySet {
    type Error = String;

    fn try_from(names: Vec<String>) -> Result<Self, Self::Error> {
        names
            .iter()
            .map(|name| parse_weekday(name).ok_or_else(|| format!("Invalid weekday: {name}")))
            .collect()
    }
}

impl From<WeekdaySet> for Vec<String> {
    fn from(set: WeekdaySet) -> Self {
        set.iter().map(|day| weekday_name(day).to_string()).collect()
    }
}
