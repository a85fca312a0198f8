//! Section classification and rendering.
//!
//! Generated section content arrives in many shapes. Each one is classified
//! once into a [`Section`] and rendered from there.

use std::fmt::Write as _;

use serde_json::{Map, Value};

/// The fixed sections of a workout body, in render order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SectionName {
    WarmUp,
    MainWorkout,
    CoolDown,
    PerformanceNotes,
}

impl SectionName {
    pub const ORDERED: [SectionName; 4] = [
        SectionName::WarmUp,
        SectionName::MainWorkout,
        SectionName::CoolDown,
        SectionName::PerformanceNotes,
    ];

    /// Header text used in rendered bodies.
    pub fn title(&self) -> &'static str {
        match self {
            SectionName::WarmUp => "Warm-up",
            SectionName::MainWorkout => "Main Workout",
            SectionName::CoolDown => "Cool-down",
            SectionName::PerformanceNotes => "Performance Notes",
        }
    }

    /// Matches a payload key against the known section names and their
    /// synonyms, ignoring case and punctuation.
    ///
    /// ```rust
    /// use cadence_core::normalize::SectionName;
    ///
    /// assert_eq!(SectionName::from_key("Warm-up"), Some(SectionName::WarmUp));
    /// assert_eq!(
    ///     SectionName::from_key("Cool-down/Mobility Work"),
    ///     Some(SectionName::CoolDown)
    /// );
    /// assert_eq!(SectionName::from_key("workoutDetails"), Some(SectionName::MainWorkout));
    /// assert_eq!(SectionName::from_key("equipment"), None);
    /// ```
    pub fn from_key(key: &str) -> Option<SectionName> {
        let folded: String = key
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .map(|c| c.to_ascii_lowercase())
            .collect();

        match folded.as_str() {
            "warmup" | "warmups" | "warmupmobility" => Some(SectionName::WarmUp),
            "mainworkout" | "workout" | "workoutdetails" | "mainset" | "main" | "mainsession" => {
                Some(SectionName::MainWorkout)
            }
            "cooldown" | "cooldownmobility" | "cooldownmobilitywork" | "cooldownandmobility" => {
                Some(SectionName::CoolDown)
            }
            "performancenotes" | "notes" | "coachingnotes" => Some(SectionName::PerformanceNotes),
            _ => None,
        }
    }
}

/// Classified section content.
#[derive(Debug, Clone, PartialEq)]
pub enum Section {
    /// Free text, rendered verbatim
    Text(String),
    /// A list of strings, rendered as bullets
    Lines(Vec<String>),
    /// A list with structured members
    Items(Vec<Value>),
    /// An object keyed by movement or block name
    Keyed(Map<String, Value>),
}

impl Section {
    /// Classifies a raw value. Returns `None` for null and blank content.
    pub fn classify(value: &Value) -> Option<Section> {
        match value {
            Value::Null => None,
            Value::String(s) if s.trim().is_empty() => None,
            Value::String(s) => Some(Section::Text(s.clone())),
            Value::Bool(_) | Value::Number(_) => Some(Section::Text(value.to_string())),
            Value::Array(items) if items.is_empty() => None,
            Value::Array(items) => {
                let lines: Option<Vec<String>> = items
                    .iter()
                    .map(|item| item.as_str().map(str::to_string))
                    .collect();
                Some(match lines {
                    Some(lines) => Section::Lines(lines),
                    None => Section::Items(items.clone()),
                })
            }
            Value::Object(map) if map.is_empty() => None,
            Value::Object(map) => Some(Section::Keyed(map.clone())),
        }
    }

    /// Renders the section content without its header.
    pub fn render(&self) -> String {
        let mut out = String::new();
        match self {
            Section::Text(text) => out.push_str(text.trim()),
            Section::Lines(lines) => {
                for line in lines {
                    push_line(&mut out, &bullet(line.trim()));
                }
            }
            Section::Items(items) => {
                for item in items {
                    render_item(&mut out, item, 0);
                }
            }
            Section::Keyed(map) => render_keyed(&mut out, map, 0),
        }
        out
    }
}

const LABEL_KEYS: [&str; 3] = ["movement", "exercise", "name"];
const DURATION_KEYS: [&str; 2] = ["duration", "time"];

fn push_line(out: &mut String, line: &str) {
    if !out.is_empty() {
        out.push('\n');
    }
    out.push_str(line);
}

fn bullet(text: &str) -> String {
    if text.starts_with("- ") || text.starts_with("* ") {
        text.to_string()
    } else {
        format!("- {text}")
    }
}

fn indent(depth: usize) -> String {
    "  ".repeat(depth)
}

/// Scalar text: strings unquoted, everything else as JSON.
pub(crate) fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn first_field<'a>(map: &'a Map<String, Value>, keys: &[&str]) -> Option<(&'a str, &'a Value)> {
    keys.iter().find_map(|key| {
        map.get_key_value(*key)
            .filter(|(_, v)| !v.is_null())
            .map(|(k, v)| (k.as_str(), v))
    })
}

fn render_item(out: &mut String, item: &Value, depth: usize) {
    let pad = indent(depth);
    match item {
        Value::Object(map) => match first_field(map, &LABEL_KEYS) {
            Some((label_key, label)) => {
                let mut line = format!("{pad}- {}", scalar_text(label));
                let duration = first_field(map, &DURATION_KEYS);
                if let Some((_, value)) = duration {
                    let _ = write!(line, " - {}", scalar_text(value));
                }

                let extras: Vec<String> = map
                    .iter()
                    .filter(|(k, _)| {
                        k.as_str() != label_key && Some(k.as_str()) != duration.map(|(dk, _)| dk)
                    })
                    .map(|(k, v)| format!("{k}: {}", inline_value(v)))
                    .collect();
                if !extras.is_empty() {
                    let _ = write!(line, " ({})", extras.join(", "));
                }
                push_line(out, &line);
            }
            None => push_line(out, &format!("{pad}- {item}")),
        },
        Value::String(s) => push_line(out, &format!("{pad}{}", bullet(s.trim()))),
        other => push_line(out, &format!("{pad}- {other}")),
    }
}

fn inline_value(value: &Value) -> String {
    match value {
        Value::Array(items) => items.iter().map(inline_value).collect::<Vec<_>>().join(", "),
        Value::Object(_) => value.to_string(),
        other => scalar_text(other),
    }
}

/// Top-level entries render as `key: value`; nested entries become indented
/// `- k: v` lines.
fn render_keyed(out: &mut String, map: &Map<String, Value>, depth: usize) {
    let pad = indent(depth.saturating_sub(1));
    let marker = if depth == 0 { "" } else { "- " };

    for (key, value) in map {
        match value {
            Value::Object(inner) if !inner.is_empty() => {
                push_line(out, &format!("{pad}{marker}{key}:"));
                render_keyed(out, inner, depth + 1);
            }
            Value::Array(items) if !items.is_empty() => {
                push_line(out, &format!("{pad}{marker}{key}:"));
                for item in items {
                    render_item(out, item, depth);
                }
            }
            Value::Object(_) | Value::Array(_) | Value::Null => {
                push_line(out, &format!("{pad}{marker}{key}:"));
            }
            scalar => push_line(out, &format!("{pad}{marker}{key}: {}", scalar_text(scalar))),
        }
    }
}
