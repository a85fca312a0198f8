//! Workout content normalization.
//!
//! Generated workouts arrive as flat strings, structured objects keyed by
//! section name, or anything in between. [`normalize`] turns any of them into
//! a [`CanonicalWorkout`] whose body is a single markdown-like string with
//! `## Section` headers in a fixed order. It never fails: content it does not
//! understand is serialized verbatim.
//!
//! ```rust
//! use cadence_core::normalize::normalize;
//! use serde_json::json;
//!
//! let workout = normalize(&json!({
//!     "title": "Lower body",
//!     "Warmup": [{"movement": "Row", "duration": "5 min"}],
//!     "Main Workout": {"Back Squat": {"sets": 5, "reps": 5}},
//! }));
//! assert!(workout.body.starts_with("## Warm-up\n- Row - 5 min"));
//! assert!(workout.body.contains("## Main Workout\nBack Squat:\n- sets: 5"));
//! ```

pub mod response;
pub mod section;

use jiff::civil::Date;
use serde_json::{Map, Value};

pub use response::{GenerationResponse, coerce_workouts_array, extract_json, parse_generation_response};
pub use section::{Section, SectionName};

use crate::models::{CanonicalWorkout, Tags};

/// Keys holding the workout title, in lookup order.
const TITLE_KEYS: [&str; 2] = ["title", "name"];

/// Keys holding a suggested date, in lookup order.
const DATE_KEYS: [&str; 5] = [
    "scheduled_date",
    "scheduledDate",
    "suggestedDate",
    "suggested_date",
    "date",
];

/// Keys whose value is either body content or a container of sections.
const CONTAINER_KEYS: [&str; 4] = ["description", "body", "workoutDetails", "workout"];

/// Container keys whose plain text is a flat description rather than the
/// main workout.
const FLAT_KEYS: [&str; 2] = ["description", "body"];

/// Normalizes a single generated workout.
pub fn normalize(raw: &Value) -> CanonicalWorkout {
    normalize_at(raw, 0)
}

/// Normalizes the workout at `index` of a generated list; untitled workouts
/// are named after their 1-based position.
pub fn normalize_at(raw: &Value, index: usize) -> CanonicalWorkout {
    let default_title = || format!("Workout {}", index + 1);

    let object = match raw {
        Value::Object(object) => object,
        Value::String(body) => return CanonicalWorkout::new(default_title(), body.clone()),
        other => {
            let body = Section::classify(other)
                .map(|section| section.render())
                .unwrap_or_default();
            return CanonicalWorkout::new(default_title(), body);
        }
    };

    let title = TITLE_KEYS
        .iter()
        .filter_map(|key| object.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .find(|title| !title.is_empty())
        .map(str::to_string)
        .unwrap_or_else(default_title);

    let mut workout = CanonicalWorkout::new(title, render_body(object));
    workout.scheduled_date = DATE_KEYS
        .iter()
        .filter_map(|key| object.get(*key).and_then(Value::as_str))
        .find_map(parse_date);
    workout.persisted_id = object.get("persisted_id").and_then(Value::as_u64);
    workout.is_reference = object
        .get("is_reference")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    workout.tags = collect_tags(object);
    workout
}

/// Collects sections from a workout object and renders the body.
fn render_body(object: &Map<String, Value>) -> String {
    let mut body = SectionedBody::default();

    for (key, value) in object {
        if CONTAINER_KEYS.contains(&key.as_str()) {
            match value {
                Value::String(text) if FLAT_KEYS.contains(&key.as_str()) => {
                    body.flat.push(text.clone());
                }
                Value::Object(inner) if has_section_keys(inner) => {
                    for (inner_key, inner_value) in inner {
                        match SectionName::from_key(inner_key) {
                            Some(name) => body.add(name, inner_value),
                            None => body.add_extra(inner_key, inner_value),
                        }
                    }
                }
                other => body.add(SectionName::MainWorkout, other),
            }
        } else if let Some(name) = SectionName::from_key(key) {
            body.add(name, value);
        }
    }

    body.render()
}

fn has_section_keys(object: &Map<String, Value>) -> bool {
    object.keys().any(|key| SectionName::from_key(key).is_some())
}

/// Everything that is not title, date, identity, body or section content
/// becomes a tag.
fn collect_tags(object: &Map<String, Value>) -> Tags {
    let mut tags = Tags::new();
    for (key, value) in object {
        let key = key.as_str();
        if TITLE_KEYS.contains(&key)
            || DATE_KEYS.contains(&key)
            || CONTAINER_KEYS.contains(&key)
            || matches!(key, "persisted_id" | "is_reference")
            || SectionName::from_key(key).is_some()
        {
            continue;
        }
        match (key, value) {
            ("tags", Value::Object(inner)) => {
                tags.extend(inner.iter().map(|(k, v)| (k.clone(), v.clone())));
            }
            _ => {
                tags.insert(key.to_string(), value.clone());
            }
        }
    }
    tags
}

fn parse_date(text: &str) -> Option<Date> {
    let text = text.trim();
    text.parse::<Date>()
        .ok()
        .or_else(|| text.get(..10).and_then(|prefix| prefix.parse::<Date>().ok()))
}

/// Body parts gathered from a workout object before rendering.
#[derive(Default)]
struct SectionedBody {
    flat: Vec<String>,
    fixed: [Vec<Section>; 4],
    extras: Vec<(String, Section)>,
}

impl SectionedBody {
    fn add(&mut self, name: SectionName, value: &Value) {
        if let Some(section) = Section::classify(value) {
            self.fixed[name as usize].push(section);
        }
    }

    fn add_extra(&mut self, key: &str, value: &Value) {
        if let Some(section) = Section::classify(value) {
            self.extras.push((key.to_string(), section));
        }
    }

    fn is_sectioned(&self) -> bool {
        self.fixed.iter().any(|sections| !sections.is_empty()) || !self.extras.is_empty()
    }

    fn render(self) -> String {
        if !self.is_sectioned() {
            return self.flat.join("\n\n");
        }

        let mut parts: Vec<String> = self
            .flat
            .iter()
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .collect();

        for name in SectionName::ORDERED {
            let content: Vec<String> = self.fixed[name as usize]
                .iter()
                .map(Section::render)
                .filter(|text| !text.is_empty())
                .collect();
            if !content.is_empty() {
                parts.push(format!("## {}\n{}", name.title(), content.join("\n")));
            }
        }

        for (key, section) in &self.extras {
            let content = section.render();
            if !content.is_empty() {
                parts.push(format!("## {key}\n{content}"));
            }
        }

        parts.join("\n\n")
    }
}
