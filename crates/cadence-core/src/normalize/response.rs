//! Parsing of raw generation responses.

use serde_json::Value;

use super::SectionName;
use crate::error::{CoachError, Result};

/// Keys that can carry a workout body.
const BODY_KEYS: [&str; 4] = ["description", "body", "workout", "workoutDetails"];

/// A generation response split into program-level text and raw workouts.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationResponse {
    pub title: Option<String>,
    pub description: Option<String>,
    pub overview: Option<String>,
    /// Raw workout payloads, still to be normalized
    pub workouts: Vec<Value>,
}

/// Finds the JSON document inside a model reply that may wrap it in prose or
/// a fenced code block.
pub fn extract_json(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        return Some(trimmed);
    }

    if let Some(start) = text.find("```json") {
        let start = start + 7;
        if let Some(end) = text[start..].find("```") {
            return Some(text[start..start + end].trim());
        }
    }

    if let Some(start) = text.find("```") {
        let start = start + 3;
        let content_start = text[start..]
            .find('\n')
            .map(|i| start + i + 1)
            .unwrap_or(start);
        if let Some(end) = text[content_start..].find("```") {
            return Some(text[content_start..content_start + end].trim());
        }
    }

    for (open, close) in [('{', '}'), ('[', ']')] {
        if let (Some(start), Some(end)) = (text.find(open), text.rfind(close))
            && start < end
        {
            return Some(&text[start..=end]);
        }
    }

    None
}

/// Parses raw reply text into a [`GenerationResponse`].
pub fn parse_generation_response(text: &str) -> Result<GenerationResponse> {
    let json = extract_json(text)
        .ok_or_else(|| CoachError::malformed("could not find JSON in the response"))?;
    let value: Value = serde_json::from_str(json)
        .map_err(|e| CoachError::malformed(format!("response is not valid JSON: {e}")))?;

    let workouts = coerce_workouts_array(&value)?;
    let program_text = |key: &str| {
        value
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    let is_single_workout = workouts.len() == 1 && workouts[0] == value;
    Ok(if is_single_workout {
        GenerationResponse {
            title: None,
            description: None,
            overview: None,
            workouts,
        }
    } else {
        GenerationResponse {
            title: program_text("title"),
            description: program_text("description"),
            overview: program_text("overview"),
            workouts,
        }
    })
}

/// Finds the list of workouts in a parsed response.
///
/// Accepted shapes, in order: an object with a `workouts` array, a bare
/// array, an object's first property holding a list of workout objects, or a
/// single workout object with a title and a body-like field. Arrays of
/// scalars or of non-workout objects (equipment, tags, exercises) never count
/// as the workout list.
pub fn coerce_workouts_array(raw: &Value) -> Result<Vec<Value>> {
    let workouts = match raw {
        Value::Array(items) => items.clone(),
        Value::Object(object) => {
            if let Some(Value::Array(items)) = object.get("workouts") {
                items.clone()
            } else if let Some(items) = object
                .iter()
                .filter(|(key, _)| SectionName::from_key(key).is_none())
                .find_map(|(_, value)| value.as_array().filter(|items| is_workout_list(items)))
            {
                items.clone()
            } else if object.contains_key("title") && has_body(raw) {
                vec![raw.clone()]
            } else {
                return Err(CoachError::malformed("could not find a workouts array"));
            }
        }
        _ => {
            return Err(CoachError::malformed(
                "expected a JSON object or array of workouts",
            ));
        }
    };

    if workouts.is_empty() {
        return Err(CoachError::malformed("the workouts array is empty"));
    }

    if let Some(index) = workouts.iter().position(|w| !is_workout_like(w)) {
        return Err(CoachError::malformed(format!(
            "workout {} has neither a title nor a body",
            index + 1
        )));
    }

    Ok(workouts)
}

fn has_body(value: &Value) -> bool {
    value.as_object().is_some_and(|object| {
        object.iter().any(|(key, v)| {
            !v.is_null()
                && (BODY_KEYS.contains(&key.as_str()) || SectionName::from_key(key).is_some())
        })
    })
}

fn is_workout_list(items: &[Value]) -> bool {
    !items.is_empty() && items.iter().all(is_workout_like)
}

fn is_workout_like(value: &Value) -> bool {
    value.as_object().is_some_and(|object| {
        object.get("title").is_some_and(|t| !t.is_null()) || has_body(value)
    })
}
