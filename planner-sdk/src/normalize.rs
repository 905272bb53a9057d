//! Response normalization
//!
//! The backend is loose about its response shapes: alias field names, fields
//! that are sometimes a list and sometimes a scalar, optional sections. Every
//! screen reads its body through one of these functions, which map whatever
//! arrived onto a fixed view model. Only the roadmap can fail, because a
//! missing roadmap text leaves nothing to show.

use serde_json::{Map, Value};

use crate::error::{Result, ServiceError};
use crate::segment::segment;
use crate::services::models::{
    CourseItem, InterviewView, PredictionView, QaPair, RepoItem, ResourceBundleView,
    RoadmapView, StudyHours, VideoItem,
};

/// Message shown when a roadmap response carries no roadmap text
pub const MISSING_ROADMAP_MESSAGE: &str = "Failed to generate roadmap.";

/// Normalize a `POST api/predict` body
///
/// - study hours: `predicted_study_time`, else `predicted_hours`, else "N/A"
/// - confidence: a trailing `%` stripped off a string `confidence_level`
/// - factors: list used as-is, any other truthy value wrapped in a list
/// - recommendation: passed through
pub fn normalize_prediction(body: &Value) -> PredictionView {
    let study_hours = present(body, "predicted_study_time")
        .or_else(|| present(body, "predicted_hours"))
        .map(|v| StudyHours::Value(v.clone()))
        .unwrap_or(StudyHours::NotAvailable);

    let confidence_percent = body
        .get("confidence_level")
        .and_then(Value::as_str)
        .and_then(parse_percent);

    let factors = match body.get("key_influencing_factors") {
        Some(Value::Array(items)) => items.iter().map(display_text).collect(),
        Some(other) if is_truthy(other) => vec![display_text(other)],
        _ => Vec::new(),
    };

    let recommendation = present(body, "recommendation").map(display_text);

    PredictionView {
        study_hours,
        confidence_percent,
        factors,
        recommendation,
        raw: body.clone(),
    }
}

/// Normalize a `GET api/resources` body
///
/// Missing or non-list sections become empty lists. Items are kept in the
/// order received, one view item per element, even when an element is
/// malformed.
pub fn normalize_resources(body: &Value) -> ResourceBundleView {
    ResourceBundleView {
        youtube_videos: list(body, "youtube_videos")
            .map(|item| VideoItem {
                video_id: text_field(item, "videoId"),
                title: text_field(item, "title"),
            })
            .collect(),
        coursera_courses: list(body, "coursera_courses")
            .map(|item| CourseItem {
                title: text_field(item, "title"),
                url: text_field(item, "url"),
            })
            .collect(),
        github_repos: list(body, "github_repos")
            .map(|item| RepoItem {
                repo: text_field(item, "repo"),
                url: text_field(item, "url"),
            })
            .collect(),
    }
}

/// Normalize a `GET api/roadmap` body
///
/// A missing, null, non-string or empty `roadmap` field is an error rather
/// than an empty roadmap.
pub fn normalize_roadmap(body: &Value) -> Result<RoadmapView> {
    match body.get("roadmap") {
        Some(Value::String(text)) if !text.is_empty() => Ok(RoadmapView {
            raw_text: text.clone(),
            steps: segment(text),
        }),
        _ => Err(ServiceError::normalization(MISSING_ROADMAP_MESSAGE)),
    }
}

/// Normalize an interview questions body
///
/// The text endpoint answers with `qaPairs`, the upload endpoint with
/// `questions`; whichever is a list is used.
pub fn normalize_interview(body: &Value) -> InterviewView {
    let pairs = ["qaPairs", "questions"]
        .iter()
        .find_map(|key| body.get(*key).and_then(Value::as_array));

    InterviewView {
        qa_pairs: pairs
            .map(|items| {
                items
                    .iter()
                    .map(|item| QaPair {
                        question: text_field(item, "question"),
                        answer: text_field(item, "answer"),
                    })
                    .collect()
            })
            .unwrap_or_default(),
    }
}

/// A field that exists and is not null
fn present<'a>(body: &'a Value, key: &str) -> Option<&'a Value> {
    body.get(key).filter(|v| !v.is_null())
}

/// Elements of an array field, or nothing
fn list<'a>(body: &'a Value, key: &str) -> impl Iterator<Item = &'a Value> {
    body.get(key)
        .and_then(Value::as_array)
        .map(|items| items.iter())
        .into_iter()
        .flatten()
}

/// A string field of an object element, empty when absent
fn text_field(item: &Value, key: &str) -> String {
    item.as_object()
        .and_then(|obj: &Map<String, Value>| obj.get(key))
        .map(display_text)
        .unwrap_or_default()
}

/// Strings as-is, anything else as compact JSON
fn display_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// "82%" -> 82.0, "82" -> 82.0, "high" -> None
fn parse_percent(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let number = trimmed.strip_suffix('%').unwrap_or(trimmed).trim();
    number.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// JSON truthiness as the backend's web client understood it
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
