//! Request payloads and render-ready view models for the planner backend
//!
//! Payloads are built fresh per submission. View models are produced by the
//! normalizer from whatever JSON the backend returned.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Endpoint paths, relative to the configured base URL
pub mod endpoints {
    pub const PREDICT: &str = "api/predict";
    pub const RESOURCES: &str = "api/resources";
    pub const ROADMAP: &str = "api/roadmap";
    pub const INTERVIEW_TEXT: &str = "api/interview";
    pub const INTERVIEW_UPLOAD: &str = "api/interview_questions";
}

/// Body of `POST api/predict`
///
/// Every field is always serialized; blank or non-numeric inputs become `0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionPayload {
    pub failures: i64,
    pub higher: i64,
    pub absences: i64,
    pub freetime: i64,
    pub goout: i64,
    pub famrel: i64,
    pub famsup: i64,
    pub schoolsup: i64,
    pub paid: i64,
    pub traveltime: i64,
    pub health: i64,
    pub internet: i64,
    pub age: i64,
}

/// Topic query shared by the resource search and roadmap endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicPayload {
    pub topic: String,
}

impl TopicPayload {
    pub fn new(topic: impl Into<String>) -> Self {
        Self { topic: topic.into() }
    }
}

/// Predicted study time, either a number or the "N/A" placeholder
#[derive(Debug, Clone, PartialEq)]
pub enum StudyHours {
    /// A value the backend returned (usually a number, kept as-is)
    Value(Value),
    /// Neither alias field was present
    NotAvailable,
}

impl StudyHours {
    /// Numeric value, when the backend sent a number
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            StudyHours::Value(v) => v.as_f64(),
            StudyHours::NotAvailable => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, StudyHours::Value(_))
    }
}

impl Serialize for StudyHours {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            StudyHours::Value(v) => v.serialize(serializer),
            StudyHours::NotAvailable => serializer.serialize_str("N/A"),
        }
    }
}

impl fmt::Display for StudyHours {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StudyHours::Value(Value::String(s)) => write!(f, "{}", s),
            StudyHours::Value(v) => write!(f, "{}", v),
            StudyHours::NotAvailable => write!(f, "N/A"),
        }
    }
}

/// Render-ready prediction result
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionView {
    pub study_hours: StudyHours,
    pub confidence_percent: Option<f64>,
    pub factors: Vec<String>,
    pub recommendation: Option<String>,
    /// The body exactly as received, for debugging views
    pub raw: Value,
}

/// One YouTube result
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoItem {
    pub video_id: String,
    pub title: String,
}

impl VideoItem {
    pub fn embed_url(&self) -> String {
        format!("https://www.youtube.com/embed/{}", self.video_id)
    }

    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.video_id)
    }
}

/// One Coursera result
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CourseItem {
    pub title: String,
    pub url: String,
}

/// One GitHub result
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RepoItem {
    pub repo: String,
    pub url: String,
}

/// Render-ready resource search result, in backend order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceBundleView {
    pub youtube_videos: Vec<VideoItem>,
    pub coursera_courses: Vec<CourseItem>,
    pub github_repos: Vec<RepoItem>,
}

impl ResourceBundleView {
    /// True iff all three lists are empty
    pub fn empty(&self) -> bool {
        self.youtube_videos.is_empty()
            && self.coursera_courses.is_empty()
            && self.github_repos.is_empty()
    }

    /// Total number of items across all sources
    pub fn len(&self) -> usize {
        self.youtube_videos.len() + self.coursera_courses.len() + self.github_repos.len()
    }
}

/// Render-ready roadmap
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapView {
    pub raw_text: String,
    pub steps: Vec<String>,
}

/// Resume source for interview question generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterviewRequest {
    /// Pasted resume text, sent as `{"resumeText": ...}`
    Text { resume_text: String },
    /// Uploaded resume file with the submitter's name or email
    Upload {
        user_id: String,
        file: Option<ResumeFile>,
    },
}

/// A resume file picked for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl ResumeFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let content_type = guess_content_type(&file_name).map(str::to_string);
        Self {
            file_name,
            content_type,
            bytes,
        }
    }

    /// Read a resume from disk
    pub fn from_path(path: impl AsRef<std::path::Path>) -> crate::error::Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| {
            crate::error::ServiceError::validation(format!(
                "Could not read resume {}: {}",
                path.display(),
                e
            ))
        })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "resume".to_string());
        Ok(Self::new(file_name, bytes))
    }
}

fn guess_content_type(file_name: &str) -> Option<&'static str> {
    let ext = file_name.rsplit_once('.')?.1.to_ascii_lowercase();
    match ext.as_str() {
        "pdf" => Some("application/pdf"),
        "doc" => Some("application/msword"),
        "docx" => Some("application/vnd.openxmlformats-officedocument.wordprocessingml.document"),
        "txt" => Some("text/plain"),
        _ => None,
    }
}

/// One generated interview question
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QaPair {
    pub question: String,
    pub answer: String,
}

/// Render-ready interview questions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewView {
    pub qa_pairs: Vec<QaPair>,
}
