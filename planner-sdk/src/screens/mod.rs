//! Screen controllers
//!
//! Each screen holds its input state and one `RequestSession`, and is
//! mounted through an `AuthGate`. Dropping a screen tears its session down,
//! so responses arriving afterwards change nothing.

pub mod interview;
pub mod predictor;
pub mod resources;
pub mod roadmap;

pub use interview::{InterviewKind, InterviewPrepScreen};
pub use predictor::{PredictionField, PredictionForm, PredictionKind, PredictorScreen};
pub use resources::{ResourceSearchKind, ResourceSearchScreen};
pub use roadmap::{RoadmapBuilderScreen, RoadmapKind};

use crate::coerce::coerce_text;
use crate::error::{Result, ServiceError};

/// Topic shortcuts offered by the resource search and roadmap screens
pub const SUGGESTIONS: [&str; 6] = [
    "Python",
    "Machine Learning",
    "Data Structures",
    "React",
    "Generative AI",
    "SQL",
];

/// Message for a blank topic
pub const EMPTY_TOPIC_MESSAGE: &str = "Please enter a topic.";

/// Trimmed topic, or a validation error if nothing is left
pub(crate) fn require_topic(raw: &str) -> Result<String> {
    coerce_text(raw).ok_or_else(|| ServiceError::validation(EMPTY_TOPIC_MESSAGE))
}

/// The value a suggestion click submits: the suggestion itself when it is
/// non-empty, the current field otherwise
pub(crate) fn pick_topic<'a>(suggestion: &'a str, current: &'a str) -> &'a str {
    if suggestion.is_empty() {
        current
    } else {
        suggestion
    }
}
