//! Tests for response normalization
//!
//! These tests feed the normalizer the response shapes the backend is known
//! to produce, including alias fields and partial bodies.

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::error::{ErrorKind, ServiceError};
    use crate::normalize::{
        normalize_interview, normalize_prediction, normalize_resources, normalize_roadmap,
        MISSING_ROADMAP_MESSAGE,
    };
    use crate::services::models::StudyHours;

    #[test]
    fn test_prediction_study_hours_aliases() {
        let view = normalize_prediction(&json!({ "predicted_hours": 3 }));
        assert_eq!(view.study_hours, StudyHours::Value(json!(3)));
        assert_eq!(view.study_hours.as_f64(), Some(3.0));

        let view = normalize_prediction(&json!({
            "predicted_study_time": 2.5,
            "predicted_hours": 3
        }));
        assert_eq!(view.study_hours.as_f64(), Some(2.5));

        let view =
            normalize_prediction(&json!({ "predicted_study_time": null, "predicted_hours": 4 }));
        assert_eq!(view.study_hours.as_f64(), Some(4.0));

        let view = normalize_prediction(&json!({}));
        assert_eq!(view.study_hours, StudyHours::NotAvailable);
        assert_eq!(view.study_hours.to_string(), "N/A");
    }

    #[test]
    fn test_prediction_zero_hours_is_a_value() {
        let view = normalize_prediction(&json!({ "predicted_study_time": 0 }));
        assert!(view.study_hours.is_available());
        assert_eq!(view.study_hours.as_f64(), Some(0.0));
    }

    #[test]
    fn test_prediction_confidence() {
        let view = normalize_prediction(&json!({ "confidence_level": "82%" }));
        assert_eq!(view.confidence_percent, Some(82.0));

        let view = normalize_prediction(&json!({ "confidence_level": "67.5" }));
        assert_eq!(view.confidence_percent, Some(67.5));

        // Only string values are read
        let view = normalize_prediction(&json!({ "confidence_level": 82 }));
        assert_eq!(view.confidence_percent, None);

        let view = normalize_prediction(&json!({ "confidence_level": "high" }));
        assert_eq!(view.confidence_percent, None);

        let view = normalize_prediction(&json!({}));
        assert_eq!(view.confidence_percent, None);
    }

    #[test]
    fn test_prediction_factors() {
        let view = normalize_prediction(&json!({
            "key_influencing_factors": ["absences", "failures"]
        }));
        assert_eq!(view.factors, vec!["absences", "failures"]);

        let view = normalize_prediction(&json!({ "key_influencing_factors": "age" }));
        assert_eq!(view.factors, vec!["age"]);

        let view = normalize_prediction(&json!({ "key_influencing_factors": "" }));
        assert!(view.factors.is_empty());

        let view = normalize_prediction(&json!({ "key_influencing_factors": null }));
        assert!(view.factors.is_empty());

        let view = normalize_prediction(&json!({}));
        assert!(view.factors.is_empty());
    }

    #[test]
    fn test_prediction_recommendation_and_raw() {
        let body = json!({
            "predicted_hours": 3,
            "recommendation": "Study in short sessions",
            "model": "rf-v2"
        });
        let view = normalize_prediction(&body);
        assert_eq!(view.recommendation.as_deref(), Some("Study in short sessions"));
        assert_eq!(view.raw, body);

        let view = normalize_prediction(&json!({ "recommendation": null }));
        assert_eq!(view.recommendation, None);
    }

    #[test]
    fn test_prediction_view_serializes_for_presentation() {
        let view = normalize_prediction(&json!({}));
        let value = serde_json::to_value(&view).unwrap();
        assert_eq!(value["studyHours"], "N/A");
        assert!(value["confidencePercent"].is_null());
        assert_eq!(value["factors"], json!([]));
    }

    #[test]
    fn test_resources_preserve_order() {
        let view = normalize_resources(&json!({
            "youtube_videos": [
                { "videoId": "b2", "title": "Second" },
                { "videoId": "a1", "title": "First" },
                { "videoId": "b2", "title": "Second again" }
            ],
            "coursera_courses": [
                { "title": "Python for Everybody", "url": "https://coursera.org/p4e" }
            ],
            "github_repos": [
                { "repo": "rust-lang/rust", "url": "https://github.com/rust-lang/rust" }
            ]
        }));

        let ids: Vec<&str> = view.youtube_videos.iter().map(|v| v.video_id.as_str()).collect();
        assert_eq!(ids, vec!["b2", "a1", "b2"]);
        assert_eq!(view.coursera_courses[0].title, "Python for Everybody");
        assert_eq!(view.github_repos[0].repo, "rust-lang/rust");
        assert_eq!(view.len(), 5);
        assert!(!view.empty());
        assert_eq!(
            view.youtube_videos[1].embed_url(),
            "https://www.youtube.com/embed/a1"
        );
    }

    #[test]
    fn test_resources_missing_sections_are_empty() {
        let view =
            normalize_resources(&json!({ "youtube_videos": [{ "videoId": "x", "title": "X" }] }));
        assert_eq!(view.youtube_videos.len(), 1);
        assert!(view.coursera_courses.is_empty());
        assert!(view.github_repos.is_empty());
        assert!(!view.empty());

        let view = normalize_resources(&json!({}));
        assert!(view.empty());

        let view = normalize_resources(&json!({ "github_repos": "none" }));
        assert!(view.empty());
    }

    #[test]
    fn test_resources_malformed_items_keep_their_slot() {
        let view = normalize_resources(&json!({
            "coursera_courses": [ "oops", { "title": "Real" }, { "title": 7, "url": null } ]
        }));
        assert_eq!(view.coursera_courses.len(), 3);
        assert_eq!(view.coursera_courses[0].title, "");
        assert_eq!(view.coursera_courses[1].title, "Real");
        assert_eq!(view.coursera_courses[1].url, "");
        assert_eq!(view.coursera_courses[2].title, "7");
    }

    #[test]
    fn test_roadmap_success() {
        let view = normalize_roadmap(&json!({
            "roadmap": "1. Basics\n\n2. Ownership\n   \n3. Async"
        }))
        .unwrap();
        assert_eq!(view.raw_text, "1. Basics\n\n2. Ownership\n   \n3. Async");
        assert_eq!(view.steps, vec!["1. Basics", "2. Ownership", "3. Async"]);
    }

    #[test]
    fn test_roadmap_missing_is_a_normalization_failure() {
        for body in [
            json!({}),
            json!({ "roadmap": null }),
            json!({ "roadmap": "" }),
            json!({ "roadmap": ["a", "b"] }),
            json!({ "error": "LLM quota exceeded" }),
        ] {
            let err = normalize_roadmap(&body).unwrap_err();
            assert!(matches!(err, ServiceError::Normalization(_)), "{}", body);
            assert_eq!(err.kind(), ErrorKind::Normalization);
            assert_eq!(err.message(), MISSING_ROADMAP_MESSAGE);
        }
    }

    #[test]
    fn test_roadmap_whitespace_only_has_no_steps() {
        let view = normalize_roadmap(&json!({ "roadmap": "\n  \n" })).unwrap();
        assert!(view.steps.is_empty());
    }

    #[test]
    fn test_interview_lists() {
        let view = normalize_interview(&json!({
            "qaPairs": [{ "question": "What is Rust?", "answer": "A language." }]
        }));
        assert_eq!(view.qa_pairs.len(), 1);
        assert_eq!(view.qa_pairs[0].question, "What is Rust?");

        let view = normalize_interview(&json!({
            "questions": [
                { "question": "Q1", "answer": "A1" },
                { "question": "Q2" }
            ]
        }));
        assert_eq!(view.qa_pairs.len(), 2);
        assert_eq!(view.qa_pairs[1].answer, "");

        let view = normalize_interview(&json!({ "questions": "not a list" }));
        assert!(view.qa_pairs.is_empty());
    }
}
