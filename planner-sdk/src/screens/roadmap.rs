//! Roadmap builder screen

use std::sync::Arc;

use log::{debug, warn};
use serde_json::Value;
use tokio::sync::watch;

use super::{pick_topic, require_topic};
use crate::auth::{require_authenticated, AuthGate};
use crate::core::{HttpRequest, HttpTransport};
use crate::error::Result;
use crate::export::{download_file_name, ClipboardSink, DownloadSink, ExportOutcome};
use crate::normalize::normalize_roadmap;
use crate::services::models::{endpoints, RoadmapView, TopicPayload};
use crate::session::{RequestSession, ScreenKind, SessionState, Submission};

/// `GET api/roadmap?topic=...`
pub struct RoadmapKind;

impl ScreenKind for RoadmapKind {
    type Payload = TopicPayload;
    type View = RoadmapView;

    const NAME: &'static str = "roadmap";

    fn validate(payload: &TopicPayload) -> Result<()> {
        require_topic(&payload.topic).map(|_| ())
    }

    fn request(payload: &TopicPayload) -> Result<HttpRequest> {
        let topic = require_topic(&payload.topic)?;
        Ok(HttpRequest::get(endpoints::ROADMAP).query("topic", topic))
    }

    fn normalize(body: &Value) -> Result<RoadmapView> {
        normalize_roadmap(body)
    }
}

/// Roadmap builder screen
pub struct RoadmapBuilderScreen {
    topic: String,
    session: RequestSession<RoadmapKind>,
}

impl RoadmapBuilderScreen {
    /// Mount the screen; fails if the gate is closed
    pub fn mount(auth: &dyn AuthGate, transport: Arc<dyn HttpTransport>) -> Result<Self> {
        require_authenticated(auth, RoadmapKind::NAME)?;
        Ok(Self {
            topic: String::new(),
            session: RequestSession::new(transport),
        })
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Edit the topic field
    ///
    /// A non-blank topic dismisses the error on display, whether it came from
    /// validation or from a failed request.
    pub fn set_topic(&mut self, value: impl Into<String>) {
        self.topic = value.into();
        if self.topic.trim().is_empty() {
            return;
        }
        self.session.clear_validation_error();
        if matches!(self.session.state(), SessionState::Failed(_)) {
            self.session.reset();
        }
    }

    /// Generate a roadmap for the current topic
    pub fn generate(&self) -> Result<Submission> {
        self.session.submit(TopicPayload::new(self.topic.as_str()))
    }

    /// Put `suggestion` in the topic field and generate right away
    pub fn use_suggestion(&mut self, suggestion: &str) -> Result<Submission> {
        let topic = pick_topic(suggestion, &self.topic).to_string();
        self.topic = topic.clone();
        self.session.submit(TopicPayload::new(topic))
    }

    /// Roadmap text of the current result
    pub fn roadmap_text(&self) -> Option<String> {
        self.session.state().view().map(|view| view.raw_text.clone())
    }

    /// Steps of the current result, empty unless the last generate succeeded
    pub fn steps(&self) -> Vec<String> {
        self.session
            .state()
            .view()
            .map(|view| view.steps.clone())
            .unwrap_or_default()
    }

    /// Copy the roadmap text to `sink`
    pub fn copy_to_clipboard(&self, sink: &mut dyn ClipboardSink) -> ExportOutcome {
        let Some(text) = self.roadmap_text() else {
            return ExportOutcome::NothingToExport;
        };
        match sink.set_text(&text) {
            Ok(()) => {
                debug!("Roadmap copied to clipboard ({} bytes)", text.len());
                ExportOutcome::Exported
            }
            Err(e) => {
                warn!("Failed to copy roadmap: {}", e);
                ExportOutcome::Failed(e.message().to_string())
            }
        }
    }

    /// Save the roadmap text as `{topic}.txt` through `sink`
    pub fn download(&self, sink: &dyn DownloadSink) -> ExportOutcome {
        let Some(text) = self.roadmap_text() else {
            return ExportOutcome::NothingToExport;
        };
        let file_name = download_file_name(&self.topic);
        match sink.save(&file_name, &text) {
            Ok(path) => {
                debug!("Roadmap downloaded to {}", path.display());
                ExportOutcome::Exported
            }
            Err(e) => {
                warn!("Failed to download roadmap as {}: {}", file_name, e);
                ExportOutcome::Failed(e.message().to_string())
            }
        }
    }

    /// Clear and create another: empty the topic and drop the result
    pub fn clear(&mut self) {
        self.topic.clear();
        self.session.reset();
    }

    pub fn state(&self) -> SessionState<RoadmapView> {
        self.session.state()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState<RoadmapView>> {
        self.session.subscribe()
    }

    pub fn session(&self) -> &RequestSession<RoadmapKind> {
        &self.session
    }
}
