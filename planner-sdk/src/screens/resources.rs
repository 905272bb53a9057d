//! Resource search screen

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::watch;

use super::{pick_topic, require_topic};
use crate::auth::{require_authenticated, AuthGate};
use crate::core::{HttpRequest, HttpTransport};
use crate::error::Result;
use crate::normalize::normalize_resources;
use crate::services::models::{endpoints, ResourceBundleView, TopicPayload};
use crate::session::{RequestSession, ScreenKind, SessionState, Submission};

/// `GET api/resources?topic=...`
pub struct ResourceSearchKind;

impl ScreenKind for ResourceSearchKind {
    type Payload = TopicPayload;
    type View = ResourceBundleView;

    const NAME: &'static str = "resource_search";

    fn validate(payload: &TopicPayload) -> Result<()> {
        require_topic(&payload.topic).map(|_| ())
    }

    fn request(payload: &TopicPayload) -> Result<HttpRequest> {
        let topic = require_topic(&payload.topic)?;
        Ok(HttpRequest::get(endpoints::RESOURCES).query("topic", topic))
    }

    fn normalize(body: &Value) -> Result<ResourceBundleView> {
        Ok(normalize_resources(body))
    }
}

/// Resource search screen
pub struct ResourceSearchScreen {
    query: String,
    session: RequestSession<ResourceSearchKind>,
}

impl ResourceSearchScreen {
    /// Mount the screen; fails if the gate is closed
    pub fn mount(auth: &dyn AuthGate, transport: Arc<dyn HttpTransport>) -> Result<Self> {
        require_authenticated(auth, ResourceSearchKind::NAME)?;
        Ok(Self {
            query: String::new(),
            session: RequestSession::new(transport),
        })
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Edit the query field
    pub fn set_query(&mut self, value: impl Into<String>) {
        self.query = value.into();
        self.session.clear_validation_error();
    }

    /// Search for the current query
    pub fn search(&self) -> Result<Submission> {
        self.session.submit(TopicPayload::new(self.query.as_str()))
    }

    /// Put `suggestion` in the query field and search for it right away
    pub fn use_suggestion(&mut self, suggestion: &str) -> Result<Submission> {
        let topic = pick_topic(suggestion, &self.query).to_string();
        self.query = topic.clone();
        self.session.submit(TopicPayload::new(topic))
    }

    pub fn state(&self) -> SessionState<ResourceBundleView> {
        self.session.state()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState<ResourceBundleView>> {
        self.session.subscribe()
    }

    pub fn session(&self) -> &RequestSession<ResourceSearchKind> {
        &self.session
    }
}
