//! Interview preparation screen
//!
//! Generates question/answer pairs from a resume, either pasted as text or
//! uploaded as a file together with the learner's name or email.

use std::sync::Arc;

use serde_json::{json, Value};
use tokio::sync::watch;

use crate::auth::{require_authenticated, AuthGate};
use crate::coerce::coerce_text;
use crate::core::{FilePart, HttpRequest, HttpTransport, MultipartBody};
use crate::error::{Result, ServiceError};
use crate::normalize::normalize_interview;
use crate::services::models::{endpoints, InterviewRequest, InterviewView, ResumeFile};
use crate::session::{RequestSession, ScreenKind, SessionState, Submission};

pub const EMPTY_RESUME_TEXT_MESSAGE: &str = "Please paste your resume text.";
pub const MISSING_UPLOAD_MESSAGE: &str = "Please upload a resume and enter your name or email.";

/// `POST api/interview` or `POST api/interview_questions`
pub struct InterviewKind;

impl ScreenKind for InterviewKind {
    type Payload = InterviewRequest;
    type View = InterviewView;

    const NAME: &'static str = "interview_prep";

    fn validate(payload: &InterviewRequest) -> Result<()> {
        match payload {
            InterviewRequest::Text { resume_text } => coerce_text(resume_text)
                .map(|_| ())
                .ok_or_else(|| ServiceError::validation(EMPTY_RESUME_TEXT_MESSAGE)),
            InterviewRequest::Upload { user_id, file } => {
                let has_file = file.as_ref().map_or(false, |f| !f.file_name.is_empty());
                if has_file && coerce_text(user_id).is_some() {
                    Ok(())
                } else {
                    Err(ServiceError::validation(MISSING_UPLOAD_MESSAGE))
                }
            }
        }
    }

    fn request(payload: &InterviewRequest) -> Result<HttpRequest> {
        match payload {
            InterviewRequest::Text { resume_text } => HttpRequest::post_json(
                endpoints::INTERVIEW_TEXT,
                &json!({ "resumeText": resume_text }),
            ),
            InterviewRequest::Upload { user_id, file } => {
                let file = file
                    .as_ref()
                    .ok_or_else(|| ServiceError::validation(MISSING_UPLOAD_MESSAGE))?;
                let form = MultipartBody::new()
                    .text("user_id", user_id.trim())
                    .file(FilePart {
                        field: "resume".to_string(),
                        file_name: file.file_name.clone(),
                        content_type: file.content_type.clone(),
                        bytes: file.bytes.clone(),
                    });
                Ok(HttpRequest::post_multipart(endpoints::INTERVIEW_UPLOAD, form))
            }
        }
    }

    fn normalize(body: &Value) -> Result<InterviewView> {
        Ok(normalize_interview(body))
    }
}

/// Interview preparation screen
pub struct InterviewPrepScreen {
    resume_text: String,
    user_id: String,
    file: Option<ResumeFile>,
    session: RequestSession<InterviewKind>,
}

impl InterviewPrepScreen {
    /// Mount the screen; fails if the gate is closed
    pub fn mount(auth: &dyn AuthGate, transport: Arc<dyn HttpTransport>) -> Result<Self> {
        require_authenticated(auth, InterviewKind::NAME)?;
        Ok(Self {
            resume_text: String::new(),
            user_id: String::new(),
            file: None,
            session: RequestSession::new(transport),
        })
    }

    pub fn resume_text(&self) -> &str {
        &self.resume_text
    }

    pub fn set_resume_text(&mut self, value: impl Into<String>) {
        self.resume_text = value.into();
        self.session.clear_validation_error();
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn set_user_id(&mut self, value: impl Into<String>) {
        self.user_id = value.into();
        self.session.clear_validation_error();
    }

    pub fn file(&self) -> Option<&ResumeFile> {
        self.file.as_ref()
    }

    pub fn set_file(&mut self, file: Option<ResumeFile>) {
        self.file = file;
        self.session.clear_validation_error();
    }

    /// Generate questions from the pasted resume text
    pub fn submit_text(&self) -> Result<Submission> {
        self.session.submit(InterviewRequest::Text {
            resume_text: self.resume_text.clone(),
        })
    }

    /// Generate questions from the selected resume file
    pub fn submit_file(&self) -> Result<Submission> {
        self.session.submit(InterviewRequest::Upload {
            user_id: self.user_id.clone(),
            file: self.file.clone(),
        })
    }

    pub fn state(&self) -> SessionState<InterviewView> {
        self.session.state()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState<InterviewView>> {
        self.session.subscribe()
    }

    pub fn session(&self) -> &RequestSession<InterviewKind> {
        &self.session
    }
}
