//! Study time predictor screen

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::watch;

use crate::auth::{require_authenticated, AuthGate};
use crate::coerce::coerce_int;
use crate::core::{HttpRequest, HttpTransport};
use crate::error::{Result, ServiceError};
use crate::normalize::normalize_prediction;
use crate::services::models::{endpoints, PredictionPayload, PredictionView};
use crate::session::{RequestSession, ScreenKind, SessionState, Submission};

/// `POST api/predict`
pub struct PredictionKind;

impl ScreenKind for PredictionKind {
    type Payload = PredictionPayload;
    type View = PredictionView;

    const NAME: &'static str = "predictor";

    // Every field is coerced, so there is nothing to reject.
    fn validate(_payload: &PredictionPayload) -> Result<()> {
        Ok(())
    }

    fn request(payload: &PredictionPayload) -> Result<HttpRequest> {
        HttpRequest::post_json(endpoints::PREDICT, payload)
    }

    fn normalize(body: &Value) -> Result<PredictionView> {
        Ok(normalize_prediction(body))
    }
}

/// The thirteen predictor inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PredictionField {
    Failures,
    Higher,
    Absences,
    Freetime,
    Goout,
    Famrel,
    Famsup,
    Schoolsup,
    Paid,
    Traveltime,
    Health,
    Internet,
    Age,
}

impl PredictionField {
    pub const ALL: [PredictionField; 13] = [
        PredictionField::Failures,
        PredictionField::Higher,
        PredictionField::Absences,
        PredictionField::Freetime,
        PredictionField::Goout,
        PredictionField::Famrel,
        PredictionField::Famsup,
        PredictionField::Schoolsup,
        PredictionField::Paid,
        PredictionField::Traveltime,
        PredictionField::Health,
        PredictionField::Internet,
        PredictionField::Age,
    ];

    /// Wire name of the field
    pub fn as_str(&self) -> &'static str {
        match self {
            PredictionField::Failures => "failures",
            PredictionField::Higher => "higher",
            PredictionField::Absences => "absences",
            PredictionField::Freetime => "freetime",
            PredictionField::Goout => "goout",
            PredictionField::Famrel => "famrel",
            PredictionField::Famsup => "famsup",
            PredictionField::Schoolsup => "schoolsup",
            PredictionField::Paid => "paid",
            PredictionField::Traveltime => "traveltime",
            PredictionField::Health => "health",
            PredictionField::Internet => "internet",
            PredictionField::Age => "age",
        }
    }

    /// Form label
    pub fn label(&self) -> &'static str {
        match self {
            PredictionField::Failures => "Number of Failures",
            PredictionField::Higher => "Higher Education",
            PredictionField::Absences => "Absences",
            PredictionField::Freetime => "Free Time (1-5)",
            PredictionField::Goout => "Going Out (1-5)",
            PredictionField::Famrel => "Family Relationship (1-5)",
            PredictionField::Famsup => "Family Support",
            PredictionField::Schoolsup => "School Support",
            PredictionField::Paid => "Extra Paid Classes",
            PredictionField::Traveltime => "Travel Time (1-4)",
            PredictionField::Health => "Health Status (1-5)",
            PredictionField::Internet => "Internet Access",
            PredictionField::Age => "Age",
        }
    }

    /// Yes/No fields, shown as a select that starts at "0" (No)
    pub fn is_select(&self) -> bool {
        matches!(
            self,
            PredictionField::Higher
                | PredictionField::Famsup
                | PredictionField::Schoolsup
                | PredictionField::Paid
                | PredictionField::Internet
        )
    }

    fn default_value(&self) -> &'static str {
        if self.is_select() {
            "0"
        } else {
            ""
        }
    }
}

impl fmt::Display for PredictionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PredictionField {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self> {
        PredictionField::ALL
            .iter()
            .copied()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| ServiceError::validation(format!("Unknown prediction field: {}", s)))
    }
}

/// Raw predictor form values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictionForm {
    values: HashMap<PredictionField, String>,
}

impl Default for PredictionForm {
    fn default() -> Self {
        Self {
            values: PredictionField::ALL
                .iter()
                .map(|field| (*field, field.default_value().to_string()))
                .collect(),
        }
    }
}

impl PredictionForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: PredictionField, raw: impl Into<String>) {
        self.values.insert(field, raw.into());
    }

    pub fn get(&self, field: PredictionField) -> &str {
        self.values.get(&field).map(String::as_str).unwrap_or("")
    }

    /// Coerce every field; blank or non-numeric values become `0`
    pub fn to_payload(&self) -> PredictionPayload {
        let int = |field| coerce_int(self.get(field));
        PredictionPayload {
            failures: int(PredictionField::Failures),
            higher: int(PredictionField::Higher),
            absences: int(PredictionField::Absences),
            freetime: int(PredictionField::Freetime),
            goout: int(PredictionField::Goout),
            famrel: int(PredictionField::Famrel),
            famsup: int(PredictionField::Famsup),
            schoolsup: int(PredictionField::Schoolsup),
            paid: int(PredictionField::Paid),
            traveltime: int(PredictionField::Traveltime),
            health: int(PredictionField::Health),
            internet: int(PredictionField::Internet),
            age: int(PredictionField::Age),
        }
    }
}

/// Predictor screen
pub struct PredictorScreen {
    form: PredictionForm,
    session: RequestSession<PredictionKind>,
}

impl PredictorScreen {
    /// Mount the screen; fails if the gate is closed
    pub fn mount(auth: &dyn AuthGate, transport: Arc<dyn HttpTransport>) -> Result<Self> {
        require_authenticated(auth, PredictionKind::NAME)?;
        Ok(Self {
            form: PredictionForm::new(),
            session: RequestSession::new(transport),
        })
    }

    pub fn form(&self) -> &PredictionForm {
        &self.form
    }

    pub fn set_field(&mut self, field: PredictionField, raw: impl Into<String>) {
        self.form.set(field, raw);
    }

    /// Set a field by its wire name
    pub fn set_named_field(&mut self, name: &str, raw: impl Into<String>) -> Result<()> {
        let field = name.parse::<PredictionField>()?;
        self.set_field(field, raw);
        Ok(())
    }

    /// Payload the next submit would send
    pub fn build_payload(&self) -> PredictionPayload {
        self.form.to_payload()
    }

    pub fn submit(&self) -> Result<Submission> {
        self.session.submit(self.build_payload())
    }

    pub fn state(&self) -> SessionState<PredictionView> {
        self.session.state()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState<PredictionView>> {
        self.session.subscribe()
    }

    pub fn session(&self) -> &RequestSession<PredictionKind> {
        &self.session
    }
}
