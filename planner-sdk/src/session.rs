//! Request session state machine
//!
//! One `RequestSession` exists per mounted screen. It owns the screen's
//! request lifecycle (`Idle -> Pending -> Success | Failed`) and publishes
//! every transition on a `watch` channel.
//!
//! Each accepted submit is tagged with a sequence number. A completion only
//! lands if it carries the latest dispatched number and the session has not
//! been torn down, so the most recent submission wins regardless of the
//! order in which responses arrive.

use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use log::{debug, warn};
use serde_json::Value;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::core::{HttpRequest, HttpResponse, HttpTransport};
use crate::error::mapping::{map_http_error, map_unusable_body};
use crate::error::{ErrorContext, ErrorInfo, Result, ServiceError};
use crate::util::generate_request_id;

/// One kind of screen request: how to validate it, what to send, how to read
/// the answer
pub trait ScreenKind: Send + Sync + 'static {
    /// Submitted input, built fresh for every submit
    type Payload: Send + 'static;

    /// Render-ready result
    type View: Clone + Send + Sync + 'static;

    /// Name used in logs and error context
    const NAME: &'static str;

    /// Reject input that must never reach the network
    fn validate(payload: &Self::Payload) -> Result<()>;

    /// Build the single request for an accepted payload
    fn request(payload: &Self::Payload) -> Result<HttpRequest>;

    /// Map a parsed 2xx body onto the view model
    fn normalize(body: &Value) -> Result<Self::View>;
}

/// Current phase of a session
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState<V> {
    Idle,
    Pending,
    Success(V),
    Failed(ErrorInfo),
}

impl<V> Default for SessionState<V> {
    fn default() -> Self {
        SessionState::Idle
    }
}

impl<V> SessionState<V> {
    pub fn is_idle(&self) -> bool {
        matches!(self, SessionState::Idle)
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, SessionState::Pending)
    }

    /// The view model, if the last submission succeeded
    pub fn view(&self) -> Option<&V> {
        match self {
            SessionState::Success(view) => Some(view),
            _ => None,
        }
    }

    /// The failure, if the last submission failed
    pub fn error(&self) -> Option<&ErrorInfo> {
        match self {
            SessionState::Failed(info) => Some(info),
            _ => None,
        }
    }
}

/// State shared between a session and its in-flight completions
struct Shared<V> {
    state: watch::Sender<SessionState<V>>,
    latest: AtomicU64,
    alive: AtomicBool,
}

impl<V> Shared<V> {
    /// Apply a completion if it is still current; returns whether it landed
    fn complete(&self, seq: u64, next: SessionState<V>) -> bool {
        self.state.send_if_modified(|state| {
            if !self.alive.load(Ordering::SeqCst) || self.latest.load(Ordering::SeqCst) != seq {
                return false;
            }
            *state = next;
            true
        })
    }
}

/// Handle to one accepted submission
#[derive(Debug)]
pub struct Submission {
    seq: u64,
    handle: JoinHandle<bool>,
}

impl Submission {
    /// Sequence number assigned at dispatch
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// Wait for the response to be resolved
    ///
    /// Returns `true` if the outcome became the session state, `false` if it
    /// was discarded because a newer submission, a reset or a teardown got
    /// there first.
    pub async fn settled(self) -> bool {
        self.handle.await.unwrap_or(false)
    }
}

/// Per-screen request state machine
pub struct RequestSession<K: ScreenKind> {
    transport: Arc<dyn HttpTransport>,
    shared: Arc<Shared<K::View>>,
    validation_error: Mutex<Option<ErrorInfo>>,
    _kind: PhantomData<fn() -> K>,
}

impl<K: ScreenKind> RequestSession<K> {
    /// Create an idle session dispatching through `transport`
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        let (state, _) = watch::channel(SessionState::Idle);
        Self {
            transport,
            shared: Arc::new(Shared {
                state,
                latest: AtomicU64::new(0),
                alive: AtomicBool::new(true),
            }),
            validation_error: Mutex::new(None),
            _kind: PhantomData,
        }
    }

    /// Snapshot of the current state
    pub fn state(&self) -> SessionState<K::View> {
        self.shared.state.borrow().clone()
    }

    /// Receiver notified on every state transition
    pub fn subscribe(&self) -> watch::Receiver<SessionState<K::View>> {
        self.shared.state.subscribe()
    }

    /// Whether a request is in flight
    pub fn is_pending(&self) -> bool {
        self.shared.state.borrow().is_pending()
    }

    /// The last rejected input, if it has not been cleared since
    pub fn validation_error(&self) -> Option<ErrorInfo> {
        self.validation_guard().clone()
    }

    /// Forget the last rejected input
    pub fn clear_validation_error(&self) {
        self.validation_guard().take();
    }

    /// Sequence number of the latest dispatched submission
    pub fn latest_seq(&self) -> u64 {
        self.shared.latest.load(Ordering::SeqCst)
    }

    /// Whether the owning screen is still mounted
    pub fn is_alive(&self) -> bool {
        self.shared.alive.load(Ordering::SeqCst)
    }

    /// Validate `payload` and dispatch exactly one request for it
    ///
    /// Rejected input leaves the state untouched. Accepted input moves the
    /// session to `Pending` and supersedes any request still in flight.
    /// Must be called from within a tokio runtime.
    pub fn submit(&self, payload: K::Payload) -> Result<Submission> {
        if !self.is_alive() {
            return Err(ServiceError::internal(format!(
                "{} session has been torn down",
                K::NAME
            )));
        }

        let request = match K::validate(&payload).and_then(|_| K::request(&payload)) {
            Ok(request) => request,
            Err(e) => {
                debug!("{} submit rejected: {}", K::NAME, e);
                *self.validation_guard() = Some(ErrorInfo::from(&e));
                return Err(e);
            }
        };

        let runtime = tokio::runtime::Handle::try_current().map_err(|e| {
            ServiceError::internal(format!("submit requires a tokio runtime: {}", e))
        })?;

        self.clear_validation_error();

        let mut seq = 0;
        self.shared.state.send_modify(|state| {
            seq = self.shared.latest.fetch_add(1, Ordering::SeqCst) + 1;
            *state = SessionState::Pending;
        });

        let request_id = generate_request_id();
        debug!(
            "{} dispatching #{} ({}): {} {}",
            K::NAME,
            seq,
            request_id,
            request.method,
            request.endpoint
        );

        let transport = Arc::clone(&self.transport);
        let shared = Arc::clone(&self.shared);
        let handle = runtime.spawn(async move {
            let endpoint = request.endpoint.clone();
            let outcome = transport.send(request).await;
            let next = resolve_response::<K>(outcome, &endpoint, &request_id);

            if let SessionState::Failed(info) = &next {
                warn!("{} request #{} ({}) failed: {}", K::NAME, seq, request_id, info);
            }

            let applied = shared.complete(seq, next);
            if !applied {
                debug!(
                    "{} discarded completion #{} ({}): superseded or torn down",
                    K::NAME,
                    seq,
                    request_id
                );
            }
            applied
        });

        Ok(Submission { seq, handle })
    }

    /// Return to `Idle`, discarding any result and any request in flight
    pub fn reset(&self) {
        self.shared.state.send_modify(|state| {
            self.shared.latest.fetch_add(1, Ordering::SeqCst);
            *state = SessionState::Idle;
        });
        self.clear_validation_error();
    }

    /// Mark the owning screen as gone; later completions become no-ops
    pub fn teardown(&self) {
        if self.shared.alive.swap(false, Ordering::SeqCst) {
            debug!("{} session torn down", K::NAME);
        }
    }

    fn validation_guard(&self) -> std::sync::MutexGuard<'_, Option<ErrorInfo>> {
        self.validation_error
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<K: ScreenKind> Drop for RequestSession<K> {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Turn a transport outcome into the terminal state for one submission
///
/// Never panics and never returns `Pending` or `Idle`: every failure path
/// becomes `Failed` with a non-empty message.
pub fn resolve_response<K: ScreenKind>(
    outcome: Result<HttpResponse>,
    endpoint: &str,
    request_id: &str,
) -> SessionState<K::View> {
    let mut context = ErrorContext::for_service(K::NAME)
        .endpoint(endpoint)
        .request_id(request_id);

    let response = match outcome {
        Ok(response) => response,
        Err(e) => return SessionState::Failed(ErrorInfo::from(e.with_context(context))),
    };

    if !response.is_success() {
        let err = map_http_error(response.status, &response.body, &mut context);
        return SessionState::Failed(ErrorInfo::from(err.with_context(context)));
    }

    let body = match serde_json::from_str::<Value>(&response.body) {
        Ok(body) => body,
        Err(_) => {
            let err = map_unusable_body(response.status, &response.body, &mut context);
            return SessionState::Failed(ErrorInfo::from(err.with_context(context)));
        }
    };

    match K::normalize(&body) {
        Ok(view) => SessionState::Success(view),
        Err(e) => {
            let context = context.status_code(response.status);
            SessionState::Failed(ErrorInfo::from(e.with_context(context)))
        }
    }
}
