//! Authentication gate
//!
//! The planner has no real authentication: a single opaque flag says whether
//! the learner is "logged in". Screens receive the gate explicitly and refuse
//! to mount while it is closed.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use log::debug;

use crate::error::{ErrorContext, Result, ServiceError};

/// Name of the flag file used by `FileAuthGate`
pub const AUTH_FLAG_FILE: &str = "auth";

/// Opaque "is authenticated" capability
pub trait AuthGate: Send + Sync {
    /// Whether the gate is open
    fn is_authenticated(&self) -> bool;

    /// Open the gate with `value`; an empty value leaves it closed
    fn set_authenticated(&self, value: &str) -> Result<()>;

    /// Close the gate
    fn clear(&self) -> Result<()>;
}

/// In-process gate backed by an atomic flag
#[derive(Debug, Default)]
pub struct MemoryAuthGate {
    flag: AtomicBool,
}

impl MemoryAuthGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// A gate that starts open
    pub fn authenticated() -> Self {
        Self {
            flag: AtomicBool::new(true),
        }
    }
}

impl AuthGate for MemoryAuthGate {
    fn is_authenticated(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    fn set_authenticated(&self, value: &str) -> Result<()> {
        self.flag.store(!value.is_empty(), Ordering::SeqCst);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.flag.store(false, Ordering::SeqCst);
        Ok(())
    }
}

/// Gate persisted as a flag file; a non-empty file means authenticated
#[derive(Debug, Clone)]
pub struct FileAuthGate {
    path: PathBuf,
}

impl FileAuthGate {
    /// Keep the flag file inside `dir`
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(AUTH_FLAG_FILE),
        }
    }

    /// Location of the flag file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, op: &str, err: std::io::Error) -> ServiceError {
        ServiceError::internal(format!("Failed to {} auth flag: {}", op, err)).with_context(
            ErrorContext::for_service("auth").with("path", self.path.display()),
        )
    }
}

impl AuthGate for FileAuthGate {
    fn is_authenticated(&self) -> bool {
        // An empty flag reads as logged out
        fs::metadata(&self.path)
            .map(|meta| meta.is_file() && meta.len() > 0)
            .unwrap_or(false)
    }

    fn set_authenticated(&self, value: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.io_error("create directory for", e))?;
        }
        fs::write(&self.path, value).map_err(|e| self.io_error("write", e))?;
        debug!("Auth flag set at {}", self.path.display());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!("Auth flag cleared at {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error("remove", e)),
        }
    }
}

/// Fail with an authentication error unless the gate is open
pub(crate) fn require_authenticated(gate: &dyn AuthGate, screen: &str) -> Result<()> {
    if gate.is_authenticated() {
        Ok(())
    } else {
        Err(ServiceError::authentication(format!(
            "Log in to open the {} screen",
            screen
        ))
        .with_context(ErrorContext::for_service(screen)))
    }
}
