//! Error types for route discovery and registration
//!
//! Only failures that abort a walk are represented here. Malformed route
//! values, missing URLs, invalid methods and incomplete actions are recovered
//! locally and surface as diagnostics instead.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort route discovery
#[derive(Debug, Error)]
pub enum AutoRouteError {
    /// Directory listing or file read failed
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A route descriptor could not be decoded
    #[error("failed to parse route module {path:?}: {reason}")]
    Parse { path: PathBuf, reason: String },

    /// The loader refused a file it was asked to load
    #[error("failed to load module {path:?}: {reason}")]
    Load { path: PathBuf, reason: String },

    /// No action factory is registered for a discovered action file
    #[error("no action registered for {0:?}")]
    UnknownAction(PathBuf),

    /// An action's `routes()` call failed
    #[error("action {action} failed to declare routes: {reason}")]
    Action { action: String, reason: String },

    /// A route names a handler the table does not know
    #[error("unknown handler '{handler}' for {method} {url}")]
    UnknownHandler {
        handler: String,
        method: String,
        url: String,
    },

    /// A route reached the table without any handler
    #[error("route {method} {url} has no handler")]
    MissingHandler { method: String, url: String },

    /// The route table rejected the route
    #[error("cannot register {method} {url}: {reason}")]
    Registration {
        method: String,
        url: String,
        reason: String,
    },
}

impl AutoRouteError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Parse {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T, E = AutoRouteError> = std::result::Result<T, E>;
