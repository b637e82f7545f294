use std::fmt;
use std::io;
use std::path::PathBuf;

use agent_filter_core::{FilterReport, RejectReason};
use thiserror::Error;

use crate::persist::PersistError;

/// Failure of a single transport attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportError {
    pub kind: TransportFailure,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: TransportFailure, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportFailure {
    Timeout,
    Connection,
    Proxy,
    InvalidUrl,
    Other,
}

impl TransportFailure {
    pub fn is_retryable(self) -> bool {
        matches!(self, TransportFailure::Timeout)
    }
}

impl fmt::Display for TransportFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportFailure::Timeout => write!(f, "timeout"),
            TransportFailure::Connection => write!(f, "connection error"),
            TransportFailure::Proxy => write!(f, "proxy error"),
            TransportFailure::InvalidUrl => write!(f, "invalid url"),
            TransportFailure::Other => write!(f, "request error"),
        }
    }
}

impl From<TransportError> for RejectReason {
    fn from(err: TransportError) -> Self {
        match err.kind {
            TransportFailure::Timeout => RejectReason::Timeout,
            TransportFailure::Connection => RejectReason::ConnectionFailed,
            TransportFailure::Proxy => RejectReason::ProxyFailed,
            TransportFailure::InvalidUrl => RejectReason::InvalidUrl,
            TransportFailure::Other => RejectReason::Other(err.message),
        }
    }
}

/// Run-level failures. Per-candidate rejections never surface here.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("candidate source {path:?} is unreadable: {source}")]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("proxy file {path:?} is unreadable: {source}")]
    ProxyUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("output sink {path:?} is unwritable: {source}")]
    SinkUnwritable {
        path: PathBuf,
        report: FilterReport,
        #[source]
        source: PersistError,
    },
}

impl RunError {
    /// The report computed before the failure, if probing happened at all.
    pub fn report(&self) -> Option<&FilterReport> {
        match self {
            RunError::SinkUnwritable { report, .. } => Some(report),
            RunError::SourceUnreadable { .. } | RunError::ProxyUnreadable { .. } => None,
        }
    }

    /// Accepted identities that survived the failure; empty when nothing was probed.
    pub fn accepted(&self) -> &[String] {
        self.report().map(FilterReport::accepted).unwrap_or(&[])
    }
}
