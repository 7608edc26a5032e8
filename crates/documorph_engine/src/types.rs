use std::fmt;
use std::path::PathBuf;

use crate::StatusReport;

pub type SessionId = u64;

/// Everything needed to issue one creation request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JobRequest {
    pub page_path: String,
    pub fields: Vec<(String, String)>,
    /// `(multipart field name, file on disk)`.
    pub attachments: Vec<(String, PathBuf)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    JobCreated {
        session: SessionId,
        result: Result<String, FetchError>,
    },
    Status {
        session: SessionId,
        result: Result<StatusReport, FetchError>,
    },
    CursorFallbackElapsed {
        generation: u64,
    },
    DownloadCompleted {
        session: SessionId,
        result: Result<PathBuf, FetchError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for FetchError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    /// Response was not JSON; the raw body is kept for diagnostics.
    NotJson { body: String },
    MissingTaskId,
    Decode,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Io,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::NotJson { .. } => write!(f, "response is not json"),
            FailureKind::MissingTaskId => write!(f, "missing task id"),
            FailureKind::Decode => write!(f, "invalid response body"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Io => write!(f, "io error"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}
