use std::fmt;

use crate::render::GENERIC_FAILURE_MESSAGE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Creation response did not declare JSON.
    BadResponseFormat,
    /// Creation response was JSON but carried no job identifier.
    MissingJobId,
    /// A request failed outright or its body could not be decoded.
    TransportFailure,
    /// The server reported `status == error` for the job.
    JobReportedError,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::BadResponseFormat => write!(f, "bad response format"),
            ErrorKind::MissingJobId => write!(f, "missing job id"),
            ErrorKind::TransportFailure => write!(f, "transport failure"),
            ErrorKind::JobReportedError => write!(f, "job reported error"),
        }
    }
}

/// A terminal, user-visible failure for one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobFailure {
    pub kind: ErrorKind,
    pub message: String,
}

impl JobFailure {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// The raw body is kept verbatim as diagnostic text.
    pub fn bad_response_format(body: &str) -> Self {
        Self::new(
            ErrorKind::BadResponseFormat,
            format!("Server did not return JSON.\n\n{body}"),
        )
    }

    pub fn missing_job_id() -> Self {
        Self::new(ErrorKind::MissingJobId, "No task_id from server.")
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TransportFailure, message)
    }

    /// Empty or absent server messages fall back to the generic text.
    /// Any other text, whitespace included, is shown as sent.
    pub fn job_reported(message: Option<&str>) -> Self {
        let message = message
            .filter(|text| !text.is_empty())
            .unwrap_or(GENERIC_FAILURE_MESSAGE);
        Self::new(ErrorKind::JobReportedError, message)
    }
}

impl fmt::Display for JobFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}
