//! Outcome rendering: a pure mapping from status reports and failures to the
//! three observable outputs (bar width, label text, result element).

use crate::{JobFailure, JobStatus, StatusSnapshot};

pub const GENERIC_FAILURE_MESSAGE: &str = "Conversion failed.";
pub const DOWNLOAD_LABEL: &str = "Download Result";

/// Contents of the single result element.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ResultView {
    #[default]
    Empty,
    Error(String),
    Download { url: String, label: String },
}

/// Changes to apply to the display. `None` leaves that output untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RenderPatch {
    pub percent: Option<i64>,
    pub result: Option<ResultView>,
}

/// Terminal signal handed back to the poller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Terminal {
    Completed { download_url: String },
    Failed(JobFailure),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub patch: RenderPatch,
    pub terminal: Option<Terminal>,
}

pub fn progress_label(percent: i64) -> String {
    format!("{percent}%")
}

pub fn render_snapshot(snapshot: &StatusSnapshot) -> Rendered {
    match (snapshot.status, snapshot.ready_download_url()) {
        (JobStatus::Error, _) => {
            let failure = JobFailure::job_reported(snapshot.error.as_deref());
            Rendered {
                patch: RenderPatch {
                    percent: Some(snapshot.progress),
                    result: Some(ResultView::Error(failure.message.clone())),
                },
                terminal: Some(Terminal::Failed(failure)),
            }
        }
        (_, Some(url)) => Rendered {
            patch: RenderPatch {
                percent: Some(100),
                result: Some(ResultView::Download {
                    url: url.to_string(),
                    label: DOWNLOAD_LABEL.to_string(),
                }),
            },
            terminal: Some(Terminal::Completed {
                download_url: url.to_string(),
            }),
        },
        _ => Rendered {
            patch: RenderPatch {
                percent: Some(snapshot.progress),
                result: None,
            },
            terminal: None,
        },
    }
}

pub fn render_failure(failure: &JobFailure) -> RenderPatch {
    RenderPatch {
        percent: None,
        result: Some(ResultView::Error(failure.message.clone())),
    }
}

/// Clears the result element and resets progress to zero.
pub fn render_reset() -> RenderPatch {
    RenderPatch {
        percent: Some(0),
        result: Some(ResultView::Empty),
    }
}
