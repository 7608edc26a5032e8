use std::path::PathBuf;
use std::time::Duration;

use documorph_core::{
    Effect, FormData, JobFailure, JobStatus, Msg, SessionId, StatusSnapshot, TaskId,
};
use documorph_engine::{
    EngineEvent, EngineHandle, FailureKind, FetchError, JobRequest, StatusReport,
};
use documorph_logging::{morph_debug, morph_info, morph_warn};

use super::cursor::CursorIndicator;

/// Result of one artifact download, for the final report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    Saved(PathBuf),
    Failed(String),
}

/// Carries effects out against the engine and the cursor, and turns engine
/// events back into messages.
pub struct EffectRunner {
    engine: EngineHandle,
    cursor: Box<dyn CursorIndicator>,
    download_dir: Option<PathBuf>,
    pending_downloads: usize,
    finished_downloads: Vec<DownloadOutcome>,
}

impl EffectRunner {
    pub fn new(
        engine: EngineHandle,
        cursor: Box<dyn CursorIndicator>,
        download_dir: Option<PathBuf>,
    ) -> Self {
        Self {
            engine,
            cursor,
            download_dir,
            pending_downloads: 0,
            finished_downloads: Vec::new(),
        }
    }

    pub fn enqueue(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::ShowBusy => self.cursor.show_busy(),
                Effect::ShowIdle => self.cursor.show_idle(),
                Effect::ArmCursorFallback { generation, after } => {
                    self.engine.arm_cursor_fallback(generation, after);
                }
                Effect::DisarmCursorFallback { generation } => {
                    self.engine.disarm_cursor_fallback(generation);
                }
                Effect::SubmitJob { session, form } => {
                    self.engine.submit(session, job_request(&form));
                }
                Effect::StartPolling {
                    session,
                    task_id,
                    interval,
                } => {
                    morph_info!("session {} polling task {}", session, task_id);
                    self.engine
                        .start_polling(session, task_id.as_str(), interval);
                }
                Effect::StopPolling { session } => self.engine.stop_polling(session),
                Effect::OfferDownload { session, url } => match &self.download_dir {
                    Some(dir) => {
                        self.pending_downloads += 1;
                        self.engine.download(session, url, dir.clone());
                    }
                    None => morph_debug!("session {} result at {} left on server", session, url),
                },
            }
        }
    }

    /// Waits up to `timeout` for the next engine event worth a message.
    pub fn next_msg(&mut self, timeout: Duration) -> Option<Msg> {
        match self.engine.recv_timeout(timeout)? {
            EngineEvent::JobCreated { session, result } => Some(Msg::JobCreated {
                session,
                result: result.map(TaskId::new).map_err(creation_failure),
            }),
            EngineEvent::Status { session, result } => Some(status_msg(session, result)),
            EngineEvent::CursorFallbackElapsed { generation } => {
                Some(Msg::CursorFallbackElapsed { generation })
            }
            EngineEvent::DownloadCompleted { session, result } => {
                self.record_download(session, result);
                None
            }
        }
    }

    fn record_download(&mut self, session: SessionId, result: Result<PathBuf, FetchError>) {
        self.pending_downloads = self.pending_downloads.saturating_sub(1);
        let outcome = match result {
            Ok(path) => {
                morph_info!("session {} saved {}", session, path.display());
                DownloadOutcome::Saved(path)
            }
            Err(err) => {
                morph_warn!("session {} download failed: {}", session, err);
                DownloadOutcome::Failed(err.to_string())
            }
        };
        self.finished_downloads.push(outcome);
    }

    pub fn has_pending_downloads(&self) -> bool {
        self.pending_downloads > 0
    }

    pub fn take_download_outcomes(&mut self) -> Vec<DownloadOutcome> {
        std::mem::take(&mut self.finished_downloads)
    }
}

fn job_request(form: &FormData) -> JobRequest {
    JobRequest {
        page_path: form.page_path().to_string(),
        fields: form
            .fields()
            .iter()
            .map(|field| (field.name.clone(), field.value.clone()))
            .collect(),
        attachments: form
            .attachments()
            .iter()
            .map(|attachment| (attachment.field.clone(), attachment.path.clone()))
            .collect(),
    }
}

fn status_msg(session: SessionId, result: Result<StatusReport, FetchError>) -> Msg {
    Msg::StatusReceived {
        session,
        result: result
            .map(snapshot_from_report)
            .map_err(|err| JobFailure::transport(err.to_string())),
    }
}

fn creation_failure(err: FetchError) -> JobFailure {
    match err.kind {
        FailureKind::NotJson { body } => JobFailure::bad_response_format(&body),
        FailureKind::MissingTaskId => JobFailure::missing_job_id(),
        _ => JobFailure::transport(err.to_string()),
    }
}

fn snapshot_from_report(report: StatusReport) -> StatusSnapshot {
    let status = match report.status.as_deref() {
        Some("done") => JobStatus::Done,
        Some("error") => JobStatus::Error,
        _ => JobStatus::Pending,
    };
    StatusSnapshot {
        progress: report.progress.unwrap_or(0),
        status,
        error: report.error,
        download_url: report.download_url,
    }
}
