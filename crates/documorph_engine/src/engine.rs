use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use documorph_logging::{morph_debug, morph_info, morph_warn};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::client::{ClientSettings, JobClient, ReqwestJobClient};
use crate::filename::artifact_filename;
use crate::persist::AtomicFileWriter;
use crate::poller::spawn_poller;
use crate::{EngineEvent, FailureKind, FetchError, JobRequest, SessionId};

enum EngineCommand {
    Submit {
        session: SessionId,
        request: JobRequest,
    },
    StartPolling {
        session: SessionId,
        task_id: String,
        interval: Duration,
    },
    StopPolling {
        session: SessionId,
    },
    ArmFallback {
        generation: u64,
        after: Duration,
    },
    DisarmFallback {
        generation: u64,
    },
    Download {
        session: SessionId,
        url: String,
        dir: PathBuf,
    },
}

/// Handle to the IO thread. Commands go in, `EngineEvent`s come out.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(settings: ClientSettings) -> Result<Self, FetchError> {
        let client = ReqwestJobClient::new(settings)?;
        Ok(Self::with_client(Arc::new(client)))
    }

    pub fn with_client(client: Arc<dyn JobClient>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            let _guard = runtime.enter();
            let mut dispatcher = Dispatcher {
                client,
                event_tx,
                polling: None,
                fallback: None,
            };
            while let Ok(command) = cmd_rx.recv() {
                dispatcher.handle(command);
            }
            dispatcher.shutdown();
        });

        Self { cmd_tx, event_rx }
    }

    pub fn submit(&self, session: SessionId, request: JobRequest) {
        let _ = self.cmd_tx.send(EngineCommand::Submit { session, request });
    }

    pub fn start_polling(&self, session: SessionId, task_id: impl Into<String>, interval: Duration) {
        let _ = self.cmd_tx.send(EngineCommand::StartPolling {
            session,
            task_id: task_id.into(),
            interval,
        });
    }

    pub fn stop_polling(&self, session: SessionId) {
        let _ = self.cmd_tx.send(EngineCommand::StopPolling { session });
    }

    pub fn arm_cursor_fallback(&self, generation: u64, after: Duration) {
        let _ = self
            .cmd_tx
            .send(EngineCommand::ArmFallback { generation, after });
    }

    pub fn disarm_cursor_fallback(&self, generation: u64) {
        let _ = self.cmd_tx.send(EngineCommand::DisarmFallback { generation });
    }

    pub fn download(&self, session: SessionId, url: impl Into<String>, dir: PathBuf) {
        let _ = self.cmd_tx.send(EngineCommand::Download {
            session,
            url: url.into(),
            dir,
        });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

/// Runs on the engine thread with the tokio runtime entered.
struct Dispatcher {
    client: Arc<dyn JobClient>,
    event_tx: mpsc::Sender<EngineEvent>,
    /// At most one live poll session.
    polling: Option<(SessionId, CancellationToken)>,
    fallback: Option<(u64, JoinHandle<()>)>,
}

impl Dispatcher {
    fn handle(&mut self, command: EngineCommand) {
        match command {
            EngineCommand::Submit { session, request } => {
                morph_info!(
                    "submit session={} path={} fields={} attachments={}",
                    session,
                    request.page_path,
                    request.fields.len(),
                    request.attachments.len()
                );
                let client = self.client.clone();
                let event_tx = self.event_tx.clone();
                tokio::spawn(async move {
                    let result = client.create_job(&request).await;
                    let _ = event_tx.send(EngineEvent::JobCreated { session, result });
                });
            }
            EngineCommand::StartPolling {
                session,
                task_id,
                interval,
            } => {
                self.cancel_polling();
                let token = CancellationToken::new();
                spawn_poller(
                    self.client.clone(),
                    session,
                    task_id,
                    interval,
                    self.event_tx.clone(),
                    token.clone(),
                );
                self.polling = Some((session, token));
            }
            EngineCommand::StopPolling { session } => match &self.polling {
                Some((active, _)) if *active == session => self.cancel_polling(),
                _ => morph_debug!("stop for inactive poll session {}", session),
            },
            EngineCommand::ArmFallback { generation, after } => {
                self.disarm_fallback();
                let event_tx = self.event_tx.clone();
                let handle = tokio::spawn(async move {
                    tokio::time::sleep(after).await;
                    let _ = event_tx.send(EngineEvent::CursorFallbackElapsed { generation });
                });
                self.fallback = Some((generation, handle));
            }
            EngineCommand::DisarmFallback { generation } => {
                if matches!(&self.fallback, Some((armed, _)) if *armed == generation) {
                    self.disarm_fallback();
                }
            }
            EngineCommand::Download { session, url, dir } => {
                let client = self.client.clone();
                let event_tx = self.event_tx.clone();
                tokio::spawn(async move {
                    let result = download_to(client.as_ref(), &url, dir).await;
                    if let Err(err) = &result {
                        morph_warn!("download of {} failed: {}", url, err);
                    }
                    let _ = event_tx.send(EngineEvent::DownloadCompleted { session, result });
                });
            }
        }
    }

    fn cancel_polling(&mut self) {
        if let Some((session, token)) = self.polling.take() {
            morph_debug!("cancelling poll session {}", session);
            token.cancel();
        }
    }

    fn disarm_fallback(&mut self) {
        if let Some((_, handle)) = self.fallback.take() {
            handle.abort();
        }
    }

    fn shutdown(&mut self) {
        self.cancel_polling();
        self.disarm_fallback();
    }
}

async fn download_to(
    client: &dyn JobClient,
    url: &str,
    dir: PathBuf,
) -> Result<PathBuf, FetchError> {
    let artifact = client.download(url).await?;
    let filename = artifact_filename(&artifact.final_url, artifact.content_disposition.as_deref());
    let writer = AtomicFileWriter::new(dir);
    tokio::task::spawn_blocking(move || writer.write(&filename, &artifact.bytes))
        .await
        .map_err(|err| FetchError::new(FailureKind::Io, err.to_string()))?
        .map_err(|err| FetchError::new(FailureKind::Io, err.to_string()))
}
