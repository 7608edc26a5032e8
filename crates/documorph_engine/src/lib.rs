//! DocuMorph engine: HTTP client, status poller and timers.
mod client;
mod engine;
mod filename;
mod persist;
mod poller;
mod types;
mod wire;

pub use client::{ClientSettings, DownloadedArtifact, JobClient, ReqwestJobClient};
pub use engine::EngineHandle;
pub use filename::artifact_filename;
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use poller::spawn_poller;
pub use types::{EngineEvent, FailureKind, FetchError, JobRequest, SessionId};
pub use wire::StatusReport;
