#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JobStatus {
    #[default]
    Pending,
    Done,
    Error,
}

/// One point-in-time report of a job's progress.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusSnapshot {
    /// Server-reported percentage, passed through without clamping.
    pub progress: i64,
    pub status: JobStatus,
    pub error: Option<String>,
    pub download_url: Option<String>,
}

impl StatusSnapshot {
    pub fn pending(progress: i64) -> Self {
        Self {
            progress,
            ..Self::default()
        }
    }

    pub fn done(progress: i64, download_url: impl Into<String>) -> Self {
        Self {
            progress,
            status: JobStatus::Done,
            download_url: Some(download_url.into()),
            ..Self::default()
        }
    }

    pub fn error(progress: i64, error: Option<&str>) -> Self {
        Self {
            progress,
            status: JobStatus::Error,
            error: error.map(ToOwned::to_owned),
            ..Self::default()
        }
    }

    /// The artifact link, once the job is `done` and the link is non-empty.
    pub fn ready_download_url(&self) -> Option<&str> {
        match self.status {
            JobStatus::Done => self.download_url.as_deref().filter(|url| !url.is_empty()),
            JobStatus::Pending | JobStatus::Error => None,
        }
    }
}
