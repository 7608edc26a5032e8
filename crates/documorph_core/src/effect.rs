use std::time::Duration;

use crate::{FormData, SessionId, TaskId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    ShowBusy,
    ShowIdle,
    ArmCursorFallback { generation: u64, after: Duration },
    DisarmCursorFallback { generation: u64 },
    SubmitJob { session: SessionId, form: FormData },
    StartPolling {
        session: SessionId,
        task_id: TaskId,
        interval: Duration,
    },
    StopPolling { session: SessionId },
    /// The job finished and its artifact can be fetched.
    OfferDownload { session: SessionId, url: String },
}
