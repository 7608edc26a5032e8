#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User submitted the form. Every submission also drives the cursor.
    FormSubmitted(crate::FormData),
    /// Explicit request to clear the busy indicator.
    HideBusy,
    /// Creation request resolved for a session.
    JobCreated {
        session: crate::SessionId,
        result: Result<crate::TaskId, crate::JobFailure>,
    },
    /// One poll tick resolved for a session.
    StatusReceived {
        session: crate::SessionId,
        result: Result<crate::StatusSnapshot, crate::JobFailure>,
    },
    /// A cursor fallback timer fired.
    CursorFallbackElapsed { generation: u64 },
    /// Render tick while waiting on IO.
    Tick,
}
