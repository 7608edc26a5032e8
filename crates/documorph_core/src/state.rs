use std::fmt;

use crate::render::{progress_label, RenderPatch, ResultView};
use crate::view_model::AppViewModel;
use crate::{Cursor, CursorState, ErrorKind};

pub type SessionId = u64;

/// Opaque job identifier assigned by the server.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaskId(String);

impl TaskId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Submitting {
        session: SessionId,
    },
    Polling {
        session: SessionId,
        task_id: TaskId,
    },
    Done {
        session: SessionId,
    },
    Failed {
        session: SessionId,
        kind: ErrorKind,
    },
}

impl Phase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Done { .. } | Phase::Failed { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    phase: Phase,
    last_session: SessionId,
    percent: i64,
    result: ResultView,
    cursor: Cursor,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            phase: self.phase.clone(),
            percent: self.percent,
            progress_label: progress_label(self.percent),
            result: self.result.clone(),
            cursor: self.cursor.state(),
            dirty: self.dirty,
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn cursor_state(&self) -> CursorState {
        self.cursor.state()
    }

    /// Returns and clears the dirty flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn cursor_mut(&mut self) -> &mut Cursor {
        &mut self.cursor
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Allocates the next session and moves to `Submitting`.
    pub(crate) fn begin_submission(&mut self) -> SessionId {
        self.last_session += 1;
        self.phase = Phase::Submitting {
            session: self.last_session,
        };
        self.dirty = true;
        self.last_session
    }

    pub(crate) fn polling_session(&self) -> Option<SessionId> {
        match self.phase {
            Phase::Polling { session, .. } => Some(session),
            _ => None,
        }
    }

    pub(crate) fn is_submitting(&self, session: SessionId) -> bool {
        self.phase == Phase::Submitting { session }
    }

    pub(crate) fn is_polling(&self, session: SessionId) -> bool {
        self.polling_session() == Some(session)
    }

    pub(crate) fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
        self.dirty = true;
    }

    /// Last write wins: the result element is replaced, never merged.
    pub(crate) fn apply_patch(&mut self, patch: RenderPatch) {
        if let Some(percent) = patch.percent {
            self.percent = percent;
            self.dirty = true;
        }
        if let Some(result) = patch.result {
            self.result = result;
            self.dirty = true;
        }
    }
}
