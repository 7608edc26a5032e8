//! DocuMorph core: pure submission/poll state machine and view-model helpers.
mod cursor;
mod effect;
mod error;
mod form;
mod msg;
mod render;
mod snapshot;
mod state;
mod update;
mod view_model;

pub use cursor::{Cursor, CursorState, FallbackTimer, CURSOR_FALLBACK};
pub use effect::Effect;
pub use error::{ErrorKind, JobFailure};
pub use form::{Attachment, FormData, FormField};
pub use msg::Msg;
pub use render::{
    progress_label, render_failure, render_reset, render_snapshot, RenderPatch, Rendered,
    ResultView, Terminal, DOWNLOAD_LABEL, GENERIC_FAILURE_MESSAGE,
};
pub use snapshot::{JobStatus, StatusSnapshot};
pub use state::{AppState, Phase, SessionId, TaskId};
pub use update::{update, POLL_INTERVAL};
pub use view_model::AppViewModel;
