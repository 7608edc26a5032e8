use crate::{CursorState, Phase, ResultView};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub phase: Phase,
    /// Progress bar width in percent.
    pub percent: i64,
    pub progress_label: String,
    pub result: ResultView,
    pub cursor: CursorState,
    pub dirty: bool,
}
