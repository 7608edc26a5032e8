use std::io::{IsTerminal, Write};
use std::sync::atomic::{AtomicBool, Ordering};

const HIDE_CURSOR: &str = "\x1b[?25l";
const SHOW_CURSOR: &str = "\x1b[?25h";

/// Global busy indicator. Both calls are idempotent single assignments.
pub trait CursorIndicator {
    fn show_busy(&self);
    fn show_idle(&self);
    fn is_busy(&self) -> bool;
}

/// Hides the terminal's text cursor while busy.
pub struct TerminalCursor {
    busy: AtomicBool,
    enabled: bool,
}

impl TerminalCursor {
    pub fn new() -> Self {
        Self {
            busy: AtomicBool::new(false),
            enabled: std::io::stderr().is_terminal(),
        }
    }

    fn emit(&self, sequence: &str) {
        if !self.enabled {
            return;
        }
        let mut stderr = std::io::stderr();
        let _ = stderr.write_all(sequence.as_bytes());
        let _ = stderr.flush();
    }
}

impl CursorIndicator for TerminalCursor {
    fn show_busy(&self) {
        self.busy.store(true, Ordering::Relaxed);
        self.emit(HIDE_CURSOR);
    }

    fn show_idle(&self) {
        self.busy.store(false, Ordering::Relaxed);
        self.emit(SHOW_CURSOR);
    }

    fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Relaxed)
    }
}

impl Drop for TerminalCursor {
    fn drop(&mut self) {
        if self.is_busy() {
            self.show_idle();
        }
    }
}

impl Default for TerminalCursor {
    fn default() -> Self {
        Self::new()
    }
}
