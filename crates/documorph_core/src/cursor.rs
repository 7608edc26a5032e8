use std::time::Duration;

/// How long a submission may keep the indicator busy before it is forced idle.
pub const CURSOR_FALLBACK: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorState {
    #[default]
    Idle,
    Busy,
}

/// A one-shot request to force the cursor idle after `after` has elapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallbackTimer {
    pub generation: u64,
    pub after: Duration,
}

/// Process-wide busy/idle indicator state.
///
/// Each `show_busy` arms a fresh fallback generation; only the armed
/// generation may flip the state back to idle, so a stale timer from an
/// earlier submission can never clobber a newer busy period.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Cursor {
    state: CursorState,
    armed: Option<u64>,
    generation: u64,
}

impl Cursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> CursorState {
        self.state
    }

    pub fn armed_generation(&self) -> Option<u64> {
        self.armed
    }

    /// Sets busy and re-arms the fallback, replacing any pending one.
    pub fn show_busy(&mut self) -> FallbackTimer {
        self.generation += 1;
        self.state = CursorState::Busy;
        self.armed = Some(self.generation);
        FallbackTimer {
            generation: self.generation,
            after: CURSOR_FALLBACK,
        }
    }

    /// Sets idle. Returns the generation of the fallback it disarmed, if any.
    pub fn show_idle(&mut self) -> Option<u64> {
        self.state = CursorState::Idle;
        self.armed.take()
    }

    /// Applies an elapsed fallback. Returns true when it actually fired.
    pub fn fallback_elapsed(&mut self, generation: u64) -> bool {
        if self.armed != Some(generation) {
            return false;
        }
        self.armed = None;
        self.state = CursorState::Idle;
        true
    }
}
