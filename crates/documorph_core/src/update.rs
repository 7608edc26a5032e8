use std::time::Duration;

use crate::render::{render_failure, render_reset, render_snapshot, Terminal};
use crate::{AppState, Effect, JobFailure, Msg, Phase, SessionId, StatusSnapshot, TaskId};

/// Fixed interval between status queries.
pub const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::FormSubmitted(form) => {
            let mut effects = Vec::with_capacity(5);

            // A new submission supersedes whatever session was polling.
            if let Some(previous) = state.polling_session() {
                effects.push(Effect::StopPolling { session: previous });
            }
            let session = state.begin_submission();
            state.apply_patch(render_reset());
            effects.push(Effect::SubmitJob { session, form });

            // Document-level listener: independent of the job's fate.
            let timer = state.cursor_mut().show_busy();
            state.mark_dirty();
            effects.push(Effect::ShowBusy);
            effects.push(Effect::ArmCursorFallback {
                generation: timer.generation,
                after: timer.after,
            });
            effects
        }
        Msg::JobCreated { session, result } => {
            if !state.is_submitting(session) {
                return (state, Vec::new());
            }
            job_created(&mut state, session, result)
        }
        Msg::StatusReceived { session, result } => {
            if !state.is_polling(session) {
                return (state, Vec::new());
            }
            status_received(&mut state, session, result)
        }
        Msg::HideBusy => {
            let before = state.cursor_state();
            let disarmed = state.cursor_mut().show_idle();
            if before != state.cursor_state() {
                state.mark_dirty();
            }
            let mut effects = Vec::with_capacity(2);
            if let Some(generation) = disarmed {
                effects.push(Effect::DisarmCursorFallback { generation });
            }
            effects.push(Effect::ShowIdle);
            effects
        }
        Msg::CursorFallbackElapsed { generation } => {
            if state.cursor_mut().fallback_elapsed(generation) {
                state.mark_dirty();
                vec![Effect::ShowIdle]
            } else {
                Vec::new()
            }
        }
        Msg::Tick => Vec::new(),
    };

    (state, effects)
}

fn job_created(
    state: &mut AppState,
    session: SessionId,
    result: Result<TaskId, JobFailure>,
) -> Vec<Effect> {
    match result {
        Ok(task_id) => {
            state.apply_patch(render_reset());
            state.set_phase(Phase::Polling {
                session,
                task_id: task_id.clone(),
            });
            vec![Effect::StartPolling {
                session,
                task_id,
                interval: POLL_INTERVAL,
            }]
        }
        Err(failure) => {
            state.apply_patch(render_failure(&failure));
            state.set_phase(Phase::Failed {
                session,
                kind: failure.kind,
            });
            Vec::new()
        }
    }
}

fn status_received(
    state: &mut AppState,
    session: SessionId,
    result: Result<StatusSnapshot, JobFailure>,
) -> Vec<Effect> {
    let snapshot = match result {
        Ok(snapshot) => snapshot,
        Err(failure) => {
            state.apply_patch(render_failure(&failure));
            state.set_phase(Phase::Failed {
                session,
                kind: failure.kind,
            });
            return vec![Effect::StopPolling { session }];
        }
    };

    let rendered = render_snapshot(&snapshot);
    state.apply_patch(rendered.patch);
    match rendered.terminal {
        None => Vec::new(),
        Some(Terminal::Completed { download_url }) => {
            state.set_phase(Phase::Done { session });
            vec![
                Effect::StopPolling { session },
                Effect::OfferDownload {
                    session,
                    url: download_url,
                },
            ]
        }
        Some(Terminal::Failed(failure)) => {
            state.set_phase(Phase::Failed {
                session,
                kind: failure.kind,
            });
            vec![Effect::StopPolling { session }]
        }
    }
}
