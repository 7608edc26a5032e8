use std::sync::Once;

use documorph_core::{
    update, AppState, CursorState, Effect, ErrorKind, FormData, JobFailure, Msg, Phase,
    ResultView, StatusSnapshot, TaskId, CURSOR_FALLBACK, POLL_INTERVAL,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(documorph_logging::initialize_for_tests);
}

fn merge_form() -> FormData {
    FormData::new("/merge")
        .with_attachment("files", "a.pdf")
        .with_attachment("files", "b.pdf")
}

fn submit(state: AppState) -> (AppState, Vec<Effect>) {
    update(state, Msg::FormSubmitted(merge_form()))
}

#[test]
fn submission_requests_job_and_sets_busy() {
    init_logging();
    let (mut state, effects) = submit(AppState::new());

    assert_eq!(state.phase(), &Phase::Submitting { session: 1 });
    assert_eq!(state.cursor_state(), CursorState::Busy);
    assert_eq!(
        effects,
        vec![
            Effect::SubmitJob {
                session: 1,
                form: merge_form(),
            },
            Effect::ShowBusy,
            Effect::ArmCursorFallback {
                generation: 1,
                after: CURSOR_FALLBACK,
            },
        ]
    );
    let view = state.view();
    assert_eq!(view.percent, 0);
    assert_eq!(view.progress_label, "0%");
    assert_eq!(view.result, ResultView::Empty);
    assert!(state.consume_dirty());
}

#[test]
fn created_job_starts_exactly_one_poller() {
    init_logging();
    let (state, _) = submit(AppState::new());
    let (state, effects) = update(
        state,
        Msg::JobCreated {
            session: 1,
            result: Ok(TaskId::new("abc")),
        },
    );

    assert_eq!(
        state.phase(),
        &Phase::Polling {
            session: 1,
            task_id: TaskId::new("abc"),
        }
    );
    assert_eq!(
        effects,
        vec![Effect::StartPolling {
            session: 1,
            task_id: TaskId::new("abc"),
            interval: POLL_INTERVAL,
        }]
    );
}

#[test]
fn non_json_creation_response_fails_without_polling() {
    init_logging();
    let (state, _) = submit(AppState::new());
    let failure = JobFailure::bad_response_format("<html><body>Server Error</body></html>");
    let (state, effects) = update(
        state,
        Msg::JobCreated {
            session: 1,
            result: Err(failure),
        },
    );

    assert!(effects.is_empty());
    assert_eq!(
        state.phase(),
        &Phase::Failed {
            session: 1,
            kind: ErrorKind::BadResponseFormat,
        }
    );
    assert_eq!(
        state.view().result,
        ResultView::Error(
            "Server did not return JSON.\n\n<html><body>Server Error</body></html>".to_string()
        )
    );
}

#[test]
fn missing_job_id_fails_without_polling() {
    init_logging();
    let (state, _) = submit(AppState::new());
    let (state, effects) = update(
        state,
        Msg::JobCreated {
            session: 1,
            result: Err(JobFailure::missing_job_id()),
        },
    );

    assert!(effects.is_empty());
    assert_eq!(
        state.phase(),
        &Phase::Failed {
            session: 1,
            kind: ErrorKind::MissingJobId,
        }
    );
    assert_eq!(
        state.view().result,
        ResultView::Error("No task_id from server.".to_string())
    );
}

#[test]
fn resubmission_cancels_the_active_poller() {
    init_logging();
    let (state, _) = submit(AppState::new());
    let (state, _) = update(
        state,
        Msg::JobCreated {
            session: 1,
            result: Ok(TaskId::new("first")),
        },
    );
    let (state, _) = update(
        state,
        Msg::StatusReceived {
            session: 1,
            result: Ok(StatusSnapshot::pending(60)),
        },
    );
    assert_eq!(state.view().percent, 60);

    let (state, effects) = submit(state);
    assert_eq!(effects[0], Effect::StopPolling { session: 1 });
    assert_eq!(
        effects[1],
        Effect::SubmitJob {
            session: 2,
            form: merge_form(),
        }
    );
    assert_eq!(state.phase(), &Phase::Submitting { session: 2 });
    assert_eq!(state.view().percent, 0);

    // Late results from the cancelled session are dropped.
    let (state, effects) = update(
        state,
        Msg::StatusReceived {
            session: 1,
            result: Ok(StatusSnapshot::done(100, "/download/first.pdf")),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.view().percent, 0);
    assert_eq!(state.view().result, ResultView::Empty);
}

#[test]
fn creation_result_for_superseded_submission_is_ignored() {
    init_logging();
    let (state, _) = submit(AppState::new());
    let (state, _) = submit(state);

    let (state, effects) = update(
        state,
        Msg::JobCreated {
            session: 1,
            result: Ok(TaskId::new("stale")),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.phase(), &Phase::Submitting { session: 2 });
}

#[test]
fn resubmission_after_failure_clears_previous_result() {
    init_logging();
    let (state, _) = submit(AppState::new());
    let (state, _) = update(
        state,
        Msg::JobCreated {
            session: 1,
            result: Err(JobFailure::missing_job_id()),
        },
    );
    assert!(matches!(state.view().result, ResultView::Error(_)));

    let (state, effects) = submit(state);
    // Nothing was polling, so nothing to stop.
    assert!(!effects
        .iter()
        .any(|effect| matches!(effect, Effect::StopPolling { .. })));
    assert_eq!(state.view().result, ResultView::Empty);
    assert_eq!(state.phase(), &Phase::Submitting { session: 2 });
}
