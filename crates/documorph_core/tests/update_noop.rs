use documorph_core::{update, AppState, Msg};

#[test]
fn tick_is_noop() {
    let state = AppState::new();
    let (next, effects) = update(state.clone(), Msg::Tick);

    assert_eq!(state, next);
    assert!(effects.is_empty());
}

#[test]
fn stale_cursor_fallback_is_noop() {
    let state = AppState::new();
    let (next, effects) = update(state.clone(), Msg::CursorFallbackElapsed { generation: 7 });

    assert_eq!(state, next);
    assert!(effects.is_empty());
}
