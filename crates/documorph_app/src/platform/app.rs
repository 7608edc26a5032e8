use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use documorph_core::{update, AppState, FormData, Msg, Phase, ResultView};
use documorph_engine::{ClientSettings, EngineHandle};
use documorph_logging::{morph_debug, morph_info};

use super::cursor::{CursorIndicator, TerminalCursor};
use super::effects::{DownloadOutcome, EffectRunner};
use super::render::TerminalSurface;

/// How long the loop waits on the engine before rendering a tick.
const TICK: Duration = Duration::from_millis(75);

pub struct AppConfig {
    pub server: String,
    pub form: FormData,
    pub download_dir: Option<PathBuf>,
    pub quiet: bool,
}

#[derive(Debug)]
pub struct RunOutcome {
    pub phase: Phase,
    pub result: ResultView,
    pub downloads: Vec<DownloadOutcome>,
}

impl RunOutcome {
    pub fn success(&self) -> bool {
        matches!(self.phase, Phase::Done { .. })
            && self
                .downloads
                .iter()
                .all(|outcome| matches!(outcome, DownloadOutcome::Saved(_)))
    }
}

pub fn run_app(config: AppConfig) -> anyhow::Result<RunOutcome> {
    let engine = EngineHandle::new(ClientSettings {
        base_url: config.server.clone(),
        ..ClientSettings::default()
    })
    .with_context(|| format!("cannot use server {}", config.server))?;

    let stdout = io::stdout();
    let mut surface = TerminalSurface::new(stdout.lock(), &config.server);
    if config.quiet {
        surface = surface.without_progress_bar();
    }
    drive(engine, Box::new(TerminalCursor::new()), surface, config)
}

fn drive<W: Write>(
    engine: EngineHandle,
    cursor: Box<dyn CursorIndicator>,
    mut surface: TerminalSurface<W>,
    config: AppConfig,
) -> anyhow::Result<RunOutcome> {
    let mut runner = EffectRunner::new(engine, cursor, config.download_dir);
    let mut downloads = Vec::new();

    morph_info!("submitting {}", config.form.page_path());
    let mut state = dispatch(
        AppState::new(),
        Msg::FormSubmitted(config.form),
        &mut runner,
        &mut surface,
    )?;

    while !(state.phase().is_terminal() && !runner.has_pending_downloads()) {
        let msg = runner.next_msg(TICK).unwrap_or(Msg::Tick);
        state = dispatch(state, msg, &mut runner, &mut surface)?;
        for outcome in runner.take_download_outcomes() {
            match &outcome {
                DownloadOutcome::Saved(path) => {
                    surface.note(&format!("Saved {}", path.display()))?
                }
                DownloadOutcome::Failed(reason) => {
                    surface.note(&format!("Download failed: {reason}"))?
                }
            }
            downloads.push(outcome);
        }
    }

    let state = dispatch(state, Msg::HideBusy, &mut runner, &mut surface)?;
    morph_debug!("finished in phase {:?}", state.phase());
    let view = state.view();
    Ok(RunOutcome {
        phase: view.phase,
        result: view.result,
        downloads,
    })
}

fn dispatch<W: Write>(
    state: AppState,
    msg: Msg,
    runner: &mut EffectRunner,
    surface: &mut TerminalSurface<W>,
) -> anyhow::Result<AppState> {
    let (mut state, effects) = update(state, msg);
    runner.enqueue(effects);
    if state.consume_dirty() {
        surface
            .render(&state.view())
            .context("writing progress to the terminal")?;
    }
    Ok(state)
}
