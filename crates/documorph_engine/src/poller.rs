use std::sync::{mpsc, Arc};
use std::time::Duration;

use documorph_logging::{morph_debug, morph_info, morph_trace};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::{EngineEvent, JobClient, SessionId};

/// Polls `task_id` every `period` until a terminal report, a failure, or
/// cancellation of `token`.
///
/// Ticks are not pipelined: each one issues its own request whether or not
/// earlier ones have resolved. The first terminal outcome cancels `token`,
/// which stops the ticker and silences requests still in flight.
pub fn spawn_poller(
    client: Arc<dyn JobClient>,
    session: SessionId,
    task_id: String,
    period: Duration,
    events: mpsc::Sender<EngineEvent>,
    token: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        morph_info!("poll session {} started for task {}", session, task_id);
        let task_id: Arc<str> = Arc::from(task_id);
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut tick: u64 = 0;

        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                _ = ticker.tick() => {}
            }
            tick += 1;
            morph_trace!("poll session {} tick {}", session, tick);
            tokio::spawn(poll_once(
                client.clone(),
                session,
                task_id.clone(),
                events.clone(),
                token.clone(),
            ));
        }

        morph_info!("poll session {} stopped after {} ticks", session, tick);
    })
}

async fn poll_once(
    client: Arc<dyn JobClient>,
    session: SessionId,
    task_id: Arc<str>,
    events: mpsc::Sender<EngineEvent>,
    token: CancellationToken,
) {
    let result = tokio::select! {
        _ = token.cancelled() => return,
        result = client.fetch_status(&task_id) => result,
    };
    if token.is_cancelled() {
        return;
    }

    let terminal = match &result {
        Ok(report) => report.is_terminal(),
        Err(err) => {
            morph_debug!("poll session {} failed: {}", session, err);
            true
        }
    };
    if terminal {
        token.cancel();
    }
    let _ = events.send(EngineEvent::Status { session, result });
}
