use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use crate::models::chart::{ChartSnapshot, RollingHistory};
use crate::models::settings::Settings;
use crate::providers::traits::MarketDataProvider;

/// What the poll loop asks the view layer to draw.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderRequest {
    /// The pinned set is empty: draw an empty chart. No fetch was made.
    EmptyChart,

    /// A fresh sample was appended: redraw with this window.
    Chart(ChartSnapshot),
}

/// Drives one live-chart polling session.
///
/// `start` issues an immediate first fetch, then repeats on a fixed
/// cadence. Ticks are serialized — the next tick is not scheduled until
/// the previous fetch resolved — so samples can never be applied out of
/// issue order. A failed tick is logged and abandoned; the cadence is not
/// reset and there is no backoff.
pub struct PollLoop {
    provider: Arc<dyn MarketDataProvider>,
    vs_currency: String,
    interval: Duration,
    window: usize,
}

impl PollLoop {
    pub fn new(provider: Arc<dyn MarketDataProvider>, settings: &Settings) -> Self {
        Self {
            provider,
            vs_currency: settings.vs_currency.clone(),
            interval: Duration::from_millis(settings.poll_interval_ms.max(1)),
            window: settings.history_window,
        }
    }

    /// Begin polling quotes for `ids`, emitting a `RenderRequest` per tick
    /// into `sink`. The rolling history lives inside the session and is
    /// discarded when it ends.
    ///
    /// The returned handle owns the session: exactly one loop runs per
    /// handle, and stopping (or dropping) it cancels the session — a tick
    /// still in flight at that point is never applied. Callers replacing a
    /// session must stop the previous handle first.
    pub fn start(
        &self,
        ids: Vec<String>,
        sink: mpsc::UnboundedSender<RenderRequest>,
    ) -> PollHandle {
        let provider = Arc::clone(&self.provider);
        let vs_currency = self.vs_currency.clone();
        let interval = self.interval;
        let window = self.window;

        let task = tokio::spawn(async move {
            let mut history = RollingHistory::new(window);
            let mut ticker = tokio::time::interval(interval);
            // A slow fetch delays subsequent ticks instead of bursting.
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                // First tick fires immediately.
                ticker.tick().await;

                if sink.is_closed() {
                    break;
                }

                if ids.is_empty() {
                    history.clear();
                    if sink.send(RenderRequest::EmptyChart).is_err() {
                        break;
                    }
                    continue;
                }

                match provider.fetch_quotes(&vs_currency, &ids).await {
                    Ok(quotes) => {
                        let label = Local::now().format("%H:%M:%S").to_string();
                        history.record(label, &quotes);
                        if sink.send(RenderRequest::Chart(history.snapshot())).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        // Tick abandoned; the next one proceeds on schedule.
                        warn!(provider = provider.name(), error = %e, "price poll failed");
                    }
                }
            }

            debug!("poll session ended: render sink closed");
        });

        PollHandle { task: Some(task) }
    }
}

/// Handle to a running poll session. Stopping is idempotent; dropping the
/// handle stops the session too, so a replaced handle cannot leak a timer.
pub struct PollHandle {
    task: Option<JoinHandle<()>>,
}

impl PollHandle {
    /// Cancel the session. A tick whose fetch resolves after this call is
    /// discarded, never applied.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            debug!("poll session stopped");
        }
    }

    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.task.is_none()
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
