use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use filwatch_storage::ObservationStore;
use filwatch_types::ObservationBatch;

use crate::chain_poller::ChainHeadPoller;
use crate::error::WatchError;

/// Drives observation cycles on a fixed period and owns the cached-latest
/// batch. The periodic loop is started explicitly by the host via `run`;
/// constructing a scheduler has no side effects.
pub struct HeadScheduler {
    poller: ChainHeadPoller,
    store: Arc<dyn ObservationStore>,
    latest: RwLock<ObservationBatch>,
    polling: AtomicBool,
    poll_interval: Duration,
}

impl HeadScheduler {
    pub fn new(
        poller: ChainHeadPoller,
        store: Arc<dyn ObservationStore>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            poller,
            store,
            latest: RwLock::new(Vec::new()),
            polling: AtomicBool::new(false),
            poll_interval,
        }
    }

    /// The most recent successfully completed cycle's batch. Empty until the
    /// first cycle succeeds. Reading has no side effects.
    pub async fn latest(&self) -> ObservationBatch {
        self.latest.read().await.clone()
    }

    /// Whether a timer-driven cycle is currently in flight.
    pub fn is_polling(&self) -> bool {
        self.polling.load(Ordering::SeqCst)
    }

    /// Runs one full observation cycle: fetch, classify, persist, then
    /// replace the cached-latest batch. The cache is only touched when both
    /// the fetch and the persist succeeded; a failed cycle leaves the
    /// previous batch in place and surfaces the error.
    pub async fn observe_now(&self) -> Result<ObservationBatch, WatchError> {
        let batch = self.poller.fetch_observations().await?;
        self.store.append_batch(&batch)?;

        let mut latest = self.latest.write().await;
        *latest = batch.clone();

        Ok(batch)
    }

    /// The periodic loop. Ticks every `poll_interval`; a tick that fires
    /// while the previous cycle is still running is skipped, never queued.
    /// Runs until the host drops or aborts the task.
    pub async fn run(&self) {
        info!(
            "head scheduler started (interval: {}s)",
            self.poll_interval.as_secs()
        );

        let mut ticker = interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;

            if self.polling.swap(true, Ordering::SeqCst) {
                debug!("previous cycle still running, skipping tick");
                continue;
            }

            match self.observe_now().await {
                Ok(batch) => {
                    info!(
                        "cycle complete: {} block(s), {} watched",
                        batch.len(),
                        batch.iter().filter(|o| o.is_watched).count()
                    );
                }
                Err(e) => {
                    warn!("cycle abandoned, keeping previous batch: {}", e);
                }
            }

            self.polling.store(false, Ordering::SeqCst);
        }
    }
}
