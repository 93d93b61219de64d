use crate::insight::{InsightClient, PENDING_INSIGHT};
use crate::journal::EntryLog;
use crate::models::DailyEntry;
use crate::timer::RestTimer;
use std::{
    path::PathBuf,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

#[derive(Clone)]
pub struct AppState {
    pub data_path: PathBuf,
    pub log: Arc<Mutex<EntryLog>>,
    pub insight: Arc<RwLock<String>>,
    pub insight_client: InsightClient,
    pub timer: RestTimer,
    // Bumped on reset; fetches started under an older value are dropped.
    insight_generation: Arc<AtomicU64>,
}

impl AppState {
    pub fn new(data_path: PathBuf, log: EntryLog, insight_client: InsightClient) -> Self {
        Self {
            data_path,
            log: Arc::new(Mutex::new(log)),
            insight: Arc::new(RwLock::new(PENDING_INSIGHT.to_string())),
            insight_client,
            timer: RestTimer::new(),
            insight_generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Fetches a new remark in the background. Requests are not de-duplicated;
    /// whichever response lands last is kept, unless the insight was reset
    /// while the request was in flight.
    pub fn refresh_insight(&self, entries: Vec<DailyEntry>) {
        if entries.is_empty() {
            return;
        }
        let state = self.clone();
        let generation = self.insight_generation.load(Ordering::SeqCst);
        tokio::spawn(async move {
            let text = state.insight_client.fetch(&entries).await;
            if state.store_insight(generation, text).await {
                debug!("insight updated");
            } else {
                debug!("discarded insight fetched before reset");
            }
        });
    }

    /// Puts the insight back to its pending text and orphans every fetch
    /// still in flight.
    pub async fn reset_insight(&self) {
        let mut insight = self.insight.write().await;
        self.insight_generation.fetch_add(1, Ordering::SeqCst);
        *insight = PENDING_INSIGHT.to_string();
    }

    async fn store_insight(&self, generation: u64, text: String) -> bool {
        let mut insight = self.insight.write().await;
        if self.insight_generation.load(Ordering::SeqCst) != generation {
            return false;
        }
        *insight = text;
        true
    }
}
