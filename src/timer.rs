use crate::models::TimerStatus;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, Interval};
use tracing::debug;

pub const DEFAULT_REST_SECS: u32 = 60;

/// Rest countdown: ticks once per second down to zero, then stops.
#[derive(Clone, Default)]
pub struct RestTimer {
    inner: Arc<Mutex<TimerInner>>,
}

#[derive(Default)]
struct TimerInner {
    remaining: u32,
    task: Option<JoinHandle<()>>,
}

impl RestTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a countdown, replacing any running one.
    pub async fn start(&self, seconds: u32) -> TimerStatus {
        let mut inner = self.inner.lock().await;
        if let Some(task) = inner.task.take() {
            task.abort();
        }
        inner.remaining = seconds;
        if seconds > 0 {
            let period = Duration::from_secs(1);
            let interval = time::interval_at(Instant::now() + period, period);
            inner.task = Some(tokio::spawn(tick(Arc::clone(&self.inner), interval)));
        }
        debug!(seconds, "rest timer started");
        status_of(&inner)
    }

    pub async fn cancel(&self) -> TimerStatus {
        let mut inner = self.inner.lock().await;
        if let Some(task) = inner.task.take() {
            task.abort();
        }
        inner.remaining = 0;
        status_of(&inner)
    }

    pub async fn status(&self) -> TimerStatus {
        status_of(&*self.inner.lock().await)
    }
}

async fn tick(inner: Arc<Mutex<TimerInner>>, mut interval: Interval) {
    loop {
        interval.tick().await;
        let mut guard = inner.lock().await;
        guard.remaining = guard.remaining.saturating_sub(1);
        if guard.remaining == 0 {
            guard.task = None;
            return;
        }
    }
}

fn status_of(inner: &TimerInner) -> TimerStatus {
    TimerStatus {
        remaining: inner.remaining,
        active: inner.remaining > 0,
    }
}
