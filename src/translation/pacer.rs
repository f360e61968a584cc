use log::trace;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Spaces out provider call starts by at least `min_interval`.
///
/// Shared by every in-flight translation, so the budget holds across
/// concurrent workers. The lock is held while waiting, which queues
/// callers in arrival order.
#[derive(Debug)]
pub struct Pacer {
    min_interval: Duration,
    last_start: Mutex<Option<Instant>>,
}

impl Pacer {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_start: Mutex::new(None),
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Wait until the next call may start, then record its start time
    pub async fn wait(&self) {
        let mut last_start = self.last_start.lock().await;
        if let Some(previous) = *last_start {
            let next = previous + self.min_interval;
            if next > Instant::now() {
                trace!("Pacing provider call for {:?}", next - Instant::now());
                tokio::time::sleep_until(next).await;
            }
        }
        *last_start = Some(Instant::now());
    }
}
