//! Global request pacing for the upstream API
//!
//! One logical request at a time, with an enforced minimum delay between the
//! start of one call and the start of the next. The delay is global, not
//! per-endpoint.

use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, OwnedSemaphorePermit, Semaphore};

/// Paces all upstream calls to a fixed minimum start-to-start interval
pub struct RequestPacer {
    semaphore: Arc<Semaphore>,
    last_start: Arc<Mutex<Option<Instant>>>,
    min_interval: Duration,
}

impl RequestPacer {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(1)), // Only 1 concurrent request
            last_start: Arc::new(Mutex::new(None)),
            min_interval,
        }
    }

    /// Wait until the next call may start
    ///
    /// The returned guard keeps the single-request slot held for the
    /// duration of the call; drop it when the response has been received.
    pub async fn acquire(&self) -> Result<PacerGuard, String> {
        let permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|e| format!("Failed to acquire request pacer permit: {}", e))?;

        if !self.min_interval.is_zero() {
            let mut last = self.last_start.lock().await;
            if let Some(last_time) = *last {
                let elapsed = last_time.elapsed();
                if elapsed < self.min_interval {
                    tokio::time::sleep(self.min_interval - elapsed).await;
                }
            }
            *last = Some(Instant::now());
        }

        Ok(PacerGuard { _permit: permit })
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }
}

/// RAII guard returned by [`RequestPacer::acquire`]
pub struct PacerGuard {
    _permit: OwnedSemaphorePermit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn spaces_out_consecutive_call_starts() {
        let pacer = RequestPacer::new(Duration::from_millis(50));

        let started = Instant::now();
        drop(pacer.acquire().await.unwrap());
        drop(pacer.acquire().await.unwrap());
        drop(pacer.acquire().await.unwrap());

        // First call starts immediately, the next two each wait ~50ms
        assert!(started.elapsed() >= Duration::from_millis(100));
    }

    #[tokio::test]
    async fn zero_interval_does_not_sleep() {
        let pacer = RequestPacer::new(Duration::ZERO);
        let started = Instant::now();
        for _ in 0..10 {
            drop(pacer.acquire().await.unwrap());
        }
        assert!(started.elapsed() < Duration::from_millis(50));
    }
}
