//! Tracked background work that outlives the HTTP response.
//!
//! Handlers hand work to [`DeferredTasks`] and return immediately. The server
//! calls [`DeferredTasks::drain`] before exiting so nothing accepted is torn
//! down mid-flight.

use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::task::{JoinError, JoinSet};
use tracing::{error, info};

/// Cloneable handle to the set of outstanding background tasks.
#[derive(Clone, Default)]
pub struct DeferredTasks {
    inner: Arc<Mutex<JoinSet<()>>>,
}

impl DeferredTasks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `work` on the runtime and track it until it settles.
    pub fn spawn<F>(&self, work: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut set = self.inner.lock().unwrap_or_else(PoisonError::into_inner);

        // Reap whatever already finished so the set does not grow unbounded.
        while let Some(result) = set.try_join_next() {
            log_join_result(result);
        }

        set.spawn(work);
    }

    /// Number of tasks not yet reaped.
    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Wait for every tracked task, including ones spawned while draining.
    pub async fn drain(&self) {
        let mut drained = 0usize;

        loop {
            // Take the set so the lock is never held across an await.
            let mut set = std::mem::take(
                &mut *self.inner.lock().unwrap_or_else(PoisonError::into_inner),
            );
            if set.is_empty() {
                break;
            }

            while let Some(result) = set.join_next().await {
                drained += 1;
                log_join_result(result);
            }
        }

        info!(tasks = drained, "deferred_tasks_drained");
    }
}

fn log_join_result(result: Result<(), JoinError>) {
    if let Err(e) = result {
        error!(error = %e, panicked = e.is_panic(), "deferred_task_failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_drain_waits_for_spawned_work() {
        let tasks = DeferredTasks::new();
        let done = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let done = Arc::clone(&done);
            tasks.spawn(async move {
                tokio::time::sleep(Duration::from_millis(20)).await;
                done.fetch_add(1, Ordering::SeqCst);
            });
        }

        assert_eq!(done.load(Ordering::SeqCst), 0);
        tasks.drain().await;
        assert_eq!(done.load(Ordering::SeqCst), 3);
        assert!(tasks.is_empty());
    }

    #[tokio::test]
    async fn test_drain_survives_panicking_task() {
        let tasks = DeferredTasks::new();
        let done = Arc::new(AtomicUsize::new(0));

        tasks.spawn(async { panic!("boom") });
        let counter = Arc::clone(&done);
        tasks.spawn(async move {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        tasks.drain().await;
        assert_eq!(done.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_drain_on_empty_set_returns() {
        DeferredTasks::new().drain().await;
    }
}
