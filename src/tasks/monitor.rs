//! Memory Pressure Monitor Task
//!
//! Background task that periodically asks a probe whether the process is
//! under memory pressure and, if so, notifies every subscribed cache.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::pressure::PressureNotifier;

/// Spawns a background task that polls `probe` every `interval`.
///
/// Each time the probe returns `true`, [`PressureNotifier::notify`] is called,
/// which clears every cache subscribed to `notifier`. The task runs until the
/// returned handle is aborted.
///
/// # Example
/// ```ignore
/// let notifier = PressureNotifier::shared();
/// let handle = spawn_pressure_monitor(notifier, Duration::from_secs(1), || low_on_memory());
/// // Later, during shutdown:
/// handle.abort();
/// ```
pub fn spawn_pressure_monitor<P>(
    notifier: Arc<PressureNotifier>,
    interval: Duration,
    mut probe: P,
) -> JoinHandle<()>
where
    P: FnMut() -> bool + Send + 'static,
{
    tokio::spawn(async move {
        info!(
            "Starting memory pressure monitor with interval of {} ms",
            interval.as_millis()
        );

        loop {
            tokio::time::sleep(interval).await;

            if probe() {
                let notified = notifier.notify();
                info!("Memory pressure detected: notified {} subscribers", notified);
            } else {
                debug!("Memory pressure probe: no pressure");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    use crate::cache::LruCache;

    #[tokio::test]
    async fn test_monitor_clears_cache_on_pressure() {
        let notifier = Arc::new(PressureNotifier::new());
        let cache = LruCache::with_pressure_source(i64::MAX, i64::MAX, notifier.clone());
        for i in 0..10 {
            cache.set(i, i);
        }

        let pressure = Arc::new(AtomicBool::new(false));
        let probe = {
            let pressure = Arc::clone(&pressure);
            move || pressure.swap(false, Ordering::SeqCst)
        };
        let handle = spawn_pressure_monitor(notifier, Duration::from_millis(20), probe);

        // No pressure yet: entries survive a few polls
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(cache.len(), 10);

        pressure.store(true, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(cache.is_empty(), "Cache should be cleared after pressure");
        assert_eq!(cache.stats().pressure_clears, 1);

        handle.abort();
    }

    #[tokio::test]
    async fn test_monitor_can_be_aborted() {
        let notifier = Arc::new(PressureNotifier::new());

        let handle = spawn_pressure_monitor(notifier, Duration::from_millis(10), || false);

        // Abort immediately
        handle.abort();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}
