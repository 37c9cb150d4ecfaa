//! Periodic collection on a background thread.

use crossbeam_channel::{bounded, RecvTimeoutError, Sender};
use std::sync::Mutex;
use std::thread::{self, JoinHandle};
use std::time::Duration;

struct Worker {
    stop_tx: Sender<()>,
    handle: JoinHandle<()>,
}

/// Runs a task every `interval` until stopped.
///
/// At most one loop is active per controller. The first cycle runs
/// immediately on `start`; `stop` interrupts the wait between cycles and
/// joins the worker.
#[derive(Default)]
pub struct PeriodicCollector {
    worker: Mutex<Option<Worker>>,
}

impl PeriodicCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the loop. Returns `false` if one is already running.
    pub fn start<F>(&self, interval: Duration, mut task: F) -> bool
    where
        F: FnMut() + Send + 'static,
    {
        let mut worker = self.worker.lock().unwrap();
        if worker.as_ref().is_some_and(|w| !w.handle.is_finished()) {
            tracing::warn!("Periodic collection already running");
            return false;
        }

        let (stop_tx, stop_rx) = bounded::<()>(1);
        let spawned = thread::Builder::new()
            .name("actlog-collector".into())
            .spawn(move || {
                tracing::info!(interval_secs = interval.as_secs(), "Periodic collection started");
                loop {
                    task();
                    match stop_rx.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => continue,
                        // Stop requested or controller dropped
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                tracing::info!("Periodic collection stopped");
            });

        match spawned {
            Ok(handle) => {
                *worker = Some(Worker { stop_tx, handle });
                true
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to spawn collector thread");
                false
            }
        }
    }

    /// Stop the loop and wait for the current cycle to finish.
    ///
    /// Returns `false` if nothing was running.
    pub fn stop(&self) -> bool {
        let Some(worker) = self.worker.lock().unwrap().take() else {
            return false;
        };

        // The worker may already have exited; a failed send is fine
        let _ = worker.stop_tx.send(());
        if worker.handle.join().is_err() {
            tracing::error!("Collector thread panicked");
        }
        true
    }

    pub fn is_running(&self) -> bool {
        self.worker
            .lock()
            .unwrap()
            .as_ref()
            .is_some_and(|w| !w.handle.is_finished())
    }
}

impl Drop for PeriodicCollector {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Instant;

    #[test]
    fn test_second_start_is_noop() {
        let controller = PeriodicCollector::new();
        assert!(controller.start(Duration::from_secs(60), || {}));
        assert!(controller.is_running());
        assert!(!controller.start(Duration::from_secs(60), || {}));
        assert!(controller.stop());
        assert!(!controller.is_running());
    }

    #[test]
    fn test_stop_interrupts_wait() {
        let cycles = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&cycles);

        let controller = PeriodicCollector::new();
        controller.start(Duration::from_secs(3600), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        // First cycle runs immediately
        let deadline = Instant::now() + Duration::from_secs(5);
        while cycles.load(Ordering::SeqCst) == 0 && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }

        let started = Instant::now();
        assert!(controller.stop());
        assert!(started.elapsed() < Duration::from_secs(5));
        assert_eq!(cycles.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_runs_repeatedly_and_restarts() {
        let cycles = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&cycles);

        let controller = PeriodicCollector::new();
        controller.start(Duration::from_millis(5), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let deadline = Instant::now() + Duration::from_secs(5);
        while cycles.load(Ordering::SeqCst) < 3 && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
        controller.stop();
        assert!(cycles.load(Ordering::SeqCst) >= 3);

        assert!(controller.start(Duration::from_secs(60), || {}));
        assert!(controller.stop());
    }

    #[test]
    fn test_stop_without_start() {
        assert!(!PeriodicCollector::new().stop());
    }
}
