use parking_lot::Mutex;
use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Trailing-edge debounce for search-as-you-type.
///
/// Each [`call`](Self::call) cancels the previous pending action and
/// schedules the new one after `wait`; only the last action in a burst runs.
#[derive(Debug)]
pub struct Debouncer {
    wait: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    #[must_use]
    pub fn new(wait: Duration) -> Self {
        Self {
            wait,
            pending: Mutex::new(None),
        }
    }

    /// Schedule `action`, replacing anything still waiting.
    ///
    /// Must be called from within a tokio runtime.
    pub fn call<F>(&self, action: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let wait = self.wait;
        let mut pending = self.pending.lock();
        if let Some(previous) = pending.take() {
            previous.abort();
        }
        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(wait).await;
            action.await;
        }));
    }

    /// Drop the pending action, if any. Returns whether one was waiting.
    pub fn cancel(&self) -> bool {
        match self.pending.lock().take() {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                true
            }
            _ => false,
        }
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .as_ref()
            .is_some_and(|h| !h.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.get_mut().take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test(start_paused = true)]
    async fn test_only_last_call_in_burst_runs() {
        let debouncer = Debouncer::new(Duration::from_millis(300));
        let runs = Arc::new(AtomicUsize::new(0));
        let last = Arc::new(Mutex::new(String::new()));

        for query in ["r", "ra", "rap"] {
            let runs = Arc::clone(&runs);
            let last = Arc::clone(&last);
            debouncer.call(async move {
                runs.fetch_add(1, Ordering::SeqCst);
                *last.lock() = query.to_owned();
            });
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        assert_eq!(runs.load(Ordering::SeqCst), 0);
        assert!(debouncer.is_pending());

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert_eq!(*last.lock(), "rap");
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel() {
        let debouncer = Debouncer::new(Duration::from_millis(50));
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&runs);
        debouncer.call(async move {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert!(debouncer.cancel());
        assert!(!debouncer.cancel());

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 0);
    }
}
