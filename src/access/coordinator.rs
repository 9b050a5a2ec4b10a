//! Single-flight coordinator for "load more" requests.
//!
//! Two states, Idle and Pending, held in one atomic flag. Idle→Pending is a
//! compare-and-swap: of any number of near-simultaneous triggers, exactly one
//! wins and dispatches the fetch; the rest are suppressed. The flag flips
//! before the fetch is dispatched, closing the race between dispatch and a
//! second access reaching the trigger. Pending→Idle happens only when a
//! replacement pack is installed — a failed reload clears it the same way a
//! successful one does, since either outcome means the attempt is over.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::core::dispatch::OnLoaded;
use crate::provider::MoreDataFetcher;

/// At-most-one-in-flight gate in front of the upstream fetcher.
pub struct MoreDataCoordinator {
    pending: AtomicBool,
    fetcher: Arc<dyn MoreDataFetcher>,
}

impl MoreDataCoordinator {
    /// Idle coordinator in front of `fetcher`.
    #[must_use]
    pub fn new(fetcher: Arc<dyn MoreDataFetcher>) -> Self {
        Self {
            pending: AtomicBool::new(false),
            fetcher,
        }
    }

    /// Whether a request is in flight.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }

    /// Try the Idle→Pending transition and dispatch the fetch. Returns true
    /// if this call won the transition; false if a request was already
    /// pending. `on_loaded` is handed to the fetcher and will run on the
    /// UI-affine thread once the load attempt concludes.
    ///
    /// This gate only enforces single-flight. Whether the current pack can
    /// extend at all is the caller's contract: check the pack's
    /// `can_request_more` flag first, the way `LogWindowModel::request_more`
    /// does.
    pub fn request_more(&self, on_loaded: OnLoaded) -> bool {
        if self
            .pending
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return false;
        }
        tracing::debug!("dispatching load-more request");
        self.fetcher.fetch_more(on_loaded);
        true
    }

    /// Pending→Idle. Called only from the pack-installation path.
    pub fn mark_idle(&self) {
        self.pending.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::thread;

    struct CountingFetcher {
        calls: AtomicUsize,
    }

    impl CountingFetcher {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl MoreDataFetcher for CountingFetcher {
        fn fetch_more(&self, _on_complete: OnLoaded) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn second_request_before_completion_is_suppressed() {
        let fetcher = CountingFetcher::new();
        let coordinator = MoreDataCoordinator::new(Arc::clone(&fetcher) as _);
        assert!(coordinator.request_more(Box::new(|| {})));
        assert!(!coordinator.request_more(Box::new(|| {})));
        assert_eq!(fetcher.calls(), 1);
        assert!(coordinator.is_pending());
    }

    #[test]
    fn mark_idle_reopens_the_gate() {
        let fetcher = CountingFetcher::new();
        let coordinator = MoreDataCoordinator::new(Arc::clone(&fetcher) as _);
        assert!(coordinator.request_more(Box::new(|| {})));
        coordinator.mark_idle();
        assert!(!coordinator.is_pending());
        assert!(coordinator.request_more(Box::new(|| {})));
        assert_eq!(fetcher.calls(), 2);
    }

    #[test]
    fn concurrent_triggers_dispatch_exactly_once() {
        let fetcher = CountingFetcher::new();
        let coordinator = Arc::new(MoreDataCoordinator::new(Arc::clone(&fetcher) as _));
        let mut handles = Vec::new();
        for _ in 0..8 {
            let coordinator = Arc::clone(&coordinator);
            handles.push(thread::spawn(move || {
                coordinator.request_more(Box::new(|| {}))
            }));
        }
        let wins: usize = handles
            .into_iter()
            .map(|h| usize::from(h.join().expect("no panic")))
            .sum();
        assert_eq!(wins, 1, "exactly one thread may win the CAS");
        assert_eq!(fetcher.calls(), 1);
    }
}
