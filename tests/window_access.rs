//! Integration scenarios: windowed access over the in-memory provider,
//! single-flight load-more under burst access, prefetch window bounds, and
//! cross-thread completion marshaling.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use parking_lot::Mutex;
use proptest::prelude::*;

use log_window::prelude::*;
use log_window::provider::memory::InMemoryHistory;

fn model_over(history: &Arc<InMemoryHistory>) -> LogWindowModel {
    let model = LogWindowModel::new(
        Arc::clone(history) as _,
        Arc::clone(history) as _,
        Arc::clone(history) as _,
        AccessConfig::default(),
    );
    model.install_pack(history.initial_pack());
    model
}

// ──────────────────── identity ────────────────────

#[test]
fn id_at_is_deterministic_across_repeated_calls() {
    let history = Arc::new(InMemoryHistory::new(500, 100, 11));
    let model = model_over(&history);
    for row in 0..model.row_count() {
        let first = model.id_at(row).expect("in range");
        let second = model.id_at(row).expect("in range");
        assert_eq!(first, second, "row {row}");
    }
}

#[test]
fn replacement_invalidates_nothing_it_should_not() {
    let history = Arc::new(InMemoryHistory::new(500, 100, 11));
    let model = model_over(&history);
    let before = model.id_at(0).expect("in range");
    let _ = model.request_more(noop_on_loaded());
    let (pack, _) = history.advance();
    model.install_pack(pack);
    // Append-only upstream: previously visible rows resolve to the same ids.
    assert_eq!(model.id_at(0).expect("in range"), before);
    assert_eq!(model.row_count(), 200);
}

// ──────────────────── single-flight load-more ────────────────────

#[test]
fn burst_access_near_the_tail_dispatches_one_fetch() {
    let history = Arc::new(InMemoryHistory::new(1_000, 100, 11));
    let model = model_over(&history);
    // A tight scroll burst across the last rows of the window.
    for row in 90..100 {
        let _ = model
            .value_at(row, ColumnKind::Subject)
            .expect("in range");
    }
    assert_eq!(history.fetch_calls(), 1, "request storm must collapse to one");
}

#[test]
fn request_more_twice_before_completion_fetches_once() {
    let history = Arc::new(InMemoryHistory::new(300, 100, 11));
    let model = model_over(&history);
    assert!(model.request_more(noop_on_loaded()));
    assert!(!model.request_more(noop_on_loaded()));
    assert_eq!(history.fetch_calls(), 1);
}

#[test]
fn failed_reload_still_reopens_the_gate() {
    let history = Arc::new(InMemoryHistory::new(300, 100, 11));
    let model = model_over(&history);
    assert!(model.request_more(noop_on_loaded()));
    // The provider "fails": the window is reinstalled unchanged, still
    // extendable. Pending must clear all the same.
    let stale = history.initial_pack();
    model.install_pack(stale);
    assert!(model.can_request_more());
    assert!(model.request_more(noop_on_loaded()));
    assert_eq!(history.fetch_calls(), 2);
}

#[test]
fn exhausted_window_never_requests() {
    let history = Arc::new(InMemoryHistory::new(50, 100, 11));
    let model = model_over(&history);
    assert!(!model.can_request_more());
    assert!(!model.request_more(noop_on_loaded()));
    let _ = model
        .value_at(49, ColumnKind::Subject)
        .expect("in range");
    assert_eq!(history.fetch_calls(), 0);
}

// ──────────────────── structural-change notification ────────────────────

#[test]
fn every_install_notifies_with_an_increasing_generation() {
    let history = Arc::new(InMemoryHistory::new(400, 100, 11));
    let model = model_over(&history);
    let rx = model.subscribe();
    let mut last = 0;
    for _ in 0..3 {
        let _ = model.request_more(noop_on_loaded());
        let (pack, _) = history.advance();
        model.install_pack(pack);
        let change = rx.try_recv().expect("one notification per install");
        assert!(change.generation > last, "generations must increase");
        last = change.generation;
    }
    assert!(rx.try_recv().is_err(), "no spurious notifications");
}

// ──────────────────── placeholder contract ────────────────────

#[test]
fn uncached_detail_is_a_placeholder_matching_id_at() {
    let history = Arc::new(InMemoryHistory::new(100, 100, 11));
    let model = model_over(&history);
    let id = model.id_at(42).expect("in range");
    match model.commit_detail(42).expect("in range") {
        Cached::Placeholder(got) => assert_eq!(got, id),
        Cached::Loaded(_) => panic!("cache was never populated"),
    }
}

#[test]
fn cells_self_correct_once_the_cache_populates() {
    let history = Arc::new(InMemoryHistory::new(100, 100, 11));
    let model = model_over(&history);
    history.set_populate_on_hint(true);
    let first = model
        .value_at(30, ColumnKind::Author)
        .expect("in range");
    assert_eq!(first.reason(), Some(FallbackReason::Unavailable));
    // The miss carried prefetch hints; the cache batch-populated from them.
    let second = model
        .value_at(30, ColumnKind::Author)
        .expect("in range");
    assert!(!second.is_fallback(), "a later access re-reads the cache");
}

#[test]
fn prefetch_hints_cover_the_window_around_the_access_point() {
    let history = Arc::new(InMemoryHistory::new(100, 100, 11));
    let model = model_over(&history);
    let _ = model.metadata(50, true).expect("in range");
    let hints = history.recorded_hints();
    assert_eq!(hints.len(), 1);
    let batch = &hints[0];
    assert_eq!(batch.len(), 60, "[30, 90) for margins 20/40");
    assert_eq!(batch.first().map(|id| id.raw()), Some(30));
    assert_eq!(batch.last().map(|id| id.raw()), Some(89));
}

#[test]
fn never_fail_holds_for_every_column_under_every_injected_fault() {
    let history = Arc::new(InMemoryHistory::new(100, 100, 11));
    let model = model_over(&history);
    history.cancel_metadata_for(EntityId::new(10));
    history.fail_metadata_for(EntityId::new(20));
    history.populate_metadata([EntityId::new(30)]);
    for row in [10, 20, 30, 40] {
        for column in ColumnKind::ALL {
            let outcome = model
                .value_at(row, column)
                .expect("in-range access never fails");
            if outcome.is_fallback() {
                assert_eq!(outcome.value(), &column.stub_value());
            }
        }
    }
}

// ──────────────────── cross-thread completion marshaling ────────────────────

/// Fetcher that loads on a background thread and marshals the install plus
/// the completion back through the dispatcher, the way a real provider must.
struct ThreadedFetcher {
    history: Arc<InMemoryHistory>,
    handle: DispatchHandle,
    model: Arc<Mutex<Option<Arc<LogWindowModel>>>>,
}

impl MoreDataFetcher for ThreadedFetcher {
    fn fetch_more(&self, on_complete: OnLoaded) {
        let history = Arc::clone(&self.history);
        let handle = self.handle.clone();
        let model = Arc::clone(&self.model);
        thread::spawn(move || {
            let (pack, _) = history.advance();
            handle
                .post(Box::new(move || {
                    let model = model.lock().clone().expect("model registered");
                    model.install_pack(pack);
                    on_complete();
                }))
                .expect("dispatcher alive");
        });
    }
}

#[test]
fn background_fetch_completes_on_the_owner_thread() {
    let history = Arc::new(InMemoryHistory::new(250, 100, 11));
    let dispatcher = UiDispatcher::new();
    let slot = Arc::new(Mutex::new(None));
    let fetcher = Arc::new(ThreadedFetcher {
        history: Arc::clone(&history),
        handle: dispatcher.handle(),
        model: Arc::clone(&slot),
    });
    let model = Arc::new(LogWindowModel::new(
        Arc::clone(&history) as _,
        Arc::clone(&history) as _,
        fetcher as _,
        AccessConfig::default(),
    ));
    *slot.lock() = Some(Arc::clone(&model));
    model.install_pack(history.initial_pack());

    let completions = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&completions);
    assert!(model.request_more(Box::new(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    })));
    assert_eq!(model.row_count(), 100, "nothing lands before the pump runs");

    dispatcher.run_one_blocking().expect("completion job arrives");
    assert_eq!(model.row_count(), 200, "installed on the owner thread");
    assert_eq!(completions.load(Ordering::SeqCst), 1, "on_loaded ran once");
    assert!(model.can_request_more(), "gate reopened for the next window");
}

// ──────────────────── prefetch window properties ────────────────────

proptest! {
    #[test]
    fn window_extent_matches_the_contract(
        (row_count, row) in (1usize..250).prop_flat_map(|n| (Just(n), 0..n))
    ) {
        let history = Arc::new(InMemoryHistory::new(row_count, row_count, 11));
        let model = model_over(&history);
        let ids: Vec<EntityId> = model.window_around(row).collect();
        let expected = (row + DOWN_PRELOAD_COUNT).min(row_count) - row.saturating_sub(UP_PRELOAD_COUNT);
        prop_assert_eq!(ids.len(), expected);
        for pair in ids.windows(2) {
            prop_assert!(pair[0] < pair[1], "ascending row order");
        }
        for id in &ids {
            prop_assert!(id.raw() < row_count as u64, "every id in range");
        }
    }
}
