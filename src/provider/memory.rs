//! In-memory synthetic history provider.
//!
//! Backs the integration tests and demos: a fixed synthetic commit list served
//! in chunks, with caches whose population the caller controls, plus
//! cancellation/failure injection for exercising the facade's fallback paths.
//!
//! `fetch_more` only records the request and captures the completion callback;
//! the caller decides when the "load" finishes by calling [`InMemoryHistory::advance`]
//! and installing the resulting pack. This keeps test scheduling explicit —
//! real providers do the same dance with actual background work.

#![allow(missing_docs)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{Duration, TimeZone, Utc};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::core::dispatch::OnLoaded;
use crate::model::detail::{Cached, CommitDetails, CommitMetadata};
use crate::model::entity::{EntityId, Label, LabelKind, RootId};
use crate::model::pack::{VisiblePack, VisibleRow};
use crate::provider::{DetailError, DetailResult, FullDetailCache, MetadataCache, MoreDataFetcher};

const AUTHORS: &[&str] = &["ada", "brian", "grace", "linus", "margaret"];

/// Deterministic synthetic commit list.
fn synthesize_commits(total: usize, seed: u64) -> Vec<CommitMetadata> {
    let mut rng = StdRng::seed_from_u64(seed);
    let epoch = Utc
        .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or_default();
    (0..total)
        .map(|i| {
            let id = EntityId::new(i as u64);
            let author = AUTHORS[rng.random_range(0..AUTHORS.len())];
            CommitMetadata {
                id,
                root: RootId::new(u32::try_from(i % 3).unwrap_or(0)),
                author: author.to_string(),
                subject: format!("change {i}: adjust module {}", rng.random_range(0..50)),
                committed_at: epoch + Duration::minutes(i as i64),
                short_hash: format!("{:07x}", rng.random_range(0..u32::MAX)),
            }
        })
        .collect()
}

#[derive(Default)]
struct CacheState {
    metadata: HashMap<EntityId, CommitMetadata>,
    details: HashMap<EntityId, CommitDetails>,
    cancel_on: HashSet<EntityId>,
    fail_on: HashSet<EntityId>,
    recorded_hints: Vec<Vec<EntityId>>,
    populate_on_hint: bool,
}

/// Synthetic upstream provider: chunked history plus controllable caches.
pub struct InMemoryHistory {
    commits: Vec<CommitMetadata>,
    labels: HashMap<EntityId, Vec<Label>>,
    chunk: usize,
    loaded: AtomicUsize,
    fetch_calls: AtomicUsize,
    pending_completions: Mutex<Vec<OnLoaded>>,
    caches: Mutex<CacheState>,
}

impl InMemoryHistory {
    /// Build a provider over `total` synthetic commits served `chunk` at a time.
    #[must_use]
    pub fn new(total: usize, chunk: usize, seed: u64) -> Self {
        let commits = synthesize_commits(total, seed);
        let mut labels = HashMap::new();
        if let Some(first) = commits.first() {
            labels.insert(
                first.id,
                vec![
                    Label::new("main", LabelKind::Branch),
                    Label::new("HEAD", LabelKind::Head),
                ],
            );
        }
        if let Some(mid) = commits.get(total / 2) {
            labels.insert(mid.id, vec![Label::new("v0.9", LabelKind::Tag)]);
        }
        Self {
            commits,
            labels,
            chunk,
            loaded: AtomicUsize::new(0),
            fetch_calls: AtomicUsize::new(0),
            pending_completions: Mutex::new(Vec::new()),
            caches: Mutex::new(CacheState::default()),
        }
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.commits.len()
    }

    /// Number of `fetch_more` calls observed.
    #[must_use]
    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    /// The first pack: one chunk of rows, or the empty sentinel for an empty
    /// history.
    #[must_use]
    pub fn initial_pack(&self) -> VisiblePack {
        self.loaded
            .store(self.chunk.min(self.commits.len()), Ordering::SeqCst);
        self.pack_for_loaded()
    }

    /// Materialize one more chunk and return the replacement pack, along with
    /// the completion callbacks captured since the last advance. The caller
    /// installs the pack and then runs the completions, mirroring the
    /// on-UI-thread ordering a real provider must follow.
    pub fn advance(&self) -> (VisiblePack, Vec<OnLoaded>) {
        let loaded = self.loaded.load(Ordering::SeqCst);
        let next = (loaded + self.chunk).min(self.commits.len());
        self.loaded.store(next, Ordering::SeqCst);
        let completions = std::mem::take(&mut *self.pending_completions.lock());
        (self.pack_for_loaded(), completions)
    }

    fn pack_for_loaded(&self) -> VisiblePack {
        let loaded = self.loaded.load(Ordering::SeqCst);
        let rows = self.commits[..loaded]
            .iter()
            .map(|meta| VisibleRow::new(meta.id, meta.root))
            .collect();
        let labels = self
            .labels
            .iter()
            .filter(|(id, _)| id.raw() < loaded as u64)
            .map(|(id, labels)| (*id, labels.clone()))
            .collect();
        VisiblePack::new(rows, labels, loaded < self.commits.len())
    }

    // ──────────────────── cache control (test side) ────────────────────

    /// Put metadata for `ids` into the lightweight cache.
    pub fn populate_metadata(&self, ids: impl IntoIterator<Item = EntityId>) {
        let mut caches = self.caches.lock();
        for id in ids {
            if let Some(meta) = self.commit(id) {
                caches.metadata.insert(id, meta.clone());
            }
        }
    }

    /// Put full details for `ids` into the full-tier cache.
    pub fn populate_details(&self, ids: impl IntoIterator<Item = EntityId>) {
        let mut caches = self.caches.lock();
        for id in ids {
            if let Some(meta) = self.commit(id) {
                caches.details.insert(
                    id,
                    CommitDetails {
                        metadata: meta.clone(),
                        full_message: format!("{}\n\nlong body for {}", meta.subject, id),
                        changed_files: 1 + (id.raw() as usize % 7),
                    },
                );
            }
        }
    }

    /// Make metadata lookups for `id` report cooperative cancellation.
    pub fn cancel_metadata_for(&self, id: EntityId) {
        self.caches.lock().cancel_on.insert(id);
    }

    /// Make metadata lookups for `id` fail unexpectedly.
    pub fn fail_metadata_for(&self, id: EntityId) {
        self.caches.lock().fail_on.insert(id);
    }

    /// When set, a metadata miss batch-populates the cache from the prefetch
    /// hints, so the next access resolves. Models a hint-honoring cache.
    pub fn set_populate_on_hint(&self, on: bool) {
        self.caches.lock().populate_on_hint = on;
    }

    /// Prefetch hint batches observed by the metadata cache, oldest first.
    #[must_use]
    pub fn recorded_hints(&self) -> Vec<Vec<EntityId>> {
        self.caches.lock().recorded_hints.clone()
    }

    fn commit(&self, id: EntityId) -> Option<&CommitMetadata> {
        usize::try_from(id.raw())
            .ok()
            .and_then(|i| self.commits.get(i))
    }
}

impl MetadataCache for InMemoryHistory {
    fn metadata(
        &self,
        id: EntityId,
        prefetch_hints: &mut dyn Iterator<Item = EntityId>,
    ) -> DetailResult<CommitMetadata> {
        let mut caches = self.caches.lock();
        if caches.cancel_on.contains(&id) {
            return Err(DetailError::Cancelled);
        }
        if caches.fail_on.contains(&id) {
            return Err(DetailError::Failed {
                details: format!("synthetic backend refused {id}"),
            });
        }
        // Lookup first: hint-driven population models an async batch fetch,
        // so it must not be visible to the access that requested it.
        let answer = match caches.metadata.get(&id) {
            Some(meta) => Ok(Cached::Loaded(std::sync::Arc::new(meta.clone()))),
            None => Ok(Cached::Placeholder(id)),
        };
        let hints: Vec<EntityId> = prefetch_hints.collect();
        if !hints.is_empty() {
            if caches.populate_on_hint {
                for hinted in &hints {
                    if let Some(meta) = self.commit(*hinted) {
                        caches.metadata.insert(*hinted, meta.clone());
                    }
                }
            }
            caches.recorded_hints.push(hints);
        }
        answer
    }
}

impl FullDetailCache for InMemoryHistory {
    fn full_details(&self, id: EntityId) -> DetailResult<CommitDetails> {
        let caches = self.caches.lock();
        match caches.details.get(&id) {
            Some(details) => Ok(Cached::Loaded(std::sync::Arc::new(details.clone()))),
            None => Ok(Cached::Placeholder(id)),
        }
    }
}

impl MoreDataFetcher for InMemoryHistory {
    fn fetch_more(&self, on_complete: OnLoaded) {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        self.pending_completions.lock().push(on_complete);
    }
}
