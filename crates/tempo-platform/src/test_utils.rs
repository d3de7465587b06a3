//! Test utilities for platform adapters
//!
//! Provides a sink that keeps every record and a store provider that counts
//! reads and writes.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tempo_core::prelude::*;
use tempo_core::{AnalyticsEvent, EventKind};

use crate::sink::RecordingSink;
use crate::store::{KeyValueStore, MemoryStoreProvider, StoreProvider};

/// Sink that captures records in memory
#[derive(Debug, Default)]
pub struct CapturingSink {
    events: Mutex<Vec<AnalyticsEvent>>,
}

impl CapturingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far
    pub fn events(&self) -> Vec<AnalyticsEvent> {
        self.events.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn kinds(&self) -> Vec<EventKind> {
        self.events().iter().map(|e| e.kind).collect()
    }

    pub fn len(&self) -> usize {
        self.events.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RecordingSink for CapturingSink {
    fn record(&self, event: AnalyticsEvent) {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(event);
    }
}

/// Memory-backed provider that counts store traffic
#[derive(Debug, Clone, Default)]
pub struct CountingStoreProvider {
    inner: MemoryStoreProvider,
    counters: Arc<Counters>,
}

#[derive(Debug, Default)]
struct Counters {
    opens: AtomicUsize,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl CountingStoreProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing provider so its contents can be pre-seeded
    pub fn wrapping(inner: MemoryStoreProvider) -> Self {
        Self {
            inner,
            counters: Arc::default(),
        }
    }

    pub fn opens(&self) -> usize {
        self.counters.opens.load(Ordering::SeqCst)
    }

    pub fn reads(&self) -> usize {
        self.counters.reads.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.counters.writes.load(Ordering::SeqCst)
    }
}

impl StoreProvider for CountingStoreProvider {
    fn open(&self, scope: &str) -> Result<Arc<dyn KeyValueStore>> {
        self.counters.opens.fetch_add(1, Ordering::SeqCst);
        let inner = self.inner.open(scope)?;
        Ok(Arc::new(CountingStore {
            inner,
            counters: self.counters.clone(),
        }))
    }
}

struct CountingStore {
    inner: Arc<dyn KeyValueStore>,
    counters: Arc<Counters>,
}

impl KeyValueStore for CountingStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.counters.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.counters.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.set(key, value)
    }
}
