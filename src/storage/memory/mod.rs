//! In-process ephemeral store
//!
//! Entries live in a `DashMap`. Each operation touches exactly one key and runs while that
//! key's shard lock is held, which makes the window pipeline and counter increments atomic
//! per key without holding any lock across an await point.

mod pattern;

use super::{EphemeralStore, WindowPipeline, WindowSnapshot};
use crate::utils::error::{GateError, Result};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Value held under a key
#[derive(Debug, Clone)]
enum Slot {
    Text(String),
    Counter(i64),
    /// `(score, member)` pairs kept sorted
    Log(Vec<(u64, String)>),
}

impl Slot {
    fn kind(&self) -> &'static str {
        match self {
            Slot::Text(_) => "string",
            Slot::Counter(_) => "counter",
            Slot::Log(_) => "sorted set",
        }
    }
}

#[derive(Debug, Clone)]
struct Entry {
    slot: Slot,
    expires_at: Option<Instant>,
}

impl Entry {
    fn new(slot: Slot) -> Self {
        Self {
            slot,
            expires_at: None,
        }
    }

    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

fn wrong_type(key: &str, slot: &Slot) -> GateError {
    GateError::store(format!(
        "WRONGTYPE operation against key {key:?} holding a {}",
        slot.kind()
    ))
}

/// `DashMap`-backed store for tests and single-node deployments
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: DashMap<String, Entry>,
    closed: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a background sweep removing expired entries every `interval`.
    ///
    /// The task holds a weak reference and stops once the store is dropped or closed.
    pub fn start_cleanup_task(self: Arc<Self>, interval: Duration) -> JoinHandle<()> {
        let store: Weak<Self> = Arc::downgrade(&self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // the first tick completes immediately
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let Some(store) = store.upgrade() else {
                    break;
                };
                if store.is_closed() {
                    break;
                }
                let removed = store.purge_expired();
                if removed > 0 {
                    debug!(removed, "Swept expired entries from memory store");
                }
            }
        })
    }

    /// Remove every expired entry, returning how many were dropped
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        before.saturating_sub(self.entries.len())
    }

    /// Number of entries currently held, including expired ones not yet swept
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_closed() {
            return Err(GateError::store_unavailable("memory store is closed"));
        }
        Ok(())
    }

    fn expiry(ttl: Duration, now: Instant) -> Option<Instant> {
        now.checked_add(ttl)
    }
}

#[async_trait]
impl EphemeralStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> Result<()> {
        self.ensure_open()
    }

    async fn close(&self) -> Result<()> {
        if !self.closed.swap(true, Ordering::AcqRel) {
            self.entries.clear();
            info!("Memory store closed");
        }
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.ensure_open()?;
        let now = Instant::now();

        let value = match self.entries.get(key) {
            None => return Ok(None),
            Some(entry) if entry.is_expired(now) => None,
            Some(entry) => match &entry.slot {
                Slot::Text(text) => Some(text.clone()),
                Slot::Counter(n) => Some(n.to_string()),
                slot @ Slot::Log(_) => return Err(wrong_type(key, slot)),
            },
        };

        if value.is_none() {
            self.entries.remove_if(key, |_, entry| entry.is_expired(now));
        }
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        self.ensure_open()?;
        let entry = Entry {
            slot: Slot::Text(value.to_string()),
            expires_at: Self::expiry(ttl, Instant::now()),
        };
        self.entries.insert(key.to_string(), entry);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.ensure_open()?;
        self.entries.remove(key);
        Ok(())
    }

    async fn keys_matching(&self, pattern: &str) -> Result<Vec<String>> {
        self.ensure_open()?;
        let matcher = pattern::glob_to_regex(pattern)?;
        let now = Instant::now();

        let mut keys: Vec<String> = self
            .entries
            .iter()
            .filter(|item| !item.value().is_expired(now) && matcher.is_match(item.key()))
            .map(|item| item.key().clone())
            .collect();
        keys.sort();
        Ok(keys)
    }

    async fn increment(&self, key: &str, ttl: Duration) -> Result<i64> {
        self.ensure_open()?;
        let now = Instant::now();

        let mut entry = self
            .entries
            .entry(key.to_string())
            .or_insert_with(|| Entry::new(Slot::Counter(0)));
        if entry.is_expired(now) {
            *entry = Entry::new(Slot::Counter(0));
        }

        let current = match &entry.slot {
            Slot::Counter(n) => *n,
            Slot::Text(text) => text.parse::<i64>().map_err(|_| {
                GateError::store(format!("value at {key:?} is not an integer"))
            })?,
            slot @ Slot::Log(_) => return Err(wrong_type(key, slot)),
        };
        let next = current
            .checked_add(1)
            .ok_or_else(|| GateError::store(format!("increment of {key:?} would overflow")))?;

        entry.slot = Slot::Counter(next);
        entry.expires_at = Self::expiry(ttl, now);
        Ok(next)
    }

    async fn run_window(&self, key: &str, pipeline: &WindowPipeline) -> Result<WindowSnapshot> {
        self.ensure_open()?;
        let now = Instant::now();

        let snapshot = {
            let mut entry = self
                .entries
                .entry(key.to_string())
                .or_insert_with(|| Entry::new(Slot::Log(Vec::new())));
            if entry.is_expired(now) {
                *entry = Entry::new(Slot::Log(Vec::new()));
            }

            let snapshot = match &mut entry.slot {
                Slot::Log(log) => {
                    log.retain(|(score, _)| *score > pipeline.trim_up_to);
                    let count = u32::try_from(log.len()).unwrap_or(u32::MAX);
                    let inserted = count < pipeline.limit;
                    if inserted {
                        let candidate = (pipeline.score, pipeline.member.as_str());
                        let at = log.partition_point(|(score, member)| {
                            (*score, member.as_str()) <= candidate
                        });
                        log.insert(at, (pipeline.score, pipeline.member.clone()));
                    }
                    WindowSnapshot {
                        count,
                        inserted,
                        oldest_score: log.first().map(|(score, _)| *score),
                    }
                }
                slot => return Err(wrong_type(key, slot)),
            };

            if snapshot.inserted {
                entry.expires_at = Self::expiry(pipeline.ttl, now);
            }
            snapshot
        };

        if snapshot.oldest_score.is_none() {
            self.entries
                .remove_if(key, |_, entry| matches!(&entry.slot, Slot::Log(log) if log.is_empty()));
        }
        Ok(snapshot)
    }
}
