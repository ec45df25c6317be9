//! # Sharded Store Adapter
//!
//! Records in a `DashMap`, split into independently locked shards picked
//! by id hash.
//!
//! Single-record operations (`add`, `get`) lock one shard, so writers to
//! different ids rarely contend. Whole-store operations (`add_batch`,
//! `clear`, `snapshot`, `len`) reach under the map (`raw-api`), take every
//! shard lock in index order and keep them all until done, so they stay
//! atomic and cannot deadlock against each other.
//!
//! Trade-off: higher single-record throughput, more expensive snapshots.

use std::thread;
use std::time::{Duration, Instant};

use dashmap::{DashMap, SharedValue};
use tracing::{debug, warn};

use crate::core::{Id, TrackedObject};
use crate::ports::{Track, TrackError, TrackResult};

/// Take a shard lock, giving up after `timeout` when one is set
///
/// Shard locks have no timed acquire, so a bounded wait polls `try_lock`
/// until the deadline.
fn acquire<G>(
    timeout: Option<Duration>,
    operation: &'static str,
    mut try_lock: impl FnMut() -> Option<G>,
    lock: impl FnOnce() -> G,
) -> TrackResult<G> {
    let Some(timeout) = timeout else {
        return Ok(lock());
    };

    let deadline = Instant::now() + timeout;
    loop {
        if let Some(guard) = try_lock() {
            return Ok(guard);
        }
        if Instant::now() >= deadline {
            warn!(operation, ?timeout, "shard lock wait expired");
            return Err(TrackError::ConcurrencyTimeout { operation, timeout });
        }
        thread::yield_now();
    }
}

/// In-memory store with per-shard locks
pub struct ShardedStore {
    records: DashMap<Id, TrackedObject>,

    /// Longest wait for each shard lock (None = block)
    lock_timeout: Option<Duration>,
}

impl ShardedStore {
    /// Create a store with about `shards` shards
    ///
    /// The count is rounded up to a power of two, with a minimum of two.
    pub fn new(shards: usize) -> Self {
        Self {
            records: DashMap::with_shard_amount(shards.max(2).next_power_of_two()),
            lock_timeout: None,
        }
    }

    /// Bound every shard lock wait
    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = Some(timeout);
        self
    }

    /// Number of shards
    pub fn shard_count(&self) -> usize {
        self.records.shards().len()
    }

    /// Hold the write lock of the shard owning `id` (test hook for contention)
    #[cfg(test)]
    fn hold_shard_write(&self, id: Id, hold: Duration) {
        let shard = &self.records.shards()[self.records.determine_map(&id)];
        let _guard = shard.write();
        thread::sleep(hold);
    }
}

impl Track for ShardedStore {
    fn add(&self, record: TrackedObject) -> TrackResult<()> {
        let shard = &self.records.shards()[self.records.determine_map(&record.id)];
        let mut records = acquire(
            self.lock_timeout,
            "add",
            || shard.try_write(),
            || shard.write(),
        )?;
        let replaced = records
            .insert(record.id, SharedValue::new(record))
            .is_some();
        debug!(replaced, "record stored");
        Ok(())
    }

    fn add_batch(&self, batch: Vec<TrackedObject>) -> TrackResult<usize> {
        let shards = self.records.shards();
        let mut guards = Vec::with_capacity(shards.len());
        for shard in shards {
            guards.push(acquire(
                self.lock_timeout,
                "add_batch",
                || shard.try_write(),
                || shard.write(),
            )?);
        }

        let count = batch.len();
        for record in batch {
            let index = self.records.determine_map(&record.id);
            guards[index].insert(record.id, SharedValue::new(record));
        }
        debug!(count, shards = guards.len(), "batch stored");
        Ok(count)
    }

    fn get(&self, id: Id) -> TrackResult<Option<TrackedObject>> {
        let shard = &self.records.shards()[self.records.determine_map(&id)];
        let records = acquire(
            self.lock_timeout,
            "get",
            || shard.try_read(),
            || shard.read(),
        )?;
        Ok(records.get(&id).map(|value| value.get().clone()))
    }

    fn clear(&self) -> TrackResult<()> {
        let shards = self.records.shards();
        let mut guards = Vec::with_capacity(shards.len());
        for shard in shards {
            guards.push(acquire(
                self.lock_timeout,
                "clear",
                || shard.try_write(),
                || shard.write(),
            )?);
        }
        for guard in guards.iter_mut() {
            guard.clear();
        }
        Ok(())
    }

    fn len(&self) -> usize {
        let guards: Vec<_> = self.records.shards().iter().map(|s| s.read()).collect();
        guards.iter().map(|g| g.len()).sum()
    }

    fn snapshot(&self) -> TrackResult<Vec<TrackedObject>> {
        let mut snapshot = {
            let shards = self.records.shards();
            let mut guards = Vec::with_capacity(shards.len());
            for shard in shards {
                guards.push(acquire(
                    self.lock_timeout,
                    "snapshot",
                    || shard.try_read(),
                    || shard.read(),
                )?);
            }
            let total = guards.iter().map(|g| g.len()).sum();
            let mut out = Vec::with_capacity(total);
            for guard in &guards {
                out.extend(guard.values().map(|value| value.get().clone()));
            }
            out
        };
        snapshot.sort_by_key(|r| r.id);
        Ok(snapshot)
    }

    fn name(&self) -> &'static str {
        "sharded"
    }
}
