//! # Memory Store Adapter
//!
//! In-memory store: one HashMap behind one reader-writer lock.
//! Fast, but volatile (data lost on shutdown).
//!
//! Writers (`add`, `add_batch`, `clear`) hold the lock exclusively for
//! their whole duration. Readers (`get`, `snapshot`, `len`) share it.
//!
//! Good for:
//! - Testing
//! - Moderate write rates
//! - Exact whole-store snapshots at low cost

use std::collections::HashMap;
use std::time::Duration;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, warn};

use crate::core::{Id, TrackedObject};
use crate::ports::{Track, TrackError, TrackResult};

type Records = HashMap<Id, TrackedObject>;

/// Acquire a read guard, waiting at most `timeout` when one is set
fn read_lock<'a>(
    lock: &'a RwLock<Records>,
    timeout: Option<Duration>,
    operation: &'static str,
) -> TrackResult<RwLockReadGuard<'a, Records>> {
    match timeout {
        None => Ok(lock.read()),
        Some(timeout) => lock.try_read_for(timeout).ok_or_else(|| {
            warn!(operation, ?timeout, "store read lock wait expired");
            TrackError::ConcurrencyTimeout { operation, timeout }
        }),
    }
}

/// Acquire a write guard, waiting at most `timeout` when one is set
fn write_lock<'a>(
    lock: &'a RwLock<Records>,
    timeout: Option<Duration>,
    operation: &'static str,
) -> TrackResult<RwLockWriteGuard<'a, Records>> {
    match timeout {
        None => Ok(lock.write()),
        Some(timeout) => lock.try_write_for(timeout).ok_or_else(|| {
            warn!(operation, ?timeout, "store write lock wait expired");
            TrackError::ConcurrencyTimeout { operation, timeout }
        }),
    }
}

/// Single-lock in-memory store
#[derive(Default)]
pub struct MemoryStore {
    /// The stored records
    records: RwLock<Records>,

    /// Longest wait for the lock (None = block)
    lock_timeout: Option<Duration>,
}

impl MemoryStore {
    /// Create an empty store with unbounded lock waits
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store whose lock waits give up after `timeout`
    pub fn with_lock_timeout(timeout: Duration) -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            lock_timeout: Some(timeout),
        }
    }

    /// Hold the write lock for `hold` (test hook for contention)
    #[cfg(test)]
    fn hold_write(&self, hold: Duration) {
        let _guard = self.records.write();
        std::thread::sleep(hold);
    }
}

impl Track for MemoryStore {
    fn add(&self, record: TrackedObject) -> TrackResult<()> {
        let mut records = write_lock(&self.records, self.lock_timeout, "add")?;
        let replaced = records.insert(record.id, record).is_some();
        debug!(replaced, "record stored");
        Ok(())
    }

    fn add_batch(&self, batch: Vec<TrackedObject>) -> TrackResult<usize> {
        let mut records = write_lock(&self.records, self.lock_timeout, "add_batch")?;
        let count = batch.len();
        records.reserve(count);
        for record in batch {
            records.insert(record.id, record);
        }
        debug!(count, total = records.len(), "batch stored");
        Ok(count)
    }

    fn get(&self, id: Id) -> TrackResult<Option<TrackedObject>> {
        let records = read_lock(&self.records, self.lock_timeout, "get")?;
        Ok(records.get(&id).cloned())
    }

    fn clear(&self) -> TrackResult<()> {
        let mut records = write_lock(&self.records, self.lock_timeout, "clear")?;
        records.clear();
        Ok(())
    }

    fn len(&self) -> usize {
        self.records.read().len()
    }

    fn snapshot(&self) -> TrackResult<Vec<TrackedObject>> {
        let mut snapshot: Vec<TrackedObject> = {
            let records = read_lock(&self.records, self.lock_timeout, "snapshot")?;
            records.values().cloned().collect()
        };
        snapshot.sort_by_key(|r| r.id);
        Ok(snapshot)
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
