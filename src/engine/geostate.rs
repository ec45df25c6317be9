//! # GeoState Engine
//!
//! The main store orchestrator.
//!
//! This struct wires together:
//! - Storage (Track port)
//! - Query resolution (Resolve port)
//! - Configuration
//!
//! And exposes a unified API for tracking objects and finding them again.
//! Build one at startup and share it (`Arc<GeoState>`) with every handler.

use std::io::{Read, Write};
use std::sync::Arc;

use rand::Rng;
use tracing::{debug, info};

use crate::adapters::index::FlatResolver;
use crate::adapters::json::{self, JsonResult};
use crate::adapters::storage::{MemoryStore, ShardedStore};
use crate::core::config::GeoConfig;
use crate::core::entity::{Event, User};
use crate::core::random::random_record;
use crate::core::{GeoPoint, Id, InsertRequest, NearQuery, TrackedObject};
use crate::ports::{
    validate_query, NearResult, Resolve, SearchResult, Track, TrackError, TrackResult,
};

/// The main geolocation state store
pub struct GeoState {
    /// Configuration
    config: GeoConfig,

    /// Storage backend (Track port)
    storage: Box<dyn Track>,

    /// Query backend (Resolve port)
    resolver: Box<dyn Resolve>,
}

impl GeoState {
    /// Create a store with default adapters
    ///
    /// `config.shards == 1` gives a single-lock `MemoryStore`, anything
    /// larger a `ShardedStore` (shard count rounded up to a power of two). Queries use a `FlatResolver` with the
    /// configured proximity and scope tolerance.
    pub fn new(config: GeoConfig) -> Self {
        let storage: Box<dyn Track> = match (config.shards, config.lock_timeout) {
            (1, None) => Box::new(MemoryStore::new()),
            (1, Some(timeout)) => Box::new(MemoryStore::with_lock_timeout(timeout)),
            (shards, None) => Box::new(ShardedStore::new(shards)),
            (shards, Some(timeout)) => {
                Box::new(ShardedStore::new(shards).with_lock_timeout(timeout))
            }
        };
        let resolver = Box::new(FlatResolver::new(
            Arc::clone(&config.proximity),
            config.scope_epsilon,
        ));

        info!(
            storage = storage.name(),
            resolver = resolver.name(),
            shards = config.shards,
            "geo state created"
        );

        Self {
            config,
            storage,
            resolver,
        }
    }

    /// Create with custom adapters
    ///
    /// The resolver owns the distance function: `distance` and `find_near`
    /// both measure through it, and `config.proximity` is only used by
    /// [`GeoState::new`] to build the default resolver.
    pub fn with_adapters(
        config: GeoConfig,
        storage: Box<dyn Track>,
        resolver: Box<dyn Resolve>,
    ) -> Self {
        Self {
            config,
            storage,
            resolver,
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &GeoConfig {
        &self.config
    }

    // ========================================================================
    // MUTATIONS
    // ========================================================================

    /// Insert a record, minting an id when the request has none
    ///
    /// Coordinates are checked before the store is touched.
    /// Returns the record's id.
    pub fn insert(&self, request: InsertRequest) -> TrackResult<Id> {
        let id = request.id.unwrap_or_else(Id::now);
        let record = request.into_record(id)?;
        self.storage.add(record)?;
        Ok(id)
    }

    /// Replace the record at the request's id
    ///
    /// Fails with `MissingId` when the request carries no id.
    pub fn update(&self, request: InsertRequest) -> TrackResult<Id> {
        let id = request.id.ok_or(TrackError::MissingId)?;
        let record = request.into_record(id)?;
        self.storage.add(record)?;
        Ok(id)
    }

    /// Insert or replace an already-built record
    pub fn add(&self, record: TrackedObject) -> TrackResult<()> {
        self.storage.add(record)
    }

    /// Place a user at `location`
    pub fn track_user(
        &self,
        user: &User,
        location: GeoPoint,
        token: impl Into<String>,
    ) -> TrackResult<Id> {
        self.storage.add(user.locate(token, location))?;
        Ok(user.id)
    }

    /// Place an event at `location`, keeping its tags and timestamp
    pub fn track_event(
        &self,
        event: &Event,
        location: GeoPoint,
        token: impl Into<String>,
    ) -> TrackResult<Id> {
        self.storage.add(event.locate(token, location))?;
        Ok(event.id)
    }

    /// Drop every record
    pub fn clear(&self) -> TrackResult<()> {
        self.storage.clear()?;
        info!("geo state cleared");
        Ok(())
    }

    /// Seed `n` synthetic records
    ///
    /// See [`GeoState::fill_random_with`].
    pub fn fill_random(&self, n: usize) -> TrackResult<usize> {
        self.fill_random_with(n, &mut rand::thread_rng())
    }

    /// Seed `n` synthetic records drawn from `rng`
    ///
    /// Records are generated before the lock is taken and written in one
    /// batch, so readers see either none or all of them.
    pub fn fill_random_with<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> TrackResult<usize> {
        let records: Vec<TrackedObject> = (0..n)
            .map(|_| random_record(rng, self.config.token_len))
            .collect();
        let count = self.storage.add_batch(records)?;
        info!(count, total = self.storage.len(), "random records seeded");
        Ok(count)
    }

    /// Load records from a JSON array
    pub fn import_json<R: Read>(&self, reader: R) -> JsonResult<usize> {
        json::import(self.storage.as_ref(), reader)
    }

    // ========================================================================
    // READS
    // ========================================================================

    /// Copy of the record for `id`
    pub fn get(&self, id: Id) -> TrackResult<Option<TrackedObject>> {
        self.storage.get(id)
    }

    /// Check if a record exists
    pub fn contains(&self, id: Id) -> TrackResult<bool> {
        self.storage.contains(id)
    }

    /// Get the number of records
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Copy of every record at one instant, ordered by id
    pub fn snapshot(&self) -> TrackResult<Vec<TrackedObject>> {
        self.storage.snapshot()
    }

    /// Distance between two points, measured the way queries measure it
    pub fn distance(&self, a: &GeoPoint, b: &GeoPoint) -> f64 {
        self.resolver.distance(a, b)
    }

    /// Records within the query scope that pass its filters, nearest first
    ///
    /// The query is validated before the snapshot is taken.
    pub fn find_near(&self, query: &NearQuery) -> NearResult<Vec<SearchResult>> {
        validate_query(query)?;
        let snapshot = self.storage.snapshot()?;
        let results = self.resolver.resolve(&snapshot, query)?;
        debug!(
            scanned = snapshot.len(),
            matched = results.len(),
            "near query answered"
        );
        Ok(results)
    }

    /// Write every record as a JSON array
    pub fn export_json<W: Write>(&self, writer: W) -> JsonResult<usize> {
        json::export(self.storage.as_ref(), writer)
    }
}

impl Default for GeoState {
    fn default() -> Self {
        Self::new(GeoConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::proximity::Proximity;
    use crate::core::{ObjectKind, PointError};
    use crate::ports::NearError;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn create_test_state() -> GeoState {
        GeoState::new(GeoConfig::new())
    }

    fn id(s: &str) -> Id {
        // Short readable ids for scenarios: pad a tag byte out to 16 bytes
        Id::from_bytes([s.as_bytes()[0]; 16])
    }

    #[test]
    fn test_insert_and_get() {
        let state = create_test_state();

        let req = InsertRequest::new("tok", ObjectKind::User, 10.0, 20.0).with_tags(["drugs"]);
        let id = state.insert(req).unwrap();

        let record = state.get(id).unwrap().unwrap();
        assert_eq!(record.id, id);
        assert_eq!(record.token, "tok");
        assert_eq!(record.location.coordinates(), [10.0, 20.0]);
        assert_eq!(record.tags, vec!["drugs"]);
    }

    #[test]
    fn test_insert_uses_given_id() {
        let state = create_test_state();
        let given = id("A");

        let returned = state
            .insert(InsertRequest::new("t", ObjectKind::Event, 0.0, 0.0).with_id(given))
            .unwrap();

        assert_eq!(returned, given);
        assert!(state.contains(given).unwrap());
    }

    #[test]
    fn test_invalid_insert_does_not_mutate() {
        let state = create_test_state();

        let err = state
            .insert(InsertRequest::new("t", ObjectKind::User, 200.0, 0.0))
            .unwrap_err();

        assert_eq!(
            err,
            TrackError::InvalidPoint(PointError::LongitudeOutOfRange(200.0))
        );
        assert!(state.is_empty());
    }

    #[test]
    fn test_update_requires_id() {
        let state = create_test_state();

        let err = state
            .update(InsertRequest::new("t", ObjectKind::User, 0.0, 0.0))
            .unwrap_err();
        assert_eq!(err, TrackError::MissingId);
        assert!(state.is_empty());
    }

    #[test]
    fn test_update_replaces() {
        let state = create_test_state();
        let a = id("A");

        state
            .insert(InsertRequest::new("first", ObjectKind::User, 1.0, 1.0).with_id(a))
            .unwrap();
        state
            .update(InsertRequest::new("second", ObjectKind::Event, 2.0, 2.0).with_id(a))
            .unwrap();

        assert_eq!(state.len(), 1);
        let record = state.get(a).unwrap().unwrap();
        assert_eq!(record.token, "second");
        assert_eq!(record.kind, ObjectKind::Event);
        assert_eq!(record.location.coordinates(), [2.0, 2.0]);
    }

    #[test]
    fn test_clear_idempotent() {
        let state = create_test_state();
        state.fill_random(10).unwrap();
        assert_eq!(state.len(), 10);

        state.clear().unwrap();
        assert_eq!(state.len(), 0);
        state.clear().unwrap();
        assert_eq!(state.len(), 0);
    }

    #[test]
    fn test_fill_random_seeded() {
        let state = create_test_state();
        let mut rng = StdRng::seed_from_u64(99);

        assert_eq!(state.fill_random_with(1000, &mut rng).unwrap(), 1000);
        assert_eq!(state.len(), 1000);

        for record in state.snapshot().unwrap() {
            assert!((-180.0..=180.0).contains(&record.location.lng()));
            assert!((-90.0..=90.0).contains(&record.location.lat()));
            assert_eq!(record.token.len(), 8);
        }
    }

    #[test]
    fn test_exact_match_scenario() {
        let state = create_test_state();
        state
            .insert(InsertRequest::new("t", ObjectKind::User, 0.0, 0.0).with_id(id("A")))
            .unwrap();

        let results = state
            .find_near(&NearQuery::new(GeoPoint::origin(), 0.0))
            .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].record.id, id("A"));
        assert_eq!(results[0].distance, 0.0);
    }

    #[test]
    fn test_radius_boundary_scenario() {
        let state = create_test_state();
        state
            .insert(InsertRequest::new("t", ObjectKind::User, 3.0, 4.0).with_id(id("B")))
            .unwrap();

        let hit = state
            .find_near(&NearQuery::new(GeoPoint::origin(), 5.0))
            .unwrap();
        assert_eq!(hit.len(), 1);
        assert_eq!(hit[0].record.id, id("B"));
        assert_eq!(hit[0].distance, 5.0);

        let miss = state
            .find_near(&NearQuery::new(GeoPoint::origin(), 4.999))
            .unwrap();
        assert!(miss.is_empty());
    }

    #[test]
    fn test_tag_exclusion_scenario() {
        let state = create_test_state();
        state
            .insert(
                InsertRequest::new("t", ObjectKind::User, 0.0, 0.0)
                    .with_id(id("C"))
                    .with_tags(["drugs"]),
            )
            .unwrap();

        let results = state
            .find_near(&NearQuery::new(GeoPoint::origin(), 1.0).with_tags(["debauch"]))
            .unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_negative_scope_rejected() {
        let state = create_test_state();
        assert_eq!(
            state.find_near(&NearQuery::new(GeoPoint::origin(), -0.5)),
            Err(NearError::NegativeScope(-0.5))
        );
    }

    #[test]
    fn test_track_entities() {
        let state = create_test_state();
        let mut rng = StdRng::seed_from_u64(4);
        let user = User::random(&mut rng);
        let event = Event::random(&mut rng);
        let here = GeoPoint::new(30.0, 50.0).unwrap();

        assert_eq!(state.track_user(&user, here, "u").unwrap(), user.id);
        assert_eq!(state.track_event(&event, here, "e").unwrap(), event.id);

        let events = state
            .find_near(&NearQuery::new(here, 0.0).with_kind(ObjectKind::Event))
            .unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].record.timestamp, event.timestamp);
    }

    #[test]
    fn test_distance_uses_config() {
        let state = create_test_state();
        let a = GeoPoint::origin();
        let b = GeoPoint::new(3.0, 4.0).unwrap();
        assert_eq!(state.distance(&a, &b), 5.0);
        assert_eq!(state.distance(&b, &a), 5.0);
    }

    /// Taxicab distance, to tell resolvers apart from the euclidean default
    struct Manhattan;

    impl Proximity for Manhattan {
        fn proximity(&self, a: &GeoPoint, b: &GeoPoint) -> f64 {
            (a.lng() - b.lng()).abs() + (a.lat() - b.lat()).abs()
        }

        fn name(&self) -> &'static str {
            "manhattan"
        }
    }

    #[test]
    fn test_distance_agrees_with_custom_resolver() {
        let state = GeoState::with_adapters(
            GeoConfig::new(),
            Box::new(MemoryStore::new()),
            Box::new(FlatResolver::new(Arc::new(Manhattan), 0.0)),
        );
        let b = GeoPoint::new(3.0, 4.0).unwrap();
        state.add(TrackedObject::new(id("M"), "t", ObjectKind::User, b)).unwrap();

        let results = state
            .find_near(&NearQuery::new(GeoPoint::origin(), 10.0))
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].distance, 7.0);
        assert_eq!(state.distance(&GeoPoint::origin(), &b), results[0].distance);
    }

    #[test]
    fn test_config_proximity_builds_default_resolver() {
        let state = GeoState::new(GeoConfig::new().with_proximity(Manhattan));
        let b = GeoPoint::new(3.0, 4.0).unwrap();
        state.add(TrackedObject::new(id("N"), "t", ObjectKind::User, b)).unwrap();

        assert_eq!(state.distance(&GeoPoint::origin(), &b), 7.0);
        let miss = state
            .find_near(&NearQuery::new(GeoPoint::origin(), 5.0))
            .unwrap();
        assert!(miss.is_empty());
    }

    #[test]
    fn test_unsanitized_epsilon_field_still_matches() {
        let mut config = GeoConfig::new();
        config.scope_epsilon = f64::NAN;
        let state = GeoState::new(config);
        state
            .insert(InsertRequest::new("t", ObjectKind::User, 0.0, 0.0).with_id(id("E")))
            .unwrap();

        let results = state
            .find_near(&NearQuery::new(GeoPoint::origin(), 10.0))
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].record.id, id("E"));

        let mut config = GeoConfig::new();
        config.scope_epsilon = -3.0;
        let state = GeoState::new(config);
        state
            .insert(InsertRequest::new("t", ObjectKind::User, 2.0, 0.0).with_id(id("F")))
            .unwrap();
        let miss = state
            .find_near(&NearQuery::new(GeoPoint::origin(), 1.0))
            .unwrap();
        assert!(miss.is_empty());
        assert_eq!(
            state
                .find_near(&NearQuery::new(GeoPoint::origin(), 2.0))
                .unwrap()
                .len(),
            1
        );
    }

    #[test]
    fn test_sharded_state_matches_single_lock() {
        let single = GeoState::new(GeoConfig::new());
        let sharded = GeoState::new(GeoConfig::new().with_shards(8));

        single
            .fill_random_with(300, &mut StdRng::seed_from_u64(1))
            .unwrap();
        let mut buf = Vec::new();
        single.export_json(&mut buf).unwrap();
        sharded.import_json(buf.as_slice()).unwrap();

        let query = NearQuery::new(GeoPoint::origin(), 90.0);
        assert_eq!(
            single.find_near(&query).unwrap(),
            sharded.find_near(&query).unwrap()
        );
    }
}
