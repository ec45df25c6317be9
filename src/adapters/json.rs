//! # JSON Import/Export
//!
//! Move the whole store in and out as a JSON array of records.
//!
//! ```text
//! [
//!   {"_id": "0193…", "token": "aBcDeFgH", "tobject": "User",
//!    "location": {"type": "Point", "coordinates": [30.5, 50.4]},
//!    "tags": ["drugs"]},
//!   ...
//! ]
//! ```
//!
//! Export writes one snapshot. Import decodes and validates the whole
//! array first, then writes it with a single `add_batch`, so a bad document
//! leaves the store untouched.

use std::io::{Read, Write};

use thiserror::Error;
use tracing::info;

use crate::core::TrackedObject;
use crate::ports::{Track, TrackError};

/// Result type for JSON transfer
pub type JsonResult<T> = Result<T, JsonError>;

#[derive(Debug, Error)]
pub enum JsonError {
    /// Malformed JSON or a record that fails validation
    #[error("decode failed: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("i/o failed: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Track(#[from] TrackError),
}

/// Write every record as a JSON array; returns the record count
pub fn export<W: Write>(store: &dyn Track, mut writer: W) -> JsonResult<usize> {
    let snapshot = store.snapshot()?;
    serde_json::to_writer(&mut writer, &snapshot)?;
    writer.flush()?;
    info!(count = snapshot.len(), store = store.name(), "store exported");
    Ok(snapshot.len())
}

/// Read a JSON array of records into the store; returns the record count
pub fn import<R: Read>(store: &dyn Track, reader: R) -> JsonResult<usize> {
    let records: Vec<TrackedObject> = serde_json::from_reader(reader)?;
    let count = store.add_batch(records)?;
    info!(count, store = store.name(), "store imported");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::{MemoryStore, ShardedStore};
    use crate::core::random::random_record;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_export_then_import() {
        let mut rng = StdRng::seed_from_u64(21);
        let source = MemoryStore::new();
        source
            .add_batch((0..25).map(|_| random_record(&mut rng, 8)).collect())
            .unwrap();

        let mut buf = Vec::new();
        assert_eq!(export(&source, &mut buf).unwrap(), 25);

        let target = ShardedStore::new(4);
        assert_eq!(import(&target, buf.as_slice()).unwrap(), 25);
        assert_eq!(target.snapshot().unwrap(), source.snapshot().unwrap());
    }

    #[test]
    fn test_import_rejects_bad_point_without_writing() {
        let store = MemoryStore::new();
        let doc = format!(
            r#"[
                {{"_id":"{}","tobject":"User","location":{{"coordinates":[1.0,1.0]}}}},
                {{"_id":"{}","tobject":"User","location":{{"coordinates":[1.0,95.0]}}}}
            ]"#,
            "01".repeat(16),
            "02".repeat(16)
        );

        let err = import(&store, doc.as_bytes()).unwrap_err();
        assert!(matches!(err, JsonError::Decode(_)));
        assert!(store.is_empty());
    }

    #[test]
    fn test_import_empty_array() {
        let store = MemoryStore::new();
        assert_eq!(import(&store, "[]".as_bytes()).unwrap(), 0);
    }

    #[test]
    fn test_import_drops_repeated_tags() {
        let store = MemoryStore::new();
        let id = "03".repeat(16);
        let doc = format!(
            r#"[{{"_id":"{}","tobject":"event",
                 "location":{{"type":"Point","coordinates":[2.0,3.0]}},
                 "tags":["drugs","drugs","drugs"]}}]"#,
            id
        );

        assert_eq!(import(&store, doc.as_bytes()).unwrap(), 1);
        let record = store.get(id.parse().unwrap()).unwrap().unwrap();
        assert_eq!(record.tags, vec!["drugs"]);
        assert_eq!(record.kind, crate::core::ObjectKind::Event);
    }
}
