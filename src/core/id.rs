//! # Id
//!
//! Identity of a tracked object.
//!
//! Format: 128 bits = [timestamp_ms:48][counter:16][random:64]
//! - Timestamp gives a rough creation order
//! - Counter separates ids minted in the same millisecond
//! - Random tail keeps ids from different processes apart
//! - Rendered as 32 lowercase hex characters on the wire

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Global counter for uniqueness within same millisecond
static COUNTER: AtomicU64 = AtomicU64::new(0);

/// Error returned when a string is not a 32-character hex id
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid id {0:?}: expected 32 hex characters")]
pub struct IdParseError(pub String);

/// Unique identifier of a tracked object
///
/// Assigned once at creation and never reassigned.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct Id([u8; 16]);

impl Id {
    /// Generate a new Id for the current moment
    pub fn now() -> Self {
        Self::with_random(rand::random())
    }

    /// Generate an Id whose random tail comes from `random`
    ///
    /// Timestamp and counter are still taken from the clock and the
    /// process-wide counter.
    pub fn with_random(random: u64) -> Self {
        // A clock before 1970 collapses to zero; the counter still separates ids
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);

        let counter = COUNTER.fetch_add(1, Ordering::Relaxed);

        let mut bytes = [0u8; 16];
        bytes[..6].copy_from_slice(&timestamp.to_be_bytes()[2..]);
        bytes[6..8].copy_from_slice(&(counter as u16).to_be_bytes());
        bytes[8..].copy_from_slice(&random.to_be_bytes());

        Self(bytes)
    }

    /// Create an Id from raw bytes
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes
    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Extract the timestamp component (milliseconds since epoch)
    pub fn timestamp_ms(&self) -> u64 {
        let mut ts = [0u8; 8];
        ts[2..].copy_from_slice(&self.0[..6]);
        u64::from_be_bytes(ts)
    }

    /// Create a nil/zero Id (useful for testing)
    pub fn nil() -> Self {
        Self([0u8; 16])
    }

    /// Check if this is a nil Id
    pub fn is_nil(&self) -> bool {
        self.0 == [0u8; 16]
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl FromStr for Id {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 32 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(IdParseError(s.to_string()));
        }

        let mut bytes = [0u8; 16];
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&s[i * 2..i * 2 + 2], 16)
                .map_err(|_| IdParseError(s.to_string()))?;
        }
        Ok(Self(bytes))
    }
}

impl Serialize for Id {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_id_creation() {
        let id = Id::now();
        assert!(!id.is_nil());
    }

    #[test]
    fn test_id_timestamp() {
        let before = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_millis() as u64;

        let id = Id::now();

        let after = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_millis() as u64;

        let ts = id.timestamp_ms();
        assert!(ts >= before);
        assert!(ts <= after);
    }

    #[test]
    fn test_id_ordering() {
        let id1 = Id::now();
        thread::sleep(Duration::from_millis(2));
        let id2 = Id::now();

        assert!(id2 > id1);
    }

    #[test]
    fn test_ids_unique_in_burst() {
        let ids: HashSet<Id> = (0..10_000).map(|_| Id::now()).collect();
        assert_eq!(ids.len(), 10_000);
    }

    #[test]
    fn test_id_display_and_parse() {
        let id = Id::from_bytes([0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15]);
        let display = id.to_string();
        assert_eq!(display, "000102030405060708090a0b0c0d0e0f");
        assert_eq!(display.parse::<Id>().unwrap(), id);
    }

    #[test]
    fn test_id_parse_rejects_garbage() {
        assert!("abc".parse::<Id>().is_err());
        assert!("zz0102030405060708090a0b0c0d0e0f".parse::<Id>().is_err());
        // 32 bytes but not ASCII
        assert!("éééééééééééééééé".parse::<Id>().is_err());
        assert!("+1+1+1+1+1+1+1+1+1+1+1+1+1+1+1+1".parse::<Id>().is_err());
    }

    #[test]
    fn test_id_serde_as_hex() {
        let id = Id::from_bytes([0xab; 16]);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", "ab".repeat(16)));
        let back: Id = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
