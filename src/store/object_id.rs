//! Twelve-byte record identifiers.
//!
//! Layout: 4-byte big-endian seconds since the Unix epoch, 5 bytes of
//! per-process randomness, 3-byte big-endian counter. Ids generated by one
//! process therefore sort roughly by creation time.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Number of raw bytes in an [`ObjectId`].
pub const OBJECT_ID_LEN: usize = 12;

const COUNTER_MASK: u32 = 0x00ff_ffff;

static PROCESS_UNIQUE: OnceLock<[u8; 5]> = OnceLock::new();
static COUNTER: OnceLock<AtomicU32> = OnceLock::new();

/// A globally unique movie identifier, rendered as 24 lowercase hex digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId([u8; OBJECT_ID_LEN]);

/// Error returned when a string is not a well-formed [`ObjectId`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("'{input}' is not a valid id: expected {len} hex characters", len = OBJECT_ID_LEN * 2)]
pub struct ParseObjectIdError {
    input: String,
}

impl ParseObjectIdError {
    /// The rejected input.
    pub fn input(&self) -> &str {
        &self.input
    }
}

impl ObjectId {
    /// Generate a new id.
    pub fn new() -> Self {
        let seconds = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| id_seconds(d.as_secs()))
            .unwrap_or_default();
        let process = PROCESS_UNIQUE.get_or_init(rand::random::<[u8; 5]>);
        let counter = COUNTER
            .get_or_init(|| AtomicU32::new(rand::random::<u32>() & COUNTER_MASK))
            .fetch_add(1, Ordering::Relaxed)
            & COUNTER_MASK;

        let mut bytes = [0u8; OBJECT_ID_LEN];
        let (time_part, rest) = bytes.split_at_mut(4);
        let (process_part, counter_part) = rest.split_at_mut(5);
        time_part.copy_from_slice(&seconds.to_be_bytes());
        process_part.copy_from_slice(process);
        if let Some(low) = counter.to_be_bytes().get(1..) {
            counter_part.copy_from_slice(low);
        }
        Self(bytes)
    }

    /// Build an id from raw bytes.
    pub const fn from_bytes(bytes: [u8; OBJECT_ID_LEN]) -> Self {
        Self(bytes)
    }

    /// Seconds since the Unix epoch at which this id was generated.
    pub fn timestamp(&self) -> u32 {
        let [a, b, c, d, ..] = self.0;
        u32::from_be_bytes([a, b, c, d])
    }

    /// Parse a 24 character hex string.
    pub fn parse_str(s: &str) -> Result<Self, ParseObjectIdError> {
        let mut bytes = [0u8; OBJECT_ID_LEN];
        hex::decode_to_slice(s, &mut bytes).map_err(|_| ParseObjectIdError {
            input: s.to_string(),
        })?;
        Ok(Self(bytes))
    }

    /// Lowercase hex representation.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

/// The timestamp field saturates rather than wrapping past 2106.
fn id_seconds(secs: u64) -> u32 {
    u32::try_from(secs).unwrap_or(u32::MAX)
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for ObjectId {
    type Err = ParseObjectIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl Serialize for ObjectId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ObjectId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ObjectIdVisitor;

        impl Visitor<'_> for ObjectIdVisitor {
            type Value = ObjectId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "a {} character hex string", OBJECT_ID_LEN * 2)
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<ObjectId, E> {
                ObjectId::parse_str(v).map_err(E::custom)
            }
        }

        deserializer.deserialize_str(ObjectIdVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generated_ids_are_unique() {
        let ids: HashSet<ObjectId> = (0..1000).map(|_| ObjectId::new()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_generated_id_carries_current_time() {
        let before = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| id_seconds(d.as_secs()))
            .unwrap_or_default();
        let id = ObjectId::new();
        assert!(id.timestamp() >= before);
        assert!(id.timestamp() <= before + 2);
    }

    #[test]
    fn test_timestamp_saturates() {
        assert_eq!(id_seconds(1_700_000_000), 1_700_000_000);
        assert_eq!(id_seconds(u64::from(u32::MAX) + 1), u32::MAX);
    }

    #[test]
    fn test_parse_accepts_mixed_case() {
        let id = ObjectId::parse_str("5F9B3C2A1D4E6F7A8B9C0D1E").unwrap();
        assert_eq!(id.to_hex(), "5f9b3c2a1d4e6f7a8b9c0d1e");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for input in ["", "not-an-id", "5f9b3c2a1d4e6f7a8b9c0d1", "5f9b3c2a1d4e6f7a8b9c0d1e00", "zz9b3c2a1d4e6f7a8b9c0d1e"] {
            let err = ObjectId::parse_str(input).unwrap_err();
            assert_eq!(err.input(), input);
        }
    }

    #[test]
    fn test_json_representation_is_hex_string() {
        let id = ObjectId::from_bytes([0xab; OBJECT_ID_LEN]);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"abababababababababababab\"");
        let back: ObjectId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
        assert!(serde_json::from_str::<ObjectId>("42").is_err());
    }
}
