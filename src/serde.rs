//! # Serde module for HyperLogLog
//!
//! `HyperLogLog` is serialized through its binary encoding, so a serde payload carries exactly
//! the bytes returned by `HyperLogLog::serialize`: explicit layout while small, dense layout
//! afterwards. Deserialization goes through `HyperLogLog::unserialize` and reports its
//! validation errors as custom serde errors.
//!
//! Refer to the serde documentation for more details on custom serialization and deserialization:
//! - [Serialization](https://serde.rs/impl-serialize.html)
//! - [Deserialization](https://serde.rs/impl-deserialize.html)
use serde::de::Error;
use serde::{Deserialize, Serialize};

use crate::estimator::HyperLogLog;
use crate::hash::ObservationHasher;

impl<H: ObservationHasher> Serialize for HyperLogLog<H> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_bytes(&HyperLogLog::serialize(self))
    }
}

impl<'de, H: ObservationHasher> Deserialize<'de> for HyperLogLog<H> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bytes: Vec<u8> = Deserialize::deserialize(deserializer)?;
        HyperLogLog::unserialize(&bytes).map_err(Error::custom)
    }
}
