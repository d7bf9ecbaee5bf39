//! Canonical bundle serialization and content IDs.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};
use stowage_utils::hash::Sha256Digest;

use crate::{
    bundle::Bundle,
    error::{StoreError, StoreResult},
    reference::Reference,
};

/// Number of hex characters in a [`ContentId`].
pub const CONTENT_ID_LEN: usize = 12;

/// Serializes `value` as compact JSON with object keys sorted at every level.
pub fn canonical_bytes<T: Serialize>(value: &T) -> StoreResult<Vec<u8>> {
    let value = sort_json_value(serde_json::to_value(value)?);
    Ok(serde_json::to_vec(&value)?)
}

fn sort_json_value(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            let mut sorted = Map::new();
            for (key, value) in entries {
                sorted.insert(key, sort_json_value(value));
            }
            Value::Object(sorted)
        }
        Value::Array(values) => Value::Array(values.into_iter().map(sort_json_value).collect()),
        other => other,
    }
}

/// SHA-256 digest of the bundle's canonical serialization.
pub fn content_digest(bundle: &Bundle) -> StoreResult<Sha256Digest> {
    Ok(Sha256Digest::of(&canonical_bytes(bundle)?))
}

/// Rejects a bare ID `reference` that is not the content digest of `bundle`.
pub fn ensure_id_matches_content(reference: &Reference, bundle: &Bundle) -> StoreResult<()> {
    if !reference.is_bare_id() {
        return Ok(());
    }

    let id = ContentId::of(reference, bundle)?;
    let content = content_digest(bundle)?;
    if *id.digest() != content {
        return Err(StoreError::IdMismatch {
            reference: reference.to_string(),
            content,
        });
    }
    Ok(())
}

/// Short identifier of a stored entry, displayed as the first 12 hex characters
/// of the digest it was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentId(Sha256Digest);

impl ContentId {
    /// ID of an entry stored under `reference` whose content hashes to `content`.
    ///
    /// A bare ID reference is identified by its own digest rather than its content.
    pub fn for_entry(reference: &Reference, content: Sha256Digest) -> Self {
        match reference.digest() {
            Some(digest) if reference.is_bare_id() => Self(*digest),
            _ => Self(content),
        }
    }

    /// ID of `bundle` stored under `reference`, hashing the bundle when needed.
    pub fn of(reference: &Reference, bundle: &Bundle) -> StoreResult<Self> {
        match reference.digest() {
            Some(digest) if reference.is_bare_id() => Ok(Self(*digest)),
            _ => Ok(Self(content_digest(bundle)?)),
        }
    }

    /// Full digest this ID abbreviates.
    pub fn digest(&self) -> &Sha256Digest {
        &self.0
    }

    /// Whether `prefix` is a prefix of the full digest hex.
    pub fn matches_prefix(&self, prefix: &str) -> bool {
        self.0.hex().starts_with(prefix)
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.short_hex(CONTENT_ID_LEN))
    }
}
