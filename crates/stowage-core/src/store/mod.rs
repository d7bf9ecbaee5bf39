//! Reference-keyed bundle storage.

use stowage_utils::hash::{is_lower_hex, SHA256_HEX_LEN};
use tracing::trace;

use crate::{
    bundle::Bundle,
    digest::ContentId,
    error::{StoreError, StoreResult},
    reference::{DigestedReference, Reference},
};

pub mod file;
pub mod memory;

pub use file::FileBundleStore;
pub use memory::MemoryBundleStore;

/// Persists bundles keyed by reference.
///
/// Implementations keep references in first-insertion order and serialize
/// every operation against the others.
pub trait BundleStore: Send + Sync {
    /// Stores `bundle` under `reference`, replacing any bundle already stored
    /// there. Returns the bare ID reference of the bundle's content digest.
    fn store(&self, reference: &Reference, bundle: &Bundle) -> StoreResult<DigestedReference>;

    /// Reads the bundle stored under exactly `reference`.
    fn read(&self, reference: &Reference) -> StoreResult<Bundle>;

    /// All stored references in insertion order.
    fn list(&self) -> StoreResult<Vec<Reference>>;

    /// Removes `reference`. Removing a reference that is not stored is a no-op.
    fn remove(&self, reference: &Reference) -> StoreResult<()>;

    /// Resolves a reference string or a content ID prefix to a stored reference.
    fn look_up(&self, ref_or_id: &str) -> StoreResult<Reference>;
}

/// Resolves `ref_or_id` against stored `(reference, id)` entries.
///
/// A string naming a stored reference resolves to it. Otherwise a lowercase hex
/// string is matched as a prefix of the entry IDs.
pub(crate) fn resolve_ref_or_id(
    ref_or_id: &str,
    entries: &[(Reference, ContentId)],
) -> StoreResult<Reference> {
    let input = ref_or_id.trim();

    let parsed = input.parse::<Reference>();
    if let Ok(reference) = &parsed {
        if entries.iter().any(|(stored, _)| stored == reference) {
            return Ok(reference.clone());
        }
    }

    if !input.is_empty() && input.len() <= SHA256_HEX_LEN && is_lower_hex(input) {
        let matches: Vec<&Reference> = entries
            .iter()
            .filter(|(_, id)| id.matches_prefix(input))
            .map(|(reference, _)| reference)
            .collect();
        trace!(prefix = input, matches = matches.len(), "matched ID prefix");

        match matches.as_slice() {
            [reference] => return Ok((*reference).clone()),
            [] => {}
            _ => {
                return Err(StoreError::Ambiguous {
                    prefix: input.to_string(),
                    matches: matches.len(),
                })
            }
        }
    }

    let reference = parsed?;
    Err(StoreError::NotFound(reference.to_string()))
}
