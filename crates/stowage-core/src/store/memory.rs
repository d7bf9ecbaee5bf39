use std::sync::Mutex;

use stowage_utils::hash::Sha256Digest;
use tracing::debug;

use super::{resolve_ref_or_id, BundleStore};
use crate::{
    bundle::Bundle,
    digest::{content_digest, ContentId},
    error::{StoreError, StoreResult},
    reference::{DigestedReference, Reference},
};

struct Entry {
    reference: Reference,
    bundle: Bundle,
    digest: Sha256Digest,
}

/// A process-local store, mostly useful for tests and one-shot tools.
#[derive(Default)]
pub struct MemoryBundleStore {
    entries: Mutex<Vec<Entry>>,
}

impl MemoryBundleStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BundleStore for MemoryBundleStore {
    fn store(&self, reference: &Reference, bundle: &Bundle) -> StoreResult<DigestedReference> {
        let digest = content_digest(bundle)?;
        let mut entries = self.entries.lock()?;

        match entries.iter_mut().find(|e| e.reference == *reference) {
            Some(entry) => {
                entry.bundle = bundle.clone();
                entry.digest = digest;
            }
            None => {
                entries.push(Entry {
                    reference: reference.clone(),
                    bundle: bundle.clone(),
                    digest,
                })
            }
        }
        debug!(reference = %reference, digest = %digest, "stored bundle");

        Ok(DigestedReference::from_digest(digest))
    }

    fn read(&self, reference: &Reference) -> StoreResult<Bundle> {
        let entries = self.entries.lock()?;
        entries
            .iter()
            .find(|e| e.reference == *reference)
            .map(|e| e.bundle.clone())
            .ok_or_else(|| StoreError::NotFound(reference.to_string()))
    }

    fn list(&self) -> StoreResult<Vec<Reference>> {
        let entries = self.entries.lock()?;
        Ok(entries.iter().map(|e| e.reference.clone()).collect())
    }

    fn remove(&self, reference: &Reference) -> StoreResult<()> {
        let mut entries = self.entries.lock()?;
        entries.retain(|e| e.reference != *reference);
        Ok(())
    }

    fn look_up(&self, ref_or_id: &str) -> StoreResult<Reference> {
        let entries = self.entries.lock()?;
        let ids: Vec<(Reference, ContentId)> = entries
            .iter()
            .map(|e| {
                (
                    e.reference.clone(),
                    ContentId::for_entry(&e.reference, e.digest),
                )
            })
            .collect();
        resolve_ref_or_id(ref_or_id, &ids)
    }
}
