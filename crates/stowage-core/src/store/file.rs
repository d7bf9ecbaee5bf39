//! On-disk bundle store.
//!
//! ```text
//! <root>/
//!   .lock                      exclusive flock held by every operation
//!   index.json                 [{"reference": ..., "digest": "sha256:..."}] in insertion order
//!   bundles/sha256/<hex>.json  canonical bundle bytes, shared between references
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use stowage_utils::{
    fs::{atomic_write, ensure_dir_exists, read_file, safe_remove},
    hash::{verify_digest, Sha256Digest, SHA256_PREFIX},
    lock::FileLock,
};
use tracing::{debug, trace};

use super::{resolve_ref_or_id, BundleStore};
use crate::{
    bundle::Bundle,
    digest::{canonical_bytes, ContentId},
    error::{StoreError, StoreResult},
    reference::{DigestedReference, Reference},
};

const LOCK_FILE: &str = ".lock";
const INDEX_FILE: &str = "index.json";
const BLOBS_DIR: &str = "bundles";

#[derive(Serialize, Deserialize)]
struct IndexRecord {
    reference: Reference,
    digest: String,
}

struct IndexEntry {
    reference: Reference,
    digest: Sha256Digest,
}

/// A [`BundleStore`] persisted under a directory, safe to share between processes.
#[derive(Debug, Clone)]
pub struct FileBundleStore {
    root: PathBuf,
}

impl FileBundleStore {
    /// Opens the store rooted at `root`, creating the directory when missing.
    pub fn open<P: Into<PathBuf>>(root: P) -> StoreResult<Self> {
        let root = root.into();
        ensure_dir_exists(&root)?;
        debug!(root = %root.display(), "opened bundle store");
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn lock(&self) -> StoreResult<FileLock> {
        Ok(FileLock::acquire(self.root.join(LOCK_FILE))?)
    }

    fn index_path(&self) -> PathBuf {
        self.root.join(INDEX_FILE)
    }

    fn blob_path(&self, digest: &Sha256Digest) -> PathBuf {
        self.root
            .join(BLOBS_DIR)
            .join(SHA256_PREFIX)
            .join(format!("{}.json", digest.hex()))
    }

    fn load_index(&self) -> StoreResult<Vec<IndexEntry>> {
        let path = self.index_path();
        if !path.exists() {
            return Ok(Vec::new());
        }

        let bytes = read_file(&path)?;
        let records: Vec<IndexRecord> = serde_json::from_slice(&bytes).map_err(|err| {
            StoreError::Corrupted {
                path: path.clone(),
                reason: err.to_string(),
            }
        })?;

        records
            .into_iter()
            .map(|record| {
                let digest = record.digest.parse().map_err(|_| {
                    StoreError::Corrupted {
                        path: path.clone(),
                        reason: format!("invalid digest `{}`", record.digest),
                    }
                })?;
                Ok(IndexEntry {
                    reference: record.reference,
                    digest,
                })
            })
            .collect()
    }

    fn save_index(&self, entries: &[IndexEntry]) -> StoreResult<()> {
        let records: Vec<IndexRecord> = entries
            .iter()
            .map(|entry| {
                IndexRecord {
                    reference: entry.reference.clone(),
                    digest: entry.digest.to_string(),
                }
            })
            .collect();
        let bytes = serde_json::to_vec_pretty(&records)?;
        atomic_write(self.index_path(), &bytes)?;
        Ok(())
    }

    fn read_blob(&self, digest: &Sha256Digest) -> StoreResult<Bundle> {
        let path = self.blob_path(digest);
        if !path.exists() {
            return Err(StoreError::Corrupted {
                path,
                reason: "bundle blob is missing".to_string(),
            });
        }

        let bytes = read_file(&path)?;
        if !verify_digest(&bytes, digest) {
            return Err(StoreError::Corrupted {
                path,
                reason: format!("content does not match {digest}"),
            });
        }

        serde_json::from_slice(&bytes).map_err(|err| {
            StoreError::Corrupted {
                path,
                reason: err.to_string(),
            }
        })
    }

    /// Deletes the blob for `digest` unless an index entry still points at it.
    fn collect_blob(&self, entries: &[IndexEntry], digest: &Sha256Digest) -> StoreResult<()> {
        if entries.iter().any(|entry| entry.digest == *digest) {
            return Ok(());
        }
        trace!(digest = %digest, "removing unreferenced bundle blob");
        safe_remove(self.blob_path(digest))?;
        Ok(())
    }
}

impl BundleStore for FileBundleStore {
    fn store(&self, reference: &Reference, bundle: &Bundle) -> StoreResult<DigestedReference> {
        let bytes = canonical_bytes(bundle)?;
        let digest = Sha256Digest::of(&bytes);

        let _lock = self.lock()?;
        let mut entries = self.load_index()?;

        let blob_path = self.blob_path(&digest);
        if !blob_path.exists() {
            atomic_write(&blob_path, &bytes)?;
        }

        let replaced = match entries.iter_mut().find(|e| e.reference == *reference) {
            Some(entry) => Some(std::mem::replace(&mut entry.digest, digest)),
            None => {
                entries.push(IndexEntry {
                    reference: reference.clone(),
                    digest,
                });
                None
            }
        };
        self.save_index(&entries)?;

        if let Some(old) = replaced {
            self.collect_blob(&entries, &old)?;
        }
        debug!(reference = %reference, digest = %digest, "stored bundle");

        Ok(DigestedReference::from_digest(digest))
    }

    fn read(&self, reference: &Reference) -> StoreResult<Bundle> {
        let _lock = self.lock()?;
        let entries = self.load_index()?;
        let entry = entries
            .iter()
            .find(|e| e.reference == *reference)
            .ok_or_else(|| StoreError::NotFound(reference.to_string()))?;
        self.read_blob(&entry.digest)
    }

    fn list(&self) -> StoreResult<Vec<Reference>> {
        let _lock = self.lock()?;
        Ok(self
            .load_index()?
            .into_iter()
            .map(|entry| entry.reference)
            .collect())
    }

    fn remove(&self, reference: &Reference) -> StoreResult<()> {
        let _lock = self.lock()?;
        let mut entries = self.load_index()?;

        let Some(position) = entries.iter().position(|e| e.reference == *reference) else {
            trace!(reference = %reference, "nothing to remove");
            return Ok(());
        };
        let removed = entries.remove(position);
        self.save_index(&entries)?;
        self.collect_blob(&entries, &removed.digest)?;
        debug!(reference = %reference, "removed bundle");

        Ok(())
    }

    fn look_up(&self, ref_or_id: &str) -> StoreResult<Reference> {
        let _lock = self.lock()?;
        let ids: Vec<(Reference, ContentId)> = self
            .load_index()?
            .into_iter()
            .map(|entry| {
                let id = ContentId::for_entry(&entry.reference, entry.digest);
                (entry.reference, id)
            })
            .collect();
        resolve_ref_or_id(ref_or_id, &ids)
    }
}
