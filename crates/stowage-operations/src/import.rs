use std::path::Path;

use stowage_core::{
    bundle::Bundle,
    digest::{ensure_id_matches_content, ContentId},
    error::StowageError,
    reference::Reference,
    store::BundleStore,
    StowageResult,
};
use stowage_utils::fs::read_file;
use tracing::debug;

use crate::ImportReport;

/// Reads a bundle document from `path` and stores it under `reference`.
pub fn import_bundle(
    store: &dyn BundleStore,
    path: &Path,
    reference: &str,
) -> StowageResult<ImportReport> {
    let reference: Reference = reference.parse()?;
    let bytes = read_file(path)?;
    let bundle: Bundle = serde_json::from_slice(&bytes).map_err(|err| {
        StowageError::InvalidBundleFile {
            path: path.to_path_buf(),
            source: err,
        }
    })?;
    debug!(path = %path.display(), name = %bundle.name, "read bundle file");
    ensure_id_matches_content(&reference, &bundle)?;

    let digest = store.store(&reference, &bundle)?;
    let id = ContentId::for_entry(&reference, *digest.digest());

    Ok(ImportReport {
        path: path.to_path_buf(),
        reference,
        digest,
        id,
    })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use stowage_core::{error::StoreError, store::MemoryBundleStore};
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_import_bundle_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bundle.json");
        fs::write(
            &path,
            r#"{"schemaVersion":"1.0.0","name":"Foo App","version":"1.0.0"}"#,
        )
        .unwrap();

        let store = MemoryBundleStore::new();
        let report = import_bundle(&store, &path, "foo/bar:1.0").unwrap();
        assert_eq!(report.id.to_string(), "9aae408ee04f");
        assert_eq!(report.reference.to_string(), "foo/bar:1.0");
        assert_eq!(store.read(&report.reference).unwrap().name, "Foo App");
    }

    #[test]
    fn test_import_invalid_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bundle.json");
        fs::write(&path, "{ not json").unwrap();

        let store = MemoryBundleStore::new();
        assert!(matches!(
            import_bundle(&store, &path, "app:1"),
            Err(StowageError::InvalidBundleFile { .. })
        ));
        assert!(matches!(
            import_bundle(&store, &dir.path().join("missing.json"), "app:1"),
            Err(StowageError::FileSystemError(_))
        ));
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_import_under_bare_id() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bundle.json");
        fs::write(&path, r#"{"name":"Quiet App"}"#).unwrap();
        let own = "ad2828ea5653878fec36bf7b537b2addd8d6888c917f805daecdb481e174a6ae";

        let store = MemoryBundleStore::new();
        let report = import_bundle(&store, &path, own).unwrap();
        assert_eq!(report.id.to_string(), "ad2828ea5653");
        assert_eq!(report.digest.digest().hex(), own);

        let unrelated = "a855ac937f2ed375ba4396bbc49c4093e124da933acd2713fb9bc17d7562a087";
        assert!(matches!(
            import_bundle(&store, &path, unrelated),
            Err(StowageError::Store(StoreError::IdMismatch { .. }))
        ));
        assert_eq!(store.list().unwrap(), vec![report.reference]);
    }
}
