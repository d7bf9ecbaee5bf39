use stowage_core::{
    digest::{content_digest, ContentId},
    store::BundleStore,
    StowageResult,
};
use tracing::debug;

use crate::InspectReport;

/// Resolves `ref_or_id` and reads the bundle behind it.
pub fn inspect_bundle(
    store: &dyn BundleStore,
    ref_or_id: &str,
) -> StowageResult<InspectReport> {
    let reference = store.look_up(ref_or_id)?;
    debug!(input = ref_or_id, reference = %reference, "resolved bundle");

    let bundle = store.read(&reference)?;
    let digest = content_digest(&bundle)?;
    let id = ContentId::for_entry(&reference, digest);

    Ok(InspectReport {
        reference,
        id,
        digest,
        bundle,
    })
}

#[cfg(test)]
mod tests {
    use stowage_core::{
        bundle::Bundle,
        error::{StoreError, StowageError},
        reference::Reference,
        store::MemoryBundleStore,
    };

    use super::*;

    #[test]
    fn test_inspect_by_reference_and_id() {
        let store = MemoryBundleStore::new();
        let reference: Reference = "foo/bar:1.0".parse().unwrap();
        let bundle = Bundle::new("Foo App")
            .with_version("1.0.0")
            .with_schema_version("1.0.0");
        store.store(&reference, &bundle).unwrap();

        let report = inspect_bundle(&store, "foo/bar:1.0").unwrap();
        assert_eq!(report.reference, reference);
        assert_eq!(report.bundle, bundle);
        assert_eq!(report.id.to_string(), "9aae408ee04f");
        assert!(report.digest.hex().starts_with("9aae408ee04f"));

        let by_id = inspect_bundle(&store, "9aae40").unwrap();
        assert_eq!(by_id.reference, reference);
    }

    #[test]
    fn test_inspect_missing() {
        let store = MemoryBundleStore::new();
        assert!(matches!(
            inspect_bundle(&store, "nothing:here"),
            Err(StowageError::Store(StoreError::NotFound(_)))
        ));
    }
}
