use stowage_core::{store::BundleStore, StowageResult};
use tracing::debug;

use crate::RemoveReport;

/// Removes each reference or ID in order, stopping at the first that fails to resolve.
pub fn remove_bundles(
    store: &dyn BundleStore,
    refs_or_ids: &[String],
) -> StowageResult<RemoveReport> {
    debug!(count = refs_or_ids.len(), "removing bundles");
    let mut report = RemoveReport::default();

    for ref_or_id in refs_or_ids {
        let reference = store.look_up(ref_or_id)?;
        store.remove(&reference)?;
        debug!(reference = %reference, "removed bundle");
        report.removed.push(reference);
    }

    Ok(report)
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
    fn test_remove_by_reference_and_id() {
        let store = MemoryBundleStore::new();
        let one: Reference = "one:1".parse().unwrap();
        let two: Reference = "two:1".parse().unwrap();
        store.store(&one, &Bundle::new("One")).unwrap();
        let digest = store.store(&two, &Bundle::new("Two")).unwrap();

        let report = remove_bundles(
            &store,
            &["one:1".to_string(), digest.digest().short_hex(12)],
        )
        .unwrap();
        assert_eq!(report.removed, vec![one, two]);
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_remove_stops_at_first_error() {
        let store = MemoryBundleStore::new();
        let keep: Reference = "keep:1".parse().unwrap();
        store.store(&keep, &Bundle::new("Keep")).unwrap();

        let result = remove_bundles(&store, &["missing:1".to_string(), "keep:1".to_string()]);
        assert!(matches!(
            result,
            Err(StowageError::Store(StoreError::NotFound(_)))
        ));
        assert_eq!(store.list().unwrap(), vec![keep]);
    }
}
