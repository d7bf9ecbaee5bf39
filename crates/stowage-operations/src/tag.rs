use stowage_core::{
    digest::ensure_id_matches_content,
    reference::Reference,
    store::BundleStore,
    StowageResult,
};
use tracing::debug;

use crate::TagReport;

/// Stores the bundle behind `source` under the `target` reference as well.
pub fn tag_bundle(
    store: &dyn BundleStore,
    source: &str,
    target: &str,
) -> StowageResult<TagReport> {
    let target: Reference = target.parse()?;
    let source = store.look_up(source)?;
    let bundle = store.read(&source)?;
    ensure_id_matches_content(&target, &bundle)?;
    let digest = store.store(&target, &bundle)?;
    debug!(source = %source, target = %target, digest = %digest.digest(), "tagged bundle");

    Ok(TagReport {
        source,
        target,
        digest,
    })
}
