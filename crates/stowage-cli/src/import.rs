use nu_ansi_term::Color::Blue;
use stowage_core::StowageResult;
use stowage_operations::{import::import_bundle, StowageContext};
use stowage_utils::path::resolve_path;
use tracing::{debug, info};

use crate::utils::Colored;

pub fn import_bundle_cmd(ctx: &StowageContext, file: &str, reference: &str) -> StowageResult<()> {
    let path = resolve_path(file)?;
    let report = import_bundle(ctx.store(), &path, reference)?;
    debug!(id = %report.id, path = %report.path.display(), "imported bundle");
    info!("{}: {}", Colored(Blue, &report.reference), report.digest.digest());
    Ok(())
}
