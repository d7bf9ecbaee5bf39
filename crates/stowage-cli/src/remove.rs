use nu_ansi_term::Color::Red;
use stowage_core::StowageResult;
use stowage_operations::{remove::remove_bundles, StowageContext};
use tracing::info;

use crate::utils::Colored;

pub fn remove_bundles_cmd(ctx: &StowageContext, bundles: &[String]) -> StowageResult<()> {
    let report = remove_bundles(ctx.store(), bundles)?;
    for reference in &report.removed {
        info!("Deleted: {}", Colored(Red, reference));
    }
    Ok(())
}
