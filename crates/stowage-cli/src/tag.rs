use nu_ansi_term::Color::{Blue, Cyan};
use stowage_core::StowageResult;
use stowage_operations::{tag::tag_bundle, StowageContext};
use tracing::info;

use crate::utils::Colored;

pub fn tag_bundle_cmd(ctx: &StowageContext, source: &str, target: &str) -> StowageResult<()> {
    let report = tag_bundle(ctx.store(), source, target)?;
    info!(
        "Tagged {} as {}",
        Colored(Cyan, &report.source),
        Colored(Blue, &report.target)
    );
    Ok(())
}
