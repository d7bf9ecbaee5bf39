use std::io::Write;

use stowage_core::{error::ErrorContext, StowageResult};
use stowage_operations::{list::write_bundle_list, ListOptions, StowageContext};

pub fn list_bundles(ctx: &StowageContext, quiet: bool, digests: bool) -> StowageResult<()> {
    let options = ListOptions { quiet, digests };
    let mut stdout = std::io::stdout().lock();
    write_bundle_list(ctx.store(), &options, &mut stdout)?;
    stdout
        .flush()
        .with_context(|| "flushing stdout stream".to_string())
}
