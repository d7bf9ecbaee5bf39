use clap::Parser;
use cli::{Args, Commands};
use import::import_bundle_cmd;
use inspect::inspect_bundle_cmd;
use list::list_bundles;
use logging::setup_logging;
use remove::remove_bundles_cmd;
use stowage_config::config::{generate_default_config, set_config_path, Config};
use stowage_core::StowageResult;
use stowage_operations::StowageContext;
use stowage_utils::path::resolve_path;
use tag::tag_bundle_cmd;
use tracing::{debug, info};
use utils::set_color;

mod cli;
mod import;
mod inspect;
mod list;
mod logging;
mod remove;
mod tag;
mod utils;

fn handle_cli() -> StowageResult<()> {
    let args = Args::parse();

    setup_logging(&args);

    if args.no_color {
        set_color(false);
    }

    if let Some(ref c) = args.config {
        set_config_path(resolve_path(c)?);
    }

    match args.command {
        Commands::DefConfig => {
            generate_default_config()?;
        }
        command => {
            let config = Config::new()?;
            if !config.colors() {
                set_color(false);
            }

            if let Commands::Config = command {
                info!("{}", config.to_toml()?.trim_end());
                return Ok(());
            }

            let ctx = StowageContext::new(&config)?;
            debug!(command = command_name(&command), "running command");

            match command {
                Commands::List {
                    quiet,
                    digests,
                } => list_bundles(&ctx, quiet, digests)?,
                Commands::Inspect {
                    bundle,
                    pretty,
                } => inspect_bundle_cmd(&ctx, &bundle, pretty)?,
                Commands::Remove {
                    bundles,
                } => remove_bundles_cmd(&ctx, &bundles)?,
                Commands::Tag {
                    source,
                    target,
                } => tag_bundle_cmd(&ctx, &source, &target)?,
                Commands::Import {
                    file,
                    reference,
                } => import_bundle_cmd(&ctx, &file, &reference)?,
                Commands::Config | Commands::DefConfig => unreachable!(),
            }
        }
    }

    Ok(())
}

fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Config => "config",
        Commands::DefConfig => "defconfig",
        Commands::List { .. } => "ls",
        Commands::Inspect { .. } => "inspect",
        Commands::Remove { .. } => "rm",
        Commands::Tag { .. } => "tag",
        Commands::Import { .. } => "import",
    }
}

fn main() {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .build(),
        )
    }))
    .ok();

    if let Err(err) = handle_cli() {
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(1);
    }
}
