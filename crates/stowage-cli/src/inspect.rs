use nu_ansi_term::Color::{Blue, Cyan, Green, Magenta};
use stowage_core::{error::StoreError, StowageResult};
use stowage_operations::{inspect::inspect_bundle, InspectReport, StowageContext};
use tabled::{
    builder::Builder,
    settings::{peaker::PriorityMax, themes::BorderCorrection, Panel, Style, Width},
};
use tracing::info;

use crate::utils::{term_width, Colored};

pub fn inspect_bundle_cmd(ctx: &StowageContext, bundle: &str, pretty: bool) -> StowageResult<()> {
    let report = inspect_bundle(ctx.store(), bundle)?;

    if pretty {
        info!("\n{}", summary_table(&report));
    } else {
        let json = serde_json::to_string_pretty(&report.bundle).map_err(StoreError::Serialize)?;
        println!("{json}");
    }

    Ok(())
}

fn summary_table(report: &InspectReport) -> String {
    let bundle = &report.bundle;
    let mut builder = Builder::new();

    builder.push_record(["Reference".to_string(), Colored(Blue, &report.reference).to_string()]);
    builder.push_record(["ID".to_string(), Colored(Cyan, report.id).to_string()]);
    builder.push_record(["Digest".to_string(), report.digest.to_string()]);
    builder.push_record(["Name".to_string(), Colored(Green, &bundle.name).to_string()]);
    builder.push_record(["Version".to_string(), Colored(Magenta, &bundle.version).to_string()]);
    builder.push_record(["Schema Version".to_string(), bundle.schema_version.clone()]);

    if !bundle.description.is_empty() {
        builder.push_record(["Description".to_string(), bundle.description.clone()]);
    }
    if !bundle.maintainers.is_empty() {
        let maintainers = bundle
            .maintainers
            .iter()
            .map(|m| {
                if m.email.is_empty() {
                    m.name.clone()
                } else {
                    format!("{} <{}>", m.name, m.email)
                }
            })
            .collect::<Vec<_>>()
            .join(", ");
        builder.push_record(["Maintainers".to_string(), maintainers]);
    }
    if let Some(images) = &bundle.invocation_images {
        let images = images
            .iter()
            .map(|image| image.base.image.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        builder.push_record(["Invocation Images".to_string(), images]);
    }
    if !bundle.actions.is_empty() {
        let actions = bundle.actions.keys().cloned().collect::<Vec<_>>().join(", ");
        builder.push_record(["Actions".to_string(), actions]);
    }
    if !bundle.parameters.is_empty() {
        builder.push_record(["Parameters".to_string(), bundle.parameters.len().to_string()]);
    }
    if !bundle.credentials.is_empty() {
        builder.push_record(["Credentials".to_string(), bundle.credentials.len().to_string()]);
    }

    builder
        .build()
        .with(Panel::header("Bundle"))
        .with(Style::rounded())
        .with(BorderCorrection {})
        .with(Width::wrap(term_width()).priority(PriorityMax::default()))
        .to_string()
}
