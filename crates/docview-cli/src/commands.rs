use anyhow::{Context, Result};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{ContentArrangement, Table};
use tracing::{debug, info};

use docview_cli::replay::{Script, replay};
use docview_nav::{
    HttpVersionSource, NavTuple, StaticVersionSource, VersionRecord, VersionResolver,
    VersionSource, ViewerSettings, decode_address_with_page, encode_address, select,
};

use crate::cli::{Cli, EncodeArgs, ReplayArgs, ReplayFormatArg};

/// Where version lists come from.
pub enum CliSource {
    File(StaticVersionSource),
    Http(HttpVersionSource),
}

impl VersionSource for CliSource {
    async fn list_versions(&self, project: &str) -> docview_nav::Result<Vec<VersionRecord>> {
        match self {
            Self::File(source) => source.list_versions(project).await,
            Self::Http(source) => source.list_versions(project).await,
        }
    }
}

/// Settings from `--config` (or defaults) with URL flags applied on top.
pub fn load_settings(cli: &Cli) -> Result<ViewerSettings> {
    let mut settings = match &cli.config {
        Some(path) => ViewerSettings::load(path)
            .with_context(|| format!("load settings from {}", path.display()))?,
        None => ViewerSettings::default(),
    };
    if let Some(url) = &cli.api_url {
        settings = settings.with_api_base_url(url.clone());
    }
    if let Some(url) = &cli.docs_url {
        settings = settings.with_docs_base_url(url.clone());
    }
    debug!(?settings, "Settings loaded");
    Ok(settings)
}

pub fn build_source(cli: &Cli, settings: &ViewerSettings) -> Result<CliSource> {
    match &cli.versions_file {
        Some(path) => {
            let source = StaticVersionSource::load(path)
                .with_context(|| format!("load versions from {}", path.display()))?;
            info!("Using version lists from {}", path.display());
            Ok(CliSource::File(source))
        }
        None => {
            let source = HttpVersionSource::new(settings).context("build version client")?;
            info!("Using version service at {}", settings.api_base_url);
            Ok(CliSource::Http(source))
        }
    }
}

pub async fn run_versions(source: CliSource, project: &str) -> Result<()> {
    let resolver = VersionResolver::new(source);
    let versions = resolver
        .fetch(project)
        .await
        .with_context(|| format!("list versions of {project}"))?;
    let latest = versions.latest();

    let mut table = Table::new();
    table.set_header(vec!["Version", "Tags", "Latest"]);
    apply_table_style(&mut table);
    // Newest first
    for record in versions.records().iter().rev() {
        let tags = record.tags.iter().cloned().collect::<Vec<_>>().join(", ");
        let mark = if record.name == latest.name { "*" } else { "" };
        table.add_row(vec![record.name.clone(), tags, mark.to_string()]);
    }
    println!("{table}");
    Ok(())
}

/// Print the concrete version `version` resolves to.
///
/// Returns false when the version does not exist.
pub async fn run_resolve(source: CliSource, project: &str, version: &str) -> Result<bool> {
    let resolver = VersionResolver::new(source);
    let versions = match resolver.fetch(project).await {
        Ok(versions) => versions,
        Err(err) if err.is_not_found() => {
            eprintln!("not found: {err}");
            return Ok(false);
        }
        Err(err) => return Err(err).context("fetch versions"),
    };
    match select(project, &versions, version) {
        Ok(resolution) => match resolution.record() {
            Some(record) => {
                println!("{}", record.name);
                Ok(true)
            }
            None => {
                eprintln!("not found: no versions available yet for {project}");
                Ok(false)
            }
        },
        Err(err) => {
            eprintln!("not found: {err}");
            Ok(false)
        }
    }
}

pub fn run_encode(args: &EncodeArgs, settings: &ViewerSettings) {
    let page = args
        .page
        .clone()
        .unwrap_or_else(|| settings.default_page.clone());
    let tuple = NavTuple::new(args.project.as_str(), args.version.as_str())
        .with_page(page)
        .with_hash(args.hash.as_str())
        .with_hide_ui(args.hide_ui);
    println!("{}", encode_address(&tuple));
}

pub fn run_decode(address: &str, settings: &ViewerSettings) -> Result<()> {
    let tuple = decode_address_with_page(address, &settings.default_page)
        .with_context(|| format!("decode {address}"))?;
    let mut table = Table::new();
    table.set_header(vec!["Field", "Value"]);
    apply_table_style(&mut table);
    table.add_row(vec!["project".to_string(), tuple.project]);
    table.add_row(vec!["version".to_string(), tuple.version]);
    table.add_row(vec!["page".to_string(), tuple.page]);
    table.add_row(vec!["hash".to_string(), tuple.hash]);
    table.add_row(vec!["hide-ui".to_string(), tuple.hide_ui.to_string()]);
    println!("{table}");
    Ok(())
}

pub async fn run_replay(
    args: &ReplayArgs,
    settings: ViewerSettings,
    source: CliSource,
) -> Result<()> {
    let script = Script::load(&args.script)?;
    let trace = replay(settings, source, script).await?;
    match args.format {
        ReplayFormatArg::Text => println!("{}", trace.to_text()),
        ReplayFormatArg::Json => println!("{}", trace.to_json_lines()?),
    }
    Ok(())
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}
