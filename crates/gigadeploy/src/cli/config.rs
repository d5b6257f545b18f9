//! Config command - show the resolved layout and naming

use crate::cli::output::print_table;
use anyhow::Result;
use gigadeploy::{CounterIdSource, DeployConfig, IdStrategy, Layout, Platform};
use serde::Serialize;
use std::path::PathBuf;

/// Arguments for the config command
#[derive(Debug, clap::Args)]
pub struct ConfigArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct ResolvedPath {
    name: String,
    path: PathBuf,
    exists: bool,
}

#[derive(Debug, Serialize)]
struct ConfigReport<'a> {
    native_root: &'a std::path::Path,
    project_root: &'a std::path::Path,
    #[serde(skip_serializing_if = "Option::is_none")]
    native_root_warning: Option<String>,
    config: &'a DeployConfig,
    library_reference: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    next_counter: Option<u32>,
    paths: Vec<ResolvedPath>,
}

/// `--native-root` defaults to the working directory; flag one that is not
/// the native crate.
fn native_root_warning(layout: &Layout) -> Option<String> {
    if layout.native_root().join("Cargo.toml").is_file() {
        return None;
    }
    Some(format!(
        "{} has no Cargo.toml; run from the native crate or pass --native-root <DIR> \
         (or set GIGADEPLOY_NATIVE_ROOT)",
        layout.native_root().display()
    ))
}

fn resolved_paths(layout: &Layout) -> Vec<ResolvedPath> {
    let mut entries = Vec::new();
    for platform in Platform::ALL {
        entries.push((
            format!("release {} library", platform),
            layout.release_library_src(platform),
        ));
    }
    for platform in Platform::ALL {
        entries.push((
            format!("dev {} library", platform),
            layout.dev_library_src(platform),
        ));
    }
    entries.push(("binding".to_string(), layout.binding_src()));
    entries.push(("plugins dir".to_string(), layout.plugins_dir()));
    entries.push(("binding destination".to_string(), layout.binding_dst()));
    entries.push(("state dir".to_string(), layout.state_dir()));

    entries
        .into_iter()
        .map(|(name, path)| ResolvedPath {
            exists: path.exists(),
            name,
            path,
        })
        .collect()
}

pub fn run(layout: &Layout, args: ConfigArgs) -> Result<()> {
    let config = layout.config();
    let next_counter = match config.reload.strategy {
        IdStrategy::Counter => {
            CounterIdSource::new(layout.counter_path(), config.reload.clone()).stored()?
        }
        IdStrategy::Random => None,
    };

    let report = ConfigReport {
        native_root: layout.native_root(),
        project_root: layout.project_root(),
        native_root_warning: native_root_warning(layout),
        config,
        library_reference: config.library_reference(),
        next_counter,
        paths: resolved_paths(layout),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "Native root:  {} (--native-root, GIGADEPLOY_NATIVE_ROOT, or the current directory)",
        report.native_root.display()
    );
    if let Some(warning) = &report.native_root_warning {
        println!("Warning:      {}", warning);
    }
    println!("Project root: {}", report.project_root.display());
    println!("Binding ref:  {}", report.library_reference);
    match report.next_counter {
        Some(value) => println!(
            "Reload ids:   {} (next {:0width$})",
            config.reload.strategy.as_str(),
            value,
            width = config.reload.width
        ),
        None => println!("Reload ids:   {}", config.reload.strategy.as_str()),
    }
    println!();

    let rows = report
        .paths
        .iter()
        .map(|p| {
            vec![
                p.name.clone(),
                p.path.display().to_string(),
                if p.exists { "yes" } else { "no" }.to_string(),
            ]
        })
        .collect();
    print_table(&["Item", "Path", "Exists"], rows);
    Ok(())
}
