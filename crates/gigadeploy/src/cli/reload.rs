//! Reload command - hot-reload one platform's library in the editor
//!
//! `gigadeploy reload linux` copies `target/release/libgigagen.so` to
//! `Plugins/_dev/libgigagen-<id>.so` and points the binding at it.

use crate::cli::output::print_receipt;
use anyhow::Result;
use gigadeploy::{id_source_for, DevReloader, Layout, ReloadOptions};
use tracing::info;

/// Arguments for the reload command
#[derive(Debug, clap::Args)]
pub struct ReloadArgs {
    /// Platform to reload: linux or windows
    pub platform: String,

    /// Use this id instead of drawing one
    #[arg(long)]
    pub reload_id: Option<u32>,

    /// Check sources and show what would be written
    #[arg(long)]
    pub dry_run: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(layout: &Layout, args: ReloadArgs) -> Result<()> {
    let mut ids = id_source_for(&layout.config().reload, &layout.counter_path());
    let options = ReloadOptions {
        reload_id: args.reload_id,
        dry_run: args.dry_run,
    };

    let receipt = DevReloader::new(layout).reload_selector(&args.platform, ids.as_mut(), &options)?;
    info!(
        platform = %args.platform,
        id = receipt.reload_id.as_deref().unwrap_or("-"),
        dry_run = receipt.dry_run,
        "dev reload finished"
    );
    print_receipt(&receipt, args.json)
}
