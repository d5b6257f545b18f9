//! Release command - publish both desktop libraries and the binding
//!
//! Takes no positional arguments: every path comes from the layout.

use crate::cli::output::print_receipt;
use anyhow::Result;
use gigadeploy::{Layout, PublishOptions, ReleasePublisher};
use tracing::info;

/// Arguments for the release command
#[derive(Debug, clap::Args)]
pub struct ReleaseArgs {
    /// Check sources and show what would be written
    #[arg(long)]
    pub dry_run: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(layout: &Layout, args: ReleaseArgs) -> Result<()> {
    let options = PublishOptions {
        dry_run: args.dry_run,
    };
    let receipt = ReleasePublisher::new(layout).publish(&options)?;
    info!(
        files = receipt.files.len(),
        dry_run = receipt.dry_run,
        "release publish finished"
    );
    print_receipt(&receipt, args.json)
}
