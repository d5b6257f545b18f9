//! CLI module for gigadeploy
//!
//! Resolves the filesystem layout from global options and dispatches to the
//! `release`, `reload` and `config` commands.

pub mod config;
pub mod error;
pub mod output;
pub mod release;
pub mod reload;

use crate::cli::error::HelpfulError;
use anyhow::{Context, Result};
use gigadeploy::{DeployConfig, Layout};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Resolve the native root, config and project root into a [`Layout`].
pub fn resolve_layout(
    native_root: &Path,
    project_root: Option<&Path>,
    config_path: Option<&Path>,
) -> Result<Layout> {
    if !native_root.is_dir() {
        return Err(HelpfulError::path_not_found(native_root).into());
    }
    let native_root = native_root
        .canonicalize()
        .with_context(|| format!("Failed to resolve {}", native_root.display()))?;

    let config = match config_path {
        Some(path) => {
            if !path.is_file() {
                return Err(HelpfulError::path_not_found(path)
                    .with_context("The --config file does not exist")
                    .into());
            }
            DeployConfig::load(path)?
        }
        None => DeployConfig::load_or_default(&native_root)?,
    };

    let layout = match project_root {
        Some(root) => Layout::new(native_root, absolutize(root)?, config),
        None => Layout::beside_native_root(native_root, config),
    };
    debug!(
        native_root = %layout.native_root().display(),
        project_root = %layout.project_root().display(),
        "resolved layout"
    );
    Ok(layout)
}

fn absolutize(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    Ok(cwd.join(path))
}
