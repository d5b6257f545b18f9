//! Staged replacement of the plugin tree.
//!
//! A new tree is assembled in a hidden sibling of the live directory and
//! swapped in with renames, so the live tree is either the previous publish or
//! the new one, never a partial copy.

use crate::error::{DeployError, IoContext, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

/// Atomic write via temp file + rename
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    let temp_path = temp_sibling(path, "tmp");
    fs::write(&temp_path, content)
        .io_context(|| format!("Failed to write temp file: {}", temp_path.display()))?;
    replace_file(&temp_path, path)
}

fn replace_file(temp_path: &Path, path: &Path) -> Result<()> {
    if let Err(err) = fs::rename(temp_path, path) {
        let _ = fs::remove_file(temp_path);
        return Err(DeployError::Io {
            context: format!("Failed to rename temp file to {}", path.display()),
            source: err,
        });
    }
    Ok(())
}

pub fn file_len(path: &Path) -> Result<u64> {
    Ok(fs::metadata(path)
        .io_context(|| format!("Failed to stat {}", path.display()))?
        .len())
}

/// [`atomic_write`], creating missing parent directories first.
pub fn write_creating_dirs(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .io_context(|| format!("Failed to create {}", parent.display()))?;
    }
    atomic_write(path, content)
}

/// `<parent>/.<name>.<tag>-<uuid>`
fn temp_sibling(path: &Path, tag: &str) -> PathBuf {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "gigadeploy".to_string());
    parent.join(format!(".{}.{}-{}", name, tag, Uuid::new_v4().simple()))
}

/// A replacement for a live directory under construction.
///
/// Dropping the stage without calling [`PluginTreeStage::commit`] removes the
/// staging directory and leaves the live directory untouched.
#[derive(Debug)]
pub struct PluginTreeStage {
    live: PathBuf,
    staging: PathBuf,
    files: Vec<PathBuf>,
    committed: bool,
}

impl PluginTreeStage {
    /// Create an empty staging directory next to `live`.
    pub fn begin(live: &Path) -> Result<Self> {
        let parent = live.parent().unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(parent)
            .io_context(|| format!("Failed to create {}", parent.display()))?;

        let staging = temp_sibling(live, "staging");
        fs::create_dir(&staging)
            .io_context(|| format!("Failed to create staging dir {}", staging.display()))?;
        debug!(staging = %staging.display(), live = %live.display(), "began plugin stage");

        Ok(Self {
            live: live.to_path_buf(),
            staging,
            files: Vec::new(),
            committed: false,
        })
    }

    pub fn staging_dir(&self) -> &Path {
        &self.staging
    }

    /// Copy `source` into the stage at `relative`, creating parent directories.
    pub fn stage_copy(&mut self, relative: &Path, source: &Path) -> Result<u64> {
        let target = self.staging.join(relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .io_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let bytes = fs::copy(source, &target).io_context(|| {
            format!("Failed to copy {} to {}", source.display(), target.display())
        })?;
        self.files.push(relative.to_path_buf());
        Ok(bytes)
    }

    /// Swap the stage in place of the live directory.
    ///
    /// Returns the live paths of every staged file.
    pub fn commit(mut self) -> Result<Vec<PathBuf>> {
        let retired = if self.live.exists() {
            let retired = temp_sibling(&self.live, "old");
            fs::rename(&self.live, &retired).io_context(|| {
                format!("Failed to move {} aside", self.live.display())
            })?;
            Some(retired)
        } else {
            None
        };

        if let Err(err) = fs::rename(&self.staging, &self.live) {
            if let Some(retired) = &retired {
                if let Err(restore_err) = fs::rename(retired, &self.live) {
                    warn!(
                        "Failed to restore {} from {}: {}",
                        self.live.display(),
                        retired.display(),
                        restore_err
                    );
                }
            }
            return Err(DeployError::Io {
                context: format!("Failed to move staged plugins into {}", self.live.display()),
                source: err,
            });
        }
        self.committed = true;

        if let Some(retired) = retired {
            if let Err(err) = fs::remove_dir_all(&retired) {
                warn!("Failed to remove retired plugins {}: {}", retired.display(), err);
            }
        }

        debug!(live = %self.live.display(), files = self.files.len(), "committed plugin stage");
        Ok(self.files.iter().map(|f| self.live.join(f)).collect())
    }
}

impl Drop for PluginTreeStage {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        if let Err(err) = fs::remove_dir_all(&self.staging) {
            debug!(
                "Failed to remove abandoned stage {}: {}",
                self.staging.display(),
                err
            );
        }
    }
}
