//! Release publishing.
//!
//! Copies the cross-compiled Linux and Windows libraries and the binding into
//! the Unity project, replacing the whole plugin tree.

use crate::error::{DeployError, IoContext, Result, SourceKind};
use crate::layout::Layout;
use crate::lock::DeployLock;
use crate::platform::Platform;
use crate::receipt::{DeployReceipt, DeployedFile};
use crate::staging::{file_len, write_creating_dirs, PluginTreeStage};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Default)]
pub struct PublishOptions {
    /// Check sources and report the plan without writing anything
    pub dry_run: bool,
}

/// Release sources, verified to exist.
#[derive(Debug, Clone)]
pub struct ReleaseSources {
    pub libraries: Vec<(Platform, PathBuf)>,
    pub binding: PathBuf,
}

pub struct ReleasePublisher<'a> {
    layout: &'a Layout,
}

impl<'a> ReleasePublisher<'a> {
    pub fn new(layout: &'a Layout) -> Self {
        Self { layout }
    }

    /// Verify every release source, in order: linux library, windows
    /// library, binding. The first missing file is returned as the error.
    pub fn check_sources(&self) -> Result<ReleaseSources> {
        let mut libraries = Vec::with_capacity(Platform::ALL.len());
        for platform in Platform::ALL {
            let path = self.layout.release_library_src(platform);
            if !path.is_file() {
                return Err(DeployError::missing(platform.source_kind(), path));
            }
            libraries.push((platform, path));
        }

        let binding = self.layout.binding_src();
        if !binding.is_file() {
            return Err(DeployError::missing(SourceKind::Binding, binding));
        }

        Ok(ReleaseSources { libraries, binding })
    }

    pub fn publish(&self, options: &PublishOptions) -> Result<DeployReceipt> {
        let sources = self.check_sources()?;
        let binding_bytes = fs::read(&sources.binding)
            .io_context(|| format!("Failed to read binding {}", sources.binding.display()))?;

        let plugins_dir = self.layout.plugins_dir();
        let binding_dst = self.layout.binding_dst();

        if options.dry_run {
            let mut files = Vec::with_capacity(sources.libraries.len() + 1);
            for (platform, src) in &sources.libraries {
                files.push(DeployedFile {
                    role: platform.source_kind().to_string(),
                    source: src.clone(),
                    destination: self.layout.release_library_dst(*platform),
                    bytes: file_len(src)?,
                });
            }
            files.push(binding_file(&sources, &binding_dst, binding_bytes.len()));
            return Ok(receipt(plugins_dir, files, true));
        }

        let _lock = DeployLock::acquire(&self.layout.state_dir(), "release")?;

        let mut stage = PluginTreeStage::begin(&plugins_dir)?;
        let mut files = Vec::with_capacity(sources.libraries.len() + 1);
        for (platform, src) in &sources.libraries {
            let bytes = stage.stage_copy(&self.layout.release_library_rel(*platform), src)?;
            files.push(DeployedFile {
                role: platform.source_kind().to_string(),
                source: src.clone(),
                destination: self.layout.release_library_dst(*platform),
                bytes,
            });
        }
        stage.commit()?;
        info!(plugins = %plugins_dir.display(), "replaced plugin tree with release libraries");

        write_creating_dirs(&binding_dst, &binding_bytes)?;
        info!(binding = %binding_dst.display(), "copied binding");
        files.push(binding_file(&sources, &binding_dst, binding_bytes.len()));

        Ok(receipt(plugins_dir, files, false))
    }
}

fn binding_file(sources: &ReleaseSources, binding_dst: &Path, len: usize) -> DeployedFile {
    DeployedFile {
        role: SourceKind::Binding.to_string(),
        source: sources.binding.clone(),
        destination: binding_dst.to_path_buf(),
        bytes: len as u64,
    }
}

fn receipt(plugins_dir: PathBuf, files: Vec<DeployedFile>, dry_run: bool) -> DeployReceipt {
    DeployReceipt {
        command: "release",
        platform: None,
        reload_id: None,
        provisional_id: false,
        dry_run,
        plugins_dir,
        files,
    }
}
