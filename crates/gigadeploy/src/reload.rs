//! Dev hot-reload.
//!
//! The engine host will not reload a native library whose file name it has
//! already loaded. Each reload copies the host-built library under a name
//! carrying a fresh [`ReloadId`] and points the binding at that name.
//!
//! Everything that can fail on bad input (missing sources, a binding without
//! exactly one library reference) fails before the plugin tree is touched.

use crate::binding::{check_library_reference, rewrite_library_name};
use crate::error::{DeployError, IoContext, Result, SourceKind};
use crate::layout::Layout;
use crate::lock::DeployLock;
use crate::platform::Platform;
use crate::receipt::{DeployReceipt, DeployedFile};
use crate::reload_id::{IdSource, ReloadId};
use crate::staging::{file_len, write_creating_dirs, PluginTreeStage};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Debug, Clone, Default)]
pub struct ReloadOptions {
    /// Use this id instead of drawing one
    pub reload_id: Option<u32>,
    /// Check sources and report the plan without writing anything
    pub dry_run: bool,
}

pub struct DevReloader<'a> {
    layout: &'a Layout,
}

impl<'a> DevReloader<'a> {
    pub fn new(layout: &'a Layout) -> Self {
        Self { layout }
    }

    /// Verify the dev library for `platform`, then the binding.
    pub fn check_sources(&self, platform: Platform) -> Result<(PathBuf, PathBuf)> {
        let library = self.layout.dev_library_src(platform);
        if !library.is_file() {
            return Err(DeployError::missing(platform.source_kind(), library));
        }
        let binding = self.layout.binding_src();
        if !binding.is_file() {
            return Err(DeployError::missing(SourceKind::Binding, binding));
        }
        Ok((library, binding))
    }

    /// Parse the platform selector and reload it.
    pub fn reload_selector(
        &self,
        selector: &str,
        ids: &mut dyn IdSource,
        options: &ReloadOptions,
    ) -> Result<DeployReceipt> {
        let platform: Platform = selector.parse()?;
        self.reload(platform, ids, options)
    }

    pub fn reload(
        &self,
        platform: Platform,
        ids: &mut dyn IdSource,
        options: &ReloadOptions,
    ) -> Result<DeployReceipt> {
        let config = self.layout.config();
        let (library_src, binding_src) = self.check_sources(platform)?;
        let binding_text = fs::read_to_string(&binding_src)
            .io_context(|| format!("Failed to read binding {}", binding_src.display()))?;
        check_library_reference(
            &binding_text,
            &config.dll_name_field,
            &config.lib_name,
            &binding_src,
        )?;

        let pinned = match options.reload_id {
            Some(value) => Some(ReloadId::checked(value, &config.reload)?),
            None => None,
        };

        if options.dry_run {
            let id = match pinned {
                Some(id) => id,
                None => ids.peek_id()?,
            };
            let rewritten = rewrite_library_name(
                &binding_text,
                &config.dll_name_field,
                &config.lib_name,
                &id,
                &binding_src,
            )?;
            let library_bytes = file_len(&library_src)?;
            let mut receipt = self.receipt(
                platform,
                &id,
                library_src,
                library_bytes,
                binding_src,
                rewritten.text.len(),
                true,
            );
            receipt.provisional_id = pinned.is_none() && !ids.peek_is_exact();
            return Ok(receipt);
        }

        let _lock = DeployLock::acquire(&self.layout.state_dir(), "reload")?;

        let id = match pinned {
            Some(id) => id,
            None => ids.next_id()?,
        };
        let rewritten = rewrite_library_name(
            &binding_text,
            &config.dll_name_field,
            &config.lib_name,
            &id,
            &binding_src,
        )?;
        debug!(
            from = %rewritten.original,
            to = %rewritten.replacement,
            "rewrote binding library reference"
        );

        let plugins_dir = self.layout.plugins_dir();
        let mut stage = PluginTreeStage::begin(&plugins_dir)?;
        let library_bytes =
            stage.stage_copy(&self.layout.dev_library_rel(platform, &id), &library_src)?;
        stage.commit()?;
        info!(
            platform = %platform,
            id = %id,
            library = %self.layout.dev_library_dst(platform, &id).display(),
            "replaced plugin tree with dev library"
        );

        let binding_dst = self.layout.binding_dst();
        write_creating_dirs(&binding_dst, rewritten.text.as_bytes())?;
        info!(binding = %binding_dst.display(), "wrote rewritten binding");

        Ok(self.receipt(
            platform,
            &id,
            library_src,
            library_bytes,
            binding_src,
            rewritten.text.len(),
            false,
        ))
    }

    #[allow(clippy::too_many_arguments)]
    fn receipt(
        &self,
        platform: Platform,
        id: &ReloadId,
        library_src: PathBuf,
        library_bytes: u64,
        binding_src: PathBuf,
        binding_len: usize,
        dry_run: bool,
    ) -> DeployReceipt {
        DeployReceipt {
            command: "reload",
            platform: Some(platform.to_string()),
            reload_id: Some(id.to_string()),
            provisional_id: false,
            dry_run,
            plugins_dir: self.layout.plugins_dir(),
            files: vec![
                DeployedFile {
                    role: platform.source_kind().to_string(),
                    source: library_src,
                    destination: self.layout.dev_library_dst(platform, id),
                    bytes: library_bytes,
                },
                DeployedFile {
                    role: SourceKind::Binding.to_string(),
                    source: binding_src,
                    destination: self.layout.binding_dst(),
                    bytes: binding_len as u64,
                },
            ],
        }
    }
}
