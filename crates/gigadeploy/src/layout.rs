//! Source and destination paths for both deploy flows.

use crate::config::DeployConfig;
use crate::platform::Platform;
use crate::reload_id::ReloadId;
use std::path::{Path, PathBuf};

/// Resolved filesystem layout.
///
/// ```text
/// <native_root>/target/<triple>/release/<lib>    release sources
/// <native_root>/target/release/<lib>             dev source
/// <native_root>/bindings/Native.cs               binding source
/// <project_root>/Assets/<Proj>/Plugins/...       plugin tree (owned)
/// <project_root>/Assets/<Proj>/Scripts/Native.cs binding destination
/// ```
#[derive(Debug, Clone)]
pub struct Layout {
    native_root: PathBuf,
    project_root: PathBuf,
    config: DeployConfig,
}

impl Layout {
    pub fn new(native_root: impl Into<PathBuf>, project_root: impl Into<PathBuf>, config: DeployConfig) -> Self {
        Self {
            native_root: native_root.into(),
            project_root: project_root.into(),
            config,
        }
    }

    /// Layout where the Unity project is the native crate's parent directory.
    pub fn beside_native_root(native_root: impl Into<PathBuf>, config: DeployConfig) -> Self {
        let native_root = native_root.into();
        let project_root = default_project_root(&native_root);
        Self::new(native_root, project_root, config)
    }

    pub fn config(&self) -> &DeployConfig {
        &self.config
    }

    pub fn native_root(&self) -> &Path {
        &self.native_root
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    // === Sources ===

    /// Cross-compiled release library: `target/<triple>/release/<lib>`.
    pub fn release_library_src(&self, platform: Platform) -> PathBuf {
        self.native_root
            .join("target")
            .join(platform.target_triple())
            .join("release")
            .join(platform.library_file(&self.config.lib_name))
    }

    /// Host-built release library: `target/release/<lib>`.
    pub fn dev_library_src(&self, platform: Platform) -> PathBuf {
        self.native_root
            .join("target")
            .join("release")
            .join(platform.library_file(&self.config.lib_name))
    }

    pub fn binding_src(&self) -> PathBuf {
        self.native_root
            .join("bindings")
            .join(&self.config.binding_file)
    }

    // === Destinations ===

    pub fn project_dir(&self) -> PathBuf {
        self.project_root
            .join("Assets")
            .join(&self.config.project_name)
    }

    pub fn plugins_dir(&self) -> PathBuf {
        self.project_dir().join("Plugins")
    }

    /// Path of a release library relative to the plugins dir.
    pub fn release_library_rel(&self, platform: Platform) -> PathBuf {
        Path::new(&self.config.arch_dir).join(platform.library_file(&self.config.lib_name))
    }

    pub fn release_library_dst(&self, platform: Platform) -> PathBuf {
        self.plugins_dir().join(self.release_library_rel(platform))
    }

    pub fn dev_dir(&self) -> PathBuf {
        self.plugins_dir().join(&self.config.dev_dir)
    }

    /// Path of a reloaded library relative to the plugins dir.
    pub fn dev_library_rel(&self, platform: Platform, id: &ReloadId) -> PathBuf {
        Path::new(&self.config.dev_dir)
            .join(platform.reload_library_file(&self.config.lib_name, id))
    }

    pub fn dev_library_dst(&self, platform: Platform, id: &ReloadId) -> PathBuf {
        self.plugins_dir().join(self.dev_library_rel(platform, id))
    }

    pub fn binding_dst(&self) -> PathBuf {
        self.project_dir()
            .join("Scripts")
            .join(&self.config.binding_file)
    }

    // === Deploy state ===

    /// Lock file and reload counter live here, on the build side.
    pub fn state_dir(&self) -> PathBuf {
        self.native_root.join("target").join("gigadeploy")
    }

    pub fn counter_path(&self) -> PathBuf {
        self.state_dir().join("reload-counter")
    }
}

/// The Unity project sits one level above the native crate.
pub fn default_project_root(native_root: &Path) -> PathBuf {
    match native_root.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => native_root.join(".."),
    }
}
