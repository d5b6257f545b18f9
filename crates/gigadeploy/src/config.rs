//! Naming configuration shared by the release and reload flows.
//!
//! Every constant both flows depend on lives in [`DeployConfig`]. An optional
//! `gigadeploy.toml` in the native crate root overrides individual fields.

use crate::error::{DeployError, IoContext, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File name looked up in the native crate root.
pub const CONFIG_FILENAME: &str = "gigadeploy.toml";

/// Widest zero-padding accepted; `u32::MAX` has 10 digits.
pub const MAX_ID_WIDTH: usize = 10;

/// How reload identifiers are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdStrategy {
    /// Uniform draw from `0..bound`
    Random,
    /// Persisted counter, incremented per reload
    Counter,
}

impl IdStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdStrategy::Random => "random",
            IdStrategy::Counter => "counter",
        }
    }
}

/// Reload identifier settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReloadConfig {
    pub strategy: IdStrategy,
    /// Zero-pad width of the rendered id
    pub width: usize,
    /// Exclusive upper bound of the id value
    pub bound: u32,
}

impl Default for ReloadConfig {
    fn default() -> Self {
        Self {
            strategy: IdStrategy::Counter,
            width: 5,
            bound: 99999,
        }
    }
}

/// Naming configuration for both deploy flows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeployConfig {
    /// Library base name (`lib<name>.so`, `<name>.dll`)
    pub lib_name: String,
    /// Asset folder name under `Assets/`
    pub project_name: String,
    /// Binding file name, identical at source and destination
    pub binding_file: String,
    /// Identifier the binding assigns the library name to
    pub dll_name_field: String,
    /// Release plugin subdirectory under `Plugins/`
    pub arch_dir: String,
    /// Dev plugin subdirectory under `Plugins/`
    pub dev_dir: String,
    pub reload: ReloadConfig,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            lib_name: "gigagen".to_string(),
            project_name: "Gigagen".to_string(),
            binding_file: "Native.cs".to_string(),
            dll_name_field: "__DllName".to_string(),
            arch_dir: "x86_64".to_string(),
            dev_dir: "_dev".to_string(),
            reload: ReloadConfig::default(),
        }
    }
}

impl DeployConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .io_context(|| format!("Failed to read config {}", path.display()))?;
        let config: DeployConfig = toml::from_str(&content)
            .map_err(|e| DeployError::config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load `gigadeploy.toml` from the native root, or defaults when absent.
    pub fn load_or_default(native_root: &Path) -> Result<Self> {
        let path = native_root.join(CONFIG_FILENAME);
        if path.is_file() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<()> {
        let names = [
            ("lib_name", &self.lib_name),
            ("project_name", &self.project_name),
            ("binding_file", &self.binding_file),
            ("dll_name_field", &self.dll_name_field),
            ("arch_dir", &self.arch_dir),
            ("dev_dir", &self.dev_dir),
        ];
        for (field, value) in names {
            if value.trim().is_empty() {
                return Err(DeployError::config(format!("{} must not be empty", field)));
            }
            if value.contains(['/', '\\']) {
                return Err(DeployError::config(format!(
                    "{} must be a single path component, got '{}'",
                    field, value
                )));
            }
        }

        if self.reload.bound == 0 {
            return Err(DeployError::config("reload.bound must be greater than 0"));
        }
        if self.reload.width > MAX_ID_WIDTH {
            return Err(DeployError::config(format!(
                "reload.width {} exceeds the maximum of {}",
                self.reload.width, MAX_ID_WIDTH
            )));
        }
        let max_digits = (self.reload.bound - 1).to_string().len();
        if max_digits > self.reload.width {
            return Err(DeployError::config(format!(
                "reload.width {} cannot hold ids below {}",
                self.reload.width, self.reload.bound
            )));
        }
        Ok(())
    }

    /// The binding assignment the reload flow rewrites: `__DllName = "gigagen"`.
    pub fn library_reference(&self) -> String {
        format!("{} = \"{}\"", self.dll_name_field, self.lib_name)
    }
}
