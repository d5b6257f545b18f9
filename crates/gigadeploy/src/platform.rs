//! Supported plugin target platforms.

use crate::error::{DeployError, SourceKind};
use crate::reload_id::ReloadId;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Linux,
    Windows,
}

impl Platform {
    pub const ALL: [Platform; 2] = [Platform::Linux, Platform::Windows];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Linux => "linux",
            Platform::Windows => "windows",
        }
    }

    /// Cross-compilation target the release build is written under.
    pub fn target_triple(&self) -> &'static str {
        match self {
            Platform::Linux => "x86_64-unknown-linux-gnu",
            Platform::Windows => "x86_64-pc-windows-gnu",
        }
    }

    pub fn source_kind(&self) -> SourceKind {
        match self {
            Platform::Linux => SourceKind::LinuxLibrary,
            Platform::Windows => SourceKind::WindowsLibrary,
        }
    }

    /// Shared library file name as the linker produces it.
    pub fn library_file(&self, lib_name: &str) -> String {
        match self {
            Platform::Linux => format!("lib{}.so", lib_name),
            Platform::Windows => format!("{}.dll", lib_name),
        }
    }

    /// Library file name carrying a reload id: `libgigagen-00042.so`.
    pub fn reload_library_file(&self, lib_name: &str, id: &ReloadId) -> String {
        self.library_file(&reloaded_name(lib_name, id))
    }
}

/// Library name as the rewritten binding refers to it: `gigagen-00042`.
pub fn reloaded_name(lib_name: &str, id: &ReloadId) -> String {
    format!("{}-{}", lib_name, id)
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = DeployError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "linux" => Ok(Platform::Linux),
            "windows" => Ok(Platform::Windows),
            other => Err(DeployError::UnknownPlatform(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_recognized_platforms() {
        assert_eq!("linux".parse::<Platform>().unwrap(), Platform::Linux);
        assert_eq!("windows".parse::<Platform>().unwrap(), Platform::Windows);
    }

    #[test]
    fn test_parse_rejects_other_values() {
        for value in ["macos", "Linux", "WINDOWS", "", " linux"] {
            let err = value.parse::<Platform>().unwrap_err();
            assert!(
                matches!(err, DeployError::UnknownPlatform(ref v) if v == value),
                "unexpected error for {:?}: {}",
                value,
                err
            );
        }
    }

    #[test]
    fn test_library_file_names() {
        assert_eq!(Platform::Linux.library_file("gigagen"), "libgigagen.so");
        assert_eq!(Platform::Windows.library_file("gigagen"), "gigagen.dll");
    }

    #[test]
    fn test_reload_library_file_embeds_id() {
        let id = ReloadId::new(42, 5);
        assert_eq!(
            Platform::Linux.reload_library_file("gigagen", &id),
            "libgigagen-00042.so"
        );
        assert_eq!(
            Platform::Windows.reload_library_file("gigagen", &id),
            "gigagen-00042.dll"
        );
    }
}
