//! Fixture trees shared by the integration tests.
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const BINDING: &str = r#"// <auto-generated>
// This code is generated by csbindgen.
// DON'T CHANGE THIS DIRECTLY.
// </auto-generated>
using System;
using System.Runtime.InteropServices;

namespace Gigagen.Native
{
    internal static unsafe partial class Func
    {
#if UNITY_IOS && !UNITY_EDITOR
        const string __DllName = "__Internal";
#else
        const string __DllName = "gigagen";
#endif

        [DllImport(__DllName, EntryPoint = "generate_chunk", CallingConvention = CallingConvention.Cdecl, ExactSpelling = true)]
        internal static extern void generate_chunk(void* world, int x, int z);
    }
}
"#;

pub const LINUX_RELEASE: &[u8] = b"\x7fELF linux release";
pub const WINDOWS_RELEASE: &[u8] = b"MZ windows release";
pub const LINUX_DEV: &[u8] = b"\x7fELF linux dev build";
pub const WINDOWS_DEV: &[u8] = b"MZ windows dev build";

/// `<temp>/gigagen-native` next to `<temp>/Assets`.
pub struct Fixture {
    pub temp: TempDir,
    pub native: PathBuf,
}

impl Fixture {
    pub fn empty() -> Self {
        let temp = TempDir::new().unwrap();
        let native = temp.path().join("gigagen-native");
        fs::create_dir_all(&native).unwrap();
        Self { temp, native }
    }

    /// Native root with every release and dev artifact built.
    pub fn built() -> Self {
        let fixture = Self::empty();
        fixture.write_release_linux();
        fixture.write_release_windows();
        fixture.write_dev(LINUX_DEV, "libgigagen.so");
        fixture.write_dev(WINDOWS_DEV, "gigagen.dll");
        fixture.write_binding(BINDING);
        fixture
    }

    pub fn project_root(&self) -> &Path {
        self.temp.path()
    }

    pub fn write_release_linux(&self) {
        write(
            &self
                .native
                .join("target/x86_64-unknown-linux-gnu/release/libgigagen.so"),
            LINUX_RELEASE,
        );
    }

    pub fn write_release_windows(&self) {
        write(
            &self
                .native
                .join("target/x86_64-pc-windows-gnu/release/gigagen.dll"),
            WINDOWS_RELEASE,
        );
    }

    pub fn write_dev(&self, content: &[u8], file_name: &str) {
        write(&self.native.join("target/release").join(file_name), content);
    }

    pub fn write_binding(&self, content: &str) {
        write(&self.native.join("bindings/Native.cs"), content.as_bytes());
    }

    pub fn plugins(&self) -> PathBuf {
        self.project_root().join("Assets/Gigagen/Plugins")
    }

    pub fn scripts_binding(&self) -> PathBuf {
        self.project_root().join("Assets/Gigagen/Scripts/Native.cs")
    }
}

pub fn write(path: &Path, content: &[u8]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// Every file under `root`, relative, sorted.
pub fn list_files(root: &Path) -> Vec<String> {
    let mut files = Vec::new();
    collect(root, root, &mut files);
    files.sort();
    files
}

fn collect(root: &Path, dir: &Path, out: &mut Vec<String>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries {
        let path = entry.unwrap().path();
        if path.is_dir() {
            collect(root, &path, out);
        } else {
            let rel = path.strip_prefix(root).unwrap();
            out.push(rel.to_string_lossy().replace('\\', "/"));
        }
    }
}

/// Names in the directory holding the plugin tree, hidden ones included.
pub fn siblings_of(path: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(path.parent().unwrap())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
