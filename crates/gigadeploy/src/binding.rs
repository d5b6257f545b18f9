//! Library name rewriting in the generated binding.
//!
//! The binding generator emits exactly one `__DllName = "<lib>"` assignment
//! for desktop targets. A reload points it at the renamed library.

use crate::error::{DeployError, Result};
use crate::platform::reloaded_name;
use crate::reload_id::ReloadId;
use std::path::Path;

/// A binding read from disk and rewritten in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewrittenBinding {
    pub text: String,
    /// The assignment that was replaced
    pub original: String,
    /// The assignment written in its place
    pub replacement: String,
}

/// Verify `<field> = "<lib>"` occurs exactly once, without rewriting.
/// Independent of the reload id.
pub fn check_library_reference(
    text: &str,
    field: &str,
    lib_name: &str,
    path: &Path,
) -> Result<()> {
    let pattern = library_assignment(field, lib_name);
    match text.matches(pattern.as_str()).count() {
        1 => Ok(()),
        0 => Err(DeployError::LibraryReferenceMissing {
            pattern,
            path: path.to_path_buf(),
        }),
        count => Err(DeployError::LibraryReferenceAmbiguous {
            pattern,
            path: path.to_path_buf(),
            count,
        }),
    }
}

/// Replace `<field> = "<lib>"` with `<field> = "<lib>-<id>"`.
///
/// The assignment must occur exactly once; all other text is preserved
/// byte for byte. `path` is only used in error messages.
pub fn rewrite_library_name(
    text: &str,
    field: &str,
    lib_name: &str,
    id: &ReloadId,
    path: &Path,
) -> Result<RewrittenBinding> {
    check_library_reference(text, field, lib_name, path)?;

    let original = library_assignment(field, lib_name);
    let replacement = library_assignment(field, &reloaded_name(lib_name, id));
    Ok(RewrittenBinding {
        text: text.replacen(original.as_str(), &replacement, 1),
        original,
        replacement,
    })
}

fn library_assignment(field: &str, lib_name: &str) -> String {
    format!("{} = \"{}\"", field, lib_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    const GENERATED: &str = r#"// <auto-generated>
// This code is generated by csbindgen.
// DON'T CHANGE THIS DIRECTLY.
// </auto-generated>
#pragma warning disable CS8500
#pragma warning disable CS8981
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


        [DllImport(__DllName, EntryPoint = "create_world", CallingConvention = CallingConvention.Cdecl, ExactSpelling = true)]
        internal static extern void* create_world(float view_dist, float chunk_size);
    }
}
"#;

    fn path() -> &'static Path {
        Path::new("bindings/Native.cs")
    }

    #[test]
    fn test_rewrite_replaces_single_reference() {
        let id = ReloadId::new(42, 5);
        let rewritten = rewrite_library_name(GENERATED, "__DllName", "gigagen", &id, path()).unwrap();

        assert_eq!(rewritten.original, r#"__DllName = "gigagen""#);
        assert_eq!(rewritten.replacement, r#"__DllName = "gigagen-00042""#);
        assert_eq!(
            rewritten.text,
            GENERATED.replace(r#"__DllName = "gigagen""#, r#"__DllName = "gigagen-00042""#)
        );
        assert!(rewritten.text.contains(r#"__DllName = "__Internal""#));
    }

    #[test]
    fn test_rewrite_changes_nothing_else() {
        let id = ReloadId::new(7, 5);
        let rewritten = rewrite_library_name(GENERATED, "__DllName", "gigagen", &id, path()).unwrap();

        let (before, after) = GENERATED.split_once(r#"__DllName = "gigagen""#).unwrap();
        assert!(rewritten.text.starts_with(before));
        assert!(rewritten.text.ends_with(after));
        assert_eq!(
            rewritten.text.len(),
            GENERATED.len() + "-00007".len()
        );
    }

    #[test]
    fn test_check_matches_rewrite_outcome() {
        check_library_reference(GENERATED, "__DllName", "gigagen", path()).unwrap();

        let doubled = format!("{}{}", GENERATED, GENERATED);
        let err = check_library_reference(&doubled, "__DllName", "gigagen", path()).unwrap_err();
        assert!(matches!(err, DeployError::LibraryReferenceAmbiguous { count: 2, .. }));

        let err = check_library_reference(GENERATED, "__DllName", "terrain", path()).unwrap_err();
        assert!(matches!(err, DeployError::LibraryReferenceMissing { .. }));
    }

    #[test]
    fn test_missing_reference_is_an_error() {
        let text = GENERATED.replace(r#""gigagen""#, r#""terrain""#);
        let err = rewrite_library_name(&text, "__DllName", "gigagen", &ReloadId::new(1, 5), path())
            .unwrap_err();

        assert!(matches!(err, DeployError::LibraryReferenceMissing { .. }));
        assert!(err.to_string().contains(r#"__DllName = "gigagen""#));
    }

    #[test]
    fn test_duplicate_reference_is_an_error() {
        let text = format!("{}\nconst string __DllName = \"gigagen\";\n", GENERATED);
        let err = rewrite_library_name(&text, "__DllName", "gigagen", &ReloadId::new(1, 5), path())
            .unwrap_err();

        assert!(matches!(err, DeployError::LibraryReferenceAmbiguous { count: 2, .. }));
    }

    #[test]
    fn test_already_rewritten_binding_is_missing() {
        let once = rewrite_library_name(GENERATED, "__DllName", "gigagen", &ReloadId::new(1, 5), path())
            .unwrap();
        let err = rewrite_library_name(&once.text, "__DllName", "gigagen", &ReloadId::new(2, 5), path())
            .unwrap_err();

        assert!(matches!(err, DeployError::LibraryReferenceMissing { .. }));
    }
}
