//! Operator-facing diagnostics.
//!
//! A failed deploy prints one `ERROR:` line. With `--verbose` the `CONTEXT:`
//! line and `TRY:` suggestions follow.

use gigadeploy::{DeployError, Platform, SourceKind};
use serde::Serialize;
use std::fmt;
use std::path::Path;

/// A failure message plus optional context and next steps.
#[derive(Debug, Clone, Serialize)]
pub struct HelpfulError {
    #[serde(rename = "error")]
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    /// `TRY:` lines
    pub suggestions: Vec<String>,
}

impl HelpfulError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: None,
            suggestions: Vec::new(),
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_suggestions(mut self, suggestions: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.suggestions.extend(suggestions.into_iter().map(|s| s.into()));
        self
    }

    /// A path given on the command line is not there.
    pub fn path_not_found(path: &Path) -> Self {
        Self::new(format!("Path not found: {}", path.display()))
            .with_context("gigadeploy resolves every path from the native crate root")
            .with_suggestions([
                "TRY: Run from the native crate, or pass --native-root <DIR>".to_string(),
                "TRY: Set GIGADEPLOY_NATIVE_ROOT for repeated runs".to_string(),
            ])
    }

    /// Translate a deploy failure into a message with next steps.
    pub fn from_deploy(err: &DeployError) -> Self {
        let base = Self::new(err.to_string());
        match err {
            DeployError::MissingSource { kind, path } => {
                let build = match kind {
                    SourceKind::LinuxLibrary if is_cross_target(path, Platform::Linux) => {
                        format!("TRY: cargo build --release --target {}", Platform::Linux.target_triple())
                    }
                    SourceKind::WindowsLibrary if is_cross_target(path, Platform::Windows) => {
                        format!("TRY: cargo build --release --target {}", Platform::Windows.target_triple())
                    }
                    SourceKind::LinuxLibrary | SourceKind::WindowsLibrary => {
                        "TRY: cargo build --release".to_string()
                    }
                    SourceKind::Binding => {
                        "TRY: cargo build (build.rs regenerates the binding)".to_string()
                    }
                };
                base.with_context(format!("The {} must be built before deploying", kind))
                    .with_suggestions([
                        build,
                        "TRY: Check --native-root points at the native crate".to_string(),
                    ])
            }
            DeployError::UnknownPlatform(_) => base
                .with_context("The reload command takes a single platform name")
                .with_suggestion(format!(
                    "TRY: Use one of: {}",
                    Platform::ALL.map(|p| p.as_str()).join(", ")
                )),
            DeployError::LibraryReferenceMissing { .. }
            | DeployError::LibraryReferenceAmbiguous { .. } => base
                .with_context("Nothing was deployed; the binding must name the library exactly once")
                .with_suggestions([
                    "TRY: Regenerate the binding: cargo build".to_string(),
                    "TRY: Check lib_name and dll_name_field in gigadeploy.toml".to_string(),
                ]),
            DeployError::Locked(path) => base
                .with_context("Only one deploy may run against a native crate at a time")
                .with_suggestions([
                    "TRY: Wait for the other deploy to finish".to_string(),
                    format!("TRY: See who holds it: cat {}.json", path.display()),
                ]),
            DeployError::Config(_) => base.with_suggestion(
                "TRY: Fix or remove gigadeploy.toml; run 'gigadeploy config' to see defaults",
            ),
            DeployError::InvalidReloadId { .. } => base
                .with_suggestion("TRY: Omit --reload-id to draw one automatically"),
            DeployError::CorruptCounter { path, .. } => base.with_suggestion(format!(
                "TRY: Delete the counter to reseed it: rm {}",
                path.display()
            )),
            DeployError::Io { .. } => base,
        }
    }

    /// Best-effort conversion of any command failure.
    pub fn from_anyhow(err: &anyhow::Error) -> Self {
        if let Some(helpful) = err.downcast_ref::<HelpfulError>() {
            return helpful.clone();
        }
        if let Some(deploy) = err.downcast_ref::<DeployError>() {
            return Self::from_deploy(deploy);
        }
        Self::new(format!("{:#}", err))
    }

    /// Render for stderr: one line, or the full report when verbose.
    pub fn render(&self, verbose: bool) -> String {
        if verbose {
            self.to_string()
        } else {
            format!("ERROR: {}", self.message)
        }
    }
}

fn is_cross_target(path: &Path, platform: Platform) -> bool {
    path.components()
        .any(|c| c.as_os_str() == platform.target_triple())
}

impl fmt::Display for HelpfulError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ERROR: {}", self.message)?;

        if let Some(ctx) = &self.context {
            writeln!(f, "CONTEXT: {}", ctx)?;
        }

        if !self.suggestions.is_empty() {
            writeln!(f)?;
            for suggestion in &self.suggestions {
                writeln!(f, "  {}", suggestion)?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for HelpfulError {}

/// Print an error as JSON on stderr.
pub fn print_json_error(err: &HelpfulError) {
    match serde_json::to_string_pretty(err) {
        Ok(json) => eprintln!("{}", json),
        Err(_) => eprintln!("{}", err.render(false)),
    }
}
