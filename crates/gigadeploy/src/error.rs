//! Error types for deploy operations.

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Deploy operation result type.
pub type Result<T> = std::result::Result<T, DeployError>;

/// Which required source file a precondition refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    LinuxLibrary,
    WindowsLibrary,
    Binding,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::LinuxLibrary => "linux library",
            SourceKind::WindowsLibrary => "windows library",
            SourceKind::Binding => "binding",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Deploy errors.
#[derive(Error, Debug)]
pub enum DeployError {
    /// A required build output is not on disk
    #[error("{kind} '{}' does not exist", .path.display())]
    MissingSource { kind: SourceKind, path: PathBuf },

    /// Platform selector is not `linux` or `windows`
    #[error("unknown platform '{0}'")]
    UnknownPlatform(String),

    /// The binding has no library name assignment to rewrite
    #[error("binding '{}' does not contain {pattern}", .path.display())]
    LibraryReferenceMissing { pattern: String, path: PathBuf },

    /// The binding assigns the library name more than once
    #[error("binding '{}' contains {pattern} {count} times, expected exactly once", .path.display())]
    LibraryReferenceAmbiguous {
        pattern: String,
        path: PathBuf,
        count: usize,
    },

    /// Another deploy holds the lock
    #[error("another deploy is running (lock held: {})", .0.display())]
    Locked(PathBuf),

    /// Invalid configuration file or values
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Reload identifier outside `0..bound`
    #[error("reload id {value} is out of range (must be below {bound})")]
    InvalidReloadId { value: u32, bound: u32 },

    /// Persisted reload counter cannot be parsed
    #[error("reload counter '{}' is corrupt: {content:?}", .path.display())]
    CorruptCounter { path: PathBuf, content: String },

    /// IO error with the operation that failed
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
}

impl DeployError {
    /// Create a missing source error.
    pub fn missing(kind: SourceKind, path: impl Into<PathBuf>) -> Self {
        Self::MissingSource {
            kind,
            path: path.into(),
        }
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// Attach a human-readable operation to an `io::Result`.
pub(crate) trait IoContext<T> {
    fn io_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T> IoContext<T> for io::Result<T> {
    fn io_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|source| DeployError::Io {
            context: f().into(),
            source,
        })
    }
}
