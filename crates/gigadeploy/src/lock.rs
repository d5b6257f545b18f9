//! Process-level deploy locking.
//!
//! Two deploys racing on the same plugin tree would interleave their renames.
//! The lock file lives in the native crate's state directory, next to the
//! reload counter, so acquiring it never touches the Unity project.
//!
//! Uses the `fs2` crate for cross-platform file locking (MSRV 1.75 compatible).

use crate::error::{DeployError, IoContext, Result};
use chrono::Utc;
use fs2::FileExt;
use serde::Serialize;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const LOCK_FILENAME: &str = "deploy.lock";

/// Holds an exclusive lock on the deploy state directory.
///
/// The lock is automatically released when the guard is dropped.
pub struct DeployLock {
    _file: File,
    lock_path: PathBuf,
    sidecar_path: Option<PathBuf>,
}

#[derive(Serialize)]
struct LockSidecar<'a> {
    pid: u32,
    command: &'a str,
    timestamp: String,
}

impl DeployLock {
    /// Try to acquire the lock without blocking.
    ///
    /// Returns `DeployError::Locked` when another process holds it.
    pub fn acquire(state_dir: &Path, command: &str) -> Result<Self> {
        fs::create_dir_all(state_dir)
            .io_context(|| format!("Failed to create state dir {}", state_dir.display()))?;
        let lock_path = state_dir.join(LOCK_FILENAME);

        debug!("Attempting to acquire deploy lock: {}", lock_path.display());

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .io_context(|| format!("Failed to create lock file {}", lock_path.display()))?;

        // fully qualified: std::fs::File::try_lock_exclusive exists on newer toolchains
        match FileExt::try_lock_exclusive(&file) {
            Ok(()) => {
                debug!("Acquired deploy lock: {}", lock_path.display());
                let sidecar_path = write_lock_sidecar(&lock_path, command);
                Ok(Self {
                    _file: file,
                    lock_path,
                    sidecar_path,
                })
            }
            Err(e) if e.kind() == io::ErrorKind::WouldBlock || is_contended(&e) => {
                Err(DeployError::Locked(lock_path))
            }
            Err(e) => Err(DeployError::Io {
                context: format!("Failed to acquire lock {}", lock_path.display()),
                source: e,
            }),
        }
    }

    pub fn lock_path(&self) -> &Path {
        &self.lock_path
    }
}

/// fs2 reports contention with the platform's own error on some systems.
fn is_contended(err: &io::Error) -> bool {
    err.raw_os_error() == fs2::lock_contended_error().raw_os_error()
}

fn sidecar_path_for(lock_path: &Path) -> PathBuf {
    lock_path.with_extension("lock.json")
}

fn write_lock_sidecar(lock_path: &Path, command: &str) -> Option<PathBuf> {
    let sidecar = LockSidecar {
        pid: std::process::id(),
        command,
        timestamp: Utc::now().to_rfc3339(),
    };
    let sidecar_path = sidecar_path_for(lock_path);
    match serde_json::to_vec_pretty(&sidecar)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))
        .and_then(|payload| fs::write(&sidecar_path, payload))
    {
        Ok(()) => Some(sidecar_path),
        Err(e) => {
            warn!(
                "Failed to write lock sidecar {}: {}",
                sidecar_path.display(),
                e
            );
            None
        }
    }
}

impl Drop for DeployLock {
    fn drop(&mut self) {
        debug!("Releasing deploy lock: {}", self.lock_path.display());
        if let Some(path) = &self.sidecar_path {
            if let Err(e) = fs::remove_file(path) {
                debug!("Failed to remove lock sidecar {}: {}", path.display(), e);
            }
        }
        // File is automatically unlocked when closed (fs2 uses flock/LockFileEx)
    }
}

impl std::fmt::Debug for DeployLock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeployLock")
            .field("lock_path", &self.lock_path)
            .finish()
    }
}
