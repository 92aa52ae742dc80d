// # Challenge Lock
//
// Cross-process mutual exclusion around the fetch → reconcile → write cycle.
//
// ## Scope
//
// ACME clients invoke the hook once per challenge, often in parallel for SAN
// certificates. Every invocation is a separate OS process, and the registrar
// only offers a full-replace write, so two overlapping cycles would lose one
// another's records. The lock lives on a filesystem path so that it is shared
// by all processes on the host.
//
// ## Release
//
// `ChallengeLock` is a guard: dropping it unlocks. Callers hold it for the
// duration of the cycle and every exit path (including `?` and unwinding)
// releases it exactly once.
//
// ## Limitations
//
// There is no acquisition timeout. The lock is an OS advisory lock (`flock(2)`
// on Unix), released by the kernel when the holder exits, but a holder that
// hangs blocks later invocations.

use std::fs::{File, OpenOptions, TryLockError};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// File name of the lock within the system temp directory
pub const DEFAULT_LOCK_FILE_NAME: &str = "transip.lock";

/// Default lock path: `<temp dir>/transip.lock`
pub fn default_lock_path() -> PathBuf {
    std::env::temp_dir().join(DEFAULT_LOCK_FILE_NAME)
}

/// An exclusive advisory lock on a file, held until dropped
///
/// # Example
///
/// ```rust,no_run
/// use acmedns_core::lock::ChallengeLock;
///
/// fn main() -> acmedns_core::Result<()> {
///     let lock = ChallengeLock::acquire("/tmp/transip.lock")?;
///     // ... read-modify-write the remote record set ...
///     lock.release();
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct ChallengeLock {
    file: File,
    path: PathBuf,
}

impl ChallengeLock {
    /// Acquire the lock, blocking until it is available
    ///
    /// The file is created if absent. Fails with [`Error::LockUnavailable`]
    /// when the file cannot be opened or locked.
    pub fn acquire<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = open_lock_file(path)?;

        lock(&file, true).map_err(|e| Error::lock_unavailable(path, e))?;

        tracing::debug!(path = %path.display(), "Lock acquired");
        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

    /// Try to acquire the lock without blocking
    ///
    /// Returns `Ok(None)` when another holder has it.
    pub fn try_acquire<P: AsRef<Path>>(path: P) -> Result<Option<Self>> {
        let path = path.as_ref();
        let file = open_lock_file(path)?;

        match lock(&file, false) {
            Ok(()) => Ok(Some(Self {
                file,
                path: path.to_path_buf(),
            })),
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => Ok(None),
            Err(e) => Err(Error::lock_unavailable(path, e)),
        }
    }

    /// Path of the lock file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Release the lock
    ///
    /// Equivalent to dropping the guard.
    pub fn release(self) {
        drop(self);
    }
}

impl Drop for ChallengeLock {
    fn drop(&mut self) {
        if let Err(e) = self.file.unlock() {
            tracing::warn!(path = %self.path.display(), "Failed to unlock: {}", e);
        }
        tracing::debug!(path = %self.path.display(), "Lock released");
    }
}

fn open_lock_file(path: &Path) -> Result<File> {
    OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)
        .map_err(|e| Error::lock_unavailable(path, e))
}

fn lock(file: &File, blocking: bool) -> std::io::Result<()> {
    if blocking {
        return file.lock();
    }
    file.try_lock().map_err(|e| match e {
        TryLockError::WouldBlock => std::io::ErrorKind::WouldBlock.into(),
        TryLockError::Error(e) => e,
    })
}
