//! File-based locking for serializing access to a shared on-disk store.
//!
//! The lock is an `flock` on a dedicated lock file. Every process that opens the
//! same store agrees on the lock file path, so holding the lock excludes all
//! other readers and writers for as long as the guard lives.

use std::{
    fs::{File, OpenOptions},
    path::{Path, PathBuf},
};

use nix::fcntl::{Flock, FlockArg};

use crate::{
    error::{LockError, LockResult},
    fs::ensure_dir_exists,
};

/// An exclusive `flock` held on a lock file.
///
/// The lock is released when `FileLock` is dropped.
pub struct FileLock {
    _file: Flock<File>,
    path: PathBuf,
}

impl FileLock {
    fn open(path: &Path) -> LockResult<File> {
        if let Some(parent) = path.parent() {
            ensure_dir_exists(parent).map_err(|err| LockError::AcquireFailed(err.to_string()))?;
        }

        OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .map_err(|err| {
                LockError::Open {
                    path: path.to_path_buf(),
                    source: err,
                }
            })
    }

    /// Acquire an exclusive lock on `path`, blocking until it is available.
    ///
    /// The lock file and its parent directory are created when missing.
    pub fn acquire<P: AsRef<Path>>(path: P) -> LockResult<Self> {
        let path = path.as_ref();
        let file = Self::open(path)?;

        let file = Flock::lock(file, FlockArg::LockExclusive).map_err(|(_, err)| {
            LockError::AcquireFailed(format!("{}: {}", path.display(), err))
        })?;

        Ok(FileLock {
            _file: file,
            path: path.to_path_buf(),
        })
    }

    /// Get the path to the lock file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}
