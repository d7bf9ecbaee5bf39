use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::Path,
};

use crate::error::{FileSystemError, FileSystemResult};

/// Creates a directory structure if it doesn't exist.
///
/// If the directory already exists, this function does nothing. If the path exists but is
/// not a directory, this function returns an error.
///
/// # Errors
///
/// * [`FileSystemError::Directory`] if the directory could not be created.
/// * [`FileSystemError::NotADirectory`] if the path exists but is not a directory.
pub fn ensure_dir_exists<P: AsRef<Path>>(path: P) -> FileSystemResult<()> {
    let path = path.as_ref();
    if !path.exists() {
        fs::create_dir_all(path).map_err(|err| {
            FileSystemError::Directory {
                path: path.to_path_buf(),
                action: "create",
                source: err,
            }
        })?;
    } else if !path.is_dir() {
        return Err(FileSystemError::NotADirectory {
            path: path.to_path_buf(),
        });
    }

    Ok(())
}

/// Removes a file, ignoring it if it doesn't exist.
///
/// # Errors
///
/// Returns a [`FileSystemError::File`] if the removal fails for any reason other than the
/// path not existing.
pub fn safe_remove<P: AsRef<Path>>(path: P) -> FileSystemResult<()> {
    let path = path.as_ref();
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(err) => {
            Err(FileSystemError::File {
                path: path.to_path_buf(),
                action: "remove",
                source: err,
            })
        }
    }
}

/// Reads a whole file into memory.
pub fn read_file<P: AsRef<Path>>(path: P) -> FileSystemResult<Vec<u8>> {
    let path = path.as_ref();
    fs::read(path).map_err(|err| {
        FileSystemError::File {
            path: path.to_path_buf(),
            action: "read",
            source: err,
        }
    })
}

/// Writes `contents` to `path` so that readers observe either the old or the new file.
///
/// The data is written to a sibling `.tmp` file, synced, then renamed over the target.
/// The parent directory is created when missing.
///
/// # Errors
///
/// * [`FileSystemError::Directory`] if the parent directory could not be created.
/// * [`FileSystemError::File`] if writing or renaming fails.
pub fn atomic_write<P: AsRef<Path>>(path: P, contents: &[u8]) -> FileSystemResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        ensure_dir_exists(parent)?;
    }

    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    let write_err = |action: &'static str| {
        let tmp_path = tmp_path.clone();
        move |err| {
            FileSystemError::File {
                path: tmp_path,
                action,
                source: err,
            }
        }
    };

    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&tmp_path)
        .map_err(write_err("create"))?;
    file.write_all(contents).map_err(write_err("write"))?;
    file.sync_all().map_err(write_err("sync"))?;
    drop(file);

    fs::rename(&tmp_path, path).map_err(|err| {
        FileSystemError::File {
            path: path.to_path_buf(),
            action: "replace",
            source: err,
        }
    })
}
