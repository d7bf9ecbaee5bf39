use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum HashError {
    #[error("Invalid digest `{input}`: {reason}")]
    #[diagnostic(
        code(stowage_utils::hash::invalid_digest),
        help("Digests have the form `sha256:<64 lowercase hex characters>`")
    )]
    InvalidDigest { input: String, reason: &'static str },
}

#[derive(Error, Diagnostic, Debug)]
pub enum PathError {
    #[error("Failed to get current directory: {source}")]
    #[diagnostic(code(stowage_utils::path::current_dir))]
    CurrentDir {
        #[source]
        source: std::io::Error,
    },

    #[error("Path is empty")]
    #[diagnostic(code(stowage_utils::path::empty))]
    Empty,

    #[error("Environment variable `{var}` not set in `{input}`")]
    #[diagnostic(
        code(stowage_utils::path::missing_env_var),
        help("Export the variable or use an absolute path")
    )]
    MissingEnvVar { var: String, input: String },

    #[error("Unclosed variable expression starting at `{input}`")]
    #[diagnostic(code(stowage_utils::path::unclosed_variable))]
    UnclosedVariable { input: String },
}

#[derive(Error, Diagnostic, Debug)]
pub enum FileSystemError {
    #[error("Failed to {action} file `{}`: {source}", .path.display())]
    #[diagnostic(
        code(stowage_utils::fs::file),
        help("Check file permissions and disk space")
    )]
    File {
        path: PathBuf,
        action: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to {action} directory `{}`: {source}", .path.display())]
    #[diagnostic(
        code(stowage_utils::fs::directory),
        help("Check directory permissions")
    )]
    Directory {
        path: PathBuf,
        action: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("`{}` is not a directory", .path.display())]
    #[diagnostic(code(stowage_utils::fs::not_a_directory))]
    NotADirectory { path: PathBuf },
}

#[derive(Error, Diagnostic, Debug)]
pub enum LockError {
    #[error("Failed to open lock file `{}`: {source}", .path.display())]
    #[diagnostic(code(stowage_utils::lock::open))]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to acquire lock: {0}")]
    #[diagnostic(
        code(stowage_utils::lock::acquire),
        help("Another stowage process may be holding the store lock")
    )]
    AcquireFailed(String),
}

#[derive(Error, Diagnostic, Debug)]
pub enum UtilsError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Hash(#[from] HashError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Path(#[from] PathError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    FileSystem(#[from] FileSystemError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Lock(#[from] LockError),
}

pub type FileSystemResult<T> = std::result::Result<T, FileSystemError>;
pub type HashResult<T> = std::result::Result<T, HashError>;
pub type LockResult<T> = std::result::Result<T, LockError>;
pub type PathResult<T> = std::result::Result<T, PathError>;
