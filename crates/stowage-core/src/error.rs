//! Error types for stowage-core.

use std::path::PathBuf;

use miette::Diagnostic;
use stowage_config::error::ConfigError;
use stowage_utils::{
    error::{FileSystemError, LockError, PathError},
    hash::Sha256Digest,
};
use thiserror::Error;

/// A string could not be parsed as a bundle reference.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum ReferenceError {
    #[error("Reference is empty")]
    #[diagnostic(code(stowage::reference::empty))]
    Empty,

    #[error("Invalid reference format: `{0}`")]
    #[diagnostic(
        code(stowage::reference::format),
        help("Use `name[:tag]`, `name@sha256:<hex>` or a 64 character bundle ID")
    )]
    InvalidFormat(String),

    #[error("Repository name must be lowercase: `{0}`")]
    #[diagnostic(code(stowage::reference::uppercase))]
    Uppercase(String),

    #[error("Repository name longer than {max} characters: `{name}`")]
    #[diagnostic(code(stowage::reference::name_too_long))]
    NameTooLong { name: String, max: usize },

    #[error("Invalid digest `{0}`")]
    #[diagnostic(
        code(stowage::reference::digest),
        help("Only `sha256:<64 lowercase hex characters>` digests are supported")
    )]
    InvalidDigest(String),
}

/// Failures raised by a [`crate::store::BundleStore`].
#[derive(Error, Diagnostic, Debug)]
pub enum StoreError {
    #[error("Bundle not found: {0}")]
    #[diagnostic(
        code(stowage::store::not_found),
        help("Run `stowage ls` to see the stored bundles")
    )]
    NotFound(String),

    #[error("Ambiguous reference or ID `{prefix}`: {matches} bundles match")]
    #[diagnostic(
        code(stowage::store::ambiguous),
        help("Use more characters of the ID or the full reference")
    )]
    Ambiguous { prefix: String, matches: usize },

    #[error("Failed to serialize bundle: {0}")]
    #[diagnostic(code(stowage::store::serialize))]
    Serialize(#[from] serde_json::Error),

    #[error("Bundle ID `{reference}` does not match its content digest {content}")]
    #[diagnostic(
        code(stowage::store::id_mismatch),
        help("Use a `name:tag` reference, or the bundle's own content digest as its ID")
    )]
    IdMismatch {
        reference: String,
        content: Sha256Digest,
    },

    #[error("Corrupted store entry `{}`: {reason}", .path.display())]
    #[diagnostic(
        code(stowage::store::corrupted),
        help("Remove the affected bundle and store it again")
    )]
    Corrupted { path: PathBuf, reason: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Reference(#[from] ReferenceError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    FileSystem(#[from] FileSystemError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Lock(#[from] LockError),

    #[error("Thread lock poison error")]
    #[diagnostic(
        code(stowage::poison),
        help("This is an internal error, please report it")
    )]
    PoisonError,
}

impl<T> From<std::sync::PoisonError<T>> for StoreError {
    fn from(_: std::sync::PoisonError<T>) -> Self {
        Self::PoisonError
    }
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Top-level error type for stowage operations.
#[derive(Error, Diagnostic, Debug)]
pub enum StowageError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Reference(#[from] ReferenceError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    FileSystemError(#[from] FileSystemError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    PathError(#[from] PathError),

    #[error("Invalid bundle file `{}`: {source}", .path.display())]
    #[diagnostic(
        code(stowage::bundle_file),
        help("Bundle files must contain a single JSON bundle document")
    )]
    InvalidBundleFile {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Error while {action}")]
    #[diagnostic(code(stowage::io), help("Check file permissions and disk space"))]
    IoError {
        action: String,
        #[source]
        source: std::io::Error,
    },
}

/// Trait for adding context to IO errors.
pub trait ErrorContext<T> {
    fn with_context<C>(self, context: C) -> std::result::Result<T, StowageError>
    where
        C: FnOnce() -> String;
}

impl<T> ErrorContext<T> for std::io::Result<T> {
    fn with_context<C>(self, context: C) -> std::result::Result<T, StowageError>
    where
        C: FnOnce() -> String,
    {
        self.map_err(|err| {
            StowageError::IoError {
                action: context(),
                source: err,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;

    #[test]
    fn test_store_error_messages() {
        assert_eq!(
            StoreError::NotFound("foo:latest".to_string()).to_string(),
            "Bundle not found: foo:latest"
        );
        assert_eq!(
            StoreError::Ambiguous {
                prefix: "3f".to_string(),
                matches: 2,
            }
            .to_string(),
            "Ambiguous reference or ID `3f`: 2 bundles match"
        );
    }

    #[test]
    fn test_transparent_errors() {
        let error = StowageError::from(StoreError::from(ReferenceError::Empty));
        assert_eq!(error.to_string(), "Reference is empty");
    }

    #[test]
    fn test_error_context() {
        let result: io::Result<()> = Err(io::Error::new(io::ErrorKind::Other, "boom"));
        let error = result
            .with_context(|| "writing listing".to_string())
            .unwrap_err();
        assert_eq!(error.to_string(), "Error while writing listing");
    }
}
