use std::path::PathBuf;

use stowage_core::{
    bundle::Bundle,
    digest::ContentId,
    reference::{DigestedReference, Reference},
};
use stowage_utils::hash::Sha256Digest;

// ---- List ----

/// Output switches for a bundle listing.
#[derive(Debug, Default, Clone, Copy)]
pub struct ListOptions {
    /// Only print the content IDs, one per line.
    pub quiet: bool,
    /// Add a DIGEST column between TAG and APP IMAGE ID.
    pub digests: bool,
}

/// One stored entry projected for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleRow {
    pub repository: String,
    pub tag: Option<String>,
    pub digest: Option<Sha256Digest>,
    pub id: ContentId,
    pub name: String,
}

// ---- Inspect ----

/// A resolved bundle together with its identifiers.
#[derive(Debug, Clone)]
pub struct InspectReport {
    pub reference: Reference,
    pub id: ContentId,
    pub digest: Sha256Digest,
    pub bundle: Bundle,
}

// ---- Remove ----

/// References removed by a remove operation, in request order.
#[derive(Debug, Default)]
pub struct RemoveReport {
    pub removed: Vec<Reference>,
}

// ---- Tag ----

#[derive(Debug)]
pub struct TagReport {
    pub source: Reference,
    pub target: Reference,
    pub digest: DigestedReference,
}

// ---- Import ----

#[derive(Debug)]
pub struct ImportReport {
    pub path: PathBuf,
    pub reference: Reference,
    pub digest: DigestedReference,
    pub id: ContentId,
}
