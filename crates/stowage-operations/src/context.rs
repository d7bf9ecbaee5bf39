use std::sync::Arc;

use stowage_config::config::Config;
use stowage_core::{
    store::{BundleStore, FileBundleStore},
    StowageResult,
};
use tracing::debug;

/// The store every operation runs against.
#[derive(Clone)]
pub struct StowageContext {
    store: Arc<dyn BundleStore>,
}

impl StowageContext {
    /// Opens the on-disk store named by `config`.
    pub fn new(config: &Config) -> StowageResult<Self> {
        let store_path = config.get_store_path()?;
        debug!(store = %store_path.display(), "creating context");
        let store = FileBundleStore::open(store_path)?;
        Ok(Self::with_store(Arc::new(store)))
    }

    /// Wraps an existing store.
    pub fn with_store(store: Arc<dyn BundleStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &dyn BundleStore {
        self.store.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use stowage_core::{bundle::Bundle, reference::Reference, store::MemoryBundleStore};
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_context_opens_configured_store() {
        let dir = tempdir().unwrap();
        let config = Config {
            store_path: Some(dir.path().join("bundles").to_string_lossy().into_owned()),
            colors: Some(false),
        };
        let ctx = StowageContext::new(&config).unwrap();
        assert!(dir.path().join("bundles").is_dir());
        assert!(ctx.store().list().unwrap().is_empty());
    }

    #[test]
    fn test_context_with_store() {
        let ctx = StowageContext::with_store(Arc::new(MemoryBundleStore::new()));
        let reference: Reference = "app:1".parse().unwrap();
        ctx.store().store(&reference, &Bundle::new("App")).unwrap();
        assert_eq!(ctx.store().list().unwrap(), vec![reference]);
    }
}
