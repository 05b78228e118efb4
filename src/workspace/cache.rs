// Author: Dustin Pilgrim
// License: MIT

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info};

use crate::document::ThemeDocument;

/// Outcome of [`ThemeCache::publish`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refresh {
    /// New or changed content; dependent views should be invalidated.
    Updated,
    /// Same fingerprint as the document already held; nothing replaced.
    Unchanged,
}

/// Host-owned map from a source key (project id, file path, ...) to the
/// theme document currently published for it.
///
/// Documents are shared as `Arc`s and replaced wholesale. There is no
/// locking here; wrap the cache in whatever the host uses for shared state.
#[derive(Debug, Default)]
pub struct ThemeCache {
    documents: HashMap<String, Arc<ThemeDocument>>,
}

impl ThemeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&mut self, key: impl Into<String>, document: ThemeDocument) -> Refresh {
        let key = key.into();

        if let Some(current) = self.documents.get(&key)
            && current.fingerprint() == document.fingerprint()
        {
            debug!("Theme for '{}' unchanged", key);
            return Refresh::Unchanged;
        }

        info!("Publishing theme for '{}' (top-level keys: {:?})", key, document.top_level_keys());
        self.documents.insert(key, Arc::new(document));
        Refresh::Updated
    }

    pub fn get(&self, key: &str) -> Option<Arc<ThemeDocument>> {
        self.documents.get(key).cloned()
    }

    pub fn remove(&mut self, key: &str) -> Option<Arc<ThemeDocument>> {
        self.documents.remove(key)
    }

    pub fn clear(&mut self) {
        self.documents.clear();
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}
