//! Single-entry dynamic catalog cache, one per backend adapter

use tokio::sync::RwLock;

use super::fingerprint::Fingerprint;
use crate::domain::llm::ModelDescriptor;

/// Stored dynamic catalog together with the fingerprint that produced it
#[derive(Debug, Clone)]
pub struct CatalogCacheEntry {
    pub fingerprint: Fingerprint,
    pub models: Vec<ModelDescriptor>,
}

/// Whole-catalog replace-or-miss cache.
///
/// Entries are swapped atomically under the lock, so readers never observe a
/// partially written catalog.
#[derive(Debug, Default)]
pub struct CatalogCache {
    entry: RwLock<Option<CatalogCacheEntry>>,
}

impl CatalogCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached models if the stored fingerprint matches; a stale
    /// entry is discarded.
    pub async fn get(&self, fingerprint: &Fingerprint) -> Option<Vec<ModelDescriptor>> {
        {
            let entry = self.entry.read().await;
            match entry.as_ref() {
                Some(cached) if &cached.fingerprint == fingerprint => {
                    return Some(cached.models.clone());
                }
                None => return None,
                Some(_) => {}
            }
        }

        let mut entry = self.entry.write().await;
        // Another writer may have stored a matching entry in the meantime.
        match entry.as_ref() {
            Some(cached) if &cached.fingerprint == fingerprint => Some(cached.models.clone()),
            _ => {
                *entry = None;
                None
            }
        }
    }

    /// Store `models` under `fingerprint`, replacing any prior entry
    pub async fn put(&self, fingerprint: Fingerprint, models: Vec<ModelDescriptor>) {
        *self.entry.write().await = Some(CatalogCacheEntry {
            fingerprint,
            models,
        });
    }

    pub async fn clear(&self) {
        *self.entry.write().await = None;
    }

    pub async fn is_empty(&self) -> bool {
        self.entry.read().await.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::llm::{BackendConfig, ProviderRequest};

    fn fingerprint(key: &str) -> Fingerprint {
        let backend = BackendConfig::new("Cerebras");
        let request = ProviderRequest::new().with_api_key("Cerebras", key);
        Fingerprint::compute(&backend, &request).unwrap()
    }

    fn models() -> Vec<ModelDescriptor> {
        vec![ModelDescriptor::new("llama-4", "llama-4 (Dynamic)", "Cerebras", 32000)]
    }

    #[tokio::test]
    async fn test_empty_cache_misses() {
        let cache = CatalogCache::new();
        assert!(cache.get(&fingerprint("a")).await.is_none());
    }

    #[tokio::test]
    async fn test_put_then_get_hits() {
        let cache = CatalogCache::new();
        cache.put(fingerprint("a"), models()).await;

        assert_eq!(cache.get(&fingerprint("a")).await, Some(models()));
    }

    #[tokio::test]
    async fn test_mismatch_discards_entry() {
        let cache = CatalogCache::new();
        cache.put(fingerprint("a"), models()).await;

        assert!(cache.get(&fingerprint("b")).await.is_none());
        assert!(cache.is_empty().await);
        assert!(cache.get(&fingerprint("a")).await.is_none());
    }

    #[tokio::test]
    async fn test_put_replaces_wholesale() {
        let cache = CatalogCache::new();
        cache.put(fingerprint("a"), models()).await;
        cache.put(fingerprint("b"), Vec::new()).await;

        assert_eq!(cache.get(&fingerprint("b")).await, Some(Vec::new()));
    }

    #[tokio::test]
    async fn test_clear() {
        let cache = CatalogCache::new();
        cache.put(fingerprint("a"), models()).await;
        cache.clear().await;

        assert!(cache.is_empty().await);
    }
}
