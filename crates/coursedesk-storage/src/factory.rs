#[cfg(feature = "store-http")]
use crate::HttpTopicStore;
#[cfg(feature = "store-memory")]
use crate::InMemoryTopicStore;
use crate::{StoreBackend, StoreError, StoreResult, TopicStore};
use coursedesk_core::Config;
use std::sync::Arc;

/// Create a catalog store based on configuration
pub fn create_store(config: &Config) -> StoreResult<Arc<dyn TopicStore>> {
    match config.store_backend {
        #[cfg(feature = "store-http")]
        StoreBackend::Http => {
            let store = HttpTopicStore::from_config(config)?;
            tracing::debug!(api_url = %config.api_url, "Using HTTP catalog store");
            Ok(Arc::new(store))
        }

        #[cfg(not(feature = "store-http"))]
        StoreBackend::Http => Err(StoreError::Config(
            "HTTP store backend not available (store-http feature not enabled)".to_string(),
        )),

        #[cfg(feature = "store-memory")]
        StoreBackend::Memory => {
            if config.is_production() {
                return Err(StoreError::Config(
                    "Memory store backend cannot be used in production".to_string(),
                ));
            }
            tracing::warn!("Using in-memory catalog store seeded with sample topics");
            Ok(Arc::new(InMemoryTopicStore::with_topics(
                InMemoryTopicStore::sample_catalog(),
            )))
        }

        #[cfg(not(feature = "store-memory"))]
        StoreBackend::Memory => Err(StoreError::Config(
            "Memory store backend not available (store-memory feature not enabled)".to_string(),
        )),
    }
}
