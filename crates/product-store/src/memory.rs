//! In-memory product store
//!
//! Lock-free map keyed by id. Ids are handed out from a monotonic counter, so
//! sorting by id yields insertion order.

use async_trait::async_trait;
use catalog_core::{CatalogError, NewProduct, Product, ProductFilter, ProductId, Result};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::store::ProductStore;

#[derive(Clone)]
pub struct InMemoryProductStore {
    products: Arc<DashMap<ProductId, Product>>,
    next_id: Arc<AtomicU64>,
}

impl std::fmt::Debug for InMemoryProductStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryProductStore")
            .field("products_count", &self.products.len())
            .field("next_id", &self.next_id.load(Ordering::Relaxed))
            .finish()
    }
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        debug!("Initializing in-memory product store");
        Self {
            products: Arc::new(DashMap::new()),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Store statistics for monitoring
    pub fn stats(&self) -> StoreStats {
        StoreStats {
            total_products: self.products.len(),
            available_products: self
                .products
                .iter()
                .filter(|entry| entry.value().available)
                .count(),
        }
    }
}

impl Default for InMemoryProductStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    #[instrument(skip(self, product), fields(name = %product.name))]
    async fn create(&self, product: NewProduct) -> Result<Product> {
        product.validate()?;
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let product = Product::new(id, product);
        self.products.insert(id, product.clone());
        info!("Product '{}' created with id {}", product.name, id);
        Ok(product)
    }

    async fn get(&self, id: ProductId) -> Result<Product> {
        self.products
            .get(&id)
            .map(|entry| entry.value().clone())
            .ok_or(CatalogError::ProductNotFound { id })
    }

    #[instrument(skip(self, product))]
    async fn update(&self, id: ProductId, product: NewProduct) -> Result<Product> {
        product.validate()?;
        let mut entry = self
            .products
            .get_mut(&id)
            .ok_or(CatalogError::ProductNotFound { id })?;
        entry.apply(product);
        info!("Product {} updated", id);
        Ok(entry.value().clone())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: ProductId) -> Result<()> {
        match self.products.remove(&id) {
            Some(_) => info!("Product {} deleted", id),
            None => debug!("Product {} already absent", id),
        }
        Ok(())
    }

    async fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>> {
        let mut matches: Vec<Product> = self
            .products
            .iter()
            .filter(|entry| filter.matches(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        matches.sort_by_key(|product| product.id);
        Ok(matches)
    }
}

/// Store statistics for monitoring
#[derive(Debug, Serialize, Deserialize)]
pub struct StoreStats {
    pub total_products: usize,
    pub available_products: usize,
}
