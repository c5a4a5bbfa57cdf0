//! The product store contract

use async_trait::async_trait;
use catalog_core::{NewProduct, Product, ProductFilter, ProductId, Result};

/// Canonical owner of the product record set.
///
/// `get` and `update` fail with `CatalogError::ProductNotFound` for an unknown
/// id. `delete` succeeds whether or not the id exists. `list` returns matches
/// in insertion order.
#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn create(&self, product: NewProduct) -> Result<Product>;

    async fn get(&self, id: ProductId) -> Result<Product>;

    async fn update(&self, id: ProductId, product: NewProduct) -> Result<Product>;

    async fn delete(&self, id: ProductId) -> Result<()>;

    async fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>>;
}
