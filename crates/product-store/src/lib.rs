//! Product storage for the catalog.
//!
//! [`ProductStore`] is the contract every backend honours. The in-memory
//! store backs the service and isolated scenario runs; the HTTP store drives
//! a running catalog service.

pub use catalog_core;

mod client;
mod memory;
mod store;

pub use client::HttpProductStore;
pub use memory::{InMemoryProductStore, StoreStats};
pub use store::ProductStore;

// Re-export core types for convenience
pub use catalog_core::{
    CatalogError, Category, NewProduct, Price, Product, ProductFilter, ProductId, Result,
};
