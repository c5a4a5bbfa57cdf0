//! # Catalog Core
//!
//! Core types for the product catalog: the product record, its category and
//! price value types, search filters and the shared error type.
//!
//! Every other crate in the workspace speaks in these types, whether it is the
//! store, the REST service or the scenario runner driving the UI.

pub mod error;
pub mod product;

pub use error::{CatalogError, Result};
pub use product::{Category, NewProduct, Price, Product, ProductFilter, ProductId};

/// Current catalog version for compatibility checks
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build information for logs
pub const BUILD_INFO: &str = concat!(
    "Catalog ",
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("CARGO_PKG_NAME"),
    ")"
);

/// Standard API endpoints for the catalog service
pub mod endpoints {
    pub const INDEX: &str = "/";
    pub const HEALTH: &str = "/health";
    pub const METRICS: &str = "/metrics";
    pub const PRODUCTS: &str = "/products";
    pub const PRODUCT_BY_ID: &str = "/products/{id}";

    /// Path of a single product resource.
    pub fn product(id: super::ProductId) -> String {
        format!("{PRODUCTS}/{id}")
    }
}
