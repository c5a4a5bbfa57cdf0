//! Error types for the product catalog

use thiserror::Error;

use crate::product::ProductId;

pub type Result<T> = std::result::Result<T, CatalogError>;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Product with id '{id}' was not found.")]
    ProductNotFound { id: ProductId },

    #[error("Invalid product: {reason}")]
    InvalidProduct { reason: String },

    #[error("Invalid price: '{value}'")]
    InvalidPrice { value: String },

    #[error("Unknown category: '{value}'")]
    UnknownCategory { value: String },

    #[error("Product store unavailable: {reason}")]
    StoreUnavailable { reason: String },

    #[error("Serialization error: {source}")]
    SerializationError {
        #[from]
        source: serde_json::Error,
    },
}

impl CatalogError {
    /// True for the recoverable "no such product" outcome.
    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::ProductNotFound { .. })
    }
}
