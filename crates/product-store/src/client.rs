//! HTTP-backed product store talking to a running catalog service

use async_trait::async_trait;
use catalog_core::{endpoints, CatalogError, NewProduct, Product, ProductFilter, ProductId, Result};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::store::ProductStore;

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

#[derive(Debug, Clone)]
pub struct HttpProductStore {
    base_url: String,
    http_client: reqwest::Client,
}

impl HttpProductStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http_client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn decode<T: DeserializeOwned>(response: Response, id: Option<ProductId>) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            return response.json::<T>().await.map_err(unavailable);
        }

        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.message,
            Err(_) => status.to_string(),
        };
        debug!("Service answered {}: {}", status, message);

        match (status, id) {
            (StatusCode::NOT_FOUND, Some(id)) => Err(CatalogError::ProductNotFound { id }),
            (StatusCode::BAD_REQUEST, _) => Err(CatalogError::InvalidProduct { reason: message }),
            _ => Err(CatalogError::StoreUnavailable {
                reason: format!("{status}: {message}"),
            }),
        }
    }
}

fn unavailable(err: reqwest::Error) -> CatalogError {
    CatalogError::StoreUnavailable {
        reason: err.to_string(),
    }
}

#[async_trait]
impl ProductStore for HttpProductStore {
    #[instrument(skip(self, product), fields(name = %product.name))]
    async fn create(&self, product: NewProduct) -> Result<Product> {
        let response = self
            .http_client
            .post(self.url(endpoints::PRODUCTS))
            .json(&product)
            .send()
            .await
            .map_err(unavailable)?;
        Self::decode(response, None).await
    }

    #[instrument(skip(self))]
    async fn get(&self, id: ProductId) -> Result<Product> {
        let response = self
            .http_client
            .get(self.url(&endpoints::product(id)))
            .send()
            .await
            .map_err(unavailable)?;
        Self::decode(response, Some(id)).await
    }

    #[instrument(skip(self, product))]
    async fn update(&self, id: ProductId, product: NewProduct) -> Result<Product> {
        let response = self
            .http_client
            .put(self.url(&endpoints::product(id)))
            .json(&product)
            .send()
            .await
            .map_err(unavailable)?;
        Self::decode(response, Some(id)).await
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: ProductId) -> Result<()> {
        let response = self
            .http_client
            .delete(self.url(&endpoints::product(id)))
            .send()
            .await
            .map_err(unavailable)?;

        match response.status() {
            status if status.is_success() || status == StatusCode::NOT_FOUND => Ok(()),
            status => Err(CatalogError::StoreUnavailable {
                reason: format!("delete of product {id} answered {status}"),
            }),
        }
    }

    #[instrument(skip(self))]
    async fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>> {
        let response = self
            .http_client
            .get(self.url(endpoints::PRODUCTS))
            .query(filter)
            .send()
            .await
            .map_err(unavailable)?;
        Self::decode(response, None).await
    }
}
