//! # Catalog Service
//!
//! REST resource over the in-memory product store. [`app`] builds the router
//! so it can be served by `main` or exercised in-process by tests.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use catalog_core::{endpoints, CatalogError, NewProduct, Product, ProductFilter, ProductId, VERSION};
use chrono::Utc;
use product_store::{InMemoryProductStore, ProductStore};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info, instrument, warn};

const SERVICE_NAME: &str = "catalog-service";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub bind_addr: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
        }
    }
}

impl ServiceConfig {
    /// Read `CATALOG_BIND_ADDR`, falling back to the default address.
    pub fn from_env() -> Self {
        match std::env::var("CATALOG_BIND_ADDR") {
            Ok(bind_addr) if !bind_addr.trim().is_empty() => Self { bind_addr },
            _ => Self::default(),
        }
    }
}

pub fn app(store: InMemoryProductStore) -> Router {
    Router::new()
        .route(endpoints::INDEX, get(index))
        .route(endpoints::HEALTH, get(health_check))
        .route(endpoints::METRICS, get(metrics))
        .route(
            endpoints::PRODUCTS,
            get(list_products).post(create_product),
        )
        .route(
            endpoints::PRODUCT_BY_ID,
            get(get_product).put(update_product).delete(delete_product),
        )
        .with_state(store)
}

/// JSON error body: `{error, message, code, timestamp}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        let status = match &err {
            CatalogError::ProductNotFound { .. } => StatusCode::NOT_FOUND,
            CatalogError::StoreUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            CatalogError::InvalidProduct { .. }
            | CatalogError::InvalidPrice { .. }
            | CatalogError::UnknownCategory { .. }
            | CatalogError::SerializationError { .. } => StatusCode::BAD_REQUEST,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            warn!("Request failed: {}", self.message);
        } else {
            debug!("Request rejected ({}): {}", self.status, self.message);
        }
        let body = json!({
            "error": self.status.canonical_reason().unwrap_or("Error"),
            "message": self.message,
            "code": self.status.as_u16(),
            "timestamp": Utc::now().to_rfc3339(),
        });
        (self.status, Json(body)).into_response()
    }
}

#[instrument]
async fn index() -> Json<Value> {
    Json(json!({
        "name": "Product Catalog Administration",
        "version": VERSION,
        "products": endpoints::PRODUCTS
    }))
}

#[instrument]
async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": SERVICE_NAME,
        "version": VERSION
    }))
}

#[instrument(skip(store))]
async fn metrics(State(store): State<InMemoryProductStore>) -> Json<Value> {
    let stats = store.stats();
    Json(json!({
        "service": SERVICE_NAME,
        "total_products": stats.total_products,
        "available_products": stats.available_products
    }))
}

#[instrument(skip_all)]
async fn list_products(
    State(store): State<InMemoryProductStore>,
    query: Result<Query<ProductFilter>, QueryRejection>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let Query(filter) = query?;
    let products = store.list(&filter).await?;
    debug!("Listing {} products for {:?}", products.len(), filter);
    Ok(Json(products))
}

#[instrument(skip_all)]
async fn create_product(
    State(store): State<InMemoryProductStore>,
    payload: Result<Json<NewProduct>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(product) = payload?;
    let product = store.create(product).await?;
    info!("Created product {} ({})", product.id, product.name);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, endpoints::product(product.id))],
        Json(product),
    ))
}

#[instrument(skip_all)]
async fn get_product(
    State(store): State<InMemoryProductStore>,
    id: Result<Path<ProductId>, PathRejection>,
) -> Result<Json<Product>, ApiError> {
    let Path(id) = id?;
    Ok(Json(store.get(id).await?))
}

#[instrument(skip_all)]
async fn update_product(
    State(store): State<InMemoryProductStore>,
    id: Result<Path<ProductId>, PathRejection>,
    payload: Result<Json<NewProduct>, JsonRejection>,
) -> Result<Json<Product>, ApiError> {
    let Path(id) = id?;
    let Json(product) = payload?;
    let product = store.update(id, product).await?;
    info!("Updated product {}", product.id);
    Ok(Json(product))
}

#[instrument(skip_all)]
async fn delete_product(
    State(store): State<InMemoryProductStore>,
    id: Result<Path<ProductId>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;
    store.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
