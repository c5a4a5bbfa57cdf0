//! Runner configuration

use product_store::{HttpProductStore, InMemoryProductStore, ProductStore};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::page::DEFAULT_TITLE;

/// Where scenario steps send their store requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum StoreBackend {
    /// A fresh in-memory store per scenario.
    #[default]
    InMemory,
    /// A running catalog service shared by every scenario.
    Remote { base_url: String },
}

impl StoreBackend {
    pub fn open(&self) -> Arc<dyn ProductStore> {
        match self {
            StoreBackend::InMemory => Arc::new(InMemoryProductStore::new()),
            StoreBackend::Remote { base_url } => Arc::new(HttpProductStore::new(base_url.clone())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    pub backend: StoreBackend,
    /// Title the home page is expected to carry.
    pub home_page_title: String,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::InMemory,
            home_page_title: DEFAULT_TITLE.to_string(),
        }
    }
}

impl RunnerConfig {
    pub fn remote(base_url: impl Into<String>) -> Self {
        Self {
            backend: StoreBackend::Remote {
                base_url: base_url.into(),
            },
            ..Self::default()
        }
    }
}
