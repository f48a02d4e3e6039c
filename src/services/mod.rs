//! Business logic services

pub mod aggregate;
pub mod catalog;

use std::sync::Arc;

use crate::repository::CatalogStore;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub catalog: catalog::CatalogService,
}

impl Services {
    /// Create all services on top of the given store
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self {
            catalog: catalog::CatalogService::new(store),
        }
    }
}
