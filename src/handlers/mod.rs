pub mod basket;
pub mod common;
pub mod health;
pub mod products;

use crate::{
    events::EventSender,
    services::{BasketService, CatalogService},
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;

// Re-export route builders
pub use basket::basket_routes;
pub use products::products_routes;

/// Services shared by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub basket: BasketService,
    pub catalog: CatalogService,
}

impl AppServices {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: Arc<EventSender>) -> Self {
        Self {
            basket: BasketService::new(db.clone(), event_sender),
            catalog: CatalogService::new(db),
        }
    }
}
