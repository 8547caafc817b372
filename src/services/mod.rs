pub mod basket;
pub mod catalog;

// Re-export services for convenience
pub use basket::{AddOutcome, BasketItemView, BasketService, BasketView};
pub use catalog::CatalogService;
