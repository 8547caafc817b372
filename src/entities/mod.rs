pub mod basket;
pub mod basket_item;
pub mod product;

// Re-export entities
pub use basket::{Entity as Basket, Model as BasketModel};
pub use basket_item::{Entity as BasketItem, Model as BasketItemModel};
pub use product::{Entity as Product, Model as ProductModel};
