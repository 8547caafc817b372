use crate::{
    entities::{basket, basket_item, Basket, BasketItem, BasketModel, Product},
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    ModelTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;

/// Basket service managing a buyer's in-progress item collection.
///
/// Buyer identity is an explicit parameter on every operation; the service
/// holds no request-scoped state. Each write runs in one transaction that is
/// committed atomically.
#[derive(Clone)]
pub struct BasketService {
    db: Arc<DatabaseConnection>,
    event_sender: Arc<EventSender>,
}

impl BasketService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: Arc<EventSender>) -> Self {
        Self { db, event_sender }
    }

    /// Retrieves the basket for a buyer identity, with items and their
    /// product details. Never creates a basket.
    #[instrument(skip(self))]
    pub async fn get_basket(&self, buyer_id: &str) -> Result<BasketView, ServiceError> {
        let basket = Basket::find()
            .filter(basket::Column::BuyerId.eq(buyer_id))
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Basket not found".to_string()))?;

        self.load_view(&*self.db, basket).await
    }

    /// Adds `quantity` of a product to the buyer's basket, creating the
    /// basket if none exists for that identity.
    ///
    /// If the basket already holds an item for the product, quantities merge;
    /// otherwise a new item is appended. The product must exist in the
    /// catalog, and it is resolved before the basket is touched so a failed
    /// lookup never creates or mutates anything.
    ///
    /// Returns the updated basket view and whether a basket was created, so
    /// the HTTP layer knows to issue an identity cookie.
    #[instrument(skip(self))]
    pub async fn add_item(
        &self,
        buyer_id: &str,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<AddOutcome, ServiceError> {
        require_positive(quantity)?;

        let txn = self.db.begin().await?;

        if Product::find_by_id(product_id).one(&txn).await?.is_none() {
            return Err(ServiceError::Validation("Product not found".to_string()));
        }

        let existing = Basket::find()
            .filter(basket::Column::BuyerId.eq(buyer_id))
            .one(&txn)
            .await?;
        let created = existing.is_none();
        let basket = match existing {
            Some(basket) => basket,
            None => {
                let now = Utc::now();
                basket::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    buyer_id: Set(buyer_id.to_string()),
                    created_at: Set(now),
                    updated_at: Set(now),
                }
                .insert(&txn)
                .await?
            }
        };

        let existing_item = BasketItem::find()
            .filter(basket_item::Column::BasketId.eq(basket.id))
            .filter(basket_item::Column::ProductId.eq(product_id))
            .one(&txn)
            .await?;

        if let Some(item) = existing_item {
            // The merged quantity must stay representable and positive.
            let merged = item.quantity.checked_add(quantity).ok_or_else(|| {
                ServiceError::Validation("Quantity exceeds the supported maximum".to_string())
            })?;
            let mut item: basket_item::ActiveModel = item.into();
            item.quantity = Set(merged);
            item.updated_at = Set(Utc::now());
            item.update(&txn).await?;
        } else {
            basket_item::ActiveModel {
                id: Set(Uuid::new_v4()),
                basket_id: Set(basket.id),
                product_id: Set(product_id),
                quantity: Set(quantity),
                created_at: Set(Utc::now()),
                updated_at: Set(Utc::now()),
            }
            .insert(&txn)
            .await?;
        }

        let basket_id = basket.id;
        let mut touched: basket::ActiveModel = basket.into();
        touched.updated_at = Set(Utc::now());
        let basket = touched.update(&txn).await?;

        let view = self.load_view(&txn, basket).await?;

        txn.commit().await.map_err(|err| {
            error!("Failed to commit basket save: {}", err);
            ServiceError::Persistence("Problem saving items to basket".to_string())
        })?;

        if created {
            self.event_sender
                .send_or_log(Event::BasketCreated(basket_id))
                .await;
        }
        self.event_sender
            .send_or_log(Event::BasketItemAdded {
                basket_id,
                product_id,
                quantity,
            })
            .await;

        info!(
            "Added item to basket {}: product {} x{}",
            basket_id, product_id, quantity
        );
        Ok(AddOutcome {
            basket: view,
            created,
        })
    }

    /// Decrements `quantity` of a product from the buyer's basket.
    ///
    /// A remainder of zero or below deletes the item row. Removing a product
    /// that is not in the basket is a no-op. Fails with `NotFound` when no
    /// basket exists for the identity.
    #[instrument(skip(self))]
    pub async fn remove_item(
        &self,
        buyer_id: &str,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<(), ServiceError> {
        require_positive(quantity)?;

        let txn = self.db.begin().await?;

        let basket = Basket::find()
            .filter(basket::Column::BuyerId.eq(buyer_id))
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Basket not found".to_string()))?;

        let item = BasketItem::find()
            .filter(basket_item::Column::BasketId.eq(basket.id))
            .filter(basket_item::Column::ProductId.eq(product_id))
            .one(&txn)
            .await?;

        let Some(item) = item else {
            // Removing a product that is not in the basket is idempotent.
            txn.commit().await?;
            return Ok(());
        };

        match decremented(item.quantity, quantity) {
            Some(remaining) => {
                let mut item: basket_item::ActiveModel = item.into();
                item.quantity = Set(remaining);
                item.updated_at = Set(Utc::now());
                item.update(&txn).await?;
            }
            None => {
                item.delete(&txn).await?;
            }
        }

        let basket_id = basket.id;
        let mut touched: basket::ActiveModel = basket.into();
        touched.updated_at = Set(Utc::now());
        touched.update(&txn).await?;

        txn.commit().await.map_err(|err| {
            error!("Failed to commit basket item removal: {}", err);
            ServiceError::Persistence("Problem removing item from the basket".to_string())
        })?;

        self.event_sender
            .send_or_log(Event::BasketItemRemoved {
                basket_id,
                product_id,
                quantity,
            })
            .await;

        info!(
            "Removed item from basket {}: product {} x{}",
            basket_id, product_id, quantity
        );
        Ok(())
    }

    /// Assembles the read view: items in insertion order, each joined with
    /// its product.
    async fn load_view(
        &self,
        conn: &impl ConnectionTrait,
        basket: BasketModel,
    ) -> Result<BasketView, ServiceError> {
        let rows = BasketItem::find()
            .filter(basket_item::Column::BasketId.eq(basket.id))
            .find_also_related(Product)
            .order_by_asc(basket_item::Column::CreatedAt)
            .order_by_asc(basket_item::Column::Id)
            .all(conn)
            .await?;

        let mut items = Vec::with_capacity(rows.len());
        for (item, product) in rows {
            let product = product.ok_or_else(|| {
                DbErr::Custom(format!(
                    "basket item {} references missing product {}",
                    item.id, item.product_id
                ))
            })?;
            items.push(BasketItemView {
                product_id: item.product_id,
                name: product.name,
                price: product.price,
                picture_url: product.picture_url,
                product_type: product.product_type,
                brand: product.brand,
                quantity: item.quantity,
            });
        }

        Ok(BasketView {
            id: basket.id,
            buyer_id: basket.buyer_id,
            items,
        })
    }
}

fn require_positive(quantity: i32) -> Result<(), ServiceError> {
    if quantity < 1 {
        return Err(ServiceError::Validation(
            "Quantity must be at least 1".to_string(),
        ));
    }
    Ok(())
}

/// Quantity left after a decrement, or `None` when the item should be
/// removed entirely (remainder clamped at zero, never stored negative).
fn decremented(current: i32, by: i32) -> Option<i32> {
    let remaining = current - by;
    (remaining > 0).then_some(remaining)
}

/// Read view of a basket
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BasketView {
    pub id: Uuid,
    pub buyer_id: String,
    pub items: Vec<BasketItemView>,
}

/// Read view of a basket item, joined with its product
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BasketItemView {
    pub product_id: Uuid,
    pub name: String,
    pub price: Decimal,
    pub picture_url: String,
    pub product_type: String,
    pub brand: String,
    pub quantity: i32,
}

/// Result of an add operation; `created` is true when the basket was minted
/// for a new buyer identity during this call.
#[derive(Debug)]
pub struct AddOutcome {
    pub basket: BasketView,
    pub created: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn decrement_leaves_positive_remainder() {
        assert_eq!(decremented(5, 2), Some(3));
        assert_eq!(decremented(5, 4), Some(1));
    }

    #[test]
    fn decrement_to_zero_or_below_removes_item() {
        assert_eq!(decremented(5, 5), None);
        assert_eq!(decremented(2, 7), None);
    }

    #[test]
    fn non_positive_quantities_are_rejected() {
        assert!(require_positive(1).is_ok());
        assert!(matches!(
            require_positive(0),
            Err(ServiceError::Validation(_))
        ));
        assert!(matches!(
            require_positive(-3),
            Err(ServiceError::Validation(_))
        ));
    }

    #[test]
    fn basket_view_serializes_item_fields() {
        let view = BasketView {
            id: Uuid::new_v4(),
            buyer_id: "buyer-1".to_string(),
            items: vec![BasketItemView {
                product_id: Uuid::new_v4(),
                name: "Board".to_string(),
                price: dec!(199.99),
                picture_url: "https://img.example.com/board.png".to_string(),
                product_type: "Boards".to_string(),
                brand: "Angular".to_string(),
                quantity: 2,
            }],
        };

        let json = serde_json::to_value(&view).expect("serialize view");
        assert_eq!(json["buyer_id"], "buyer-1");
        assert_eq!(json["items"][0]["name"], "Board");
        assert_eq!(json["items"][0]["quantity"], 2);
        assert_eq!(json["items"][0]["price"], "199.99");
    }
}
