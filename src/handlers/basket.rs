use crate::{
    errors::ServiceError,
    handlers::common::{success_response, validate_input},
    AppState,
};
use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;
use uuid::Uuid;
use validator::Validate;

/// Name of the anonymous identity cookie
pub const BUYER_ID_COOKIE: &str = "buyerId";

/// Creates the router for basket endpoints
pub fn basket_routes() -> Router<Arc<AppState>> {
    Router::new().route(
        "/",
        get(get_basket)
            .post(add_item_to_basket)
            .delete(remove_basket_item),
    )
}

// Request DTOs

/// Query parameters shared by the add and remove operations
#[derive(Debug, Deserialize, Validate, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ItemParams {
    pub product_id: Uuid,
    #[validate(range(min = 1))]
    pub quantity: i32,
}

/// Fetch the caller's basket
#[utoipa::path(
    get,
    path = "/api/basket",
    tag = "basket",
    responses(
        (status = 200, description = "The caller's basket", body = crate::services::BasketView),
        (status = 404, description = "No basket for this identity", body = crate::errors::ErrorResponse)
    )
)]
pub async fn get_basket(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<impl IntoResponse, ServiceError> {
    let buyer_id = buyer_identity(&jar)
        .ok_or_else(|| ServiceError::NotFound("Basket not found".to_string()))?;

    let view = state.services.basket.get_basket(&buyer_id).await?;

    Ok(success_response(view))
}

/// Add a product to the caller's basket, creating the basket on first use
#[utoipa::path(
    post,
    path = "/api/basket",
    tag = "basket",
    params(ItemParams),
    responses(
        (status = 201, description = "Updated basket view", body = crate::services::BasketView,
         headers(("Location" = String, description = "Basket retrieval URL"))),
        (status = 400, description = "Unknown product, invalid quantity, or failed save", body = crate::errors::ErrorResponse)
    )
)]
pub async fn add_item_to_basket(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Query(params): Query<ItemParams>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&params)?;

    // Reuse the presented identity if there is one; otherwise mint a fresh
    // token for the basket the service is about to create.
    let buyer_id = buyer_identity(&jar).unwrap_or_else(|| Uuid::new_v4().to_string());

    let outcome = state
        .services
        .basket
        .add_item(&buyer_id, params.product_id, params.quantity)
        .await?;

    // The identity cookie is issued exactly once, when the basket is created.
    let jar = if outcome.created {
        jar.add(buyer_cookie(&buyer_id, state.config.buyer_cookie_ttl_days))
    } else {
        jar
    };

    Ok((
        StatusCode::CREATED,
        jar,
        [(header::LOCATION, "/api/basket")],
        Json(outcome.basket),
    ))
}

/// Remove a quantity of a product from the caller's basket
#[utoipa::path(
    delete,
    path = "/api/basket",
    tag = "basket",
    params(ItemParams),
    responses(
        (status = 200, description = "Item decremented or removed"),
        (status = 404, description = "No basket for this identity", body = crate::errors::ErrorResponse),
        (status = 400, description = "Invalid quantity or failed save", body = crate::errors::ErrorResponse)
    )
)]
pub async fn remove_basket_item(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Query(params): Query<ItemParams>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&params)?;

    let buyer_id = buyer_identity(&jar)
        .ok_or_else(|| ServiceError::NotFound("Basket not found".to_string()))?;

    state
        .services
        .basket
        .remove_item(&buyer_id, params.product_id, params.quantity)
        .await?;

    Ok(StatusCode::OK)
}

fn buyer_identity(jar: &CookieJar) -> Option<String> {
    jar.get(BUYER_ID_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.is_empty())
}

// The buyer cookie is strictly necessary for the basket to function, so it
// stays exempt from consent gating. Not HttpOnly: the storefront reads it.
fn buyer_cookie(buyer_id: &str, ttl_days: i64) -> Cookie<'static> {
    Cookie::build((BUYER_ID_COOKIE, buyer_id.to_string()))
        .path("/")
        .same_site(SameSite::Lax)
        .max_age(time::Duration::days(ttl_days))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buyer_cookie_carries_contract_attributes() {
        let cookie = buyer_cookie("abc-123", 30);
        assert_eq!(cookie.name(), BUYER_ID_COOKIE);
        assert_eq!(cookie.value(), "abc-123");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.max_age(), Some(time::Duration::days(30)));
    }

    #[test]
    fn empty_cookie_value_is_no_identity() {
        let jar = CookieJar::new().add(Cookie::new(BUYER_ID_COOKIE, ""));
        assert_eq!(buyer_identity(&jar), None);

        let jar = CookieJar::new().add(Cookie::new(BUYER_ID_COOKIE, "buyer-1"));
        assert_eq!(buyer_identity(&jar), Some("buyer-1".to_string()));
    }

    #[test]
    fn item_params_reject_non_positive_quantity() {
        let params = ItemParams {
            product_id: Uuid::new_v4(),
            quantity: 0,
        };
        assert!(params.validate().is_err());

        let params = ItemParams {
            product_id: Uuid::new_v4(),
            quantity: 3,
        };
        assert!(params.validate().is_ok());
    }
}
