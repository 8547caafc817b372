use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Basket API",
        version = "0.1.0",
        description = r#"
# Basket API

Shopping basket backend for an e-commerce storefront.

Buyers are anonymous: the `buyerId` cookie correlates a client with its
basket across requests and is minted on the first successful add. Baskets
are created lazily and never deleted by this service.

## Error Handling

Failed requests return a consistent JSON body:

```json
{
  "error": "Bad Request",
  "message": "Product not found",
  "timestamp": "2024-01-01T00:00:00Z"
}
```
"#
    ),
    paths(
        crate::handlers::basket::get_basket,
        crate::handlers::basket::add_item_to_basket,
        crate::handlers::basket::remove_basket_item,
        crate::handlers::products::list_products,
        crate::handlers::products::get_product,
        crate::handlers::health::health,
    ),
    components(schemas(
        crate::services::BasketView,
        crate::services::BasketItemView,
        crate::entities::product::Model,
        crate::errors::ErrorResponse,
        crate::handlers::health::HealthResponse,
    )),
    tags(
        (name = "basket", description = "Basket retrieval and mutation"),
        (name = "products", description = "Read-only product catalog"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;

/// Mounts Swagger UI backed by the generated OpenAPI document
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_document_lists_basket_paths() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        assert!(paths.iter().any(|p| p.as_str() == "/api/basket"));
        assert!(paths.iter().any(|p| p.as_str() == "/api/products"));
        assert!(paths.iter().any(|p| p.as_str() == "/health"));
    }
}
