// Not every test binary exercises every helper.
#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request},
    response::Response,
    routing::get,
    Router,
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, Set};
use tokio::sync::mpsc;
use tower::ServiceExt;
use uuid::Uuid;

use basket_api::{
    config::AppConfig,
    db,
    entities::product,
    events::{self, EventSender},
    handlers::AppServices,
    AppState,
};

/// Helper harness for spinning up an application backed by an in-memory
/// SQLite database.
pub struct TestApp {
    router: Router,
    pub state: Arc<AppState>,
    _event_task: tokio::task::JoinHandle<()>,
}

impl TestApp {
    /// Construct a new test application with fresh database state.
    pub async fn new() -> Self {
        let mut cfg = AppConfig::new(
            "sqlite::memory:".to_string(),
            "127.0.0.1".to_string(),
            0,
            "test".to_string(),
        );
        // A single pooled connection keeps every query on the same in-memory
        // database.
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");

        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let db_arc = Arc::new(pool);
        let (event_tx, event_rx) = mpsc::channel(64);
        let event_sender = EventSender::new(event_tx);
        let event_task = tokio::spawn(events::process_events(event_rx));

        let services = AppServices::new(db_arc.clone(), Arc::new(event_sender.clone()));

        let state = Arc::new(AppState {
            db: db_arc,
            config: cfg,
            event_sender,
            services,
        });

        let router = Router::new()
            .route("/health", get(basket_api::handlers::health::health))
            .merge(basket_api::api_routes())
            .with_state(state.clone());

        Self {
            router,
            state,
            _event_task: event_task,
        }
    }

    /// Insert a catalog product directly into the store.
    pub async fn seed_product(&self, name: &str, price: Decimal) -> product::Model {
        let now = Utc::now();
        product::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            price: Set(price),
            picture_url: Set(format!("https://img.example.com/{}.png", name)),
            product_type: Set("Boards".to_string()),
            brand: Set("TestBrand".to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(self.state.db.as_ref())
        .await
        .expect("seed product")
    }

    /// Send a request, optionally carrying a `buyerId` cookie.
    pub async fn request(&self, method: Method, uri: &str, buyer_id: Option<&str>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(buyer_id) = buyer_id {
            builder = builder.header(header::COOKIE, format!("buyerId={}", buyer_id));
        }
        let request = builder.body(Body::empty()).expect("build request");

        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("route request")
    }

    pub async fn add_item(
        &self,
        buyer_id: Option<&str>,
        product_id: Uuid,
        quantity: i32,
    ) -> Response {
        self.request(
            Method::POST,
            &format!("/api/basket?productId={}&quantity={}", product_id, quantity),
            buyer_id,
        )
        .await
    }

    pub async fn remove_item(&self, buyer_id: Option<&str>, product_id: Uuid, quantity: i32) -> Response {
        self.request(
            Method::DELETE,
            &format!("/api/basket?productId={}&quantity={}", product_id, quantity),
            buyer_id,
        )
        .await
    }

    pub async fn get_basket(&self, buyer_id: Option<&str>) -> Response {
        self.request(Method::GET, "/api/basket", buyer_id).await
    }
}

/// Extracts the `buyerId` value from a Set-Cookie header, if present.
pub fn buyer_cookie_value(response: &Response) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(|raw| raw.split(';').next())
        .and_then(|pair| pair.strip_prefix("buyerId="))
        .map(|value| value.to_string())
}

/// Reads the response body as JSON.
pub async fn response_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes");
    serde_json::from_slice(&bytes).expect("json response")
}
