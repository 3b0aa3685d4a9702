//! Restaurant point-of-sale backend.
//!
//! HTTP API over PostgreSQL for a counter-service restaurant. A cashier
//! terminal builds an order out of meals (a meal type such as a bowl or a
//! plate, plus entree and side selections, plus drinks), submits it in one
//! request, and the kitchen works from the active-order list, advancing each
//! order's status until it reaches a terminal one.
//!
//! # Endpoints
//!
//! - `POST /orders` submits a built order
//! - `GET /orders/active` lists non-terminal orders for the kitchen display
//! - `POST /orders/{id}/status` advances an order's status
//! - `GET /menu-items`, `GET /meal-types` back the order-builder screens
//! - `GET /reports/sales`, `GET /reports/product-usage` aggregate a date range
//! - `GET /health` answers once the database does
//!
//! # Configuration
//!
//! Environment driven, see [`config::Config`]:
//!
//! - `RUST_PORT` listen port, default 5000
//! - `DATABASE_URL` PostgreSQL URL, `/run/secrets/DATABASE_URL` wins if present
//! - `PG_MAX_CONNECTIONS` pool size, default 8
//!
//! Order creation runs in a single transaction with database-generated
//! identifiers, so concurrent submissions cannot collide and a failed
//! submission leaves no partial rows behind.
use std::time::Duration;

use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    routing::{get, post},
};

use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

pub mod config;
pub mod database;
pub mod draft;
pub mod error;
pub mod models;
pub mod routes;
pub mod state;

use routes::{
    active_orders_handler, create_order_handler, health_handler, meal_types_handler,
    menu_items_handler, order_status_handler, product_usage_handler, sales_report_handler,
};
use state::AppState;

pub async fn start_server() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let state = AppState::new().await;

    info!("Starting server...");

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/orders", post(create_order_handler))
        .route("/orders/active", get(active_orders_handler))
        .route("/orders/{id}/status", post(order_status_handler))
        .route("/menu-items", get(menu_items_handler))
        .route("/meal-types", get(meal_types_handler))
        .route("/reports/sales", get(sales_report_handler))
        .route("/reports/product-usage", get(product_usage_handler))
        .layer(cors)
        .with_state(state.clone());

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await.unwrap();
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();

    println!("Server shutting down...");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
