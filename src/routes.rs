use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;

use crate::{
    database,
    error::AppError,
    models::{ApiResponse, CreateOrder, OrderItem, ReportRange, StatusUpdate},
    state::AppState,
};

pub async fn health_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    database::ping(&state.pool).await?;

    Ok(Json(ApiResponse::ok(json!({ "status": "up" }))))
}

pub async fn create_order_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateOrder>,
) -> Result<impl IntoResponse, AppError> {
    let items = validate_items(&payload)?;

    let order_id = database::create_order(&state.pool, payload.staff_id, items).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(json!({ "orderId": order_id }))),
    ))
}

pub async fn active_orders_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let orders = database::active_orders(&state.pool).await?;

    Ok(Json(ApiResponse::ok(orders)))
}

pub async fn order_status_handler(
    State(state): State<Arc<AppState>>,
    Path(order_id): Path<i32>,
    Json(payload): Json<StatusUpdate>,
) -> Result<impl IntoResponse, AppError> {
    let status = validate_status(&payload.status)?;

    database::update_status(&state.pool, order_id, status).await?;

    Ok(Json(ApiResponse::ok(json!({
        "orderId": order_id,
        "status": status,
    }))))
}

pub async fn menu_items_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let items = database::menu_items(&state.pool).await?;

    Ok(Json(ApiResponse::ok(items)))
}

pub async fn meal_types_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let types = database::meal_types(&state.pool).await?;

    Ok(Json(ApiResponse::ok(types)))
}

pub async fn sales_report_handler(
    State(state): State<Arc<AppState>>,
    Query(range): Query<ReportRange>,
) -> Result<impl IntoResponse, AppError> {
    validate_range(&range)?;

    let days = database::sales_report(&state.pool, range.start, range.end).await?;

    Ok(Json(ApiResponse::ok(days)))
}

pub async fn product_usage_handler(
    State(state): State<Arc<AppState>>,
    Query(range): Query<ReportRange>,
) -> Result<impl IntoResponse, AppError> {
    validate_range(&range)?;

    let rows = database::product_usage_report(&state.pool, range.start, range.end).await?;

    Ok(Json(ApiResponse::ok(rows)))
}

// Validation runs before any pool access, a rejected payload never touches
// the database.

fn validate_items(payload: &CreateOrder) -> Result<&[OrderItem], AppError> {
    if payload.order_items.is_empty() {
        return Err(AppError::EmptyOrder);
    }

    Ok(&payload.order_items)
}

fn validate_status(raw: &str) -> Result<&str, AppError> {
    let status = raw.trim();

    if status.is_empty() {
        return Err(AppError::BlankStatus);
    }

    Ok(status)
}

fn validate_range(range: &ReportRange) -> Result<(), AppError> {
    if range.start > range.end {
        return Err(AppError::BadDateRange("start is after end"));
    }

    Ok(())
}
