//! # PostgreSQL
//!
//! Single store for the whole service.
//!
//! ## Schema
//!
//! - `"Order"`: one row per submitted order (price, status, staff, timestamp)
//! - `meal`: one row per meal in an order
//! - `meal_detail`: one row per entree/side selection in a meal
//! - `meal_type`, `menu_item`, `staff`: reference data
//!
//! All surrogate keys are `GENERATED ALWAYS AS IDENTITY`. Order creation is
//! one transaction: the identity sequence hands out ids, so two terminals
//! submitting at once cannot duplicate or skip them, and a failure anywhere
//! in the insert sequence rolls the whole order back.
//!
//! ## Money
//!
//! Prices are `NUMERIC(10, 2)` in the schema and cast to `FLOAT8` at the
//! query edge, handlers and payloads only ever see `f64`.
use std::time::Duration;

use chrono::NaiveDate;
use sqlx::{PgPool, Postgres, Transaction, postgres::PgPoolOptions};

use crate::{
    config::Config,
    error::AppError,
    models::{
        ActiveOrder, DetailRole, MealType, MenuItem, MenuItemRef, OrderItem, ProductUsage,
        SalesDay,
    },
};

pub async fn init_pool(config: &Config) -> PgPool {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&config.database_url)
        .await
        .unwrap();

    sqlx::migrate!().run(&pool).await.unwrap();

    pool
}

pub async fn ping(pool: &PgPool) -> Result<(), AppError> {
    sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(pool).await?;

    Ok(())
}

/// Materializes a submitted order: one order row, one meal row per item, one
/// detail row per entree/side selection. Everything happens inside a single
/// transaction and the new order id comes back out.
pub async fn create_order(
    pool: &PgPool,
    staff_id: Option<i32>,
    items: &[OrderItem],
) -> Result<i32, AppError> {
    let mut tx = pool.begin().await?;

    let price = order_price(&mut tx, items).await?;

    let order_id: i32 = sqlx::query_scalar(
        r#"
        INSERT INTO "Order" (price, order_status, staff_id)
        VALUES ($1::NUMERIC(10, 2), 'pending', $2)
        RETURNING order_id
        "#,
    )
    .bind(price)
    .bind(staff_id)
    .fetch_one(&mut *tx)
    .await?;

    for item in items {
        let meal_id: i32 = sqlx::query_scalar(
            "INSERT INTO meal (order_id, meal_type_id) VALUES ($1, $2) RETURNING meal_id",
        )
        .bind(order_id)
        .bind(item.meal_type.meal_type_id)
        .fetch_one(&mut *tx)
        .await?;

        insert_details(
            &mut tx,
            meal_id,
            item.meal_type.meal_type_id,
            &item.entrees,
            DetailRole::Entree,
        )
        .await?;
        insert_details(
            &mut tx,
            meal_id,
            item.meal_type.meal_type_id,
            &item.sides,
            DetailRole::Side,
        )
        .await?;
    }

    tx.commit().await?;

    Ok(order_id)
}

/// Price is computed server side: the sum of the chosen meal types' base
/// prices plus each selection's extra cost. `unnest` keeps duplicate
/// selections counted.
async fn order_price(
    tx: &mut Transaction<'_, Postgres>,
    items: &[OrderItem],
) -> Result<f64, AppError> {
    let meal_type_ids: Vec<i32> = items.iter().map(|item| item.meal_type.meal_type_id).collect();
    let menu_item_ids: Vec<i32> = items
        .iter()
        .flat_map(|item| item.entrees.iter().chain(item.sides.iter()))
        .map(|selection| selection.menu_item_id)
        .collect();

    let base: f64 = sqlx::query_scalar(
        r#"
        SELECT COALESCE(SUM(mt.price), 0)::FLOAT8
        FROM unnest($1::INT[]) AS picked(id)
        JOIN meal_type mt ON mt.meal_type_id = picked.id
        "#,
    )
    .bind(&meal_type_ids)
    .fetch_one(&mut **tx)
    .await?;

    let extras: f64 = sqlx::query_scalar(
        r#"
        SELECT COALESCE(SUM(mi.extra_cost), 0)::FLOAT8
        FROM unnest($1::INT[]) AS picked(id)
        JOIN menu_item mi ON mi.menu_item_id = picked.id
        "#,
    )
    .bind(&menu_item_ids)
    .fetch_one(&mut **tx)
    .await?;

    Ok(base + extras)
}

async fn insert_details(
    tx: &mut Transaction<'_, Postgres>,
    meal_id: i32,
    meal_type_id: i32,
    selections: &[MenuItemRef],
    role: DetailRole,
) -> Result<(), AppError> {
    for selection in selections {
        sqlx::query(
            "INSERT INTO meal_detail (meal_id, meal_type_id, menu_item_id, role)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(meal_id)
        .bind(meal_type_id)
        .bind(selection.menu_item_id)
        .bind(role.as_str())
        .execute(&mut **tx)
        .await?;
    }

    Ok(())
}

/// Every order whose status has not reached a terminal value, newest first,
/// with the assigned staff's name and a meal count. Null statuses surface as
/// `pending`.
pub async fn active_orders(pool: &PgPool) -> Result<Vec<ActiveOrder>, AppError> {
    let orders = sqlx::query_as::<_, ActiveOrder>(
        r#"
        SELECT o.order_id,
               o.staff_id,
               s.username AS staff_username,
               o.datetime,
               o.price::FLOAT8 AS price,
               COALESCE(o.order_status, 'pending') AS order_status,
               COUNT(m.meal_id)::INT8 AS meal_count
        FROM "Order" o
        LEFT JOIN staff s ON s.staff_id = o.staff_id
        LEFT JOIN meal m ON m.order_id = o.order_id
        WHERE o.order_status IS NULL
           OR o.order_status NOT IN ('completed', 'cancelled')
        GROUP BY o.order_id, o.staff_id, s.username, o.datetime, o.price, o.order_status
        ORDER BY o.datetime DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(orders)
}

pub async fn update_status(pool: &PgPool, order_id: i32, status: &str) -> Result<(), AppError> {
    let result = sqlx::query(r#"UPDATE "Order" SET order_status = $1 WHERE order_id = $2"#)
        .bind(status)
        .bind(order_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::OrderNotFound(order_id));
    }

    Ok(())
}

pub async fn menu_items(pool: &PgPool) -> Result<Vec<MenuItem>, AppError> {
    let items = sqlx::query_as::<_, MenuItem>(
        "SELECT menu_item_id, name, kind, extra_cost::FLOAT8 AS extra_cost
         FROM menu_item
         ORDER BY name",
    )
    .fetch_all(pool)
    .await?;

    Ok(items)
}

pub async fn meal_types(pool: &PgPool) -> Result<Vec<MealType>, AppError> {
    let types = sqlx::query_as::<_, MealType>(
        "SELECT meal_type_id, name, price::FLOAT8 AS price
         FROM meal_type
         ORDER BY price",
    )
    .fetch_all(pool)
    .await?;

    Ok(types)
}

/// Order count and revenue per day over an inclusive date range.
pub async fn sales_report(
    pool: &PgPool,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<SalesDay>, AppError> {
    let days = sqlx::query_as::<_, SalesDay>(
        r#"
        SELECT o.datetime::DATE AS day,
               COUNT(*)::INT8 AS order_count,
               COALESCE(SUM(o.price), 0)::FLOAT8 AS revenue
        FROM "Order" o
        WHERE o.datetime::DATE BETWEEN $1 AND $2
        GROUP BY day
        ORDER BY day
        "#,
    )
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;

    Ok(days)
}

/// How often each menu item was picked as an entree or side over an
/// inclusive date range.
pub async fn product_usage_report(
    pool: &PgPool,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<ProductUsage>, AppError> {
    let rows = sqlx::query_as::<_, ProductUsage>(
        r#"
        SELECT mi.menu_item_id,
               mi.name,
               COUNT(md.meal_detail_id)::INT8 AS times_used
        FROM meal_detail md
        JOIN meal m ON m.meal_id = md.meal_id
        JOIN "Order" o ON o.order_id = m.order_id
        JOIN menu_item mi ON mi.menu_item_id = md.menu_item_id
        WHERE o.datetime::DATE BETWEEN $1 AND $2
        GROUP BY mi.menu_item_id, mi.name
        ORDER BY times_used DESC, mi.name
        "#,
    )
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
