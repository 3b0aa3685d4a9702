use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;

/// Body of `POST /orders`. `staff_id` is optional, walk-up kiosk orders
/// carry none.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrder {
    #[serde(default)]
    pub order_items: Vec<OrderItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staff_id: Option<i32>,
}

/// One meal within a submitted order: the meal type plus its selections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(rename = "mealType")]
    pub meal_type: MealTypeRef,
    #[serde(default)]
    pub entrees: Vec<MenuItemRef>,
    #[serde(default)]
    pub sides: Vec<MenuItemRef>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MealTypeRef {
    pub meal_type_id: i32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MenuItemRef {
    pub menu_item_id: i32,
}

/// Which slot of a meal a detail row fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailRole {
    Entree,
    Side,
}

impl DetailRole {
    pub fn as_str(self) -> &'static str {
        match self {
            DetailRole::Entree => "entree",
            DetailRole::Side => "side",
        }
    }
}

/// Body of `POST /orders/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: String,
}

/// Query string of the report endpoints, inclusive on both ends.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ReportRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// One row of `GET /orders/active`. `order_status` is never null on the way
/// out, the query folds missing statuses to `pending`.
#[derive(Debug, Serialize, FromRow)]
pub struct ActiveOrder {
    pub order_id: i32,
    pub staff_id: Option<i32>,
    pub staff_username: Option<String>,
    pub datetime: DateTime<Utc>,
    pub price: f64,
    pub order_status: String,
    pub meal_count: i64,
}

#[derive(Debug, Serialize, FromRow)]
pub struct MenuItem {
    pub menu_item_id: i32,
    pub name: String,
    pub kind: String,
    pub extra_cost: f64,
}

#[derive(Debug, Serialize, FromRow)]
pub struct MealType {
    pub meal_type_id: i32,
    pub name: String,
    pub price: f64,
}

#[derive(Debug, Serialize, FromRow)]
pub struct SalesDay {
    pub day: NaiveDate,
    pub order_count: i64,
    pub revenue: f64,
}

#[derive(Debug, Serialize, FromRow)]
pub struct ProductUsage {
    pub menu_item_id: i32,
    pub name: String,
    pub times_used: i64,
}

/// Envelope every endpoint answers with.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_order_parses_the_documented_body() {
        let body = serde_json::json!({
            "order_items": [
                {
                    "mealType": { "meal_type_id": 2 },
                    "entrees": [{ "menu_item_id": 11 }, { "menu_item_id": 12 }],
                    "sides": [{ "menu_item_id": 30 }]
                }
            ]
        });

        let parsed: CreateOrder = serde_json::from_value(body).unwrap();

        assert_eq!(parsed.order_items.len(), 1);
        assert_eq!(parsed.order_items[0].meal_type.meal_type_id, 2);
        assert_eq!(parsed.order_items[0].entrees.len(), 2);
        assert_eq!(parsed.order_items[0].sides[0].menu_item_id, 30);
        assert_eq!(parsed.staff_id, None);
    }

    #[test]
    fn missing_order_items_parses_as_empty() {
        let parsed: CreateOrder = serde_json::from_value(serde_json::json!({})).unwrap();

        assert!(parsed.order_items.is_empty());
    }

    #[test]
    fn detail_role_matches_the_stored_text() {
        assert_eq!(DetailRole::Entree.as_str(), "entree");
        assert_eq!(DetailRole::Side.as_str(), "side");
        assert_eq!(
            serde_json::to_value(DetailRole::Side).unwrap(),
            serde_json::json!("side")
        );
    }

    #[test]
    fn envelope_has_the_success_flag() {
        let body = serde_json::to_value(ApiResponse::ok(serde_json::json!({ "orderId": 7 })))
            .unwrap();

        assert_eq!(
            body,
            serde_json::json!({ "success": true, "data": { "orderId": 7 } })
        );
    }
}
