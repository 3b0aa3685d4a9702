//! Order-builder state for a cashier or kiosk terminal.
//!
//! A terminal fetches the menu once, then builds the order locally: pick a
//! meal type, fill its entree and side slots, push the meal onto the draft,
//! repeat, add drinks on the side. The draft keeps a running total and meal
//! count for the display and turns into the `POST /orders` body on checkout.
//!
//! Drinks price into the total but are not part of the submitted item list,
//! the order flow stores them separately from meal details.
use crate::models::{CreateOrder, MealType, MealTypeRef, MenuItem, MenuItemRef, OrderItem};

/// One in-progress meal: a meal type and the selections filling it.
#[derive(Debug, Clone)]
pub struct DraftMeal {
    meal_type_id: i32,
    base_price: f64,
    entrees: Vec<Selection>,
    sides: Vec<Selection>,
}

#[derive(Debug, Clone, Copy)]
struct Selection {
    menu_item_id: i32,
    extra_cost: f64,
}

impl Selection {
    fn of(item: &MenuItem) -> Self {
        Self {
            menu_item_id: item.menu_item_id,
            extra_cost: item.extra_cost,
        }
    }

    fn item_ref(&self) -> MenuItemRef {
        MenuItemRef {
            menu_item_id: self.menu_item_id,
        }
    }
}

impl DraftMeal {
    pub fn new(meal_type: &MealType) -> Self {
        Self {
            meal_type_id: meal_type.meal_type_id,
            base_price: meal_type.price,
            entrees: Vec::new(),
            sides: Vec::new(),
        }
    }

    pub fn add_entree(&mut self, item: &MenuItem) {
        self.entrees.push(Selection::of(item));
    }

    pub fn add_side(&mut self, item: &MenuItem) {
        self.sides.push(Selection::of(item));
    }

    pub fn selection_count(&self) -> usize {
        self.entrees.len() + self.sides.len()
    }

    /// Base price of the meal type plus every selection's extra cost.
    pub fn price(&self) -> f64 {
        self.base_price
            + self
                .entrees
                .iter()
                .chain(self.sides.iter())
                .map(|selection| selection.extra_cost)
                .sum::<f64>()
    }

    fn as_item(&self) -> OrderItem {
        OrderItem {
            meal_type: MealTypeRef {
                meal_type_id: self.meal_type_id,
            },
            entrees: self.entrees.iter().map(Selection::item_ref).collect(),
            sides: self.sides.iter().map(Selection::item_ref).collect(),
        }
    }
}

/// The whole order as accumulated on the terminal.
#[derive(Debug, Clone, Default)]
pub struct OrderDraft {
    meals: Vec<DraftMeal>,
    drinks: Vec<Selection>,
}

impl OrderDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_meal(&mut self, meal: DraftMeal) {
        self.meals.push(meal);
    }

    pub fn remove_meal(&mut self, index: usize) -> Option<DraftMeal> {
        if index < self.meals.len() {
            Some(self.meals.remove(index))
        } else {
            None
        }
    }

    pub fn add_drink(&mut self, item: &MenuItem) {
        self.drinks.push(Selection::of(item));
    }

    pub fn meal_count(&self) -> usize {
        self.meals.len()
    }

    pub fn drink_count(&self) -> usize {
        self.drinks.len()
    }

    pub fn drink_ids(&self) -> Vec<i32> {
        self.drinks
            .iter()
            .map(|selection| selection.menu_item_id)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.meals.is_empty() && self.drinks.is_empty()
    }

    /// Running total shown on the terminal: every meal's price plus drinks.
    pub fn total(&self) -> f64 {
        let meals: f64 = self.meals.iter().map(DraftMeal::price).sum();
        let drinks: f64 = self
            .drinks
            .iter()
            .map(|selection| selection.extra_cost)
            .sum();

        meals + drinks
    }

    pub fn clear(&mut self) {
        self.meals.clear();
        self.drinks.clear();
    }

    /// The `POST /orders` body for the current draft. Drinks are not part of
    /// the item list.
    pub fn to_request(&self, staff_id: Option<i32>) -> CreateOrder {
        CreateOrder {
            order_items: self.meals.iter().map(DraftMeal::as_item).collect(),
            staff_id,
        }
    }
}
