//! Order records.
//!
//! An [`Order`] can only be built from a wizard that reached checkout, which
//! guarantees a catalog selection and a validated intake for the same
//! category.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::PlanSelection;
use crate::intake::IntakeRecord;
use crate::types::{Category, OrderId, OrderStatus, PlanId, Price};
use crate::wizard::{Step, WizardState};

/// Errors building an order.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OrderError {
    /// The wizard has not reached checkout yet.
    #[error("orders can only be placed from checkout (currently on {0:?})")]
    NotAtCheckout(Step),

    /// Selection and intake belong to different categories.
    #[error("intake is for {intake} but the selected plan is {selected}")]
    CategoryMismatch { selected: Category, intake: Category },
}

/// A checkout attempt, as written to the order stores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub category: Category,
    pub plan: PlanId,
    pub plan_name: String,
    pub price: Price,
    pub intake: IntakeRecord,
    pub created_at: DateTime<Utc>,
    pub status: OrderStatus,
}

impl Order {
    /// Build a pending order from a selection and an intake.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::CategoryMismatch`] if the intake was filled in for
    /// the other category.
    pub fn new(
        selection: &PlanSelection,
        intake: IntakeRecord,
        created_at: DateTime<Utc>,
    ) -> Result<Self, OrderError> {
        if intake.category() != selection.category {
            return Err(OrderError::CategoryMismatch {
                selected: selection.category,
                intake: intake.category(),
            });
        }

        Ok(Self {
            category: selection.category,
            plan: selection.plan.clone(),
            plan_name: selection.plan_name.clone(),
            price: selection.price,
            intake,
            created_at,
            status: OrderStatus::Pending,
        })
    }

    /// Build the order for a wizard at checkout.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::NotAtCheckout`] for any other step.
    pub fn from_checkout(state: &WizardState, created_at: DateTime<Utc>) -> Result<Self, OrderError> {
        match state {
            WizardState::Checkout { selection, intake } => {
                Self::new(selection, intake.clone(), created_at)
            }
            other => Err(OrderError::NotAtCheckout(other.step())),
        }
    }
}

/// An order kept in the local fallback store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredOrder {
    pub order_id: OrderId,
    /// RFC 3339 time the order was stored.
    pub timestamp: String,
    #[serde(flatten)]
    pub order: Order,
}

impl StoredOrder {
    /// Assign a fresh local identifier and timestamp.
    #[must_use]
    pub fn new(order: Order, stored_at: DateTime<Utc>) -> Self {
        Self {
            order_id: OrderId::generate(),
            timestamp: stored_at.to_rfc3339(),
            order,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog;
    use crate::intake::{self, IntakeDraft};
    use crate::wizard::WizardAction;

    fn diet_intake() -> IntakeRecord {
        let draft = IntakeDraft {
            name: "Aarav".to_string(),
            age: "25".to_string(),
            gender: "other".to_string(),
            height: "170".to_string(),
            weight: "70".to_string(),
            goal_maintenance: true,
            whey_preference: "with".to_string(),
            diet_preferences: "Vegan, high protein please".to_string(),
            meals_per_day: "5".to_string(),
            wakeup_time: "07:00".to_string(),
            sleep_time: "23:00".to_string(),
            ..IntakeDraft::default()
        };
        intake::parse(Category::Diet, &draft).unwrap()
    }

    #[test]
    fn test_order_from_checkout_uses_table_price() {
        let state = WizardState::Home
            .apply(WizardAction::ChooseCategory(Category::Diet))
            .and_then(|s| s.apply(WizardAction::ChoosePlan("vegan".to_string())))
            .and_then(|s| s.apply(WizardAction::SubmitIntake(diet_intake())))
            .unwrap();

        let now = Utc::now();
        let order = Order::from_checkout(&state, now).unwrap();
        assert_eq!(order.category, Category::Diet);
        assert_eq!(order.plan.as_str(), "vegan");
        assert_eq!(order.price, Price::inr(1199));
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.created_at, now);
        assert_eq!(order.intake, diet_intake());
    }

    #[test]
    fn test_order_requires_checkout() {
        let state = WizardState::Form {
            selection: catalog::select(Category::Diet, "veg").unwrap(),
        };
        assert_eq!(
            Order::from_checkout(&state, Utc::now()),
            Err(OrderError::NotAtCheckout(Step::Form))
        );
    }

    #[test]
    fn test_order_rejects_mismatched_category() {
        let selection = catalog::select(Category::Workout, "full-body").unwrap();
        assert!(matches!(
            Order::new(&selection, diet_intake(), Utc::now()),
            Err(OrderError::CategoryMismatch { .. })
        ));
    }

    #[test]
    fn test_stored_order_json_shape() {
        let selection = catalog::select(Category::Diet, "custom").unwrap();
        let order = Order::new(&selection, diet_intake(), Utc::now()).unwrap();
        let stored = StoredOrder::new(order, Utc::now());

        let json = serde_json::to_value(&stored).unwrap();
        assert_eq!(json["category"], "diet");
        assert_eq!(json["plan"], "custom");
        assert_eq!(json["status"], "pending");
        assert_eq!(json["intake"]["details"]["kind"], "diet");
        assert!(!json["order_id"].as_str().unwrap().is_empty());
        assert!(!json["timestamp"].as_str().unwrap().is_empty());

        let back: StoredOrder = serde_json::from_value(json).unwrap();
        assert_eq!(back, stored);
    }
}
