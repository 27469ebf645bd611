//! Static plan catalog.
//!
//! Each category sells a fixed, ordered set of plans. The table here is the
//! single source of prices: the catalog screen shows it and orders are charged
//! from it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Category, PlanId, Price};

/// Errors from catalog lookups.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// The plan identifier does not exist in the category.
    #[error("no {category} plan named '{plan}'")]
    UnknownPlan { category: Category, plan: String },
}

/// A plan as listed in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanCard {
    pub id: &'static str,
    pub name: &'static str,
    /// Price in whole rupees.
    pub price_inr: u32,
    pub description: &'static str,
    pub image: &'static str,
}

impl PlanCard {
    /// The plan's price.
    #[must_use]
    pub fn price(&self) -> Price {
        Price::inr(self.price_inr)
    }
}

const DIET_PLANS: &[PlanCard] = &[
    PlanCard {
        id: "veg",
        name: "Veg Diet Plan",
        price_inr: 999,
        description: "Plant-based nutrition for optimal health",
        image: "https://images.pexels.com/photos/1640777/pexels-photo-1640777.jpeg?auto=compress&cs=tinysrgb&w=500",
    },
    PlanCard {
        id: "non-veg",
        name: "Non-Veg Diet Plan",
        price_inr: 1299,
        description: "Protein-rich meals with lean meats",
        image: "https://images.pexels.com/photos/361184/asparagus-steak-veal-steak-veal-361184.jpeg?auto=compress&cs=tinysrgb&w=500",
    },
    PlanCard {
        id: "vegan",
        name: "Vegan Plan",
        price_inr: 1199,
        description: "Complete plant-based nutrition",
        image: "https://images.pexels.com/photos/1059905/pexels-photo-1059905.jpeg?auto=compress&cs=tinysrgb&w=500",
    },
    PlanCard {
        id: "custom",
        name: "Custom Diet Plan",
        price_inr: 1999,
        description: "Fully personalized meal planning",
        image: "https://images.pexels.com/photos/1332313/pexels-photo-1332313.jpeg?auto=compress&cs=tinysrgb&w=500",
    },
];

const WORKOUT_PLANS: &[PlanCard] = &[
    PlanCard {
        id: "push-pull-legs",
        name: "Push Pull Legs",
        price_inr: 1499,
        description: "Efficient 6-day split routine",
        image: "https://images.pexels.com/photos/1552242/pexels-photo-1552242.jpeg?auto=compress&cs=tinysrgb&w=500",
    },
    PlanCard {
        id: "bro-split",
        name: "Bro Split",
        price_inr: 1299,
        description: "Traditional bodybuilding approach",
        image: "https://images.pexels.com/photos/1431282/pexels-photo-1431282.jpeg?auto=compress&cs=tinysrgb&w=500",
    },
    PlanCard {
        id: "full-body",
        name: "Full Body",
        price_inr: 999,
        description: "Complete workout in every session",
        image: "https://images.pexels.com/photos/2827392/pexels-photo-2827392.jpeg?auto=compress&cs=tinysrgb&w=500",
    },
    PlanCard {
        id: "custom",
        name: "Custom Workout Plan",
        price_inr: 2499,
        description: "Tailored specifically for you",
        image: "https://images.pexels.com/photos/3253501/pexels-photo-3253501.jpeg?auto=compress&cs=tinysrgb&w=500",
    },
];

/// Plans offered in a category, in display order.
#[must_use]
pub const fn plans(category: Category) -> &'static [PlanCard] {
    match category {
        Category::Diet => DIET_PLANS,
        Category::Workout => WORKOUT_PLANS,
    }
}

/// Look up a single plan.
#[must_use]
pub fn find(category: Category, plan: &str) -> Option<&'static PlanCard> {
    plans(category).iter().find(|card| card.id == plan)
}

/// A plan the visitor picked from the catalog.
///
/// Built only through [`select`], so the price always matches the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSelection {
    pub category: Category,
    pub plan: PlanId,
    pub plan_name: String,
    pub price: Price,
}

/// Select a plan from the catalog.
///
/// # Errors
///
/// Returns [`CatalogError::UnknownPlan`] if the category has no plan with that identifier.
pub fn select(category: Category, plan: &str) -> Result<PlanSelection, CatalogError> {
    let card = find(category, plan).ok_or_else(|| CatalogError::UnknownPlan {
        category,
        plan: plan.to_string(),
    })?;

    Ok(PlanSelection {
        category,
        plan: PlanId::new(card.id),
        plan_name: card.name.to_string(),
        price: card.price(),
    })
}
