//! Core types for FitPlan.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod category;
pub mod id;
pub mod price;
pub mod status;

pub use category::{Category, CategoryError};
pub use id::{OrderId, PlanId};
pub use price::{CurrencyCode, Price};
pub use status::OrderStatus;
