//! FitPlan Core - Domain library for the fitness-plan storefront.
//!
//! This crate holds everything about the purchase flow that does not touch
//! the network or the filesystem:
//! - `storefront` - Web binary that renders the wizard and submits orders
//! - `cli` - Operator tools for the catalog and the local order store
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients. The storefront keeps the wizard state in the visitor's session and
//! feeds user input through the functions here.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for categories, plan and order IDs, prices, statuses
//! - [`catalog`] - Static plan catalog and price table
//! - [`intake`] - Intake record types, form schema and validator
//! - [`wizard`] - Linear wizard state machine (pure reducer)
//! - [`order`] - Order record built from a completed wizard

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod intake;
pub mod order;
pub mod types;
pub mod wizard;

pub use catalog::{CatalogError, PlanCard, PlanSelection};
pub use intake::{FieldErrors, IntakeDraft, IntakeRecord};
pub use order::{Order, OrderError, StoredOrder};
pub use types::*;
pub use wizard::{Step, WizardAction, WizardError, WizardState};
