//! Session-related types.
//!
//! Types stored in the session between wizard steps.

use serde::{Deserialize, Serialize};

use fitplan_core::{Category, PlanSelection, Price};

use crate::services::SubmissionOutcome;

/// A placed order, kept so the confirmation page survives a reload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Confirmation {
    pub category: Category,
    pub plan_name: String,
    pub price: Price,
    /// Order or document identifier, if the store assigned one.
    pub reference: Option<String>,
    /// The order went to the local fallback file.
    pub saved_locally: bool,
}

impl Confirmation {
    #[must_use]
    pub fn new(selection: &PlanSelection, outcome: &SubmissionOutcome) -> Self {
        Self {
            category: selection.category,
            plan_name: selection.plan_name.clone(),
            price: selection.price,
            reference: outcome.reference(),
            saved_locally: matches!(outcome, SubmissionOutcome::Local { .. }),
        }
    }
}

/// Session keys for wizard data.
pub mod keys {
    /// Key for the current wizard state.
    pub const WIZARD: &str = "wizard";

    /// Key for the last placed order's confirmation.
    pub const CONFIRMATION: &str = "confirmation";
}
