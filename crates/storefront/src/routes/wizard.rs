//! Wizard navigation shared by every step.

use axum::response::Redirect;
use tracing::instrument;

use fitplan_core::{Step, WizardAction, WizardState};

use crate::error::Result;
use crate::middleware::Wizard;

/// Page that renders a wizard step.
#[must_use]
pub const fn step_path(step: Step) -> &'static str {
    match step {
        Step::Home => "/",
        Step::Catalog => "/plans",
        Step::Form => "/intake",
        Step::Checkout => "/checkout",
    }
}

/// Send the visitor back to the step they are actually on.
///
/// Used whenever a page or action is requested out of order.
#[must_use]
pub fn to_current_step(state: &WizardState) -> Redirect {
    Redirect::to(step_path(state.step()))
}

/// Go back one step.
///
/// POST /wizard/back
#[instrument(skip(wizard))]
pub async fn back(mut wizard: Wizard) -> Result<Redirect> {
    let state = wizard.apply(WizardAction::Back).await?;
    Ok(to_current_step(state))
}

/// Start over from the home page.
///
/// POST /wizard/restart
#[instrument(skip(wizard))]
pub async fn restart(mut wizard: Wizard) -> Result<Redirect> {
    wizard.apply(WizardAction::Restart).await?;
    wizard.clear_confirmation().await?;
    Ok(Redirect::to("/"))
}
