//! Plan catalog route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use fitplan_core::{Category, PlanCard, Step, WizardAction, WizardState, catalog};

use crate::error::Result;
use crate::filters;
use crate::middleware::Wizard;
use crate::routes::wizard::{step_path, to_current_step};

/// A plan card as rendered in the catalog.
#[derive(Clone)]
pub struct PlanView {
    pub id: &'static str,
    pub name: &'static str,
    pub price: String,
    pub description: &'static str,
    pub image: &'static str,
}

impl From<&PlanCard> for PlanView {
    fn from(card: &PlanCard) -> Self {
        Self {
            id: card.id,
            name: card.name,
            price: card.price().to_string(),
            description: card.description,
            image: card.image,
        }
    }
}

/// Plan catalog template.
#[derive(Template, WebTemplate)]
#[template(path = "plans.html")]
pub struct PlansTemplate {
    pub title: &'static str,
    pub tagline: &'static str,
    pub plans: Vec<PlanView>,
}

impl PlansTemplate {
    #[must_use]
    pub fn new(category: Category) -> Self {
        Self {
            title: category.title(),
            tagline: category.tagline(),
            plans: catalog::plans(category).iter().map(PlanView::from).collect(),
        }
    }
}

/// Plan choice form data.
#[derive(Debug, Deserialize)]
pub struct PlanForm {
    pub plan: String,
}

/// Display the catalog for the chosen category.
///
/// GET /plans
#[instrument(skip(wizard))]
pub async fn index(wizard: Wizard) -> Response {
    match wizard.state() {
        WizardState::Catalog { category } => PlansTemplate::new(*category).into_response(),
        other => to_current_step(other).into_response(),
    }
}

/// Choose a plan from the catalog.
///
/// POST /plans
#[instrument(skip(wizard), fields(plan = %form.plan))]
pub async fn choose(mut wizard: Wizard, Form(form): Form<PlanForm>) -> Result<Redirect> {
    if wizard.state().step() != Step::Catalog {
        return Ok(to_current_step(wizard.state()));
    }

    wizard.apply(WizardAction::ChoosePlan(form.plan)).await?;
    Ok(Redirect::to(step_path(Step::Form)))
}
