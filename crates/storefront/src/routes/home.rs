//! Home page route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, response::Redirect};
use serde::Deserialize;
use tracing::instrument;

use fitplan_core::{Category, Step, WizardAction};

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::Wizard;
use crate::routes::wizard::step_path;

/// Category card on the home page.
#[derive(Clone)]
pub struct CategoryView {
    pub value: &'static str,
    pub title: &'static str,
    pub tagline: &'static str,
}

impl From<Category> for CategoryView {
    fn from(category: Category) -> Self {
        Self {
            value: category.as_str(),
            title: category.title(),
            tagline: category.tagline(),
        }
    }
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub categories: Vec<CategoryView>,
    /// Link back into an unfinished order.
    pub resume: Option<&'static str>,
}

/// Category choice form data.
#[derive(Debug, Deserialize)]
pub struct CategoryForm {
    pub category: String,
}

/// Display home page.
#[instrument(skip(wizard))]
pub async fn home(wizard: Wizard) -> HomeTemplate {
    let step = wizard.state().step();

    HomeTemplate {
        categories: Category::ALL.iter().copied().map(CategoryView::from).collect(),
        resume: (step != Step::Home).then(|| step_path(step)),
    }
}

/// Choose a plan category.
///
/// POST /wizard/category
///
/// Picking a category from the home page always starts a fresh order, so any
/// unfinished one is discarded first.
#[instrument(skip(wizard), fields(category = %form.category))]
pub async fn choose_category(
    mut wizard: Wizard,
    Form(form): Form<CategoryForm>,
) -> Result<Redirect> {
    let category: Category = form
        .category
        .parse()
        .map_err(|e: fitplan_core::CategoryError| AppError::BadRequest(e.to_string()))?;

    if wizard.state().step() != Step::Home {
        wizard.apply(WizardAction::Restart).await?;
    }
    wizard.clear_confirmation().await?;
    wizard.apply(WizardAction::ChooseCategory(category)).await?;

    Ok(Redirect::to(step_path(Step::Catalog)))
}
