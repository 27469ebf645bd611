//! Intake form route handlers.
//!
//! The same template serves both categories; diet and workout sections are
//! switched on the selected plan's category.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Json,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Serialize;
use tracing::instrument;

use fitplan_core::intake::{
    self, ActivityLevel, Gender, Supplement, WheyPreference, draft::supplement_field,
    schema::MEALS_PER_DAY_OPTIONS,
};
use fitplan_core::{FieldErrors, IntakeDraft, PlanSelection, Step, WizardAction, WizardState};

use crate::error::Result;
use crate::filters;
use crate::middleware::Wizard;
use crate::routes::wizard::{step_path, to_current_step};

/// A checkbox with its submitted state.
#[derive(Clone)]
pub struct CheckboxView {
    pub name: &'static str,
    pub label: &'static str,
    pub checked: bool,
}

/// Intake form template.
#[derive(Template, WebTemplate)]
#[template(path = "intake/form.html")]
pub struct IntakeTemplate {
    pub category_title: &'static str,
    pub plan_name: String,
    pub price: String,
    pub is_diet: bool,
    pub draft: IntakeDraft,
    pub errors: FieldErrors,
    pub goals: Vec<CheckboxView>,
    pub supplements: Vec<CheckboxView>,
    pub genders: &'static [Gender],
    pub whey_options: &'static [WheyPreference],
    pub activity_levels: &'static [ActivityLevel],
    pub meal_options: Vec<String>,
}

impl IntakeTemplate {
    #[must_use]
    pub fn new(selection: &PlanSelection, draft: IntakeDraft, errors: FieldErrors) -> Self {
        let supplements = Supplement::ALL
            .iter()
            .map(|s| CheckboxView {
                name: supplement_field(*s),
                label: s.label(),
                checked: draft.has_supplement(*s),
            })
            .collect();

        Self {
            category_title: selection.category.title(),
            plan_name: selection.plan_name.clone(),
            price: selection.price.to_string(),
            is_diet: selection.category.is_diet(),
            goals: goal_checkboxes(&draft),
            supplements,
            draft,
            errors,
            genders: Gender::ALL,
            whey_options: WheyPreference::ALL,
            activity_levels: ActivityLevel::ALL,
            meal_options: MEALS_PER_DAY_OPTIONS.iter().map(u8::to_string).collect(),
        }
    }

    /// Message for a field, empty when it is valid.
    #[must_use]
    pub fn error(&self, field: &str) -> &str {
        self.errors.get(field).unwrap_or_default()
    }
}

fn goal_checkboxes(draft: &IntakeDraft) -> Vec<CheckboxView> {
    [
        ("goal_fat_loss", "Fat Loss", draft.goal_fat_loss),
        ("goal_muscle_gain", "Muscle Gain", draft.goal_muscle_gain),
        ("goal_maintenance", "Maintenance", draft.goal_maintenance),
        ("goal_improve_energy", "Improve Energy", draft.goal_improve_energy),
        ("goal_get_toned", "Get Toned", draft.goal_get_toned),
    ]
    .into_iter()
    .map(|(name, label, checked)| CheckboxView {
        name,
        label,
        checked,
    })
    .collect()
}

/// Response for eager validation.
#[derive(Debug, Serialize)]
pub struct ValidationResponse {
    pub valid: bool,
    pub errors: FieldErrors,
}

fn form_selection(state: &WizardState) -> Option<&PlanSelection> {
    match state {
        WizardState::Form { selection } => Some(selection),
        _ => None,
    }
}

/// Display the intake form for the selected plan.
///
/// GET /intake
#[instrument(skip(wizard))]
pub async fn show(wizard: Wizard) -> Response {
    match form_selection(wizard.state()) {
        Some(selection) => {
            IntakeTemplate::new(selection, IntakeDraft::default(), FieldErrors::default())
                .into_response()
        }
        None => to_current_step(wizard.state()).into_response(),
    }
}

/// Validate the form as it is filled in.
///
/// POST /intake/validate
///
/// Returns every violation for the current input; the page decides which
/// ones to show based on the fields the visitor has touched.
#[instrument(skip(wizard, draft))]
pub async fn validate(wizard: Wizard, Form(draft): Form<IntakeDraft>) -> Response {
    let Some(selection) = form_selection(wizard.state()) else {
        return (
            StatusCode::CONFLICT,
            Json(ValidationResponse {
                valid: false,
                errors: FieldErrors::default(),
            }),
        )
            .into_response();
    };

    let errors = intake::validate(selection.category, &draft);
    Json(ValidationResponse {
        valid: errors.is_empty(),
        errors,
    })
    .into_response()
}

/// Submit the intake form.
///
/// POST /intake
///
/// Re-validates on the server; an invalid submission re-renders the form with
/// inline messages and status 422.
#[instrument(skip(wizard, draft))]
pub async fn submit(mut wizard: Wizard, Form(draft): Form<IntakeDraft>) -> Result<Response> {
    let Some(selection) = form_selection(wizard.state()).cloned() else {
        return Ok(to_current_step(wizard.state()).into_response());
    };

    match intake::parse(selection.category, &draft) {
        Ok(record) => {
            wizard.apply(WizardAction::SubmitIntake(record)).await?;
            Ok(Redirect::to(step_path(Step::Checkout)).into_response())
        }
        Err(errors) => {
            tracing::debug!(count = errors.len(), "Intake rejected");
            Ok((
                StatusCode::UNPROCESSABLE_ENTITY,
                IntakeTemplate::new(&selection, draft, errors),
            )
                .into_response())
        }
    }
}
