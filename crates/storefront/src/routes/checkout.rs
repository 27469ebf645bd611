//! Checkout and confirmation route handlers.
//!
//! Submitting checkout stores the order (remote first, local fallback), keeps
//! a confirmation in the session and redirects to it, so a reload of the
//! confirmation page never resubmits.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;
use serde::Deserialize;
use tracing::instrument;

use fitplan_core::intake::IntakeDetails;
use fitplan_core::{IntakeRecord, Order, PlanSelection, WizardState};

use crate::config::PaymentConfig;
use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::middleware::Wizard;
use crate::models::Confirmation;
use crate::routes::wizard::to_current_step;
use crate::services::payment::{self, QrRenderError};
use crate::state::AppState;

/// Shown when checkout is submitted without accepting the terms.
pub const TERMS_REQUIRED: &str = "Please accept the terms to continue";

/// Shown when neither order store accepted the order.
pub const SUBMISSION_FAILED: &str =
    "We couldn't save your order right now. Please try again in a moment.";

/// One line of the order summary.
#[derive(Clone)]
pub struct SummaryRow {
    pub label: &'static str,
    pub value: String,
}

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutTemplate {
    pub category_title: &'static str,
    pub plan_name: String,
    pub price: String,
    pub summary: Vec<SummaryRow>,
    pub terms_error: Option<&'static str>,
    pub alert: Option<&'static str>,
}

impl CheckoutTemplate {
    #[must_use]
    pub fn new(selection: &PlanSelection, intake: &IntakeRecord) -> Self {
        Self {
            category_title: selection.category.title(),
            plan_name: selection.plan_name.clone(),
            price: selection.price.to_string(),
            summary: summary_rows(intake),
            terms_error: None,
            alert: None,
        }
    }
}

/// Confirmation page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/confirmation.html")]
pub struct ConfirmationTemplate {
    pub plan_name: String,
    pub price: String,
    pub reference: Option<String>,
    pub payment_uri: String,
    pub contact_uri: String,
    /// Inline SVG of `payment_uri`.
    pub payment_qr: String,
    /// Inline SVG of `contact_uri`.
    pub contact_qr: String,
    pub steps: &'static [&'static str],
}

impl ConfirmationTemplate {
    /// Build the page, rendering both hand-off links as QR codes.
    ///
    /// # Errors
    ///
    /// Returns an error if either link is too long to encode.
    pub fn new(
        confirmation: &Confirmation,
        payment_config: &PaymentConfig,
    ) -> std::result::Result<Self, QrRenderError> {
        let payment_uri = payment::upi_uri(payment_config, &confirmation.price);
        let contact_uri = payment::contact_uri(payment_config);

        Ok(Self {
            plan_name: confirmation.plan_name.clone(),
            price: confirmation.price.to_string(),
            reference: confirmation.reference.clone(),
            payment_qr: payment::qr_svg(&payment_uri)?,
            contact_qr: payment::qr_svg(&contact_uri)?,
            payment_uri,
            contact_uri,
            steps: &payment::FOLLOW_UP_STEPS,
        })
    }
}

/// Checkout form data.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CheckoutForm {
    pub accept_terms: bool,
}

fn summary_rows(intake: &IntakeRecord) -> Vec<SummaryRow> {
    let profile = &intake.profile;
    let mut rows = vec![
        row("Name", profile.name.clone()),
        row("Age", profile.age.to_string()),
        row("Gender", profile.gender.label().to_string()),
        row("Height", format!("{} cm", profile.height_cm.normalize())),
        row("Weight", format!("{} kg", profile.weight_kg.normalize())),
        row("Goals", intake.goals.labels().join(", ")),
    ];

    match &intake.details {
        IntakeDetails::Diet(diet) => {
            rows.push(row("Whey", diet.whey_preference.label().to_string()));
            rows.push(row("Meals per day", diet.meals_per_day.to_string()));
            rows.push(row(
                "Supplements",
                if diet.supplements.is_empty() {
                    "None".to_string()
                } else {
                    diet.supplements
                        .iter()
                        .map(|s| s.label())
                        .collect::<Vec<_>>()
                        .join(", ")
                },
            ));
            rows.push(row("Wake-up time", diet.wakeup_time.format("%H:%M").to_string()));
            rows.push(row("Sleep time", diet.sleep_time.format("%H:%M").to_string()));
            if let Some(budget) = diet.budget {
                rows.push(row("Monthly budget", format!("₹{}", budget.normalize())));
            }
        }
        IntakeDetails::Workout(workout) => {
            rows.push(row("Activity level", workout.activity_level.label().to_string()));
        }
    }

    rows
}

const fn row(label: &'static str, value: String) -> SummaryRow {
    SummaryRow { label, value }
}

/// Display the order summary.
///
/// GET /checkout
#[instrument(skip(wizard))]
pub async fn show(wizard: Wizard) -> Response {
    match wizard.state() {
        WizardState::Checkout { selection, intake } => {
            CheckoutTemplate::new(selection, intake).into_response()
        }
        other => to_current_step(other).into_response(),
    }
}

/// Place the order.
///
/// POST /checkout
///
/// A remote store failure is absorbed by the local fallback and the visitor
/// still gets a confirmation. Only when both stores fail does the page come
/// back with an alert.
///
/// Submissions from one session run one at a time. A duplicate that waited
/// on the lock finds the wizard already reset and is sent to the existing
/// confirmation instead of placing a second order.
#[instrument(skip(state, wizard))]
pub async fn submit(
    State(state): State<AppState>,
    mut wizard: Wizard,
    Form(form): Form<CheckoutForm>,
) -> Result<Response> {
    let Some(session_id) = wizard.session_id() else {
        return Ok(to_current_step(wizard.state()).into_response());
    };
    let lock = state.checkout_lock(session_id).await;
    let _held = lock.lock().await;
    wizard.reload().await?;

    let WizardState::Checkout { selection, intake } = wizard.state() else {
        if wizard.confirmation().await?.is_some() {
            tracing::info!("Duplicate checkout submission");
            return Ok(Redirect::to("/checkout/confirmation").into_response());
        }
        return Ok(to_current_step(wizard.state()).into_response());
    };
    let selection = selection.clone();
    let mut page = CheckoutTemplate::new(&selection, intake);

    if !form.accept_terms {
        page.terms_error = Some(TERMS_REQUIRED);
        return Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response());
    }

    let order = Order::from_checkout(wizard.state(), Utc::now())?;

    match state.orders().submit(order).await {
        Ok(outcome) => {
            let confirmation = Confirmation::new(&selection, &outcome);
            wizard.complete(&confirmation).await?;
            add_breadcrumb(
                "checkout",
                "Order placed",
                Some(&[
                    ("plan", selection.plan.as_str()),
                    ("stored", if confirmation.saved_locally { "local" } else { "remote" }),
                ]),
            );
            Ok(Redirect::to("/checkout/confirmation").into_response())
        }
        Err(e) => {
            let event_id = sentry::capture_error(&e);
            tracing::error!(error = %e, sentry_event_id = %event_id, "Order submission failed");
            page.alert = Some(SUBMISSION_FAILED);
            Ok((StatusCode::SERVICE_UNAVAILABLE, page).into_response())
        }
    }
}

/// Display payment and contact codes for the last order.
///
/// GET /checkout/confirmation
#[instrument(skip(state, wizard))]
pub async fn confirmation(State(state): State<AppState>, wizard: Wizard) -> Result<Response> {
    let Some(confirmation) = wizard.confirmation().await? else {
        return Ok(to_current_step(wizard.state()).into_response());
    };

    Ok(ConfirmationTemplate::new(&confirmation, &state.config().payment)?.into_response())
}
