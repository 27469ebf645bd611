//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page (category choice)
//! GET  /about                  - About page
//! GET  /health                 - Health check
//! GET  /health/ready           - Readiness check
//!
//! # Wizard
//! POST /wizard/category        - Choose category, then /plans
//! POST /wizard/back            - Back one step
//! POST /wizard/restart         - Start over
//! GET  /plans                  - Catalog for the chosen category
//! POST /plans                  - Choose plan, then /intake
//! GET  /intake                 - Intake form
//! POST /intake/validate        - Eager validation (JSON)
//! POST /intake                 - Submit intake, then /checkout
//!
//! # Checkout
//! GET  /checkout               - Order summary and terms
//! POST /checkout               - Place order (rate limited)
//! GET  /checkout/confirmation  - Payment and contact codes
//! ```
//!
//! Every wizard page redirects to the visitor's current step when requested
//! out of order.

pub mod checkout;
pub mod home;
pub mod intake;
pub mod pages;
pub mod plans;
pub mod wizard;

use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware::checkout_rate_limiter;
use crate::state::AppState;

/// Create the wizard navigation routes router.
pub fn wizard_routes() -> Router<AppState> {
    Router::new()
        .route("/category", post(home::choose_category))
        .route("/back", post(wizard::back))
        .route("/restart", post(wizard::restart))
}

/// Create the intake routes router.
pub fn intake_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(intake::show).post(intake::submit))
        .route("/validate", post(intake::validate))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(checkout::show).merge(post(checkout::submit).layer(checkout_rate_limiter())),
        )
        .route("/confirmation", get(checkout::confirmation))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/about", get(pages::about))
        .route("/health", get(pages::health))
        .route("/health/ready", get(pages::readiness))
        .route("/plans", get(plans::index).post(plans::choose))
        .nest("/wizard", wizard_routes())
        .nest("/intake", intake_routes())
        .nest("/checkout", checkout_routes())
}
