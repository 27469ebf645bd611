//! Static pages and health checks.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, http::StatusCode};
use tracing::instrument;

use crate::filters;
use crate::state::AppState;

/// A highlight on the about page.
pub struct Feature {
    pub title: &'static str,
    pub description: &'static str,
}

const FEATURES: &[Feature] = &[
    Feature {
        title: "Health First",
        description: "We prioritize your health and well-being above everything else.",
    },
    Feature {
        title: "Goal-Oriented",
        description: "Customized plans designed to help you achieve your specific fitness goals.",
    },
    Feature {
        title: "Community",
        description: "Join a supportive community of fitness enthusiasts on their journey.",
    },
    Feature {
        title: "Expert Guidance",
        description: "Professional trainers and nutritionists guide you every step of the way.",
    },
];

/// About page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/about.html")]
pub struct AboutTemplate {
    pub features: &'static [Feature],
}

/// GET /about
#[instrument]
pub async fn about() -> AboutTemplate {
    AboutTemplate { features: FEATURES }
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
pub async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies the local fallback store can be read, since it is the last
/// resort for every order. Returns 503 Service Unavailable otherwise.
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    if state.orders().local().is_readable().await {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}
