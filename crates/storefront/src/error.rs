//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use fitplan_core::{OrderError, WizardError};

use crate::services::payment::QrRenderError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Session store operation failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Wizard rejected an action.
    #[error("Wizard error: {0}")]
    Wizard(#[from] WizardError),

    /// Order could not be built from the session.
    #[error("Order error: {0}")]
    Order(#[from] OrderError),

    /// A payment code could not be drawn.
    #[error("Payment code error: {0}")]
    PaymentCode(#[from] QrRenderError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Rate limited.
    #[error("Rate limited")]
    RateLimited,

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(
            self,
            Self::Session(_) | Self::Order(_) | Self::PaymentCode(_) | Self::Internal(_)
        ) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Session(_) | Self::Order(_) | Self::PaymentCode(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Wizard(err) => match err {
                WizardError::Catalog(_) => StatusCode::NOT_FOUND,
                WizardError::OutOfOrder { .. } => StatusCode::CONFLICT,
                WizardError::CategoryMismatch { .. } => StatusCode::BAD_REQUEST,
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Session(_) | Self::Order(_) | Self::PaymentCode(_) | Self::Internal(_) => {
                "Internal server error".to_string()
            }
            Self::Wizard(WizardError::Catalog(err)) => err.to_string(),
            Self::Wizard(_) => "That step is not available right now".to_string(),
            _ => self.to_string(),
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("wizard", "Chose plan", Some(&[("plan", "vegan")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use super::*;
    use fitplan_core::{CatalogError, Category, Step};

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("plan".to_string());
        assert_eq!(err.to_string(), "Not found: plan");

        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            let response = err.into_response();
            response.status()
        }

        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::RateLimited),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            get_status(AppError::Wizard(WizardError::Catalog(
                CatalogError::UnknownPlan {
                    category: Category::Diet,
                    plan: "keto".to_string(),
                }
            ))),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Wizard(WizardError::OutOfOrder {
                step: Step::Home,
                action: "choose a plan",
            })),
            StatusCode::CONFLICT
        );
    }
}
