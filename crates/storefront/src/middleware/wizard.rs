//! Session-held wizard extractor.
//!
//! Loads the visitor's [`WizardState`] from the session and writes every
//! accepted transition back, so each browser walks its own wizard.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;
use tower_sessions::session::Id;

use fitplan_core::{WizardAction, WizardState};

use crate::error::{AppError, add_breadcrumb};
use crate::models::{Confirmation, session_keys};

/// The current visitor's wizard.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(mut wizard: Wizard) -> Result<Redirect> {
///     wizard.apply(WizardAction::Back).await?;
///     Ok(Redirect::to(step_path(wizard.state().step())))
/// }
/// ```
pub struct Wizard {
    session: Session,
    state: WizardState,
}

impl<S> FromRequestParts<S> for Wizard
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Set by SessionManagerLayer
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::Internal("session layer missing".to_string()))?;

        let state = session
            .get::<WizardState>(session_keys::WIZARD)
            .await?
            .unwrap_or_default();

        Ok(Self { session, state })
    }
}

impl Wizard {
    #[must_use]
    pub const fn state(&self) -> &WizardState {
        &self.state
    }

    /// Id of the backing session, if the visitor already has one.
    #[must_use]
    pub fn session_id(&self) -> Option<Id> {
        self.session.id()
    }

    /// Re-read the wizard from the session store.
    ///
    /// Picks up changes written by another request for the same visitor
    /// since this one was extracted.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be read.
    pub async fn reload(&mut self) -> Result<&WizardState, AppError> {
        self.session.load().await?;
        self.state = self
            .session
            .get::<WizardState>(session_keys::WIZARD)
            .await?
            .unwrap_or_default();
        Ok(&self.state)
    }

    /// Apply an action and persist the resulting state.
    ///
    /// A rejected action leaves both the session and `self` unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if the wizard rejects the action or the session
    /// cannot be written.
    pub async fn apply(&mut self, action: WizardAction) -> Result<&WizardState, AppError> {
        let next = self.state.apply(action)?;
        self.session.insert(session_keys::WIZARD, &next).await?;

        let step = format!("{:?}", next.step());
        add_breadcrumb("wizard", "Changed step", Some(&[("step", step.as_str())]));
        tracing::debug!(step = %step, "Wizard transition");

        self.state = next;
        Ok(&self.state)
    }

    /// Keep a placed order's confirmation and reset the wizard.
    ///
    /// The session is written to the store immediately rather than at the
    /// end of the response, so a concurrent [`Wizard::reload`] sees it.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be written.
    pub async fn complete(&mut self, confirmation: &Confirmation) -> Result<(), AppError> {
        self.session
            .insert(session_keys::CONFIRMATION, confirmation)
            .await?;
        self.apply(WizardAction::Restart).await?;
        self.session.save().await?;
        Ok(())
    }

    /// Confirmation of the last order placed in this session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be read.
    pub async fn confirmation(&self) -> Result<Option<Confirmation>, AppError> {
        Ok(self
            .session
            .get::<Confirmation>(session_keys::CONFIRMATION)
            .await?)
    }

    /// Drop any stored confirmation, e.g. when a new order is started.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be written.
    pub async fn clear_confirmation(&self) -> Result<(), AppError> {
        self.session
            .remove::<Confirmation>(session_keys::CONFIRMATION)
            .await?;
        Ok(())
    }
}
