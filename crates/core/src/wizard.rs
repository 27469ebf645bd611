//! The purchase wizard: home → catalog → form → checkout.
//!
//! The state is a tagged union where each step owns exactly the data gathered
//! to reach it. Going back drops the variant for the step being left, so no
//! stale selection or intake can survive a re-entry.
//!
//! ```rust
//! use fitplan_core::{Category, WizardAction, WizardState};
//!
//! let state = WizardState::default()
//!     .apply(WizardAction::ChooseCategory(Category::Diet))
//!     .and_then(|s| s.apply(WizardAction::ChoosePlan("vegan".into())))
//!     .unwrap();
//! assert_eq!(state.selection().unwrap().price.to_string(), "₹1199");
//!
//! let back = state.apply(WizardAction::Back).unwrap();
//! assert_eq!(back.category(), Some(Category::Diet));
//! assert!(back.selection().is_none());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{self, CatalogError, PlanSelection};
use crate::intake::IntakeRecord;
use crate::types::Category;

/// Screen shown for a wizard state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Home,
    Catalog,
    Form,
    Checkout,
}

/// Wizard state with the data carried forward at each step.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum WizardState {
    #[default]
    Home,
    Catalog {
        category: Category,
    },
    Form {
        selection: PlanSelection,
    },
    Checkout {
        selection: PlanSelection,
        intake: IntakeRecord,
    },
}

/// Something the visitor did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardAction {
    ChooseCategory(Category),
    /// Plan identifier from the current category's catalog.
    ChoosePlan(String),
    SubmitIntake(IntakeRecord),
    Back,
    Restart,
}

/// A rejected action. The state it was applied to is unchanged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WizardError {
    /// The action does not belong to the current step.
    #[error("cannot {action} while on the {step:?} step")]
    OutOfOrder { step: Step, action: &'static str },

    /// The chosen plan is not in the category's catalog.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// The intake was filled in for the other category.
    #[error("intake is for {intake} but the selected plan is {selected}")]
    CategoryMismatch { selected: Category, intake: Category },
}

impl WizardState {
    /// The screen for this state.
    #[must_use]
    pub const fn step(&self) -> Step {
        match self {
            Self::Home => Step::Home,
            Self::Catalog { .. } => Step::Catalog,
            Self::Form { .. } => Step::Form,
            Self::Checkout { .. } => Step::Checkout,
        }
    }

    /// Category chosen so far.
    #[must_use]
    pub const fn category(&self) -> Option<Category> {
        match self {
            Self::Home => None,
            Self::Catalog { category } => Some(*category),
            Self::Form { selection } | Self::Checkout { selection, .. } => {
                Some(selection.category)
            }
        }
    }

    /// Plan chosen so far.
    #[must_use]
    pub const fn selection(&self) -> Option<&PlanSelection> {
        match self {
            Self::Form { selection } | Self::Checkout { selection, .. } => Some(selection),
            Self::Home | Self::Catalog { .. } => None,
        }
    }

    /// Submitted intake, present only at checkout.
    #[must_use]
    pub const fn intake(&self) -> Option<&IntakeRecord> {
        match self {
            Self::Checkout { intake, .. } => Some(intake),
            _ => None,
        }
    }

    /// Apply an action, returning the next state.
    ///
    /// # Errors
    ///
    /// Returns [`WizardError`] for skip-ahead or out-of-order actions, unknown
    /// plans and intakes for the wrong category.
    pub fn apply(&self, action: WizardAction) -> Result<Self, WizardError> {
        match (self, action) {
            (_, WizardAction::Restart) => Ok(Self::Home),

            (Self::Home, WizardAction::ChooseCategory(category)) => {
                Ok(Self::Catalog { category })
            }

            (Self::Catalog { category }, WizardAction::ChoosePlan(plan)) => Ok(Self::Form {
                selection: catalog::select(*category, &plan)?,
            }),

            (Self::Form { selection }, WizardAction::SubmitIntake(intake)) => {
                if intake.category() != selection.category {
                    return Err(WizardError::CategoryMismatch {
                        selected: selection.category,
                        intake: intake.category(),
                    });
                }
                Ok(Self::Checkout {
                    selection: selection.clone(),
                    intake,
                })
            }

            (Self::Home | Self::Catalog { .. }, WizardAction::Back) => Ok(Self::Home),
            (Self::Form { selection }, WizardAction::Back) => Ok(Self::Catalog {
                category: selection.category,
            }),
            (Self::Checkout { selection, .. }, WizardAction::Back) => Ok(Self::Form {
                selection: selection.clone(),
            }),

            (state, action) => Err(WizardError::OutOfOrder {
                step: state.step(),
                action: action.name(),
            }),
        }
    }
}

impl WizardAction {
    const fn name(&self) -> &'static str {
        match self {
            Self::ChooseCategory(_) => "choose a category",
            Self::ChoosePlan(_) => "choose a plan",
            Self::SubmitIntake(_) => "submit the intake form",
            Self::Back => "go back",
            Self::Restart => "restart",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::intake::{self, IntakeDraft};
    use crate::types::Price;

    fn workout_intake() -> IntakeRecord {
        let draft = IntakeDraft {
            name: "Ravi".to_string(),
            age: "31".to_string(),
            gender: "male".to_string(),
            height: "178".to_string(),
            weight: "82".to_string(),
            goal_muscle_gain: true,
            activity_level: "athlete".to_string(),
            ..IntakeDraft::default()
        };
        intake::parse(Category::Workout, &draft).unwrap()
    }

    fn at_checkout() -> WizardState {
        WizardState::Home
            .apply(WizardAction::ChooseCategory(Category::Workout))
            .and_then(|s| s.apply(WizardAction::ChoosePlan("bro-split".to_string())))
            .and_then(|s| s.apply(WizardAction::SubmitIntake(workout_intake())))
            .unwrap()
    }

    #[test]
    fn test_forward_path_carries_selection() {
        let state = at_checkout();
        assert_eq!(state.step(), Step::Checkout);
        let selection = state.selection().unwrap();
        assert_eq!(selection.category, Category::Workout);
        assert_eq!(selection.plan.as_str(), "bro-split");
        assert_eq!(selection.price, Price::inr(1299));
        assert_eq!(state.intake(), Some(&workout_intake()));
    }

    #[test]
    fn test_back_clears_only_the_step_being_left() {
        let form = at_checkout().apply(WizardAction::Back).unwrap();
        assert_eq!(form.step(), Step::Form);
        assert!(form.intake().is_none());
        assert_eq!(form.selection().unwrap().plan.as_str(), "bro-split");

        let catalog = form.apply(WizardAction::Back).unwrap();
        assert_eq!(catalog, WizardState::Catalog {
            category: Category::Workout
        });

        let home = catalog.apply(WizardAction::Back).unwrap();
        assert_eq!(home, WizardState::Home);
        assert_eq!(home.apply(WizardAction::Back).unwrap(), WizardState::Home);
    }

    #[test]
    fn test_resubmitting_after_back_needs_new_intake() {
        let form = at_checkout().apply(WizardAction::Back).unwrap();
        // Checkout is unreachable without submitting an intake again.
        assert!(form.intake().is_none());
        assert_eq!(form.step(), Step::Form);
    }

    #[test]
    fn test_skip_ahead_rejected() {
        let err = WizardState::Home
            .apply(WizardAction::ChoosePlan("vegan".to_string()))
            .unwrap_err();
        assert_eq!(err, WizardError::OutOfOrder {
            step: Step::Home,
            action: "choose a plan",
        });

        let catalog = WizardState::Catalog {
            category: Category::Diet,
        };
        assert!(matches!(
            catalog.apply(WizardAction::SubmitIntake(workout_intake())),
            Err(WizardError::OutOfOrder { .. })
        ));
        assert!(matches!(
            catalog.apply(WizardAction::ChooseCategory(Category::Workout)),
            Err(WizardError::OutOfOrder { .. })
        ));
    }

    #[test]
    fn test_unknown_plan_rejected() {
        let catalog = WizardState::Catalog {
            category: Category::Diet,
        };
        let err = catalog
            .apply(WizardAction::ChoosePlan("bro-split".to_string()))
            .unwrap_err();
        assert!(matches!(err, WizardError::Catalog(_)));
    }

    #[test]
    fn test_intake_category_must_match_selection() {
        let form = WizardState::Form {
            selection: catalog::select(Category::Diet, "veg").unwrap(),
        };
        let err = form
            .apply(WizardAction::SubmitIntake(workout_intake()))
            .unwrap_err();
        assert_eq!(err, WizardError::CategoryMismatch {
            selected: Category::Diet,
            intake: Category::Workout,
        });
    }

    #[test]
    fn test_restart_from_anywhere() {
        assert_eq!(
            at_checkout().apply(WizardAction::Restart).unwrap(),
            WizardState::Home
        );
    }

    #[test]
    fn test_state_survives_serialization() {
        let state = at_checkout();
        let json = serde_json::to_string(&state).unwrap();
        let restored: WizardState = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, state);
    }
}
