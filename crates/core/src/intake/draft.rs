//! Raw intake form input.

use serde::Deserialize;

use super::{Goals, Supplement};

/// Unvalidated intake form fields exactly as submitted.
///
/// Text and number inputs stay as strings so that an empty or malformed
/// value becomes a field message instead of a deserialization failure.
/// Checkboxes and yes/no radios submit `true`/`false`; a missing key means
/// unchecked. Fields that do not apply to the category are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct IntakeDraft {
    pub name: String,
    pub age: String,
    pub gender: String,
    pub height: String,
    pub weight: String,

    pub goal_fat_loss: bool,
    pub goal_muscle_gain: bool,
    pub goal_maintenance: bool,
    pub goal_improve_energy: bool,
    pub goal_get_toned: bool,

    // Diet
    pub whey_preference: String,
    pub diet_preferences: String,
    pub meals_per_day: String,
    pub preworkout_meals: bool,
    pub postworkout_meals: bool,
    pub supplements_used: bool,
    pub supplement_whey_protein: bool,
    pub supplement_creatine: bool,
    pub supplement_bcaa: bool,
    pub supplement_pre_workout: bool,
    pub supplement_mass_gainer: bool,
    pub supplement_other: bool,
    pub wakeup_time: String,
    pub sleep_time: String,
    pub budget: String,

    // Workout
    pub activity_level: String,
}

impl IntakeDraft {
    /// Goal checkboxes as a [`Goals`] set.
    #[must_use]
    pub const fn goals(&self) -> Goals {
        Goals {
            fat_loss: self.goal_fat_loss,
            muscle_gain: self.goal_muscle_gain,
            maintenance: self.goal_maintenance,
            improve_energy: self.goal_improve_energy,
            get_toned: self.goal_get_toned,
        }
    }

    /// Whether a supplement checkbox is ticked.
    #[must_use]
    pub const fn has_supplement(&self, supplement: Supplement) -> bool {
        match supplement {
            Supplement::WheyProtein => self.supplement_whey_protein,
            Supplement::Creatine => self.supplement_creatine,
            Supplement::Bcaa => self.supplement_bcaa,
            Supplement::PreWorkout => self.supplement_pre_workout,
            Supplement::MassGainer => self.supplement_mass_gainer,
            Supplement::Other => self.supplement_other,
        }
    }

    /// Ticked supplements, in form order.
    #[must_use]
    pub fn selected_supplements(&self) -> Vec<Supplement> {
        Supplement::ALL
            .iter()
            .copied()
            .filter(|s| self.has_supplement(*s))
            .collect()
    }
}

/// Form field name of a supplement checkbox.
#[must_use]
pub const fn supplement_field(supplement: Supplement) -> &'static str {
    match supplement {
        Supplement::WheyProtein => "supplement_whey_protein",
        Supplement::Creatine => "supplement_creatine",
        Supplement::Bcaa => "supplement_bcaa",
        Supplement::PreWorkout => "supplement_pre_workout",
        Supplement::MassGainer => "supplement_mass_gainer",
        Supplement::Other => "supplement_other",
    }
}
