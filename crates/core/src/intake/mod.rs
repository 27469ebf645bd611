//! Intake records: what the visitor tells us about themselves.
//!
//! A raw [`IntakeDraft`] comes straight from the form. [`schema::parse`]
//! checks it against the category's field constraints and produces either a
//! typed [`IntakeRecord`] or a [`FieldErrors`] map of messages to show inline.

pub mod draft;
pub mod schema;

use chrono::NaiveTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::Category;

pub use draft::IntakeDraft;
pub use schema::{FieldErrors, fields, parse, validate};

/// Declares a closed set of form options with a stable value and a label.
macro_rules! form_options {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => ($value:literal, $label:literal)),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $value)]
                $variant,
            )+
        }

        impl $name {
            /// All options in display order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Value submitted by the form and written to orders.
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $value,)+
                }
            }

            /// Human-readable label.
            #[must_use]
            pub const fn label(&self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }

            /// Parse a submitted form value.
            #[must_use]
            pub fn from_value(value: &str) -> Option<Self> {
                match value {
                    $($value => Some(Self::$variant),)+
                    _ => None,
                }
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

form_options! {
    /// Gender as selected on the form.
    Gender {
        Male => ("male", "Male"),
        Female => ("female", "Female"),
        Other => ("other", "Other"),
    }
}

form_options! {
    /// Whether the diet plan may include whey protein.
    WheyPreference {
        With => ("with", "With Whey"),
        Without => ("without", "Without Whey"),
    }
}

form_options! {
    /// Supplements the visitor already takes.
    Supplement {
        WheyProtein => ("whey-protein", "Whey Protein"),
        Creatine => ("creatine", "Creatine"),
        Bcaa => ("bcaa", "BCAA"),
        PreWorkout => ("pre-workout", "Pre-workout"),
        MassGainer => ("mass-gainer", "Mass Gainer"),
        Other => ("other", "Other"),
    }
}

form_options! {
    /// Day-to-day activity level for workout plans.
    ActivityLevel {
        Sedentary => ("sedentary", "Sedentary"),
        LightlyActive => ("lightly-active", "Lightly Active"),
        ModeratelyActive => ("moderately-active", "Moderately Active"),
        VeryActive => ("very-active", "Very Active"),
        Athlete => ("athlete", "Athlete"),
    }
}

/// Basic attributes collected by both forms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub age: u8,
    pub gender: Gender,
    /// Height in centimetres.
    pub height_cm: Decimal,
    /// Weight in kilograms.
    pub weight_kg: Decimal,
}

/// Fitness goals. At least one must be set for a valid intake.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goals {
    pub fat_loss: bool,
    pub muscle_gain: bool,
    pub maintenance: bool,
    pub improve_energy: bool,
    pub get_toned: bool,
}

impl Goals {
    /// Whether any goal is selected.
    #[must_use]
    pub const fn any(&self) -> bool {
        self.fat_loss || self.muscle_gain || self.maintenance || self.improve_energy || self.get_toned
    }

    /// Labels of the selected goals, in form order.
    #[must_use]
    pub fn labels(&self) -> Vec<&'static str> {
        [
            (self.fat_loss, "Fat Loss"),
            (self.muscle_gain, "Muscle Gain"),
            (self.maintenance, "Maintenance"),
            (self.improve_energy, "Improve Energy"),
            (self.get_toned, "Get Toned"),
        ]
        .into_iter()
        .filter_map(|(set, label)| set.then_some(label))
        .collect()
    }
}

/// Answers specific to diet plans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DietDetails {
    pub whey_preference: WheyPreference,
    pub diet_preferences: String,
    pub meals_per_day: u8,
    pub preworkout_meals: bool,
    pub postworkout_meals: bool,
    /// Empty when the visitor does not use supplements.
    pub supplements: Vec<Supplement>,
    pub wakeup_time: NaiveTime,
    pub sleep_time: NaiveTime,
    /// Optional monthly food budget in rupees.
    pub budget: Option<Decimal>,
}

/// Answers specific to workout plans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutDetails {
    pub activity_level: ActivityLevel,
}

/// Category-specific part of an intake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IntakeDetails {
    Diet(DietDetails),
    Workout(WorkoutDetails),
}

/// A validated intake. Only [`schema::parse`] produces one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntakeRecord {
    pub profile: Profile,
    pub goals: Goals,
    pub details: IntakeDetails,
}

impl IntakeRecord {
    /// The category whose form produced this record.
    #[must_use]
    pub const fn category(&self) -> Category {
        match self.details {
            IntakeDetails::Diet(_) => Category::Diet,
            IntakeDetails::Workout(_) => Category::Workout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_goals_any() {
        assert!(!Goals::default().any());
        let goals = Goals {
            get_toned: true,
            ..Goals::default()
        };
        assert!(goals.any());
        assert_eq!(goals.labels(), vec!["Get Toned"]);
    }

    #[test]
    fn test_form_option_values() {
        assert_eq!(
            ActivityLevel::from_value("moderately-active"),
            Some(ActivityLevel::ModeratelyActive)
        );
        assert_eq!(ActivityLevel::from_value("couch"), None);
        assert_eq!(Supplement::Bcaa.label(), "BCAA");
        assert_eq!(Gender::ALL.len(), 3);
    }
}
