//! Intake form schema and validator.
//!
//! ## Constraints
//!
//! Both categories:
//! - `name`: 2-100 characters after trimming
//! - `age`: whole number 15-80
//! - `gender`: male, female or other
//! - `height`: 120-250 cm
//! - `weight`: 30-200 kg
//! - `goals`: at least one goal ticked
//!
//! Diet:
//! - `whey_preference`: with or without
//! - `diet_preferences`: 10-1000 characters
//! - `meals_per_day`: 3, 4, 5 or 6
//! - `supplement_types`: at least one, only when supplements are used
//! - `wakeup_time`, `sleep_time`: required, `HH:MM`
//! - `budget`: optional, not negative
//!
//! Workout:
//! - `activity_level`: one of the [`ActivityLevel`] options

use std::collections::BTreeMap;
use std::ops::RangeInclusive;
use std::str::FromStr;

use chrono::NaiveTime;
use rust_decimal::Decimal;
use serde::Serialize;

use super::{
    ActivityLevel, DietDetails, Gender, IntakeDetails, IntakeDraft, IntakeRecord, Profile,
    WheyPreference, WorkoutDetails,
};
use crate::types::Category;

/// Field names used as keys in [`FieldErrors`] and as form input names.
pub mod fields {
    pub const NAME: &str = "name";
    pub const AGE: &str = "age";
    pub const GENDER: &str = "gender";
    pub const HEIGHT: &str = "height";
    pub const WEIGHT: &str = "weight";
    pub const GOALS: &str = "goals";
    pub const WHEY_PREFERENCE: &str = "whey_preference";
    pub const DIET_PREFERENCES: &str = "diet_preferences";
    pub const MEALS_PER_DAY: &str = "meals_per_day";
    pub const SUPPLEMENT_TYPES: &str = "supplement_types";
    pub const WAKEUP_TIME: &str = "wakeup_time";
    pub const SLEEP_TIME: &str = "sleep_time";
    pub const BUDGET: &str = "budget";
    pub const ACTIVITY_LEVEL: &str = "activity_level";
}

pub const NAME_LENGTH: RangeInclusive<usize> = 2..=100;
pub const AGE_RANGE: RangeInclusive<u8> = 15..=80;
pub const HEIGHT_CM_RANGE: RangeInclusive<u16> = 120..=250;
pub const WEIGHT_KG_RANGE: RangeInclusive<u16> = 30..=200;
pub const DIET_PREFERENCES_LENGTH: RangeInclusive<usize> = 10..=1000;
pub const MEALS_PER_DAY_OPTIONS: [u8; 4] = [3, 4, 5, 6];

const GOALS_REQUIRED: &str = "Please select at least one goal";

/// Violations keyed by field name. Empty means the draft is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    /// Record a violation, replacing any earlier one for the field.
    pub fn insert(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    /// Message for a field, if it is invalid.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Whether a field is invalid.
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate violations ordered by field name.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }

    /// Keep the value on success, record the message on failure.
    fn check<T>(&mut self, field: &'static str, result: Result<T, String>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(message) => {
                self.insert(field, message);
                None
            }
        }
    }
}

/// Validate a draft for a category.
///
/// Runs on every field change; the submit control stays disabled until the
/// returned map is empty.
#[must_use]
pub fn validate(category: Category, draft: &IntakeDraft) -> FieldErrors {
    parse(category, draft).err().unwrap_or_default()
}

/// Validate a draft and build the intake record.
///
/// # Errors
///
/// Returns every violated constraint, keyed by field name.
pub fn parse(category: Category, draft: &IntakeDraft) -> Result<IntakeRecord, FieldErrors> {
    let mut errors = FieldErrors::default();

    let name = errors.check(fields::NAME, parse_name(&draft.name));
    let age = errors.check(fields::AGE, parse_age(&draft.age));
    let gender = errors.check(
        fields::GENDER,
        Gender::from_value(draft.gender.trim()).ok_or_else(|| "Please select a gender".to_string()),
    );
    let height_cm = errors.check(
        fields::HEIGHT,
        parse_measure(&draft.height, "Height", "cm", &HEIGHT_CM_RANGE),
    );
    let weight_kg = errors.check(
        fields::WEIGHT,
        parse_measure(&draft.weight, "Weight", "kg", &WEIGHT_KG_RANGE),
    );

    let goals = draft.goals();
    if !goals.any() {
        errors.insert(fields::GOALS, GOALS_REQUIRED);
    }

    let details = match category {
        Category::Diet => parse_diet(draft, &mut errors).map(IntakeDetails::Diet),
        Category::Workout => parse_workout(draft, &mut errors).map(IntakeDetails::Workout),
    };

    let (Some(name), Some(age), Some(gender), Some(height_cm), Some(weight_kg), Some(details)) =
        (name, age, gender, height_cm, weight_kg, details)
    else {
        return Err(errors);
    };
    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(IntakeRecord {
        profile: Profile {
            name,
            age,
            gender,
            height_cm,
            weight_kg,
        },
        goals,
        details,
    })
}

fn parse_diet(draft: &IntakeDraft, errors: &mut FieldErrors) -> Option<DietDetails> {
    let whey_preference = errors.check(
        fields::WHEY_PREFERENCE,
        WheyPreference::from_value(draft.whey_preference.trim())
            .ok_or_else(|| "Please choose a whey preference".to_string()),
    );
    let diet_preferences = errors.check(
        fields::DIET_PREFERENCES,
        parse_diet_preferences(&draft.diet_preferences),
    );
    let meals_per_day = errors.check(fields::MEALS_PER_DAY, parse_meals(&draft.meals_per_day));

    let supplements = if draft.supplements_used {
        let selected = draft.selected_supplements();
        if selected.is_empty() {
            errors.insert(
                fields::SUPPLEMENT_TYPES,
                "Select at least one supplement you use",
            );
        }
        selected
    } else {
        Vec::new()
    };

    let wakeup_time = errors.check(
        fields::WAKEUP_TIME,
        parse_time(&draft.wakeup_time, "Wake-up time is required"),
    );
    let sleep_time = errors.check(
        fields::SLEEP_TIME,
        parse_time(&draft.sleep_time, "Sleep time is required"),
    );
    let budget = errors.check(fields::BUDGET, parse_budget(&draft.budget));

    Some(DietDetails {
        whey_preference: whey_preference?,
        diet_preferences: diet_preferences?,
        meals_per_day: meals_per_day?,
        preworkout_meals: draft.preworkout_meals,
        postworkout_meals: draft.postworkout_meals,
        supplements,
        wakeup_time: wakeup_time?,
        sleep_time: sleep_time?,
        budget: budget?,
    })
}

fn parse_workout(draft: &IntakeDraft, errors: &mut FieldErrors) -> Option<WorkoutDetails> {
    let activity_level = errors.check(
        fields::ACTIVITY_LEVEL,
        ActivityLevel::from_value(draft.activity_level.trim())
            .ok_or_else(|| "Please select an activity level".to_string()),
    )?;
    Some(WorkoutDetails { activity_level })
}

fn parse_name(raw: &str) -> Result<String, String> {
    let name = raw.trim();
    let length = name.chars().count();
    if length < *NAME_LENGTH.start() {
        return Err(format!(
            "Name must be at least {} characters",
            NAME_LENGTH.start()
        ));
    }
    if length > *NAME_LENGTH.end() {
        return Err(format!("Name must be at most {} characters", NAME_LENGTH.end()));
    }
    Ok(name.to_string())
}

fn parse_age(raw: &str) -> Result<u8, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err("Age is required".to_string());
    }
    let out_of_range = || {
        format!(
            "Age must be between {} and {}",
            AGE_RANGE.start(),
            AGE_RANGE.end()
        )
    };
    let age: i64 = raw
        .parse()
        .map_err(|_| "Age must be a whole number".to_string())?;
    u8::try_from(age)
        .ok()
        .filter(|age| AGE_RANGE.contains(age))
        .ok_or_else(out_of_range)
}

fn parse_measure(
    raw: &str,
    label: &str,
    unit: &str,
    range: &RangeInclusive<u16>,
) -> Result<Decimal, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(format!("{label} is required"));
    }
    let value = Decimal::from_str(raw).map_err(|_| format!("{label} must be a number"))?;
    if value < Decimal::from(*range.start()) || value > Decimal::from(*range.end()) {
        return Err(format!(
            "{label} must be between {} and {} {unit}",
            range.start(),
            range.end()
        ));
    }
    Ok(value)
}

fn parse_diet_preferences(raw: &str) -> Result<String, String> {
    let text = raw.trim();
    let length = text.chars().count();
    if length < *DIET_PREFERENCES_LENGTH.start() {
        return Err("Please provide more details about your diet preferences".to_string());
    }
    if length > *DIET_PREFERENCES_LENGTH.end() {
        return Err(format!(
            "Diet preferences must be at most {} characters",
            DIET_PREFERENCES_LENGTH.end()
        ));
    }
    Ok(text.to_string())
}

fn parse_meals(raw: &str) -> Result<u8, String> {
    raw.trim()
        .parse::<u8>()
        .ok()
        .filter(|meals| MEALS_PER_DAY_OPTIONS.contains(meals))
        .ok_or_else(|| "Meals per day must be 3, 4, 5, or 6".to_string())
}

/// Accepts `HH:MM`, and `HH:MM:SS` as sent by time inputs with a step.
fn parse_time(raw: &str, required: &str) -> Result<NaiveTime, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(required.to_string());
    }
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .map_err(|_| "Use the HH:MM format".to_string())
}

fn parse_budget(raw: &str) -> Result<Option<Decimal>, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    let budget = Decimal::from_str(raw).map_err(|_| "Budget must be a number".to_string())?;
    if budget.is_sign_negative() {
        return Err("Budget must be a positive amount".to_string());
    }
    Ok(Some(budget))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::intake::Supplement;

    fn base_draft() -> IntakeDraft {
        IntakeDraft {
            name: "Asha".to_string(),
            age: "25".to_string(),
            gender: "female".to_string(),
            height: "165".to_string(),
            weight: "58.5".to_string(),
            goal_fat_loss: true,
            ..IntakeDraft::default()
        }
    }

    fn diet_draft() -> IntakeDraft {
        IntakeDraft {
            whey_preference: "without".to_string(),
            diet_preferences: "No peanuts, prefer south indian food".to_string(),
            meals_per_day: "4".to_string(),
            wakeup_time: "06:30".to_string(),
            sleep_time: "22:45".to_string(),
            ..base_draft()
        }
    }

    fn workout_draft() -> IntakeDraft {
        IntakeDraft {
            activity_level: "very-active".to_string(),
            ..base_draft()
        }
    }

    #[test]
    fn test_valid_diet_draft() {
        let record = parse(Category::Diet, &diet_draft()).unwrap();
        assert_eq!(record.category(), Category::Diet);
        assert_eq!(record.profile.name, "Asha");
        assert_eq!(record.profile.weight_kg, Decimal::new(585, 1));
        let IntakeDetails::Diet(details) = record.details else {
            panic!("expected diet details");
        };
        assert_eq!(details.meals_per_day, 4);
        assert_eq!(
            details.wakeup_time,
            NaiveTime::from_hms_opt(6, 30, 0).unwrap()
        );
        assert!(details.budget.is_none());
        assert!(details.supplements.is_empty());
    }

    #[test]
    fn test_valid_workout_draft() {
        let record = parse(Category::Workout, &workout_draft()).unwrap();
        assert_eq!(
            record.details,
            IntakeDetails::Workout(WorkoutDetails {
                activity_level: ActivityLevel::VeryActive
            })
        );
    }

    #[test]
    fn test_empty_draft_reports_every_required_field() {
        let diet = validate(Category::Diet, &IntakeDraft::default());
        for field in [
            fields::NAME,
            fields::AGE,
            fields::GENDER,
            fields::HEIGHT,
            fields::WEIGHT,
            fields::GOALS,
            fields::WHEY_PREFERENCE,
            fields::DIET_PREFERENCES,
            fields::MEALS_PER_DAY,
            fields::WAKEUP_TIME,
            fields::SLEEP_TIME,
        ] {
            assert!(diet.contains(field), "diet should flag {field}");
        }
        assert!(!diet.contains(fields::BUDGET));
        assert!(!diet.contains(fields::SUPPLEMENT_TYPES));

        let workout = validate(Category::Workout, &IntakeDraft::default());
        assert!(workout.contains(fields::ACTIVITY_LEVEL));
        assert!(!workout.contains(fields::DIET_PREFERENCES));
    }

    #[test]
    fn test_clearing_any_required_field_invalidates() {
        let clears: [(&str, fn(&mut IntakeDraft)); 9] = [
            (fields::NAME, |d| d.name.clear()),
            (fields::AGE, |d| d.age.clear()),
            (fields::GENDER, |d| d.gender.clear()),
            (fields::HEIGHT, |d| d.height.clear()),
            (fields::WEIGHT, |d| d.weight.clear()),
            (fields::WHEY_PREFERENCE, |d| d.whey_preference.clear()),
            (fields::DIET_PREFERENCES, |d| d.diet_preferences.clear()),
            (fields::MEALS_PER_DAY, |d| d.meals_per_day.clear()),
            (fields::WAKEUP_TIME, |d| d.wakeup_time.clear()),
        ];
        for (field, clear) in clears {
            let mut draft = diet_draft();
            clear(&mut draft);
            let errors = validate(Category::Diet, &draft);
            assert_eq!(errors.len(), 1, "only {field} should fail: {errors:?}");
            assert!(errors.contains(field));
            assert!(parse(Category::Diet, &draft).is_err());
        }
    }

    #[test]
    fn test_no_goals_is_cross_field_violation() {
        let mut draft = workout_draft();
        draft.goal_fat_loss = false;
        let errors = validate(Category::Workout, &draft);
        assert_eq!(errors.get(fields::GOALS), Some(GOALS_REQUIRED));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_any_single_goal_satisfies() {
        let setters: [fn(&mut IntakeDraft); 5] = [
            |d| d.goal_fat_loss = true,
            |d| d.goal_muscle_gain = true,
            |d| d.goal_maintenance = true,
            |d| d.goal_improve_energy = true,
            |d| d.goal_get_toned = true,
        ];
        for set in setters {
            let mut draft = workout_draft();
            draft.goal_fat_loss = false;
            set(&mut draft);
            assert!(validate(Category::Workout, &draft).is_empty());
        }
    }

    #[test]
    fn test_name_length_bounds() {
        let mut draft = workout_draft();
        draft.name = " A ".to_string();
        assert_eq!(
            validate(Category::Workout, &draft).get(fields::NAME),
            Some("Name must be at least 2 characters")
        );
        draft.name = "x".repeat(101);
        assert_eq!(
            validate(Category::Workout, &draft).get(fields::NAME),
            Some("Name must be at most 100 characters")
        );
    }

    #[test]
    fn test_numeric_ranges() {
        let mut draft = workout_draft();
        draft.age = "14".to_string();
        draft.height = "251".to_string();
        draft.weight = "heavy".to_string();
        let errors = validate(Category::Workout, &draft);
        assert_eq!(errors.get(fields::AGE), Some("Age must be between 15 and 80"));
        assert_eq!(
            errors.get(fields::HEIGHT),
            Some("Height must be between 120 and 250 cm")
        );
        assert_eq!(errors.get(fields::WEIGHT), Some("Weight must be a number"));

        draft.age = "80".to_string();
        draft.height = "120".to_string();
        draft.weight = "200".to_string();
        assert!(validate(Category::Workout, &draft).is_empty());

        draft.age = "-3".to_string();
        assert!(validate(Category::Workout, &draft).contains(fields::AGE));
    }

    #[test]
    fn test_enumerated_values() {
        let mut draft = diet_draft();
        draft.meals_per_day = "7".to_string();
        draft.gender = "robot".to_string();
        draft.whey_preference = "maybe".to_string();
        let errors = validate(Category::Diet, &draft);
        assert_eq!(
            errors.get(fields::MEALS_PER_DAY),
            Some("Meals per day must be 3, 4, 5, or 6")
        );
        assert!(errors.contains(fields::GENDER));
        assert!(errors.contains(fields::WHEY_PREFERENCE));
    }

    #[test]
    fn test_supplement_types_required_only_when_used() {
        let mut draft = diet_draft();
        draft.supplements_used = true;
        assert_eq!(
            validate(Category::Diet, &draft).get(fields::SUPPLEMENT_TYPES),
            Some("Select at least one supplement you use")
        );

        draft.supplement_creatine = true;
        let record = parse(Category::Diet, &draft).unwrap();
        let IntakeDetails::Diet(details) = record.details else {
            panic!("expected diet details");
        };
        assert_eq!(details.supplements, vec![Supplement::Creatine]);

        // Ticked boxes are dropped when supplements are not used.
        draft.supplements_used = false;
        let record = parse(Category::Diet, &draft).unwrap();
        let IntakeDetails::Diet(details) = record.details else {
            panic!("expected diet details");
        };
        assert!(details.supplements.is_empty());
    }

    #[test]
    fn test_time_format() {
        let mut draft = diet_draft();
        draft.sleep_time = "10pm".to_string();
        draft.wakeup_time = "06:30:00".to_string();
        let errors = validate(Category::Diet, &draft);
        assert_eq!(errors.get(fields::SLEEP_TIME), Some("Use the HH:MM format"));
        assert!(!errors.contains(fields::WAKEUP_TIME));
    }

    #[test]
    fn test_budget_optional_and_non_negative() {
        let mut draft = diet_draft();
        draft.budget = "-100".to_string();
        assert_eq!(
            validate(Category::Diet, &draft).get(fields::BUDGET),
            Some("Budget must be a positive amount")
        );

        draft.budget = "5000".to_string();
        let record = parse(Category::Diet, &draft).unwrap();
        let IntakeDetails::Diet(details) = record.details else {
            panic!("expected diet details");
        };
        assert_eq!(details.budget, Some(Decimal::from(5000)));
    }

    #[test]
    fn test_diet_fields_ignored_for_workout() {
        let mut draft = workout_draft();
        draft.meals_per_day = "99".to_string();
        draft.supplements_used = true;
        assert!(validate(Category::Workout, &draft).is_empty());
    }
}
