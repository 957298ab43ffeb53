use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    WeightLoss,
    #[default]
    Maintenance,
    Active,
}

impl ActivityLevel {
    /// Multiplier applied to the resting requirement.
    pub fn factor(&self) -> f64 {
        match self {
            ActivityLevel::WeightLoss => 1.0,
            ActivityLevel::Maintenance => 1.6,
            ActivityLevel::Active => 2.0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ActivityLevel::WeightLoss => "Weight Loss (1.0x RER)",
            ActivityLevel::Maintenance => "Maintenance (1.6x RER)",
            ActivityLevel::Active => "Active (2.0x RER)",
        }
    }
}

/// Resting energy requirement in kcal/day: `70 * kg^0.75`.
///
/// Negative weights are treated as zero.
pub fn resting_energy_requirement(weight_kg: f64) -> f64 {
    70.0 * weight_kg.max(0.0).powf(0.75)
}

/// Daily energy requirement in whole kcal for the given activity level.
pub fn daily_energy_requirement(weight_kg: f64, level: ActivityLevel) -> i64 {
    (resting_energy_requirement(weight_kg) * level.factor()).round() as i64
}

/// Portions per day (cups, cans, ...) rounded to two decimals.
/// A non-positive calorie density yields zero.
pub fn daily_portions(daily_calories: f64, calories_per_unit: f64) -> f64 {
    if calories_per_unit <= 0.0 {
        return 0.0;
    }
    round_to(daily_calories / calories_per_unit, 2)
}

/// Calories of a single logged meal, rounded to whole kcal.
pub fn meal_calories(portion_size: f64, calories_per_unit: f64) -> i64 {
    (portion_size * calories_per_unit).round() as i64
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rer_for_ten_kg_dog() {
        let rer = resting_energy_requirement(10.0);
        assert!((rer - 394.0).abs() < 0.5, "rer was {rer}");
    }

    #[test]
    fn rer_for_thirty_kg_dog_is_in_expected_band() {
        let rer = resting_energy_requirement(30.0);
        assert!(rer > 600.0 && rer < 1000.0);
    }

    #[test]
    fn rer_is_zero_for_zero_or_negative_weight() {
        assert_eq!(resting_energy_requirement(0.0), 0.0);
        assert_eq!(resting_energy_requirement(-3.0), 0.0);
    }

    #[test]
    fn der_applies_activity_factor() {
        let rer = resting_energy_requirement(10.0);
        assert_eq!(daily_energy_requirement(10.0, ActivityLevel::WeightLoss), rer.round() as i64);
        assert_eq!(daily_energy_requirement(10.0, ActivityLevel::Maintenance), (rer * 1.6).round() as i64);
        assert_eq!(daily_energy_requirement(10.0, ActivityLevel::Active), (rer * 2.0).round() as i64);
    }

    #[test]
    fn der_is_monotonic_in_weight_and_level() {
        let levels = [ActivityLevel::WeightLoss, ActivityLevel::Maintenance, ActivityLevel::Active];
        for level in levels {
            let mut last = daily_energy_requirement(1.0, level);
            for kg in [5.0, 10.0, 20.0, 40.0, 80.0] {
                let der = daily_energy_requirement(kg, level);
                assert!(der > last, "{level:?} not increasing at {kg}kg");
                last = der;
            }
        }
        for kg in [3.0, 15.0, 45.0] {
            let loss = daily_energy_requirement(kg, ActivityLevel::WeightLoss);
            let maint = daily_energy_requirement(kg, ActivityLevel::Maintenance);
            let active = daily_energy_requirement(kg, ActivityLevel::Active);
            assert!(loss < maint && maint < active);
        }
    }

    #[test]
    fn portions_round_to_two_decimals() {
        assert_eq!(daily_portions(400.0, 350.0), 1.14);
        assert_eq!(daily_portions(700.0, 350.0), 2.0);
    }

    #[test]
    fn portions_guard_non_positive_density() {
        for calories in [0.0, 400.0, 1234.5] {
            assert_eq!(daily_portions(calories, 0.0), 0.0);
            assert_eq!(daily_portions(calories, -10.0), 0.0);
        }
    }

    #[test]
    fn meal_calories_round_to_whole_kcal() {
        assert_eq!(meal_calories(1.5, 350.0), 525);
        assert_eq!(meal_calories(0.33, 380.0), 125);
    }

    #[test]
    fn activity_labels_are_fixed() {
        assert_eq!(ActivityLevel::WeightLoss.label(), "Weight Loss (1.0x RER)");
        assert_eq!(ActivityLevel::Maintenance.label(), "Maintenance (1.6x RER)");
        assert_eq!(ActivityLevel::Active.label(), "Active (2.0x RER)");
    }

    #[test]
    fn activity_level_uses_snake_case_tags() {
        let level: ActivityLevel = serde_json::from_str("\"weight_loss\"").unwrap();
        assert_eq!(level, ActivityLevel::WeightLoss);
    }
}
