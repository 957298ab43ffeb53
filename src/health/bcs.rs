use serde::{Deserialize, Serialize};

use super::energy::round_to;
use super::units::{kg_to_pounds, WeightUnit};

const UNDERWEIGHT_MARGIN: f64 = 0.85;
const OVERWEIGHT_MARGIN: f64 = 1.15;
const OBESE_SPAN: f64 = 0.15;

pub const NO_BREED_DATA: &str = "No breed data available for BCS estimate";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum WeightCategory {
    Underweight,
    Ideal,
    Overweight,
    Obese,
}

impl WeightCategory {
    pub fn description(&self) -> &'static str {
        match self {
            WeightCategory::Underweight => "Below ideal weight range for breed",
            WeightCategory::Ideal => "Within healthy weight range for breed",
            WeightCategory::Overweight => "Above ideal weight range for breed",
            WeightCategory::Obese => "Significantly above ideal weight range",
        }
    }

    /// Display color: amber, green, orange, red.
    pub fn color(&self) -> &'static str {
        match self {
            WeightCategory::Underweight => "#F59E0B",
            WeightCategory::Ideal => "#10B981",
            WeightCategory::Overweight => "#F97316",
            WeightCategory::Obese => "#EF4444",
        }
    }
}

/// Breed reference weights, always in pounds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BreedWeightRange {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BcsEstimate {
    pub category: WeightCategory,
    pub score: f64,
    pub description: &'static str,
}

/// Estimates a body condition score on the 1-9 scale from breed reference weights.
///
/// Without a breed range the estimate is always `ideal` / 5. A degenerate range
/// (`min == max`) scores a matching weight as 5 instead of dividing by zero.
pub fn estimate_bcs(
    current_weight: f64,
    breed_range: Option<BreedWeightRange>,
    unit: WeightUnit,
) -> BcsEstimate {
    let Some(BreedWeightRange { min, max }) = breed_range else {
        return BcsEstimate {
            category: WeightCategory::Ideal,
            score: 5.0,
            description: NO_BREED_DATA,
        };
    };

    let weight = match unit {
        WeightUnit::Kilograms => kg_to_pounds(current_weight),
        WeightUnit::Pounds => current_weight,
    };

    let (category, score) = if weight < min * UNDERWEIGHT_MARGIN {
        (WeightCategory::Underweight, 2.0)
    } else if weight < min {
        (WeightCategory::Underweight, 3.0)
    } else if weight <= max {
        let span = max - min;
        let position = if span > 0.0 { (weight - min) / span } else { 0.5 };
        (WeightCategory::Ideal, round_to(4.0 + position * 2.0, 1))
    } else if weight <= max * OVERWEIGHT_MARGIN {
        (WeightCategory::Overweight, 7.0)
    } else {
        let excess = (weight - max * OVERWEIGHT_MARGIN) / (max * OBESE_SPAN);
        (WeightCategory::Obese, 8.0 + excess.min(1.0))
    };

    BcsEstimate {
        category,
        score: round_to(score, 1),
        description: category.description(),
    }
}
