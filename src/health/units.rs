use serde::{Deserialize, Serialize};

const LBS_TO_KG: f64 = 0.4536;
const KG_TO_LBS: f64 = 2.205;

/// Unit a dog's weigh-in series is recorded in. Fixed at dog creation.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum WeightUnit {
    #[default]
    #[serde(rename = "lbs", alias = "pounds")]
    Pounds,
    #[serde(rename = "kg", alias = "kilograms")]
    Kilograms,
}

impl WeightUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeightUnit::Pounds => "lbs",
            WeightUnit::Kilograms => "kg",
        }
    }
}

pub fn pounds_to_kg(lbs: f64) -> f64 {
    lbs * LBS_TO_KG
}

pub fn kg_to_pounds(kg: f64) -> f64 {
    kg * KG_TO_LBS
}

/// Converts between the two supported units.
///
/// The two factors are not exact inverses, so a round trip drifts slightly.
/// Callers must not rely on `convert(convert(w, a, b), b, a) == w`.
pub fn convert(weight: f64, from: WeightUnit, to: WeightUnit) -> f64 {
    match (from, to) {
        (WeightUnit::Pounds, WeightUnit::Kilograms) => pounds_to_kg(weight),
        (WeightUnit::Kilograms, WeightUnit::Pounds) => kg_to_pounds(weight),
        _ => weight,
    }
}
