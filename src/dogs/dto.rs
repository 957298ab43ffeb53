use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ServiceError;
use crate::health::{ActivityLevel, BcsEstimate, BreedWeightRange, WeightUnit};

#[derive(Debug, Default, Deserialize)]
pub struct AssessmentQuery {
    pub breed_min: Option<f64>,
    pub breed_max: Option<f64>,
    /// Calorie density of the current food, for the portion recommendation.
    pub calories_per_cup: Option<f64>,
}

impl AssessmentQuery {
    pub fn breed_range(&self) -> Result<Option<BreedWeightRange>, ServiceError> {
        match (self.breed_min, self.breed_max) {
            (None, None) => Ok(None),
            (Some(min), Some(max)) if min > 0.0 && min <= max => Ok(Some(BreedWeightRange { min, max })),
            (Some(_), Some(_)) => Err(ServiceError::InvalidInput(
                "breed_min must be positive and not above breed_max".into(),
            )),
            _ => Err(ServiceError::InvalidInput(
                "breed_min and breed_max must be given together".into(),
            )),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DogAssessment {
    pub dog_id: Uuid,
    pub name: String,
    pub current_weight: f64,
    pub target_weight: f64,
    pub weight_unit: WeightUnit,
    pub weight_kg: f64,
    pub goal_progress: u8,
    pub activity_level: ActivityLevel,
    pub activity_label: &'static str,
    pub daily_calories: i64,
    pub daily_portions: Option<f64>,
    pub bcs: BcsEstimate,
    pub bcs_color: &'static str,
}
