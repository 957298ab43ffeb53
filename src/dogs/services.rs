use uuid::Uuid;

use super::dto::{AssessmentQuery, DogAssessment};
use super::repo;
use crate::error::ServiceError;
use crate::health::{
    convert, daily_energy_requirement, daily_portions, estimate_bcs, goal_progress_percent,
    BreedWeightRange, WeightUnit,
};
use crate::models::{Dog, WeighIn};
use crate::remote::RemoteStore;
use crate::weigh_ins;

/// Latest recorded weight, falling back to the weight at sign-up.
pub fn current_weight(dog: &Dog, latest: Option<&WeighIn>) -> f64 {
    latest.map(|w| w.weight).unwrap_or(dog.initial_weight)
}

pub fn assessment_for(
    dog: &Dog,
    latest: Option<&WeighIn>,
    breed_range: Option<BreedWeightRange>,
    calories_per_cup: Option<f64>,
) -> DogAssessment {
    let weight = current_weight(dog, latest);
    let weight_kg = convert(weight, dog.weight_unit, WeightUnit::Kilograms);
    let daily_calories = daily_energy_requirement(weight_kg, dog.activity_level);
    let bcs = estimate_bcs(weight, breed_range, dog.weight_unit);

    DogAssessment {
        dog_id: dog.id,
        name: dog.name.clone(),
        current_weight: weight,
        target_weight: dog.target_weight,
        weight_unit: dog.weight_unit,
        weight_kg,
        goal_progress: goal_progress_percent(dog.initial_weight, dog.target_weight, weight),
        activity_level: dog.activity_level,
        activity_label: dog.activity_level.label(),
        daily_calories,
        daily_portions: calories_per_cup.map(|per_cup| daily_portions(daily_calories as f64, per_cup)),
        bcs_color: bcs.category.color(),
        bcs,
    }
}

pub async fn assess(
    store: &dyn RemoteStore,
    dog_id: Uuid,
    query: &AssessmentQuery,
) -> Result<DogAssessment, ServiceError> {
    let breed_range = query.breed_range()?;
    let dog = repo::get(store, dog_id).await?;
    let latest = weigh_ins::repo::latest(store, dog_id).await?;
    Ok(assessment_for(&dog, latest.as_ref(), breed_range, query.calories_per_cup))
}
