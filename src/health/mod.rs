//! Pure weight-health computations: unit conversion, energy requirements,
//! body condition and goal progress. Nothing here performs I/O or fails.

pub mod bcs;
pub mod energy;
pub mod units;

pub use bcs::{estimate_bcs, BcsEstimate, BreedWeightRange, WeightCategory};
pub use energy::{
    daily_energy_requirement, daily_portions, meal_calories, resting_energy_requirement, ActivityLevel,
};
pub use units::{convert, kg_to_pounds, pounds_to_kg, WeightUnit};

/// Share of the planned weight change already achieved, as a whole percent in `[0, 100]`.
pub fn goal_progress_percent(initial_weight: f64, target_weight: f64, current_weight: f64) -> u8 {
    let total_change = initial_weight - target_weight;
    if total_change == 0.0 {
        return 0;
    }
    let percent = ((initial_weight - current_weight) / total_change * 100.0).round();
    percent.clamp(0.0, 100.0) as u8
}
