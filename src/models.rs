//! Records exchanged with the remote store. Field names match the collection columns.

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::health::{ActivityLevel, WeightUnit};
use crate::milestones::MilestoneType;

time::serde::format_description!(calendar_date, Date, "[year]-[month]-[day]");

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Dog {
    pub id: Uuid,
    #[serde(default)]
    pub user_id: Option<Uuid>,
    pub name: String,
    #[serde(default)]
    pub breed: Option<String>,
    pub initial_weight: f64,
    pub target_weight: f64,
    pub weight_unit: WeightUnit,
    pub activity_level: ActivityLevel,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeighIn {
    pub id: Uuid,
    pub dog_id: Uuid,
    pub weight: f64,
    #[serde(with = "calendar_date")]
    pub weighed_on: Date,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// A weigh-in as submitted by the user, before the store assigns id and timestamp.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewWeighIn {
    pub dog_id: Uuid,
    pub weight: f64,
    #[serde(with = "calendar_date")]
    pub weighed_on: Date,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
    #[default]
    Meal,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PortionUnit {
    #[default]
    Cups,
    Grams,
    Oz,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeedingLog {
    pub id: Uuid,
    pub dog_id: Uuid,
    #[serde(default)]
    pub food_product_id: Option<Uuid>,
    pub portion_size: f64,
    pub portion_unit: PortionUnit,
    pub calories: i64,
    pub meal_type: MealType,
    #[serde(with = "time::serde::rfc3339")]
    pub fed_at: OffsetDateTime,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewFeedingLog {
    pub dog_id: Uuid,
    #[serde(default)]
    pub food_product_id: Option<Uuid>,
    pub portion_size: f64,
    #[serde(default)]
    pub portion_unit: PortionUnit,
    pub calories: i64,
    #[serde(default)]
    pub meal_type: MealType,
    #[serde(with = "time::serde::rfc3339")]
    pub fed_at: OffsetDateTime,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Milestone {
    pub id: Uuid,
    pub dog_id: Uuid,
    pub milestone_type: MilestoneType,
    #[serde(default)]
    pub weight_at: Option<f64>,
    #[serde(with = "time::serde::rfc3339")]
    pub achieved_at: OffsetDateTime,
    #[serde(default)]
    pub shared: bool,
}

/// Row written by the milestone upsert; `(dog_id, milestone_type)` is the conflict key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewMilestone {
    pub dog_id: Uuid,
    pub milestone_type: MilestoneType,
    pub weight_at: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use time::macros::date;

    #[test]
    fn weigh_in_dates_use_calendar_format() {
        let new = NewWeighIn {
            dog_id: Uuid::nil(),
            weight: 70.5,
            weighed_on: date!(2024 - 01 - 08),
            notes: None,
        };
        let value = serde_json::to_value(&new).unwrap();
        assert_eq!(value["weighed_on"], json!("2024-01-08"));
    }

    #[test]
    fn weigh_in_parses_store_row() {
        let row = json!({
            "id": "6f1c1d3e-8d4f-4e59-9b1c-2a3a1f0c9e11",
            "dog_id": "0b8a7c35-5a0b-4f7e-8d0d-111111111111",
            "weight": 72,
            "weighed_on": "2024-02-01",
            "notes": null,
            "created_at": "2024-02-01T08:30:00.123456+00:00"
        });
        let weigh_in: WeighIn = serde_json::from_value(row).unwrap();
        assert_eq!(weigh_in.weight, 72.0);
        assert_eq!(weigh_in.weighed_on, date!(2024 - 02 - 01));
    }

    #[test]
    fn dog_reads_unit_and_activity_tags() {
        let row = json!({
            "id": "0b8a7c35-5a0b-4f7e-8d0d-111111111111",
            "name": "Biscuit",
            "initial_weight": 80.0,
            "target_weight": 60.0,
            "weight_unit": "lbs",
            "activity_level": "weight_loss",
            "photo_url": null
        });
        let dog: Dog = serde_json::from_value(row).unwrap();
        assert_eq!(dog.weight_unit, WeightUnit::Pounds);
        assert_eq!(dog.activity_level, ActivityLevel::WeightLoss);
        assert_eq!(dog.breed, None);
    }
}
