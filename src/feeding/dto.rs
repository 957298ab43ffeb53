use serde::{Deserialize, Serialize};
use time::macros::format_description;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::error::ServiceError;
use crate::health::meal_calories;
use crate::models::{FeedingLog, MealType, NewFeedingLog, PortionUnit};

#[derive(Debug, Deserialize)]
pub struct CreateFeedingLogRequest {
    pub dog_id: Uuid,
    #[serde(default)]
    pub food_product_id: Option<Uuid>,
    pub portion_size: f64,
    #[serde(default)]
    pub portion_unit: PortionUnit,
    /// Explicit calories; otherwise computed from `calories_per_unit`.
    #[serde(default)]
    pub calories: Option<i64>,
    #[serde(default)]
    pub calories_per_unit: Option<f64>,
    #[serde(default)]
    pub meal_type: MealType,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub fed_at: Option<OffsetDateTime>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl CreateFeedingLogRequest {
    pub fn into_new(self, now: OffsetDateTime) -> Result<NewFeedingLog, ServiceError> {
        if !self.portion_size.is_finite() || self.portion_size <= 0.0 {
            return Err(ServiceError::InvalidInput("portion_size must be a positive number".into()));
        }
        let calories = match (self.calories, self.calories_per_unit) {
            (Some(c), _) if c >= 0 => c,
            (Some(_), _) => {
                return Err(ServiceError::InvalidInput("calories must not be negative".into()))
            }
            (None, Some(per_unit)) if per_unit.is_finite() && per_unit >= 0.0 => {
                meal_calories(self.portion_size, per_unit)
            }
            (None, Some(_)) => {
                return Err(ServiceError::InvalidInput("calories_per_unit must not be negative".into()))
            }
            (None, None) => {
                return Err(ServiceError::InvalidInput(
                    "either calories or calories_per_unit is required".into(),
                ))
            }
        };
        Ok(NewFeedingLog {
            dog_id: self.dog_id,
            food_product_id: self.food_product_id,
            portion_size: self.portion_size,
            portion_unit: self.portion_unit,
            calories,
            meal_type: self.meal_type,
            fed_at: self.fed_at.unwrap_or(now),
            notes: self.notes.filter(|n| !n.trim().is_empty()),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct DailyQuery {
    /// `YYYY-MM-DD` (UTC); today when omitted.
    pub date: Option<String>,
}

impl DailyQuery {
    pub fn day(&self, today: Date) -> Result<Date, ServiceError> {
        match self.date.as_deref() {
            None => Ok(today),
            Some(raw) => Date::parse(raw, format_description!("[year]-[month]-[day]"))
                .map_err(|_| ServiceError::InvalidInput(format!("date `{raw}` is not YYYY-MM-DD"))),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DailySummary {
    pub dog_id: Uuid,
    pub date: String,
    pub total_calories: i64,
    pub logs: Vec<FeedingLog>,
}
