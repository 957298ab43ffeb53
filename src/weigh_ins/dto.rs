use serde::{Deserialize, Serialize};
use time::macros::format_description;
use time::Date;
use uuid::Uuid;

use crate::error::ServiceError;
use crate::milestones::MilestoneView;
use crate::models::{NewWeighIn, WeighIn};
use crate::offline::WriteOutcome;

#[derive(Debug, Deserialize)]
pub struct CreateWeighInRequest {
    pub dog_id: Uuid,
    pub weight: f64,
    /// `YYYY-MM-DD`; today (UTC) when omitted.
    #[serde(default)]
    pub weighed_on: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl CreateWeighInRequest {
    pub fn into_new(self, today: Date) -> Result<NewWeighIn, ServiceError> {
        if !self.weight.is_finite() || self.weight <= 0.0 {
            return Err(ServiceError::InvalidInput("weight must be a positive number".into()));
        }
        let weighed_on = match self.weighed_on.as_deref() {
            None => today,
            Some(raw) => Date::parse(raw, format_description!("[year]-[month]-[day]"))
                .map_err(|_| ServiceError::InvalidInput(format!("weighed_on `{raw}` is not YYYY-MM-DD")))?,
        };
        let notes = self.notes.filter(|n| !n.trim().is_empty());
        Ok(NewWeighIn {
            dog_id: self.dog_id,
            weight: self.weight,
            weighed_on,
            notes,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct WeighInReceipt {
    #[serde(flatten)]
    pub outcome: WriteOutcome<WeighIn, NewWeighIn>,
    /// Milestones newly earned by this weigh-in. Always empty while queued.
    pub milestones: Vec<MilestoneView>,
    /// Set when the weigh-in was stored but milestone bookkeeping failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestone_error: Option<String>,
}
