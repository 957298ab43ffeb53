use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use super::MilestoneType;
use crate::models::Milestone;

/// A stored milestone with its display label and emoji.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MilestoneView {
    pub id: Uuid,
    pub milestone_type: MilestoneType,
    pub label: &'static str,
    pub emoji: &'static str,
    pub weight_at: Option<f64>,
    #[serde(with = "time::serde::rfc3339")]
    pub achieved_at: OffsetDateTime,
    pub shared: bool,
}

impl From<Milestone> for MilestoneView {
    fn from(m: Milestone) -> Self {
        Self {
            id: m.id,
            milestone_type: m.milestone_type,
            label: m.milestone_type.label(),
            emoji: m.milestone_type.emoji(),
            weight_at: m.weight_at,
            achieved_at: m.achieved_at,
            shared: m.shared,
        }
    }
}
