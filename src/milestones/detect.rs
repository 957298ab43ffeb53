use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::models::{Dog, Milestone, WeighIn};

const STREAK_TOLERANCE_DAYS: i64 = 2;
const MIN_STREAK_HISTORY: usize = 4;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MilestoneType {
    #[serde(rename = "goal_25")]
    Goal25,
    #[serde(rename = "goal_50")]
    Goal50,
    #[serde(rename = "goal_75")]
    Goal75,
    #[serde(rename = "goal_100")]
    Goal100,
    #[serde(rename = "streak_4")]
    Streak4,
    #[serde(rename = "streak_8")]
    Streak8,
    #[serde(rename = "streak_12")]
    Streak12,
}

impl MilestoneType {
    pub const ALL: [MilestoneType; 7] = [
        MilestoneType::Goal25,
        MilestoneType::Goal50,
        MilestoneType::Goal75,
        MilestoneType::Goal100,
        MilestoneType::Streak4,
        MilestoneType::Streak8,
        MilestoneType::Streak12,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MilestoneType::Goal25 => "goal_25",
            MilestoneType::Goal50 => "goal_50",
            MilestoneType::Goal75 => "goal_75",
            MilestoneType::Goal100 => "goal_100",
            MilestoneType::Streak4 => "streak_4",
            MilestoneType::Streak8 => "streak_8",
            MilestoneType::Streak12 => "streak_12",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MilestoneType::Goal25 => "25% to Goal!",
            MilestoneType::Goal50 => "Halfway There!",
            MilestoneType::Goal75 => "75% to Goal!",
            MilestoneType::Goal100 => "Goal Reached!",
            MilestoneType::Streak4 => "4 Week Streak!",
            MilestoneType::Streak8 => "8 Week Streak!",
            MilestoneType::Streak12 => "12 Week Streak!",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            MilestoneType::Goal25 => "\u{1F31F}",
            MilestoneType::Goal50 => "\u{2B50}",
            MilestoneType::Goal75 => "\u{1F3C6}",
            MilestoneType::Goal100 => "\u{1F389}",
            MilestoneType::Streak4 => "\u{1F525}",
            MilestoneType::Streak8 => "\u{1F4AA}",
            MilestoneType::Streak12 => "\u{1F451}",
        }
    }
}

const GOAL_THRESHOLDS: [(MilestoneType, f64); 4] = [
    (MilestoneType::Goal25, 25.0),
    (MilestoneType::Goal50, 50.0),
    (MilestoneType::Goal75, 75.0),
    (MilestoneType::Goal100, 100.0),
];

const STREAK_THRESHOLDS: [(MilestoneType, usize); 3] = [
    (MilestoneType::Streak4, 4),
    (MilestoneType::Streak8, 8),
    (MilestoneType::Streak12, 12),
];

/// Expected spacing between weigh-ins for streak purposes.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StreakCadence {
    #[default]
    Weekly,
    Biweekly,
}

impl StreakCadence {
    pub fn interval_days(&self) -> i64 {
        match self {
            StreakCadence::Weekly => 7,
            StreakCadence::Biweekly => 14,
        }
    }
}

impl std::str::FromStr for StreakCadence {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "weekly" => Ok(StreakCadence::Weekly),
            "biweekly" => Ok(StreakCadence::Biweekly),
            other => Err(format!("unknown streak cadence `{other}`")),
        }
    }
}

/// A milestone crossed by the latest data and not yet recorded.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct DetectedMilestone {
    pub milestone_type: MilestoneType,
    pub weight_at: f64,
}

pub fn earned_types(milestones: &[Milestone]) -> HashSet<MilestoneType> {
    milestones.iter().map(|m| m.milestone_type).collect()
}

/// Goal-progress thresholds newly crossed at `current_weight`, in ascending order.
pub fn check_goal_milestones(
    dog: &Dog,
    current_weight: f64,
    existing: &HashSet<MilestoneType>,
) -> Vec<DetectedMilestone> {
    let total_change = dog.initial_weight - dog.target_weight;
    if total_change == 0.0 {
        return Vec::new();
    }
    let progress_percent = (dog.initial_weight - current_weight) / total_change * 100.0;

    GOAL_THRESHOLDS
        .iter()
        .filter(|(kind, threshold)| progress_percent >= *threshold && !existing.contains(kind))
        .map(|(kind, _)| DetectedMilestone {
            milestone_type: *kind,
            weight_at: current_weight,
        })
        .collect()
}

/// Length of the trailing run of weigh-ins spaced `cadence` apart (±2 days).
/// Expects `sorted` ascending by date; an empty series has no run.
pub fn trailing_streak(sorted: &[WeighIn], cadence: StreakCadence) -> usize {
    if sorted.is_empty() {
        return 0;
    }
    let expected = cadence.interval_days();
    sorted.windows(2).fold(1, |streak, pair| {
        let gap = (pair[1].weighed_on - pair[0].weighed_on).whole_days();
        if (gap - expected).abs() <= STREAK_TOLERANCE_DAYS {
            streak + 1
        } else {
            1
        }
    })
}

/// Weigh-in cadence thresholds reached by the trailing streak.
/// Milestones carry the weight of the most recent weigh-in.
pub fn check_streak_milestones(
    weigh_ins: &[WeighIn],
    cadence: StreakCadence,
    existing: &HashSet<MilestoneType>,
) -> Vec<DetectedMilestone> {
    if weigh_ins.len() < MIN_STREAK_HISTORY {
        return Vec::new();
    }
    let mut sorted = weigh_ins.to_vec();
    sorted.sort_by_key(|w| w.weighed_on);

    let streak = trailing_streak(&sorted, cadence);
    let latest_weight = sorted.last().map(|w| w.weight).unwrap_or(0.0);

    STREAK_THRESHOLDS
        .iter()
        .filter(|(kind, threshold)| streak >= *threshold && !existing.contains(kind))
        .map(|(kind, _)| DetectedMilestone {
            milestone_type: *kind,
            weight_at: latest_weight,
        })
        .collect()
}
