use crate::domain::lenient;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const ACTION_STEP_COUNT: usize = 3;
pub const SOLUTION_TARGET: usize = 5;
pub const QUICK_WIN_TARGET: usize = 4;
pub const SIMPLE_WAY_TARGET: usize = 4;

/// Only the first three priorities are ever considered.
pub const MAX_TOP_PRIORITIES: usize = 3;

/// Answers collected by the time-wasters audit form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditSubmission {
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub daily_activities: Vec<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub time_wasters: Vec<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub personal_habits: Vec<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub dependencies: Vec<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub planning_issues: Vec<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub environmental_factors: Vec<String>,

    /// Activity label -> time-lost bucket code (see [`bucket_minutes`]).
    #[serde(default, deserialize_with = "lenient::string_map")]
    pub time_lost: BTreeMap<String, String>,

    #[serde(default, deserialize_with = "lenient::percentage")]
    pub habit_control: Option<u8>,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub work_hours: Option<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub top_priorities: Vec<String>,

    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub other_time_wasters: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub other_habits: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub other_dependencies: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub other_planning_issues: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub other_environmental_factors: Option<String>,
}

impl AuditSubmission {
    /// Decodes a submission from an untrusted JSON value. Never fails: a
    /// value that is not an object yields an empty submission.
    pub fn from_value(value: serde_json::Value) -> Self {
        if !value.is_object() {
            return Self::default();
        }
        serde_json::from_value(value).unwrap_or_default()
    }

    pub fn priorities(&self) -> &[String] {
        let n = self.top_priorities.len().min(MAX_TOP_PRIORITIES);
        &self.top_priorities[..n]
    }

    /// Sum of the bucket midpoints in `time_lost`, in minutes per day.
    pub fn estimated_daily_minutes_lost(&self) -> u32 {
        total_minutes(self.time_lost.values().filter_map(|c| bucket_minutes(c)))
    }
}

/// Saturating sum, so an oversized `time_lost` map cannot overflow.
fn total_minutes(minutes: impl IntoIterator<Item = u32>) -> u32 {
    minutes.into_iter().fold(0, u32::saturating_add)
}

/// Midpoint in minutes of a time-lost bucket code. Unknown codes are `None`.
pub fn bucket_minutes(code: &str) -> Option<u32> {
    let normalized: String = code
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_lowercase();
    match normalized.as_str() {
        "<30m" => Some(15),
        "30-60m" => Some(45),
        "1-2h" => Some(90),
        "2-3h" => Some(150),
        ">3h" => Some(210),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionStep {
    pub title: String,
    pub description: String,
}

impl ActionStep {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeAuditReport {
    pub action_steps: Vec<ActionStep>,
    pub solutions: Vec<String>,
    pub quick_wins: Vec<String>,
    pub simple_ways: Vec<String>,
}
