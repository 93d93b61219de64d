use crate::catalog::{RankTier, WorkoutPlan};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// One calendar day's log. `daily_xp` is derived on every mutation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DailyEntry {
    pub date: NaiveDate,
    #[serde(default, deserialize_with = "null_as_default")]
    pub workout_done: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sleep_planned: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub meals: BTreeMap<String, bool>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub posture: BTreeMap<String, bool>,
    /// Keyed by index into the day's workout plan.
    #[serde(default, deserialize_with = "null_as_default")]
    pub exercises: BTreeMap<u32, bool>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub daily_xp: u32,
}

impl DailyEntry {
    pub fn placeholder(date: NaiveDate) -> Self {
        Self {
            date,
            workout_done: false,
            sleep_planned: false,
            meals: BTreeMap::new(),
            posture: BTreeMap::new(),
            exercises: BTreeMap::new(),
            daily_xp: 0,
        }
    }

    pub fn meal_count(&self) -> usize {
        self.meals.values().filter(|done| **done).count()
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Shallow partial update for today's entry. Maps replace the stored map wholesale.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntryUpdate {
    pub workout_done: Option<bool>,
    pub sleep_planned: Option<bool>,
    pub meals: Option<BTreeMap<String, bool>>,
    pub posture: Option<BTreeMap<String, bool>>,
    pub exercises: Option<BTreeMap<u32, bool>>,
}

/// A single-flag flip relative to today's entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "target", content = "id", rename_all = "lowercase")]
pub enum Toggle {
    Workout,
    Sleep,
    Meal(String),
    Posture(String),
    Exercise(u32),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeContext {
    pub season: u32,
    pub chapter: u32,
    pub day_in_chapter: u32,
    pub total_days: u32,
}

#[derive(Debug, Serialize)]
pub struct TodayResponse {
    pub entry: DailyEntry,
    pub weekday: String,
    pub plan: &'static WorkoutPlan,
}

#[derive(Debug, Serialize)]
pub struct DayScore {
    pub date: String,
    pub xp: u32,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub today: String,
    pub total_xp: u64,
    pub rank: &'static RankTier,
    pub next_rank: Option<&'static RankTier>,
    /// Progress from the current tier's threshold toward the next, capped at 100.
    pub progress_percent: Option<f64>,
    pub streak: u32,
    pub time: TimeContext,
    pub last_7_days: Vec<DayScore>,
    pub insight: String,
}

#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub imported: usize,
}

#[derive(Debug, Deserialize)]
pub struct ResetRequest {
    #[serde(default)]
    pub confirm: bool,
}

#[derive(Debug, Serialize)]
pub struct InsightResponse {
    pub insight: String,
}

#[derive(Debug, Deserialize)]
pub struct TimerRequest {
    pub seconds: u32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimerStatus {
    pub remaining: u32,
    pub active: bool,
}
