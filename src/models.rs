use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Opaque habit identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HabitId(String);

impl HabitId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HabitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for HabitId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for HabitId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub date: NaiveDate,
    pub value: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    pub id: HabitId,
    pub name: String,
    pub goal: u32,
    pub current: u32,
    pub unit: String,
    pub streak: u32,
    /// Category *name*; not checked against the category registry.
    pub category: String,
    pub notes: String,
    #[serde(default, with = "hhmm")]
    pub reminder_time: Option<NaiveTime>,
    pub last_updated: NaiveDateTime,
    pub completed_today: bool,
    /// One row per update call, so a date may repeat.
    pub history: Vec<HistoryEntry>,
    #[serde(default)]
    pub shared: bool,
}

impl Habit {
    pub fn progress_percent(&self) -> u32 {
        if self.goal == 0 {
            return 0;
        }
        (u64::from(self.current) * 100 / u64::from(self.goal)) as u32
    }

    pub fn tier(&self) -> ProgressTier {
        ProgressTier::from_percent(self.progress_percent())
    }

    /// True if any history row on `date` reached the goal.
    pub fn reached_goal_on(&self, date: NaiveDate) -> bool {
        self.history
            .iter()
            .any(|entry| entry.date == date && entry.value >= self.goal)
    }
}

/// Reusable habit blueprint without progress state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitTemplate {
    pub id: String,
    pub name: String,
    pub goal: u32,
    pub unit: String,
    pub category: String,
    pub notes: String,
    #[serde(default, with = "hhmm")]
    pub reminder_time: Option<NaiveTime>,
}

/// Fields accepted by `Ledger::add_habit`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewHabit {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub goal: Option<u32>,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default, with = "hhmm")]
    pub reminder_time: Option<NaiveTime>,
}

impl NewHabit {
    pub fn new(name: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            unit: unit.into(),
            ..Self::default()
        }
    }

    pub fn goal(mut self, goal: u32) -> Self {
        self.goal = Some(goal);
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// Symbolic icon; the view decides how to draw it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IconKey {
    Heart,
    Dumbbell,
    BarChart,
    Laptop,
    BookOpen,
    Brain,
    Sun,
    Moon,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub color: String,
    pub icon: IconKey,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewCategory {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub icon: Option<IconKey>,
}

/// Badge definition. Unlocking is not tracked yet, so `unlocked` stays false.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Achievement {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub unlocked: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressTier {
    Complete,
    AlmostThere,
    Halfway,
    KeepPushing,
}

impl ProgressTier {
    pub fn from_percent(percent: u32) -> Self {
        match percent {
            p if p >= 100 => Self::Complete,
            p if p >= 75 => Self::AlmostThere,
            p if p >= 50 => Self::Halfway,
            _ => Self::KeepPushing,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::Complete => "Great job! You completed your goal!",
            Self::AlmostThere => "Almost there! Keep going!",
            Self::Halfway => "Halfway there! You can do it!",
            Self::KeepPushing => "Keep pushing! You got this!",
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateRequest {
    pub value: i64,
}

#[derive(Debug, Serialize)]
pub struct UpdateResponse {
    pub habit: Habit,
    pub moved_to_completed: Vec<Habit>,
}

#[derive(Debug, Serialize)]
pub struct HabitsResponse {
    pub active: Vec<Habit>,
    pub completed: Vec<Habit>,
}

#[derive(Debug, Deserialize)]
pub struct CalendarQuery {
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub all_habits_completed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub name: String,
    pub value: usize,
}

#[derive(Debug, Serialize)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub values: BTreeMap<HabitId, u32>,
    pub total: u64,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub last_7_days: Vec<DailyPoint>,
    pub categories: Vec<CategoryCount>,
    pub total_habits: usize,
    pub completed_today: usize,
    pub longest_streak: u32,
}

/// `HH:MM` (de)serialization for optional reminder times.
mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(value: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(time) => serializer.serialize_some(&time.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveTime>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(text) => NaiveTime::parse_from_str(text, FORMAT)
                .or_else(|_| NaiveTime::parse_from_str(text, "%H:%M:%S"))
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_thresholds() {
        assert_eq!(ProgressTier::from_percent(100), ProgressTier::Complete);
        assert_eq!(ProgressTier::from_percent(75), ProgressTier::AlmostThere);
        assert_eq!(ProgressTier::from_percent(74), ProgressTier::Halfway);
        assert_eq!(ProgressTier::from_percent(49), ProgressTier::KeepPushing);
    }

    #[test]
    fn new_habit_reads_short_reminder_time() {
        let spec: NewHabit = serde_json::from_str(
            r#"{ "name": "Stretch", "unit": "min", "reminder_time": "07:30" }"#,
        )
        .unwrap();
        assert_eq!(spec.reminder_time, NaiveTime::from_hms_opt(7, 30, 0));
        assert_eq!(spec.goal, None);
    }

    #[test]
    fn empty_reminder_time_is_none() {
        let spec: NewHabit =
            serde_json::from_str(r#"{ "name": "Stretch", "unit": "min", "reminder_time": "" }"#).unwrap();
        assert_eq!(spec.reminder_time, None);
    }
}
