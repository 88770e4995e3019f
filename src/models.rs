use crate::day::Day;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_CATEGORY: &str = "uncategorized";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    P1,
    #[default]
    P2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    #[default]
    Todo,
    Done,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::Done => "done",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProfile {
    #[serde(deserialize_with = "null_as_default")]
    pub streak: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub total_time: u64,
    /// An unreadable value counts as never visited, which triggers rollover.
    #[serde(deserialize_with = "lenient_day")]
    pub last_visit: Option<Day>,
    #[serde(deserialize_with = "null_as_default")]
    pub is_checked_in: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub daily_quote: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub priority: Priority,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: TaskStatus,
    #[serde(default, deserialize_with = "null_as_default")]
    pub time_spent: u64,
    #[serde(default = "default_category", deserialize_with = "category_or_default")]
    pub category: String,
    /// Day the task is scheduled for, not when it was created.
    pub date: Day,
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn category_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_category))
}

fn lenient_day<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Day>, D::Error> {
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(serde_json::Value::as_str).and_then(|text| Day::parse(text).ok()))
}

/// One roadmap entry. `date` is `MM-DD` without a year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    pub date: String,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub desc: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub done: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GroupInfo {
    #[serde(deserialize_with = "null_as_default")]
    pub current_goal: String,
    pub roadmap: Vec<Milestone>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Stats {
    pub daily_focus: BTreeMap<Day, u64>,
}

/// Everything the dashboard persists, stored as a single JSON document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub user: UserProfile,
    pub tasks: Vec<Task>,
    pub group: GroupInfo,
    pub stats: Stats,
    /// Top-level sections this build does not know about, kept so they
    /// survive a save.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Record {
    /// First-run contents, dated relative to `today`.
    pub fn seed(today: Day) -> Self {
        let task = |id: &str, title: &str, priority, status, time_spent, category: &str| {
            Task {
                id: id.to_string(),
                title: title.to_string(),
                priority,
                status,
                time_spent,
                category: category.to_string(),
                date: today,
            }
        };
        let milestone = |date: &str, title: &str, desc: &str, done| Milestone {
            date: date.to_string(),
            title: title.to_string(),
            desc: desc.to_string(),
            done,
        };

        Self {
            user: UserProfile {
                streak: 12,
                total_time: 16_200,
                last_visit: Some(today),
                is_checked_in: false,
                daily_quote: String::new(),
            },
            tasks: vec![
                task(
                    "t1",
                    "Finish the thesis first draft",
                    Priority::P1,
                    TaskStatus::Todo,
                    3_600,
                    "academic",
                ),
                task(
                    "t2",
                    "Review LeetCode algorithm problems",
                    Priority::P2,
                    TaskStatus::Todo,
                    1_800,
                    "career",
                ),
                task(
                    "t3",
                    "Collect material for the defense slides",
                    Priority::P1,
                    TaskStatus::Done,
                    5_400,
                    "academic",
                ),
            ],
            group: GroupInfo {
                current_goal: "Spring defense sprint".to_string(),
                roadmap: vec![
                    milestone(
                        "12-20",
                        "First project submission",
                        "Finish the core features",
                        true,
                    ),
                    milestone("12-25", "UI/UX polish", "Improve the visual interaction", false),
                    milestone("01-01", "Final defense", "Everyone prepares the demo", false),
                ],
            },
            stats: Stats {
                daily_focus: BTreeMap::from([(today, 16_200)]),
            },
            extra: serde_json::Map::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DailyPoint {
    pub date: Day,
    pub weekday: String,
    pub seconds: u64,
    pub hours: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct HeatCell {
    pub date: Day,
    pub seconds: u64,
    pub level: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub tasks: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WeekStatus {
    Empty,
    HasTasks,
    AllDone,
}

#[derive(Debug, Clone, Serialize)]
pub struct WeekPoint {
    pub week: String,
    pub start_date: Day,
    pub end_date: Day,
    pub tasks: usize,
    pub status: WeekStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskProgress {
    pub date: Day,
    pub total: usize,
    pub done: usize,
    pub percent: u8,
    pub all_done: bool,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub last_7_days: Vec<DailyPoint>,
    pub heatmap: Vec<HeatCell>,
    pub categories: Vec<CategoryCount>,
    pub total_hours: f64,
}

#[derive(Debug, Serialize)]
pub struct DashboardSummary {
    pub date: Day,
    pub streak: u32,
    pub today_seconds: u64,
    pub is_checked_in: bool,
    pub daily_quote: String,
    pub suggested_quote: String,
    pub group_goal: String,
    pub progress: TaskProgress,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_fields_use_camel_case() {
        let record = Record::seed(Day::from_ymd(2026, 10, 16).unwrap());
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["tasks"][0]["timeSpent"], 3_600);
        assert_eq!(json["tasks"][0]["priority"], "p1");
        assert_eq!(json["tasks"][2]["status"], "done");
        assert_eq!(json["user"]["lastVisit"], "2026-10-16");
        assert_eq!(json["stats"]["dailyFocus"]["2026-10-16"], 16_200);
    }

    #[test]
    fn user_nulls_read_as_defaults() {
        let user: UserProfile = serde_json::from_str(
            r#"{"streak":null,"totalTime":null,"lastVisit":"someday","isCheckedIn":null}"#,
        )
        .unwrap();
        assert_eq!(user, UserProfile::default());
    }

    #[test]
    fn task_defaults_fill_missing_fields() {
        let task: Task = serde_json::from_str(
            r#"{"id":"a","title":"Write","category":null,"date":"2026-01-02"}"#,
        )
        .unwrap();
        assert_eq!(task.priority, Priority::P2);
        assert_eq!(task.status, TaskStatus::Todo);
        assert_eq!(task.time_spent, 0);
        assert_eq!(task.category, DEFAULT_CATEGORY);
    }
}
