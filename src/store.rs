use crate::clock::Clock;
use crate::day::Day;
use crate::errors::AppError;
use crate::models::{
    GroupInfo, Milestone, Priority, Record, Stats, Task, TaskStatus, UserProfile, DEFAULT_CATEGORY,
};
use crate::roadmap::{parse_month_day, RoadmapOrder};
use crate::storage::{backup_rejected, persist_data, read_record, StoredRecord};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    sync::Arc,
};
use tracing::{debug, info, warn};

/// Outcome of a mutation addressed by task id.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Applied,
    NotFound,
}

impl Mutation {
    pub fn is_applied(self) -> bool {
        self == Self::Applied
    }
}

/// Owns the persisted dashboard record. Every mutation rewrites the whole
/// document before returning.
pub struct Store {
    path: PathBuf,
    clock: Arc<dyn Clock>,
    order: RoadmapOrder,
    data: Record,
}

impl Store {
    /// Loads the record at `path`, seeding it when absent or unreadable, and
    /// applies day rollover.
    pub async fn load(
        path: impl Into<PathBuf>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, AppError> {
        let path = path.into();
        let data = load_record(&path, clock.today()).await;
        let mut store = Self {
            path,
            clock,
            order: RoadmapOrder::default(),
            data,
        };
        store.check_new_day().await?;
        Ok(store)
    }

    pub fn with_roadmap_order(mut self, order: RoadmapOrder) -> Self {
        self.order = order;
        self
    }

    /// Discards in-memory state and loads again from storage.
    pub async fn reload(&mut self) -> Result<(), AppError> {
        self.data = load_record(&self.path, self.today()).await;
        self.check_new_day().await?;
        Ok(())
    }

    pub async fn save(&self) -> Result<(), AppError> {
        persist_data(&self.path, &self.data).await
    }

    /// Returns true when the calendar day changed since the last visit.
    ///
    /// The streak advances on every day change whether or not the user
    /// checked in the day before.
    pub async fn check_new_day(&mut self) -> Result<bool, AppError> {
        let today = self.today();
        if self.data.user.last_visit == Some(today) {
            return Ok(false);
        }

        let user = &mut self.data.user;
        user.is_checked_in = false;
        user.last_visit = Some(today);
        user.streak = user.streak.saturating_add(1);
        self.data.stats.daily_focus.entry(today).or_insert(0);
        info!(%today, streak = self.data.user.streak, "new day");

        self.save().await?;
        Ok(true)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn today(&self) -> Day {
        self.clock.today()
    }

    pub fn record(&self) -> &Record {
        &self.data
    }

    pub fn user(&self) -> &UserProfile {
        &self.data.user
    }

    pub fn group(&self) -> &GroupInfo {
        &self.data.group
    }

    pub fn daily_focus(&self) -> &BTreeMap<Day, u64> {
        &self.data.stats.daily_focus
    }

    pub fn tasks(&self) -> &[Task] {
        &self.data.tasks
    }

    pub fn find_task(&self, id: &str) -> Option<&Task> {
        self.data.tasks.iter().find(|task| task.id == id)
    }

    /// Tasks scheduled between `start` and `end`, both inclusive.
    pub fn tasks_by_date_range(&self, start: Day, end: Day) -> Vec<&Task> {
        self.data
            .tasks
            .iter()
            .filter(|task| task.date >= start && task.date <= end)
            .collect()
    }

    pub fn tasks_on(&self, day: Day) -> Vec<&Task> {
        self.tasks_by_date_range(day, day)
    }

    pub fn pending_tasks(&self) -> Vec<&Task> {
        self.data
            .tasks
            .iter()
            .filter(|task| task.status == TaskStatus::Todo)
            .collect()
    }

    pub async fn add_task(
        &mut self,
        title: &str,
        priority: Option<Priority>,
        date: Option<Day>,
    ) -> Result<Task, AppError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(AppError::invalid_input("task title must not be empty"));
        }

        let task = Task {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.to_string(),
            priority: priority.unwrap_or_default(),
            status: TaskStatus::Todo,
            time_spent: 0,
            category: DEFAULT_CATEGORY.to_string(),
            date: date.unwrap_or_else(|| self.today()),
        };
        self.data.tasks.push(task.clone());
        self.save().await?;

        debug!(id = %task.id, date = %task.date, "task added");
        Ok(task)
    }

    pub async fn update_task_status(
        &mut self,
        id: &str,
        status: TaskStatus,
    ) -> Result<Mutation, AppError> {
        let Some(task) = self.data.tasks.iter_mut().find(|task| task.id == id) else {
            debug!(id, "status update for unknown task");
            return Ok(Mutation::NotFound);
        };
        task.status = status;
        self.save().await?;

        debug!(id, status = status.as_str(), "task status updated");
        Ok(Mutation::Applied)
    }

    pub async fn delete_task(&mut self, id: &str) -> Result<Mutation, AppError> {
        let before = self.data.tasks.len();
        self.data.tasks.retain(|task| task.id != id);
        if self.data.tasks.len() == before {
            debug!(id, "delete for unknown task");
            return Ok(Mutation::NotFound);
        }
        self.save().await?;

        debug!(id, "task deleted");
        Ok(Mutation::Applied)
    }

    /// Credits `seconds` of focus time to today and the lifetime total, and to
    /// `task_id` when given. `NotFound` means only the task credit was skipped.
    pub async fn add_time(
        &mut self,
        task_id: Option<&str>,
        seconds: u64,
    ) -> Result<Mutation, AppError> {
        let mut outcome = Mutation::Applied;
        if let Some(id) = task_id {
            match self.data.tasks.iter_mut().find(|task| task.id == id) {
                Some(task) => task.time_spent = task.time_spent.saturating_add(seconds),
                None => outcome = Mutation::NotFound,
            }
        }

        let today = self.today();
        let entry = self.data.stats.daily_focus.entry(today).or_insert(0);
        *entry = entry.saturating_add(seconds);
        self.data.user.total_time = self.data.user.total_time.saturating_add(seconds);
        self.save().await?;

        Ok(outcome)
    }

    pub fn today_seconds(&self) -> u64 {
        self.data
            .stats
            .daily_focus
            .get(&self.today())
            .copied()
            .unwrap_or(0)
    }

    pub async fn check_in(&mut self, quote: &str) -> Result<(), AppError> {
        self.data.user.is_checked_in = true;
        self.data.user.daily_quote = quote.to_string();
        self.save().await?;

        info!(streak = self.data.user.streak, "checked in");
        Ok(())
    }

    pub fn group_goal(&self) -> &str {
        &self.data.group.current_goal
    }

    pub async fn set_group_goal(&mut self, goal: &str) -> Result<(), AppError> {
        self.data.group.current_goal = goal.to_string();
        self.save().await
    }

    pub fn roadmap(&self) -> &[Milestone] {
        &self.data.group.roadmap
    }

    /// Inserts a milestone and keeps the roadmap in the configured order.
    pub async fn add_milestone(
        &mut self,
        date: &str,
        title: &str,
        desc: &str,
        done: bool,
    ) -> Result<(), AppError> {
        let date = date.trim();
        let title = title.trim();
        parse_month_day(date)?;
        if title.is_empty() {
            return Err(AppError::invalid_input("milestone title must not be empty"));
        }

        self.data.group.roadmap.push(Milestone {
            date: date.to_string(),
            title: title.to_string(),
            desc: desc.trim().to_string(),
            done,
        });
        self.order.sort(&mut self.data.group.roadmap);
        self.save().await
    }
}

async fn load_record(path: &Path, today: Day) -> Record {
    let seed = Record::seed(today);
    let persisted = match read_record(path).await {
        StoredRecord::Found(persisted) => persisted,
        StoredRecord::Missing => {
            info!("no data at {}, starting from seed", path.display());
            return seed;
        }
        StoredRecord::Unusable => {
            backup_rejected(path).await;
            return seed;
        }
    };

    let merged = merge_over_seed(seed, persisted, today);
    if merged.rejected {
        backup_rejected(path).await;
    }
    merged.record
}

struct Merged {
    record: Record,
    /// Some persisted content could not be kept as written.
    rejected: bool,
}

/// Persisted top-level sections replace the seeded ones; sections the file
/// lacks keep their seeded value. A section that fails to read keeps its
/// seeded value too, while bad tasks and focus entries are dropped one by one.
fn merge_over_seed(seed: Record, persisted: Map<String, Value>, today: Day) -> Merged {
    let mut merged = Merged {
        record: seed,
        rejected: false,
    };

    for (key, value) in persisted {
        if value.is_null() {
            continue;
        }
        match key.as_str() {
            "user" => {
                if let Some(user) = merged.section::<UserProfile>(&key, value) {
                    merged.record.user = user;
                }
            }
            "group" => {
                if let Some(group) = merged.section::<GroupInfo>(&key, value) {
                    merged.record.group = group;
                }
            }
            "tasks" => {
                if let Some(tasks) = merged.tasks(value, today) {
                    merged.record.tasks = tasks;
                }
            }
            "stats" => {
                if let Some(stats) = merged.stats(value) {
                    merged.record.stats = stats;
                }
            }
            _ => {
                merged.record.extra.insert(key, value);
            }
        }
    }
    merged
}

impl Merged {
    fn section<T: DeserializeOwned>(&mut self, name: &str, value: Value) -> Option<T> {
        match serde_json::from_value(value) {
            Ok(section) => Some(section),
            Err(err) => {
                warn!(section = name, "keeping default section: {err}");
                self.rejected = true;
                None
            }
        }
    }

    fn tasks(&mut self, value: Value, today: Day) -> Option<Vec<Task>> {
        let Value::Array(items) = value else {
            warn!("tasks is not a list, keeping default tasks");
            self.rejected = true;
            return None;
        };

        let mut tasks = Vec::with_capacity(items.len());
        for mut item in items {
            if let Some(task) = item.as_object_mut() {
                self.repair_task_date(task, today);
            }
            match serde_json::from_value::<Task>(item) {
                Ok(task) => tasks.push(task),
                Err(err) => {
                    warn!("dropping unreadable task: {err}");
                    self.rejected = true;
                }
            }
        }
        Some(tasks)
    }

    /// Tasks without a date are scheduled today. An unreadable date is
    /// rescheduled today as well.
    fn repair_task_date(&mut self, task: &mut Map<String, Value>, today: Day) {
        let reschedule = match task.get("date") {
            None | Some(Value::Null) => true,
            Some(Value::String(date)) if date.trim().is_empty() => true,
            Some(Value::String(date)) => match Day::parse(date) {
                Ok(_) => false,
                Err(_) => {
                    warn!(date = %date, "unreadable task date, rescheduling today");
                    self.rejected = true;
                    true
                }
            },
            Some(other) => {
                warn!(date = %other, "unreadable task date, rescheduling today");
                self.rejected = true;
                true
            }
        };
        if reschedule {
            task.insert("date".to_string(), Value::String(today.to_string()));
        }
    }

    /// Focus entries for the same day under old and new key formats are
    /// summed.
    fn stats(&mut self, value: Value) -> Option<Stats> {
        let Value::Object(mut stats) = value else {
            warn!("stats is not an object, keeping default stats");
            self.rejected = true;
            return None;
        };

        let entries = match stats.remove("dailyFocus") {
            None | Some(Value::Null) => Map::new(),
            Some(Value::Object(entries)) => entries,
            Some(_) => {
                warn!("dailyFocus is not an object, keeping default stats");
                self.rejected = true;
                return None;
            }
        };

        let mut daily_focus = BTreeMap::new();
        for (key, seconds) in entries {
            match (Day::parse(&key), seconds.as_u64()) {
                (Ok(day), Some(seconds)) => {
                    let total: &mut u64 = daily_focus.entry(day).or_insert(0);
                    *total = total.saturating_add(seconds);
                }
                _ => {
                    warn!(key = %key, "dropping unreadable daily focus entry");
                    self.rejected = true;
                }
            }
        }
        Some(Stats { daily_focus })
    }
}
