use crate::day::Day;
use crate::models::{
    CategoryCount, DailyPoint, DashboardSummary, HeatCell, Record, StatsResponse, Task,
    TaskProgress, TaskStatus, WeekPoint, WeekStatus,
};
use crate::quotes::quote_for;
use crate::store::Store;
use chrono::Datelike;

const HEATMAP_DAYS: i64 = 120;
const WEEKS_AROUND: i64 = 4;
const OTHER_CATEGORY: &str = "other";

pub fn build_stats(store: &Store) -> StatsResponse {
    build_stats_at(store.today(), store.record())
}

pub fn build_stats_at(today: Day, data: &Record) -> StatsResponse {
    let focus = |date: Day| data.stats.daily_focus.get(&date).copied().unwrap_or(0);

    let last_7_days = (0..7)
        .rev()
        .map(|offset| {
            let date = today.offset(-offset);
            let seconds = focus(date);
            DailyPoint {
                date,
                weekday: date.weekday_label(),
                seconds,
                hours: hours(seconds),
            }
        })
        .collect();

    let heatmap = (0..HEATMAP_DAYS)
        .rev()
        .map(|offset| {
            let date = today.offset(-offset);
            let seconds = focus(date);
            HeatCell {
                date,
                seconds,
                level: heat_level(seconds),
            }
        })
        .collect();

    StatsResponse {
        last_7_days,
        heatmap,
        categories: category_counts(&data.tasks),
        total_hours: hours(data.user.total_time),
    }
}

pub fn category_counts(tasks: &[Task]) -> Vec<CategoryCount> {
    let mut counts: Vec<CategoryCount> = Vec::new();
    for task in tasks {
        let category = match task.category.trim() {
            "" => OTHER_CATEGORY,
            name => name,
        };
        match counts.iter_mut().find(|count| count.category == category) {
            Some(count) => count.tasks += 1,
            None => counts.push(CategoryCount {
                category: category.to_string(),
                tasks: 1,
            }),
        }
    }
    counts
}

pub fn today_progress(store: &Store) -> TaskProgress {
    progress_at(store.today(), store.tasks())
}

pub fn progress_at(date: Day, tasks: &[Task]) -> TaskProgress {
    let (total, done) = tasks
        .iter()
        .filter(|task| task.date == date)
        .fold((0usize, 0usize), |(total, done), task| {
            (total + 1, done + usize::from(task.status == TaskStatus::Done))
        });
    let percent = if total == 0 {
        0
    } else {
        ((done as f64 / total as f64) * 100.0).round() as u8
    };

    TaskProgress {
        date,
        total,
        done,
        percent,
        all_done: !tasks.is_empty() && tasks.iter().all(|task| task.status == TaskStatus::Done),
    }
}

pub fn week_overview(store: &Store) -> Vec<WeekPoint> {
    week_overview_at(store.today(), store.tasks())
}

pub fn week_overview_at(today: Day, tasks: &[Task]) -> Vec<WeekPoint> {
    let current_week_start = today.week_start();

    (-WEEKS_AROUND..=WEEKS_AROUND)
        .map(|offset| {
            let start = current_week_start.offset(offset * 7);
            let end = start.offset(6);
            let in_week: Vec<&Task> = tasks
                .iter()
                .filter(|task| task.date >= start && task.date <= end)
                .collect();

            let status = if in_week.is_empty() {
                WeekStatus::Empty
            } else if in_week.iter().all(|task| task.status == TaskStatus::Done) {
                WeekStatus::AllDone
            } else {
                WeekStatus::HasTasks
            };

            WeekPoint {
                week: week_label(start),
                start_date: start,
                end_date: end,
                tasks: in_week.len(),
                status,
            }
        })
        .collect()
}

pub fn summary(store: &Store) -> DashboardSummary {
    let user = store.user();
    let today = store.today();
    DashboardSummary {
        date: today,
        streak: user.streak,
        today_seconds: store.today_seconds(),
        is_checked_in: user.is_checked_in,
        daily_quote: user.daily_quote.clone(),
        suggested_quote: quote_for(today).to_string(),
        group_goal: store.group_goal().to_string(),
        progress: today_progress(store),
    }
}

fn hours(seconds: u64) -> f64 {
    (seconds as f64 / 360.0).round() / 10.0
}

fn heat_level(seconds: u64) -> u8 {
    match seconds {
        s if s > 6 * 3600 => 3,
        s if s > 3 * 3600 => 2,
        s if s > 0 => 1,
        _ => 0,
    }
}

fn week_label(date: Day) -> String {
    let iso = date.date().iso_week();
    format!("{}-W{:02}", iso.year(), iso.week())
}
