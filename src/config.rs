use crate::errors::AppError;
use crate::roadmap::RoadmapOrder;
use crate::storage::DEFAULT_DATA_PATH;
use crate::timer::{MAX_PRESET_MINUTES, WORK_MINUTES};
use std::{env, path::PathBuf};

#[derive(Debug, Clone)]
pub struct Config {
    pub data_path: PathBuf,
    pub focus_task: Option<String>,
    pub focus_minutes: u64,
    pub roadmap_order: RoadmapOrder,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let value = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let focus_minutes = match value("FOCUS_MINUTES") {
            Some(raw) => raw
                .parse::<u64>()
                .ok()
                .filter(|minutes| *minutes <= MAX_PRESET_MINUTES)
                .ok_or_else(|| {
                    AppError::invalid_input(format!(
                        "FOCUS_MINUTES must be a whole number up to {MAX_PRESET_MINUTES}, \
                         got {raw:?}"
                    ))
                })?,
            None => WORK_MINUTES,
        };

        let roadmap_order = match value("ROADMAP_SEASON_START") {
            Some(raw) => {
                let month = raw.parse::<u32>().map_err(|_| {
                    AppError::invalid_input(format!(
                        "ROADMAP_SEASON_START must be a month number, got {raw:?}"
                    ))
                })?;
                RoadmapOrder::season_start(month)?
            }
            None => RoadmapOrder::Lexicographic,
        };

        Ok(Self {
            data_path: value("APP_DATA_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH)),
            focus_task: value("FOCUS_TASK_ID"),
            focus_minutes,
            roadmap_order,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Result<Config, AppError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let config = config(&[]).unwrap();
        assert_eq!(config.data_path, PathBuf::from(DEFAULT_DATA_PATH));
        assert_eq!(config.focus_minutes, WORK_MINUTES);
        assert_eq!(config.focus_task, None);
        assert_eq!(config.roadmap_order, RoadmapOrder::Lexicographic);
    }

    #[test]
    fn reads_overrides() {
        let config = config(&[
            ("APP_DATA_PATH", "/tmp/board.json"),
            ("FOCUS_TASK_ID", "t1"),
            ("FOCUS_MINUTES", "0"),
            ("ROADMAP_SEASON_START", "9"),
        ])
        .unwrap();
        assert_eq!(config.data_path, PathBuf::from("/tmp/board.json"));
        assert_eq!(config.focus_task.as_deref(), Some("t1"));
        assert_eq!(config.focus_minutes, 0);
        assert_eq!(config.roadmap_order, RoadmapOrder::SeasonStart { month: 9 });
    }

    #[test]
    fn rejects_bad_numbers() {
        let bad = |key, raw| matches!(config(&[(key, raw)]), Err(AppError::InvalidInput(_)));
        assert!(bad("FOCUS_MINUTES", "ten"));
        assert!(bad("FOCUS_MINUTES", "18446744073709551615"));
        assert!(bad("FOCUS_MINUTES", "1441"));
        assert!(bad("ROADMAP_SEASON_START", "13"));
        assert_eq!(config(&[("FOCUS_MINUTES", "1440")]).unwrap().focus_minutes, 1440);
    }
}
