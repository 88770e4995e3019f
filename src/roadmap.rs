use crate::errors::AppError;
use crate::models::Milestone;

/// How roadmap milestones are ordered after an insertion.
///
/// Milestone dates carry no year, so plain string order puts "01-01"
/// before "12-20" even when New Year comes last on the roadmap.
/// `SeasonStart` treats `month` as the first month of the roadmap year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoadmapOrder {
    #[default]
    Lexicographic,
    SeasonStart { month: u32 },
}

impl RoadmapOrder {
    pub fn season_start(month: u32) -> Result<Self, AppError> {
        if !(1..=12).contains(&month) {
            return Err(AppError::invalid_input(format!(
                "season start month out of range: {month}"
            )));
        }
        Ok(Self::SeasonStart { month })
    }

    pub fn sort(&self, roadmap: &mut [Milestone]) {
        match *self {
            Self::Lexicographic => roadmap.sort_by(|a, b| a.date.cmp(&b.date)),
            Self::SeasonStart { month: start } => roadmap.sort_by_cached_key(|item| {
                let rank = parse_month_day(&item.date)
                    .map(|(month, _)| (month + 12 - start) % 12)
                    .unwrap_or(12);
                (rank, item.date.clone())
            }),
        }
    }
}

/// Parses a zero-padded `MM-DD` string into `(month, day)`.
pub fn parse_month_day(value: &str) -> Result<(u32, u32), AppError> {
    let invalid = || AppError::invalid_input(format!("milestone date must be MM-DD: {value:?}"));
    let bytes = value.as_bytes();
    if bytes.len() != 5 || bytes[2] != b'-' {
        return Err(invalid());
    }
    let digits = |part: &str| {
        if part.bytes().all(|b| b.is_ascii_digit()) {
            part.parse::<u32>().ok()
        } else {
            None
        }
    };
    let month = digits(&value[..2]).ok_or_else(invalid)?;
    let day = digits(&value[3..]).ok_or_else(invalid)?;
    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return Err(invalid());
    }
    Ok((month, day))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn milestone(date: &str) -> Milestone {
        Milestone {
            date: date.to_string(),
            title: format!("m{date}"),
            desc: String::new(),
            done: false,
        }
    }

    fn dates(roadmap: &[Milestone]) -> Vec<&str> {
        roadmap.iter().map(|m| m.date.as_str()).collect()
    }

    #[test]
    fn lexicographic_puts_january_first() {
        let mut roadmap = vec![milestone("12-25"), milestone("01-01"), milestone("12-20")];
        RoadmapOrder::Lexicographic.sort(&mut roadmap);
        assert_eq!(dates(&roadmap), ["01-01", "12-20", "12-25"]);
    }

    #[test]
    fn season_start_wraps_year_boundary() {
        let mut roadmap = vec![
            milestone("12-25"),
            milestone("01-01"),
            milestone("12-20"),
            milestone("09-01"),
        ];
        RoadmapOrder::season_start(9).unwrap().sort(&mut roadmap);
        assert_eq!(dates(&roadmap), ["09-01", "12-20", "12-25", "01-01"]);
    }

    #[test]
    fn month_day_validation() {
        assert_eq!(parse_month_day("05-20").unwrap(), (5, 20));
        assert!(parse_month_day("5-20").is_err());
        assert!(parse_month_day("13-01").is_err());
        assert!(parse_month_day("01-32").is_err());
        assert!(parse_month_day("0a-10").is_err());
        assert!(parse_month_day("+1-10").is_err());
        assert!(RoadmapOrder::season_start(0).is_err());
    }
}
