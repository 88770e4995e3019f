use crate::day::Day;
use chrono::Datelike;

pub const QUOTES: [&str; 6] = [
    "The only way to do great work is to love what you do.",
    "Believe you can and you're halfway there.",
    "Don't watch the clock; do what it does. Keep going.",
    "Success is not final, failure is not fatal: it is the courage to continue that counts.",
    "Your time is limited, so don't waste it living someone else's life.",
    "Focus on being productive instead of busy.",
];

/// The check-in quote for `day`. Stable for the whole day.
pub fn quote_for(day: Day) -> &'static str {
    let index = day.date().num_days_from_ce().rem_euclid(QUOTES.len() as i32) as usize;
    QUOTES[index]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consecutive_days_rotate_quotes() {
        let day = Day::from_ymd(2026, 10, 16).unwrap();
        assert_eq!(quote_for(day), quote_for(day));
        assert_ne!(quote_for(day), quote_for(day.offset(1)));
    }
}
