//! Daily Seed Derivation
//!
//! Every player sees the same puzzle for a given (domain, UTC day). The seed
//! is a 31-multiplier rolling hash over the `YYYY-MM-DD` date string.

use chrono::{NaiveDate, Utc};

/// Format a calendar date as the zero-padded key used for seeds and storage.
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Current UTC calendar date.
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

/// Rolling string hash: `h = h * 31 + c`, truncated to i32 at every step.
///
/// Returns the absolute value. `i32::MIN` maps to `2^31` rather than
/// overflowing.
pub fn string_seed(input: &str) -> u32 {
    let mut hash: i32 = 0;
    for unit in input.encode_utf16() {
        hash = (hash << 5).wrapping_sub(hash).wrapping_add(unit as i32);
    }
    hash.unsigned_abs()
}

/// Seed for the given UTC calendar date.
pub fn daily_seed(date: NaiveDate) -> u32 {
    string_seed(&date_key(date))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_date_key_is_zero_padded() {
        assert_eq!(date_key(ymd(2024, 1, 5)), "2024-01-05");
        assert_eq!(date_key(ymd(2025, 12, 31)), "2025-12-31");
    }

    #[test]
    fn test_known_seeds() {
        // Regression values: changing these reshuffles every daily puzzle.
        assert_eq!(daily_seed(ymd(2026, 10, 19)), 1_162_559_499);
        assert_eq!(daily_seed(ymd(2024, 1, 5)), 613_341_628);
        assert_eq!(daily_seed(ymd(2025, 12, 31)), 275_115_454);
    }

    #[test]
    fn test_seed_is_stable_and_day_specific() {
        let day = ymd(2025, 3, 14);
        assert_eq!(daily_seed(day), daily_seed(day));
        assert_ne!(daily_seed(day), daily_seed(day.succ_opt().unwrap()));
    }

    #[test]
    fn test_empty_string_seed() {
        assert_eq!(string_seed(""), 0);
    }
}
