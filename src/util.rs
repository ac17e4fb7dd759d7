use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use chrono::NaiveDate;

const DAYS_PER_YEAR: f64 = 365.0;

pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

pub fn years_between(from: NaiveDate, to: NaiveDate) -> f64 {
    days_between(from, to) as f64 / DAYS_PER_YEAR
}

/// Human form of an optional date; open ends read as "now".
pub fn format_date(date: Option<NaiveDate>) -> String {
    match date {
        Some(date) => date.format("%-d. %-m. %Y").to_string(),
        None => "now".to_owned(),
    }
}

pub fn stable_pair(id: u32) -> (f32, f32) {
    let mut hasher = DefaultHasher::new();
    id.hash(&mut hasher);
    let hash = hasher.finish();

    let x = ((hash & 0xffff_ffff) as f64 / u32::MAX as f64) as f32;
    let y = (((hash >> 32) & 0xffff_ffff) as f64 / u32::MAX as f64) as f32;
    ((x * 2.0) - 1.0, (y * 2.0) - 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn year_span_uses_plain_365_day_years() {
        let span = years_between(date(2000, 1, 1), date(2020, 1, 1));
        assert!((span - 20.0).abs() < 0.05);
    }

    #[test]
    fn open_end_formats_as_now() {
        assert_eq!(format_date(None), "now");
        assert_eq!(format_date(Some(date(2015, 1, 1))), "1. 1. 2015");
    }

    #[test]
    fn stable_pair_is_deterministic_and_bounded() {
        let (x, y) = stable_pair(42);
        assert_eq!(stable_pair(42), (x, y));
        assert!((-1.0..=1.0).contains(&x));
        assert!((-1.0..=1.0).contains(&y));
    }
}
