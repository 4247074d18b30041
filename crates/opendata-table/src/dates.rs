use chrono::NaiveDate;

/// Every day from `start` to `end` inclusive, as `YYYY-MM-DD`.
pub fn date_range(start: NaiveDate, end: NaiveDate) -> Vec<String> {
    start
        .iter_days()
        .take_while(|day| *day <= end)
        .map(|day| day.format("%Y-%m-%d").to_string())
        .collect()
}
