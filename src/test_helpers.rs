use chrono::NaiveDate;

pub fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("bug: invalid test date")
}

/// Dates within one year.
pub fn dates_in(year: i32, month_days: &[(u32, u32)]) -> Vec<NaiveDate> {
    month_days
        .iter()
        .map(|&(month, day)| ymd(year, month, day))
        .collect()
}

pub fn new_years_day() -> NaiveDate {
    ymd(2024, 1, 1)
}
