use crate::rule::WeekdayNum;
use chrono::{Datelike as _, Days, NaiveDate, Weekday};

pub struct Monthly {
    anchor: NaiveDate,
    interval: u32,
    horizon: NaiveDate,
    by_day: Vec<WeekdayNum>,
    by_month_day: Vec<i32>,
    by_set_pos: Vec<i32>,
    by_month: Vec<u32>,
}

#[derive(Default)]
pub struct Options {
    pub interval: Option<u32>,
    pub by_day: Vec<WeekdayNum>,
    pub by_month_day: Vec<i32>,
    pub by_set_pos: Vec<i32>,
    pub by_month: Vec<u32>,
}

impl Monthly {
    pub fn new(anchor: NaiveDate, horizon: NaiveDate, options: Options) -> Self {
        Monthly {
            anchor,
            horizon,
            interval: options.interval.unwrap_or(1).max(1),
            by_day: options.by_day,
            by_month_day: options.by_month_day,
            by_set_pos: options.by_set_pos,
            by_month: options.by_month,
        }
    }

    /// Matching days of every `interval`-th month starting with the anchor's month.
    pub fn all(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        let first = month_index(self.anchor);
        let step = i64::from(self.interval);

        std::iter::successors(Some(first), move |index| index.checked_add(step))
            .map_while(month_start)
            .take_while(move |start| *start <= self.horizon)
            .filter(move |start| self.by_month.is_empty() || self.by_month.contains(&start.month()))
            .flat_map(move |start| self.days_of(start.year(), start.month()))
    }

    /// Candidates of one month, ascending and unique. Month days take precedence over
    /// weekdays, which take precedence over the anchor's day.
    fn days_of(&self, year: i32, month: u32) -> Vec<NaiveDate> {
        let mut days: Vec<NaiveDate> = if !self.by_month_day.is_empty() {
            self.by_month_day
                .iter()
                .filter_map(|&day| resolve_month_day(year, month, day))
                .collect()
        } else if !self.by_day.is_empty() {
            self.by_day
                .iter()
                .flat_map(|day| weekdays_in_month(year, month, *day))
                .collect()
        } else {
            NaiveDate::from_ymd_opt(year, month, self.anchor.day())
                .into_iter()
                .collect()
        };

        days.sort_unstable();
        days.dedup();

        if self.by_set_pos.is_empty() {
            days
        } else {
            select_positions(&days, &self.by_set_pos)
        }
    }
}

/// Picks 1-based positions (negative counts from the end) out of a sorted set.
pub(crate) fn select_positions(days: &[NaiveDate], positions: &[i32]) -> Vec<NaiveDate> {
    let len = days.len() as i64;
    let mut picked: Vec<NaiveDate> = positions
        .iter()
        .filter_map(|&pos| {
            let index = match i64::from(pos) {
                0 => return None,
                pos if pos > 0 => pos - 1,
                pos => len + pos,
            };
            usize::try_from(index).ok().and_then(|i| days.get(i).copied())
        })
        .collect();

    picked.sort_unstable();
    picked.dedup();
    picked
}

/// Resolves a day-of-month where negative values count back from the month's end.
/// Days the month does not have resolve to `None` rather than being clamped.
pub(crate) fn resolve_month_day(year: i32, month: u32, day: i32) -> Option<NaiveDate> {
    let length = days_in_month(year, month)? as i32;
    let day = match day {
        0 => return None,
        day if day > 0 => day,
        day => length + day + 1,
    };

    if day < 1 || day > length {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, day as u32)
}

pub(crate) fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year.checked_add(1)?, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    u32::try_from((next - first).num_days()).ok()
}

/// Every matching weekday of the month, or only the Nth (`-1` for the last).
fn weekdays_in_month(year: i32, month: u32, day: WeekdayNum) -> Vec<NaiveDate> {
    let all = all_weekdays_in_month(year, month, day.weekday);

    match day.ordinal {
        None => all,
        Some(n) => select_positions(&all, &[i32::from(n)]),
    }
}

fn all_weekdays_in_month(year: i32, month: u32, weekday: Weekday) -> Vec<NaiveDate> {
    let first = match NaiveDate::from_ymd_opt(year, month, 1) {
        Some(first) => first,
        None => return Vec::new(),
    };
    let offset = (weekday.num_days_from_monday() + 7 - first.weekday().num_days_from_monday()) % 7;

    std::iter::successors(first.checked_add_days(Days::new(u64::from(offset))), |date| {
        date.checked_add_days(Days::new(7))
    })
    .take_while(|date| date.month() == month)
    .collect()
}

fn month_index(date: NaiveDate) -> i64 {
    i64::from(date.year()) * 12 + i64::from(date.month0())
}

fn month_start(index: i64) -> Option<NaiveDate> {
    let year = i32::try_from(index.div_euclid(12)).ok()?;
    let month = u32::try_from(index.rem_euclid(12)).ok()? + 1;
    NaiveDate::from_ymd_opt(year, month, 1)
}
