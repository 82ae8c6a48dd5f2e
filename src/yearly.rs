use crate::monthly::resolve_month_day;
use chrono::{Datelike as _, NaiveDate};

pub struct Yearly {
    anchor: NaiveDate,
    interval: u32,
    horizon: NaiveDate,
    months: Vec<u32>,
    by_month_day: Vec<i32>,
}

#[derive(Default)]
pub struct Options {
    pub interval: Option<u32>,
    pub by_month: Vec<u32>,
    pub by_month_day: Vec<i32>,
}

impl Yearly {
    pub fn new(anchor: NaiveDate, horizon: NaiveDate, options: Options) -> Self {
        let mut months = if options.by_month.is_empty() {
            vec![anchor.month()]
        } else {
            options.by_month
        };
        months.sort_unstable();
        months.dedup();

        Yearly {
            anchor,
            horizon,
            months,
            interval: options.interval.unwrap_or(1).max(1),
            by_month_day: options.by_month_day,
        }
    }

    /// Matching days of every `interval`-th year starting with the anchor's year.
    ///
    /// An anchor on February 29th falls back to February 28th in common years.
    pub fn all(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        let step = i32::try_from(self.interval).unwrap_or(i32::MAX);

        std::iter::successors(Some(self.anchor.year()), move |year| year.checked_add(step))
            .map_while(|year| NaiveDate::from_ymd_opt(year, 1, 1))
            .take_while(move |start| *start <= self.horizon)
            .flat_map(move |start| self.days_of(start.year()))
    }

    fn days_of(&self, year: i32) -> Vec<NaiveDate> {
        let mut days: Vec<NaiveDate> = self
            .months
            .iter()
            .flat_map(|&month| -> Vec<NaiveDate> {
                if self.by_month_day.is_empty() {
                    self.anchor_day_in(year, month).into_iter().collect()
                } else {
                    self.by_month_day
                        .iter()
                        .filter_map(|&day| resolve_month_day(year, month, day))
                        .collect()
                }
            })
            .collect();

        days.sort_unstable();
        days.dedup();
        days
    }

    fn anchor_day_in(&self, year: i32, month: u32) -> Option<NaiveDate> {
        let day = self.anchor.day();
        NaiveDate::from_ymd_opt(year, month, day).or_else(|| {
            let leap_anchor = self.anchor.month() == 2 && day == 29;
            if leap_anchor && month == 2 {
                NaiveDate::from_ymd_opt(year, 2, 28)
            } else {
                None
            }
        })
    }
}
