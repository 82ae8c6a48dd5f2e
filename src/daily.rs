use crate::monthly::resolve_month_day;
use chrono::{Datelike as _, Days, NaiveDate, Weekday};

pub struct Daily {
    anchor: NaiveDate,
    interval: u32,
    horizon: NaiveDate,
    by_day: Vec<Weekday>,
    by_month_day: Vec<i32>,
    by_month: Vec<u32>,
}

#[derive(Default)]
pub struct Options {
    pub interval: Option<u32>,
    pub by_day: Vec<Weekday>,
    pub by_month_day: Vec<i32>,
    pub by_month: Vec<u32>,
}

impl Daily {
    pub fn new(anchor: NaiveDate, horizon: NaiveDate, options: Options) -> Self {
        Daily {
            anchor,
            horizon,
            interval: options.interval.unwrap_or(1).max(1),
            by_day: options.by_day,
            by_month_day: options.by_month_day,
            by_month: options.by_month,
        }
    }

    /// Every `interval`-th day from the anchor up to the horizon that passes the filters.
    pub fn all(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        let step = Days::new(u64::from(self.interval));

        std::iter::successors(Some(self.anchor), move |date| date.checked_add_days(step))
            .take_while(move |date| *date <= self.horizon)
            .filter(move |date| self.matches(*date))
    }

    fn matches(&self, date: NaiveDate) -> bool {
        (self.by_day.is_empty() || self.by_day.contains(&date.weekday()))
            && (self.by_month.is_empty() || self.by_month.contains(&date.month()))
            && (self.by_month_day.is_empty()
                || self
                    .by_month_day
                    .iter()
                    .any(|&day| resolve_month_day(date.year(), date.month(), day) == Some(date)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    fn far_future() -> NaiveDate {
        ymd(2100, 1, 1)
    }

    #[test]
    fn starts_at_anchor() {
        let daily = Daily::new(new_years_day(), far_future(), Options::default());
        assert_eq!(daily.all().next(), Some(new_years_day()));
    }

    #[test]
    fn multiple_days() {
        let daily = Daily::new(new_years_day(), far_future(), Options::default());
        let dates: Vec<_> = daily.all().take(3).collect();
        assert_eq!(dates, dates_in(2024, &[(1, 1), (1, 2), (1, 3)]));
    }

    #[test]
    fn interval() {
        let daily = Daily::new(
            new_years_day(),
            far_future(),
            Options {
                interval: Some(3),
                ..Options::default()
            },
        );

        let three_days_later = daily.all().nth(1);
        assert_eq!(three_days_later, Some(ymd(2024, 1, 4)));
    }

    #[test]
    fn stops_at_horizon() {
        let daily = Daily::new(new_years_day(), ymd(2024, 1, 5), Options::default());
        assert_eq!(daily.all().count(), 5);
    }

    #[test]
    fn weekday_filter() {
        // 2024-01-01 is a Monday
        let daily = Daily::new(
            new_years_day(),
            ymd(2024, 1, 14),
            Options {
                by_day: vec![Weekday::Tue, Weekday::Sat],
                ..Options::default()
            },
        );

        let dates: Vec<_> = daily.all().collect();
        assert_eq!(dates, dates_in(2024, &[(1, 2), (1, 6), (1, 9), (1, 13)]));
    }

    #[test]
    fn month_day_and_month_filters() {
        let daily = Daily::new(
            new_years_day(),
            ymd(2024, 12, 31),
            Options {
                by_month_day: vec![-1],
                by_month: vec![2, 4],
                ..Options::default()
            },
        );

        let dates: Vec<_> = daily.all().collect();
        assert_eq!(dates, dates_in(2024, &[(2, 29), (4, 30)]));
    }

    #[test]
    fn ends_at_calendar_limit() {
        let daily = Daily::new(NaiveDate::MAX, NaiveDate::MAX, Options::default());
        assert_eq!(daily.all().count(), 1);
    }
}
