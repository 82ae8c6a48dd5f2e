use chrono::{Datelike as _, Days, NaiveDate, Weekday};

const DAYS_IN_WEEK: u32 = 7;

pub struct Weekly {
    anchor: NaiveDate,
    interval: u32,
    horizon: NaiveDate,
    week_start: Weekday,
    /// Days after the week start, ascending and unique.
    offsets: Vec<u32>,
    by_month: Vec<u32>,
}

#[derive(Default)]
pub struct Options {
    pub interval: Option<u32>,
    pub by_day: Vec<Weekday>,
    pub week_start: Option<Weekday>,
    pub by_month: Vec<u32>,
}

impl Weekly {
    pub fn new(anchor: NaiveDate, horizon: NaiveDate, options: Options) -> Self {
        let week_start = options.week_start.unwrap_or(Weekday::Mon);

        let by_day = if options.by_day.is_empty() {
            vec![anchor.weekday()]
        } else {
            options.by_day
        };

        let mut offsets: Vec<u32> = by_day
            .into_iter()
            .map(|weekday| days_after(week_start, weekday))
            .collect();
        offsets.sort_unstable();
        offsets.dedup();

        Weekly {
            anchor,
            horizon,
            week_start,
            offsets,
            interval: options.interval.unwrap_or(1).max(1),
            by_month: options.by_month,
        }
    }

    /// Selected weekdays of every `interval`-th week, counted from the anchor's week.
    ///
    /// Each base date is the previous one plus `interval` weeks, floored to its week
    /// start, so qualifying weeks are always exactly `interval` weeks apart. Dates
    /// before the anchor in its own week are still yielded; callers drop them.
    pub fn all(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        let step = Days::new(u64::from(DAYS_IN_WEEK) * u64::from(self.interval));

        std::iter::successors(Some(self.anchor), move |base| base.checked_add_days(step))
            .filter_map(move |base| week_floor(base, self.week_start))
            .take_while(move |start| *start <= self.horizon)
            .flat_map(move |start| {
                self.offsets
                    .iter()
                    .filter_map(move |&offset| start.checked_add_days(Days::new(u64::from(offset))))
            })
            .filter(move |date| self.by_month.is_empty() || self.by_month.contains(&date.month()))
    }
}

fn days_after(week_start: Weekday, weekday: Weekday) -> u32 {
    (weekday.num_days_from_monday() + DAYS_IN_WEEK - week_start.num_days_from_monday())
        % DAYS_IN_WEEK
}

pub(crate) fn week_floor(date: NaiveDate, week_start: Weekday) -> Option<NaiveDate> {
    date.checked_sub_days(Days::new(u64::from(days_after(week_start, date.weekday()))))
}
