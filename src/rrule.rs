use crate::{
    daily::{self, Daily},
    error::GenerateError,
    monthly::{self, Monthly},
    rule::RecurrenceRule,
    weekly::{self, Weekly},
    yearly::{self, Yearly},
    Frequency,
};
use chrono::NaiveDate;

/// A rule bound to its anchor, one variant per expandable frequency.
pub enum Expansion {
    Daily(Daily),
    Weekly(Weekly),
    Monthly(Monthly),
    Yearly(Yearly),
}

impl Expansion {
    /// Fails on rule parts the frequency cannot honor instead of ignoring them.
    pub fn new(
        rule: &RecurrenceRule,
        anchor: NaiveDate,
        horizon: NaiveDate,
    ) -> Result<Self, GenerateError> {
        let interval = u32::try_from(rule.interval)
            .ok()
            .filter(|interval| *interval > 0)
            .ok_or(GenerateError::InvalidInterval(rule.interval))?;

        let unsupported = |part: &'static str, populated: bool| {
            if populated {
                Err(GenerateError::Unsupported {
                    frequency: rule.frequency,
                    part,
                })
            } else {
                Ok(())
            }
        };

        unsupported("BYYEARDAY", !rule.by_year_day.is_empty())?;
        unsupported("BYWEEKNO", !rule.by_week_no.is_empty())?;

        let by_day = rule.weekdays()?;
        let by_month = months(&rule.by_month);

        let expansion = match rule.frequency {
            Frequency::Secondly | Frequency::Minutely | Frequency::Hourly => {
                return Err(GenerateError::Unsupported {
                    frequency: rule.frequency,
                    part: "FREQ",
                })
            }
            Frequency::Daily => {
                unsupported("BYSETPOS", !rule.by_set_pos.is_empty())?;
                Expansion::Daily(Daily::new(
                    anchor,
                    horizon,
                    daily::Options {
                        interval: Some(interval),
                        by_day: by_day.iter().map(|day| day.weekday).collect(),
                        by_month_day: rule.by_month_day.clone(),
                        by_month,
                    },
                ))
            }
            Frequency::Weekly => {
                unsupported("BYSETPOS", !rule.by_set_pos.is_empty())?;
                unsupported("BYMONTHDAY", !rule.by_month_day.is_empty())?;
                Expansion::Weekly(Weekly::new(
                    anchor,
                    horizon,
                    weekly::Options {
                        interval: Some(interval),
                        by_day: by_day.iter().map(|day| day.weekday).collect(),
                        week_start: Some(rule.week_start),
                        by_month,
                    },
                ))
            }
            Frequency::Monthly => Expansion::Monthly(Monthly::new(
                anchor,
                horizon,
                monthly::Options {
                    interval: Some(interval),
                    by_day,
                    by_month_day: rule.by_month_day.clone(),
                    by_set_pos: rule.by_set_pos.clone(),
                    by_month,
                },
            )),
            Frequency::Yearly => {
                unsupported("BYSETPOS", !rule.by_set_pos.is_empty())?;
                unsupported("BYDAY", !rule.by_day.is_empty())?;
                Expansion::Yearly(Yearly::new(
                    anchor,
                    horizon,
                    yearly::Options {
                        interval: Some(interval),
                        by_month,
                        by_month_day: rule.by_month_day.clone(),
                    },
                ))
            }
        };

        Ok(expansion)
    }

    /// Candidate dates in ascending order, before count and until are applied.
    pub fn all(&self) -> Box<dyn Iterator<Item = NaiveDate> + '_> {
        match self {
            Expansion::Daily(d) => Box::new(d.all()),
            Expansion::Weekly(w) => Box::new(w.all()),
            Expansion::Monthly(m) => Box::new(m.all()),
            Expansion::Yearly(y) => Box::new(y.all()),
        }
    }
}

/// `BYMONTH` values outside 1..=12 become 0, which no date matches.
fn months(by_month: &[i32]) -> Vec<u32> {
    by_month
        .iter()
        .map(|&month| {
            u32::try_from(month)
                .ok()
                .filter(|month| (1..=12).contains(month))
                .unwrap_or(0)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    fn rule(text: &str) -> RecurrenceRule {
        text.parse().unwrap()
    }

    fn expand(text: &str) -> Result<Vec<NaiveDate>, GenerateError> {
        let expansion = Expansion::new(&rule(text), new_years_day(), ymd(2024, 12, 31))?;
        Ok(expansion.all().take(5).collect())
    }

    #[test]
    fn dispatches_by_frequency() {
        assert_eq!(expand("FREQ=DAILY").unwrap()[1], ymd(2024, 1, 2));
        assert_eq!(expand("FREQ=WEEKLY").unwrap()[1], ymd(2024, 1, 8));
        assert_eq!(expand("FREQ=MONTHLY").unwrap()[1], ymd(2024, 2, 1));
        assert_eq!(expand("FREQ=YEARLY").unwrap(), vec![ymd(2024, 1, 1)]);
    }

    #[test]
    fn sub_daily_is_unsupported() {
        assert_eq!(
            expand("FREQ=HOURLY").unwrap_err(),
            GenerateError::Unsupported {
                frequency: Frequency::Hourly,
                part: "FREQ"
            }
        );
    }

    #[test]
    fn unapplied_parts_are_unsupported() {
        for (text, frequency, part) in [
            ("FREQ=DAILY;BYYEARDAY=10", Frequency::Daily, "BYYEARDAY"),
            ("FREQ=MONTHLY;BYWEEKNO=3", Frequency::Monthly, "BYWEEKNO"),
            ("FREQ=WEEKLY;BYSETPOS=1", Frequency::Weekly, "BYSETPOS"),
            ("FREQ=WEEKLY;BYMONTHDAY=1", Frequency::Weekly, "BYMONTHDAY"),
            ("FREQ=YEARLY;BYDAY=MO", Frequency::Yearly, "BYDAY"),
        ] {
            assert_eq!(
                expand(text).unwrap_err(),
                GenerateError::Unsupported { frequency, part },
                "{}",
                text
            );
        }
    }

    #[test]
    fn bad_interval() {
        assert_eq!(
            expand("FREQ=DAILY;INTERVAL=0").unwrap_err(),
            GenerateError::InvalidInterval(0)
        );
        assert_eq!(
            expand("FREQ=DAILY;INTERVAL=-3").unwrap_err(),
            GenerateError::InvalidInterval(-3)
        );
    }

    #[test]
    fn bad_weekday_token() {
        assert_eq!(
            expand("FREQ=WEEKLY;BYDAY=MO,XY").unwrap_err(),
            GenerateError::InvalidByDay("XY".into())
        );
    }

    #[test]
    fn ordinal_weekdays_act_as_weekdays_outside_monthly() {
        let dates = expand("FREQ=WEEKLY;BYDAY=1TU").unwrap();
        assert_eq!(dates[0], ymd(2024, 1, 2));
    }

    #[test]
    fn month_values_out_of_range_never_match() {
        assert_eq!(months(&[0, 3, 13, -1, 12]), vec![0, 3, 0, 0, 12]);
        assert_eq!(expand("FREQ=MONTHLY;BYMONTH=13").unwrap(), Vec::<NaiveDate>::new());
        assert_eq!(expand("FREQ=YEARLY;BYMONTH=0").unwrap(), Vec::<NaiveDate>::new());
    }
}
