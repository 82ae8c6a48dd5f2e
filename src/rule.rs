use crate::{error::GenerateError, Frequency};
use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Structured form of one RRULE text.
///
/// Parsing is permissive: the integer fields are signed and `by_day` keeps the raw
/// tokens, so a parsed rule may still be rejected by [`RecurrenceRule::is_valid`] or
/// fail to expand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrenceRule {
    pub frequency: Frequency,
    pub interval: i64,
    pub count: Option<i64>,
    /// Inclusive last date of the series.
    pub until: Option<NaiveDate>,
    pub by_day: Vec<String>,
    pub by_month_day: Vec<i32>,
    pub by_year_day: Vec<i32>,
    pub by_week_no: Vec<i32>,
    pub by_month: Vec<i32>,
    pub by_set_pos: Vec<i32>,
    pub week_start: Weekday,
}

impl RecurrenceRule {
    pub fn new(frequency: Frequency) -> Self {
        RecurrenceRule {
            frequency,
            interval: 1,
            count: None,
            until: None,
            by_day: Vec::new(),
            by_month_day: Vec::new(),
            by_year_day: Vec::new(),
            by_week_no: Vec::new(),
            by_month: Vec::new(),
            by_set_pos: Vec::new(),
            week_start: Weekday::Mon,
        }
    }

    /// Positive interval, positive count, and not both `count` and `until`.
    pub fn is_valid(&self) -> bool {
        self.interval > 0
            && self.count.map_or(true, |count| count > 0)
            && !(self.count.is_some() && self.until.is_some())
    }

    /// Resolves the `by_day` tokens, failing on the first one that is not a weekday.
    pub fn weekdays(&self) -> Result<Vec<WeekdayNum>, GenerateError> {
        self.by_day.iter().map(|token| token.parse()).collect()
    }
}

/// A `BYDAY` entry: a weekday with an optional position (`MO`, `1MO`, `-1FR`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WeekdayNum {
    pub ordinal: Option<i8>,
    pub weekday: Weekday,
}

impl WeekdayNum {
    pub const fn every(weekday: Weekday) -> Self {
        WeekdayNum {
            ordinal: None,
            weekday,
        }
    }

    pub const fn nth(ordinal: i8, weekday: Weekday) -> Self {
        WeekdayNum {
            ordinal: Some(ordinal),
            weekday,
        }
    }
}

impl FromStr for WeekdayNum {
    type Err = GenerateError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let invalid = || GenerateError::InvalidByDay(token.to_owned());
        let trimmed = token.trim();

        let split = trimmed.len().checked_sub(2).ok_or_else(invalid)?;
        if !trimmed.is_char_boundary(split) {
            return Err(invalid());
        }
        let (prefix, code) = trimmed.split_at(split);
        let weekday = parse_weekday_code(code).ok_or_else(invalid)?;

        if prefix.is_empty() {
            return Ok(WeekdayNum::every(weekday));
        }

        let ordinal: i8 = prefix.parse().map_err(|_| invalid())?;
        if ordinal == 0 || !(-53..=53).contains(&ordinal) {
            return Err(invalid());
        }

        Ok(WeekdayNum::nth(ordinal, weekday))
    }
}

impl fmt::Display for WeekdayNum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(n) = self.ordinal {
            write!(f, "{}", n)?;
        }
        f.write_str(weekday_code(self.weekday))
    }
}

pub(crate) fn weekday_code(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "MO",
        Weekday::Tue => "TU",
        Weekday::Wed => "WE",
        Weekday::Thu => "TH",
        Weekday::Fri => "FR",
        Weekday::Sat => "SA",
        Weekday::Sun => "SU",
    }
}

pub(crate) fn parse_weekday_code(code: &str) -> Option<Weekday> {
    Some(match code.to_ascii_uppercase().as_str() {
        "MO" => Weekday::Mon,
        "TU" => Weekday::Tue,
        "WE" => Weekday::Wed,
        "TH" => Weekday::Thu,
        "FR" => Weekday::Fri,
        "SA" => Weekday::Sat,
        "SU" => Weekday::Sun,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    #[test]
    fn bare_weekday() {
        assert_eq!("mo".parse::<WeekdayNum>(), Ok(WeekdayNum::every(Weekday::Mon)));
        assert_eq!(" SU ".parse::<WeekdayNum>(), Ok(WeekdayNum::every(Weekday::Sun)));
    }

    #[test]
    fn ordinal_weekday() {
        assert_eq!("1MO".parse::<WeekdayNum>(), Ok(WeekdayNum::nth(1, Weekday::Mon)));
        assert_eq!("+2TU".parse::<WeekdayNum>(), Ok(WeekdayNum::nth(2, Weekday::Tue)));
        assert_eq!("-1FR".parse::<WeekdayNum>(), Ok(WeekdayNum::nth(-1, Weekday::Fri)));
    }

    #[test]
    fn rejects_junk() {
        for token in ["", "M", "XX", "0MO", "99MO", "xMO", "1ñ"] {
            assert_eq!(
                token.parse::<WeekdayNum>(),
                Err(GenerateError::InvalidByDay(token.to_owned())),
                "{:?}",
                token
            );
        }
    }

    #[test]
    fn display() {
        assert_eq!(WeekdayNum::nth(-1, Weekday::Fri).to_string(), "-1FR");
        assert_eq!(WeekdayNum::every(Weekday::Wed).to_string(), "WE");
    }

    #[test]
    fn weekday_num_json() {
        let last_friday = WeekdayNum::nth(-1, Weekday::Fri);
        let json = serde_json::to_value(last_friday).unwrap();

        assert_eq!(json["ordinal"], -1);
        assert_eq!(serde_json::from_value::<WeekdayNum>(json).unwrap(), last_friday);
    }

    #[test]
    fn validity() {
        let mut rule = RecurrenceRule::new(Frequency::Daily);
        assert!(rule.is_valid());

        rule.count = Some(3);
        assert!(rule.is_valid());

        rule.until = Some(ymd(2024, 1, 1));
        assert!(!rule.is_valid());

        rule.count = None;
        rule.interval = 0;
        assert!(!rule.is_valid());

        rule.interval = 1;
        rule.until = None;
        rule.count = Some(-2);
        assert!(!rule.is_valid());
    }

    #[test]
    fn weekdays_fail_on_first_bad_token() {
        let mut rule = RecurrenceRule::new(Frequency::Weekly);
        rule.by_day = vec!["MO".into(), "XX".into()];
        assert_eq!(
            rule.weekdays(),
            Err(GenerateError::InvalidByDay("XX".into()))
        );
    }
}
