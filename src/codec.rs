use crate::{
    error::ParseError,
    rule::{parse_weekday_code, weekday_code, RecurrenceRule},
    Frequency,
};
use chrono::{NaiveDate, Weekday};
use std::{fmt, str::FromStr};

const RULE_PREFIX: &str = "RRULE:";

impl FromStr for RecurrenceRule {
    type Err = ParseError;

    #[tracing::instrument(level = "trace")]
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let text = strip_prefix(text.trim());
        if text.is_empty() {
            return Err(ParseError::Empty);
        }

        let mut frequency = None;
        let mut rule = RecurrenceRule::new(Frequency::Daily);

        for part in text.split(';').filter(|part| !part.trim().is_empty()) {
            let (key, value) = match part.split_once('=') {
                Some((key, value)) => (key.trim().to_ascii_uppercase(), value.trim()),
                None => {
                    tracing::debug!(part, "Ignoring rule part without '='");
                    continue;
                }
            };

            match key.as_str() {
                "FREQ" => {
                    frequency = Some(
                        Frequency::parse(value)
                            .ok_or_else(|| ParseError::InvalidFrequency(value.to_owned()))?,
                    );
                }
                "INTERVAL" => rule.interval = parse_integer("INTERVAL", value)?,
                "COUNT" => rule.count = Some(parse_integer("COUNT", value)?),
                "UNTIL" => rule.until = Some(parse_until(value)?),
                "BYDAY" => {
                    rule.by_day = value
                        .split(',')
                        .map(str::trim)
                        .filter(|token| !token.is_empty())
                        .map(str::to_owned)
                        .collect();
                }
                "BYMONTHDAY" => rule.by_month_day = parse_list("BYMONTHDAY", value),
                "BYYEARDAY" => rule.by_year_day = parse_list("BYYEARDAY", value),
                "BYWEEKNO" => rule.by_week_no = parse_list("BYWEEKNO", value),
                "BYMONTH" => rule.by_month = parse_list("BYMONTH", value),
                "BYSETPOS" => rule.by_set_pos = parse_list("BYSETPOS", value),
                "WKST" => match parse_weekday_code(value) {
                    Some(weekday) => rule.week_start = weekday,
                    None => tracing::debug!(value, "Ignoring unknown WKST"),
                },
                _ => tracing::debug!(key = %key, "Ignoring unknown rule part"),
            }
        }

        rule.frequency = frequency.ok_or(ParseError::MissingFrequency)?;
        Ok(rule)
    }
}

impl fmt::Display for RecurrenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FREQ={}", self.frequency)?;

        if self.interval != 1 {
            write!(f, ";INTERVAL={}", self.interval)?;
        }
        if let Some(count) = self.count {
            write!(f, ";COUNT={}", count)?;
        }
        if let Some(until) = self.until {
            write!(f, ";UNTIL={}", until.format("%Y%m%d"))?;
        }
        if !self.by_day.is_empty() {
            write!(f, ";BYDAY={}", self.by_day.join(","))?;
        }

        write_list(f, "BYMONTHDAY", &self.by_month_day)?;
        write_list(f, "BYYEARDAY", &self.by_year_day)?;
        write_list(f, "BYWEEKNO", &self.by_week_no)?;
        write_list(f, "BYMONTH", &self.by_month)?;
        write_list(f, "BYSETPOS", &self.by_set_pos)?;

        if self.week_start != Weekday::Mon {
            write!(f, ";WKST={}", weekday_code(self.week_start))?;
        }

        Ok(())
    }
}

/// Whether `text` parses into a rule that [`RecurrenceRule::is_valid`] accepts.
pub fn validate(text: &str) -> bool {
    text.parse::<RecurrenceRule>()
        .map(|rule| rule.is_valid())
        .unwrap_or(false)
}

fn strip_prefix(text: &str) -> &str {
    match text.get(..RULE_PREFIX.len()) {
        Some(head) if head.eq_ignore_ascii_case(RULE_PREFIX) => &text[RULE_PREFIX.len()..],
        _ => text,
    }
}

fn parse_integer(key: &'static str, value: &str) -> Result<i64, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidInteger {
        key,
        value: value.to_owned(),
    })
}

/// Non-integer entries are dropped rather than failing the whole rule.
fn parse_list(key: &str, value: &str) -> Vec<i32> {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| match entry.parse() {
            Ok(n) => Some(n),
            Err(_) => {
                tracing::debug!(key, entry, "Dropping non-integer list entry");
                None
            }
        })
        .collect()
}

/// `YYYYMMDD`, optionally followed by `T` and a time/zone suffix that is discarded.
fn parse_until(value: &str) -> Result<NaiveDate, ParseError> {
    let invalid = || ParseError::InvalidUntil(value.to_owned());

    let date = match value.split_once(|c: char| c == 'T' || c == 't') {
        Some((date, _time)) => date,
        None => value,
    };

    if date.len() != 8 || !date.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    NaiveDate::parse_from_str(date, "%Y%m%d").map_err(|_| invalid())
}

fn write_list(f: &mut fmt::Formatter<'_>, key: &str, values: &[i32]) -> fmt::Result {
    if values.is_empty() {
        return Ok(());
    }

    write!(f, ";{}=", key)?;
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            f.write_str(",")?;
        }
        write!(f, "{}", value)?;
    }
    Ok(())
}
