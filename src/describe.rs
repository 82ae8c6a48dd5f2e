//! Rules rendered as a sentence such as "Every 2 weeks on Monday, Friday, for 10 occurrences".
//!
//! Every word comes from a [`Localizer`] looked up by a [`Key`]; the English fallback
//! travels with the key, so [`NoLocalizer`] yields plain English.

use crate::{error::GenerateError, rule::RecurrenceRule, Frequency};
use chrono::Weekday;

/// Source of translated fragments and localized numbers.
pub trait Localizer {
    fn lookup(&self, id: &str, fallback: &str) -> String {
        let _ = id;
        fallback.to_owned()
    }

    fn format_number(&self, n: i64) -> String {
        n.to_string()
    }
}

/// Answers every lookup with its fallback.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLocalizer;

impl Localizer for NoLocalizer {}

/// A lookup identifier and the English text used when it has no translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Key {
    pub id: &'static str,
    pub fallback: &'static str,
}

const fn key(id: &'static str, fallback: &'static str) -> Key {
    Key { id, fallback }
}

pub mod keys {
    use super::{key, Key};

    pub const SECONDLY: Key = key("recurrence.frequency.secondly", "Secondly");
    pub const MINUTELY: Key = key("recurrence.frequency.minutely", "Minutely");
    pub const HOURLY: Key = key("recurrence.frequency.hourly", "Hourly");
    pub const DAILY: Key = key("recurrence.frequency.daily", "Daily");
    pub const WEEKLY: Key = key("recurrence.frequency.weekly", "Weekly");
    pub const MONTHLY: Key = key("recurrence.frequency.monthly", "Monthly");
    pub const YEARLY: Key = key("recurrence.frequency.yearly", "Yearly");

    pub const SECONDS: Key = key("recurrence.unit.seconds", "seconds");
    pub const MINUTES: Key = key("recurrence.unit.minutes", "minutes");
    pub const HOURS: Key = key("recurrence.unit.hours", "hours");
    pub const DAYS: Key = key("recurrence.unit.days", "days");
    pub const WEEKS: Key = key("recurrence.unit.weeks", "weeks");
    pub const MONTHS: Key = key("recurrence.unit.months", "months");
    pub const YEARS: Key = key("recurrence.unit.years", "years");

    pub const MONDAY: Key = key("recurrence.weekday.monday", "Monday");
    pub const TUESDAY: Key = key("recurrence.weekday.tuesday", "Tuesday");
    pub const WEDNESDAY: Key = key("recurrence.weekday.wednesday", "Wednesday");
    pub const THURSDAY: Key = key("recurrence.weekday.thursday", "Thursday");
    pub const FRIDAY: Key = key("recurrence.weekday.friday", "Friday");
    pub const SATURDAY: Key = key("recurrence.weekday.saturday", "Saturday");
    pub const SUNDAY: Key = key("recurrence.weekday.sunday", "Sunday");

    pub const FIRST: Key = key("recurrence.ordinal.first", "first");
    pub const SECOND: Key = key("recurrence.ordinal.second", "second");
    pub const THIRD: Key = key("recurrence.ordinal.third", "third");
    pub const FOURTH: Key = key("recurrence.ordinal.fourth", "fourth");
    pub const FIFTH: Key = key("recurrence.ordinal.fifth", "fifth");
    pub const LAST: Key = key("recurrence.ordinal.last", "last");
    pub const SECOND_TO_LAST: Key = key("recurrence.ordinal.second_to_last", "second to last");

    pub const EVERY: Key = key("recurrence.every", "Every");
    pub const ON: Key = key("recurrence.on", "on");
    pub const THE: Key = key("recurrence.the", "the");
    pub const DAY: Key = key("recurrence.day", "day");
    pub const LAST_DAY: Key = key("recurrence.last_day", "the last day");
    pub const FOR: Key = key("recurrence.for", "for");
    pub const OCCURRENCE: Key = key("recurrence.occurrence", "occurrence");
    pub const OCCURRENCES: Key = key("recurrence.occurrences", "occurrences");
    pub const UNTIL: Key = key("recurrence.until", "until");
    pub const LIST_SEPARATOR: Key = key("recurrence.list_separator", ", ");
    pub const INVALID_PATTERN: Key = key("recurrence.invalid_pattern", "Invalid pattern");
}

/// Describes `rule`, or the invalid-pattern text if it cannot be described.
pub fn describe(rule: &RecurrenceRule, localizer: &dyn Localizer) -> String {
    let words = Words { localizer };
    words.rule(rule).unwrap_or_else(|error| {
        tracing::warn!(%error, rule = %rule, "Could not describe rule");
        words.get(keys::INVALID_PATTERN)
    })
}

/// Parses and describes `text`; unparsable text gets the invalid-pattern text.
pub fn describe_text(text: &str, localizer: &dyn Localizer) -> String {
    match text.parse::<RecurrenceRule>() {
        Ok(rule) => describe(&rule, localizer),
        Err(error) => {
            tracing::debug!(%error, text, "Could not parse rule to describe");
            Words { localizer }.get(keys::INVALID_PATTERN)
        }
    }
}

struct Words<'a> {
    localizer: &'a dyn Localizer,
}

impl Words<'_> {
    fn get(&self, key: Key) -> String {
        self.localizer.lookup(key.id, key.fallback)
    }

    fn number(&self, n: i64) -> String {
        self.localizer.format_number(n)
    }

    fn list(&self, items: Vec<String>) -> String {
        items.join(&self.get(keys::LIST_SEPARATOR))
    }

    fn rule(&self, rule: &RecurrenceRule) -> Result<String, GenerateError> {
        let mut sentence = self.frequency(rule);

        match rule.frequency {
            Frequency::Weekly if !rule.by_day.is_empty() => {
                let days = rule
                    .weekdays()?
                    .iter()
                    .map(|day| self.weekday(day.weekday))
                    .collect();
                sentence = format!("{} {} {}", sentence, self.get(keys::ON), self.list(days));
            }
            Frequency::Monthly => {
                if let Some(clause) = self.monthly(rule)? {
                    sentence = format!("{} {} {}", sentence, self.get(keys::ON), clause);
                }
            }
            _ => {}
        }

        if let Some(count) = rule.count {
            let unit = if count == 1 {
                keys::OCCURRENCE
            } else {
                keys::OCCURRENCES
            };
            sentence = format!(
                "{}, {} {} {}",
                sentence,
                self.get(keys::FOR),
                self.number(count),
                self.get(unit)
            );
        } else if let Some(until) = rule.until {
            sentence = format!(
                "{}, {} {}",
                sentence,
                self.get(keys::UNTIL),
                until.format("%Y-%m-%d")
            );
        }

        Ok(sentence)
    }

    fn frequency(&self, rule: &RecurrenceRule) -> String {
        let (name, unit) = match rule.frequency {
            Frequency::Secondly => (keys::SECONDLY, keys::SECONDS),
            Frequency::Minutely => (keys::MINUTELY, keys::MINUTES),
            Frequency::Hourly => (keys::HOURLY, keys::HOURS),
            Frequency::Daily => (keys::DAILY, keys::DAYS),
            Frequency::Weekly => (keys::WEEKLY, keys::WEEKS),
            Frequency::Monthly => (keys::MONTHLY, keys::MONTHS),
            Frequency::Yearly => (keys::YEARLY, keys::YEARS),
        };

        if rule.interval == 1 {
            self.get(name)
        } else {
            format!(
                "{} {} {}",
                self.get(keys::EVERY),
                self.number(rule.interval),
                self.get(unit)
            )
        }
    }

    /// "day 15, the last day", "the last Friday" or "the second Tuesday".
    fn monthly(&self, rule: &RecurrenceRule) -> Result<Option<String>, GenerateError> {
        if !rule.by_month_day.is_empty() {
            let days = rule
                .by_month_day
                .iter()
                .map(|&day| match day {
                    -1 => self.get(keys::LAST_DAY),
                    day => format!("{} {}", self.get(keys::DAY), self.number(i64::from(day))),
                })
                .collect();
            return Ok(Some(self.list(days)));
        }

        if rule.by_day.is_empty() {
            return Ok(None);
        }

        let weekdays = rule.weekdays()?;

        if !rule.by_set_pos.is_empty() {
            let positions = rule
                .by_set_pos
                .iter()
                .map(|&pos| self.ordinal(i64::from(pos)))
                .collect();
            let days = weekdays.iter().map(|day| self.weekday(day.weekday)).collect();
            return Ok(Some(format!(
                "{} {} {}",
                self.get(keys::THE),
                self.list(positions),
                self.list(days)
            )));
        }

        let days = weekdays
            .iter()
            .map(|day| match day.ordinal {
                Some(n) => format!(
                    "{} {} {}",
                    self.get(keys::THE),
                    self.ordinal(i64::from(n)),
                    self.weekday(day.weekday)
                ),
                None => self.weekday(day.weekday),
            })
            .collect();
        Ok(Some(self.list(days)))
    }

    fn ordinal(&self, n: i64) -> String {
        let key = match n {
            1 => keys::FIRST,
            2 => keys::SECOND,
            3 => keys::THIRD,
            4 => keys::FOURTH,
            5 => keys::FIFTH,
            -1 => keys::LAST,
            -2 => keys::SECOND_TO_LAST,
            n => return self.number(n),
        };
        self.get(key)
    }

    fn weekday(&self, weekday: Weekday) -> String {
        self.get(match weekday {
            Weekday::Mon => keys::MONDAY,
            Weekday::Tue => keys::TUESDAY,
            Weekday::Wed => keys::WEDNESDAY,
            Weekday::Thu => keys::THURSDAY,
            Weekday::Fri => keys::FRIDAY,
            Weekday::Sat => keys::SATURDAY,
            Weekday::Sun => keys::SUNDAY,
        })
    }
}
