//! Expansion of a parsed rule into concrete occurrence dates.
//!
//! Every operation comes in two flavors. The `try_` methods report a
//! [`GenerateError`]; the plain methods log it and answer with an empty list, zero,
//! or `None`, so "nothing matched" and "something went wrong" look the same to them.

use crate::{
    date_iterator::SeriesIterator, error::GenerateError, event::Event, rrule::Expansion,
    rule::RecurrenceRule,
};
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub const DEFAULT_MAX_OCCURRENCES: usize = 1000;
pub const DEFAULT_LOOKAHEAD_DAYS: u64 = 365;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Upper bound on the dates a single call returns, whatever the rule says.
    pub max_occurrences: usize,
    /// How far past `after` [`Generator::next_occurrence`] looks.
    pub lookahead_days: u64,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            max_occurrences: DEFAULT_MAX_OCCURRENCES,
            lookahead_days: DEFAULT_LOOKAHEAD_DAYS,
        }
    }
}

impl Options {
    pub fn with_max_occurrences(mut self, max: usize) -> Self {
        self.max_occurrences = max;
        self
    }

    pub fn with_lookahead_days(mut self, days: u64) -> Self {
        self.lookahead_days = days;
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct Generator {
    options: Options,
}

impl Generator {
    pub fn new(options: Options) -> Self {
        Generator { options }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Occurrences in `[max(anchor, range_start), range_end]`, ascending and unique.
    ///
    /// `count` is spent from the anchor onwards, so dates before `range_start` still
    /// use it up.
    #[tracing::instrument(level = "debug", skip(self, rule), fields(rule = %rule))]
    pub fn try_generate(
        &self,
        rule: &RecurrenceRule,
        anchor: Option<NaiveDate>,
        range_start: NaiveDate,
        range_end: NaiveDate,
    ) -> Result<Vec<NaiveDate>, GenerateError> {
        let anchor = match anchor {
            Some(anchor) => anchor,
            None => return Ok(Vec::new()),
        };

        let count = match rule.count {
            None => None,
            Some(count) if count > 0 => Some(count as u64),
            Some(count) => return Err(GenerateError::InvalidCount(count)),
        };

        let horizon = rule.until.map_or(range_end, |until| until.min(range_end));
        let expansion = Expansion::new(rule, anchor, horizon)?;
        let lower = anchor.max(range_start);

        let candidates = expansion.all().skip_while(move |date| *date < anchor);
        let dates: Vec<NaiveDate> = SeriesIterator::new(candidates, count, rule.until)
            .skip_while(|date| *date < lower)
            .take_while(|date| *date <= range_end)
            .take(self.options.max_occurrences)
            .collect();

        tracing::trace!(occurrences = dates.len(), "Generated occurrences");
        Ok(dates)
    }

    pub fn generate(
        &self,
        rule: &RecurrenceRule,
        anchor: Option<NaiveDate>,
        range_start: NaiveDate,
        range_end: NaiveDate,
    ) -> Vec<NaiveDate> {
        lenient(
            "generate",
            self.try_generate(rule, anchor, range_start, range_end),
        )
    }

    /// First occurrence after `after` within the lookahead window that is not excepted.
    pub fn try_next_occurrence(
        &self,
        rule: &RecurrenceRule,
        anchor: Option<NaiveDate>,
        after: NaiveDate,
        exceptions: &BTreeSet<NaiveDate>,
    ) -> Result<Option<NaiveDate>, GenerateError> {
        let start = after
            .checked_add_days(Days::new(1))
            .ok_or(GenerateError::DateOverflow)?;
        let end = after
            .checked_add_days(Days::new(self.options.lookahead_days))
            .unwrap_or(NaiveDate::MAX);

        let dates = self.try_generate(rule, anchor, start, end)?;
        Ok(dates.into_iter().find(|date| !exceptions.contains(date)))
    }

    pub fn next_occurrence(
        &self,
        rule: &RecurrenceRule,
        anchor: Option<NaiveDate>,
        after: NaiveDate,
        exceptions: &BTreeSet<NaiveDate>,
    ) -> Option<NaiveDate> {
        lenient(
            "next_occurrence",
            self.try_next_occurrence(rule, anchor, after, exceptions),
        )
    }

    /// Non-excepted occurrences in `[anchor, until]`.
    pub fn try_count_occurrences(
        &self,
        rule: &RecurrenceRule,
        anchor: Option<NaiveDate>,
        until: NaiveDate,
        exceptions: &BTreeSet<NaiveDate>,
    ) -> Result<usize, GenerateError> {
        let anchor = match anchor {
            Some(anchor) => anchor,
            None => return Ok(0),
        };

        let dates = self.try_generate(rule, Some(anchor), anchor, until)?;
        Ok(apply_exceptions(dates, exceptions).len())
    }

    pub fn count_occurrences(
        &self,
        rule: &RecurrenceRule,
        anchor: Option<NaiveDate>,
        until: NaiveDate,
        exceptions: &BTreeSet<NaiveDate>,
    ) -> usize {
        lenient(
            "count_occurrences",
            self.try_count_occurrences(rule, anchor, until, exceptions),
        )
    }

    /// Occurrence events of a recurring master inside the window, minus its exceptions.
    ///
    /// Masters that are not recurring, or carry no rule, have no occurrences.
    #[tracing::instrument(level = "debug", skip(self, master), fields(master = ?master.id))]
    pub fn try_expand_event(
        &self,
        master: &Event,
        range_start: NaiveDate,
        range_end: NaiveDate,
    ) -> Result<Vec<Event>, GenerateError> {
        let text = match (&master.rule, master.is_recurring) {
            (Some(text), true) => text,
            _ => return Ok(Vec::new()),
        };

        let rule: RecurrenceRule = text.parse()?;
        let dates = self.try_generate(&rule, Some(master.start_date), range_start, range_end)?;

        apply_exceptions(dates, &master.exception_dates)
            .into_iter()
            .map(|date| Event::occurrence(master, date))
            .collect()
    }

    pub fn expand_event(
        &self,
        master: &Event,
        range_start: NaiveDate,
        range_end: NaiveDate,
    ) -> Vec<Event> {
        lenient(
            "expand_event",
            self.try_expand_event(master, range_start, range_end),
        )
    }
}

/// Drops occurrences that fall on an exception date.
pub fn apply_exceptions(
    occurrences: impl IntoIterator<Item = NaiveDate>,
    exceptions: &BTreeSet<NaiveDate>,
) -> Vec<NaiveDate> {
    occurrences
        .into_iter()
        .filter(|date| !exceptions.contains(date))
        .collect()
}

fn lenient<T: Default>(operation: &'static str, result: Result<T, GenerateError>) -> T {
    result.unwrap_or_else(|error| {
        tracing::warn!(operation, %error, "Recurrence expansion failed");
        T::default()
    })
}
