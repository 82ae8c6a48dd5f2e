//! Recurrence rules (`FREQ=WEEKLY;BYDAY=MO,WE`) and the occurrence dates they expand to.
//!
//! [`RecurrenceRule`] is parsed from and serialized to the RRULE text form through
//! [`std::str::FromStr`] and [`std::fmt::Display`]. A [`Generator`] expands a rule from an
//! anchor date into the ascending occurrence dates inside a query window.

use serde::{Deserialize, Serialize};
use std::fmt;

mod codec;
mod daily;
mod date_iterator;
pub mod describe;
mod error;
mod event;
pub mod generator;
pub mod legacy;
mod monthly;
mod rrule;
mod rule;
mod weekly;
mod yearly;

#[cfg(test)]
mod test_helpers;

pub use codec::validate;
pub use describe::{describe, describe_text, Localizer, NoLocalizer};
pub use error::{GenerateError, ParseError};
pub use event::Event;
pub use generator::{apply_exceptions, Generator, Options, DEFAULT_MAX_OCCURRENCES};
pub use rule::{RecurrenceRule, WeekdayNum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Frequency {
    Secondly,
    Minutely,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    pub const fn as_str(self) -> &'static str {
        match self {
            Frequency::Secondly => "SECONDLY",
            Frequency::Minutely => "MINUTELY",
            Frequency::Hourly => "HOURLY",
            Frequency::Daily => "DAILY",
            Frequency::Weekly => "WEEKLY",
            Frequency::Monthly => "MONTHLY",
            Frequency::Yearly => "YEARLY",
        }
    }

    /// Parses a `FREQ` value, ignoring case.
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s.trim().to_ascii_uppercase().as_str() {
            "SECONDLY" => Frequency::Secondly,
            "MINUTELY" => Frequency::Minutely,
            "HOURLY" => Frequency::Hourly,
            "DAILY" => Frequency::Daily,
            "WEEKLY" => Frequency::Weekly,
            "MONTHLY" => Frequency::Monthly,
            "YEARLY" => Frequency::Yearly,
            _ => return None,
        })
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_any_case() {
        assert_eq!(Frequency::parse("weekly"), Some(Frequency::Weekly));
        assert_eq!(Frequency::parse(" Yearly "), Some(Frequency::Yearly));
        assert_eq!(Frequency::parse("fortnightly"), None);
    }
}
