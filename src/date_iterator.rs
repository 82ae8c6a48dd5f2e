use chrono::NaiveDate;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum End {
    Until(NaiveDate),
    Count(u64),
    Never,
}

/// Ends a series of ascending dates once its count is spent or a date passes `until`.
///
/// A rule that (invalidly) carries both limits stops at whichever comes first.
pub struct SeriesIterator<I> {
    pub ends: [End; 2],
    pub dates: I,
}

impl<I> SeriesIterator<I> {
    pub fn new(dates: I, count: Option<u64>, until: Option<NaiveDate>) -> Self {
        SeriesIterator {
            ends: [
                count.map_or(End::Never, End::Count),
                until.map_or(End::Never, End::Until),
            ],
            dates,
        }
    }

    fn finish(&mut self) {
        self.ends = [End::Count(0), End::Never];
    }
}

impl<I: Iterator<Item = NaiveDate>> Iterator for SeriesIterator<I> {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        if self.ends.contains(&End::Count(0)) {
            return None;
        }

        let date = match self.dates.next() {
            Some(date) => date,
            None => {
                self.finish();
                return None;
            }
        };

        let past_until = self
            .ends
            .iter()
            .any(|end| matches!(end, End::Until(until) if *until < date));
        if past_until {
            self.finish();
            return None;
        }

        for end in self.ends.iter_mut() {
            if let End::Count(count) = end {
                *count -= 1;
            }
        }

        Some(date)
    }
}
