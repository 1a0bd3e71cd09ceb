// ── Calendar month value type ──

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A calendar month, written `YYYY-MM` on the wire and in filenames.
///
/// Always valid once constructed; the first day of the month is stored so
/// day iteration never has to re-check bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Month {
    first: NaiveDate,
}

impl Month {
    pub fn new(year: i32, month: u32) -> Result<Self, CoreError> {
        if !(1..=9999).contains(&year) {
            return Err(CoreError::InvalidMonth {
                value: format!("{year}-{month:02}"),
            });
        }
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(|first| Self { first })
            .ok_or_else(|| CoreError::InvalidMonth {
                value: format!("{year:04}-{month:02}"),
            })
    }

    /// The month containing `date`.
    pub fn of(date: NaiveDate) -> Self {
        Self {
            first: date.with_day(1).unwrap_or(date),
        }
    }

    /// The current month in UTC.
    pub fn current() -> Self {
        Self::of(Utc::now().date_naive())
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    pub fn month(&self) -> u32 {
        self.first.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    pub fn days_in_month(&self) -> u32 {
        match self.month() {
            2 if is_leap_year(self.year()) => 29,
            2 => 28,
            4 | 6 | 9 | 11 => 30,
            _ => 31,
        }
    }

    /// Every day of the month, ascending.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        let len = usize::try_from(self.days_in_month()).unwrap_or(31);
        self.first.iter_days().take(len)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year() && date.month() == self.month()
    }

    pub fn prev(&self) -> Option<Self> {
        match self.month() {
            1 => Self::new(self.year() - 1, 12).ok(),
            m => Self::new(self.year(), m - 1).ok(),
        }
    }

    pub fn next(&self) -> Option<Self> {
        match self.month() {
            12 => Self::new(self.year() + 1, 1).ok(),
            m => Self::new(self.year(), m + 1).ok(),
        }
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for Month {
    type Err = CoreError;

    /// Strict `YYYY-MM`: four-digit year, two-digit month.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CoreError::InvalidMonth { value: s.to_owned() };

        let (year, month) = s.split_once('-').ok_or_else(invalid)?;
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if year.len() != 4 || month.len() != 2 || !all_digits(year) || !all_digits(month) {
            return Err(invalid());
        }

        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month).map_err(|_| invalid())
    }
}

impl TryFrom<String> for Month {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Month> for String {
    fn from(month: Month) -> Self {
        month.to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_displays() {
        let m: Month = "2024-01".parse().unwrap();
        assert_eq!(m.year(), 2024);
        assert_eq!(m.month(), 1);
        assert_eq!(m.to_string(), "2024-01");
    }

    #[test]
    fn rejects_malformed_input() {
        for bad in ["2024-1", "24-01", "2024-13", "2024-00", "2024/01", "2024-01-01", "", "abcd-ef"] {
            assert!(bad.parse::<Month>().is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn days_cover_whole_month() {
        let feb_leap: Month = "2024-02".parse().unwrap();
        let feb: Month = "2023-02".parse().unwrap();
        let apr: Month = "2024-04".parse().unwrap();
        let dec: Month = "1900-12".parse().unwrap();

        assert_eq!(feb_leap.days().count(), 29);
        assert_eq!(feb.days().count(), 28);
        assert_eq!(apr.days().count(), 30);
        assert_eq!(dec.days().count(), 31);
        assert!(!is_leap_year(1900));
        assert!(is_leap_year(2000));

        let days: Vec<_> = feb_leap.days().collect();
        assert_eq!(days.first().unwrap().to_string(), "2024-02-01");
        assert_eq!(days.last().unwrap().to_string(), "2024-02-29");
        assert!(days.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn prev_and_next_wrap_years() {
        let jan: Month = "2024-01".parse().unwrap();
        assert_eq!(jan.prev().unwrap().to_string(), "2023-12");
        assert_eq!(jan.next().unwrap().to_string(), "2024-02");
        let dec: Month = "2024-12".parse().unwrap();
        assert_eq!(dec.next().unwrap().to_string(), "2025-01");
    }

    #[test]
    fn contains_checks_year_and_month() {
        let jan: Month = "2024-01".parse().unwrap();
        assert!(jan.contains(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()));
        assert!(!jan.contains(NaiveDate::from_ymd_opt(2023, 1, 31).unwrap()));
        assert!(!jan.contains(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()));
    }

    #[test]
    fn serde_uses_string_form() {
        let m: Month = serde_json::from_str("\"2024-03\"").unwrap();
        assert_eq!(serde_json::to_string(&m).unwrap(), "\"2024-03\"");
        assert!(serde_json::from_str::<Month>("\"March\"").is_err());
    }
}
