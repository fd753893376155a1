//! ISO-8601 week keys
//!
//! Every expense is attributed to a `(year, week)` pair. The week containing a
//! date's Thursday decides both numbers, so the first days of January can
//! belong to the previous year's last week and the last days of December to
//! the next year's week 1.

use chrono::{DateTime, Datelike, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Week number after which carry-over targets wrap into the next year.
///
/// ISO years with 53 weeks are not accounted for here.
pub const CARRY_OVER_WRAP_WEEK: u32 = 52;

/// An ISO week, ordered by year then week
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WeekKey {
    pub year: i32,
    pub week: u32,
}

impl WeekKey {
    /// Create a key, checking that the week exists in that ISO year
    pub fn new(year: i32, week: u32) -> Result<Self> {
        if !(1..=53).contains(&week) {
            return Err(Error::Validation(format!(
                "Week number must be between 1 and 53, got {}",
                week
            )));
        }
        if week > weeks_in_year(year) {
            return Err(Error::Validation(format!(
                "ISO year {} has no week {}",
                year, week
            )));
        }
        let key = Self { year, week };
        if key.first_day().is_none() || key.last_day().is_none() {
            return Err(Error::Validation(format!("Year {} is out of range", year)));
        }
        Ok(key)
    }

    /// Monday of this week
    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_isoywd_opt(self.year, self.week, Weekday::Mon)
    }

    /// Sunday of this week
    pub fn last_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_isoywd_opt(self.year, self.week, Weekday::Sun)
    }

    /// Whether `date` falls inside this week
    pub fn contains(&self, date: NaiveDate) -> bool {
        week_key_of(date) == *self
    }

    /// The week a deficit from this week is carried into.
    ///
    /// Assumes 52-week years: week 52 (and 53) roll over to week 1 of the
    /// following year. `None` when the year cannot be incremented.
    pub fn carry_over_target(&self) -> Option<Self> {
        if self.week >= CARRY_OVER_WRAP_WEEK {
            Some(Self {
                year: self.year.checked_add(1)?,
                week: 1,
            })
        } else {
            Some(Self {
                year: self.year,
                week: self.week + 1,
            })
        }
    }

    /// The following ISO week, `None` past the last representable year
    pub fn succ(&self) -> Option<Self> {
        if self.week >= weeks_in_year(self.year) {
            Some(Self {
                year: self.year.checked_add(1)?,
                week: 1,
            })
        } else {
            Some(Self {
                year: self.year,
                week: self.week + 1,
            })
        }
    }

    /// The last ISO week of `year`
    pub fn last_of_year(year: i32) -> Self {
        Self {
            year,
            week: weeks_in_year(year),
        }
    }
}

impl std::fmt::Display for WeekKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{:02}", self.year, self.week)
    }
}

impl std::str::FromStr for WeekKey {
    type Err = Error;

    /// Accepts `2024-05`, `2024-5` and `2024-W05`
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::Validation(format!("Invalid week '{}' (expected YYYY-WW)", s));

        let (year, week) = s.trim().split_once('-').ok_or_else(invalid)?;
        let week = week.strip_prefix(['W', 'w']).unwrap_or(week);

        let year: i32 = year.parse().map_err(|_| invalid())?;
        let week: u32 = week.parse().map_err(|_| invalid())?;

        Self::new(year, week)
    }
}

/// Number of ISO weeks in `year` (52 or 53)
pub fn weeks_in_year(year: i32) -> u32 {
    if NaiveDate::from_isoywd_opt(year, 53, Weekday::Mon).is_some() {
        53
    } else {
        52
    }
}

/// Last year offered by the week selector
pub const SELECTOR_LAST_YEAR: i32 = 2030;

/// Most entries the week selector returns at once
pub const MAX_SELECTOR_WEEKS: usize = 1000;

/// A selectable week with its Monday to Sunday range
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekRange {
    pub year: i32,
    pub week: u32,
    pub key: String,
    pub starts_on: NaiveDate,
    pub ends_on: NaiveDate,
}

/// Weeks from `from` through `to` for the week selector.
///
/// Defaults to week 1 of the current year through the last week of
/// [`SELECTOR_LAST_YEAR`]. Fails when the range holds more than
/// [`MAX_SELECTOR_WEEKS`] weeks.
pub fn week_selector(from: Option<WeekKey>, to: Option<WeekKey>) -> Result<Vec<WeekRange>> {
    let from = from.unwrap_or(WeekKey {
        year: current_week().year,
        week: 1,
    });
    let to = to.unwrap_or_else(|| WeekKey::last_of_year(SELECTOR_LAST_YEAR));

    let weeks = walk_weeks(from, to, MAX_SELECTOR_WEEKS + 1);
    if weeks.len() > MAX_SELECTOR_WEEKS {
        return Err(Error::Validation(format!(
            "Week range {} to {} exceeds {} weeks",
            from, to, MAX_SELECTOR_WEEKS
        )));
    }

    Ok(weeks
        .into_iter()
        .filter_map(|key| {
            Some(WeekRange {
                year: key.year,
                week: key.week,
                key: key.to_string(),
                starts_on: key.first_day()?,
                ends_on: key.last_day()?,
            })
        })
        .collect())
}

/// ISO week key of a calendar date
pub fn week_key_of(date: NaiveDate) -> WeekKey {
    let iso = date.iso_week();
    WeekKey {
        year: iso.year(),
        week: iso.week(),
    }
}

/// ISO week key of a UTC instant
pub fn week_key_of_instant(at: DateTime<Utc>) -> WeekKey {
    week_key_of(at.date_naive())
}

/// The week containing today (UTC)
pub fn current_week() -> WeekKey {
    week_key_of_instant(Utc::now())
}

/// All weeks from `from` to `to`, both inclusive
pub fn weeks_between(from: WeekKey, to: WeekKey) -> Vec<WeekKey> {
    walk_weeks(from, to, usize::MAX)
}

/// Weeks from `from` to `to`, stopping after `limit` entries
fn walk_weeks(from: WeekKey, to: WeekKey, limit: usize) -> Vec<WeekKey> {
    let mut weeks = Vec::new();
    let mut cursor = Some(from);
    while let Some(week) = cursor {
        if week > to || weeks.len() == limit {
            break;
        }
        weeks.push(week);
        cursor = week.succ();
    }
    weeks
}
