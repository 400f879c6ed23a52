//! Julian calendar for the 1205 campaign: dates, weekdays, feasts and seasons.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{DAYS_IN_MONTH, DAYS_IN_YEAR, FEAST_DAYS, GAME_YEAR, MONTH_NAMES};
use crate::error::EngineError;

/// Day of the week, Monday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    const fn from_monday_index(index: i64) -> Self {
        match index {
            0 => Self::Monday,
            1 => Self::Tuesday,
            2 => Self::Wednesday,
            3 => Self::Thursday,
            4 => Self::Friday,
            5 => Self::Saturday,
            _ => Self::Sunday,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
            Self::Saturday => "Saturday",
            Self::Sunday => "Sunday",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Astronomical season.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    /// Classify a date. Each season starts on its boundary day (inclusive);
    /// anything not spring, summer or autumn is winter, which covers the
    /// Dec 21 - Mar 20 wraparound.
    #[must_use]
    pub const fn for_date(date: &Date) -> Self {
        match (date.month, date.day) {
            (3, 21..) | (4 | 5, _) | (6, ..=20) => Self::Spring,
            (6, 21..) | (7 | 8, _) | (9, ..=22) => Self::Summer,
            (9, 23..) | (10 | 11, _) | (12, ..=20) => Self::Autumn,
            _ => Self::Winter,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Spring => "spring",
            Self::Summer => "summer",
            Self::Autumn => "autumn",
            Self::Winter => "winter",
        }
    }

    const fn flavor_lines(self) -> [&'static str; 4] {
        match self {
            Self::Spring => [
                "The spring air is crisp and fresh.",
                "New growth appears on the trees.",
                "Rain showers pass through the countryside.",
                "The days grow longer and warmer.",
            ],
            Self::Summer => [
                "The summer sun beats down warmly.",
                "Long days perfect for travel and campaigning.",
                "Heat shimmers over the fields.",
                "The countryside is green and lush.",
            ],
            Self::Autumn => [
                "Autumn leaves fall in golden drifts.",
                "The harvest is being gathered in.",
                "Cool winds blow from the north.",
                "The days grow shorter and colder.",
            ],
            Self::Winter => [
                "Winter cold grips the land.",
                "Frost covers the ground each morning.",
                "Travel is difficult in the mud and cold.",
                "The nights are long and dark.",
            ],
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Season of `date`.
#[must_use]
pub const fn get_season(date: &Date) -> Season {
    Season::for_date(date)
}

/// Season-appropriate atmosphere line. The same date always yields the same line.
#[must_use]
pub fn weather_flavor(date: &Date) -> &'static str {
    let lines = date.season().flavor_lines();
    let idx = usize::try_from(date.day_of_year()).unwrap_or_default() % lines.len();
    lines[idx]
}

/// Number of days in `month` (1-12). February always has 28 days.
#[must_use]
pub fn days_in_month(month: u8) -> u8 {
    usize::from(month)
        .checked_sub(1)
        .and_then(|idx| DAYS_IN_MONTH.get(idx))
        .copied()
        .unwrap_or(0)
}

/// Plain `{year, month, day}` form used on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRecord {
    pub year: i32,
    pub month: i64,
    pub day: i64,
}

/// A validated calendar date.
///
/// `1 <= month <= 12` and `1 <= day <= days_in_month(month)` hold for every
/// value of this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "DateRecord")]
pub struct Date {
    year: i32,
    month: u8,
    day: u8,
}

impl Date {
    /// Build a date, rejecting out-of-range months and days.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidDate`] when the month or day is out of range.
    pub fn new(year: i32, month: u32, day: u32) -> Result<Self, EngineError> {
        let (month, day) = validate(i64::from(month), i64::from(day))?;
        Ok(Self { year, month, day })
    }

    /// New Year's Day of the campaign year.
    #[must_use]
    pub const fn campaign_start() -> Self {
        Self {
            year: GAME_YEAR,
            month: 1,
            day: 1,
        }
    }

    #[must_use]
    pub const fn year(&self) -> i32 {
        self.year
    }

    #[must_use]
    pub const fn month(&self) -> u8 {
        self.month
    }

    #[must_use]
    pub const fn day(&self) -> u8 {
        self.day
    }

    /// Move to another day of the same year. The date is untouched on error.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidDate`] when the month or day is out of range.
    pub fn set_month_day(&mut self, month: u32, day: u32) -> Result<(), EngineError> {
        let (month, day) = validate(i64::from(month), i64::from(day))?;
        self.month = month;
        self.day = day;
        Ok(())
    }

    /// Advance by one day, rolling over months and years.
    pub fn increment(&mut self) {
        self.day += 1;
        if self.day > days_in_month(self.month) {
            self.day = 1;
            self.month += 1;
            if self.month > 12 {
                self.month = 1;
                self.year = self.year.saturating_add(1);
            }
        }
    }

    /// Zeller's congruence, Julian variant.
    #[must_use]
    pub const fn day_of_week(&self) -> Weekday {
        let mut year = self.year as i64;
        let mut month = self.month as i64;
        if month < 3 {
            month += 12;
            year -= 1;
        }
        // h: 0 = Saturday, 1 = Sunday, ... 6 = Friday
        let h = (self.day as i64 + (13 * (month + 1)).div_euclid(5) + year + year.div_euclid(4) + 5)
            .rem_euclid(7);
        Weekday::from_monday_index((h + 5).rem_euclid(7))
    }

    /// Day number within the year, 1 (Jan 1) to 365 (Dec 31).
    #[must_use]
    pub fn day_of_year(&self) -> u32 {
        let preceding: u32 = DAYS_IN_MONTH
            .iter()
            .take(usize::from(self.month - 1))
            .map(|days| u32::from(*days))
            .sum();
        preceding + u32::from(self.day)
    }

    /// Days left in the year after today.
    #[must_use]
    pub fn days_remaining_in_year(&self) -> u32 {
        DAYS_IN_YEAR - self.day_of_year()
    }

    /// Name of the feast falling on this date, if any.
    #[must_use]
    pub fn is_feast_day(&self) -> Option<&'static str> {
        FEAST_DAYS
            .iter()
            .find(|(month, day, _)| *month == self.month && *day == self.day)
            .map(|(_, _, name)| *name)
    }

    #[must_use]
    pub const fn season(&self) -> Season {
        Season::for_date(self)
    }

    #[must_use]
    pub fn month_name(&self) -> &'static str {
        MONTH_NAMES[usize::from(self.month - 1)]
    }

    /// "Saturday, January 1, 1205"
    #[must_use]
    pub fn format_long(&self) -> String {
        format!(
            "{}, {} {}, {}",
            self.day_of_week(),
            self.month_name(),
            self.day,
            self.year
        )
    }

    /// "Day 152 - June 1, 1205"
    #[must_use]
    pub fn format_short(&self) -> String {
        format!(
            "Day {} - {} {}, {}",
            self.day_of_year(),
            self.month_name(),
            self.day,
            self.year
        )
    }

    #[must_use]
    pub const fn to_record(&self) -> DateRecord {
        DateRecord {
            year: self.year,
            month: self.month as i64,
            day: self.day as i64,
        }
    }
}

impl Default for Date {
    fn default() -> Self {
        Self::campaign_start()
    }
}

impl TryFrom<DateRecord> for Date {
    type Error = EngineError;

    fn try_from(record: DateRecord) -> Result<Self, Self::Error> {
        let (month, day) = validate(record.month, record.day)?;
        Ok(Self {
            year: record.year,
            month,
            day,
        })
    }
}

impl From<Date> for DateRecord {
    fn from(date: Date) -> Self {
        date.to_record()
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_short())
    }
}

fn validate(month: i64, day: i64) -> Result<(u8, u8), EngineError> {
    let invalid = EngineError::InvalidDate { month, day };
    let month_u8 = u8::try_from(month).map_err(|_| invalid.clone())?;
    if !(1..=12).contains(&month_u8) {
        return Err(invalid);
    }
    let day_u8 = u8::try_from(day).map_err(|_| invalid.clone())?;
    if day_u8 == 0 || day_u8 > days_in_month(month_u8) {
        return Err(invalid);
    }
    Ok((month_u8, day_u8))
}
