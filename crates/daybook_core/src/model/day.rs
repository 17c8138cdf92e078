//! Calendar day model.
//!
//! # Responsibility
//! - Represent one addressable day of the fictional calendar.
//! - Validate raw `(year, season, number)` input and compute the next day.
//!
//! # Invariants
//! - `year >= 1`, `1 <= number <= DAYS_PER_SEASON`.
//! - Seasons cycle spring -> summer -> autumn -> winter -> spring; leaving
//!   winter increments the year.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Number of days in every season.
pub const DAYS_PER_SEASON: u8 = 28;

/// Store-assigned day identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DayId(pub i64);

impl Display for DayId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Season of the calendar year, in fixed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    /// All seasons in calendar order.
    pub const ALL: [Season; 4] = [
        Season::Spring,
        Season::Summer,
        Season::Autumn,
        Season::Winter,
    ];

    /// Storage and wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Spring => "spring",
            Self::Summer => "summer",
            Self::Autumn => "autumn",
            Self::Winter => "winter",
        }
    }

    /// Parses a season name, ignoring surrounding whitespace and ASCII case.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "spring" => Some(Self::Spring),
            "summer" => Some(Self::Summer),
            "autumn" => Some(Self::Autumn),
            "winter" => Some(Self::Winter),
            _ => None,
        }
    }

    /// Next season in cyclic order.
    pub fn next(self) -> Self {
        match self {
            Self::Spring => Self::Summer,
            Self::Summer => Self::Autumn,
            Self::Autumn => Self::Winter,
            Self::Winter => Self::Spring,
        }
    }
}

impl Display for Season {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Season {
    type Err = DayValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value).ok_or_else(|| DayValidationError::UnknownSeason(value.to_string()))
    }
}

/// Reason a `(year, season, number)` triple was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DayValidationError {
    /// Year is zero or negative.
    NonPositiveYear(i64),
    /// Year does not fit the supported range.
    YearOutOfRange(i64),
    /// Season name is not one of the four seasons.
    UnknownSeason(String),
    /// Day number is outside `1..=DAYS_PER_SEASON`.
    NumberOutOfRange(i64),
}

impl Display for DayValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonPositiveYear(year) => {
                write!(f, "year must be a positive integer, got {year}")
            }
            Self::YearOutOfRange(year) => write!(f, "year {year} is out of supported range"),
            Self::UnknownSeason(season) => write!(
                f,
                "season must be spring, summer, autumn or winter, got `{season}`"
            ),
            Self::NumberOutOfRange(number) => write!(
                f,
                "day number must be between 1 and {DAYS_PER_SEASON}, got {number}"
            ),
        }
    }
}

impl Error for DayValidationError {}

/// Validated position of a day in the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CalendarDate {
    pub year: u32,
    pub season: Season,
    pub number: u8,
}

impl CalendarDate {
    /// First day of the calendar; the seeded active day of a fresh database.
    pub const FIRST: CalendarDate = CalendarDate {
        year: 1,
        season: Season::Spring,
        number: 1,
    };

    /// Validates raw caller input.
    ///
    /// Checks run in the order year, season, number; the first failure wins.
    pub fn parse(year: i64, season: &str, number: i64) -> Result<Self, DayValidationError> {
        let year = validate_year(year)?;
        let season = season.parse::<Season>()?;
        let number = validate_number(number)?;
        Ok(Self {
            year,
            season,
            number,
        })
    }

    /// Validates already-typed parts.
    pub fn new(year: u32, season: Season, number: u8) -> Result<Self, DayValidationError> {
        let year = validate_year(i64::from(year))?;
        let number = validate_number(i64::from(number))?;
        Ok(Self {
            year,
            season,
            number,
        })
    }

    /// Returns the day after `self`.
    ///
    /// Day 28 rolls over to day 1 of the next season; winter rolls over to
    /// spring of the next year.
    pub fn successor(&self) -> Result<Self, DayValidationError> {
        if self.number < DAYS_PER_SEASON {
            return Ok(Self {
                number: self.number + 1,
                ..*self
            });
        }

        let season = self.season.next();
        let year = if season == Season::Spring {
            self.year
                .checked_add(1)
                .ok_or(DayValidationError::YearOutOfRange(i64::from(self.year) + 1))?
        } else {
            self.year
        };
        Ok(Self {
            year,
            season,
            number: 1,
        })
    }
}

impl Display for CalendarDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "year {} {} day {}", self.year, self.season, self.number)
    }
}

/// Persisted day record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Day {
    pub id: DayId,
    #[serde(flatten)]
    pub date: CalendarDate,
    pub active: bool,
}

fn validate_year(year: i64) -> Result<u32, DayValidationError> {
    if year <= 0 {
        return Err(DayValidationError::NonPositiveYear(year));
    }
    u32::try_from(year).map_err(|_| DayValidationError::YearOutOfRange(year))
}

fn validate_number(number: i64) -> Result<u8, DayValidationError> {
    if !(1..=i64::from(DAYS_PER_SEASON)).contains(&number) {
        return Err(DayValidationError::NumberOutOfRange(number));
    }
    u8::try_from(number).map_err(|_| DayValidationError::NumberOutOfRange(number))
}
