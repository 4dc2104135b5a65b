//! Typed lineup records shared by the parser, the schedule engine and the
//! stores.
//!
//! - `ClockTime`: a wall-clock `HH:MM` exactly as written in a listing
//! - `DayOrder`: canonical Thursday→Sunday ordering of day labels
//! - `Performance`: one act on one stage on one labelled day
//! - `NewPerformance`: loosely shaped input validated into a `Performance`

use std::fmt;
use std::str::FromStr;

use itertools::Itertools;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};

/// Wall-clock time in 24-hour `HH:MM` form.
///
/// Only the shape is checked (two digits, colon, two digits). Values such as
/// `25:70` are kept and compared by their digits; no calendar semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime
{
    hours: u8,
    minutes: u8,
}

/// Rejected clock time text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("`{0}` is not a zero-padded HH:MM time")]
pub struct ClockTimeError(pub String);

impl ClockTime
{
    /// Build from two-digit components; `None` if either exceeds 99.
    pub fn from_hm(
        hours: u8,
        minutes: u8,
    ) -> Option<Self>
    {
        (hours < 100 && minutes < 100).then_some(Self { hours, minutes })
    }

    pub fn hours(self) -> u8
    {
        self.hours
    }

    pub fn minutes(self) -> u8
    {
        self.minutes
    }

    /// `hours * 60 + minutes`, the unit of the overlap test.
    pub fn minutes_since_midnight(self) -> u32
    {
        u32::from(self.hours) * 60 + u32::from(self.minutes)
    }

    /// The time with its colon removed, read as a number ("22:15" → 2215).
    /// Used for lineup ordering.
    pub fn numeric(self) -> u32
    {
        u32::from(self.hours) * 100 + u32::from(self.minutes)
    }

    /// Minutes from `self` to `end`, or `None` when `end` is earlier
    /// (a set that runs past midnight).
    pub fn minutes_until(
        self,
        end: ClockTime,
    ) -> Option<u32>
    {
        end.minutes_since_midnight()
            .checked_sub(self.minutes_since_midnight())
    }
}

impl FromStr for ClockTime
{
    type Err = ClockTimeError;

    fn from_str(text: &str) -> Result<Self, Self::Err>
    {
        let bytes = text.as_bytes();
        let well_formed = bytes.len() == 5
            && bytes[2] == b':'
            && [0, 1, 3, 4]
                .iter()
                .all(|&i| bytes[i].is_ascii_digit());

        if !well_formed
        {
            return Err(ClockTimeError(text.to_owned()));
        }

        let digit = |i: usize| bytes[i] - b'0';
        Ok(Self { hours: digit(0) * 10 + digit(1), minutes: digit(3) * 10 + digit(4) })
    }
}

impl TryFrom<String> for ClockTime
{
    type Error = ClockTimeError;

    fn try_from(value: String) -> Result<Self, Self::Error>
    {
        value.parse()
    }
}

impl From<ClockTime> for String
{
    fn from(value: ClockTime) -> Self
    {
        value.to_string()
    }
}

impl fmt::Display for ClockTime
{
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result
    {
        write!(f, "{:02}:{:02}", self.hours, self.minutes)
    }
}

/// Canonical ordering of festival days, keyed on the weekday word that leads
/// a day label ("Friday 27 June" → "friday").
///
/// Labels whose weekday is not listed are "unknown" and sort before every
/// known day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayOrder
{
    weekdays: Vec<String>,
}

impl Default for DayOrder
{
    fn default() -> Self
    {
        Self::new(["Thursday", "Friday", "Saturday", "Sunday"])
    }
}

impl DayOrder
{
    pub fn new<I, S>(weekdays: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            weekdays: weekdays
                .into_iter()
                .map(|w| {
                    w.as_ref()
                        .trim()
                        .to_lowercase()
                })
                .filter(|w| !w.is_empty())
                .collect(),
        }
    }

    /// Position of the label's weekday in the ordering.
    pub fn index_of(
        &self,
        day: &str,
    ) -> Option<usize>
    {
        let weekday = day
            .split_whitespace()
            .next()?
            .to_lowercase();
        self.weekdays
            .iter()
            .position(|w| *w == weekday)
    }

    /// Sort key: 0 for unknown labels, then 1.. for the known weekdays.
    pub fn sort_key(
        &self,
        day: &str,
    ) -> usize
    {
        self.index_of(day)
            .map_or(0, |i| i + 1)
    }
}

/// One scheduled appearance of an artist on a stage during a labelled day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Performance
{
    /// Derived from stage, day, artist and start time; stable across re-parses.
    pub id: String,
    pub artist: String,
    pub stage: String,
    /// "<Weekday> <day-of-month> <Month>", the only day partition used.
    pub day: String,
    pub start_time: ClockTime,
    pub end_time: ClockTime,
    /// Minutes on stage; absent when the set crosses midnight.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    pub is_pictured: bool,
}

impl Performance
{
    pub fn new(
        stage: impl Into<String>,
        day: impl Into<String>,
        artist: impl Into<String>,
        start_time: ClockTime,
        end_time: ClockTime,
        is_pictured: bool,
    ) -> Self
    {
        let stage = stage.into();
        let day = day.into();
        let artist = artist.into();
        let id = performance_id(&stage, &day, &artist, start_time);

        Self {
            id,
            artist,
            stage,
            day,
            start_time,
            end_time,
            duration: start_time.minutes_until(end_time),
            is_pictured,
        }
    }

    /// `HH:MM - HH:MM`
    pub fn time_range(&self) -> String
    {
        format!("{} - {}", self.start_time, self.end_time)
    }
}

/// Lowercased `stage-day-artist-start` with every whitespace run collapsed to
/// a single hyphen. Pure, so persisted selections survive re-parsing.
pub fn performance_id(
    stage: &str,
    day: &str,
    artist: &str,
    start_time: ClockTime,
) -> String
{
    format!("{stage}-{day}-{artist}-{start_time}")
        .split_whitespace()
        .join("-")
        .to_lowercase()
}

/// Performance payload as received from a store or an API caller, before
/// validation. `name` is accepted as an alias of `artist`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPerformance
{
    #[serde(alias = "name")]
    pub artist: Option<String>,
    pub stage: Option<String>,
    pub day: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub duration: Option<u32>,
    #[serde(default)]
    pub is_pictured: bool,
}

/// Record validation failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Diagnostic)]
pub enum ValidationError
{
    #[error("missing required field `{0}`")]
    #[diagnostic(
        code(lineup::missing_field),
        help("a performance needs artist, stage, day, startTime and endTime")
    )]
    MissingField(&'static str),

    #[error("invalid `{field}`: {source}")]
    #[diagnostic(code(lineup::invalid_time), help("write times as 24-hour HH:MM, e.g. 09:30"))]
    InvalidTime
    {
        field: &'static str,
        #[source]
        source: ClockTimeError,
    },

    #[error("declared duration {declared}m does not match the {computed}m between start and end")]
    #[diagnostic(code(lineup::duration_mismatch))]
    DurationMismatch
    {
        declared: u32,
        computed: u32,
    },

    #[error("performance `{0}` already exists")]
    #[diagnostic(code(lineup::duplicate))]
    Duplicate(String),

    #[error("no performance record with id {0}")]
    #[diagnostic(code(lineup::unknown_record))]
    UnknownRecord(u64),
}

fn required(
    field: &'static str,
    value: Option<String>,
) -> Result<String, ValidationError>
{
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
        .ok_or(ValidationError::MissingField(field))
}

fn required_time(
    field: &'static str,
    value: Option<String>,
) -> Result<ClockTime, ValidationError>
{
    required(field, value)?
        .parse()
        .map_err(|source| ValidationError::InvalidTime { field, source })
}

impl TryFrom<NewPerformance> for Performance
{
    type Error = ValidationError;

    fn try_from(input: NewPerformance) -> Result<Self, Self::Error>
    {
        let artist = required("artist", input.artist)?;
        let stage = required("stage", input.stage)?;
        let day = required("day", input.day)?;
        let start = required_time("startTime", input.start_time)?;
        let end = required_time("endTime", input.end_time)?;

        let performance = Performance::new(stage, day, artist, start, end, input.is_pictured);

        match (input.duration, performance.duration)
        {
            (Some(declared), Some(computed)) if declared != computed =>
            {
                Err(ValidationError::DurationMismatch { declared, computed })
            }
            // Overnight sets have no computed duration; trust the caller.
            (Some(declared), None) => Ok(Performance { duration: Some(declared), ..performance }),
            _ => Ok(performance),
        }
    }
}
