//! Plain-text lineup parser.
//!
//! Grammar (one item per trimmed, non-empty line):
//! - header: `<Stage> - <Weekday> <D> <Month>` sets the stage/day context
//! - row: `<Artist>: HH:MM - HH:MM<annotation>` emits one `Performance`
//! - anything else is skipped
//!
//! The parse never fails. Rows before the first header and lines written with
//! an en-dash are dropped and recorded in the `ParseReport`.

use std::collections::HashSet;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::{debug, instrument, trace};

use crate::core::performance::{ClockTime, DayOrder, Performance};

static HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(.*?)\s*-\s*((?:thursday|friday|saturday|sunday)\s+[0-9]{1,2}\s+(?:january|february|march|april|may|june|july|august|september|october|november|december))$",
    )
    .expect("header pattern compiles")
});

/// Weekdays a header can name; must stay in step with `HEADER`.
pub const HEADER_WEEKDAYS: [&str; 4] = ["thursday", "friday", "saturday", "sunday"];

static ROW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+?):\s*([0-9]{2}:[0-9]{2})\s*-\s*([0-9]{2}:[0-9]{2})(.*)$")
        .expect("row pattern compiles")
});

/// Marker in a row's trailing annotation flagging a pictured act.
pub const DEFAULT_PICTURED_MARKER: &str = "(pictured)";

/// Why a line produced no performance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason
{
    /// Neither a header nor a row.
    Unrecognized,
    /// Row-shaped, but no header with a stage and day came before it.
    BeforeHeader,
    /// Row identical in stage, day, artist and start to an earlier one.
    Duplicate,
}

impl fmt::Display for SkipReason
{
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result
    {
        match self
        {
            SkipReason::Unrecognized => write!(f, "not a header or performance"),
            SkipReason::BeforeHeader => write!(f, "before any stage/day header"),
            SkipReason::Duplicate => write!(f, "duplicate performance"),
        }
    }
}

/// A dropped input line (1-based line number in the raw text).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedLine
{
    pub line: usize,
    pub text: String,
    pub reason: SkipReason,
}

/// Parsed lineup plus everything that was dropped along the way.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ParseReport
{
    pub performances: Vec<Performance>,
    pub skipped: Vec<SkippedLine>,
}

/// Line classification, in priority order.
enum Line<'a>
{
    Header
    {
        stage: &'a str,
        day: &'a str,
    },
    Row
    {
        artist: &'a str,
        start: ClockTime,
        end: ClockTime,
        annotation: &'a str,
    },
    Other,
}

fn classify(line: &str) -> Line<'_>
{
    if let Some(caps) = HEADER.captures(line)
    {
        return Line::Header {
            stage: caps
                .get(1)
                .map_or("", |m| m.as_str()),
            day: caps
                .get(2)
                .map_or("", |m| m.as_str()),
        };
    }

    let Some(caps) = ROW.captures(line)
    else
    {
        return Line::Other;
    };

    let artist = caps
        .get(1)
        .map_or("", |m| m.as_str())
        .trim();
    let start = caps
        .get(2)
        .and_then(|m| {
            m.as_str()
                .parse()
                .ok()
        });
    let end = caps
        .get(3)
        .and_then(|m| {
            m.as_str()
                .parse()
                .ok()
        });

    match (start, end)
    {
        (Some(start), Some(end)) if !artist.is_empty() => Line::Row {
            artist,
            start,
            end,
            annotation: caps
                .get(4)
                .map_or("", |m| m.as_str()),
        },
        _ => Line::Other,
    }
}

/// Configurable single-pass lineup parser.
#[derive(Debug, Clone)]
pub struct LineupParser
{
    title_line: Option<String>,
    pictured_marker: String,
    day_order: DayOrder,
}

impl Default for LineupParser
{
    fn default() -> Self
    {
        Self {
            title_line: None,
            pictured_marker: DEFAULT_PICTURED_MARKER.to_string(),
            day_order: DayOrder::default(),
        }
    }
}

impl LineupParser
{
    pub fn new() -> Self
    {
        Self::default()
    }

    /// Discard a line equal to `title` (after trimming) without reporting it.
    pub fn with_title_line(
        mut self,
        title: impl Into<String>,
    ) -> Self
    {
        let title = title
            .into()
            .trim()
            .to_string();
        self.title_line = (!title.is_empty()).then_some(title);
        self
    }

    /// Empty markers are ignored; nothing would ever be unpictured.
    pub fn with_pictured_marker(
        mut self,
        marker: impl Into<String>,
    ) -> Self
    {
        let marker = marker.into();
        if !marker.is_empty()
        {
            self.pictured_marker = marker;
        }
        self
    }

    pub fn with_day_order(
        mut self,
        day_order: DayOrder,
    ) -> Self
    {
        self.day_order = day_order;
        self
    }

    pub fn day_order(&self) -> &DayOrder
    {
        &self.day_order
    }

    /// Parse and return only the ordered performances.
    pub fn parse(
        &self,
        text: &str,
    ) -> Vec<Performance>
    {
        self.parse_with_report(text)
            .performances
    }

    /// Parse, keeping a record of every skipped line.
    #[instrument(level = "debug", skip_all, fields(bytes = text.len()))]
    pub fn parse_with_report(
        &self,
        text: &str,
    ) -> ParseReport
    {
        let mut report = ParseReport::default();
        let mut seen: HashSet<String> = HashSet::new();

        // Context from the most recent header
        let mut current_stage: Option<String> = None;
        let mut current_day: Option<String> = None;

        for (idx, raw) in text
            .lines()
            .enumerate()
        {
            let line = raw.trim();
            if line.is_empty()
                || self
                    .title_line
                    .as_deref()
                    == Some(line)
            {
                continue;
            }

            let mut skip = |reason: SkipReason| {
                trace!(line = idx + 1, ?reason, text = line, "skipping line");
                report
                    .skipped
                    .push(SkippedLine { line: idx + 1, text: line.to_string(), reason });
            };

            match classify(line)
            {
                Line::Header { stage, day } =>
                {
                    // An empty stage leaves no usable context for following rows
                    let stage = stage.trim();
                    current_stage = (!stage.is_empty()).then(|| stage.to_string());
                    current_day = Some(
                        day.trim()
                            .to_string(),
                    );
                    trace!(stage, day, "header");
                }

                Line::Row { artist, start, end, annotation } =>
                {
                    let (Some(stage), Some(day)) = (current_stage.as_deref(), current_day.as_deref())
                    else
                    {
                        skip(SkipReason::BeforeHeader);
                        continue;
                    };

                    let pictured = annotation.contains(self.pictured_marker.as_str());
                    let performance = Performance::new(stage, day, artist, start, end, pictured);

                    if !seen.insert(
                        performance
                            .id
                            .clone(),
                    )
                    {
                        skip(SkipReason::Duplicate);
                        continue;
                    }

                    report
                        .performances
                        .push(performance);
                }

                Line::Other => skip(SkipReason::Unrecognized),
            }
        }

        sort_lineup(&mut report.performances, &self.day_order);

        debug!(
            performances = report
                .performances
                .len(),
            skipped = report
                .skipped
                .len(),
            "parsed lineup"
        );

        report
    }
}

/// Parse with the default parser settings.
pub fn parse(text: &str) -> Vec<Performance>
{
    LineupParser::default().parse(text)
}

/// Stable sort by (day index, numeric start, stage name).
///
/// Unknown days sort first, and "02:00" sorts before "22:15" on the same
/// label even though it happens later that night. Both are long-standing
/// behaviour of the lineup ordering.
pub fn sort_lineup(
    performances: &mut [Performance],
    day_order: &DayOrder,
)
{
    performances.sort_by(|a, b| {
        day_order
            .sort_key(&a.day)
            .cmp(&day_order.sort_key(&b.day))
            .then_with(|| {
                a.start_time
                    .numeric()
                    .cmp(
                        &b.start_time
                            .numeric(),
                    )
            })
            .then_with(|| {
                a.stage
                    .cmp(&b.stage)
            })
    });
}

#[cfg(test)]
mod tests
{
    use super::*;

    const SAMPLE: &str = "Glastonbury 2025

Pyramid Stage - Friday 27 June
Biffy Clyro: 20:15 - 21:25
Supergrass: 12:00 - 13:00 (pictured)
Burning Spear - 15:00 - 16:00
Other Stage - Friday 27 June
Wet Leg: 15:45 - 16:45
Arcadia - Friday 27 June
Romy: 01:00 - 02:00
Levels - Thursday 26 June
Peach B2B Club Fitness: 18:00 - 19:30
Leftfield Stage - Saturday 28 June
Panel: Confronting The Rise Of The Far Right: 12:00 – 13:00
Kate Nash: 21:00 - 22:00
";

    #[test]
    fn canonical_header_and_row()
    {
        let performances = parse("Pyramid Stage - Friday 27 June\nSupergrass: 12:00 - 13:00\n");
        assert_eq!(performances.len(), 1);

        let p = &performances[0];
        assert_eq!(p.stage, "Pyramid Stage");
        assert_eq!(p.day, "Friday 27 June");
        assert_eq!(p.artist, "Supergrass");
        assert_eq!(p.start_time.to_string(), "12:00");
        assert_eq!(p.end_time.to_string(), "13:00");
        assert!(!p.is_pictured);
        assert_eq!(p.id, "pyramid-stage-friday-27-june-supergrass-12:00");
    }

    #[test]
    fn rows_before_any_header_are_dropped()
    {
        let report = LineupParser::new().parse_with_report(
            "Supergrass: 12:00 - 13:00\nPyramid Stage - Friday 27 June\nCMAT: 13:30 - 14:30\n",
        );
        assert_eq!(report.performances.len(), 1);
        assert_eq!(report.performances[0].artist, "CMAT");
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].line, 1);
        assert_eq!(report.skipped[0].reason, SkipReason::BeforeHeader);
    }

    #[test]
    fn empty_input_yields_nothing()
    {
        assert!(parse("").is_empty());
        assert!(parse("\n   \n\t\n").is_empty());
    }

    #[test]
    fn sample_is_sorted_by_day_then_numeric_start_then_stage()
    {
        let artists: Vec<_> = parse(SAMPLE)
            .into_iter()
            .map(|p| p.artist)
            .collect();

        // Thursday first; on Friday "01:00" sorts before midday
        assert_eq!(
            artists,
            ["Peach B2B Club Fitness", "Romy", "Supergrass", "Wet Leg", "Biffy Clyro", "Kate Nash"]
        );
    }

    #[test]
    fn pictured_marker_and_unrecognized_lines()
    {
        let report = LineupParser::new()
            .with_title_line("Glastonbury 2025")
            .parse_with_report(SAMPLE);

        let supergrass = report
            .performances
            .iter()
            .find(|p| p.artist == "Supergrass")
            .unwrap();
        assert!(supergrass.is_pictured);

        let skipped: Vec<_> = report
            .skipped
            .iter()
            .map(|s| s.text.as_str())
            .collect();
        assert_eq!(
            skipped,
            [
                "Burning Spear - 15:00 - 16:00",
                "Panel: Confronting The Rise Of The Far Right: 12:00 – 13:00"
            ]
        );
        assert!(
            report
                .skipped
                .iter()
                .all(|s| s.reason == SkipReason::Unrecognized)
        );
    }

    #[test]
    fn title_line_is_reported_when_not_configured()
    {
        let report = LineupParser::new().parse_with_report(SAMPLE);
        assert_eq!(report.skipped[0].text, "Glastonbury 2025");
    }

    #[test]
    fn artist_names_containing_colons_extend_to_the_time()
    {
        let performances = parse(
            "Acoustic Stage - Saturday 28 June\n\
             Not Completely Unknown: A Celebration Of The Songs Of Bob Dylan: 15:00 - 16:00\n",
        );
        assert_eq!(
            performances[0].artist,
            "Not Completely Unknown: A Celebration Of The Songs Of Bob Dylan"
        );
    }

    #[test]
    fn hyphenated_stage_names_and_case_insensitive_headers()
    {
        let performances = parse("Hard-Fi Tent - SATURDAY 28 june\nHard-Fi: 23:10 - 00:20\n");
        assert_eq!(performances[0].stage, "Hard-Fi Tent");
        assert_eq!(performances[0].day, "SATURDAY 28 june");
        assert_eq!(performances[0].duration, None);
    }

    #[test]
    fn header_without_stage_clears_context()
    {
        let report = LineupParser::new()
            .parse_with_report("Park - Friday 27 June\nOsees: 18:00 - 19:00\n- Saturday 28 June\nCaribou: 23:00 - 00:15\n");
        assert_eq!(report.performances.len(), 1);
        assert_eq!(report.skipped[0].reason, SkipReason::BeforeHeader);
    }

    #[test]
    fn duplicate_rows_keep_the_first()
    {
        let report = LineupParser::new().parse_with_report(
            "Park - Friday 27 June\nOsees: 18:00 - 19:00\nOsees: 18:00 - 19:30\n",
        );
        assert_eq!(report.performances.len(), 1);
        assert_eq!(report.performances[0].end_time.to_string(), "19:00");
        assert_eq!(report.skipped[0].reason, SkipReason::Duplicate);
    }

    #[test]
    fn custom_marker_and_day_order()
    {
        let parser = LineupParser::new()
            .with_pictured_marker("[photo]")
            .with_day_order(DayOrder::new(["Sunday", "Saturday"]));

        let performances = parser.parse(
            "Park - Saturday 28 June\nA: 12:00 - 13:00 [photo]\nPark - Sunday 29 June\nB: 12:00 - 13:00\nPark - Friday 27 June\nC: 12:00 - 13:00\n",
        );
        let order: Vec<_> = performances
            .iter()
            .map(|p| p.artist.as_str())
            .collect();
        assert_eq!(order, ["C", "B", "A"]);
        assert!(performances[2].is_pictured);
    }

    #[test]
    fn header_accepts_exactly_the_listed_weekdays()
    {
        for weekday in HEADER_WEEKDAYS
        {
            assert!(HEADER.is_match(&format!("Park - {weekday} 27 June")), "{weekday}");
        }
        assert!(!HEADER.is_match("Park - Monday 30 June"));
        assert!(!HEADER.is_match("Park - Wednesday 25 June"));
    }

    #[test]
    fn crlf_input_is_handled()
    {
        let performances = parse("Park - Friday 27 June\r\nOsees: 18:00 - 19:00\r\n");
        assert_eq!(performances.len(), 1);
        assert_eq!(performances[0].end_time.to_string(), "19:00");
    }
}
