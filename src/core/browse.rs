//! Browse-side helpers: search and filters, "playing now", distinct stage
//! and day listings, duration labels.

use indexmap::IndexSet;

use crate::core::performance::{ClockTime, DayOrder, Performance};

/// Lineup filter. All set criteria must match.
#[derive(Debug, Clone, Default)]
pub struct Filter
{
    /// Case-insensitive substring of the artist or the stage.
    pub query: Option<String>,
    /// Case-insensitive substring of the day label ("fri", "28 june").
    pub day: Option<String>,
    /// Exact stage label.
    pub stage: Option<String>,
}

impl Filter
{
    pub fn is_empty(&self) -> bool
    {
        self.query
            .is_none()
            && self
                .day
                .is_none()
            && self
                .stage
                .is_none()
    }

    pub fn matches(
        &self,
        p: &Performance,
    ) -> bool
    {
        let query_ok = self
            .query
            .as_deref()
            .map(str::to_lowercase)
            .is_none_or(|q| {
                p.artist
                    .to_lowercase()
                    .contains(&q)
                    || p.stage
                        .to_lowercase()
                        .contains(&q)
            });

        let day_ok = self
            .day
            .as_deref()
            .is_none_or(|d| day_matches(&p.day, d));

        let stage_ok = self
            .stage
            .as_deref()
            .is_none_or(|s| p.stage == s);

        query_ok && day_ok && stage_ok
    }

    pub fn apply<'a>(
        &self,
        all: &'a [Performance],
    ) -> Vec<&'a Performance>
    {
        all.iter()
            .filter(|p| self.matches(p))
            .collect()
    }
}

fn day_matches(
    label: &str,
    wanted: &str,
) -> bool
{
    label
        .to_lowercase()
        .contains(
            &wanted
                .trim()
                .to_lowercase(),
        )
}

/// Acts on stage at `at` on days matching `day` (same matching as
/// `Filter::day`). Half-open like the overlap rule: an act ending at 13:00 is
/// no longer playing at 13:00.
pub fn playing_at<'a>(
    all: &'a [Performance],
    day: &str,
    at: ClockTime,
) -> Vec<&'a Performance>
{
    all.iter()
        .filter(|p| day_matches(&p.day, day))
        .filter(|p| p.start_time <= at && at < p.end_time)
        .collect()
}

/// Distinct stage labels, first-seen order.
pub fn stages(all: &[Performance]) -> Vec<&str>
{
    all.iter()
        .map(|p| p.stage.as_str())
        .collect::<IndexSet<_>>()
        .into_iter()
        .collect()
}

/// Distinct day labels in canonical order.
pub fn days<'a>(
    all: &'a [Performance],
    day_order: &DayOrder,
) -> Vec<&'a str>
{
    let mut days: Vec<&str> = all
        .iter()
        .map(|p| p.day.as_str())
        .collect::<IndexSet<_>>()
        .into_iter()
        .collect();
    days.sort_by_key(|d| day_order.sort_key(d));
    days
}

/// "1h 30m", "45m"
pub fn format_duration(minutes: u32) -> String
{
    let (hours, mins) = (minutes / 60, minutes % 60);
    if hours > 0 { format!("{hours}h {mins}m") } else { format!("{mins}m") }
}

#[cfg(test)]
mod tests
{
    use super::*;

    fn perf(
        stage: &str,
        day: &str,
        artist: &str,
        start: &str,
        end: &str,
    ) -> Performance
    {
        Performance::new(
            stage,
            day,
            artist,
            start
                .parse()
                .unwrap(),
            end.parse()
                .unwrap(),
            false,
        )
    }

    fn lineup() -> Vec<Performance>
    {
        vec![
            perf("Pyramid Stage", "Friday 27 June", "Supergrass", "12:00", "13:00"),
            perf("Other Stage", "Friday 27 June", "Wet Leg", "15:45", "16:45"),
            perf("Woodsies", "Saturday 28 June", "Sorry", "12:45", "13:30"),
            perf("Levels", "Thursday 26 June", "Palms Trax", "19:30", "21:00"),
        ]
    }

    #[test]
    fn query_matches_artist_or_stage_case_insensitively()
    {
        let all = lineup();
        let hits = Filter { query: Some("WET".into()), ..Default::default() }.apply(&all);
        assert_eq!(hits.len(), 1);

        let hits = Filter { query: Some("stage".into()), ..Default::default() }.apply(&all);
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn day_and_stage_filters_combine()
    {
        let all = lineup();
        let filter = Filter {
            day: Some("friday".into()),
            stage: Some("Other Stage".into()),
            ..Default::default()
        };
        let hits = filter.apply(&all);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].artist, "Wet Leg");
        assert!(!filter.is_empty());
        assert!(Filter::default().is_empty());
        assert_eq!(Filter::default().apply(&all).len(), 4);
    }

    #[test]
    fn playing_at_is_half_open()
    {
        let all = lineup();
        let at = |s: &str| s.parse::<ClockTime>().unwrap();
        assert_eq!(playing_at(&all, "Friday", at("12:00")).len(), 1);
        assert_eq!(playing_at(&all, "Friday", at("12:59")).len(), 1);
        assert!(playing_at(&all, "Friday", at("13:00")).is_empty());
        assert!(playing_at(&all, "Sunday", at("12:30")).is_empty());
    }

    #[test]
    fn distinct_stages_and_canonical_days()
    {
        let all = lineup();
        assert_eq!(stages(&all), ["Pyramid Stage", "Other Stage", "Woodsies", "Levels"]);
        assert_eq!(
            days(&all, &DayOrder::default()),
            ["Thursday 26 June", "Friday 27 June", "Saturday 28 June"]
        );
    }

    #[test]
    fn durations_render_compactly()
    {
        assert_eq!(format_duration(45), "45m");
        assert_eq!(format_duration(90), "1h 30m");
        assert_eq!(format_duration(60), "1h 0m");
    }
}
