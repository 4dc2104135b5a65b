//! Personal schedule engine: selection state, conflict detection, grouping
//! and plain-text export.
//!
//! One overlap rule backs every conflict check (toggle, badges, the
//! schedule-wide banner): same day label, half-open `[start, end)` minutes.
//! Two conflict queries:
//! - `toggle` stops at the first clash in selection order (interactive add)
//! - `all_conflicts` is exhaustive (dashboard count and badges)

use std::collections::{BTreeSet, HashMap};

use indexmap::{IndexMap, IndexSet};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::core::performance::{DayOrder, Performance};

/// The caller's chosen performance ids. Iteration follows insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selection
{
    ids: IndexSet<String>,
}

impl Selection
{
    pub fn new() -> Self
    {
        Self::default()
    }

    pub fn contains(
        &self,
        id: &str,
    ) -> bool
    {
        self.ids
            .contains(id)
    }

    /// Returns `false` if the id was already selected.
    pub fn insert(
        &mut self,
        id: impl Into<String>,
    ) -> bool
    {
        self.ids
            .insert(id.into())
    }

    /// Removes while keeping the order of the remaining ids.
    pub fn remove(
        &mut self,
        id: &str,
    ) -> bool
    {
        self.ids
            .shift_remove(id)
    }

    pub fn len(&self) -> usize
    {
        self.ids
            .len()
    }

    pub fn is_empty(&self) -> bool
    {
        self.ids
            .is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str>
    {
        self.ids
            .iter()
            .map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for Selection
{
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self
    {
        Self {
            ids: iter
                .into_iter()
                .map(Into::into)
                .collect(),
        }
    }
}

/// What the caller chose after a toggle reported a clash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConflictAction
{
    /// Select the new act anyway, leaving the overlapping pair in place.
    KeepBoth,
    /// Drop the clashing act and select the new one.
    Replace,
}

/// Result of a toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome
{
    Added,
    Removed,
    /// Not added: this already-selected act overlaps the requested one.
    Conflict(Performance),
}

/// Unordered pair of clashing performance ids; the smaller id comes first.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ConflictPair
{
    pub first: String,
    pub second: String,
}

impl ConflictPair
{
    pub fn new(
        a: &str,
        b: &str,
    ) -> Self
    {
        let (first, second) = if a <= b { (a, b) } else { (b, a) };
        Self { first: first.to_string(), second: second.to_string() }
    }

    pub fn contains(
        &self,
        id: &str,
    ) -> bool
    {
        self.first == id || self.second == id
    }

    /// The other member of the pair, if `id` is in it.
    pub fn partner(
        &self,
        id: &str,
    ) -> Option<&str>
    {
        if self.first == id
        {
            Some(&self.second)
        }
        else if self.second == id
        {
            Some(&self.first)
        }
        else
        {
            None
        }
    }
}

/// Half-open overlap on the same day label. Touching sets do not clash and
/// different day labels never do, whatever the clock says.
pub fn overlaps(
    a: &Performance,
    b: &Performance,
) -> bool
{
    if a.day != b.day
    {
        return false;
    }

    let (s1, e1) = (
        a.start_time
            .minutes_since_midnight(),
        a.end_time
            .minutes_since_midnight(),
    );
    let (s2, e2) = (
        b.start_time
            .minutes_since_midnight(),
        b.end_time
            .minutes_since_midnight(),
    );

    s1 < e2 && s2 < e1
}

fn index_by_id(all: &[Performance]) -> HashMap<&str, &Performance>
{
    all.iter()
        .map(|p| (p.id.as_str(), p))
        .collect()
}

/// Selected performances in the order of `all`. Ids unknown to `all` are
/// ignored.
pub fn selected_in<'a>(
    selection: &Selection,
    all: &'a [Performance],
) -> Vec<&'a Performance>
{
    all.iter()
        .filter(|p| selection.contains(&p.id))
        .collect()
}

/// Toggle `performance` in `selection`.
///
/// Adding is refused when an already-selected act on the same day overlaps;
/// only the first such act in selection order is reported and the selection
/// comes back unchanged.
pub fn toggle(
    selection: &Selection,
    performance: &Performance,
    all: &[Performance],
) -> (Selection, ToggleOutcome)
{
    let mut next = selection.clone();

    if next.remove(&performance.id)
    {
        return (next, ToggleOutcome::Removed);
    }

    let by_id = index_by_id(all);
    let clash = selection
        .iter()
        .filter_map(|id| by_id.get(id).copied())
        .find(|selected| overlaps(performance, selected));

    if let Some(clash) = clash
    {
        debug!(requested = %performance.id, clashes_with = %clash.id, "toggle refused");
        return (next, ToggleOutcome::Conflict(clash.clone()));
    }

    next.insert(
        performance
            .id
            .clone(),
    );
    (next, ToggleOutcome::Added)
}

/// Apply the caller's decision after a reported clash.
pub fn resolve(
    selection: &Selection,
    new_id: &str,
    conflicting_id: &str,
    action: ConflictAction,
) -> Selection
{
    let mut next = selection.clone();
    if action == ConflictAction::Replace
    {
        next.remove(conflicting_id);
    }
    next.insert(new_id);
    next
}

/// Every overlapping pair among the selected performances.
pub fn all_conflicts(
    selection: &Selection,
    all: &[Performance],
) -> BTreeSet<ConflictPair>
{
    selected_in(selection, all)
        .into_iter()
        .tuple_combinations()
        .filter(|(a, b)| overlaps(a, b))
        .map(|(a, b)| ConflictPair::new(&a.id, &b.id))
        .collect()
}

/// The act `id` clashes with, taken from the first pair that mentions it.
pub fn conflict_partner<'a>(
    id: &str,
    conflicts: &BTreeSet<ConflictPair>,
    all: &'a [Performance],
) -> Option<&'a Performance>
{
    let partner = conflicts
        .iter()
        .find_map(|pair| pair.partner(id))?;
    all.iter()
        .find(|p| p.id == partner)
}

/// Day → stage → performances sorted by start time.
pub type DayGroups<'a> = IndexMap<&'a str, IndexMap<&'a str, Vec<&'a Performance>>>;

/// Group for browsing. Days and stages keep first-seen order of the input;
/// each stage list is sorted ascending by start time.
pub fn group_by_day_and_stage<'a, I>(performances: I) -> DayGroups<'a>
where
    I: IntoIterator<Item = &'a Performance>,
{
    let mut groups: DayGroups<'a> = IndexMap::new();

    for p in performances
    {
        groups
            .entry(p.day.as_str())
            .or_default()
            .entry(p.stage.as_str())
            .or_default()
            .push(p);
    }

    for stages in groups.values_mut()
    {
        for list in stages.values_mut()
        {
            list.sort_by_key(|p| p.start_time);
        }
    }

    groups
}

/// Selected performances by day, days in canonical order (unknown labels
/// first), each day sorted by start time.
pub fn schedule_by_day<'a>(
    selection: &Selection,
    all: &'a [Performance],
    day_order: &DayOrder,
) -> IndexMap<&'a str, Vec<&'a Performance>>
{
    let mut chosen = selected_in(selection, all);
    chosen.sort_by(|a, b| {
        day_order
            .sort_key(&a.day)
            .cmp(&day_order.sort_key(&b.day))
            .then_with(|| {
                a.start_time
                    .cmp(&b.start_time)
            })
    });

    let mut by_day: IndexMap<&str, Vec<&Performance>> = IndexMap::new();
    for p in chosen
    {
        by_day
            .entry(p.day.as_str())
            .or_default()
            .push(p);
    }
    by_day
}

/// Export rendering knobs.
#[derive(Debug, Clone, Default)]
pub struct ExportOptions
{
    /// Heading line written before the day groups.
    pub title: Option<String>,
    pub day_order: DayOrder,
}

/// Plain-text schedule with the default options.
pub fn export_schedule(
    selection: &Selection,
    all: &[Performance],
) -> String
{
    export_schedule_with(selection, all, &ExportOptions::default())
}

/// Plain-text schedule:
///
/// ```text
/// Friday 27 June
/// ==============
///
/// 12:00 - 13:00: Supergrass (Pyramid Stage)
///
/// ```
pub fn export_schedule_with(
    selection: &Selection,
    all: &[Performance],
    options: &ExportOptions,
) -> String
{
    let mut out = String::new();

    if let Some(title) = &options.title
    {
        out.push_str(title);
        out.push_str("\n\n");
    }

    for (day, performances) in schedule_by_day(selection, all, &options.day_order)
    {
        out.push_str(&format!(
            "{day}\n{}\n\n",
            "=".repeat(
                day.chars()
                    .count()
            )
        ));
        for p in performances
        {
            out.push_str(&format!(
                "{} - {}: {} ({})\n",
                p.start_time, p.end_time, p.artist, p.stage
            ));
        }
        out.push('\n');
    }

    out
}

/// Headline numbers for the schedule view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScheduleSummary
{
    pub selected: usize,
    pub days: usize,
    pub conflicts: usize,
}

pub fn summarize(
    selection: &Selection,
    all: &[Performance],
) -> ScheduleSummary
{
    let chosen = selected_in(selection, all);
    ScheduleSummary {
        selected: chosen.len(),
        days: chosen
            .iter()
            .map(|p| p.day.as_str())
            .unique()
            .count(),
        conflicts: all_conflicts(selection, all).len(),
    }
}

/// Planner failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleError
{
    #[error("no performance with id `{0}` in the lineup")]
    UnknownPerformance(String),
}

/// Single-writer owner of the lineup and the selection. Every `&mut self`
/// call is one complete state transition.
#[derive(Debug, Clone)]
pub struct Planner
{
    performances: Vec<Performance>,
    selection: Selection,
}

impl Planner
{
    pub fn new(
        performances: Vec<Performance>,
        selection: Selection,
    ) -> Self
    {
        Self { performances, selection }
    }

    pub fn performances(&self) -> &[Performance]
    {
        &self.performances
    }

    pub fn selection(&self) -> &Selection
    {
        &self.selection
    }

    pub fn into_selection(self) -> Selection
    {
        self.selection
    }

    pub fn get(
        &self,
        id: &str,
    ) -> Option<&Performance>
    {
        self.performances
            .iter()
            .find(|p| p.id == id)
    }

    fn require(
        &self,
        id: &str,
    ) -> Result<&Performance, ScheduleError>
    {
        self.get(id)
            .ok_or_else(|| ScheduleError::UnknownPerformance(id.to_string()))
    }

    #[instrument(level = "debug", skip(self))]
    pub fn toggle(
        &mut self,
        id: &str,
    ) -> Result<ToggleOutcome, ScheduleError>
    {
        let performance = self.require(id)?;
        let (next, outcome) = toggle(&self.selection, performance, &self.performances);
        self.selection = next;
        Ok(outcome)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn resolve(
        &mut self,
        new_id: &str,
        conflicting_id: &str,
        action: ConflictAction,
    ) -> Result<(), ScheduleError>
    {
        self.require(new_id)?;
        if action == ConflictAction::Replace
        {
            self.require(conflicting_id)?;
        }
        self.selection = resolve(&self.selection, new_id, conflicting_id, action);
        Ok(())
    }

    pub fn clear(&mut self)
    {
        self.selection = Selection::new();
    }

    pub fn conflicts(&self) -> BTreeSet<ConflictPair>
    {
        all_conflicts(&self.selection, &self.performances)
    }

    pub fn summary(&self) -> ScheduleSummary
    {
        summarize(&self.selection, &self.performances)
    }

    pub fn by_day(
        &self,
        day_order: &DayOrder,
    ) -> IndexMap<&str, Vec<&Performance>>
    {
        schedule_by_day(&self.selection, &self.performances, day_order)
    }

    pub fn export(
        &self,
        options: &ExportOptions,
    ) -> String
    {
        export_schedule_with(&self.selection, &self.performances, options)
    }
}
