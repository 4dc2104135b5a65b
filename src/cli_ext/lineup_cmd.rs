//! Read-only lineup commands: `parse`, `browse`, `now`.

use std::collections::BTreeSet;

use anyhow::{Context, Result};
use chrono::Timelike;
use indexmap::IndexMap;
use owo_colors::OwoColorize;
use serde::Serialize;
use tabled::settings::Style as TableStyle;
use tabled::{Table, Tabled};

use super::{Palette, Session};
use crate::cli::{AppContext, BrowseArgs, NowArgs, OutputFormat, ParseArgs};
use crate::core::browse::{Filter, days, format_duration, playing_at, stages};
use crate::core::performance::{ClockTime, Performance};
use crate::core::schedule::{ConflictPair, DayGroups, Selection, conflict_partner, group_by_day_and_stage};

pub fn parse(
    args: ParseArgs,
    ctx: &AppContext,
) -> Result<()>
{
    let session = Session::open(&args.source.lineup, ctx)?;

    if args.show_skipped
    {
        for skipped in &session.skipped
        {
            eprintln!("line {}: {} ({})", skipped.line, skipped.text, skipped.reason);
        }
    }

    if args.json
    {
        println!("{}", serde_json::to_string_pretty(&session.performances)?);
        return Ok(());
    }

    let palette = Palette::new(ctx);
    let mut current_day: Option<&str> = None;
    for p in &session.performances
    {
        if current_day != Some(p.day.as_str())
        {
            if current_day.is_some()
            {
                println!();
            }
            println!("{}", p.day.style(palette.heading));
            current_day = Some(p.day.as_str());
        }
        println!(
            "  {}  {} ({})  {}",
            p.time_range(),
            p.artist,
            p.stage.style(palette.stage),
            p.id.style(palette.dim)
        );
    }

    if !ctx.quiet
    {
        eprintln!(
            "{} performances across {} days on {} stages ({} lines skipped)",
            session
                .performances
                .len(),
            days(&session.performances, &session.day_order).len(),
            stages(&session.performances).len(),
            session
                .skipped
                .len()
        );
    }
    Ok(())
}

#[derive(Serialize)]
struct BrowseView<'a>
{
    days: &'a DayGroups<'a>,
    selected: &'a Selection,
}

#[derive(Tabled)]
struct BrowseRow
{
    #[tabled(rename = "sel")]
    picked: &'static str,
    day: String,
    stage: String,
    time: String,
    artist: String,
    length: String,
    id: String,
}

pub fn browse(
    args: BrowseArgs,
    ctx: &AppContext,
) -> Result<()>
{
    let session = Session::open(&args.source.lineup, ctx)?;
    let planner = session.planner()?;

    let filter = Filter { query: args.search, day: args.day, stage: args.stage };
    let visible = filter.apply(planner.performances());
    let groups = group_by_day_and_stage(
        visible
            .iter()
            .copied(),
    );
    let conflicts = planner.conflicts();

    match args.format
    {
        OutputFormat::Json =>
        {
            let view = BrowseView { days: &groups, selected: planner.selection() };
            println!("{}", serde_json::to_string_pretty(&view)?);
        }
        OutputFormat::Table =>
        {
            let rows: Vec<BrowseRow> = groups
                .values()
                .flat_map(IndexMap::values)
                .flatten()
                .map(|p| BrowseRow {
                    picked: if planner
                        .selection()
                        .contains(&p.id)
                    {
                        "x"
                    }
                    else
                    {
                        ""
                    },
                    day: p
                        .day
                        .clone(),
                    stage: p
                        .stage
                        .clone(),
                    time: p.time_range(),
                    artist: p
                        .artist
                        .clone(),
                    length: p
                        .duration
                        .map(format_duration)
                        .unwrap_or_default(),
                    id: p
                        .id
                        .clone(),
                })
                .collect();
            let mut table = Table::new(rows);
            table.with(TableStyle::rounded());
            println!("{table}");
        }
        OutputFormat::Text => print_groups(&groups, planner.selection(), &conflicts, planner.performances(), ctx),
    }

    if groups.is_empty() && !ctx.quiet && !filter.is_empty()
    {
        eprintln!("No performances match the filter.");
    }
    Ok(())
}

fn print_groups(
    groups: &DayGroups<'_>,
    selection: &Selection,
    conflicts: &BTreeSet<ConflictPair>,
    all: &[Performance],
    ctx: &AppContext,
)
{
    let palette = Palette::new(ctx);

    for (day, by_stage) in groups
    {
        println!("{}", day.style(palette.heading));
        for (stage, performances) in by_stage
        {
            println!("  {}", stage.style(palette.stage));
            for p in performances
            {
                let mark = if selection.contains(&p.id) { "[x]" } else { "[ ]" };
                let length = p
                    .duration
                    .map(format_duration)
                    .unwrap_or_default();
                let mut line = format!(
                    "    {} {}  {}  {}  {}",
                    mark.style(palette.selected),
                    p.time_range(),
                    p.artist,
                    length.style(palette.dim),
                    p.id.style(palette.dim)
                );
                if let Some(other) = conflict_partner(&p.id, conflicts, all)
                {
                    let badge = format!("clashes with {}", other.artist);
                    line.push_str(&format!("  {}", badge.style(palette.warn)));
                }
                println!("{line}");
            }
        }
        println!();
    }
}

pub fn now(
    args: NowArgs,
    ctx: &AppContext,
) -> Result<()>
{
    let at = match args.time
    {
        Some(text) => text
            .parse::<ClockTime>()
            .with_context(|| format!("Invalid --time `{text}`"))?,
        None =>
        {
            let local = chrono::Local::now();
            ClockTime::from_hm(local.hour() as u8, local.minute() as u8).context("Local clock out of range")?
        }
    };

    let session = Session::open(&args.source.lineup, ctx)?;
    let planner = session.planner()?;
    let on_now = playing_at(planner.performances(), &args.day, at);

    if on_now.is_empty()
    {
        if !ctx.quiet
        {
            println!("Nothing is playing on {} at {at}.", args.day);
        }
        return Ok(());
    }

    let palette = Palette::new(ctx);
    let mut by_stage: IndexMap<&str, Vec<&Performance>> = IndexMap::new();
    for p in on_now
    {
        by_stage
            .entry(p.stage.as_str())
            .or_default()
            .push(p);
    }

    println!("{}", format!("Playing at {at}").style(palette.heading));
    for (stage, performances) in by_stage
    {
        for p in performances
        {
            let mark = if planner
                .selection()
                .contains(&p.id)
            {
                "*"
            }
            else
            {
                " "
            };
            println!(
                "{} {}  {} ({})  until {}",
                mark.style(palette.selected),
                stage.style(palette.stage),
                p.artist,
                p.day,
                p.end_time
            );
        }
    }
    Ok(())
}
