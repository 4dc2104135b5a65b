//! Commands that read or change the personal schedule.

use anyhow::Result;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::info;

use super::{ConflictDetected, Palette, Session, describe, report, selection_store, session_config};
use crate::cli::{AppContext, ConflictsArgs, ExportArgs, OnConflict, ScheduleArgs, ToggleArgs};
use crate::core::performance::Performance;
use crate::core::schedule::{
    ConflictAction, ConflictPair, ScheduleError, ScheduleSummary, Selection, ToggleOutcome, conflict_partner,
};
use crate::infra::io::write_text;
use crate::infra::store::SelectionStore;

/// Toggle each id in order, saving after every change. Under
/// `--on-conflict report` the first clash stops the run; earlier toggles
/// stay saved.
pub fn toggle(
    args: ToggleArgs,
    ctx: &AppContext,
) -> Result<()>
{
    let session = Session::open(&args.source.lineup, ctx)?;
    let mut planner = session.planner()?;
    let palette = Palette::new(ctx);

    for id in &args.ids
    {
        let requested = planner
            .get(id)
            .cloned()
            .ok_or_else(|| ScheduleError::UnknownPerformance(id.clone()))?;

        match planner.toggle(id)?
        {
            ToggleOutcome::Added =>
            {
                session.persist(&planner, ctx)?;
                report(ctx, format!("{} {}", "Added".style(palette.selected), describe(&requested)));
            }
            ToggleOutcome::Removed =>
            {
                session.persist(&planner, ctx)?;
                report(ctx, format!("Removed {}", describe(&requested)));
            }
            ToggleOutcome::Conflict(existing) => match args.on_conflict
            {
                OnConflict::Report =>
                {
                    eprintln!(
                        "{} {} overlaps {}",
                        "Clash:".style(palette.warn),
                        describe(&requested),
                        describe(&existing)
                    );
                    return Err(ConflictDetected { requested: requested.id, existing: existing.id }.into());
                }
                OnConflict::KeepBoth =>
                {
                    planner.resolve(id, &existing.id, ConflictAction::KeepBoth)?;
                    session.persist(&planner, ctx)?;
                    report(
                        ctx,
                        format!(
                            "{} {} {}",
                            "Added".style(palette.selected),
                            describe(&requested),
                            format!("(clashes with {})", existing.artist).style(palette.warn)
                        ),
                    );
                }
                OnConflict::Replace =>
                {
                    planner.resolve(id, &existing.id, ConflictAction::Replace)?;
                    session.persist(&planner, ctx)?;
                    report(ctx, format!("Replaced {} with {}", describe(&existing), describe(&requested)));
                }
            },
        }
    }

    if ctx.dry_run
    {
        report(ctx, "Dry run: selections not saved".to_string());
    }
    Ok(())
}

#[derive(Serialize)]
struct ConflictView<'a>
{
    day: &'a str,
    first: &'a Performance,
    second: &'a Performance,
}

fn conflict_views<'a>(
    pairs: impl IntoIterator<Item = &'a ConflictPair>,
    all: &'a [Performance],
) -> Vec<ConflictView<'a>>
{
    let find = |id: &str| all.iter().find(|p| p.id == id);
    pairs
        .into_iter()
        .filter_map(|pair| {
            let first = find(pair.first.as_str())?;
            let second = find(pair.second.as_str())?;
            Some(ConflictView { day: &first.day, first, second })
        })
        .collect()
}

#[derive(Serialize)]
struct ScheduleView<'a>
{
    summary: ScheduleSummary,
    days: indexmap::IndexMap<&'a str, Vec<&'a Performance>>,
    conflicts: Vec<ConflictView<'a>>,
}

pub fn schedule(
    args: ScheduleArgs,
    ctx: &AppContext,
) -> Result<()>
{
    let session = Session::open(&args.source.lineup, ctx)?;
    let planner = session.planner()?;
    let summary = planner.summary();
    let conflicts = planner.conflicts();

    if args.json
    {
        let view = ScheduleView {
            summary,
            days: planner.by_day(&session.day_order),
            conflicts: conflict_views(&conflicts, planner.performances()),
        };
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    if summary.selected == 0
    {
        report(ctx, "Your schedule is empty. Pick acts with `lineup toggle`.".to_string());
        return Ok(());
    }

    let palette = Palette::new(ctx);
    if !ctx.quiet
    {
        println!(
            "{} selected across {} day(s), {} conflict(s)",
            summary.selected, summary.days, summary.conflicts
        );
        if summary.conflicts > 0
        {
            println!(
                "{}",
                "Some of your picks overlap; see `lineup conflicts`.".style(palette.warn)
            );
        }
        println!();
    }

    for (day, performances) in planner.by_day(&session.day_order)
    {
        println!("{}", day.style(palette.heading));
        for p in performances
        {
            let mut line = format!("  {}  {} ({})", p.time_range(), p.artist, p.stage.style(palette.stage));
            if let Some(other) = conflict_partner(&p.id, &conflicts, planner.performances())
            {
                let badge = format!("clashes with {} at {} ({})", other.artist, other.stage, other.time_range());
                line.push_str(&format!("  {}", badge.style(palette.warn)));
            }
            println!("{line}");
        }
        println!();
    }
    Ok(())
}

pub fn conflicts(
    args: ConflictsArgs,
    ctx: &AppContext,
) -> Result<()>
{
    let session = Session::open(&args.source.lineup, ctx)?;
    let planner = session.planner()?;
    let pairs = planner.conflicts();
    let views = conflict_views(&pairs, planner.performances());

    if args.json
    {
        println!("{}", serde_json::to_string_pretty(&views)?);
        return Ok(());
    }

    if views.is_empty()
    {
        report(ctx, "No conflicts.".to_string());
        return Ok(());
    }

    let palette = Palette::new(ctx);
    for view in &views
    {
        println!(
            "{}: {} {} {}",
            view.day.style(palette.heading),
            describe(view.first),
            "<->".style(palette.warn),
            describe(view.second)
        );
    }
    Ok(())
}

pub fn export(
    args: ExportArgs,
    ctx: &AppContext,
) -> Result<()>
{
    let session = Session::open(&args.source.lineup, ctx)?;
    let planner = session.planner()?;

    let mut options = session
        .config
        .schedule
        .export_options(session.day_order.clone());
    if let Some(title) = args.title
    {
        options.title = Some(title);
    }
    let text = planner.export(&options);

    if args.stdout
    {
        print!("{text}");
        return Ok(());
    }

    let out = match args.output
    {
        Some(path) => path,
        None => session
            .config
            .schedule
            .export_path()?,
    };
    let count = planner
        .summary()
        .selected;

    if ctx.dry_run
    {
        report(ctx, format!("Would export {count} performance(s) to {}", out.display()));
        return Ok(());
    }

    write_text(&out, &text)?;
    info!(path = %out.display(), count, "exported schedule");
    report(ctx, format!("Exported {count} performance(s) to {}", out.display()));
    Ok(())
}

pub fn clear(ctx: &AppContext) -> Result<()>
{
    let config = session_config();
    let store = selection_store(&config, ctx)?;

    if ctx.dry_run
    {
        report(ctx, format!("Would clear {}", store.path().display()));
        return Ok(());
    }

    store.save(&Selection::new())?;
    report(ctx, "Schedule cleared.".to_string());
    Ok(())
}
