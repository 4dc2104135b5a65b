//! Command handlers behind the `lineup` subcommands.
//!
//! Handlers share one `Session`: config, the parsed lineup and the
//! selection store. Every mutation is saved before the next one runs.

pub mod lineup_cmd;
pub mod schedule_cmd;

use std::path::Path;

use anyhow::{Context, Result};
use owo_colors::Style;
use tracing::warn;

use crate::cli::AppContext;
use crate::core::catalog::Catalog;
use crate::core::parser::SkippedLine;
use crate::core::performance::{DayOrder, Performance};
use crate::core::schedule::Planner;
use crate::infra::config::{Config, load_config};
use crate::infra::store::{JsonFileStore, SelectionStore};

/// Exit code used when a toggle is refused because of a clash.
pub const CONFLICT_EXIT_CODE: u8 = 2;

/// A toggle was refused; carries both acts for the message.
#[derive(Debug, thiserror::Error)]
#[error("{requested} clashes with {existing}; rerun with --on-conflict keep-both or replace")]
pub struct ConflictDetected
{
    pub requested: String,
    pub existing: String,
}

/// Styles for terminal output; all plain under `--no-color`.
#[derive(Debug, Clone, Copy)]
pub struct Palette
{
    pub heading: Style,
    pub stage: Style,
    pub selected: Style,
    pub warn: Style,
    pub dim: Style,
}

impl Palette
{
    pub fn new(ctx: &AppContext) -> Self
    {
        if ctx.no_color
        {
            let plain = Style::new();
            return Self { heading: plain, stage: plain, selected: plain, warn: plain, dim: plain };
        }

        Self {
            heading: Style::new()
                .bold()
                .underline(),
            stage: Style::new().cyan(),
            selected: Style::new()
                .green()
                .bold(),
            warn: Style::new()
                .red()
                .bold(),
            dim: Style::new().dimmed(),
        }
    }
}

/// Informational line on stdout, silenced by `--quiet`.
pub fn report(
    ctx: &AppContext,
    line: String,
)
{
    if !ctx.quiet
    {
        println!("{line}");
    }
}

/// "Artist (Stage, Day HH:MM - HH:MM)"
pub fn describe(p: &Performance) -> String
{
    format!("{} ({}, {} {})", p.artist, p.stage, p.day, p.time_range())
}

/// Config, parsed lineup and selection store for one command run.
pub struct Session
{
    pub config: Config,
    pub day_order: DayOrder,
    pub performances: Vec<Performance>,
    pub skipped: Vec<SkippedLine>,
    store: JsonFileStore,
}

/// Config from disk/env; a broken config is reported and defaults are used.
pub fn session_config() -> Config
{
    load_config().unwrap_or_else(|e| {
        warn!("{e:#}; falling back to default configuration");
        Config::default()
    })
}

pub fn selection_store(
    config: &Config,
    ctx: &AppContext,
) -> Result<JsonFileStore>
{
    let path = config
        .schedule
        .selections_path(
            ctx.selections
                .as_deref(),
        )?;
    Ok(JsonFileStore::new(path))
}

impl Session
{
    pub fn open(
        lineup: &Path,
        ctx: &AppContext,
    ) -> Result<Self>
    {
        let config = session_config();
        let day_order = config
            .parser
            .day_order();

        let mut catalog = Catalog::from_file(
            lineup,
            config
                .parser
                .build_parser(),
        );
        catalog.ensure_loaded()?;
        let skipped = catalog
            .skipped()
            .to_vec();
        let performances = catalog.into_performances()?;

        let store = selection_store(&config, ctx)?;
        Ok(Self { config, day_order, performances, skipped, store })
    }

    /// Planner over this lineup with the persisted selection.
    pub fn planner(&self) -> Result<Planner>
    {
        let selection = self
            .store
            .load()
            .context("Failed to load saved selections")?;
        Ok(Planner::new(
            self.performances
                .clone(),
            selection,
        ))
    }

    /// Save the planner's selection unless this is a dry run.
    pub fn persist(
        &self,
        planner: &Planner,
        ctx: &AppContext,
    ) -> Result<()>
    {
        if ctx.dry_run
        {
            return Ok(());
        }
        self.store
            .save(planner.selection())
            .context("Failed to save selections")
    }
}
