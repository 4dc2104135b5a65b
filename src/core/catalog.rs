//! Caller-owned lineup cache.
//!
//! The lineup is read and parsed once, on the first `ensure_loaded()`, and
//! kept until `reload()`. Nothing is process-global: two catalogs over the
//! same file are independent.

use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::{debug, instrument};

use crate::core::parser::{LineupParser, SkippedLine};
use crate::core::performance::Performance;
use crate::infra::io::read_lineup;

/// Where the raw listing comes from.
#[derive(Debug, Clone)]
pub enum LineupSource
{
    File(PathBuf),
    Text(String),
}

#[derive(Debug, Clone)]
pub struct Catalog
{
    source: LineupSource,
    parser: LineupParser,
    loaded: Option<Loaded>,
}

#[derive(Debug, Clone)]
struct Loaded
{
    performances: Vec<Performance>,
    skipped: Vec<SkippedLine>,
}

impl Catalog
{
    pub fn new(
        source: LineupSource,
        parser: LineupParser,
    ) -> Self
    {
        Self { source, parser, loaded: None }
    }

    pub fn from_file(
        path: impl AsRef<Path>,
        parser: LineupParser,
    ) -> Self
    {
        Self::new(
            LineupSource::File(
                path.as_ref()
                    .to_path_buf(),
            ),
            parser,
        )
    }

    pub fn from_text(
        text: impl Into<String>,
        parser: LineupParser,
    ) -> Self
    {
        Self::new(LineupSource::Text(text.into()), parser)
    }

    pub fn parser(&self) -> &LineupParser
    {
        &self.parser
    }

    pub fn is_loaded(&self) -> bool
    {
        self.loaded
            .is_some()
    }

    /// Read and parse on first use; later calls return the cached lineup.
    #[instrument(level = "debug", skip(self))]
    pub fn ensure_loaded(&mut self) -> Result<&[Performance]>
    {
        if self
            .loaded
            .is_none()
        {
            let report = match &self.source
            {
                LineupSource::File(path) => self
                    .parser
                    .parse_with_report(&read_lineup(path)?),
                LineupSource::Text(text) => self
                    .parser
                    .parse_with_report(text),
            };

            debug!(
                performances = report
                    .performances
                    .len(),
                skipped = report
                    .skipped
                    .len(),
                "lineup loaded"
            );

            self.loaded =
                Some(Loaded { performances: report.performances, skipped: report.skipped });
        }

        Ok(self
            .loaded
            .as_ref()
            .map_or(&[][..], |l| l.performances.as_slice()))
    }

    /// Cached performances, if loaded.
    pub fn performances(&self) -> Option<&[Performance]>
    {
        self.loaded
            .as_ref()
            .map(|l| l.performances.as_slice())
    }

    /// Lines the last load dropped; empty before the first load.
    pub fn skipped(&self) -> &[SkippedLine]
    {
        self.loaded
            .as_ref()
            .map_or(&[][..], |l| l.skipped.as_slice())
    }

    /// Forget the cached lineup; the next `ensure_loaded()` re-reads it.
    pub fn reload(&mut self)
    {
        self.loaded = None;
    }

    /// Load if needed and hand over the performances.
    pub fn into_performances(mut self) -> Result<Vec<Performance>>
    {
        self.ensure_loaded()?;
        Ok(self
            .loaded
            .map(|l| l.performances)
            .unwrap_or_default())
    }
}
