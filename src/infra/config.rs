use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::cli::{AppContext, InitArgs};
use crate::core::parser::{DEFAULT_PICTURED_MARKER, HEADER_WEEKDAYS, LineupParser};
use crate::core::performance::DayOrder;
use crate::core::schedule::ExportOptions;

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config
{
    /// Lineup parsing settings
    pub parser: ParserConfig,

    /// Selection persistence and export settings
    pub schedule: ScheduleConfig,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig
{
    /// Title line to discard silently (e.g. "Glastonbury 2025")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_line: Option<String>,

    /// Annotation substring marking a pictured act
    pub pictured_marker: String,

    /// Canonical weekday order used to sort days. Headers only recognise
    /// Thursday to Sunday, so other weekdays here never match a parsed day.
    pub day_order: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig
{
    /// JSON file holding the selected performance ids (~ and $VAR expand)
    pub selections_file: String,

    /// Heading written at the top of exports
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_title: Option<String>,

    /// Default export destination
    pub export_file: String,
}

impl Default for ParserConfig
{
    fn default() -> Self
    {
        Self {
            title_line: None,
            pictured_marker: DEFAULT_PICTURED_MARKER.to_string(),
            day_order: ["Thursday", "Friday", "Saturday", "Sunday"]
                .map(String::from)
                .to_vec(),
        }
    }
}

impl Default for ScheduleConfig
{
    fn default() -> Self
    {
        Self {
            selections_file: ".lineup/selections.json".to_string(),
            export_title: Some("My Schedule".to_string()),
            export_file: "schedule.txt".to_string(),
        }
    }
}

impl ParserConfig
{
    pub fn day_order(&self) -> DayOrder
    {
        DayOrder::new(&self.day_order)
    }

    /// Configured weekdays no header line can produce.
    pub fn unreachable_weekdays(&self) -> Vec<&str>
    {
        self.day_order
            .iter()
            .map(|w| w.trim())
            .filter(|w| {
                !w.is_empty()
                    && !HEADER_WEEKDAYS
                        .iter()
                        .any(|h| h.eq_ignore_ascii_case(w))
            })
            .collect()
    }

    pub fn build_parser(&self) -> LineupParser
    {
        for weekday in self.unreachable_weekdays()
        {
            warn!(weekday, "parser.day_order names a weekday headers never carry");
        }

        let parser = LineupParser::new()
            .with_pictured_marker(self.pictured_marker.as_str())
            .with_day_order(self.day_order());

        match &self.title_line
        {
            Some(title) => parser.with_title_line(title.as_str()),
            None => parser,
        }
    }
}

impl ScheduleConfig
{
    /// Selections path: CLI override first, then config; both expanded.
    pub fn selections_path(
        &self,
        override_path: Option<&Path>,
    ) -> Result<PathBuf>
    {
        match override_path
        {
            Some(p) => Ok(p.to_path_buf()),
            None => expand(&self.selections_file),
        }
    }

    pub fn export_path(&self) -> Result<PathBuf>
    {
        expand(&self.export_file)
    }

    pub fn export_options(
        &self,
        day_order: DayOrder,
    ) -> ExportOptions
    {
        // A blank title turns the heading off
        let title = self
            .export_title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string);
        ExportOptions { title, day_order }
    }
}

fn expand(raw: &str) -> Result<PathBuf>
{
    let expanded =
        shellexpand::full(raw).with_context(|| format!("Failed to expand path `{raw}`"))?;
    Ok(PathBuf::from(expanded.as_ref()))
}

pub fn load_config() -> Result<Config>
{
    let mut builder = config::Config::builder();

    // Load from config files in priority order
    let config_paths = ["lineup.toml", "lineup.yaml", "lineup.json", ".lineup.toml"];

    for path in &config_paths
    {
        if Path::new(path).exists()
        {
            builder = builder.add_source(config::File::with_name(path));
            break;
        }
    }

    // LINEUP_SCHEDULE__SELECTIONS_FILE → schedule.selections_file
    builder = builder.add_source(
        config::Environment::with_prefix("LINEUP")
            .prefix_separator("_")
            .separator("__"),
    );

    let cfg = builder
        .build()
        .context("Failed to load configuration")?;
    let parsed: Config = cfg
        .try_deserialize()
        .context("Failed to parse configuration")?;

    Ok(parsed)
}

pub fn init(
    args: InitArgs,
    ctx: &AppContext,
) -> Result<()>
{
    let config_path = args
        .path
        .join("lineup.toml");

    if config_path.exists() && !args.force
    {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    let config = Config::default();
    let toml_string =
        toml::to_string_pretty(&config).context("Failed to serialize default config")?;

    if ctx.dry_run
    {
        if !ctx.quiet
        {
            println!("Would write {}:\n{}", config_path.display(), toml_string);
        }
        return Ok(());
    }

    std::fs::write(&config_path, toml_string).context("Failed to write config file")?;

    if !ctx.quiet
    {
        println!("Created config file at {}", config_path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn default_config_round_trips_through_toml()
    {
        let text = toml::to_string_pretty(&Config::default()).unwrap();
        assert!(text.contains("pictured_marker"));
        assert!(text.contains("selections_file"));

        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back.parser.day_order.len(), 4);
        assert_eq!(back.schedule.export_title.as_deref(), Some("My Schedule"));
    }

    #[test]
    fn partial_config_falls_back_to_defaults()
    {
        let cfg: Config = toml::from_str("[parser]\ntitle_line = \"Glastonbury 2025\"\n").unwrap();
        assert_eq!(cfg.parser.title_line.as_deref(), Some("Glastonbury 2025"));
        assert_eq!(cfg.parser.pictured_marker, "(pictured)");
        assert_eq!(cfg.schedule.export_file, "schedule.txt");
    }

    #[test]
    fn parser_config_drives_the_parser()
    {
        let cfg = ParserConfig {
            title_line: Some("Fest".into()),
            pictured_marker: "*".into(),
            day_order: vec!["Saturday".into(), "Friday".into()],
        };
        let report = cfg
            .build_parser()
            .parse_with_report(
                "Fest\nPark - Friday 27 June\nA: 12:00 - 13:00 *\nPark - Saturday 28 June\nB: 12:00 - 13:00\n",
            );
        assert!(report.skipped.is_empty());
        assert_eq!(report.performances[0].artist, "B");
        assert!(report.performances[1].is_pictured);
    }

    #[test]
    fn blank_export_title_disables_the_heading()
    {
        let cfg: Config = toml::from_str("[schedule]\nexport_title = \"  \"\n").unwrap();
        let options = cfg
            .schedule
            .export_options(DayOrder::default());
        assert!(options.title.is_none());

        let options = ScheduleConfig::default().export_options(DayOrder::default());
        assert_eq!(options.title.as_deref(), Some("My Schedule"));
    }

    #[test]
    fn weekdays_outside_the_header_grammar_are_flagged()
    {
        let cfg = ParserConfig {
            day_order: vec!["Monday".into(), "friday".into(), " SUNDAY ".into(), "".into()],
            ..Default::default()
        };
        assert_eq!(cfg.unreachable_weekdays(), ["Monday"]);
        assert!(
            ParserConfig::default()
                .unreachable_weekdays()
                .is_empty()
        );
    }

    #[test]
    fn selections_override_wins()
    {
        let cfg = ScheduleConfig::default();
        let p = cfg
            .selections_path(Some(Path::new("/tmp/picks.json")))
            .unwrap();
        assert_eq!(p, PathBuf::from("/tmp/picks.json"));
        assert_eq!(
            cfg.selections_path(None).unwrap(),
            PathBuf::from(".lineup/selections.json")
        );
    }
}
