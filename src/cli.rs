use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Shared application context for global flags
#[derive(Clone, Debug, Default)]
pub struct AppContext {
    pub quiet: bool,                 // global --quiet
    pub no_color: bool,              // global --no-color
    pub dry_run: bool,               // global --dry-run
    pub selections: Option<PathBuf>, // global --selections
}

#[derive(Parser)]
#[command(name = "lineup")]
#[command(about = "Browse a festival lineup, build a personal schedule and catch clashes")]
#[command(version, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Show what would change without saving anything
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Debug logging on stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Selections file (overrides schedule.selections_file from config)
    #[arg(long, global = true, value_name = "FILE")]
    pub selections: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse a lineup listing and print the performances
    Parse(ParseArgs),

    /// Browse the lineup by day and stage
    Browse(BrowseArgs),

    /// Add or remove a performance from your schedule
    Toggle(ToggleArgs),

    /// Show your schedule with conflicts
    Schedule(ScheduleArgs),

    /// List every pair of clashing selected performances
    Conflicts(ConflictsArgs),

    /// Export your schedule as plain text
    Export(ExportArgs),

    /// Show what is playing at a given day and time
    Now(NowArgs),

    /// Empty your schedule
    Clear,

    /// Initialize a lineup.toml config file
    Init(InitArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// The lineup listing every schedule command reads
#[derive(Args, Debug, Clone)]
pub struct LineupArg {
    /// Plain-text lineup file
    #[arg(value_name = "LINEUP")]
    pub lineup: PathBuf,
}

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Table,
}

#[derive(Parser, Debug)]
pub struct ParseArgs {
    #[command(flatten)]
    pub source: LineupArg,

    /// Emit JSON (array of performances)
    #[arg(long)]
    pub json: bool,

    /// Report lines the parser dropped on stderr
    #[arg(long)]
    pub show_skipped: bool,
}

#[derive(Parser, Debug)]
pub struct BrowseArgs {
    #[command(flatten)]
    pub source: LineupArg,

    /// Only days whose label contains this (e.g. "fri", "28 june")
    #[arg(short, long)]
    pub day: Option<String>,

    /// Only this stage (exact label)
    #[arg(short, long)]
    pub stage: Option<String>,

    /// Search artist and stage names
    #[arg(short = 'q', long)]
    pub search: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OnConflict {
    /// Report the clash and leave the schedule unchanged (exit code 2)
    #[default]
    Report,
    /// Add anyway and keep both acts
    KeepBoth,
    /// Drop the clashing act and add this one
    Replace,
}

#[derive(Parser, Debug)]
pub struct ToggleArgs {
    #[command(flatten)]
    pub source: LineupArg,

    /// Performance id (see `lineup parse` or `lineup browse`)
    #[arg(value_name = "ID", required = true)]
    pub ids: Vec<String>,

    /// What to do when the act clashes with one already selected
    #[arg(long, value_enum, default_value_t = OnConflict::Report)]
    pub on_conflict: OnConflict,
}

#[derive(Parser, Debug)]
pub struct ScheduleArgs {
    #[command(flatten)]
    pub source: LineupArg,

    /// Emit JSON (summary, days, conflicts)
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
pub struct ConflictsArgs {
    #[command(flatten)]
    pub source: LineupArg,

    /// Emit JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
pub struct ExportArgs {
    #[command(flatten)]
    pub source: LineupArg,

    /// Output file (defaults to schedule.export_file from config)
    #[arg(short, long, conflicts_with = "stdout")]
    pub output: Option<PathBuf>,

    /// Print the export instead of writing a file
    #[arg(long)]
    pub stdout: bool,

    /// Heading line (overrides schedule.export_title)
    #[arg(long)]
    pub title: Option<String>,
}

#[derive(Parser, Debug)]
pub struct NowArgs {
    #[command(flatten)]
    pub source: LineupArg,

    /// Day label or part of it (e.g. "saturday")
    #[arg(short, long)]
    pub day: String,

    /// Time as HH:MM (defaults to the local clock)
    #[arg(short, long)]
    pub time: Option<String>,
}

#[derive(Parser)]
pub struct InitArgs {
    /// Directory to initialize config in
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Overwrite existing config file
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[derive(Parser)]
pub struct CompletionsArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,

    /// Output directory; if omitted and --stdout not set, prints error
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Print completion script to stdout instead of a file
    #[arg(long)]
    pub stdout: bool,
}
