//! **lineup** - Festival lineup parser and personal schedule planner
//!
//! Parses plain-text "Stage - Day" listings into performances, keeps a
//! persisted selection and reports overlapping picks.

/// Command-line interface with clap integration
pub mod cli;

/// Shell completion generation
pub mod completion;

/// Subcommand handlers
pub mod cli_ext;

/// Domain model and engine: parsing, selection, conflicts, export
pub mod core {
    /// Clock times, day ordering, performances and validation
    pub mod performance;
    pub use performance::{ClockTime, DayOrder, NewPerformance, Performance, ValidationError, performance_id};

    /// Line-oriented lineup parser
    pub mod parser;
    pub use parser::{LineupParser, ParseReport, SkipReason, SkippedLine, parse, sort_lineup};

    /// Selection, toggling, conflict detection and export
    pub mod schedule;
    pub use schedule::{ConflictAction, ConflictPair, Planner, Selection, ToggleOutcome};

    /// Filters and "playing now" lookups for browsing
    pub mod browse;
    pub use browse::Filter;

    /// Lazily loaded lineup source
    pub mod catalog;
    pub use catalog::{Catalog, LineupSource};
}

/// Infrastructure - configuration, file I/O, persistence and logging
pub mod infra {
    /// Layered configuration (file + LINEUP_* environment)
    pub mod config;
    pub use config::{Config, init as config_init, load_config};

    /// Lineup reading and text output
    pub mod io;

    /// Selection persistence behind a small trait
    pub mod store;
    pub use store::{JsonFileStore, MemoryStore, SelectionStore, StoreError};

    /// In-memory records for the performance/selection CRUD contract
    pub mod records;
    pub use records::RecordStore;

    /// tracing-subscriber setup for the binary
    pub mod logging;
}

pub use cli::{AppContext, Cli, Commands};
pub use crate::core::{Performance, Planner, Selection};
pub use infra::{Config, load_config};
