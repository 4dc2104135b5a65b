use std::process::ExitCode;

use clap::Parser;
use lineup::cli::{AppContext, Cli, Commands};
use lineup::cli_ext::{CONFLICT_EXIT_CODE, ConflictDetected, lineup_cmd, schedule_cmd};
use lineup::infra::logging;

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet);

    // Build a context once, pass everywhere
    let ctx = AppContext {
        quiet: cli.quiet,
        no_color: cli.no_color,
        dry_run: cli.dry_run,
        selections: cli.selections,
    };

    let result = match cli.command {
        Commands::Parse(args) => lineup_cmd::parse(args, &ctx),
        Commands::Browse(args) => lineup_cmd::browse(args, &ctx),
        Commands::Now(args) => lineup_cmd::now(args, &ctx),
        Commands::Toggle(args) => schedule_cmd::toggle(args, &ctx),
        Commands::Schedule(args) => schedule_cmd::schedule(args, &ctx),
        Commands::Conflicts(args) => schedule_cmd::conflicts(args, &ctx),
        Commands::Export(args) => schedule_cmd::export(args, &ctx),
        Commands::Clear => schedule_cmd::clear(&ctx),
        Commands::Init(args) => lineup::infra::config::init(args, &ctx),
        Commands::Completions(args) => lineup::completion::run(args, &ctx),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.downcast_ref::<ConflictDetected>().is_some() => {
            eprintln!("{e}");
            ExitCode::from(CONFLICT_EXIT_CODE)
        }
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
