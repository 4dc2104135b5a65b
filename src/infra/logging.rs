//! Tracing subscriber setup for the binary. Library code only emits events.

use tracing_subscriber::EnvFilter;

/// Install a stderr `fmt` subscriber. `RUST_LOG` wins when set; otherwise
/// `--verbose` selects `debug` and `--quiet` selects `error`.
pub fn init(
    verbose: bool,
    quiet: bool,
)
{
    let fallback = if verbose
    {
        "debug"
    }
    else if quiet
    {
        "error"
    }
    else
    {
        "warn"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    // A second init (tests driving `run` twice) is harmless
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
